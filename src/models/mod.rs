pub mod admin;
pub mod exam;
pub mod response;
pub mod user;
