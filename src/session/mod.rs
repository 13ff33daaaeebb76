pub mod clock;
pub mod controller;
pub mod ledger;
pub mod navigator;
pub mod submission;
