pub mod admin_service;
pub mod api_client;
pub mod auth_service;
pub mod exam_service;
