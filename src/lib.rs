pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::services::admin_service::AdminService;
use crate::services::api_client::ApiClient;
use crate::services::auth_service::AuthService;
use crate::services::exam_service::ExamService;
use crate::storage::session_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub auth_service: AuthService,
    pub exam_service: ExamService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        Self::from_parts(
            &config.api_url,
            config.session_file.clone(),
            Duration::from_secs(config.login_timeout_secs),
        )
    }

    /// Builds the state from explicit parts; tests use this to point the
    /// client at a local backend and an isolated session file.
    pub fn from_parts(api_url: &str, session_file: PathBuf, login_timeout: Duration) -> Self {
        let store = Arc::new(SessionStore::load(session_file));
        let api = ApiClient::new(api_url, store.clone());

        let auth_service = AuthService::new(api.clone(), store.clone(), login_timeout);
        let exam_service = ExamService::new(api.clone());
        let admin_service = AdminService::new(api);

        Self {
            store,
            auth_service,
            exam_service,
            admin_service,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
