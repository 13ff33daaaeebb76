use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::models::user::{AuthResponseDto, LoginUserDto, RegisterUserDto, UserDto, UserRole};
use crate::services::api_client::ApiClient;
use crate::storage::session_store::SessionStore;
use crate::utils::validation::validate;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    store: Arc<SessionStore>,
    login_timeout: Duration,
}

impl AuthService {
    pub fn new(api: ApiClient, store: Arc<SessionStore>, login_timeout: Duration) -> Self {
        Self {
            api,
            store,
            login_timeout,
        }
    }

    /// Authenticates against the backend and caches the returned tokens and
    /// profile. The login request carries its own client-side deadline.
    pub async fn login(&self, dto: &LoginUserDto) -> Result<AuthResponseDto> {
        validate(dto)?;

        let auth: AuthResponseDto = self
            .api
            .post_with_timeout("/Auth/login", dto, self.login_timeout)
            .await?;

        self.store.set_session(
            auth.token.clone(),
            auth.refresh_token.clone(),
            auth.user.clone(),
        )?;
        info!("Logged in as {}", auth.user.as_ref().map(|u| u.username.as_str()).unwrap_or("?"));

        Ok(auth)
    }

    pub async fn register(&self, dto: &RegisterUserDto) -> Result<AuthResponseDto> {
        validate(dto)?;

        let auth: AuthResponseDto = self.api.post("/Auth/register", dto).await?;

        self.store.set_session(
            auth.token.clone(),
            auth.refresh_token.clone(),
            auth.user.clone(),
        )?;

        Ok(auth)
    }

    pub fn logout(&self) {
        self.store.clear();
        info!("Session cleared");
    }

    pub fn current_user(&self) -> Option<UserDto> {
        self.store.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.current_user(), Some(user) if user.role == UserRole::Admin)
    }

    pub fn is_student(&self) -> bool {
        matches!(self.current_user(), Some(user) if user.role == UserRole::Student)
    }
}
