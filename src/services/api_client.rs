use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::response::ApiResponse;
use crate::storage::session_store::SessionStore;

/// Shared HTTP client for the Examera backend. Attaches the stored bearer
/// token to every request and decodes the uniform response envelope. Any 401
/// tears the cached session down on the spot; the backend has no token
/// refresh.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.into(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.client.get(self.url(path))).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    /// Like `post`, with a per-request timeout override. Used by login, which
    /// enforces a tighter client-side deadline than the default.
    pub async fn post_with_timeout<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T> {
        self.execute(self.client.post(self.url(path)).json(body).timeout(timeout))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.client.put(self.url(path)).json(body))
            .await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.client.patch(self.url(path)).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.client.delete(self.url(path))).await
    }

    async fn execute<T: DeserializeOwned>(&self, mut builder: RequestBuilder) -> Result<T> {
        if let Some(token) = self.store.token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Received 401 from backend; clearing stored session");
            self.store.clear();
            return Err(Error::Auth(
                "Your session has expired. Please log in again.".to_string(),
            ));
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.success {
            return Err(Error::Server(envelope.error_text()));
        }

        envelope
            .data
            .ok_or_else(|| Error::Server("Response contained no data".to_string()))
    }
}
