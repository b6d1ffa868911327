//! HTTP user store
//!
//! [`UserStore`] over the userbatch server's `/api/users` endpoints. No
//! timeout or retry is configured; reqwest defaults apply.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use userbatch_common::api::{
    BulkCreateRequest, BulkDeleteRequest, ErrorBody, MutationResponse, UserPayload,
};
use userbatch_common::{Error, NewUser, Result, UserRecord, UserStore};

const USER_AGENT: &str = concat!("userbatch/", env!("CARGO_PKG_VERSION"));

/// Remote store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpUserStore {
    client: Client,
    base_url: String,
}

impl HttpUserStore {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5780`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/api/users", self.base_url)
    }
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn select(&self) -> Result<Vec<UserRecord>> {
        let response = self
            .client
            .get(self.users_url())
            .send()
            .await
            .map_err(transport)?;

        read_json(response, "Failed to fetch users").await
    }

    async fn insert(&self, users: &[NewUser]) -> Result<u64> {
        let body = BulkCreateRequest {
            users: users.iter().map(UserPayload::from).collect(),
        };
        debug!("POST {} ({} users)", self.users_url(), body.users.len());

        let response = self
            .client
            .post(self.users_url())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let outcome: MutationResponse = read_json(response, "Failed to create users").await?;
        Ok(outcome.count)
    }

    async fn delete(&self, ids: &[i64]) -> Result<u64> {
        let body = BulkDeleteRequest { ids: ids.to_vec() };
        debug!("DELETE {} ({} ids)", self.users_url(), ids.len());

        let response = self
            .client
            .delete(self.users_url())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let outcome: MutationResponse = read_json(response, "Failed to delete users").await?;
        Ok(outcome.count)
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

/// Decode a success body, or turn an error status into [`Error::Transport`]
///
/// The server's `{"error": {"message": ...}}` text is used when present.
async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(transport);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or_else(|_| fallback.to_string());

    Err(Error::Transport(format!("{} (HTTP {})", message, status.as_u16())))
}
