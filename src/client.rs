use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::abort::AbortSignal;
use crate::api::UserApi;
use crate::error::{Result, UsersError};
use crate::types::{NewUser, User, UserId};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// reqwest-backed client for the user collection at `base`.
pub struct UsersClient {
    http: Client,
    base: Url,
}

impl UsersClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base =
            Url::parse(base_url).map_err(|_| UsersError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(UsersError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("users-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn user_url(&self, id: UserId) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read response body>".to_string());
    let message = if message.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        message
    };

    Err(UsersError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl UserApi for UsersClient {
    async fn list(&self, signal: &AbortSignal) -> Result<Vec<User>> {
        debug!(url = %self.base, "GET users");
        signal
            .guard(async {
                let response = self.http.get(self.base.clone()).send().await?;
                let users: Vec<User> = check_status(response).await?.json().await?;
                debug!(count = users.len(), "fetched users");
                Ok(users)
            })
            .await
    }

    async fn create(&self, user: &NewUser, signal: &AbortSignal) -> Result<User> {
        debug!(url = %self.base, name = %user.name, "POST user");
        signal
            .guard(async {
                let response = self.http.post(self.base.clone()).json(user).send().await?;
                let created: User = check_status(response).await?.json().await?;
                debug!(id = created.id, "created user");
                Ok(created)
            })
            .await
    }

    async fn delete(&self, id: UserId, signal: &AbortSignal) -> Result<()> {
        let url = self.user_url(id);
        debug!(%url, "DELETE user");
        signal
            .guard(async {
                let response = self.http.delete(url).send().await?;
                check_status(response).await?;
                Ok(())
            })
            .await
    }
}
