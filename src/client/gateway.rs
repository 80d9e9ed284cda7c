use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::SESSION_COOKIE;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderSubmission};
use crate::domain::wishlist::WishlistItem;

/// Remote wishlist. Every call returns the authoritative list.
#[async_trait]
pub trait WishlistGateway: Send + Sync {
    async fn fetch(&self) -> Result<Vec<WishlistItem>, DomainError>;
    async fn add(&self, item: &WishlistItem) -> Result<Vec<WishlistItem>, DomainError>;
    async fn remove(&self, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, submission: &OrderSubmission) -> Result<Order, DomainError>;
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::Transient(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the storefront HTTP API, sending the session token as the
/// `auth-token` cookie when one is set.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    /// Log in or out without rebuilding the client.
    pub fn set_session(&mut self, token: Option<String>) {
        self.session = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, DomainError> {
        match &self.session {
            Some(token) => {
                let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}"))
                    .map_err(|_| DomainError::Unauthenticated)?;
                Ok(req.header(COOKIE, cookie))
            }
            None => Ok(req),
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, DomainError> {
        let resp = self.authed(req)?.send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, DomainError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| status.to_string());
    Err(match status {
        StatusCode::BAD_REQUEST => DomainError::Validation(message),
        StatusCode::UNAUTHORIZED => DomainError::Unauthenticated,
        StatusCode::NOT_FOUND => {
            log::debug!("Remote resource not found: {message}");
            DomainError::NotFound("Resource")
        }
        _ => DomainError::Transient(format!("{status}: {message}")),
    })
}

#[async_trait]
impl WishlistGateway for HttpGateway {
    async fn fetch(&self) -> Result<Vec<WishlistItem>, DomainError> {
        self.send(self.client.get(self.url("/api/user/wishlist")))
            .await
    }

    async fn add(&self, item: &WishlistItem) -> Result<Vec<WishlistItem>, DomainError> {
        self.send(self.client.post(self.url("/api/user/wishlist")).json(item))
            .await
    }

    async fn remove(&self, product_id: Uuid) -> Result<Vec<WishlistItem>, DomainError> {
        let req = self
            .client
            .delete(self.url("/api/user/wishlist"))
            .query(&[("product_id", product_id)]);
        self.send(req).await
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn submit(&self, submission: &OrderSubmission) -> Result<Order, DomainError> {
        self.send(self.client.post(self.url("/api/orders")).json(submission))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let gateway = HttpGateway::new("http://localhost:8080/");
        assert_eq!(
            gateway.url("/api/orders"),
            "http://localhost:8080/api/orders"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_transient() {
        // Nothing listens on the discard port.
        let gateway = HttpGateway::new("http://127.0.0.1:9").with_session("t");
        let err = gateway.fetch().await.unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::Transient);
    }
}
