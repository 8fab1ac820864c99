use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::{TokenError, TransportError};
use crate::domain::session::SessionToken;

// Port for obtaining the current session token. Called once per request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> Result<SessionToken, TokenError>;
}

// Outgoing GET as seen by the transport port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Completed response; the body is kept as raw text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Port for the network boundary.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

#[async_trait]
impl<T: TokenProvider + ?Sized> TokenProvider for Arc<T> {
    async fn fetch_token(&self) -> Result<SessionToken, TokenError> {
        (**self).fetch_token().await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).get(request).await
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_epoch_seconds(&self) -> u64 {
        (**self).now_epoch_seconds()
    }
}
