use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{
    HttpRequest, HttpResponse, HttpTransport, SessionToken, TokenError, TokenProvider,
    TransportError,
};

// Token source whose current session can be swapped between calls.
#[derive(Clone)]
pub(crate) struct RecordingTokens {
    current: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
}

impl RecordingTokens {
    pub(crate) fn signed_in(token: impl Into<String>) -> Self {
        Self {
            current: Arc::new(Mutex::new(Some(token.into()))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn signed_out() -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn set_token(&self, token: Option<&str>) {
        let mut guard = self.current.lock().expect("token mutex poisoned");
        *guard = token.map(str::to_string);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for RecordingTokens {
    async fn fetch_token(&self) -> Result<SessionToken, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.current.lock().expect("token mutex poisoned");
        guard
            .as_deref()
            .map(SessionToken::new)
            .ok_or(TokenError::NotSignedIn)
    }
}

// Scripted reply returned for every GET.
#[derive(Clone)]
pub(crate) enum Reply {
    Respond { status: u16, status_text: &'static str, body: &'static str },
    Fail(&'static str),
}

// Transport fake that records each request it sees.
#[derive(Clone)]
pub(crate) struct RecordingTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl RecordingTransport {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn ok(body: &'static str) -> Self {
        Self::new(Reply::Respond {
            status: 200,
            status_text: "OK",
            body,
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().expect("requests mutex poisoned").len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);

        match &self.reply {
            Reply::Respond {
                status,
                status_text,
                body,
            } => Ok(HttpResponse {
                status: *status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }),
            Reply::Fail(message) => Err(TransportError::new(*message)),
        }
    }
}
