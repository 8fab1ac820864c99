use std::error::Error;
use std::fmt;

use crate::domain::session::AuthError;

// Why the identity provider could not hand out a token.
#[derive(Debug)]
pub enum TokenError {
    NotSignedIn,
    SessionExpired,
    Refresh(AuthError),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::NotSignedIn => write!(f, "no user is signed in"),
            TokenError::SessionExpired => write!(f, "session expired and cannot be refreshed"),
            TokenError::Refresh(err) => write!(f, "session refresh failed: {err}"),
        }
    }
}

impl Error for TokenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenError::Refresh(err) => Some(err),
            _ => None,
        }
    }
}

// Network-level failure: unreachable host, timeout, broken body stream.
#[derive(Debug)]
pub struct TransportError(Box<dyn Error + Send + Sync>);

impl TransportError {
    pub fn new(source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.0)
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}

// Failure of an authenticated API call.
#[derive(Debug)]
pub enum ApiError {
    // No token could be obtained; no request was sent.
    Authentication(TokenError),
    // The server answered with a non-2xx status.
    Request {
        status: u16,
        status_text: String,
        body: String,
    },
    Transport(TransportError),
}

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Authentication(_) => write!(f, "failed to obtain authentication token"),
            ApiError::Request {
                status,
                status_text,
                body,
            } => {
                write!(f, "failed to fetch tenant: {status}")?;
                if !status_text.is_empty() {
                    write!(f, " {status_text}")?;
                }
                write!(f, " - {body}")
            }
            ApiError::Transport(err) => write!(f, "tenant request failed: {err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Authentication(err) => Some(err),
            ApiError::Request { .. } => None,
            ApiError::Transport(err) => Some(err),
        }
    }
}

// Validation failures for the identity pool configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum IdentityConfigError {
    MissingField(&'static str),
    InvalidRegion(String),
    PoolRegionMismatch { user_pool_id: String, region: String },
}

impl fmt::Display for IdentityConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityConfigError::MissingField(field) => write!(f, "{field} is required"),
            IdentityConfigError::InvalidRegion(region) => write!(f, "invalid region {region:?}"),
            IdentityConfigError::PoolRegionMismatch {
                user_pool_id,
                region,
            } => write!(
                f,
                "user pool id {user_pool_id:?} does not belong to region {region:?}"
            ),
        }
    }
}

impl Error for IdentityConfigError {}
