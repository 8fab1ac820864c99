use serde::{Deserialize, Serialize};
use std::fmt;

// Short-lived bearer credential handed out by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the credential itself.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

// Identity of the signed-in user as seen by UI code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInNextStep {
    pub sign_in_step: String,
}

// Outcome of a sign-in attempt; `next_step` is set when more input is needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResult {
    pub is_signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<SignInNextStep>,
}

impl SignInResult {
    pub fn signed_in() -> Self {
        Self {
            is_signed_in: true,
            next_step: None,
        }
    }

    pub fn pending(step: impl Into<String>) -> Self {
        Self {
            is_signed_in: false,
            next_step: Some(SignInNextStep {
                sign_in_step: step.into(),
            }),
        }
    }
}

// Named identity failure, e.g. `NotAuthorizedException`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthError {
    pub name: String,
    pub message: String,
}

impl AuthError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for AuthError {}
