use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::{
    AuthError, Clock, IdentityBinding, LoginMethod, SessionToken, SignInResult, TokenError,
    TokenProvider, User,
};
use crate::interface_adapters::protocol::{
    AUTH_FLOW_REFRESH_TOKEN, AUTH_FLOW_USER_PASSWORD, CognitoErrorResponse, GetUserRequest,
    GetUserResponse, InitiateAuthRequest, InitiateAuthResponse,
};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";
// Refresh a little before the provider considers the token expired.
const EXPIRY_SKEW_SECONDS: u64 = 60;

// System clock adapter used for token expiry.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[derive(Debug)]
pub enum CognitoClientError {
    Transport(reqwest::Error),
    Service { code: String, message: String },
    Decode(reqwest::Error),
}

impl fmt::Display for CognitoClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CognitoClientError::Transport(err) => write!(f, "cognito transport error: {err}"),
            CognitoClientError::Service { code, message } => {
                write!(f, "cognito error {code}: {message}")
            }
            CognitoClientError::Decode(err) => write!(f, "cognito response decode error: {err}"),
        }
    }
}

impl std::error::Error for CognitoClientError {}

impl From<CognitoClientError> for AuthError {
    fn from(err: CognitoClientError) -> Self {
        match err {
            CognitoClientError::Service { code, message } => AuthError::new(code, message),
            CognitoClientError::Transport(err) => AuthError::new("NetworkError", err.to_string()),
            CognitoClientError::Decode(err) => {
                AuthError::new("InvalidResponseException", err.to_string())
            }
        }
    }
}

// Tokens owned by the provider for the signed-in user.
#[derive(Clone)]
struct StoredSession {
    // Distinct per sign-in; a refresh only lands on the session it started from.
    generation: u64,
    username: String,
    id_token: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_at: u64,
}

// Session provider backed by a Cognito user pool.
pub struct CognitoIdentityProvider {
    http: reqwest::Client,
    binding: IdentityBinding,
    endpoint: String,
    clock: Arc<dyn Clock>,
    session: Mutex<Option<StoredSession>>,
    generations: AtomicU64,
}

impl CognitoIdentityProvider {
    pub fn new(binding: IdentityBinding, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: binding.default_endpoint(),
            binding,
            clock: Arc::new(SystemClock),
            session: Mutex::new(None),
            generations: AtomicU64::new(0),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn binding(&self) -> &IdentityBinding {
        &self.binding
    }

    #[tracing::instrument(name = "sign_in", skip_all, fields(username = %username))]
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignInResult, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::new(
                "EmptySignInUsername",
                "username is required to sign in",
            ));
        }
        if password.is_empty() {
            return Err(AuthError::new(
                "EmptySignInPassword",
                "password is required to sign in",
            ));
        }
        if self.binding.login_with() == LoginMethod::Email && !username.contains('@') {
            return Err(AuthError::new(
                "InvalidParameterException",
                "this user pool signs in with an email address",
            ));
        }
        if self.session.lock().await.is_some() {
            return Err(AuthError::new(
                "UserAlreadyAuthenticatedException",
                "there is already a signed in user",
            ));
        }

        let mut params = BTreeMap::new();
        params.insert("USERNAME", username);
        params.insert("PASSWORD", password);
        let req = InitiateAuthRequest {
            auth_flow: AUTH_FLOW_USER_PASSWORD,
            client_id: self.binding.user_pool_client_id(),
            auth_parameters: params,
        };

        let res = match self
            .call::<_, InitiateAuthResponse>("InitiateAuth", &req)
            .await
        {
            Ok(res) => res,
            Err(CognitoClientError::Service { code, .. }) if code == "UserNotConfirmedException" => {
                tracing::info!("sign-in requires sign-up confirmation.");
                return Ok(SignInResult::pending("CONFIRM_SIGN_UP"));
            }
            Err(e) => {
                tracing::error!(error = %e, "sign-in failed.");
                return Err(e.into());
            }
        };

        if let Some(tokens) = res.authentication_result {
            let session = StoredSession {
                generation: self.generations.fetch_add(1, Ordering::SeqCst) + 1,
                username: username.to_string(),
                id_token: tokens.id_token,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires_at: self.expires_at(tokens.expires_in),
            };
            let mut guard = self.session.lock().await;
            // Another sign-in may have completed while this one was in flight.
            if guard.is_some() {
                return Err(AuthError::new(
                    "UserAlreadyAuthenticatedException",
                    "there is already a signed in user",
                ));
            }
            *guard = Some(session);
            tracing::info!("signed in successfully.");
            return Ok(SignInResult::signed_in());
        }

        match res.challenge_name {
            Some(challenge) => {
                tracing::info!(%challenge, "sign-in requires another step.");
                Ok(SignInResult::pending(next_step_for(&challenge)))
            }
            None => Err(AuthError::new(
                "InvalidResponseException",
                "sign-in response carried neither tokens nor a challenge",
            )),
        }
    }

    pub async fn sign_out(&self) {
        let previous = self.session.lock().await.take();
        if previous.is_some() {
            tracing::info!("signed out.");
        }
    }

    pub async fn current_user(&self) -> Result<User, AuthError> {
        let session = self
            .fresh_session()
            .await
            .map_err(|e| AuthError::new("UserUnAuthenticatedException", e.to_string()))?;

        let res: GetUserResponse = self
            .call(
                "GetUser",
                &GetUserRequest {
                    access_token: &session.access_token,
                },
            )
            .await?;

        let user_id = res
            .user_attributes
            .iter()
            .find(|attr| attr.name == "sub")
            .and_then(|attr| attr.value.clone())
            .unwrap_or_else(|| res.username.clone());

        Ok(User {
            username: res.username,
            user_id,
        })
    }

    // Return a session whose tokens are still valid, refreshing if needed.
    async fn fresh_session(&self) -> Result<StoredSession, TokenError> {
        // Never hold the lock across the refresh request.
        let session = self
            .session
            .lock()
            .await
            .clone()
            .ok_or(TokenError::NotSignedIn)?;

        let now = self.clock.now_epoch_seconds();
        if session.expires_at > now.saturating_add(EXPIRY_SKEW_SECONDS) {
            return Ok(session);
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            self.clear_if_current(session.generation).await;
            tracing::info!("session expired without refresh token.");
            return Err(TokenError::SessionExpired);
        };

        let mut params = BTreeMap::new();
        params.insert("REFRESH_TOKEN", refresh_token.as_str());
        let req = InitiateAuthRequest {
            auth_flow: AUTH_FLOW_REFRESH_TOKEN,
            client_id: self.binding.user_pool_client_id(),
            auth_parameters: params,
        };

        let res = match self
            .call::<_, InitiateAuthResponse>("InitiateAuth", &req)
            .await
        {
            Ok(res) => res,
            Err(e @ CognitoClientError::Service { .. }) => {
                // The refresh token was rejected; the session is gone.
                self.clear_if_current(session.generation).await;
                tracing::error!(error = %e, "session refresh rejected.");
                return Err(TokenError::Refresh(e.into()));
            }
            Err(e) => {
                tracing::error!(error = %e, "session refresh failed.");
                return Err(TokenError::Refresh(e.into()));
            }
        };

        let Some(tokens) = res.authentication_result else {
            return Err(TokenError::Refresh(AuthError::new(
                "InvalidResponseException",
                "refresh response carried no tokens",
            )));
        };

        let refreshed = StoredSession {
            generation: session.generation,
            username: session.username,
            id_token: tokens.id_token,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.or(session.refresh_token),
            expires_at: self.expires_at(tokens.expires_in),
        };

        let mut guard = self.session.lock().await;
        // A sign-out (or a new sign-in) during the refresh wins.
        if guard.as_ref().map(|s| s.generation) != Some(refreshed.generation) {
            return Err(TokenError::NotSignedIn);
        }
        *guard = Some(refreshed.clone());
        tracing::debug!("session refreshed.");
        Ok(refreshed)
    }

    // Drop the session only if it is still the one identified by `generation`.
    async fn clear_if_current(&self, generation: u64) {
        let mut guard = self.session.lock().await;
        if guard.as_ref().map(|s| s.generation) == Some(generation) {
            *guard = None;
        }
    }

    // `ExpiresIn` comes from the server; never overflow on it.
    fn expires_at(&self, expires_in: u64) -> u64 {
        self.clock.now_epoch_seconds().saturating_add(expires_in)
    }

    async fn call<Req, Res>(&self, operation: &str, body: &Req) -> Result<Res, CognitoClientError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| CognitoClientError::Service {
            code: "SerializationException".to_string(),
            message: e.to_string(),
        })?;

        let res = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .body(payload)
            .send()
            .await
            .map_err(CognitoClientError::Transport)?;
        let status = res.status();

        // Keep the service error code so callers can branch on it.
        if !status.is_success() {
            let (code, message) = match res.json::<CognitoErrorResponse>().await {
                Ok(payload) => (
                    payload.code().to_string(),
                    payload.message.unwrap_or_default(),
                ),
                Err(_) => (
                    "UnknownError".to_string(),
                    format!("unexpected status {status}"),
                ),
            };
            return Err(CognitoClientError::Service { code, message });
        }

        res.json::<Res>().await.map_err(CognitoClientError::Decode)
    }
}

#[async_trait]
impl TokenProvider for CognitoIdentityProvider {
    async fn fetch_token(&self) -> Result<SessionToken, TokenError> {
        let session = self.fresh_session().await?;
        Ok(SessionToken::new(session.id_token))
    }
}

fn next_step_for(challenge: &str) -> String {
    match challenge {
        "NEW_PASSWORD_REQUIRED" => "CONFIRM_SIGN_IN_WITH_NEW_PASSWORD_REQUIRED".to_string(),
        "SMS_MFA" => "CONFIRM_SIGN_IN_WITH_SMS_CODE".to_string(),
        "SOFTWARE_TOKEN_MFA" => "CONFIRM_SIGN_IN_WITH_TOTP_CODE".to_string(),
        other => other.to_string(),
    }
}
