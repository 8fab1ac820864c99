// The clients defined here are reqwest clients for the external services.
pub mod cognito;
pub mod http;

pub use cognito::{CognitoClientError, CognitoIdentityProvider, SystemClock};
pub use http::ReqwestTransport;
