mod errors;
mod identity;
mod ports;
mod session;

// Re-export the domain boundary types and ports.
pub use errors::{ApiError, IdentityConfigError, TokenError, TransportError};
pub use identity::{IdentityBinding, IdentityPoolConfig, LoginMethod};
pub use ports::{Clock, HttpRequest, HttpResponse, HttpTransport, TokenProvider};
pub use session::{AuthError, SessionToken, SignInNextStep, SignInResult, User};
