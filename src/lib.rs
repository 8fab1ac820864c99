pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{ApiError, IdentityBinding, IdentityPoolConfig, LoginMethod, TokenProvider};
pub use frameworks::app::run;
pub use interface_adapters::api::ApiService;
