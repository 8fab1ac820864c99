use std::{env, fmt, time::Duration};

use crate::domain::{IdentityBinding, IdentityConfigError, IdentityPoolConfig, LoginMethod};

// Runtime settings. The core never reads the environment; only bootstrap does.

pub const DEFAULT_API_BASE_URL: &str =
    "https://4hfpkn6je0.execute-api.eu-central-1.amazonaws.com/Prod";
pub const DEFAULT_USER_POOL_ID: &str = "eu-central-1_42l28C0kv";
pub const DEFAULT_USER_POOL_CLIENT_ID: &str = "sot88lji4bcf3vg5l2itf9nml";
pub const DEFAULT_REGION: &str = "eu-central-1";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: String,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(IdentityConfigError),
    InvalidUrl(url::ParseError),
    InsecureUrl(String),
    InvalidLoginMethod(String),
    MissingEnv(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "failed to read {path}: {source}"),
            ConfigError::Parse(err) => write!(f, "invalid identity config: {err}"),
            ConfigError::Invalid(err) => write!(f, "invalid identity config: {err}"),
            ConfigError::InvalidUrl(err) => write!(f, "invalid api url: {err}"),
            ConfigError::InsecureUrl(url) => write!(f, "api url must use https: {url}"),
            ConfigError::InvalidLoginMethod(value) => {
                write!(f, "login method must be `username` or `email`, got {value:?}")
            }
            ConfigError::MissingEnv(name) => write!(f, "{name} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(err) => Some(err),
            ConfigError::InvalidUrl(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IdentityConfigError> for ConfigError {
    fn from(err: IdentityConfigError) -> Self {
        ConfigError::Invalid(err)
    }
}

// Identity binding from `IDENTITY_CONFIG_PATH`, or defaults with `COGNITO_*` overrides.
pub fn identity_binding() -> Result<IdentityBinding, ConfigError> {
    if let Ok(path) = env::var("IDENTITY_CONFIG_PATH") {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        return identity_from_toml(&raw);
    }

    identity_from_overrides(
        env::var("COGNITO_USER_POOL_ID").ok(),
        env::var("COGNITO_USER_POOL_CLIENT_ID").ok(),
        env::var("COGNITO_REGION").ok(),
        env::var("COGNITO_LOGIN_WITH").ok(),
    )
}

pub fn identity_from_toml(raw: &str) -> Result<IdentityBinding, ConfigError> {
    let config: IdentityPoolConfig = toml::from_str(raw).map_err(ConfigError::Parse)?;
    Ok(config.configure()?)
}

pub fn identity_from_overrides(
    user_pool_id: Option<String>,
    user_pool_client_id: Option<String>,
    region: Option<String>,
    login_with: Option<String>,
) -> Result<IdentityBinding, ConfigError> {
    let login_with = match login_with {
        Some(value) => {
            LoginMethod::parse(&value).ok_or(ConfigError::InvalidLoginMethod(value))?
        }
        None => LoginMethod::Username,
    };

    let config = IdentityPoolConfig {
        user_pool_id: user_pool_id.unwrap_or_else(|| DEFAULT_USER_POOL_ID.to_string()),
        user_pool_client_id: user_pool_client_id
            .unwrap_or_else(|| DEFAULT_USER_POOL_CLIENT_ID.to_string()),
        region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
        login_with,
    };
    Ok(config.configure()?)
}

pub fn api_base_url() -> Result<String, ConfigError> {
    parse_api_base_url(env::var("TENANT_API_URL").ok())
}

pub fn parse_api_base_url(value: Option<String>) -> Result<String, ConfigError> {
    let raw = value.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let parsed = url::Url::parse(raw.trim()).map_err(ConfigError::InvalidUrl)?;
    if parsed.scheme() != "https" {
        return Err(ConfigError::InsecureUrl(raw));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

pub fn http_timeout() -> Duration {
    env::var("TENANT_HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT)
}

pub fn credentials() -> Result<(String, String), ConfigError> {
    let username =
        env::var("TENANT_USERNAME").map_err(|_| ConfigError::MissingEnv("TENANT_USERNAME"))?;
    let password =
        env::var("TENANT_PASSWORD").map_err(|_| ConfigError::MissingEnv("TENANT_PASSWORD"))?;
    Ok((username, password))
}
