use serde::Deserialize;

use crate::domain::errors::IdentityConfigError;

// How users identify themselves at sign-in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    #[default]
    Username,
    Email,
}

impl LoginMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "username" => Some(LoginMethod::Username),
            "email" => Some(LoginMethod::Email),
            _ => None,
        }
    }
}

// Raw description of the managed identity pool, before validation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IdentityPoolConfig {
    pub user_pool_id: String,
    pub user_pool_client_id: String,
    pub region: String,
    #[serde(default)]
    pub login_with: LoginMethod,
}

impl IdentityPoolConfig {
    // Validate once at startup and hand back the binding used by the session provider.
    pub fn configure(self) -> Result<IdentityBinding, IdentityConfigError> {
        let user_pool_id = self.user_pool_id.trim();
        let user_pool_client_id = self.user_pool_client_id.trim();
        let region = self.region.trim();

        if user_pool_id.is_empty() {
            return Err(IdentityConfigError::MissingField("user_pool_id"));
        }
        if user_pool_client_id.is_empty() {
            return Err(IdentityConfigError::MissingField("user_pool_client_id"));
        }
        if region.is_empty() {
            return Err(IdentityConfigError::MissingField("region"));
        }
        if !is_valid_region(region) {
            return Err(IdentityConfigError::InvalidRegion(region.to_string()));
        }

        // Pool ids look like `eu-central-1_AbC123`.
        let suffix = user_pool_id
            .strip_prefix(region)
            .and_then(|rest| rest.strip_prefix('_'));
        match suffix {
            Some(suffix) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()) => {}
            _ => {
                return Err(IdentityConfigError::PoolRegionMismatch {
                    user_pool_id: user_pool_id.to_string(),
                    region: region.to_string(),
                });
            }
        }

        Ok(IdentityBinding {
            config: IdentityPoolConfig {
                user_pool_id: user_pool_id.to_string(),
                user_pool_client_id: user_pool_client_id.to_string(),
                region: region.to_string(),
                login_with: self.login_with,
            },
        })
    }
}

fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    let Some((number, words)) = parts.split_last() else {
        return false;
    };
    !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
        && words
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
}

// Validated identity pool handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityBinding {
    config: IdentityPoolConfig,
}

impl IdentityBinding {
    pub fn user_pool_id(&self) -> &str {
        &self.config.user_pool_id
    }

    pub fn user_pool_client_id(&self) -> &str {
        &self.config.user_pool_client_id
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    pub fn login_with(&self) -> LoginMethod {
        self.config.login_with
    }

    // Regional user pool API endpoint.
    pub fn default_endpoint(&self) -> String {
        format!("https://cognito-idp.{}.amazonaws.com/", self.config.region)
    }
}
