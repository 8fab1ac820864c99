use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Wire payloads for the Cognito user pool API (`application/x-amz-json-1.1`).

pub const AUTH_FLOW_USER_PASSWORD: &str = "USER_PASSWORD_AUTH";
pub const AUTH_FLOW_REFRESH_TOKEN: &str = "REFRESH_TOKEN_AUTH";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthRequest<'a> {
    pub auth_flow: &'a str,
    pub client_id: &'a str,
    pub auth_parameters: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitiateAuthResponse {
    pub authentication_result: Option<AuthenticationResult>,
    pub challenge_name: Option<String>,
    pub session: Option<String>,
}

// Tokens issued on sign-in or refresh. Refresh responses omit `RefreshToken`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticationResult {
    pub access_token: String,
    pub id_token: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserRequest<'a> {
    pub access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetUserResponse {
    pub username: String,
    #[serde(default)]
    pub user_attributes: Vec<UserAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserAttribute {
    pub name: String,
    pub value: Option<String>,
}

// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct CognitoErrorResponse {
    #[serde(rename = "__type")]
    pub kind: String,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl CognitoErrorResponse {
    // `__type` may carry a namespace prefix such as `com.amazonaws...#NotAuthorizedException`.
    pub fn code(&self) -> &str {
        self.kind.rsplit('#').next().unwrap_or(&self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_error_type_is_namespaced_then_code_strips_prefix() {
        let err: CognitoErrorResponse = serde_json::from_str(
            r#"{"__type":"com.amazonaws.cognito#NotAuthorizedException","message":"Incorrect username or password."}"#,
        )
        .expect("parse error envelope");

        assert_eq!(err.code(), "NotAuthorizedException");
        assert_eq!(err.message.as_deref(), Some("Incorrect username or password."));
    }

    #[test]
    fn when_refresh_response_has_no_refresh_token_then_it_still_parses() {
        let res: InitiateAuthResponse = serde_json::from_str(
            r#"{"AuthenticationResult":{"AccessToken":"a","IdToken":"i","ExpiresIn":3600,"TokenType":"Bearer"},"ChallengeParameters":{}}"#,
        )
        .expect("parse refresh response");

        let result = res.authentication_result.expect("tokens present");
        assert_eq!(result.id_token, "i");
        assert_eq!(result.expires_in, 3600);
        assert!(result.refresh_token.is_none());
    }

    #[test]
    fn when_initiate_auth_is_serialized_then_fields_are_pascal_case() {
        let mut params = BTreeMap::new();
        params.insert("USERNAME", "pilot");
        params.insert("PASSWORD", "secret");
        let req = InitiateAuthRequest {
            auth_flow: AUTH_FLOW_USER_PASSWORD,
            client_id: "client",
            auth_parameters: params,
        };

        let value = serde_json::to_value(&req).expect("serialize request");

        assert_eq!(value["AuthFlow"], "USER_PASSWORD_AUTH");
        assert_eq!(value["ClientId"], "client");
        assert_eq!(value["AuthParameters"]["USERNAME"], "pilot");
    }
}
