use crate::domain::{ApiError, HttpRequest, HttpTransport, TokenProvider};

pub const TENANT_PATH: &str = "/tenant";

// Tenant lookup use case with injected dependencies.
// Every call fetches its own token and issues its own request.
pub struct FetchTenantUseCase<T, H> {
    pub tokens: T,
    pub transport: H,
    pub base_url: String,
}

impl<T, H> FetchTenantUseCase<T, H>
where
    T: TokenProvider,
    H: HttpTransport,
{
    #[tracing::instrument(name = "fetch_tenant", skip_all)]
    pub async fn execute(&self) -> Result<String, ApiError> {
        let token = self.tokens.fetch_token().await.map_err(|e| {
            tracing::error!(error = %e, "failed to obtain authentication token.");
            ApiError::Authentication(e)
        })?;

        let request = HttpRequest {
            url: format!("{}{}", self.base_url.trim_end_matches('/'), TENANT_PATH),
            headers: vec![
                ("Authorization".to_string(), token.as_str().to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
        };

        let response = self.transport.get(request).await.map_err(|e| {
            tracing::error!(error = %e, "tenant request failed.");
            ApiError::Transport(e)
        })?;

        if !response.is_success() {
            let err = ApiError::Request {
                status: response.status,
                status_text: response.status_text,
                body: response.body,
            };
            tracing::error!(error = %err, "tenant request rejected.");
            return Err(err);
        }

        tracing::debug!("tenant fetched.");
        // The tenant identifier is opaque at this layer.
        Ok(response.body)
    }
}
