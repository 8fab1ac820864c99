use crate::domain::{ApiError, HttpTransport, TokenProvider};
use crate::use_cases::fetch_tenant::FetchTenantUseCase;
use std::sync::Arc;

// Stateless service object handed to application code.
#[derive(Clone)]
pub struct ApiService {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    fetch_tenant: Arc<FetchTenantUseCase<Arc<dyn TokenProvider>, Arc<dyn HttpTransport>>>,
}

impl ApiService {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetch_tenant: Arc::new(FetchTenantUseCase {
                tokens,
                transport,
                base_url: base_url.into(),
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.fetch_tenant.base_url
    }

    pub async fn get_tenant(&self) -> Result<String, ApiError> {
        self.fetch_tenant.execute().await
    }
}
