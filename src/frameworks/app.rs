use crate::frameworks::config;
use crate::interface_adapters::api::ApiService;
use crate::interface_adapters::clients::{CognitoIdentityProvider, ReqwestTransport};
use std::sync::Arc;

// Logs go to stderr; stdout carries only the tenant identifier.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,tenant_client=info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().with_current_span(true).init();
    } else {
        builder.with_target(false).without_time().compact().init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Explicit initialization: the binding is passed along, never stored globally.
    let binding = config::identity_binding()?;
    tracing::debug!(
        user_pool_id = %binding.user_pool_id(),
        region = %binding.region(),
        "identity pool configured."
    );

    let base_url = config::api_base_url()?;
    let timeout = config::http_timeout();
    tracing::debug!(%base_url, ?timeout, "api client configured.");

    let identity = Arc::new(CognitoIdentityProvider::new(binding, timeout)?);
    let (username, password) = config::credentials()?;
    let result = identity.sign_in(&username, &password).await?;
    if !result.is_signed_in {
        let step = result
            .next_step
            .map(|step| step.sign_in_step)
            .unwrap_or_default();
        tracing::error!(%step, "sign-in needs another step; finish it before fetching the tenant.");
        return Err(format!("sign-in incomplete: {step}").into());
    }

    let api = ApiService::new(identity, Arc::new(ReqwestTransport::new(timeout)?), base_url);
    let tenant = api.get_tenant().await?;
    tracing::info!("tenant resolved.");
    println!("{tenant}");

    Ok(())
}
