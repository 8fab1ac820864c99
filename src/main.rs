#[tokio::main]
async fn main() {
    if let Err(e) = tenant_client::run().await {
        tracing::error!(error = %e, "tenant client failed");
        std::process::exit(1);
    }
}
