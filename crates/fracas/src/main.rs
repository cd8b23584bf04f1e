//! Server binary: bind address from the environment, tracing to stderr.

use fracas::FracasServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let server = FracasServerBuilder::new()
        .bind(&format!("0.0.0.0:{port}"))
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "fracas server started");
    server.run().await?;
    Ok(())
}
