use anyhow::Result;
use tracing::info;

use rutificador_proxy::{api, logger, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = Config::from_env();

    info!("{}", "=".repeat(60));
    info!(
        "🚀 Rutificador Proxy - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 upstream: {}", config.lookup_base_url);
    info!("{}", "=".repeat(60));

    api::serve(config).await
}
