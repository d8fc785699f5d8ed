use crate::config::CdfConfig;
use crate::error::Result;
use crate::infrastructure::cdf_client::CdfClient;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &CdfConfig) -> Result<Arc<CdfClient>> {
    info!(
        "☁️  CDF: {} (Project: {}, Client: {})",
        config.base_url, config.project, config.client_name
    );
    info!("🔌 Authenticating against {}", config.token_url());

    let client = CdfClient::connect(config).await?;
    info!("✅ CDF client ready");

    Ok(Arc::new(client))
}
