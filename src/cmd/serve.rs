//! Webhook server command (`gitwh serve`).

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use gitwh::sync::GitPull;
use tracing::{info, warn};

pub async fn cmd_serve(config_path: &Path, listen: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path, listen)?;

    info!(path = %config_path.display(), "loaded config");
    info!("{}", config.summary());
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let git = GitPull::default();
    info!(git = %git.program(), "using git");

    gitwh::server::start_server(&config, Arc::new(git)).await
}
