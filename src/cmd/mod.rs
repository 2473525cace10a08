//! CLI command implementations.
//!
//! | Module  | Commands handled |
//! |---------|------------------|
//! | `serve` | `Serve` (default) |
//! | `check` | `Check`          |

pub mod check;
pub mod serve;

pub use check::cmd_check;
pub use serve::cmd_serve;

use std::path::Path;

use anyhow::{Context, Result};
use gitwh::config::Config;

/// Load `path` and apply the `--listen` override.
fn load_config(path: &Path, listen: Option<&str>) -> Result<Config> {
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(listen) = listen {
        config.listen = listen.to_string();
        config.check()?;
    }
    Ok(config)
}
