//! Process configuration for gitwh.
//!
//! The decoder is chosen by file extension:
//!
//! | Extension          | Format |
//! |--------------------|--------|
//! | `.json`, `.conf`   | JSON   |
//! | `.yaml`, `.yml`    | YAML   |
//! | `.toml`            | TOML   |
//!
//! # Example
//!
//! ```yaml
//! listen: ":8080"
//! buffer_size: 3
//! timeout: 10
//! repos:
//!   my-repo:
//!     secret: "s3cret"
//!     folders:
//!       - /srv/www/my-repo
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::registry::{RepositoryEntry, RepositoryRegistry};

pub const DEFAULT_BUFFER_SIZE: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTEN: &str = ":8080";

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

/// Webhook server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Listen address; `:PORT` binds on all interfaces.
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub repos: HashMap<String, RepositoryEntry>,
    /// Capacity of the dispatch queue.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Per-path sync deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            repos: HashMap::new(),
            buffer_size: default_buffer_size(),
            timeout: default_timeout(),
        }
    }
}

impl Config {
    /// Load and check a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content, &extension)?;
        config.check()?;
        Ok(config)
    }

    /// Parse configuration text in the format named by `extension`.
    pub fn parse(content: &str, extension: &str) -> Result<Self, ConfigError> {
        let config: Self = match extension {
            "json" | "conf" => serde_json::from_str(content)?,
            "yaml" | "yml" => serde_yaml::from_str(content)?,
            "toml" => toml::from_str(content)?,
            other => return Err(ConfigError::UnknownExtension(format!(".{other}"))),
        };
        Ok(config)
    }

    /// Hard errors that make the configuration unusable.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::Invalid("buffer_size must be at least 1".into()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".into()));
        }
        self.listen_addr()?;
        Ok(())
    }

    /// Validate the configuration and return a list of warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.repos.is_empty() {
            warnings.push("no repositories configured; every push will be rejected".to_string());
        }

        let mut names: Vec<_> = self.repos.keys().collect();
        names.sort();
        for name in names {
            let entry = &self.repos[name];
            if entry.folders.is_empty() {
                warnings.push(format!("repos.{name}: no folders configured"));
            }
            for (i, folder) in entry.folders.iter().enumerate() {
                if !Path::new(folder).is_absolute() {
                    warnings.push(format!(
                        "repos.{name}: folder '{folder}' is relative to the working directory"
                    ));
                }
                if entry.folders[..i].contains(folder) {
                    warnings.push(format!("repos.{name}: folder '{folder}' listed twice"));
                }
            }
        }

        warnings
    }

    /// Address to bind, as `host:port`.
    ///
    /// A bare `:PORT` listens on all interfaces and an empty value means port
    /// 80. Host names are kept as given and resolved when binding.
    pub fn listen_addr(&self) -> Result<String, ConfigError> {
        let listen = self.listen.trim();
        let invalid =
            |reason: &str| ConfigError::Invalid(format!("listen address '{}': {}", self.listen, reason));

        if listen.is_empty() {
            return Ok("0.0.0.0:80".to_string());
        }
        let (host, port) = listen.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
        port.parse::<u16>()
            .map_err(|e| invalid(&format!("bad port '{port}': {e}")))?;
        if host.chars().any(char::is_whitespace) {
            return Err(invalid("bad host"));
        }

        if host.is_empty() {
            Ok(format!("0.0.0.0:{port}"))
        } else {
            Ok(listen.to_string())
        }
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn registry(&self) -> RepositoryRegistry {
        RepositoryRegistry::new(self.repos.clone())
    }

    /// One-line summary used at startup and by `gitwh check`.
    pub fn summary(&self) -> String {
        format!(
            "{} repo(s), buffer size {}, timeout {}s",
            self.repos.len(),
            self.buffer_size,
            self.timeout
        )
    }
}
