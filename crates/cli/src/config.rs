//! CLI configuration: defaults, optional TOML file, `DIDREG_*` environment.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use didreg_types::Identity;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory holding the record database.
    pub data_dir: String,
    /// Directory receiving the audit log files.
    pub log_dir: String,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
    /// Caller identity key, the externally-authenticated principal passed
    /// to the registry on every owned operation.
    pub identity: Option<String>,
}

impl CliConfig {
    pub fn load(config_path: Option<&Path>, identity_override: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("data_dir", "didreg_data")?
            .set_default("log_dir", "logs")?
            .set_default("log_level", "info")?;

        builder = match config_path {
            Some(path) => builder.add_source(ConfigFile::from(path)),
            None => builder.add_source(ConfigFile::with_name("didreg").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("DIDREG"));

        let mut cfg: CliConfig = builder
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        if let Some(identity) = identity_override {
            cfg.identity = Some(identity.to_string());
        }
        Ok(cfg)
    }

    /// The caller identity, required by every owned operation.
    pub fn require_identity(&self) -> Result<Identity> {
        let raw = self.identity.as_deref().context(
            "no caller identity configured; pass --identity, set DIDREG_IDENTITY, \
             or add `identity` to the config file",
        )?;
        Identity::new(raw).context("configured identity key is invalid")
    }
}
