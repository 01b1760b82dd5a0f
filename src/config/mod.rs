//! Configuration management
//!
//! Settings come from an INI file (`~/.config/solen/config.ini` by default)
//! layered with `SOLEN__<SECTION>__<KEY>` environment variables:
//!
//! ```ini
//! [solana]
//! default_env = dev
//! dev_keypair = ~/.config/solana/dev.json
//!
//! [endpoints]
//! dev_rpc_url = https://api.devnet.solana.com
//!
//! [addresses]
//! dev_token = <mint address>
//!
//! [bulk]
//! pool_size = 200
//! ```

mod models;
mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, SolenError};
use crate::utils::expand_home;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// `default_env` and `<env>_keypair` entries
    #[serde(default)]
    pub solana: BTreeMap<String, String>,
    /// `<env>_rpc_url` entries
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
    /// `<env>_token` entries
    #[serde(default)]
    pub addresses: BTreeMap<String, String>,
    #[serde(default)]
    pub bulk: BulkConfig,
}

impl Config {
    /// `~/.config/solen/config.ini`
    pub fn default_path() -> PathBuf {
        expand_home("~/.config/solen/config.ini")
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; the default file is optional so that a
    /// configuration given purely through the environment works.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (expand_home(path), true),
            None => (Self::default_path(), false),
        };
        info!("Loading configuration from: {}", path.display());

        let settings = config::Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Ini).required(required))
            .add_source(Environment::with_prefix("SOLEN").separator("__"))
            .build()?;
        Self::finish(settings)
    }

    /// Parse INI text without consulting the environment
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bulk
            .validate()
            .map_err(|e| SolenError::config(format!("Bulk config error: {}", e)))
    }

    pub fn default_env(&self) -> Option<&str> {
        self.solana
            .get("default_env")
            .map(String::as_str)
            .filter(|env| !env.is_empty())
    }

    /// Resolve endpoint, keypair and token for `env`, falling back to
    /// `default_env`
    pub fn env_settings(&self, env: Option<&str>) -> Result<EnvConfig> {
        let env = match env.filter(|env| !env.is_empty()).or_else(|| self.default_env()) {
            Some(env) => env.to_string(),
            None => {
                return Err(SolenError::config(
                    "no environment given and no `default_env` in config file (solana section)",
                ));
            }
        };

        let key = format!("{}_rpc_url", env);
        let rpc_url = lookup(&self.endpoints, &key).ok_or_else(|| {
            SolenError::config(format!("missing `{}` in config file (endpoints section)", key))
        })?;

        let key = format!("{}_keypair", env);
        let keypair_path = lookup(&self.solana, &key).ok_or_else(|| {
            SolenError::config(format!("missing `{}` in config file (solana section)", key))
        })?;

        let key = format!("{}_token", env);
        let token = lookup(&self.addresses, &key).map(str::to_string);
        if token.is_none() {
            warn!("missing `{}` in config file (addresses section)", key);
        }

        Ok(EnvConfig {
            rpc_url: rpc_url.to_string(),
            keypair_path: expand_home(keypair_path),
            token,
            env,
        })
    }
}

fn lookup<'a>(section: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    section
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
