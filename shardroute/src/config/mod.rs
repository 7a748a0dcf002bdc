//! Configuration and the sharding rule built from it.
//!
//! The current snapshot is swapped atomically: statements routed while
//! the configuration is reloaded keep using the snapshot they started with.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use shardroute_config::Config;
use tracing::info;

use crate::rule::{Error, ShardingRule};

static CONFIG: Lazy<ArcSwap<ConfigAndRule>> =
    Lazy::new(|| ArcSwap::from_pointee(ConfigAndRule::default()));

static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// shardroute.toml and the rule it describes.
#[derive(Debug, Clone, Default)]
pub struct ConfigAndRule {
    pub config: Config,
    pub rule: Arc<ShardingRule>,
    /// Where the configuration was loaded from, if a file.
    pub path: Option<PathBuf>,
}

impl ConfigAndRule {
    pub fn new(config: Config, path: Option<PathBuf>) -> Result<Self, Error> {
        let rule = ShardingRule::new(&config)?;
        Ok(Self {
            config,
            rule: Arc::new(rule),
            path,
        })
    }
}

/// Current configuration.
pub fn config() -> Arc<ConfigAndRule> {
    CONFIG.load().clone()
}

/// Current sharding rule.
pub fn rule() -> Arc<ShardingRule> {
    config().rule.clone()
}

/// Load the configuration file and make it current.
pub fn load(path: impl AsRef<Path>) -> Result<Arc<ConfigAndRule>, Error> {
    let path = path.as_ref();
    let config = Config::load(path)?;
    store(ConfigAndRule::new(config, Some(path.to_path_buf()))?)
}

/// Make the configuration current.
pub fn set(config: Config) -> Result<Arc<ConfigAndRule>, Error> {
    store(ConfigAndRule::new(config, None)?)
}

/// Load the current configuration file again. Configuration that
/// didn't come from a file stays as it is.
pub fn reload() -> Result<Arc<ConfigAndRule>, Error> {
    match config().path {
        Some(ref path) => {
            info!("reloading \"{}\"", path.display());
            load(path)
        }
        None => Ok(config()),
    }
}

fn store(config: ConfigAndRule) -> Result<Arc<ConfigAndRule>, Error> {
    let _lock = LOCK.lock();
    let config = Arc::new(config);
    CONFIG.store(config.clone());
    Ok(config)
}
