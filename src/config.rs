//! Environment-driven configuration.
//!
//! Everything a deployment varies comes from the environment, the way a
//! reverse-proxied or containerized service expects it:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `CIRCUS_ADDR` | `0.0.0.0:3000` | listener bind address |
//! | `CIRCUS_DATASET` | `data/scripts.json` | path to the scripts JSON |
//! | `RUST_LOG` | `info` | tracing filter |
//!
//! The address is validated when the listener binds, not here; a bad value
//! surfaces as a startup error either way.

use std::env;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATASET: &str = "data/scripts.json";

/// Runtime configuration, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// `host:port` the server binds to.
    pub addr: String,
    /// Path to the scripts dataset.
    pub dataset: PathBuf,
}

impl Config {
    /// Reads the environment, falling back to the defaults above.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = env::var("CIRCUS_ADDR") {
            config.addr = addr;
        }
        if let Some(path) = env::var_os("CIRCUS_DATASET") {
            config.dataset = PathBuf::from(path);
        }
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_owned(),
            dataset: PathBuf::from(DEFAULT_DATASET),
        }
    }
}
