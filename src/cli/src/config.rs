//! Configuration for the ledger CLI.

use anyhow::Result;
use ledger::locks::DEFAULT_STRIPES;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TOKEN_LEDGER_DATA_DIR";

/// Environment variable overriding the keypair path.
pub const KEYPAIR_ENV: &str = "TOKEN_LEDGER_KEYPAIR";

/// Configuration for the ledger CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the ledger database
    pub data_dir: PathBuf,
    /// Keypair file used to sign instructions
    pub keypair: PathBuf,
    /// Number of lock stripes for the ledger
    pub lock_stripes: usize,
}

fn default_home() -> PathBuf {
    let mut dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("token-ledger");
    dir
}

impl Default for CliConfig {
    fn default() -> Self {
        let home = default_home();
        Self {
            data_dir: home.join("ledger"),
            keypair: home.join("id.key"),
            lock_stripes: DEFAULT_STRIPES,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            debug!("Using data directory from {}", DATA_DIR_ENV);
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var(KEYPAIR_ENV) {
            debug!("Using keypair from {}", KEYPAIR_ENV);
            self.keypair = PathBuf::from(path);
        }
    }
}
