//! Configuration loading and root folder resolution
//!
//! Every Lyra service resolves its settings with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`~/.config/lyra/config.toml` or `/etc/lyra/config.toml`)
//! 4. Compiled default (fallback)
//!
//! Command-line and environment tiers are handled by clap in each binary;
//! this module covers the file and default tiers.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Default loopback ports for the suite, gateway first
pub const GATEWAY_PORT: u16 = 5740;
pub const CATALOG_PORT: u16 = 5741;
pub const STORAGE_PORT: u16 = 5742;
pub const PLAYER_PORT: u16 = 5743;

/// Contents of config.toml (all sections optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Data directory holding the catalog database
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub storage: StorageSection,
}

/// `[gateway]` section: upstream service base URLs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewaySection {
    pub catalog_url: Option<String>,
    pub storage_url: Option<String>,
}

/// `[storage]` section: object store settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSection {
    pub bucket: Option<String>,
    /// Base URL prefixed to object keys when building public URLs
    pub public_base_url: Option<String>,
    /// Endpoint override for S3-compatible stores (MinIO etc.)
    pub endpoint_url: Option<String>,
}

impl FileConfig {
    /// Load config.toml from an explicit path, or from the platform
    /// default locations. A missing file is not an error; it yields the
    /// empty config so compiled defaults apply.
    pub fn load(explicit: Option<&PathBuf>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                p.clone()
            }
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// First existing config file among the platform default locations
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("lyra").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/lyra/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the data directory: CLI argument, then LYRA_ROOT environment
/// variable, then config file, then the OS data dir.
pub fn resolve_root_folder(cli_arg: Option<&PathBuf>, file: &FileConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.clone();
    }

    if let Ok(path) = std::env::var("LYRA_ROOT") {
        return PathBuf::from(path);
    }

    if let Some(path) = &file.root_folder {
        return path.clone();
    }

    dirs::data_local_dir()
        .map(|d| d.join("lyra"))
        .unwrap_or_else(|| PathBuf::from("./lyra_data"))
}

/// Ensure the root folder exists and return the catalog database path
pub fn database_path(root_folder: &PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join("lyra.db"))
}
