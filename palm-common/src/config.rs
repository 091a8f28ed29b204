//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a TOML file; every field has a built-in
//! default so a missing file never stops startup. Command-line flags and
//! environment variables override the file (resolved by the binaries).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "PALM_ROOT_FOLDER";

/// Database file created inside the root folder
pub const DATABASE_FILE_NAME: &str = "palm.db";

/// Built-in defaults for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

/// OS-dependent default root folder
///
/// `~/.local/share/palm` on Linux, the application data folder elsewhere.
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("palm"))
        .unwrap_or_else(|| PathBuf::from("./palm_data"))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5730
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_delay_scale() -> f64 {
    1.0
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

/// Where analysis records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local map; records vanish on restart
    #[default]
    Memory,
    /// SQLite database file
    Sqlite,
}

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Record store backend
    #[serde(default)]
    pub storage: StorageKind,

    /// Explicit SQLite file; defaults to `<root_folder>/palm.db`
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: default_host(),
            port: default_port(),
            storage: StorageKind::default(),
            database: None,
            logging: LoggingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Analysis pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Multiplier applied to every dwell delay (1.0 = nominal timing)
    #[serde(default = "default_delay_scale")]
    pub delay_scale: f64,

    /// Client polling interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Largest accepted upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_scale: default_delay_scale(),
            poll_interval_ms: default_poll_interval_ms(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl TomlConfig {
    /// Check values that serde cannot constrain
    pub fn validate(&self) -> Result<()> {
        if !self.analysis.delay_scale.is_finite() || self.analysis.delay_scale < 0.0 {
            return Err(Error::Config(format!(
                "analysis.delay_scale must be a non-negative number, got {}",
                self.analysis.delay_scale
            )));
        }
        if self.analysis.poll_interval_ms == 0 {
            return Err(Error::Config(
                "analysis.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.analysis.max_upload_bytes == 0 {
            return Err(Error::Config(
                "analysis.max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default config file location: `<config_dir>/palm/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("palm").join(format!("{}.toml", module_name)))
}

/// Parse and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// Nothing at the default location; built-in defaults
    Missing(PathBuf),
    /// Default file present but unusable; built-in defaults
    Ignored { path: PathBuf, reason: String },
    /// Platform has no config directory; built-in defaults
    NoConfigDir,
}

impl ConfigSource {
    /// True when built-in defaults are in effect
    pub fn is_fallback(&self) -> bool {
        !matches!(self, ConfigSource::File(_))
    }

    /// Report the outcome; call once a subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                info!("Loaded configuration from {}", path.display());
            }
            ConfigSource::Missing(path) => {
                info!("No config file at {}, using built-in defaults", path.display());
            }
            ConfigSource::Ignored { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason);
            }
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using built-in defaults");
            }
        }
    }
}

/// Configuration plus its provenance
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Load configuration with graceful degradation
///
/// An explicit path must exist and parse. Without one, the module's default
/// location is tried; a missing or broken default file falls back to
/// built-in defaults. Nothing is logged here: binaries load configuration
/// before tracing is set up and report `source` afterwards.
pub fn load_or_default(explicit: Option<&Path>, module_name: &str) -> Result<LoadedConfig> {
    load_or_default_at(explicit, default_config_path(module_name))
}

/// [`load_or_default`] with the default location supplied by the caller
pub fn load_or_default_at(explicit: Option<&Path>, default_path: Option<PathBuf>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)?;
        return Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path.to_path_buf()),
        });
    }

    let Some(path) = default_path else {
        return Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::NoConfigDir,
        });
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Missing(path),
        });
    }

    match load_toml_config(&path) {
        Ok(config) => Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path),
        }),
        Err(e) => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Ignored {
                path,
                reason: e.to_string(),
            },
        }),
    }
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. `PALM_ROOT_FOLDER` environment variable
/// 3. TOML `root_folder`
/// 4. OS-dependent compiled default
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_config(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!(module = %self.module_name, "Root folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                info!(module = %self.module_name, "Root folder from {}: {}", ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            info!(module = %self.module_name, "Root folder from config file: {}", path.display());
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}
