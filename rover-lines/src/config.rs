//! Configuration loading and asset root resolution
//!
//! The TOML file is optional. A missing file means defaults (builtin line
//! set, compiled-in asset root, no asset check); a file that exists but
//! cannot be parsed is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assets;
use crate::table::LineTable;
use crate::{Error, Result};

/// Environment variable naming the asset root (checked first)
pub const ENV_ASSET_ROOT: &str = "ROVER_ASSET_ROOT";
/// Alternative environment variable for the asset root
pub const ENV_ROOT: &str = "ROVER_ROOT";

/// Contents of `lines.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinesConfig {
    /// JSON artifact to load instead of the builtin line set
    #[serde(default)]
    pub artifact: Option<PathBuf>,

    /// Folder that entry file paths are relative to
    #[serde(default)]
    pub asset_root: Option<PathBuf>,

    /// Fail loading when any entry's file is missing under the asset root
    #[serde(default)]
    pub verify_assets: bool,
}

impl LinesConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_toml_str(&toml_str)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load `path`, or the platform config file when `path` is `None`
    ///
    /// Missing files degrade to defaults with a warning.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_file_path() {
                Some(p) => p,
                None => {
                    warn!("No lines.toml found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    /// Build the line table and resolve where its assets live
    ///
    /// `cli_asset_root` overrides every other asset root source.
    pub fn open_table(&self, cli_asset_root: Option<&Path>) -> Result<LoadedLines> {
        let table = match &self.artifact {
            Some(path) => LineTable::load_json(path)?,
            None => {
                info!("No artifact configured, using builtin line set");
                LineTable::builtin()
            }
        };

        let mismatches = table.naming_mismatches();
        if !mismatches.is_empty() {
            warn!(
                "{} grouped line(s) use clips named for another category",
                mismatches.len()
            );
        }

        let asset_root = AssetRootResolver::new(self)
            .with_cli(cli_asset_root)
            .resolve();

        if self.verify_assets {
            assets::verify(&table, &asset_root).into_result()?;
            info!("All {} assets present under {:?}", table.len(), asset_root);
        }

        Ok(LoadedLines { table, asset_root })
    }
}

/// A ready line table plus the folder its file paths are relative to
#[derive(Debug, Clone)]
pub struct LoadedLines {
    pub table: LineTable,
    pub asset_root: PathBuf,
}

/// Platform fallbacks used when nothing else is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub asset_root: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            asset_root: get_default_asset_root(),
        }
    }
}

/// Where a resolved asset root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    CommandLine,
    Environment,
    ConfigFile,
    CompiledDefault,
}

/// Asset root resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `ROVER_ASSET_ROOT`, then `ROVER_ROOT` environment variable
/// 3. `asset_root` from the TOML config
/// 4. OS-dependent compiled default (fallback)
#[derive(Debug, Clone, Default)]
pub struct AssetRootResolver {
    cli: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl AssetRootResolver {
    pub fn new(config: &LinesConfig) -> Self {
        Self {
            cli: None,
            config: config.asset_root.clone(),
        }
    }

    pub fn with_cli(mut self, cli: Option<&Path>) -> Self {
        self.cli = cli.map(Path::to_path_buf);
        self
    }

    pub fn resolve(&self) -> PathBuf {
        let (root, source) = self.resolve_with_source();
        info!("Asset root: {:?} (from {:?})", root, source);
        root
    }

    pub fn resolve_with_source(&self) -> (PathBuf, RootSource) {
        if let Some(path) = &self.cli {
            return (path.clone(), RootSource::CommandLine);
        }

        for var in [ENV_ASSET_ROOT, ENV_ROOT] {
            match std::env::var(var) {
                Ok(path) if !path.is_empty() => {
                    debug!("Asset root taken from {}", var);
                    return (PathBuf::from(path), RootSource::Environment);
                }
                _ => {}
            }
        }

        if let Some(path) = &self.config {
            return (path.clone(), RootSource::ConfigFile);
        }

        (get_default_asset_root(), RootSource::CompiledDefault)
    }
}

/// Platform configuration file, if one exists
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("rover").join("lines.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/rover/lines.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default asset root
fn get_default_asset_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("rover"))
        .unwrap_or_else(|| PathBuf::from("./rover_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = LinesConfig::from_toml_str("").unwrap();
        assert_eq!(config, LinesConfig::default());
        assert!(!config.verify_assets);
    }

    #[test]
    fn test_full_toml() {
        let config = LinesConfig::from_toml_str(
            r#"
            artifact = "/opt/rover/lines.json"
            asset_root = "/opt/rover"
            verify_assets = true
            "#,
        )
        .unwrap();

        assert_eq!(config.artifact, Some(PathBuf::from("/opt/rover/lines.json")));
        assert_eq!(config.asset_root, Some(PathBuf::from("/opt/rover")));
        assert!(config.verify_assets);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = LinesConfig::from_toml_str("volume = 3").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = LinesConfig {
            artifact: Some(PathBuf::from("lines.json")),
            asset_root: None,
            verify_assets: true,
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert_eq!(LinesConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = LinesConfig {
            asset_root: Some(PathBuf::from("/from/toml")),
            ..Default::default()
        };
        let (root, source) = AssetRootResolver::new(&config)
            .with_cli(Some(Path::new("/from/cli")))
            .resolve_with_source();
        assert_eq!(root, PathBuf::from("/from/cli"));
        assert_eq!(source, RootSource::CommandLine);
    }

    #[test]
    fn test_default_asset_root_not_empty() {
        let defaults = CompiledDefaults::for_current_platform();
        assert!(!defaults.asset_root.as_os_str().is_empty());
        assert!(defaults.asset_root.ends_with("rover") || defaults.asset_root.ends_with("rover_data"));
    }
}
