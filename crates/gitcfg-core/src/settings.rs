//! Tool settings with layered loading
//!
//! Settings are merged from, in order:
//! 1. Built-in defaults
//! 2. The global file (`<config_dir>/gitcfg/config.toml`)
//! 3. An explicit settings file
//! 4. Environment variables (`GITCFG_TIMEOUT`, `GITCFG_FORMAT`)
//!
//! Command-line flags are applied on top by the caller.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::category::{BundleDefinition, CategoryDefinition, CategoryRegistry};
use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const MIN_TIMEOUT_SECS: f64 = 0.1;

pub const TIMEOUT_ENV: &str = "GITCFG_TIMEOUT";
pub const FORMAT_ENV: &str = "GITCFG_FORMAT";

/// How snapshots are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected pretty or json)")),
        }
    }
}

/// Effective tool settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Store command timeout in seconds
    pub timeout_secs: f64,
    pub format: OutputFormat,
    /// Categories appended after the built-ins
    pub categories: Vec<CategoryDefinition>,
    /// Bundles appended after the built-ins
    pub bundles: Vec<BundleDefinition>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            format: OutputFormat::default(),
            categories: Vec::new(),
            bundles: Vec::new(),
        }
    }
}

impl Settings {
    /// The timeout as a duration; an out-of-range value set directly on the
    /// field falls back to the default.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs)
            .unwrap_or(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }

    /// Override the timeout, enforcing the minimum.
    pub fn set_timeout(&mut self, secs: f64, source: impl Into<PathBuf>) -> Result<()> {
        self.timeout_secs = checked_timeout(secs, source.into())?;
        Ok(())
    }

    /// Built-in categories and bundles extended with user definitions.
    pub fn registry(&self) -> Result<CategoryRegistry> {
        CategoryRegistry::with_extensions(self.categories.clone(), self.bundles.clone())
    }

    fn merge(&mut self, layer: SettingsFile, source: &Path) -> Result<()> {
        if let Some(secs) = layer.timeout_secs {
            self.set_timeout(secs, source)?;
        }
        if let Some(format) = layer.output.and_then(|output| output.format) {
            self.format = format;
        }
        self.categories.extend(layer.categories);
        self.bundles.extend(layer.bundles);
        Ok(())
    }
}

/// On-disk shape of a settings file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    timeout_secs: Option<f64>,
    output: Option<OutputSection>,
    #[serde(default)]
    categories: Vec<CategoryDefinition>,
    #[serde(default)]
    bundles: Vec<BundleDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    format: Option<OutputFormat>,
}

/// Loads [`Settings`] from every layer.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    /// Override for the global config directory (used for testing)
    config_dir_override: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
    /// Replaces the process environment when set (used for testing)
    env_override: Option<HashMap<String, String>>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `dir` in place of `<config_dir>/gitcfg`.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir_override = Some(dir.into());
        self
    }

    /// Add an explicit settings file; it must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Read environment variables from `vars` instead of the process.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_override = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|dir| dir.join("gitcfg"))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        match &self.env_override {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Merge all layers into effective settings.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(dir) = self.config_dir() {
            let path = dir.join("config.toml");
            if path.is_file() {
                tracing::debug!(?path, "Loading global settings");
                settings.merge(read_file(&path)?, &path)?;
            } else {
                tracing::debug!(?path, "No global settings found, skipping");
            }
        }

        if let Some(ref path) = self.explicit_file {
            if !path.is_file() {
                return Err(Error::Settings {
                    path: path.clone(),
                    message: "file does not exist".to_string(),
                });
            }
            tracing::debug!(?path, "Loading explicit settings");
            settings.merge(read_file(path)?, path)?;
        }

        if let Some(raw) = self.env_var(TIMEOUT_ENV) {
            let secs: f64 = raw.trim().parse().map_err(|_| Error::Settings {
                path: PathBuf::from(TIMEOUT_ENV),
                message: format!("'{raw}' is not a number of seconds"),
            })?;
            settings.set_timeout(secs, TIMEOUT_ENV)?;
        }
        if let Some(raw) = self.env_var(FORMAT_ENV) {
            settings.format = raw.parse().map_err(|message| Error::Settings {
                path: PathBuf::from(FORMAT_ENV),
                message,
            })?;
        }

        Ok(settings)
    }
}

fn read_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| Error::Settings {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn checked_timeout(secs: f64, source: PathBuf) -> Result<f64> {
    if !secs.is_finite() || secs < MIN_TIMEOUT_SECS {
        return Err(Error::Settings {
            path: source,
            message: format!("timeout must be at least {MIN_TIMEOUT_SECS} seconds, got {secs}"),
        });
    }
    Duration::try_from_secs_f64(secs).map_err(|e| Error::Settings {
        path: source,
        message: format!("timeout of {secs} seconds is out of range: {e}"),
    })?;
    Ok(secs)
}
