//! Configuration management for nwdi-sonar
//!
//! Settings are resolved in three layers: built-in defaults, then environment
//! variables, then an optional YAML configuration file. Command line flags are
//! applied on top by the CLI.
//!
//! # Environment Variables
//!
//! - `NWDI_SONAR_WORKSPACE`: NWDI workspace root - default: "."
//! - `NWDI_SONAR_GOAL`: Maven goal - default: "sonar:sonar"
//! - `NWDI_SONAR_JVM_OPTIONS`: exported as `MAVEN_OPTS` - default: empty
//! - `NWDI_SONAR_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Configuration File
//!
//! ```yaml
//! workspace: /var/nwdi/workspace
//! installations:
//!   - name: maven-3
//!     home: /opt/maven
//! properties:
//!   sonar.host.url: http://sonar:9000
//! ```
//!
//! Without `--config`, `<config dir>/nwdi-sonar/config.yaml` is used when it exists.

use crate::maven::{MavenInstallation, SONAR_GOAL};
use crate::pom::{
    PomSettings, DEFAULT_BUILD_HELPER_VERSION, DEFAULT_PROJECT_VERSION,
    DEFAULT_SONAR_PLUGIN_VERSION,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_WORKSPACE: &str = ".";
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML for this schema
    #[error("Failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Settings of the Sonar build step.
///
/// Passed explicitly to [`crate::builder::SonarBuilder`]; nothing reads it
/// from global state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SonarConfig {
    /// NWDI workspace root containing the `.dtc` directory
    pub workspace: PathBuf,

    /// Maven installations in order of preference
    pub installations: Vec<MavenInstallation>,

    /// Goal passed to Maven
    pub goal: String,

    /// Additional `-D` properties
    pub properties: BTreeMap<String, String>,

    /// JVM options for the Maven process
    pub jvm_options: String,

    pub project_version: String,
    pub sonar_plugin_version: String,
    pub build_helper_version: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for SonarConfig {
    /// Reads `NWDI_SONAR_*` environment variables, falling back to defaults.
    fn default() -> Self {
        let workspace = env::var("NWDI_SONAR_WORKSPACE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORKSPACE));

        let goal = env::var("NWDI_SONAR_GOAL")
            .ok()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| SONAR_GOAL.to_string());

        let jvm_options = env::var("NWDI_SONAR_JVM_OPTIONS").unwrap_or_default();

        let log_level = env::var("NWDI_SONAR_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            workspace,
            installations: Vec::new(),
            goal,
            properties: BTreeMap::new(),
            jvm_options,
            project_version: DEFAULT_PROJECT_VERSION.to_string(),
            sonar_plugin_version: DEFAULT_SONAR_PLUGIN_VERSION.to_string(),
            build_helper_version: DEFAULT_BUILD_HELPER_VERSION.to_string(),
            log_level,
        }
    }
}

impl SonarConfig {
    /// Reads a YAML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Loads `explicit` if given, else the per-user file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/nwdi-sonar/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nwdi-sonar").join(CONFIG_FILE_NAME))
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for an empty goal, an unknown log
    /// level, or an installation without a name or home.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Maven goal must not be empty".to_string(),
            ));
        }

        for installation in &self.installations {
            if installation.name.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Maven installation names must not be empty".to_string(),
                ));
            }
            if installation.home.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Maven installation '{}' has no home directory",
                    installation.name
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn pom_settings(&self) -> PomSettings {
        PomSettings {
            project_version: self.project_version.clone(),
            sonar_plugin_version: self.sonar_plugin_version.clone(),
            build_helper_version: self.build_helper_version.clone(),
        }
    }
}

impl fmt::Display for SonarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nwdi-sonar Configuration:")?;
        writeln!(f, "  Workspace: {}", self.workspace.display())?;
        writeln!(f, "  Goal: {}", self.goal)?;
        if !self.jvm_options.is_empty() {
            writeln!(f, "  JVM Options: {}", self.jvm_options)?;
        }
        for (key, value) in &self.properties {
            writeln!(f, "  Property: {}={}", key, value)?;
        }
        for installation in &self.installations {
            writeln!(
                f,
                "  Maven: {} ({})",
                installation.name,
                installation.home.display()
            )?;
        }
        writeln!(f, "  Sonar Plugin: {}", self.sonar_plugin_version)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
