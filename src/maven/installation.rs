use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// A named Maven home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenInstallation {
    pub name: String,
    pub home: PathBuf,
}

impl MavenInstallation {
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
        }
    }

    /// Launcher script inside the installation.
    pub fn executable(&self) -> PathBuf {
        let launcher = if cfg!(windows) { "mvn.cmd" } else { "mvn" };
        self.home.join("bin").join(launcher)
    }
}

const HOME_VARIABLES: &[&str] = &["MAVEN_HOME", "M2_HOME"];

/// Configured installations first, then `MAVEN_HOME` and `M2_HOME` from the
/// process environment.
pub fn discover_installations(configured: &[MavenInstallation]) -> Vec<MavenInstallation> {
    discover_with(configured, |key| env::var(key).ok())
}

/// Same as [`discover_installations`], reading variables through `lookup`.
pub fn discover_with<F>(configured: &[MavenInstallation], lookup: F) -> Vec<MavenInstallation>
where
    F: Fn(&str) -> Option<String>,
{
    let mut installations: Vec<MavenInstallation> = Vec::new();

    let candidates = configured.iter().cloned().chain(
        HOME_VARIABLES
            .iter()
            .filter_map(|key| {
                lookup(*key)
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| MavenInstallation::new(*key, value.trim()))
            }),
    );

    for candidate in candidates {
        if installations.iter().any(|known| known.home == candidate.home) {
            debug!(name = %candidate.name, home = %candidate.home.display(), "Skipping duplicate Maven installation");
            continue;
        }
        installations.push(candidate);
    }

    installations
}
