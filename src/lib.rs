//! nwdi-sonar - Sonar analysis build step for NetWeaver development components
//!
//! For every affected development component (DC) that carries Java source,
//! the build step writes a Maven POM (`sonar-pom.xml`) into the component's
//! base location and runs Maven against it with the Sonar goal.
//!
//! # Core Concepts
//!
//! - **Development component**: a unit of the NWDI workspace, identified by
//!   vendor and name, whose sources live under `.dtc/DCs/<vendor>/<name>/_comp`
//! - **Component filter**: selects the components the step works on; the
//!   default accepts every Java-bearing component type
//! - **Maven installation**: a named Maven home; the first discovered one runs
//!   the analysis
//!
//! # Example Usage
//!
//! ```no_run
//! use nwdi_sonar::{
//!     discover_installations, ComponentRegistry, JavaSourceFilter, ProcessInvoker,
//!     RealFileSystem, SonarBuilder, SonarConfig,
//! };
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = SonarConfig::load(None)?;
//! let registry = ComponentRegistry::load(Path::new("components.yaml"))?;
//! let components = registry.affected_components(&JavaSourceFilter);
//! let installations = discover_installations(&config.installations);
//!
//! let report = SonarBuilder::new(&config, &RealFileSystem)
//!     .perform(&components, &installations, &ProcessInvoker);
//! println!("success: {}", report.success);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`dc`]: development component model, filters and the component manifest
//! - [`paths`]: base location and source root resolution
//! - [`pom`]: POM rendering
//! - [`maven`]: installation discovery and process invocation
//! - [`builder`]: the build step itself

pub mod builder;
pub mod cli;
pub mod config;
pub mod dc;
pub mod fs;
pub mod maven;
pub mod paths;
pub mod pom;
pub mod util;

pub use builder::{BuildReport, ComponentOutcome, ComponentStatus, SonarBuilder};
pub use config::{ConfigError, SonarConfig};
pub use dc::{
    ComponentFilter, ComponentRegistry, ComponentType, DevelopmentComponent, JavaSourceFilter,
    RegistryError,
};
pub use fs::{FileSystem, RealFileSystem};
pub use maven::{discover_installations, MavenInstallation, MavenInvoker, MavenRequest, ProcessInvoker};
pub use paths::{ComponentPaths, ResolveError};
pub use pom::{PomGenerator, PomSettings, RenderError};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
