//! External Maven: installation discovery and invocation

mod installation;
mod invoker;

pub use installation::{discover_installations, discover_with, MavenInstallation};
pub use invoker::{MavenInvoker, MavenRequest, ProcessInvoker};

/// Goal run against every generated POM.
pub const SONAR_GOAL: &str = "sonar:sonar";
