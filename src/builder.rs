//! Sonar build step
//!
//! For every affected development component carrying Java source, the step
//! writes `sonar-pom.xml` into the component's base location and runs
//! `mvn sonar:sonar` against it. Components are handled one after another. A
//! component whose POM cannot be written is logged and skipped; the rest are
//! still analyzed.
//!
//! The overall result starts out `true` and every Maven outcome is OR-ed into
//! it, so the step reports success even when a Maven run fails.

use crate::config::SonarConfig;
use crate::dc::DevelopmentComponent;
use crate::fs::FileSystem;
use crate::maven::{MavenInstallation, MavenInvoker, MavenRequest};
use crate::paths::{base_location, ComponentPaths, POM_FILE_NAME};
use crate::pom::PomGenerator;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Target for warnings emitted by the build step.
pub const LOG_TARGET: &str = "nwdi_sonar::builder";

/// What happened to one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Maven ran; `passed` is its outcome
    Analyzed { passed: bool },
    /// The POM could not be produced, Maven was not run
    RenderFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentOutcome {
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pom: Option<PathBuf>,
    #[serde(flatten)]
    pub status: ComponentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Aggregated result of the step
    pub success: bool,
    /// Installation used, if one was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maven: Option<String>,
    pub outcomes: Vec<ComponentOutcome>,
}

impl BuildReport {
    pub fn analyzed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ComponentStatus::Analyzed { .. }))
            .count()
    }

    pub fn failed_analyses(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ComponentStatus::Analyzed { passed: false }))
            .count()
    }

    pub fn render_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ComponentStatus::RenderFailed { .. }))
            .count()
    }
}

pub struct SonarBuilder<'a> {
    config: &'a SonarConfig,
    fs: &'a dyn FileSystem,
}

impl<'a> SonarBuilder<'a> {
    pub fn new(config: &'a SonarConfig, fs: &'a dyn FileSystem) -> Self {
        Self { config, fs }
    }

    /// Runs the step over `components` using the first of `installations`.
    pub fn perform(
        &self,
        components: &[&DevelopmentComponent],
        installations: &[MavenInstallation],
        invoker: &dyn MavenInvoker,
    ) -> BuildReport {
        let mut result = true;

        let Some(maven) = installations.first() else {
            info!("No maven installation found!");
            return BuildReport {
                success: result,
                maven: None,
                outcomes: Vec::new(),
            };
        };

        let settings = self.config.pom_settings();
        let generator = PomGenerator::new(&settings, self.fs);
        let mut outcomes = Vec::with_capacity(components.len());

        for component in components {
            let outcome = self.process(component, &generator, maven, invoker);
            if let ComponentStatus::Analyzed { passed } = outcome.status {
                result |= passed;
            }
            outcomes.push(outcome);
        }

        info!(
            components = outcomes.len(),
            success = result,
            "Sonar build step finished"
        );

        BuildReport {
            success: result,
            maven: Some(maven.name.clone()),
            outcomes,
        }
    }

    fn process(
        &self,
        component: &DevelopmentComponent,
        generator: &PomGenerator<'_>,
        maven: &MavenInstallation,
        invoker: &dyn MavenInvoker,
    ) -> ComponentOutcome {
        let coordinates = component.coordinates();

        let paths = match ComponentPaths::resolve(&self.config.workspace, component, self.fs) {
            Ok(paths) => paths,
            Err(e) => {
                let pom = base_location(&self.config.workspace, component)
                    .map(|base| base.join(POM_FILE_NAME).display().to_string())
                    .unwrap_or_else(|_| POM_FILE_NAME.to_string());
                warn!(
                    target: LOG_TARGET,
                    component = %coordinates,
                    pom = %pom,
                    "Could not create {}:\n{}",
                    pom,
                    e
                );
                return ComponentOutcome {
                    component: coordinates,
                    pom: None,
                    status: ComponentStatus::RenderFailed {
                        reason: e.to_string(),
                    },
                };
            }
        };

        if let Err(e) = generator.write_pom(component, &paths) {
            warn!(
                target: LOG_TARGET,
                component = %coordinates,
                pom = %paths.pom.display(),
                "Could not create {}:\n{}",
                paths.pom.display(),
                e
            );
            return ComponentOutcome {
                component: coordinates,
                pom: Some(paths.pom),
                status: ComponentStatus::RenderFailed {
                    reason: e.to_string(),
                },
            };
        }

        let request = self.request_for(paths.pom.clone());
        let passed = invoker.invoke(maven, &request);

        ComponentOutcome {
            component: coordinates,
            pom: Some(paths.pom),
            status: ComponentStatus::Analyzed { passed },
        }
    }

    fn request_for(&self, pom: PathBuf) -> MavenRequest {
        MavenRequest::sonar(pom)
            .with_goal(self.config.goal.clone())
            .with_properties(self.config.properties.clone())
            .with_jvm_options(self.config.jvm_options.clone())
    }
}
