//! Command handlers
//!
//! Each handler returns the process exit code: `0` on success, `1` when the
//! build step reports failure, `2` on usage or I/O errors.

use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error};

use super::commands::{InstallationsArgs, RenderArgs, RunArgs};
use super::output::OutputFormatter;
use crate::builder::SonarBuilder;
use crate::config::SonarConfig;
use crate::dc::{ComponentRegistry, JavaSourceFilter};
use crate::fs::RealFileSystem;
use crate::maven::{discover_installations, ProcessInvoker};
use crate::paths::{make_absolute, ComponentPaths};
use crate::pom::PomGenerator;

const EXIT_FAILURE: i32 = 1;
const EXIT_ERROR: i32 = 2;

pub fn handle_run(args: &RunArgs, config: SonarConfig, quiet: bool) -> i32 {
    match run(args, config, quiet) {
        Ok(true) => 0,
        Ok(false) => EXIT_FAILURE,
        Err(e) => report_error(e),
    }
}

pub fn handle_render(args: &RenderArgs, config: SonarConfig) -> i32 {
    match render(args, config) {
        Ok(()) => 0,
        Err(e) => report_error(e),
    }
}

pub fn handle_installations(args: &InstallationsArgs, config: SonarConfig) -> i32 {
    let installations = discover_installations(&config.installations);
    match OutputFormatter::new(args.format.into()).format_installations(&installations) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => report_error(e),
    }
}

fn report_error(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    eprintln!("Error: {:#}", e);
    EXIT_ERROR
}

fn prepare(mut config: SonarConfig, workspace: Option<&Path>) -> Result<SonarConfig> {
    if let Some(workspace) = workspace {
        config.workspace = workspace.to_path_buf();
    }
    config.workspace = make_absolute(&config.workspace)
        .with_context(|| format!("Failed to resolve workspace {:?}", config.workspace))?;
    config.validate()?;
    debug!("{}", config);
    Ok(config)
}

fn run(args: &RunArgs, config: SonarConfig, quiet: bool) -> Result<bool> {
    let config = prepare(config, args.workspace.as_deref())?;

    let registry = ComponentRegistry::load(&args.components)?;
    let components = registry.affected_components(&JavaSourceFilter);
    debug!(
        total = registry.len(),
        affected = components.len(),
        "Selected components with Java source"
    );

    let installations = discover_installations(&config.installations);
    let fs = RealFileSystem::new();
    let report = SonarBuilder::new(&config, &fs).perform(&components, &installations, &ProcessInvoker);

    if !quiet {
        let output = OutputFormatter::new(args.format.into()).format_report(&report)?;
        print!("{}", output);
    }

    Ok(report.success)
}

fn render(args: &RenderArgs, config: SonarConfig) -> Result<()> {
    let config = prepare(config, args.workspace.as_deref())?;

    let registry = ComponentRegistry::load(&args.components)?;
    let component = registry
        .find(&args.component)
        .ok_or_else(|| anyhow!("Unknown component: {}", args.component))?;

    let fs = RealFileSystem::new();
    let paths = ComponentPaths::resolve(&config.workspace, component, &fs)?;
    let settings = config.pom_settings();
    let pom = PomGenerator::new(&settings, &fs).render_to_string(component, &paths)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, pom).with_context(|| format!("Failed to write {:?}", path))?;
        }
        None => {
            io::stdout()
                .write_all(pom.as_bytes())
                .context("Failed to write POM to stdout")?;
        }
    }
    Ok(())
}
