//! Output formatting for multiple formats
//!
//! Build reports and installation lists can be printed as JSON, YAML, or
//! human-readable text.

use anyhow::{Context, Result};

use crate::builder::{BuildReport, ComponentStatus};
use crate::maven::MavenInstallation;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &BuildReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize build report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize build report to YAML")
            }
            OutputFormat::Human => Ok(self.format_report_human(report)),
        }
    }

    pub fn format_installations(&self, installations: &[MavenInstallation]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(installations)
                .context("Failed to serialize installations to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(installations)
                .context("Failed to serialize installations to YAML"),
            OutputFormat::Human => Ok(self.format_installations_human(installations)),
        }
    }

    fn format_report_human(&self, report: &BuildReport) -> String {
        let mut output = String::new();

        if report.success {
            output.push_str("\u{2713} Sonar Build Step\n");
        } else {
            output.push_str("\u{2717} Sonar Build Step\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        match &report.maven {
            Some(maven) => output.push_str(&format!("Maven:       {}\n", maven)),
            None => output.push_str("Maven:       No maven installation found!\n"),
        }
        output.push_str(&format!(
            "Components:  {} analyzed, {} failed, {} skipped\n\n",
            report.analyzed(),
            report.failed_analyses(),
            report.render_failures()
        ));

        if !report.outcomes.is_empty() {
            output.push_str("Components:\n");
            for (i, outcome) in report.outcomes.iter().enumerate() {
                let connector = if i == report.outcomes.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                let status = match &outcome.status {
                    ComponentStatus::Analyzed { passed: true } => "passed".to_string(),
                    ComponentStatus::Analyzed { passed: false } => "FAILED".to_string(),
                    ComponentStatus::RenderFailed { reason } => format!("skipped ({})", reason),
                };
                output.push_str(&format!(
                    "{}\u{2500} {}: {}\n",
                    connector, outcome.component, status
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "Result:      {}\n",
            if report.success { "SUCCESS" } else { "FAILURE" }
        ));
        output
    }

    fn format_installations_human(&self, installations: &[MavenInstallation]) -> String {
        if installations.is_empty() {
            return "No maven installation found!\n".to_string();
        }

        let mut output = String::from("Maven Installations:\n");
        for (i, installation) in installations.iter().enumerate() {
            let marker = if i == 0 { " (used)" } else { "" };
            output.push_str(&format!(
                "  {}. {}  {}{}\n",
                i + 1,
                installation.name,
                installation.home.display(),
                marker
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ComponentOutcome;
    use std::path::PathBuf;

    fn sample_report() -> BuildReport {
        BuildReport {
            success: true,
            maven: Some("maven-3".to_string()),
            outcomes: vec![
                ComponentOutcome {
                    component: "example.org:app".to_string(),
                    pom: Some(PathBuf::from("/ws/_comp/sonar-pom.xml")),
                    status: ComponentStatus::Analyzed { passed: false },
                },
                ComponentOutcome {
                    component: "example.org:missing".to_string(),
                    pom: None,
                    status: ComponentStatus::RenderFailed {
                        reason: "not available".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_report_json() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_report(&sample_report())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["maven"], "maven-3");
        assert_eq!(value["outcomes"][0]["status"], "analyzed");
        assert_eq!(value["outcomes"][0]["passed"], false);
        assert!(value["outcomes"][1].get("pom").is_none());
    }

    #[test]
    fn test_report_yaml() {
        let output = OutputFormatter::new(OutputFormat::Yaml)
            .format_report(&sample_report())
            .unwrap();
        assert!(output.contains("success: true"));
        assert!(output.contains("status: render_failed"));
    }

    #[test]
    fn test_report_human() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.contains("Maven:       maven-3"));
        assert!(output.contains("1 analyzed, 1 failed, 1 skipped"));
        assert!(output.contains("example.org:app: FAILED"));
        assert!(output.contains("example.org:missing: skipped (not available)"));
        assert!(output.contains("Result:      SUCCESS"));
    }

    #[test]
    fn test_report_human_without_maven() {
        let report = BuildReport {
            success: true,
            maven: None,
            outcomes: vec![],
        };
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_report(&report)
            .unwrap();
        assert!(output.contains("No maven installation found!"));
    }

    #[test]
    fn test_installations_human() {
        let installations = vec![
            MavenInstallation::new("maven-3", "/opt/maven"),
            MavenInstallation::new("MAVEN_HOME", "/usr/share/maven"),
        ];
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_installations(&installations)
            .unwrap();

        assert!(output.contains("1. maven-3  /opt/maven (used)"));
        assert!(output.contains("2. MAVEN_HOME  /usr/share/maven\n"));
    }

    #[test]
    fn test_installations_json() {
        let installations = vec![MavenInstallation::new("maven-3", "/opt/maven")];
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_installations(&installations)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "maven-3");
        assert_eq!(value[0]["home"], "/opt/maven");
    }
}
