//! Sonar POM generation
//!
//! Renders a Maven project descriptor that lets `mvn sonar:sonar` analyze a
//! development component in place: the component's source folders are added
//! through `build-helper-maven-plugin` in the phase named by `sonar.phase`, so
//! they are registered before the analysis starts. The compiled classes directory becomes
//! the project's output directory, and the Sonar plugin is declared with an
//! execution of its `sonar` goal.
//!
//! Output is deterministic. Rendering the same component twice with the same
//! source folders on disk yields identical bytes.

mod xml;

use crate::dc::DevelopmentComponent;
use crate::fs::FileSystem;
use crate::paths::ComponentPaths;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use xml::escape;

pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";
pub const DEFAULT_SONAR_PLUGIN_VERSION: &str = "2.0";
pub const DEFAULT_BUILD_HELPER_VERSION: &str = "1.7";

/// Phase `add-source` is bound to; `sonar.phase` makes `mvn sonar:sonar` run it first.
const SOURCES_PHASE: &str = "generate-sources";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not create {path}: {message}")]
    Create { path: PathBuf, message: String },

    #[error("Could not write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Path {path:?} is not valid UTF-8")]
    NonUtf8Path { path: PathBuf },
}

/// Values placed into every generated POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomSettings {
    pub project_version: String,
    pub sonar_plugin_version: String,
    pub build_helper_version: String,
}

impl Default for PomSettings {
    fn default() -> Self {
        Self {
            project_version: DEFAULT_PROJECT_VERSION.to_string(),
            sonar_plugin_version: DEFAULT_SONAR_PLUGIN_VERSION.to_string(),
            build_helper_version: DEFAULT_BUILD_HELPER_VERSION.to_string(),
        }
    }
}

pub struct PomGenerator<'a> {
    settings: &'a PomSettings,
    fs: &'a dyn FileSystem,
}

impl<'a> PomGenerator<'a> {
    pub fn new(settings: &'a PomSettings, fs: &'a dyn FileSystem) -> Self {
        Self { settings, fs }
    }

    /// Renders the component's POM and writes it to `paths.pom`.
    ///
    /// The document is rendered completely before the file is touched, so a
    /// rendering error leaves an existing POM in place.
    pub fn write_pom(
        &self,
        component: &DevelopmentComponent,
        paths: &ComponentPaths,
    ) -> Result<(), RenderError> {
        let pom = self.render_to_string(component, paths)?;

        let mut writer = self
            .fs
            .create(&paths.pom)
            .map_err(|e| RenderError::Create {
                path: paths.pom.clone(),
                message: format!("{:#}", e),
            })?;

        writer
            .write_all(pom.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| RenderError::Io {
                path: paths.pom.clone(),
                source,
            })
    }

    /// Writes the POM for `component` to `out`.
    ///
    /// Source roots that do not exist are left out. Paths that are not valid
    /// UTF-8 are rejected before anything is written.
    pub fn render(
        &self,
        component: &DevelopmentComponent,
        paths: &ComponentPaths,
        out: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let output_dir = utf8(&paths.output_dir)?;
        let sources = self
            .existing_source_roots(paths)
            .into_iter()
            .map(utf8)
            .collect::<Result<Vec<_>, _>>()?;

        self.render_document(component, output_dir, &sources, out)
            .map_err(|source| RenderError::Io {
                path: paths.pom.clone(),
                source,
            })
    }

    pub fn render_to_string(
        &self,
        component: &DevelopmentComponent,
        paths: &ComponentPaths,
    ) -> Result<String, RenderError> {
        let mut buffer = Vec::new();
        self.render(component, paths, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| RenderError::Io {
            path: paths.pom.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    fn existing_source_roots<'p>(&self, paths: &'p ComponentPaths) -> Vec<&'p Path> {
        paths
            .source_roots
            .iter()
            .filter(|root| {
                let exists = self.fs.is_dir(root);
                if !exists {
                    debug!(source_root = %root.display(), "Skipping missing source folder");
                }
                exists
            })
            .map(PathBuf::as_path)
            .collect()
    }

    fn render_document(
        &self,
        component: &DevelopmentComponent,
        output_dir: &str,
        sources: &[&str],
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let settings = self.settings;

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">"#
        )?;
        writeln!(out, "  <modelVersion>4.0.0</modelVersion>")?;
        writeln!(out, "  <groupId>{}</groupId>", escape(&component.vendor))?;
        writeln!(
            out,
            "  <artifactId>{}</artifactId>",
            escape(&component.artifact_id())
        )?;
        writeln!(
            out,
            "  <version>{}</version>",
            escape(&settings.project_version)
        )?;
        writeln!(out, "  <packaging>jar</packaging>")?;
        writeln!(out, "  <name>{}</name>", escape(&component.coordinates()))?;

        writeln!(out, "  <properties>")?;
        writeln!(
            out,
            "    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>"
        )?;
        writeln!(out, "    <sonar.language>java</sonar.language>")?;
        writeln!(out, "    <sonar.dynamicAnalysis>false</sonar.dynamicAnalysis>")?;
        writeln!(out, "    <sonar.phase>{}</sonar.phase>", SOURCES_PHASE)?;
        writeln!(out, "  </properties>")?;

        writeln!(out, "  <build>")?;
        writeln!(
            out,
            "    <outputDirectory>{}</outputDirectory>",
            escape(output_dir)
        )?;
        writeln!(out, "    <plugins>")?;

        writeln!(out, "      <plugin>")?;
        writeln!(out, "        <groupId>org.codehaus.mojo</groupId>")?;
        writeln!(
            out,
            "        <artifactId>build-helper-maven-plugin</artifactId>"
        )?;
        writeln!(
            out,
            "        <version>{}</version>",
            escape(&settings.build_helper_version)
        )?;
        writeln!(out, "        <executions>")?;
        writeln!(out, "          <execution>")?;
        writeln!(out, "            <id>add-nwdi-sources</id>")?;
        writeln!(out, "            <phase>{}</phase>", SOURCES_PHASE)?;
        writeln!(out, "            <goals>")?;
        writeln!(out, "              <goal>add-source</goal>")?;
        writeln!(out, "            </goals>")?;
        writeln!(out, "            <configuration>")?;
        writeln!(out, "              <sources>")?;
        for source in sources {
            writeln!(out, "                <source>{}</source>", escape(source))?;
        }
        writeln!(out, "              </sources>")?;
        writeln!(out, "            </configuration>")?;
        writeln!(out, "          </execution>")?;
        writeln!(out, "        </executions>")?;
        writeln!(out, "      </plugin>")?;

        writeln!(out, "      <plugin>")?;
        writeln!(out, "        <groupId>org.codehaus.mojo</groupId>")?;
        writeln!(out, "        <artifactId>sonar-maven-plugin</artifactId>")?;
        writeln!(
            out,
            "        <version>{}</version>",
            escape(&settings.sonar_plugin_version)
        )?;
        writeln!(out, "        <executions>")?;
        writeln!(out, "          <execution>")?;
        writeln!(out, "            <id>sonar</id>")?;
        writeln!(out, "            <goals>")?;
        writeln!(out, "              <goal>sonar</goal>")?;
        writeln!(out, "            </goals>")?;
        writeln!(out, "          </execution>")?;
        writeln!(out, "        </executions>")?;
        writeln!(out, "      </plugin>")?;

        writeln!(out, "    </plugins>")?;
        writeln!(out, "  </build>")?;
        writeln!(out, "</project>")?;
        Ok(())
    }
}

fn utf8(path: &Path) -> Result<&str, RenderError> {
    path.to_str().ok_or_else(|| RenderError::NonUtf8Path {
        path: path.to_path_buf(),
    })
}
