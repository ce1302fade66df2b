use super::{MavenInstallation, SONAR_GOAL};
use crate::paths::make_absolute;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use tracing::{info, warn};

/// One Maven run against a POM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenRequest {
    pub goal: String,
    pub pom: PathBuf,
    /// Passed as `-Dkey=value`
    pub properties: BTreeMap<String, String>,
    /// Exported as `MAVEN_OPTS` when not empty
    pub jvm_options: String,
}

impl MavenRequest {
    /// `sonar:sonar` against `pom`, with no properties and no JVM options.
    pub fn sonar(pom: impl Into<PathBuf>) -> Self {
        Self {
            goal: SONAR_GOAL.to_string(),
            pom: pom.into(),
            properties: BTreeMap::new(),
            jvm_options: String::new(),
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_jvm_options(mut self, jvm_options: impl Into<String>) -> Self {
        self.jvm_options = jvm_options.into();
        self
    }

    /// Command line arguments following the `mvn` executable.
    pub fn arguments(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-f".into(), self.pom.clone().into_os_string()];
        for (key, value) in &self.properties {
            args.push(format!("-D{}={}", key, value).into());
        }
        args.extend(self.goal.split_whitespace().map(OsString::from));
        args
    }
}

/// Runs Maven. Returns whether the run succeeded.
pub trait MavenInvoker {
    fn invoke(&self, installation: &MavenInstallation, request: &MavenRequest) -> bool;
}

/// Spawns the installation's `mvn` launcher and waits for it.
///
/// Output goes straight to the parent's stdout/stderr. No timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    /// Builds the `mvn` command. A relative POM path is resolved against the
    /// current directory before the working directory moves to the POM's folder.
    pub fn command(installation: &MavenInstallation, request: &MavenRequest) -> Command {
        let mut cmd = Command::new(installation.executable());
        let pom = match make_absolute(&request.pom) {
            Ok(pom) => pom,
            Err(e) => {
                warn!(pom = %request.pom.display(), error = %e, "Could not resolve POM path");
                request.pom.clone()
            }
        };
        let request = MavenRequest {
            pom,
            ..request.clone()
        };

        cmd.args(request.arguments());
        if let Some(dir) = request.pom.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }
        if !request.jvm_options.trim().is_empty() {
            cmd.env("MAVEN_OPTS", request.jvm_options.trim());
        }
        cmd
    }
}

impl MavenInvoker for ProcessInvoker {
    fn invoke(&self, installation: &MavenInstallation, request: &MavenRequest) -> bool {
        info!(
            maven = %installation.name,
            pom = %request.pom.display(),
            goal = %request.goal,
            "Running Maven"
        );

        match Self::command(installation, request).status() {
            Ok(status) if status.success() => true,
            Ok(status) => {
                warn!(
                    pom = %request.pom.display(),
                    status = %status,
                    "Maven run failed"
                );
                false
            }
            Err(e) => {
                warn!(
                    executable = %installation.executable().display(),
                    error = %e,
                    "Could not start Maven"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_sonar_request_defaults() {
        let request = MavenRequest::sonar("/ws/_comp/sonar-pom.xml");

        assert_eq!(request.goal, "sonar:sonar");
        assert!(request.properties.is_empty());
        assert!(request.jvm_options.is_empty());
        assert_eq!(
            request.arguments(),
            vec![
                OsString::from("-f"),
                OsString::from("/ws/_comp/sonar-pom.xml"),
                OsString::from("sonar:sonar"),
            ]
        );
    }

    #[test]
    fn test_arguments_with_properties() {
        let mut properties = BTreeMap::new();
        properties.insert("sonar.host.url".to_string(), "http://sonar:9000".to_string());
        properties.insert("sonar.branch".to_string(), "main".to_string());

        let request = MavenRequest::sonar("/ws/pom.xml")
            .with_goal("-B sonar:sonar")
            .with_properties(properties);

        assert_eq!(
            request.arguments(),
            vec![
                OsString::from("-f"),
                OsString::from("/ws/pom.xml"),
                OsString::from("-Dsonar.branch=main"),
                OsString::from("-Dsonar.host.url=http://sonar:9000"),
                OsString::from("-B"),
                OsString::from("sonar:sonar"),
            ]
        );
    }

    #[test]
    fn test_command_sets_maven_opts() {
        let maven = MavenInstallation::new("maven-3", "/opt/maven");
        let request = MavenRequest::sonar("/ws/_comp/sonar-pom.xml").with_jvm_options("-Xmx1g");

        let cmd = ProcessInvoker::command(&maven, &request);
        let maven_opts = cmd
            .get_envs()
            .find(|(key, _)| *key == "MAVEN_OPTS")
            .and_then(|(_, value)| value);

        assert_eq!(maven_opts, Some(std::ffi::OsStr::new("-Xmx1g")));
        assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/ws/_comp")));
    }

    #[test]
    fn test_command_with_relative_pom_points_at_the_same_file() {
        let maven = MavenInstallation::new("maven-3", "/opt/maven");
        let request = MavenRequest::sonar("./ws/_comp/sonar-pom.xml");

        let cmd = ProcessInvoker::command(&maven, &request);
        let cwd = std::env::current_dir().unwrap();
        let args: Vec<_> = cmd.get_args().collect();

        assert_eq!(args[0], "-f");
        assert_eq!(
            std::path::Path::new(args[1]),
            cwd.join("ws/_comp/sonar-pom.xml")
        );
        assert_eq!(cmd.get_current_dir(), Some(cwd.join("ws/_comp").as_path()));
    }

    #[test]
    fn test_command_without_jvm_options_leaves_env_alone() {
        let maven = MavenInstallation::new("maven-3", "/opt/maven");
        let cmd = ProcessInvoker::command(&maven, &MavenRequest::sonar("/ws/pom.xml"));
        assert_eq!(cmd.get_envs().count(), 0);
    }

    #[test]
    #[serial]
    fn test_missing_executable_is_a_failed_run() {
        let maven = MavenInstallation::new("missing", "/nonexistent/maven");
        let request = MavenRequest::sonar("/nonexistent/pom.xml");

        assert!(!ProcessInvoker.invoke(&maven, &request));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn fake_maven(dir: &TempDir, exit_code: i32) -> MavenInstallation {
            let bin = dir.path().join("maven/bin");
            fs::create_dir_all(&bin).unwrap();
            let script = bin.join("mvn");
            fs::write(
                &script,
                format!(
                    "#!/bin/sh\necho \"$@\" > \"{}\"\nexit {}\n",
                    dir.path().join("args.txt").display(),
                    exit_code
                ),
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            MavenInstallation::new("fake", dir.path().join("maven"))
        }

        #[test]
        #[serial]
        fn test_successful_run() {
            let dir = TempDir::new().unwrap();
            let maven = fake_maven(&dir, 0);
            let pom = dir.path().join("sonar-pom.xml");
            fs::write(&pom, "<project/>").unwrap();

            assert!(ProcessInvoker.invoke(&maven, &MavenRequest::sonar(&pom)));

            let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
            assert_eq!(args.trim(), format!("-f {} sonar:sonar", pom.display()));
        }

        #[test]
        #[serial]
        fn test_failing_run() {
            let dir = TempDir::new().unwrap();
            let maven = fake_maven(&dir, 1);
            let pom = dir.path().join("sonar-pom.xml");
            fs::write(&pom, "<project/>").unwrap();

            assert!(!ProcessInvoker.invoke(&maven, &MavenRequest::sonar(&pom)));
        }
    }
}
