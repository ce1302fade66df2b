//! Build-path layout of development components
//!
//! A component synced into an NWDI workspace lives at
//! `<workspace>/.dtc/DCs/<vendor>/<name>/_comp`. Everything generated for the
//! Sonar run, the POM included, is placed below that directory.

use crate::dc::DevelopmentComponent;
use crate::fs::FileSystem;
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name of the generated POM inside a component's base location.
pub const POM_FILE_NAME: &str = "sonar-pom.xml";

const DTC_DIR: &str = ".dtc";
const DCS_DIR: &str = "DCs";
const COMP_DIR: &str = "_comp";
const DEFAULT_CLASSES_DIR: &str = "gen/default/classes";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Component {component} is not available at {path}")]
    NotFound { component: String, path: PathBuf },

    #[error("Invalid component {component}: {reason}")]
    InvalidComponent { component: String, reason: String },

    #[error("Cannot resolve workspace {path}: {source}")]
    Workspace { path: PathBuf, source: io::Error },
}

/// Locations the POM generator needs for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPaths {
    pub base: PathBuf,
    pub pom: PathBuf,
    pub source_roots: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

impl ComponentPaths {
    /// Resolves the layout of `component` and checks that it is materialized on disk.
    pub fn resolve(
        workspace: &Path,
        component: &DevelopmentComponent,
        fs: &dyn FileSystem,
    ) -> Result<Self, ResolveError> {
        let workspace = absolute_workspace(workspace)?;
        let base = base_location(&workspace, component)?;
        if !fs.is_dir(&base) {
            return Err(ResolveError::NotFound {
                component: component.coordinates(),
                path: base,
            });
        }

        let mut source_roots = Vec::with_capacity(component.source_folders.len());
        for folder in &component.source_folders {
            check_relative(folder).map_err(|reason| ResolveError::InvalidComponent {
                component: component.coordinates(),
                reason: format!("source folder '{}' {}", folder, reason),
            })?;
            source_roots.push(fs.join(&base, folder));
        }

        let output_dir = match &component.output_folder {
            Some(folder) if folder.is_absolute() => folder.clone(),
            Some(folder) => workspace.join(folder),
            None => base.join(DEFAULT_CLASSES_DIR),
        };

        Ok(Self {
            pom: base.join(POM_FILE_NAME),
            base,
            source_roots,
            output_dir,
        })
    }
}

/// `<workspace>/.dtc/DCs/<vendor>/<name>/_comp`, computed without touching the disk.
///
/// The result is always absolute; a relative workspace is taken relative to the
/// current directory.
pub fn base_location(
    workspace: &Path,
    component: &DevelopmentComponent,
) -> Result<PathBuf, ResolveError> {
    let invalid = |reason: String| ResolveError::InvalidComponent {
        component: component.coordinates(),
        reason,
    };

    if component.vendor.contains('/') {
        return Err(invalid(format!(
            "vendor '{}' must not contain '/'",
            component.vendor
        )));
    }
    check_relative(&component.vendor)
        .map_err(|reason| invalid(format!("vendor '{}' {}", component.vendor, reason)))?;
    check_relative(&component.name)
        .map_err(|reason| invalid(format!("name '{}' {}", component.name, reason)))?;

    let mut path = absolute_workspace(workspace)?
        .join(DTC_DIR)
        .join(DCS_DIR)
        .join(&component.vendor);
    for segment in component.name.split('/') {
        path.push(segment);
    }
    path.push(COMP_DIR);
    Ok(path)
}

/// Resolves a possibly relative workspace root against the current directory.
///
/// `.` segments are dropped; symlinks and `..` are left alone.
pub fn make_absolute(workspace: &Path) -> io::Result<PathBuf> {
    let joined = if workspace.is_absolute() {
        workspace.to_path_buf()
    } else {
        env::current_dir()?.join(workspace)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}

fn absolute_workspace(workspace: &Path) -> Result<PathBuf, ResolveError> {
    make_absolute(workspace).map_err(|source| ResolveError::Workspace {
        path: workspace.to_path_buf(),
        source,
    })
}

fn check_relative(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("is empty");
    }
    if value.contains('\\') {
        return Err("must not contain '\\'");
    }
    for segment in value.split('/') {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err("must only contain plain relative path segments"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dc::ComponentType;
    use crate::fs::MockFileSystem;

    fn component() -> DevelopmentComponent {
        DevelopmentComponent::new("example.org", "example/app/core", ComponentType::Java)
            .with_source_folder("src/packages")
            .with_source_folder("src/test")
    }

    #[test]
    fn test_base_location() {
        let base = base_location(Path::new("/ws"), &component()).unwrap();
        assert_eq!(
            base,
            PathBuf::from("/ws/.dtc/DCs/example.org/example/app/core/_comp")
        );
    }

    #[test]
    fn test_base_location_rejects_parent_segments() {
        let dc = DevelopmentComponent::new("example.org", "../../etc", ComponentType::Java);
        let result = base_location(Path::new("/ws"), &dc);
        assert!(matches!(
            result,
            Err(ResolveError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_base_location_rejects_absolute_name() {
        let dc = DevelopmentComponent::new("example.org", "/etc", ComponentType::Java);
        assert!(base_location(Path::new("/ws"), &dc).is_err());
    }

    #[test]
    fn test_base_location_rejects_vendor_with_slash() {
        let dc = DevelopmentComponent::new("example.org/x", "app", ComponentType::Java);
        assert!(base_location(Path::new("/ws"), &dc).is_err());
    }

    #[test]
    fn test_base_location_rejects_empty_vendor() {
        let dc = DevelopmentComponent::new("", "app", ComponentType::Java);
        assert!(base_location(Path::new("/ws"), &dc).is_err());
    }

    #[test]
    fn test_resolve_layout() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/.dtc/DCs/example.org/example/app/core/_comp");

        let paths = ComponentPaths::resolve(Path::new("/ws"), &component(), &fs).unwrap();
        let base = PathBuf::from("/ws/.dtc/DCs/example.org/example/app/core/_comp");

        assert_eq!(paths.pom, base.join("sonar-pom.xml"));
        assert_eq!(
            paths.source_roots,
            vec![base.join("src/packages"), base.join("src/test")]
        );
        assert_eq!(paths.output_dir, base.join("gen/default/classes"));
        assert!(paths.pom.starts_with(&paths.base));
    }

    #[test]
    fn test_resolve_output_folder_override() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/.dtc/DCs/example.org/app/_comp");

        let relative = DevelopmentComponent::new("example.org", "app", ComponentType::Java)
            .with_output_folder(".dtc/t/42/classes");
        let paths = ComponentPaths::resolve(Path::new("/ws"), &relative, &fs).unwrap();
        assert_eq!(paths.output_dir, PathBuf::from("/ws/.dtc/t/42/classes"));

        let absolute = relative.with_output_folder("/build/classes");
        let paths = ComponentPaths::resolve(Path::new("/ws"), &absolute, &fs).unwrap();
        assert_eq!(paths.output_dir, PathBuf::from("/build/classes"));
    }

    #[test]
    fn test_resolve_not_materialized() {
        let fs = MockFileSystem::new();
        let result = ComponentPaths::resolve(Path::new("/ws"), &component(), &fs);

        match result {
            Err(ResolveError::NotFound { component, path }) => {
                assert_eq!(component, "example.org:example/app/core");
                assert_eq!(
                    path,
                    PathBuf::from("/ws/.dtc/DCs/example.org/example/app/core/_comp")
                );
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_rejects_escaping_source_folder() {
        let fs = MockFileSystem::new();
        fs.add_dir("/ws/.dtc/DCs/example.org/app/_comp");

        let dc = DevelopmentComponent::new("example.org", "app", ComponentType::Java)
            .with_source_folder("../other/src");
        let result = ComponentPaths::resolve(Path::new("/ws"), &dc, &fs);
        assert!(matches!(
            result,
            Err(ResolveError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_make_absolute() {
        assert_eq!(
            make_absolute(Path::new("/ws")).unwrap(),
            PathBuf::from("/ws")
        );
        let relative = make_absolute(Path::new("ws")).unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("ws"));

        let dotted = make_absolute(Path::new("./ws/./nested")).unwrap();
        assert_eq!(dotted, std::env::current_dir().unwrap().join("ws/nested"));
    }

    #[test]
    fn test_base_location_of_relative_workspace_is_absolute() {
        let dc = DevelopmentComponent::new("example.org", "app", ComponentType::Java);
        let base = base_location(Path::new("."), &dc).unwrap();

        assert!(base.is_absolute());
        assert_eq!(
            base,
            std::env::current_dir()
                .unwrap()
                .join(".dtc/DCs/example.org/app/_comp")
        );
    }

    #[test]
    fn test_resolve_relative_workspace_gives_absolute_paths() {
        let cwd = std::env::current_dir().unwrap();
        let fs = MockFileSystem::new();
        fs.add_dir(cwd.join("ws/.dtc/DCs/example.org/app/_comp"));

        let dc = DevelopmentComponent::new("example.org", "app", ComponentType::Java)
            .with_source_folder("src/packages")
            .with_output_folder("classes");
        let paths = ComponentPaths::resolve(Path::new("ws"), &dc, &fs).unwrap();

        assert_eq!(paths.pom, cwd.join("ws/.dtc/DCs/example.org/app/_comp/sonar-pom.xml"));
        assert!(paths.source_roots.iter().all(|root| root.is_absolute()));
        assert_eq!(paths.output_dir, cwd.join("ws/classes"));
    }
}
