//! Development component model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

crate::define_id_enum! {
    /// NWDI development component type
    ComponentType {
        Java => "java" : "Java",
        WebDynpro => "web-dynpro" : "Web Dynpro",
        J2eeWebModule => "j2ee-web-module" : "J2EE Web Module",
        J2eeEjbModule => "j2ee-ejb-module" : "J2EE EJB Module",
        J2eeServerComponent => "j2ee-server-component" : "J2EE Server Component",
        EnterpriseApplication => "enterprise-application" : "Enterprise Application",
        Dictionary => "dictionary" : "Dictionary",
        ExternalLibrary => "external-library" : "External Library",
        ContentArchive => "content-archive" : "Content Archive",
    }
}

/// Reference to another development component this one uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedComponent {
    pub vendor: String,
    pub name: String,
}

/// A unit of source code managed by the NWDI.
///
/// Components are loaded once from the component manifest and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevelopmentComponent {
    /// Vendor namespace, e.g. `example.org`
    pub vendor: String,

    /// Component name; may contain `/` separators, e.g. `example/app/core`
    pub name: String,

    #[serde(rename = "type")]
    pub component_type: ComponentType,

    /// Source folders relative to the component's base location
    #[serde(default)]
    pub source_folders: Vec<String>,

    #[serde(default)]
    pub used_components: Vec<UsedComponent>,

    /// Whether the current build touched this component
    #[serde(default = "default_needs_rebuild")]
    pub needs_rebuild: bool,

    /// Compiled classes directory (absolute, or relative to the workspace)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
}

fn default_needs_rebuild() -> bool {
    true
}

impl DevelopmentComponent {
    pub fn new(
        vendor: impl Into<String>,
        name: impl Into<String>,
        component_type: ComponentType,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            name: name.into(),
            component_type,
            source_folders: Vec::new(),
            used_components: Vec::new(),
            needs_rebuild: true,
            output_folder: None,
        }
    }

    pub fn with_source_folder(mut self, folder: impl Into<String>) -> Self {
        self.source_folders.push(folder.into());
        self
    }

    pub fn with_output_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.output_folder = Some(folder.into());
        self
    }

    /// `vendor:name`, the key components are looked up by.
    pub fn coordinates(&self) -> String {
        format!("{}:{}", self.vendor, self.name)
    }

    /// Name usable as a Maven artifact id (`/` becomes `~`, as in NWDI archive names).
    pub fn artifact_id(&self) -> String {
        self.name.replace('/', "~")
    }
}

impl fmt::Display for DevelopmentComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coordinates(), self.component_type)
    }
}
