//! NWDI development components: model, selection and manifest loading

mod id_enum_macro;

mod component;
mod filter;
mod registry;

pub use component::{ComponentType, DevelopmentComponent, UsedComponent};
pub use filter::{ComponentFilter, JavaSourceFilter};
pub use registry::{ComponentRegistry, RegistryError};
