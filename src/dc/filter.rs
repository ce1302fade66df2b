//! Component selection

use super::{ComponentType, DevelopmentComponent};

/// Predicate choosing which components a build step processes.
pub trait ComponentFilter {
    fn accept(&self, component: &DevelopmentComponent) -> bool;
}

/// Accepts components whose type carries Java source code.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaSourceFilter;

impl ComponentFilter for JavaSourceFilter {
    fn accept(&self, component: &DevelopmentComponent) -> bool {
        matches!(
            component.component_type,
            ComponentType::Java
                | ComponentType::WebDynpro
                | ComponentType::J2eeWebModule
                | ComponentType::J2eeEjbModule
                | ComponentType::J2eeServerComponent
        )
    }
}

impl<F> ComponentFilter for F
where
    F: Fn(&DevelopmentComponent) -> bool,
{
    fn accept(&self, component: &DevelopmentComponent) -> bool {
        self(component)
    }
}
