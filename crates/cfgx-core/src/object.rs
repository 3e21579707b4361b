//! The closed set of configuration objects handled by import/export.

use serde::{Deserialize, Serialize};

use super::types::*;

/// Any object that can appear in an exported or imported collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "object")]
pub enum ConfigObject {
    Configuration(Configuration),
    Host(Host),
    Vm(VmComponentDefn),
    Service(ServiceComponentDefn),
    ConnectorBinding(ConnectorBinding),
    SharedResource(SharedResource),
    AuthenticationProvider(AuthenticationProvider),
    ResourceDescriptor(ResourceDescriptor),
    DeployedComponent(DeployedComponent),
    ComponentType(ComponentType),
}

impl ConfigObject {
    pub fn name(&self) -> &str {
        match self {
            Self::ComponentType(t) => t.name(),
            other => other
                .as_component_object()
                .map(|o| o.name())
                .unwrap_or_default(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::ComponentType(t) => t.label(),
            other => other
                .as_component_object()
                .map(|o| o.label())
                .unwrap_or_default(),
        }
    }

    /// Everything except component types is a component object.
    pub fn as_component_object(&self) -> Option<&dyn ComponentObject> {
        match self {
            Self::Configuration(o) => Some(o),
            Self::Host(o) => Some(o),
            Self::Vm(o) => Some(o),
            Self::Service(o) => Some(o),
            Self::ConnectorBinding(o) => Some(o),
            Self::SharedResource(o) => Some(o),
            Self::AuthenticationProvider(o) => Some(o),
            Self::ResourceDescriptor(o) => Some(o),
            Self::DeployedComponent(o) => Some(o),
            Self::ComponentType(_) => None,
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl From<$ty> for ConfigObject {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_variant!(
    Configuration(Configuration),
    Host(Host),
    Vm(VmComponentDefn),
    Service(ServiceComponentDefn),
    ConnectorBinding(ConnectorBinding),
    SharedResource(SharedResource),
    AuthenticationProvider(AuthenticationProvider),
    ResourceDescriptor(ResourceDescriptor),
    DeployedComponent(DeployedComponent),
    ComponentType(ComponentType),
);
