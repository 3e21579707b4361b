//! Typed identities for every configuration object.
//!
//! Most objects are identified by name alone. Processes are scoped to their
//! host and deployed components to their host + process, so those ids are
//! composite.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! name_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_id!(
    /// Identity of a component type (its name).
    ComponentTypeId
);
name_id!(ConfigurationId);
name_id!(HostId);
name_id!(ServiceComponentDefnId);
name_id!(ConnectorBindingId);
name_id!(SharedResourceId);
name_id!(AuthenticationProviderId);
name_id!(ResourceDescriptorId);

/// A process definition, scoped to the host it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VmComponentDefnId {
    pub host: HostId,
    pub name: String,
}

impl VmComponentDefnId {
    pub fn new(host: HostId, name: impl Into<String>) -> Self {
        Self {
            host,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for VmComponentDefnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.host, self.name)
    }
}

/// A service or connector deployed into a specific process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeployedComponentId {
    pub vm: VmComponentDefnId,
    pub name: String,
}

impl DeployedComponentId {
    pub fn new(vm: VmComponentDefnId, name: impl Into<String>) -> Self {
        Self {
            vm,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeployedComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.vm, self.name)
    }
}

/// What a deployed component runs: a plain service or a connector binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeployedServiceRef {
    Service(ServiceComponentDefnId),
    Connector(ConnectorBindingId),
}

impl DeployedServiceRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Service(id) => id.name(),
            Self::Connector(id) => id.name(),
        }
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, Self::Connector(_))
    }
}

impl fmt::Display for DeployedServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
