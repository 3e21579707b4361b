//! cfgx data types — component types, property definitions, and every
//! deployable/configuration object kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::*;

/// Property bag. Sorted so that exported documents are stable.
pub type Properties = BTreeMap<String, String>;

/// Name of the connector property whose default value lists the
/// extension modules a connector type loads.
pub const CONNECTOR_CLASSPATH_PROPERTY: &str = "ConnectorClassPath";

/// Classpath entry prefix marking an extension module.
pub const EXTENSION_MODULE_PREFIX: &str = "extensionjar:";

// ─── Change History ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeHistory {
    pub created_by: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub last_changed_by: Option<String>,
    pub last_changed_date: Option<DateTime<Utc>>,
}

impl ChangeHistory {
    pub fn is_empty(&self) -> bool {
        self.created_by.is_none()
            && self.creation_date.is_none()
            && self.last_changed_by.is_none()
            && self.last_changed_date.is_none()
    }
}

// ─── Component Type Codes ───────────────────────────────────────────

/// Numeric category of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentTypeCode {
    Configuration = 0,
    Service = 1,
    Connector = 2,
    Vm = 3,
    Product = 4,
    Host = 5,
    Resource = 6,
    SharedResource = 7,
    AuthenticationProvider = 8,
    DeployedComponent = 9,
}

impl ComponentTypeCode {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Configuration),
            1 => Some(Self::Service),
            2 => Some(Self::Connector),
            3 => Some(Self::Vm),
            4 => Some(Self::Product),
            5 => Some(Self::Host),
            6 => Some(Self::Resource),
            7 => Some(Self::SharedResource),
            8 => Some(Self::AuthenticationProvider),
            9 => Some(Self::DeployedComponent),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }
}

// ─── Property Definitions ───────────────────────────────────────────

/// What has to be restarted for a changed property value to take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestartType {
    #[default]
    None,
    Service,
    Process,
    AllProcesses,
    Cluster,
}

impl RestartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Service => "Service",
            Self::Process => "Process",
            Self::AllProcesses => "AllProcesses",
            Self::Cluster => "Cluster",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "false" => Some(Self::None),
            "service" | "true" => Some(Self::Service),
            "process" => Some(Self::Process),
            "allprocesses" => Some(Self::AllProcesses),
            "cluster" => Some(Self::Cluster),
            _ => None,
        }
    }
}

pub const DEFAULT_PROPERTY_TYPE: &str = "String";

/// Schema of one property a component type accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,
    pub display_name: String,
    pub short_description: String,
    pub property_type: String,
    pub default_value: Option<String>,
    pub allowed_values: Vec<String>,
    pub required: bool,
    pub expert: bool,
    pub masked: bool,
    pub modifiable: bool,
    pub hidden: bool,
    pub requires_restart: RestartType,
}

impl PropertyDefinition {
    /// A definition with every attribute at its documented default.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            short_description: String::new(),
            property_type: DEFAULT_PROPERTY_TYPE.to_string(),
            default_value: None,
            allowed_values: Vec::new(),
            required: false,
            expert: false,
            masked: false,
            modifiable: true,
            hidden: false,
            requires_restart: RestartType::None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

// ─── Component Types ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentType {
    pub id: ComponentTypeId,
    pub type_code: ComponentTypeCode,
    pub deployable: bool,
    pub monitorable: bool,
    pub deprecated: bool,
    pub super_type: Option<ComponentTypeId>,
    pub parent_type: Option<ComponentTypeId>,
    pub property_definitions: Vec<PropertyDefinition>,
    pub history: ChangeHistory,
}

impl ComponentType {
    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn is_connector(&self) -> bool {
        self.type_code == ComponentTypeCode::Connector
    }

    pub fn property_definition(&self, name: &str) -> Option<&PropertyDefinition> {
        self.property_definitions.iter().find(|d| d.name == name)
    }

    /// Extension modules this type declares on its connector classpath.
    pub fn extension_module_names(&self) -> Vec<String> {
        let classpath = match self
            .property_definition(CONNECTOR_CLASSPATH_PROPERTY)
            .and_then(|d| d.default_value.as_deref())
        {
            Some(cp) => cp,
            None => return Vec::new(),
        };

        classpath
            .split(';')
            .map(str::trim)
            .filter_map(|entry| entry.strip_prefix(EXTENSION_MODULE_PREFIX))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ─── Component Objects ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub id: HostId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

/// A process definition running on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmComponentDefn {
    pub id: VmComponentDefnId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

impl VmComponentDefn {
    pub fn host_id(&self) -> &HostId {
        &self.id.host
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceComponentDefn {
    pub id: ServiceComponentDefnId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorBinding {
    pub id: ConnectorBindingId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub routing_uuid: String,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedResource {
    pub id: SharedResourceId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationProvider {
    pub id: AuthenticationProviderId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub id: ResourceDescriptorId,
    pub configuration_id: ConfigurationId,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedComponent {
    pub id: DeployedComponentId,
    pub configuration_id: ConfigurationId,
    /// `None` is tolerated for legacy documents.
    pub service: Option<DeployedServiceRef>,
    pub component_type_id: ComponentTypeId,
    pub properties: Properties,
    pub history: ChangeHistory,
}

impl DeployedComponent {
    pub fn vm_id(&self) -> &VmComponentDefnId {
        &self.id.vm
    }

    pub fn host_id(&self) -> &HostId {
        &self.id.vm.host
    }
}

// ─── Shared Behaviour ───────────────────────────────────────────────

/// Anything that carries created/last-changed metadata.
pub trait ChangeTracked {
    fn history(&self) -> &ChangeHistory;
    fn history_mut(&mut self) -> &mut ChangeHistory;
    /// Human readable `Kind name` label used in logs and errors.
    fn label(&self) -> String;
}

/// A named, typed, property bearing configuration object.
pub trait ComponentObject: ChangeTracked {
    fn name(&self) -> &str;
    fn component_type_id(&self) -> &ComponentTypeId;
    fn properties(&self) -> &Properties;
    fn properties_mut(&mut self) -> &mut Properties;
}

macro_rules! impl_component_object {
    ($($ty:ident => $label:literal),* $(,)?) => {
        $(
            impl ChangeTracked for $ty {
                fn history(&self) -> &ChangeHistory {
                    &self.history
                }

                fn history_mut(&mut self) -> &mut ChangeHistory {
                    &mut self.history
                }

                fn label(&self) -> String {
                    format!("{} {}", $label, self.id)
                }
            }

            impl ComponentObject for $ty {
                fn name(&self) -> &str {
                    self.id.name()
                }

                fn component_type_id(&self) -> &ComponentTypeId {
                    &self.component_type_id
                }

                fn properties(&self) -> &Properties {
                    &self.properties
                }

                fn properties_mut(&mut self) -> &mut Properties {
                    &mut self.properties
                }
            }
        )*
    };
}

impl_component_object!(
    Configuration => "Configuration",
    Host => "Host",
    VmComponentDefn => "Process",
    ServiceComponentDefn => "Service",
    ConnectorBinding => "ConnectorBinding",
    SharedResource => "SharedResource",
    AuthenticationProvider => "AuthenticationProvider",
    ResourceDescriptor => "Resource",
    DeployedComponent => "DeployedComponent",
);

impl ChangeTracked for ComponentType {
    fn history(&self) -> &ChangeHistory {
        &self.history
    }

    fn history_mut(&mut self) -> &mut ChangeHistory {
        &mut self.history
    }

    fn label(&self) -> String {
        format!("ComponentType {}", self.id)
    }
}
