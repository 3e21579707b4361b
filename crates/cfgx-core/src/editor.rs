//! Object editor — the factory/mutator import uses to build objects.
//!
//! Import never constructs configuration objects directly; it goes through a
//! [`ConfigurationObjectEditor`] so that the backing store can record every
//! creation and modification as an action. [`BasicConfigurationObjectEditor`]
//! keeps those actions in memory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ids::*;
use super::types::*;

pub trait ConfigurationObjectEditor {
    fn create_configuration(&mut self, name: &str, component_type: &ComponentTypeId) -> Configuration;

    fn create_component_type(
        &mut self,
        code: ComponentTypeCode,
        name: &str,
        parent_type: Option<&ComponentTypeId>,
        super_type: Option<&ComponentTypeId>,
        deployable: bool,
        monitorable: bool,
    ) -> ComponentType;

    fn add_property_definitions(
        &mut self,
        component_type: &mut ComponentType,
        definitions: Vec<PropertyDefinition>,
    );

    fn create_host(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> Host;

    fn create_vm_component_defn(
        &mut self,
        configuration: &ConfigurationId,
        host: &HostId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> VmComponentDefn;

    fn create_service_component_defn(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> ServiceComponentDefn;

    /// `routing_uuid` is kept unless the editor is configured to regenerate.
    fn create_connector_component(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
        routing_uuid: Option<&str>,
    ) -> ConnectorBinding;

    fn create_shared_resource(&mut self, component_type: &ComponentTypeId, name: &str) -> SharedResource;

    fn create_authentication_provider(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> AuthenticationProvider;

    fn create_resource_descriptor(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> ResourceDescriptor;

    fn create_deployed_service_component(
        &mut self,
        name: &str,
        configuration: &ConfigurationId,
        vm: &VmComponentDefnId,
        service: Option<DeployedServiceRef>,
        component_type: &ComponentTypeId,
    ) -> DeployedComponent;

    /// Adds (or overwrites) the given properties on `target`.
    fn modify_properties(&mut self, target: &mut dyn ComponentObject, properties: &Properties);

    fn set_creation_changed_history(
        &mut self,
        target: &mut dyn ChangeTracked,
        by: Option<&str>,
        date: Option<DateTime<Utc>>,
    );

    fn set_last_changed_history(
        &mut self,
        target: &mut dyn ChangeTracked,
        by: Option<&str>,
        date: Option<DateTime<Utc>>,
    );
}

// ─── In-memory Editor ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EditorAction {
    Create { kind: &'static str, target: String },
    AddPropertyDefinitions { target: String, count: usize },
    ModifyProperties { target: String, count: usize },
    SetCreationHistory { target: String },
    SetLastChangedHistory { target: String },
}

/// Editor that builds plain values and logs each call.
#[derive(Debug, Default)]
pub struct BasicConfigurationObjectEditor {
    actions: Vec<EditorAction>,
    regenerate_routing_ids: bool,
}

impl BasicConfigurationObjectEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign fresh routing UUIDs to every connector binding created.
    pub fn regenerating_routing_ids(mut self, regenerate: bool) -> Self {
        self.regenerate_routing_ids = regenerate;
        self
    }

    pub fn actions(&self) -> &[EditorAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<EditorAction> {
        std::mem::take(&mut self.actions)
    }

    fn record_create(&mut self, kind: &'static str, target: impl ToString) {
        log::debug!("editor: create {} {}", kind, target.to_string());
        self.actions.push(EditorAction::Create {
            kind,
            target: target.to_string(),
        });
    }
}

impl ConfigurationObjectEditor for BasicConfigurationObjectEditor {
    fn create_configuration(&mut self, name: &str, component_type: &ComponentTypeId) -> Configuration {
        let id = ConfigurationId::new(name);
        self.record_create("Configuration", &id);
        Configuration {
            id,
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_component_type(
        &mut self,
        code: ComponentTypeCode,
        name: &str,
        parent_type: Option<&ComponentTypeId>,
        super_type: Option<&ComponentTypeId>,
        deployable: bool,
        monitorable: bool,
    ) -> ComponentType {
        let id = ComponentTypeId::new(name);
        self.record_create("ComponentType", &id);
        ComponentType {
            id,
            type_code: code,
            deployable,
            monitorable,
            deprecated: false,
            super_type: super_type.cloned(),
            parent_type: parent_type.cloned(),
            property_definitions: Vec::new(),
            history: ChangeHistory::default(),
        }
    }

    fn add_property_definitions(
        &mut self,
        component_type: &mut ComponentType,
        definitions: Vec<PropertyDefinition>,
    ) {
        self.actions.push(EditorAction::AddPropertyDefinitions {
            target: component_type.label(),
            count: definitions.len(),
        });
        component_type.property_definitions.extend(definitions);
    }

    fn create_host(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> Host {
        let id = HostId::new(name);
        self.record_create("Host", &id);
        Host {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_vm_component_defn(
        &mut self,
        configuration: &ConfigurationId,
        host: &HostId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> VmComponentDefn {
        let id = VmComponentDefnId::new(host.clone(), name);
        self.record_create("Process", &id);
        VmComponentDefn {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_service_component_defn(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> ServiceComponentDefn {
        let id = ServiceComponentDefnId::new(name);
        self.record_create("Service", &id);
        ServiceComponentDefn {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_connector_component(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
        routing_uuid: Option<&str>,
    ) -> ConnectorBinding {
        let id = ConnectorBindingId::new(name);
        self.record_create("ConnectorBinding", &id);
        let routing_uuid = match routing_uuid {
            Some(uuid) if !self.regenerate_routing_ids && !uuid.trim().is_empty() => uuid.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        ConnectorBinding {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            routing_uuid,
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_shared_resource(&mut self, component_type: &ComponentTypeId, name: &str) -> SharedResource {
        let id = SharedResourceId::new(name);
        self.record_create("SharedResource", &id);
        SharedResource {
            id,
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_authentication_provider(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> AuthenticationProvider {
        let id = AuthenticationProviderId::new(name);
        self.record_create("AuthenticationProvider", &id);
        AuthenticationProvider {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_resource_descriptor(
        &mut self,
        configuration: &ConfigurationId,
        component_type: &ComponentTypeId,
        name: &str,
    ) -> ResourceDescriptor {
        let id = ResourceDescriptorId::new(name);
        self.record_create("Resource", &id);
        ResourceDescriptor {
            id,
            configuration_id: configuration.clone(),
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn create_deployed_service_component(
        &mut self,
        name: &str,
        configuration: &ConfigurationId,
        vm: &VmComponentDefnId,
        service: Option<DeployedServiceRef>,
        component_type: &ComponentTypeId,
    ) -> DeployedComponent {
        let id = DeployedComponentId::new(vm.clone(), name);
        self.record_create("DeployedComponent", &id);
        DeployedComponent {
            id,
            configuration_id: configuration.clone(),
            service,
            component_type_id: component_type.clone(),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
    }

    fn modify_properties(&mut self, target: &mut dyn ComponentObject, properties: &Properties) {
        if properties.is_empty() {
            return;
        }
        self.actions.push(EditorAction::ModifyProperties {
            target: target.label(),
            count: properties.len(),
        });
        target
            .properties_mut()
            .extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    fn set_creation_changed_history(
        &mut self,
        target: &mut dyn ChangeTracked,
        by: Option<&str>,
        date: Option<DateTime<Utc>>,
    ) {
        self.actions.push(EditorAction::SetCreationHistory { target: target.label() });
        let history = target.history_mut();
        history.created_by = by.map(str::to_string);
        history.creation_date = date;
    }

    fn set_last_changed_history(
        &mut self,
        target: &mut dyn ChangeTracked,
        by: Option<&str>,
        date: Option<DateTime<Utc>>,
    ) {
        self.actions.push(EditorAction::SetLastChangedHistory { target: target.label() });
        let history = target.history_mut();
        history.last_changed_by = by.map(str::to_string);
        history.last_changed_date = date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_logs_creations_in_order() {
        let mut editor = BasicConfigurationObjectEditor::new();
        let cfg = editor.create_configuration("Next", &ComponentTypeId::new("Configuration"));
        let host = editor.create_host(&cfg.id, &ComponentTypeId::new("Host"), "H1");
        editor.create_vm_component_defn(&cfg.id, &host.id, &ComponentTypeId::new("VM"), "P1");

        let kinds: Vec<&str> = editor
            .actions()
            .iter()
            .filter_map(|a| match a {
                EditorAction::Create { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["Configuration", "Host", "Process"]);
    }

    #[test]
    fn test_routing_uuid_kept_or_regenerated() {
        let cfg = ConfigurationId::new("Next");
        let ty = ComponentTypeId::new("Oracle");

        let mut keep = BasicConfigurationObjectEditor::new();
        let kept = keep.create_connector_component(&cfg, &ty, "CB1", Some("fixed-uuid"));
        assert_eq!(kept.routing_uuid, "fixed-uuid");

        let mut regen = BasicConfigurationObjectEditor::new().regenerating_routing_ids(true);
        let fresh = regen.create_connector_component(&cfg, &ty, "CB1", Some("fixed-uuid"));
        assert_ne!(fresh.routing_uuid, "fixed-uuid");
        assert!(Uuid::parse_str(&fresh.routing_uuid).is_ok());

        let missing = keep.create_connector_component(&cfg, &ty, "CB2", None);
        assert!(Uuid::parse_str(&missing.routing_uuid).is_ok());
    }

    #[test]
    fn test_modify_properties_and_history() {
        let mut editor = BasicConfigurationObjectEditor::new();
        let mut host = editor.create_host(
            &ConfigurationId::new("Next"),
            &ComponentTypeId::new("Host"),
            "H1",
        );
        let mut props = Properties::new();
        props.insert("port".into(), "31000".into());
        editor.modify_properties(&mut host, &props);
        editor.set_creation_changed_history(&mut host, Some("admin"), None);

        assert_eq!(host.properties.get("port").map(String::as_str), Some("31000"));
        assert_eq!(host.history.created_by.as_deref(), Some("admin"));
        assert_eq!(editor.take_actions().len(), 3);
        assert!(editor.actions().is_empty());
    }
}
