//! Segregation by object kind and cross-reference resolution.
//!
//! Resolution is a pure validation pass: every reference an object holds
//! must name another object of the same collection. Export runs it before
//! writing a document and import runs it before handing objects back.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::ids::*;
use super::object::ConfigObject;
use super::types::*;

pub const KIND_VM_COMPONENT: &str = "vm component";
pub const KIND_SERVICE_COMPONENT: &str = "service component";
pub const KIND_HOST: &str = "host";
pub const KIND_COMPONENT_TYPE: &str = "component type";
pub const KIND_CONFIGURATION: &str = "configuration";
pub const KIND_SUPER_TYPE: &str = "super component type";
pub const KIND_PARENT_TYPE: &str = "parent component type";

/// A collection split into typed lists with matching id sets.
#[derive(Debug, Default)]
pub struct SegregatedObjects<'a> {
    pub configurations: Vec<&'a Configuration>,
    pub hosts: Vec<&'a Host>,
    pub vms: Vec<&'a VmComponentDefn>,
    pub services: Vec<&'a ServiceComponentDefn>,
    pub connector_bindings: Vec<&'a ConnectorBinding>,
    pub shared_resources: Vec<&'a SharedResource>,
    pub authentication_providers: Vec<&'a AuthenticationProvider>,
    pub resource_descriptors: Vec<&'a ResourceDescriptor>,
    pub deployed_components: Vec<&'a DeployedComponent>,
    pub component_types: Vec<&'a ComponentType>,

    pub configuration_ids: HashSet<&'a ConfigurationId>,
    pub host_ids: HashSet<&'a HostId>,
    pub vm_ids: HashSet<&'a VmComponentDefnId>,
    pub service_ids: HashSet<&'a ServiceComponentDefnId>,
    pub connector_binding_ids: HashSet<&'a ConnectorBindingId>,
    pub component_type_ids: HashSet<&'a ComponentTypeId>,
}

/// Split `objects` by kind in a single pass.
pub fn segregate(objects: &[ConfigObject]) -> SegregatedObjects<'_> {
    let mut seg = SegregatedObjects::default();

    for obj in objects {
        match obj {
            ConfigObject::Configuration(c) => {
                seg.configuration_ids.insert(&c.id);
                seg.configurations.push(c);
            }
            ConfigObject::Host(h) => {
                seg.host_ids.insert(&h.id);
                seg.hosts.push(h);
            }
            ConfigObject::Vm(v) => {
                seg.vm_ids.insert(&v.id);
                seg.vms.push(v);
            }
            ConfigObject::Service(s) => {
                seg.service_ids.insert(&s.id);
                seg.services.push(s);
            }
            ConfigObject::ConnectorBinding(b) => {
                seg.connector_binding_ids.insert(&b.id);
                seg.connector_bindings.push(b);
            }
            ConfigObject::SharedResource(r) => seg.shared_resources.push(r),
            ConfigObject::AuthenticationProvider(p) => seg.authentication_providers.push(p),
            ConfigObject::ResourceDescriptor(r) => seg.resource_descriptors.push(r),
            ConfigObject::DeployedComponent(d) => seg.deployed_components.push(d),
            ConfigObject::ComponentType(t) => {
                seg.component_type_ids.insert(&t.id);
                seg.component_types.push(t);
            }
        }
    }

    log::debug!(
        "segregated {} objects: {} configurations, {} hosts, {} processes, {} deployed, {} types",
        objects.len(),
        seg.configurations.len(),
        seg.hosts.len(),
        seg.vms.len(),
        seg.deployed_components.len(),
        seg.component_types.len()
    );
    seg
}

/// Fail unless every reference inside `objects` resolves within `objects`.
pub fn resolve_configuration_objects(objects: &[ConfigObject]) -> ConfigResult<()> {
    segregate(objects).resolve()
}

impl<'a> SegregatedObjects<'a> {
    pub fn resolve(&self) -> ConfigResult<()> {
        for d in &self.deployed_components {
            if !self.vm_ids.contains(d.vm_id()) {
                return Err(unresolved(d.label(), d.vm_id(), KIND_VM_COMPONENT));
            }
            let service_known = match &d.service {
                None => true,
                Some(DeployedServiceRef::Service(id)) => self.service_ids.contains(id),
                Some(DeployedServiceRef::Connector(id)) => self.connector_binding_ids.contains(id),
            };
            if !service_known {
                if let Some(service) = &d.service {
                    return Err(unresolved(d.label(), service, KIND_SERVICE_COMPONENT));
                }
            }
            if !self.host_ids.contains(d.host_id()) {
                return Err(unresolved(d.label(), d.host_id(), KIND_HOST));
            }
            self.check_type(*d)?;
            self.check_configuration(d.label(), &d.configuration_id)?;
        }

        for r in &self.shared_resources {
            self.check_type(*r)?;
        }
        for b in &self.connector_bindings {
            self.check_type(*b)?;
            self.check_configuration(b.label(), &b.configuration_id)?;
        }
        for s in &self.services {
            self.check_type(*s)?;
            self.check_configuration(s.label(), &s.configuration_id)?;
        }
        for v in &self.vms {
            self.check_type(*v)?;
            self.check_configuration(v.label(), &v.configuration_id)?;
            if !self.host_ids.contains(v.host_id()) {
                return Err(unresolved(v.label(), v.host_id(), KIND_HOST));
            }
        }
        for c in &self.configurations {
            self.check_type(*c)?;
        }
        for h in &self.hosts {
            self.check_type(*h)?;
            self.check_configuration(h.label(), &h.configuration_id)?;
        }
        for p in &self.authentication_providers {
            self.check_type(*p)?;
            self.check_configuration(p.label(), &p.configuration_id)?;
        }
        for r in &self.resource_descriptors {
            self.check_type(*r)?;
            self.check_configuration(r.label(), &r.configuration_id)?;
        }
        for t in &self.component_types {
            if let Some(super_type) = &t.super_type {
                if !self.component_type_ids.contains(super_type) {
                    return Err(unresolved(t.label(), super_type, KIND_SUPER_TYPE));
                }
            }
            if let Some(parent) = &t.parent_type {
                if !self.component_type_ids.contains(parent) {
                    return Err(unresolved(t.label(), parent, KIND_PARENT_TYPE));
                }
            }
        }

        Ok(())
    }

    fn check_type(&self, obj: &dyn ComponentObject) -> ConfigResult<()> {
        if self.component_type_ids.contains(obj.component_type_id()) {
            Ok(())
        } else {
            Err(unresolved(obj.label(), obj.component_type_id(), KIND_COMPONENT_TYPE))
        }
    }

    fn check_configuration(&self, label: String, id: &ConfigurationId) -> ConfigResult<()> {
        if self.configuration_ids.contains(id) {
            Ok(())
        } else {
            Err(unresolved(label, id, KIND_CONFIGURATION))
        }
    }
}

fn unresolved(object: String, reference: &impl ToString, kind: &'static str) -> ConfigError {
    log::debug!("unresolved {} reference from {}", kind, object);
    ConfigError::not_resolvable(object, reference.to_string(), kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_obj(name: &str, code: ComponentTypeCode, super_type: Option<&str>) -> ConfigObject {
        ComponentType {
            id: ComponentTypeId::new(name),
            type_code: code,
            deployable: true,
            monitorable: false,
            deprecated: false,
            super_type: super_type.map(ComponentTypeId::new),
            parent_type: None,
            property_definitions: Vec::new(),
            history: ChangeHistory::default(),
        }
        .into()
    }

    fn minimal_collection() -> Vec<ConfigObject> {
        let cfg = ConfigurationId::new("Next");
        let host = HostId::new("H1");
        let vm = VmComponentDefnId::new(host.clone(), "P1");
        vec![
            type_obj("Configuration", ComponentTypeCode::Configuration, None),
            type_obj("Host", ComponentTypeCode::Host, None),
            type_obj("VM", ComponentTypeCode::Vm, None),
            type_obj("Connector", ComponentTypeCode::Product, None),
            type_obj("Oracle", ComponentTypeCode::Connector, Some("Connector")),
            Configuration {
                id: cfg.clone(),
                component_type_id: ComponentTypeId::new("Configuration"),
                properties: Properties::new(),
                history: ChangeHistory::default(),
            }
            .into(),
            Host {
                id: host.clone(),
                configuration_id: cfg.clone(),
                component_type_id: ComponentTypeId::new("Host"),
                properties: Properties::new(),
                history: ChangeHistory::default(),
            }
            .into(),
            VmComponentDefn {
                id: vm.clone(),
                configuration_id: cfg.clone(),
                component_type_id: ComponentTypeId::new("VM"),
                properties: Properties::new(),
                history: ChangeHistory::default(),
            }
            .into(),
            ConnectorBinding {
                id: ConnectorBindingId::new("CB1"),
                configuration_id: cfg.clone(),
                component_type_id: ComponentTypeId::new("Oracle"),
                routing_uuid: "r-1".into(),
                properties: Properties::new(),
                history: ChangeHistory::default(),
            }
            .into(),
            DeployedComponent {
                id: DeployedComponentId::new(vm, "CB1"),
                configuration_id: cfg,
                service: Some(DeployedServiceRef::Connector(ConnectorBindingId::new("CB1"))),
                component_type_id: ComponentTypeId::new("Oracle"),
                properties: Properties::new(),
                history: ChangeHistory::default(),
            }
            .into(),
        ]
    }

    #[test]
    fn test_complete_collection_resolves() {
        assert!(resolve_configuration_objects(&minimal_collection()).is_ok());
    }

    #[test]
    fn test_segregate_counts() {
        let objects = minimal_collection();
        let seg = segregate(&objects);
        assert_eq!(seg.component_types.len(), 5);
        assert_eq!(seg.configurations.len(), 1);
        assert_eq!(seg.deployed_components.len(), 1);
        assert!(seg.connector_binding_ids.contains(&ConnectorBindingId::new("CB1")));
    }

    #[test]
    fn test_unknown_vm_is_reported() {
        let mut objects = minimal_collection();
        for obj in objects.iter_mut() {
            if let ConfigObject::DeployedComponent(d) = obj {
                d.id.vm = VmComponentDefnId::new(HostId::new("H1"), "P9");
            }
        }
        let err = resolve_configuration_objects(&objects).unwrap_err();
        assert_eq!(err.unresolved_kind(), Some(KIND_VM_COMPONENT));
    }

    #[test]
    fn test_absent_service_reference_is_allowed() {
        let mut objects = minimal_collection();
        for obj in objects.iter_mut() {
            if let ConfigObject::DeployedComponent(d) = obj {
                d.service = None;
            }
        }
        assert!(resolve_configuration_objects(&objects).is_ok());
    }

    #[test]
    fn test_connector_reference_must_match_a_binding() {
        let mut objects = minimal_collection();
        for obj in objects.iter_mut() {
            if let ConfigObject::DeployedComponent(d) = obj {
                // Same name but the wrong identity class.
                d.service = Some(DeployedServiceRef::Service(ServiceComponentDefnId::new("CB1")));
            }
        }
        let err = resolve_configuration_objects(&objects).unwrap_err();
        assert_eq!(err.unresolved_kind(), Some(KIND_SERVICE_COMPONENT));
    }

    #[test]
    fn test_missing_component_type() {
        let objects: Vec<ConfigObject> = minimal_collection()
            .into_iter()
            .filter(|o| !matches!(o, ConfigObject::ComponentType(t) if t.name() == "Host"))
            .collect();
        let err = resolve_configuration_objects(&objects).unwrap_err();
        assert_eq!(err.unresolved_kind(), Some(KIND_COMPONENT_TYPE));
    }

    #[test]
    fn test_missing_super_type() {
        let objects: Vec<ConfigObject> = minimal_collection()
            .into_iter()
            .filter(|o| !matches!(o, ConfigObject::ComponentType(t) if t.name() == "Connector"))
            .collect();
        let err = resolve_configuration_objects(&objects).unwrap_err();
        assert_eq!(err.unresolved_kind(), Some(KIND_SUPER_TYPE));
    }

    #[test]
    fn test_missing_configuration() {
        let objects: Vec<ConfigObject> = minimal_collection()
            .into_iter()
            .filter(|o| !matches!(o, ConfigObject::Configuration(_)))
            .collect();
        let err = resolve_configuration_objects(&objects).unwrap_err();
        assert_eq!(err.unresolved_kind(), Some(KIND_CONFIGURATION));
    }
}
