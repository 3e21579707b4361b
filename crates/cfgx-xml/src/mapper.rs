//! Object ↔ element mapping for every configuration object kind.
//!
//! `create_*_element` functions render an object; `create_*` functions
//! validate an element, ask the object editor to build the object, then
//! restore properties and change history through the same editor.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;

use cfgx_core::*;

use super::element::Element;
use super::element_names::*;

// ─── Attribute Helpers ──────────────────────────────────────────────

pub(crate) fn expect_tag(element: &Element, expected: &str) -> ConfigResult<()> {
    if element.name == expected {
        Ok(())
    } else {
        Err(ConfigError::invalid_element(
            element.name.as_str(),
            ElementErrorReason::WrongTag {
                expected: expected.to_string(),
            },
        ))
    }
}

/// Non-blank attribute value or a missing-attribute error.
pub(crate) fn required_attr<'a>(element: &'a Element, attr: &'static str) -> ConfigResult<&'a str> {
    match element.attribute(attr) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::invalid_element(
            element.name.as_str(),
            ElementErrorReason::MissingAttribute(attr),
        )),
    }
}

/// The element's `Name`, replaced by `name_override` when that is non-blank.
fn object_name(element: &Element, name_override: Option<&str>) -> ConfigResult<String> {
    match name_override.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => Ok(name.to_string()),
        None => required_attr(element, common::NAME).map(str::to_string),
    }
}

fn component_type_attr(element: &Element) -> ConfigResult<ComponentTypeId> {
    required_attr(element, common::COMPONENT_TYPE).map(ComponentTypeId::new)
}

fn bool_attr(element: &Element, attr: &'static str, default: bool) -> ConfigResult<bool> {
    match element.attribute(attr) {
        None => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(invalid_attr(element, attr, v)),
    }
}

fn date_attr(element: &Element, attr: &'static str) -> ConfigResult<Option<DateTime<Utc>>> {
    match element.attribute(attr) {
        None => Ok(None),
        Some(v) => DateTime::parse_from_rfc3339(v)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|_| invalid_attr(element, attr, v)),
    }
}

fn invalid_attr(element: &Element, attr: &'static str, value: &str) -> ConfigError {
    ConfigError::invalid_element(
        element.name.as_str(),
        ElementErrorReason::InvalidAttribute {
            attribute: attr,
            value: value.to_string(),
        },
    )
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn bool_str(val: bool) -> &'static str {
    if val { "true" } else { "false" }
}

// ─── Properties & Change History ────────────────────────────────────

pub fn create_properties_element(props: &Properties) -> Element {
    let mut elem = Element::new(properties::ELEMENT);
    for (key, value) in props {
        elem.add_child(
            Element::new(properties::property::ELEMENT)
                .with_attribute(properties::property::NAME, key.as_str())
                .with_text(value.as_str()),
        );
    }
    elem
}

/// Properties from the element's `<Properties>` child; absent means empty.
pub fn read_properties(element: &Element) -> ConfigResult<Properties> {
    let mut props = Properties::new();
    if let Some(section) = element.child(properties::ELEMENT) {
        for p in section.children_named(properties::property::ELEMENT) {
            let key = required_attr(p, properties::property::NAME)?;
            props.insert(key.to_string(), p.text.clone());
        }
    }
    Ok(props)
}

fn add_change_history(elem: &mut Element, history: &ChangeHistory) {
    elem.set_optional_attribute(common::LAST_CHANGED_BY, history.last_changed_by.as_deref());
    elem.set_optional_attribute(
        common::LAST_CHANGED_DATE,
        history.last_changed_date.as_ref().map(format_date),
    );
    elem.set_optional_attribute(common::CREATED_BY, history.created_by.as_deref());
    elem.set_optional_attribute(
        common::CREATION_DATE,
        history.creation_date.as_ref().map(format_date),
    );
}

fn restore_change_history(
    element: &Element,
    target: &mut dyn ChangeTracked,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<()> {
    let created_by = element.attribute(common::CREATED_BY);
    let creation_date = date_attr(element, common::CREATION_DATE)?;
    if created_by.is_some() || creation_date.is_some() {
        editor.set_creation_changed_history(target, created_by, creation_date);
    }

    let changed_by = element.attribute(common::LAST_CHANGED_BY);
    let changed_date = date_attr(element, common::LAST_CHANGED_DATE)?;
    if changed_by.is_some() || changed_date.is_some() {
        editor.set_last_changed_history(target, changed_by, changed_date);
    }
    Ok(())
}

/// Shared shape of every component object element.
fn object_element(tag: &str, obj: &dyn ComponentObject) -> Element {
    let mut elem = Element::new(tag)
        .with_attribute(common::NAME, obj.name())
        .with_attribute(common::COMPONENT_TYPE, obj.component_type_id().name());
    add_change_history(&mut elem, obj.history());
    elem.add_child(create_properties_element(obj.properties()));
    elem
}

fn restore_object<T: ComponentObject>(
    element: &Element,
    target: &mut T,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<()> {
    let props = read_properties(element)?;
    editor.modify_properties(target, &props);
    restore_change_history(element, target, editor)?;
    log::debug!("mapped <{}> to {}", element.name, target.label());
    Ok(())
}

// ─── Object → Element ───────────────────────────────────────────────

pub fn create_configuration_element(cfg: &Configuration) -> Element {
    object_element(configuration::ELEMENT, cfg)
}

pub fn create_host_element(h: &Host) -> Element {
    object_element(host::ELEMENT, h)
}

pub fn create_process_element(vm: &VmComponentDefn) -> Element {
    object_element(process::ELEMENT, vm)
}

pub fn create_deployed_service_element(deployed: &DeployedComponent) -> Element {
    let mut elem = object_element(deployed_service::ELEMENT, deployed);
    if let Some(service) = &deployed.service {
        elem.set_attribute(deployed_service::SERVICE_DEFINITION, service.name());
    }
    elem
}

pub fn create_service_element(service: &ServiceComponentDefn) -> Element {
    object_element(services::service::ELEMENT, service)
}

pub fn create_connector_binding_element(binding: &ConnectorBinding) -> Element {
    let mut elem = object_element(connector_bindings::binding::ELEMENT, binding);
    elem.set_attribute(connector_bindings::binding::ROUTING_UUID, binding.routing_uuid.as_str());
    elem
}

pub fn create_shared_resource_element(resource: &SharedResource) -> Element {
    object_element(shared_resources::resource::ELEMENT, resource)
}

pub fn create_authentication_provider_element(provider: &AuthenticationProvider) -> Element {
    object_element(authentication_providers::provider::ELEMENT, provider)
}

pub fn create_resource_element(resource: &ResourceDescriptor) -> Element {
    object_element(resources::resource::ELEMENT, resource)
}

pub fn create_component_type_element(ct: &ComponentType) -> Element {
    use component_types::component_type as names;

    let mut elem = Element::new(names::ELEMENT)
        .with_attribute(common::NAME, ct.name())
        .with_attribute(names::COMPONENT_TYPE_CODE, ct.type_code.code().to_string())
        .with_attribute(names::DEPLOYABLE, bool_str(ct.deployable))
        .with_attribute(names::MONITORABLE, bool_str(ct.monitorable));
    if ct.deprecated {
        elem.set_attribute(names::DEPRECATED, bool_str(true));
    }
    elem.set_optional_attribute(names::SUPER_COMPONENT_TYPE, ct.super_type.as_ref().map(|t| t.name()));
    elem.set_optional_attribute(names::PARENT_COMPONENT_TYPE, ct.parent_type.as_ref().map(|t| t.name()));
    add_change_history(&mut elem, &ct.history);

    for defn in &ct.property_definitions {
        elem.add_child(create_property_definition_element(defn));
    }
    elem
}

/// Attributes equal to their documented default are left out.
pub fn create_property_definition_element(defn: &PropertyDefinition) -> Element {
    use property_definition as names;

    let mut elem = Element::new(names::ELEMENT).with_attribute(names::NAME, defn.name.as_str());
    if defn.display_name != defn.name {
        elem.set_attribute(names::DISPLAY_NAME, defn.display_name.as_str());
    }
    if !defn.short_description.is_empty() {
        elem.set_attribute(names::SHORT_DESCRIPTION, defn.short_description.as_str());
    }
    if defn.property_type != DEFAULT_PROPERTY_TYPE {
        elem.set_attribute(names::PROPERTY_TYPE, defn.property_type.as_str());
    }
    elem.set_optional_attribute(names::DEFAULT_VALUE, defn.default_value.as_deref());
    if defn.required {
        elem.set_attribute(names::IS_REQUIRED, bool_str(true));
    }
    if defn.expert {
        elem.set_attribute(names::IS_EXPERT, bool_str(true));
    }
    if defn.masked {
        elem.set_attribute(names::IS_MASKED, bool_str(true));
    }
    if !defn.modifiable {
        elem.set_attribute(names::IS_MODIFIABLE, bool_str(false));
    }
    if defn.hidden {
        elem.set_attribute(names::IS_HIDDEN, bool_str(true));
    }
    if defn.requires_restart != RestartType::None {
        elem.set_attribute(names::REQUIRES_RESTART, defn.requires_restart.as_str());
    }

    for value in &defn.allowed_values {
        elem.add_child(Element::new(names::allowed_value::ELEMENT).with_text(value.as_str()));
    }
    elem
}

// ─── Element → Object ───────────────────────────────────────────────

pub fn create_configuration(
    element: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<Configuration> {
    expect_tag(element, configuration::ELEMENT)?;
    let name = object_name(element, name_override)?;
    let ct = component_type_attr(element)?;

    let mut cfg = editor.create_configuration(&name, &ct);
    restore_object(element, &mut cfg, editor)?;
    Ok(cfg)
}

pub fn create_host(
    element: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<Host> {
    expect_tag(element, host::ELEMENT)?;
    let name = object_name(element, None)?;
    let ct = component_type_attr(element)?;

    let mut host = editor.create_host(configuration, &ct, &name);
    restore_object(element, &mut host, editor)?;
    Ok(host)
}

pub fn create_process(
    element: &Element,
    configuration: &ConfigurationId,
    host: &HostId,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<VmComponentDefn> {
    expect_tag(element, process::ELEMENT)?;
    let name = object_name(element, None)?;
    let ct = component_type_attr(element)?;

    let mut vm = editor.create_vm_component_defn(configuration, host, &ct, &name);
    restore_object(element, &mut vm, editor)?;
    Ok(vm)
}

/// The deployed service's reference class follows its component type:
/// connector types produce a [`ConnectorBindingId`], anything else a
/// [`ServiceComponentDefnId`].
pub fn create_deployed_service(
    element: &Element,
    configuration: &ConfigurationId,
    vm: &VmComponentDefnId,
    component_types: &HashMap<ComponentTypeId, ComponentType>,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<DeployedComponent> {
    expect_tag(element, deployed_service::ELEMENT)?;
    let name = object_name(element, None)?;
    let ct = component_type_attr(element)?;

    let component_type = component_types.get(&ct).ok_or_else(|| {
        ConfigError::not_resolvable(
            format!("DeployedService {}.{}", vm, name),
            ct.name(),
            cfgx_core::resolver::KIND_COMPONENT_TYPE,
        )
    })?;

    // No ServiceDefinition means a deployment without a service reference.
    let service = element
        .attribute(deployed_service::SERVICE_DEFINITION)
        .filter(|s| !s.trim().is_empty())
        .map(|service_name| {
            if component_type.is_connector() {
                DeployedServiceRef::Connector(ConnectorBindingId::new(service_name))
            } else {
                DeployedServiceRef::Service(ServiceComponentDefnId::new(service_name))
            }
        });

    let mut deployed =
        editor.create_deployed_service_component(&name, configuration, vm, service, &ct);
    restore_object(element, &mut deployed, editor)?;
    Ok(deployed)
}

pub fn create_service(
    element: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<ServiceComponentDefn> {
    expect_tag(element, services::service::ELEMENT)?;
    let name = object_name(element, name_override)?;
    let ct = component_type_attr(element)?;

    let mut service = editor.create_service_component_defn(configuration, &ct, &name);
    restore_object(element, &mut service, editor)?;
    Ok(service)
}

pub fn create_connector_binding(
    element: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<ConnectorBinding> {
    expect_tag(element, connector_bindings::binding::ELEMENT)?;
    let name = object_name(element, name_override)?;
    let ct = component_type_attr(element)?;
    let routing = element.attribute(connector_bindings::binding::ROUTING_UUID);

    let mut binding = editor.create_connector_component(configuration, &ct, &name, routing);
    restore_object(element, &mut binding, editor)?;
    Ok(binding)
}

pub fn create_shared_resource(
    element: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<SharedResource> {
    expect_tag(element, shared_resources::resource::ELEMENT)?;
    let name = object_name(element, name_override)?;
    let ct = component_type_attr(element)?;

    let mut resource = editor.create_shared_resource(&ct, &name);
    restore_object(element, &mut resource, editor)?;
    Ok(resource)
}

pub fn create_authentication_provider(
    element: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<AuthenticationProvider> {
    expect_tag(element, authentication_providers::provider::ELEMENT)?;
    let name = object_name(element, None)?;
    let ct = component_type_attr(element)?;

    let mut provider = editor.create_authentication_provider(configuration, &ct, &name);
    restore_object(element, &mut provider, editor)?;
    Ok(provider)
}

pub fn create_resource(
    element: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<ResourceDescriptor> {
    expect_tag(element, resources::resource::ELEMENT)?;
    let name = object_name(element, None)?;
    let ct = component_type_attr(element)?;

    let mut resource = editor.create_resource_descriptor(configuration, &ct, &name);
    restore_object(element, &mut resource, editor)?;
    Ok(resource)
}

pub fn create_component_type(
    element: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<ComponentType> {
    use component_types::component_type as names;

    expect_tag(element, names::ELEMENT)?;
    let name = object_name(element, name_override)?;

    let code_str = required_attr(element, names::COMPONENT_TYPE_CODE)?;
    let code = code_str
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(ComponentTypeCode::from_code)
        .ok_or_else(|| invalid_attr(element, names::COMPONENT_TYPE_CODE, code_str))?;

    let parent = element
        .attribute(names::PARENT_COMPONENT_TYPE)
        .filter(|s| !s.trim().is_empty())
        .map(ComponentTypeId::new);
    let super_type = element
        .attribute(names::SUPER_COMPONENT_TYPE)
        .filter(|s| !s.trim().is_empty())
        .map(ComponentTypeId::new);
    let deployable = bool_attr(element, names::DEPLOYABLE, false)?;
    let monitorable = bool_attr(element, names::MONITORABLE, false)?;

    let mut ct = editor.create_component_type(
        code,
        &name,
        parent.as_ref(),
        super_type.as_ref(),
        deployable,
        monitorable,
    );
    ct.deprecated = bool_attr(element, names::DEPRECATED, false)?;

    let definitions = element
        .children_named(property_definition::ELEMENT)
        .map(create_property_definition)
        .collect::<ConfigResult<Vec<_>>>()?;
    if !definitions.is_empty() {
        editor.add_property_definitions(&mut ct, definitions);
    }

    restore_change_history(element, &mut ct, editor)?;
    log::debug!("mapped <{}> to {}", element.name, ct.label());
    Ok(ct)
}

/// Absent attributes fall back to the defaults of [`PropertyDefinition::new`].
pub fn create_property_definition(element: &Element) -> ConfigResult<PropertyDefinition> {
    use property_definition as names;

    expect_tag(element, names::ELEMENT)?;
    let mut defn = PropertyDefinition::new(required_attr(element, names::NAME)?);

    if let Some(v) = element.attribute(names::DISPLAY_NAME) {
        defn.display_name = v.to_string();
    }
    if let Some(v) = element.attribute(names::SHORT_DESCRIPTION) {
        defn.short_description = v.to_string();
    }
    if let Some(v) = element.attribute(names::PROPERTY_TYPE) {
        defn.property_type = v.to_string();
    }
    defn.default_value = element.attribute(names::DEFAULT_VALUE).map(str::to_string);
    defn.required = bool_attr(element, names::IS_REQUIRED, defn.required)?;
    defn.expert = bool_attr(element, names::IS_EXPERT, defn.expert)?;
    defn.masked = bool_attr(element, names::IS_MASKED, defn.masked)?;
    defn.modifiable = bool_attr(element, names::IS_MODIFIABLE, defn.modifiable)?;
    defn.hidden = bool_attr(element, names::IS_HIDDEN, defn.hidden)?;
    if let Some(v) = element.attribute(names::REQUIRES_RESTART) {
        defn.requires_restart = RestartType::from_str_loose(v)
            .ok_or_else(|| invalid_attr(element, names::REQUIRES_RESTART, v))?;
    }

    defn.allowed_values = element
        .children_named(names::allowed_value::ELEMENT)
        .map(|e| e.text.clone())
        .collect();
    Ok(defn)
}
