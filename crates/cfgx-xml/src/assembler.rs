//! Document assembler — whole `ConfigurationDocument`s.
//!
//! ## Export
//!
//! Segregate → resolve → assemble → write. The configuration element nests
//! `Host` → `Process` → `DeployedService`, followed by the configuration
//! level sections. `ComponentTypes` sits at the document root, ordered so a
//! type always follows its super and parent type.
//!
//! ## Import
//!
//! Configuration → ComponentTypes → SharedResources → AuthenticationProviders
//! → ConnectorBindings → Services → Resources → Hosts (Processes
//! (DeployedServices)). The imported collection is resolved before it is
//! returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;

use cfgx_core::resolver::KIND_COMPONENT_TYPE;
use cfgx_core::*;

use super::element::Element;
use super::element_names::*;
use super::mapper;
use super::type_order::{order_component_type_elements, order_component_types};
use super::xml_writer::write_document;

/// Version stamped into every exported header.
pub const DOCUMENT_TYPE_VERSION: &str = "1.0";

/// Reference kind reported when a mandatory document section is absent.
pub const KIND_DOCUMENT_SECTION: &str = "document section";

// ─── Header ─────────────────────────────────────────────────────────

/// Metadata block written at the top of every document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    pub user_created_by: Option<String>,
    pub application_created_by: Option<String>,
    pub application_version_created_by: Option<String>,
    pub system_version: Option<String>,
    pub document_type_version: Option<String>,
    pub time: Option<DateTime<Utc>>,
}

pub fn create_header_element(meta: &DocumentHeader) -> Element {
    let mut elem = Element::new(header::ELEMENT);
    let time = meta.time.unwrap_or_else(Utc::now);
    let doc_version = meta
        .document_type_version
        .as_deref()
        .unwrap_or(DOCUMENT_TYPE_VERSION);

    let fields = [
        (header::USER_CREATED_BY, meta.user_created_by.as_deref()),
        (header::APPLICATION_CREATED_BY, meta.application_created_by.as_deref()),
        (
            header::APPLICATION_VERSION_CREATED_BY,
            meta.application_version_created_by.as_deref(),
        ),
        (header::SYSTEM_VERSION, meta.system_version.as_deref()),
        (header::DOCUMENT_TYPE_VERSION, Some(doc_version)),
    ];
    for (tag, value) in fields {
        if let Some(v) = value {
            elem.add_child(Element::new(tag).with_text(v));
        }
    }
    elem.add_child(Element::new(header::TIME).with_text(mapper::format_date(&time)));
    elem
}

/// The header of `root`, if it has one. Unparseable times read as `None`.
pub fn read_header(root: &Element) -> Option<DocumentHeader> {
    let elem = root.child(header::ELEMENT)?;
    let text = |tag: &str| {
        elem.child(tag)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };

    Some(DocumentHeader {
        user_created_by: text(header::USER_CREATED_BY),
        application_created_by: text(header::APPLICATION_CREATED_BY),
        application_version_created_by: text(header::APPLICATION_VERSION_CREATED_BY),
        system_version: text(header::SYSTEM_VERSION),
        document_type_version: text(header::DOCUMENT_TYPE_VERSION),
        time: text(header::TIME)
            .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
            .map(|t| t.with_timezone(&Utc)),
    })
}

fn document_root(header: &DocumentHeader) -> Element {
    Element::new(document::ELEMENT).with_child(create_header_element(header))
}

fn section(tag: &str, children: Vec<Element>) -> Option<Element> {
    if children.is_empty() {
        return None;
    }
    let mut elem = Element::new(tag);
    elem.children = children;
    Some(elem)
}

fn component_types_section(types: &[&ComponentType]) -> ConfigResult<Option<Element>> {
    let ordered = order_component_types(types)?;
    Ok(section(
        component_types::ELEMENT,
        ordered
            .into_iter()
            .map(mapper::create_component_type_element)
            .collect(),
    ))
}

// ─── Configuration Export ───────────────────────────────────────────

/// Build the full document for a collection holding exactly one configuration.
pub fn build_configuration_document(
    objects: &[ConfigObject],
    header: &DocumentHeader,
) -> ConfigResult<Element> {
    let seg = segregate(objects);
    seg.resolve()?;

    let cfg = match seg.configurations.as_slice() {
        [cfg] => *cfg,
        [] => {
            return Err(ConfigError::InvalidArgument(
                "collection contains no configuration".into(),
            ))
        }
        many => {
            return Err(ConfigError::InvalidArgument(format!(
                "a document holds one configuration, collection contains {}",
                many.len()
            )))
        }
    };

    let mut cfg_elem = mapper::create_configuration_element(cfg);

    for h in &seg.hosts {
        let mut host_elem = mapper::create_host_element(h);
        for vm in seg.vms.iter().filter(|vm| vm.host_id() == &h.id) {
            let mut process_elem = mapper::create_process_element(vm);
            for d in seg.deployed_components.iter().filter(|d| d.vm_id() == &vm.id) {
                process_elem.add_child(mapper::create_deployed_service_element(d));
            }
            host_elem.add_child(process_elem);
        }
        cfg_elem.add_child(host_elem);
    }

    let sections = [
        section(
            authentication_providers::ELEMENT,
            seg.authentication_providers
                .iter()
                .map(|p| mapper::create_authentication_provider_element(p))
                .collect(),
        ),
        section(
            connector_bindings::ELEMENT,
            seg.connector_bindings
                .iter()
                .map(|b| mapper::create_connector_binding_element(b))
                .collect(),
        ),
        section(
            services::ELEMENT,
            seg.services
                .iter()
                .map(|s| mapper::create_service_element(s))
                .collect(),
        ),
        section(
            shared_resources::ELEMENT,
            seg.shared_resources
                .iter()
                .map(|r| mapper::create_shared_resource_element(r))
                .collect(),
        ),
        section(
            resources::ELEMENT,
            seg.resource_descriptors
                .iter()
                .map(|r| mapper::create_resource_element(r))
                .collect(),
        ),
    ];
    for s in sections.into_iter().flatten() {
        cfg_elem.add_child(s);
    }

    let mut root = document_root(header);
    root.add_child(cfg_elem);
    if let Some(types) = component_types_section(&seg.component_types)? {
        root.add_child(types);
    }

    log::info!(
        "assembled configuration '{}': {} hosts, {} processes, {} bindings, {} types",
        cfg.id,
        seg.hosts.len(),
        seg.vms.len(),
        seg.connector_bindings.len(),
        seg.component_types.len()
    );
    Ok(root)
}

/// Export `objects` to `out`. The writer is consumed.
pub fn export_configuration<W: Write>(
    objects: &[ConfigObject],
    header: &DocumentHeader,
    out: W,
    indent: usize,
) -> ConfigResult<()> {
    let root = build_configuration_document(objects, header)?;
    write_document(&root, out, indent)
}

// ─── Configuration Import ───────────────────────────────────────────

fn missing_section(section: &str) -> ConfigError {
    ConfigError::not_resolvable(document::ELEMENT, section, KIND_DOCUMENT_SECTION)
}

fn import_types(
    root: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<Vec<ComponentType>> {
    let elements: Vec<&Element> = root
        .child(component_types::ELEMENT)
        .map(|s| s.children_named(component_types::component_type::ELEMENT).collect())
        .unwrap_or_default();
    let ordered = order_component_type_elements(&elements)?;

    ordered
        .into_iter()
        .map(|e| mapper::create_component_type(e, editor, name_override))
        .collect()
}

fn section_children<'a>(parent: &'a Element, section: &str, tag: &'a str) -> Vec<&'a Element> {
    parent
        .child(section)
        .map(|s| s.children_named(tag).collect())
        .unwrap_or_default()
}

/// Rebuild the object collection described by `root`.
///
/// `name_override` renames the configuration.
pub fn import_configuration(
    root: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<Vec<ConfigObject>> {
    mapper::expect_tag(root, document::ELEMENT)?;
    let cfg_elem = root
        .child(configuration::ELEMENT)
        .ok_or_else(|| missing_section(configuration::ELEMENT))?;

    let cfg = mapper::create_configuration(cfg_elem, editor, name_override)?;
    let cfg_id = cfg.id.clone();
    let mut objects: Vec<ConfigObject> = vec![cfg.into()];

    let types = import_types(root, editor, None)?;
    let type_map: HashMap<ComponentTypeId, ComponentType> =
        types.iter().map(|t| (t.id.clone(), t.clone())).collect();
    objects.extend(types.into_iter().map(ConfigObject::from));

    for e in section_children(cfg_elem, shared_resources::ELEMENT, shared_resources::resource::ELEMENT) {
        objects.push(mapper::create_shared_resource(e, editor, None)?.into());
    }
    for e in section_children(
        cfg_elem,
        authentication_providers::ELEMENT,
        authentication_providers::provider::ELEMENT,
    ) {
        objects.push(mapper::create_authentication_provider(e, &cfg_id, editor)?.into());
    }
    for e in section_children(cfg_elem, connector_bindings::ELEMENT, connector_bindings::binding::ELEMENT) {
        objects.push(mapper::create_connector_binding(e, &cfg_id, editor, None)?.into());
    }
    for e in section_children(cfg_elem, services::ELEMENT, services::service::ELEMENT) {
        objects.push(mapper::create_service(e, &cfg_id, editor, None)?.into());
    }
    for e in section_children(cfg_elem, resources::ELEMENT, resources::resource::ELEMENT) {
        objects.push(mapper::create_resource(e, &cfg_id, editor)?.into());
    }

    for host_elem in cfg_elem.children_named(host::ELEMENT) {
        let h = mapper::create_host(host_elem, &cfg_id, editor)?;
        let host_id = h.id.clone();
        objects.push(h.into());

        for process_elem in host_elem.children_named(process::ELEMENT) {
            let vm = mapper::create_process(process_elem, &cfg_id, &host_id, editor)?;
            let vm_id = vm.id.clone();
            objects.push(vm.into());

            for deployed_elem in process_elem.children_named(deployed_service::ELEMENT) {
                let d = mapper::create_deployed_service(deployed_elem, &cfg_id, &vm_id, &type_map, editor)?;
                objects.push(d.into());
            }
        }
    }

    resolve_configuration_objects(&objects)?;
    log::info!("imported configuration '{}' ({} objects)", cfg_id, objects.len());
    Ok(objects)
}

// ─── Component Types ────────────────────────────────────────────────

/// A ComponentTypes-only document.
///
/// Super and parent types outside `types` are allowed, so the result is not
/// resolved.
pub fn build_component_types_document(
    types: &[ComponentType],
    header: &DocumentHeader,
) -> ConfigResult<Element> {
    let refs: Vec<&ComponentType> = types.iter().collect();
    let mut root = document_root(header);
    if let Some(section) = component_types_section(&refs)? {
        root.add_child(section);
    }
    Ok(root)
}

pub fn export_component_types<W: Write>(
    types: &[ComponentType],
    header: &DocumentHeader,
    out: W,
    indent: usize,
) -> ConfigResult<()> {
    let root = build_component_types_document(types, header)?;
    write_document(&root, out, indent)
}

/// Types from a ComponentTypes document in creation order.
///
/// `name_override` renames the type when the document holds exactly one.
pub fn import_component_types(
    root: &Element,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<Vec<ComponentType>> {
    mapper::expect_tag(root, document::ELEMENT)?;
    let count = section_children(
        root,
        component_types::ELEMENT,
        component_types::component_type::ELEMENT,
    )
    .len();
    let types = import_types(root, editor, single_override(name_override, count, "component types"))?;
    log::info!("imported {} component types", types.len());
    Ok(types)
}

fn single_override<'a>(name_override: Option<&'a str>, count: usize, what: &str) -> Option<&'a str> {
    match name_override {
        Some(name) if count != 1 => {
            log::warn!(
                "ignoring name override '{}': document holds {} {}",
                name,
                count,
                what
            );
            None
        }
        other => other,
    }
}

// ─── Connector Bindings ─────────────────────────────────────────────

/// Bindings plus the component types they use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedBindings {
    pub bindings: Vec<ConnectorBinding>,
    pub component_types: Vec<ComponentType>,
}

/// A document with `ConnectorBindings` and the `ComponentTypes` they use.
///
/// Every binding's type must be in `types`.
pub fn build_connector_bindings_document(
    bindings: &[ConnectorBinding],
    types: &[ComponentType],
    header: &DocumentHeader,
) -> ConfigResult<Element> {
    let mut used: HashSet<&ComponentTypeId> = HashSet::new();
    for b in bindings {
        if !types.iter().any(|t| t.id == b.component_type_id) {
            return Err(ConfigError::not_resolvable(
                b.label(),
                b.component_type_id.name(),
                KIND_COMPONENT_TYPE,
            ));
        }
        used.insert(&b.component_type_id);
    }
    let used_types: Vec<&ComponentType> = types.iter().filter(|t| used.contains(&t.id)).collect();

    let mut root = document_root(header);
    if let Some(section) = section(
        connector_bindings::ELEMENT,
        bindings.iter().map(mapper::create_connector_binding_element).collect(),
    ) {
        root.add_child(section);
    }
    if let Some(section) = component_types_section(&used_types)? {
        root.add_child(section);
    }
    Ok(root)
}

pub fn export_connector_bindings<W: Write>(
    bindings: &[ConnectorBinding],
    types: &[ComponentType],
    header: &DocumentHeader,
    out: W,
    indent: usize,
) -> ConfigResult<()> {
    let root = build_connector_bindings_document(bindings, types, header)?;
    write_document(&root, out, indent)
}

/// Bindings of a bindings document, attached to `configuration`.
///
/// `name_override` renames the binding when the document holds exactly one;
/// otherwise it is ignored with a warning.
pub fn import_connector_bindings(
    root: &Element,
    configuration: &ConfigurationId,
    editor: &mut dyn ConfigurationObjectEditor,
    name_override: Option<&str>,
) -> ConfigResult<ImportedBindings> {
    mapper::expect_tag(root, document::ELEMENT)?;
    let binding_elems = section_children(
        root,
        connector_bindings::ELEMENT,
        connector_bindings::binding::ELEMENT,
    );
    if root.child(connector_bindings::ELEMENT).is_none() {
        return Err(missing_section(connector_bindings::ELEMENT));
    }

    let component_types = import_types(root, editor, None)?;
    let name_override = single_override(name_override, binding_elems.len(), "connector bindings");

    let mut bindings = Vec::with_capacity(binding_elems.len());
    for e in binding_elems {
        let b = mapper::create_connector_binding(e, configuration, editor, name_override)?;
        if !component_types.iter().any(|t| t.id == b.component_type_id) {
            return Err(ConfigError::not_resolvable(
                b.label(),
                b.component_type_id.name(),
                KIND_COMPONENT_TYPE,
            ));
        }
        bindings.push(b);
    }

    log::info!(
        "imported {} connector bindings with {} component types",
        bindings.len(),
        component_types.len()
    );
    Ok(ImportedBindings {
        bindings,
        component_types,
    })
}
