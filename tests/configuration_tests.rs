mod common;

use std::collections::BTreeMap;

use cfgx::xml::parse_document;
use cfgx::*;

fn by_label(objects: &[ConfigObject]) -> BTreeMap<String, ConfigObject> {
    objects.iter().map(|o| (o.label(), o.clone())).collect()
}

fn export(service: &mut ConfigurationImportExport, objects: &[ConfigObject]) -> String {
    let mut buf = Vec::new();
    service.export_configuration(objects, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_exported_document_nests_deployment_under_host_and_process() {
    let mut service = ConfigurationImportExport::default();
    let xml = export(&mut service, &common::sample_collection());

    let root = parse_document(&xml).unwrap();
    assert_eq!(root.name, "ConfigurationDocument");
    assert!(root.child("Header").is_some());

    let cfg = root.child_with_name("Configuration", "Next").unwrap();
    let deployed = cfg
        .find_path(&[("Host", "H1"), ("Process", "P1"), ("DeployedService", "CB1")])
        .unwrap();
    assert_eq!(deployed.attribute("ComponentType"), Some("Oracle"));
    assert_eq!(deployed.attribute("ServiceDefinition"), Some("CB1"));

    let types = root.child("ComponentTypes").unwrap();
    assert!(types.child_with_name("ComponentType", "Oracle").is_some());

    for section in [
        "AuthenticationProviders",
        "ConnectorBindings",
        "Services",
        "SharedResources",
        "Resources",
    ] {
        assert!(cfg.child(section).is_some(), "missing section {}", section);
    }
}

#[test]
fn test_component_types_are_written_after_their_super_types() {
    let mut service = ConfigurationImportExport::default();
    let root = parse_document(&export(&mut service, &common::sample_collection())).unwrap();

    let names: Vec<&str> = root
        .child("ComponentTypes")
        .unwrap()
        .children
        .iter()
        .filter_map(|t| t.attribute("Name"))
        .collect();
    let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
    assert!(pos("Connector") < pos("JDBC"));
    assert!(pos("JDBC") < pos("Oracle"));
}

#[test]
fn test_import_of_export_restores_the_collection() {
    let original = common::sample_collection();
    let mut service = ConfigurationImportExport::default();
    let xml = export(&mut service, &original);

    let mut editor = service.new_editor();
    let imported = service
        .import_configuration(xml.as_bytes(), &mut editor, None)
        .unwrap();

    assert_eq!(imported.len(), original.len());
    assert_eq!(by_label(&imported), by_label(&original));
    assert!(!editor.actions().is_empty());
}

fn round_trip(original: &[ConfigObject]) -> Vec<ConfigObject> {
    let mut service = ConfigurationImportExport::default();
    let xml = export(&mut service, original);
    let mut editor = service.new_editor();
    service
        .import_configuration(xml.as_bytes(), &mut editor, None)
        .unwrap()
}

#[test]
fn test_multi_host_collection_survives_round_trip() {
    let original = common::multi_host_collection();
    assert!(resolve_configuration_objects(&original).is_ok());

    let imported = round_trip(&original);
    assert_eq!(imported.len(), original.len());
    assert_eq!(by_label(&imported), by_label(&original));
}

#[test]
fn test_deployment_without_service_reference_round_trips() {
    let imported = round_trip(&common::multi_host_collection());
    let spare = imported
        .iter()
        .find_map(|o| match o {
            ConfigObject::DeployedComponent(d) if d.id.name == "QueryDeploy" => Some(d),
            _ => None,
        })
        .unwrap();
    assert_eq!(spare.service, None);
    assert_eq!(spare.id.vm, VmComponentDefnId::new(HostId::new("H2"), "P3"));
}

#[test]
fn test_padded_and_blank_values_are_kept_verbatim() {
    let imported = round_trip(&common::multi_host_collection());

    let h2 = imported
        .iter()
        .find_map(|o| match o {
            ConfigObject::Host(h) if h.id.name() == "H2" => Some(h),
            _ => None,
        })
        .unwrap();
    assert_eq!(h2.properties.get("sep").map(String::as_str), Some(" ; "));
    assert_eq!(h2.properties.get("pad").map(String::as_str), Some("  x  "));
    assert_eq!(h2.properties.get("blank").map(String::as_str), Some("   "));

    let query = imported
        .iter()
        .find_map(|o| match o {
            ConfigObject::ComponentType(ct) if ct.name() == "QueryService" => Some(ct),
            _ => None,
        })
        .unwrap();
    let mode = query.property_definition("mode").unwrap();
    assert_eq!(mode.allowed_values, vec![" fast ", "safe", "  "]);
}

#[test]
fn test_current_time_history_keeps_sub_millisecond_precision() {
    let stamped = chrono::Utc::now();
    let mut objects = common::sample_collection();
    for obj in objects.iter_mut() {
        if let ConfigObject::Host(h) = obj {
            h.history.creation_date = Some(stamped);
            h.history.last_changed_date = Some(stamped);
        }
    }

    let imported = round_trip(&objects);
    let host = imported
        .iter()
        .find_map(|o| match o {
            ConfigObject::Host(h) => Some(h),
            _ => None,
        })
        .unwrap();
    assert_eq!(host.history.creation_date, Some(stamped));
    assert_eq!(host.history.last_changed_date, Some(stamped));
}

#[test]
fn test_import_with_name_override_renames_configuration() {
    let mut service = ConfigurationImportExport::default();
    let xml = export(&mut service, &common::sample_collection());

    let mut editor = service.new_editor();
    let imported = service
        .import_configuration(xml.as_bytes(), &mut editor, Some("Staging"))
        .unwrap();

    for obj in &imported {
        if let ConfigObject::Host(h) = obj {
            assert_eq!(h.configuration_id.name(), "Staging");
        }
    }
    assert!(imported
        .iter()
        .any(|o| matches!(o, ConfigObject::Configuration(c) if c.id.name() == "Staging")));
}

#[test]
fn test_regenerated_routing_ids_differ_from_exported_ones() {
    let original = common::sample_collection();
    let mut service = ConfigurationImportExport::new(ImportExportConfig {
        regenerate_routing_ids: true,
        ..Default::default()
    });
    let xml = export(&mut service, &original);

    let mut editor = service.new_editor();
    let imported = service
        .import_configuration(xml.as_bytes(), &mut editor, None)
        .unwrap();

    let routing = |objects: &[ConfigObject]| {
        objects.iter().find_map(|o| match o {
            ConfigObject::ConnectorBinding(b) => Some(b.routing_uuid.clone()),
            _ => None,
        })
    };
    let before = routing(&original).unwrap();
    let after = routing(&imported).unwrap();
    assert_ne!(before, after);
    assert_eq!(after.len(), 36);
}

#[test]
fn test_unknown_vm_component_fails_export() {
    let mut objects = common::sample_collection();
    for obj in objects.iter_mut() {
        if let ConfigObject::DeployedComponent(d) = obj {
            d.id.vm = VmComponentDefnId::new(HostId::new("H1"), "P9");
        }
    }

    let mut service = ConfigurationImportExport::default();
    let mut buf = Vec::new();
    let err = service.export_configuration(&objects, &mut buf).unwrap_err();
    assert_eq!(err.unresolved_kind(), Some("vm component"));
    assert!(buf.is_empty());
    assert!(service.last_export.is_none());
}

#[test]
fn test_document_with_dangling_type_fails_import() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ConfigurationDocument>
    <Configuration Name="Next" ComponentType="Configuration">
        <Host Name="H1" ComponentType="Host"/>
    </Configuration>
    <ComponentTypes>
        <ComponentType Name="Configuration" ComponentTypeCode="0" Deployable="false" Monitorable="false"/>
    </ComponentTypes>
</ConfigurationDocument>"#;

    let mut service = ConfigurationImportExport::default();
    let mut editor = service.new_editor();
    let err = service
        .import_configuration(xml.as_bytes(), &mut editor, None)
        .unwrap_err();
    assert_eq!(err.unresolved_kind(), Some("component type"));
}

#[test]
fn test_host_without_name_is_an_invalid_element() {
    let xml = r#"<ConfigurationDocument>
    <Configuration Name="Next" ComponentType="Configuration">
        <Host ComponentType="Host"/>
    </Configuration>
</ConfigurationDocument>"#;

    let mut service = ConfigurationImportExport::default();
    let mut editor = service.new_editor();
    match service.import_configuration(xml.as_bytes(), &mut editor, None) {
        Err(ConfigError::InvalidElement { element, reason }) => {
            assert_eq!(element, "Host");
            assert_eq!(reason, ElementErrorReason::MissingAttribute("Name"));
        }
        other => panic!("expected invalid element, got {:?}", other),
    }
}
