//! Fixture collections shared by the integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};

use cfgx::*;

pub fn component_type(name: &str, code: ComponentTypeCode, super_type: Option<&str>) -> ComponentType {
    ComponentType {
        id: ComponentTypeId::new(name),
        type_code: code,
        deployable: true,
        monitorable: true,
        deprecated: false,
        super_type: super_type.map(ComponentTypeId::new),
        parent_type: None,
        property_definitions: Vec::new(),
        history: ChangeHistory::default(),
    }
}

pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn history(by: &str) -> ChangeHistory {
    ChangeHistory {
        created_by: Some(by.to_string()),
        creation_date: Some(Utc.with_ymd_and_hms(2023, 11, 5, 9, 15, 0).unwrap()),
        last_changed_by: Some(by.to_string()),
        last_changed_date: Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()),
    }
}

/// Configuration "Next" with host H1, process P1, connector binding CB1
/// (type Oracle) deployed into P1, plus one object of every other kind.
pub fn sample_collection() -> Vec<ConfigObject> {
    let cfg = ConfigurationId::new("Next");
    let host = HostId::new("H1");
    let vm = VmComponentDefnId::new(host.clone(), "P1");

    let mut oracle = component_type("Oracle", ComponentTypeCode::Connector, Some("JDBC"));
    oracle.property_definitions = vec![
        PropertyDefinition::new("URL"),
        PropertyDefinition::new("ConnectorClassPath").with_default("extensionjar:ora.jar;extensionjar:jdbc.jar"),
    ];
    oracle.history = history("installer");

    vec![
        oracle.into(),
        component_type("Configuration", ComponentTypeCode::Configuration, None).into(),
        component_type("Host", ComponentTypeCode::Host, None).into(),
        component_type("VM", ComponentTypeCode::Vm, None).into(),
        component_type("QueryService", ComponentTypeCode::Service, None).into(),
        component_type("JDBC", ComponentTypeCode::Connector, Some("Connector")).into(),
        component_type("Connector", ComponentTypeCode::Product, None).into(),
        component_type("Pool", ComponentTypeCode::SharedResource, None).into(),
        component_type("Membership", ComponentTypeCode::AuthenticationProvider, None).into(),
        component_type("DataSource", ComponentTypeCode::Resource, None).into(),
        Configuration {
            id: cfg.clone(),
            component_type_id: ComponentTypeId::new("Configuration"),
            properties: props(&[("system.name", "Next")]),
            history: history("admin"),
        }
        .into(),
        Host {
            id: host.clone(),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("Host"),
            properties: props(&[("hostname", "h1.example.com"), ("port", "31000")]),
            history: history("admin"),
        }
        .into(),
        VmComponentDefn {
            id: vm.clone(),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("VM"),
            properties: props(&[("heap", "512m")]),
            history: ChangeHistory::default(),
        }
        .into(),
        ConnectorBinding {
            id: ConnectorBindingId::new("CB1"),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("Oracle"),
            routing_uuid: "6c1f0b8e-9b1d-4c53-a1d4-5f8e2b1a7c90".into(),
            properties: props(&[("URL", "jdbc:oracle:thin:@db:1521:orcl"), ("User", "scott")]),
            history: history("admin"),
        }
        .into(),
        ServiceComponentDefn {
            id: ServiceComponentDefnId::new("Query"),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("QueryService"),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
        .into(),
        SharedResource {
            id: SharedResourceId::new("ConnectionPool"),
            component_type_id: ComponentTypeId::new("Pool"),
            properties: props(&[("size", "10")]),
            history: ChangeHistory::default(),
        }
        .into(),
        AuthenticationProvider {
            id: AuthenticationProviderId::new("Internal"),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("Membership"),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
        .into(),
        ResourceDescriptor {
            id: ResourceDescriptorId::new("Logging"),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("DataSource"),
            properties: props(&[("level", "INFO")]),
            history: ChangeHistory::default(),
        }
        .into(),
        DeployedComponent {
            id: DeployedComponentId::new(vm.clone(), "CB1"),
            configuration_id: cfg.clone(),
            service: Some(DeployedServiceRef::Connector(ConnectorBindingId::new("CB1"))),
            component_type_id: ComponentTypeId::new("Oracle"),
            properties: Properties::new(),
            history: ChangeHistory::default(),
        }
        .into(),
        DeployedComponent {
            id: DeployedComponentId::new(vm, "Query"),
            configuration_id: cfg,
            service: Some(DeployedServiceRef::Service(ServiceComponentDefnId::new("Query"))),
            component_type_id: ComponentTypeId::new("QueryService"),
            properties: props(&[("threads", "4")]),
            history: ChangeHistory::default(),
        }
        .into(),
    ]
}

/// [`sample_collection`] plus host H2 with processes P2 and P3. Adds a
/// deployment without a service reference, padded and whitespace-only
/// property values, and change history stamped with the current time.
pub fn multi_host_collection() -> Vec<ConfigObject> {
    let cfg = ConfigurationId::new("Next");
    let h2 = HostId::new("H2");
    let p2 = VmComponentDefnId::new(h2.clone(), "P2");
    let p3 = VmComponentDefnId::new(h2.clone(), "P3");
    let now = ChangeHistory {
        created_by: Some("ops".into()),
        creation_date: Some(Utc::now()),
        last_changed_by: Some("ops".into()),
        last_changed_date: Some(Utc::now()),
    };

    let mut objects = sample_collection();
    for obj in objects.iter_mut() {
        if let ConfigObject::ComponentType(ct) = obj {
            if ct.name() == "QueryService" {
                let mut mode = PropertyDefinition::new("mode");
                mode.allowed_values = vec![" fast ".into(), "safe".into(), "  ".into()];
                ct.property_definitions.push(mode);
            }
        }
    }

    let vm = |id: &VmComponentDefnId| -> ConfigObject {
        VmComponentDefn {
            id: id.clone(),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("VM"),
            properties: props(&[("heap", "1g")]),
            history: now.clone(),
        }
        .into()
    };

    objects.extend([
        Host {
            id: h2.clone(),
            configuration_id: cfg.clone(),
            component_type_id: ComponentTypeId::new("Host"),
            properties: props(&[("sep", " ; "), ("pad", "  x  "), ("blank", "   ")]),
            history: now.clone(),
        }
        .into(),
        vm(&p2),
        vm(&p3),
        DeployedComponent {
            id: DeployedComponentId::new(p2.clone(), "CB1"),
            configuration_id: cfg.clone(),
            service: Some(DeployedServiceRef::Connector(ConnectorBindingId::new("CB1"))),
            component_type_id: ComponentTypeId::new("Oracle"),
            properties: Properties::new(),
            history: now.clone(),
        }
        .into(),
        DeployedComponent {
            id: DeployedComponentId::new(p3.clone(), "Query"),
            configuration_id: cfg.clone(),
            service: Some(DeployedServiceRef::Service(ServiceComponentDefnId::new("Query"))),
            component_type_id: ComponentTypeId::new("QueryService"),
            properties: props(&[("mode", " fast ")]),
            history: ChangeHistory::default(),
        }
        .into(),
        DeployedComponent {
            id: DeployedComponentId::new(p3, "QueryDeploy"),
            configuration_id: cfg,
            service: None,
            component_type_id: ComponentTypeId::new("QueryService"),
            properties: Properties::new(),
            history: now,
        }
        .into(),
    ]);
    objects
}
