//! Every element and attribute name used by the ConfigurationDocument format.

/// Attributes shared by all object elements.
pub mod common {
    pub const NAME: &str = "Name";
    pub const COMPONENT_TYPE: &str = "ComponentType";
    pub const LAST_CHANGED_BY: &str = "LastChangedBy";
    pub const LAST_CHANGED_DATE: &str = "LastChangedDate";
    pub const CREATED_BY: &str = "CreatedBy";
    pub const CREATION_DATE: &str = "CreationDate";
}

pub mod document {
    pub const ELEMENT: &str = "ConfigurationDocument";
}

pub mod header {
    pub const ELEMENT: &str = "Header";
    pub const USER_CREATED_BY: &str = "UserCreatedBy";
    pub const APPLICATION_CREATED_BY: &str = "ApplicationCreatedBy";
    pub const APPLICATION_VERSION_CREATED_BY: &str = "ApplicationVersionCreatedBy";
    pub const SYSTEM_VERSION: &str = "SystemVersion";
    pub const DOCUMENT_TYPE_VERSION: &str = "DocumentTypeVersion";
    pub const TIME: &str = "Time";
}

pub mod properties {
    pub const ELEMENT: &str = "Properties";

    pub mod property {
        pub const ELEMENT: &str = "Property";
        pub const NAME: &str = "Name";
    }
}

pub mod configuration {
    pub const ELEMENT: &str = "Configuration";
}

pub mod host {
    pub const ELEMENT: &str = "Host";
}

pub mod process {
    pub const ELEMENT: &str = "Process";
}

pub mod deployed_service {
    pub const ELEMENT: &str = "DeployedService";
    /// Name of the service or connector binding being deployed.
    pub const SERVICE_DEFINITION: &str = "ServiceDefinition";
}

pub mod authentication_providers {
    pub const ELEMENT: &str = "AuthenticationProviders";

    pub mod provider {
        pub const ELEMENT: &str = "AuthenticationProvider";
    }
}

pub mod connector_bindings {
    pub const ELEMENT: &str = "ConnectorBindings";

    pub mod binding {
        pub const ELEMENT: &str = "ConnectorBinding";
        pub const ROUTING_UUID: &str = "RoutingUUID";
    }
}

pub mod services {
    pub const ELEMENT: &str = "Services";

    pub mod service {
        pub const ELEMENT: &str = "Service";
    }
}

pub mod shared_resources {
    pub const ELEMENT: &str = "SharedResources";

    pub mod resource {
        pub const ELEMENT: &str = "SharedResource";
    }
}

pub mod resources {
    pub const ELEMENT: &str = "Resources";

    pub mod resource {
        pub const ELEMENT: &str = "Resource";
    }
}

pub mod component_types {
    pub const ELEMENT: &str = "ComponentTypes";

    pub mod component_type {
        pub const ELEMENT: &str = "ComponentType";
        pub const COMPONENT_TYPE_CODE: &str = "ComponentTypeCode";
        pub const DEPLOYABLE: &str = "Deployable";
        pub const DEPRECATED: &str = "Deprecated";
        pub const MONITORABLE: &str = "Monitorable";
        pub const SUPER_COMPONENT_TYPE: &str = "SuperComponentType";
        pub const PARENT_COMPONENT_TYPE: &str = "ParentComponentType";
    }
}

pub mod property_definition {
    pub const ELEMENT: &str = "PropertyDefinition";
    pub const NAME: &str = "Name";
    pub const DISPLAY_NAME: &str = "DisplayName";
    pub const SHORT_DESCRIPTION: &str = "ShortDescription";
    pub const PROPERTY_TYPE: &str = "PropertyType";
    pub const DEFAULT_VALUE: &str = "DefaultValue";
    pub const IS_REQUIRED: &str = "IsRequired";
    pub const IS_EXPERT: &str = "IsExpert";
    pub const IS_MASKED: &str = "IsMasked";
    pub const IS_MODIFIABLE: &str = "IsModifiable";
    pub const IS_HIDDEN: &str = "IsHidden";
    pub const REQUIRES_RESTART: &str = "RequiresRestart";

    pub mod allowed_value {
        pub const ELEMENT: &str = "AllowedValue";
    }
}
