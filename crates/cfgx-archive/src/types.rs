//! Connector archive data types and archive layout names.

use cfgx_core::{ComponentType, ComponentTypeId, ConfigError, ConfigResult};

/// Paths inside the zip container.
pub mod layout {
    pub const CONNECTOR_TYPES_DIR: &str = "ConnectorTypes";
    pub const SHARED_DIR: &str = "shared";
    pub const MANIFEST_FILE: &str = "Manifest.xml";
    pub const DESCRIPTOR_EXTENSION: &str = "cdk";

    /// `ConnectorTypes/<type>/<type>.cdk`
    pub fn descriptor_path(type_name: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            CONNECTOR_TYPES_DIR, type_name, type_name, DESCRIPTOR_EXTENSION
        )
    }

    /// `ConnectorTypes/<type>/<module>`
    pub fn private_module_path(type_name: &str, module: &str) -> String {
        format!("{}/{}/{}", CONNECTOR_TYPES_DIR, type_name, module)
    }

    /// `ConnectorTypes/shared/<module>`
    pub fn shared_module_path(module: &str) -> String {
        format!("{}/{}/{}", CONNECTOR_TYPES_DIR, SHARED_DIR, module)
    }

    /// The type directory of a descriptor path, if `path` is one.
    pub fn descriptor_dir(path: &str) -> Option<&str> {
        let rest = path.strip_prefix(CONNECTOR_TYPES_DIR)?.strip_prefix('/')?;
        let (dir, file) = rest.split_once('/')?;
        if dir == SHARED_DIR || file.contains('/') {
            return None;
        }
        let stem = file.strip_suffix(DESCRIPTOR_EXTENSION)?.strip_suffix('.')?;
        (!stem.is_empty()).then_some(dir)
    }
}

/// A named binary module a connector type loads at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionModule {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ExtensionModule {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// One connector type and the modules packaged with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorArchiveEntry {
    pub component_type: ComponentType,
    pub extension_modules: Vec<ExtensionModule>,
}

impl ConnectorArchiveEntry {
    pub fn module(&self, name: &str) -> Option<&ExtensionModule> {
        self.extension_modules.iter().find(|m| m.name == name)
    }

    /// Declared module names with no packaged module.
    pub fn missing_modules(&self) -> Vec<String> {
        self.component_type
            .extension_module_names()
            .into_iter()
            .filter(|name| self.module(name).is_none())
            .collect()
    }
}

/// Connector types with their extension modules plus optional manifest bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorArchive {
    entries: Vec<ConnectorArchiveEntry>,
    manifest: Option<Vec<u8>>,
}

impl ConnectorArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connector type. Non-connector and duplicate types are rejected.
    pub fn add_connector_type(&mut self, component_type: ComponentType) -> ConfigResult<()> {
        if !component_type.is_connector() {
            return Err(ConfigError::InvalidArgument(format!(
                "'{}' is not a connector component type",
                component_type.name()
            )));
        }
        if self.entry(&component_type.id).is_some() {
            return Err(ConfigError::InvalidArgument(format!(
                "connector type '{}' is already in the archive",
                component_type.name()
            )));
        }
        self.entries.push(ConnectorArchiveEntry {
            component_type,
            extension_modules: Vec::new(),
        });
        Ok(())
    }

    /// Attach `module` to an already added type, replacing a same-named one.
    pub fn add_extension_module(
        &mut self,
        type_id: &ComponentTypeId,
        module: ExtensionModule,
    ) -> ConfigResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.component_type.id == type_id)
            .ok_or_else(|| {
                ConfigError::InvalidArgument(format!(
                    "connector type '{}' is not in the archive",
                    type_id
                ))
            })?;
        entry.extension_modules.retain(|m| m.name != module.name);
        entry.extension_modules.push(module);
        Ok(())
    }

    pub fn entries(&self) -> &[ConnectorArchiveEntry] {
        &self.entries
    }

    pub fn entry(&self, type_id: &ComponentTypeId) -> Option<&ConnectorArchiveEntry> {
        self.entries.iter().find(|e| &e.component_type.id == type_id)
    }

    pub fn connector_types(&self) -> impl Iterator<Item = &ComponentType> {
        self.entries.iter().map(|e| &e.component_type)
    }

    pub fn extension_modules(&self, type_id: &ComponentTypeId) -> &[ExtensionModule] {
        self.entry(type_id)
            .map(|e| e.extension_modules.as_slice())
            .unwrap_or_default()
    }

    pub fn manifest(&self) -> Option<&[u8]> {
        self.manifest.as_deref()
    }

    pub fn set_manifest(&mut self, bytes: Vec<u8>) {
        self.manifest = Some(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
