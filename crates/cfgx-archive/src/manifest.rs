//! Archive manifest — which modules each connector type uses and where
//! they live in the container.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use cfgx_core::{ConfigError, ConfigResult, ElementErrorReason};
use cfgx_xml::{parse_document, write_to_string, Element};

use super::types::{layout, ConnectorArchive};

mod names {
    pub const ELEMENT: &str = "ConnectorArchiveManifest";
    pub const CONNECTOR_TYPE: &str = "ConnectorType";
    pub const EXTENSION_MODULE: &str = "ExtensionModule";
    pub const NAME: &str = "Name";
    pub const SHARED: &str = "Shared";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestModule {
    pub name: String,
    /// Stored once under `ConnectorTypes/shared/`.
    pub shared: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConnectorType {
    pub name: String,
    pub modules: Vec<ManifestModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveManifest {
    pub connector_types: Vec<ManifestConnectorType>,
}

impl ArchiveManifest {
    /// Classify every packaged module: a module name found under two or
    /// more types is shared.
    pub fn build(archive: &ConnectorArchive) -> Self {
        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
        for entry in archive.entries() {
            for module in &entry.extension_modules {
                owners
                    .entry(module.name.as_str())
                    .or_default()
                    .push(entry.component_type.name());
            }
        }

        let connector_types = archive
            .entries()
            .iter()
            .map(|entry| ManifestConnectorType {
                name: entry.component_type.name().to_string(),
                modules: entry
                    .extension_modules
                    .iter()
                    .map(|m| ManifestModule {
                        name: m.name.clone(),
                        shared: owners.get(m.name.as_str()).map_or(false, |o| o.len() > 1),
                    })
                    .collect(),
            })
            .collect();

        Self { connector_types }
    }

    pub fn connector_type(&self, name: &str) -> Option<&ManifestConnectorType> {
        self.connector_types.iter().find(|t| t.name == name)
    }

    /// Whether any type lists `module` as shared.
    pub fn is_shared(&self, module: &str) -> bool {
        self.connector_types
            .iter()
            .flat_map(|t| t.modules.iter())
            .any(|m| m.name == module && m.shared)
    }

    /// Path of `module` as packaged for `type_name`.
    pub fn module_path(&self, type_name: &str, module: &str) -> String {
        if self.is_shared(module) {
            layout::shared_module_path(module)
        } else {
            layout::private_module_path(type_name, module)
        }
    }

    pub fn to_element(&self) -> Element {
        let mut root = Element::new(names::ELEMENT);
        for t in &self.connector_types {
            let mut type_elem = Element::new(names::CONNECTOR_TYPE).with_attribute(names::NAME, t.name.as_str());
            for m in &t.modules {
                type_elem.add_child(
                    Element::new(names::EXTENSION_MODULE)
                        .with_attribute(names::NAME, m.name.as_str())
                        .with_attribute(names::SHARED, if m.shared { "true" } else { "false" }),
                );
            }
            root.add_child(type_elem);
        }
        root
    }

    pub fn to_xml(&self, indent: usize) -> ConfigResult<Vec<u8>> {
        write_to_string(&self.to_element(), indent).map(String::into_bytes)
    }

    /// Read manifest bytes written by [`ArchiveManifest::to_xml`].
    pub fn parse(bytes: &[u8]) -> ConfigResult<Self> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| ConfigError::Archive(format!("manifest is not UTF-8: {}", e)))?;
        let root = parse_document(content)?;
        if root.name != names::ELEMENT {
            return Err(ConfigError::invalid_element(
                root.name.as_str(),
                ElementErrorReason::WrongTag {
                    expected: names::ELEMENT.to_string(),
                },
            ));
        }

        let mut connector_types = Vec::new();
        for t in root.children_named(names::CONNECTOR_TYPE) {
            let mut modules = Vec::new();
            for m in t.children_named(names::EXTENSION_MODULE) {
                modules.push(ManifestModule {
                    name: name_of(m)?,
                    shared: m.attribute(names::SHARED) == Some("true"),
                });
            }
            connector_types.push(ManifestConnectorType {
                name: name_of(t)?,
                modules,
            });
        }
        Ok(Self { connector_types })
    }
}

fn name_of(element: &Element) -> ConfigResult<String> {
    element
        .attribute(names::NAME)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ConfigError::invalid_element(
                element.name.as_str(),
                ElementErrorReason::MissingAttribute(names::NAME),
            )
        })
}
