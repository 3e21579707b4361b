//! Zip packaging of connector archives.
//!
//! ```text
//! ConnectorTypes/<Type>/<Type>.cdk     ComponentTypes document
//! ConnectorTypes/<Type>/<module>       module used by <Type> only
//! ConnectorTypes/shared/<module>       module used by two or more types
//! Manifest.xml
//! ```

use std::collections::HashSet;
use std::io::{self, Read, Seek, SeekFrom, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use cfgx_core::{
    ComponentTypeId, ConfigError, ConfigResult, ConfigurationObjectEditor, ElementErrorReason,
};
use cfgx_xml::element_names::component_types::component_type;
use cfgx_xml::{export_component_types, import_component_types, parse_document, DocumentHeader};

use super::manifest::ArchiveManifest;
use super::types::{layout, ConnectorArchive, ExtensionModule};

fn archive_err(e: ZipError) -> ConfigError {
    ConfigError::Archive(e.to_string())
}

// ─── Export ─────────────────────────────────────────────────────────

/// Write `archive` as a zip container into `out`. The writer is consumed.
pub fn export_connector_archive<W: Write + Seek>(
    archive: &ConnectorArchive,
    header: &DocumentHeader,
    out: W,
    indent: usize,
) -> ConfigResult<()> {
    if archive.is_empty() {
        return Err(ConfigError::InvalidArgument(
            "connector archive contains no connector types".into(),
        ));
    }

    let manifest = ArchiveManifest::build(archive);
    let options = SimpleFileOptions::default();
    let mut zip = ZipWriter::new(out);
    let mut written_shared: HashSet<&str> = HashSet::new();

    for entry in archive.entries() {
        let ct = &entry.component_type;

        let mut descriptor = Vec::new();
        export_component_types(std::slice::from_ref(ct), header, &mut descriptor, indent)?;
        zip.start_file(layout::descriptor_path(ct.name()), options)
            .map_err(archive_err)?;
        zip.write_all(&descriptor)?;

        for module in &entry.extension_modules {
            if manifest.is_shared(&module.name) && !written_shared.insert(module.name.as_str()) {
                log::debug!("shared module '{}' already packaged", module.name);
                continue;
            }
            zip.start_file(manifest.module_path(ct.name(), &module.name), options)
                .map_err(archive_err)?;
            zip.write_all(&module.bytes)?;
        }
    }

    zip.start_file(layout::MANIFEST_FILE, options)
        .map_err(archive_err)?;
    zip.write_all(&manifest.to_xml(indent)?)?;
    zip.finish().map_err(archive_err)?;

    log::info!(
        "exported connector archive: {} types, {} shared modules",
        archive.entries().len(),
        written_shared.len()
    );
    Ok(())
}

// ─── Import ─────────────────────────────────────────────────────────

/// Read a connector archive from `input`.
///
/// The stream is spooled to an anonymous temporary file first, which is
/// removed when the import returns.
pub fn import_connector_archive<R: Read>(
    mut input: R,
    editor: &mut dyn ConfigurationObjectEditor,
) -> ConfigResult<ConnectorArchive> {
    let mut spool = tempfile::tempfile()?;
    io::copy(&mut input, &mut spool)?;
    spool.seek(SeekFrom::Start(0))?;
    let mut zip = ZipArchive::new(spool).map_err(archive_err)?;

    let descriptors: Vec<(String, String)> = zip
        .file_names()
        .filter_map(|name| layout::descriptor_dir(name).map(|dir| (dir.to_string(), name.to_string())))
        .collect();

    // Pass 1: component types from descriptors.
    let mut archive = ConnectorArchive::new();
    let mut type_dirs: Vec<(ComponentTypeId, String)> = Vec::new();
    for (dir, path) in &descriptors {
        let content = read_entry_string(&mut zip, path)?;
        let root = parse_document(&content)?;
        for ct in import_component_types(&root, editor, None)? {
            if !ct.is_connector() {
                return Err(ConfigError::invalid_element(
                    component_type::ELEMENT,
                    ElementErrorReason::InvalidAttribute {
                        attribute: component_type::COMPONENT_TYPE_CODE,
                        value: ct.type_code.code().to_string(),
                    },
                ));
            }
            type_dirs.push((ct.id.clone(), dir.clone()));
            archive.add_connector_type(ct)?;
        }
    }

    // Pass 2: declared modules, private directory first, then shared.
    for (type_id, dir) in &type_dirs {
        let declared = archive
            .entry(type_id)
            .map(|e| e.component_type.extension_module_names())
            .unwrap_or_default();
        for module in declared {
            let found = match read_entry_bytes(&mut zip, &layout::private_module_path(dir, &module))? {
                Some(bytes) => Some(bytes),
                None => read_entry_bytes(&mut zip, &layout::shared_module_path(&module))?,
            };
            match found {
                Some(bytes) => archive.add_extension_module(type_id, ExtensionModule::new(module, bytes))?,
                None => log::debug!("module '{}' for '{}' not in archive", module, type_id),
            }
        }
    }

    if let Some(bytes) = read_entry_bytes(&mut zip, layout::MANIFEST_FILE)? {
        archive.set_manifest(bytes);
    }

    log::info!(
        "imported connector archive: {} types",
        archive.entries().len()
    );
    Ok(archive)
}

fn read_entry_bytes<R: Read + Seek>(zip: &mut ZipArchive<R>, path: &str) -> ConfigResult<Option<Vec<u8>>> {
    let mut file = match zip.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(archive_err(e)),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn read_entry_string<R: Read + Seek>(zip: &mut ZipArchive<R>, path: &str) -> ConfigResult<String> {
    let bytes = read_entry_bytes(zip, path)?
        .ok_or_else(|| ConfigError::Archive(format!("entry '{}' disappeared", path)))?;
    String::from_utf8(bytes).map_err(|e| ConfigError::Archive(format!("'{}' is not UTF-8: {}", path, e)))
}

// ─── Validation ─────────────────────────────────────────────────────

/// A declared extension module the archive does not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingModule {
    pub connector_type: String,
    pub module: String,
}

/// Check every declared module is packaged.
///
/// Strict mode fails on the first missing module; lenient mode logs a
/// warning for each and returns them.
pub fn validate_archive(archive: &ConnectorArchive, strict: bool) -> ConfigResult<Vec<MissingModule>> {
    let mut missing = Vec::new();
    for entry in archive.entries() {
        for module in entry.missing_modules() {
            let connector_type = entry.component_type.name().to_string();
            if strict {
                return Err(ConfigError::MissingExtensionModule {
                    connector_type,
                    module,
                });
            }
            log::warn!(
                "connector type '{}' declares extension module '{}' which the archive lacks",
                connector_type,
                module
            );
            missing.push(MissingModule {
                connector_type,
                module,
            });
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgx_core::{
        BasicConfigurationObjectEditor, ChangeHistory, ComponentType, ComponentTypeCode,
        PropertyDefinition,
    };
    use std::io::Cursor;

    fn connector(name: &str, modules: &[&str]) -> ComponentType {
        let classpath = modules
            .iter()
            .map(|m| format!("extensionjar:{}", m))
            .collect::<Vec<_>>()
            .join(";");
        ComponentType {
            id: ComponentTypeId::new(name),
            type_code: ComponentTypeCode::Connector,
            deployable: true,
            monitorable: true,
            deprecated: false,
            super_type: None,
            parent_type: None,
            property_definitions: vec![
                PropertyDefinition::new("ConnectorClassPath").with_default(classpath)
            ],
            history: ChangeHistory::default(),
        }
    }

    fn sample_archive() -> ConnectorArchive {
        let mut archive = ConnectorArchive::new();
        for (name, modules) in [("T1", vec!["m.jar", "a.jar"]), ("T2", vec!["m.jar"])] {
            let ct = connector(name, &modules);
            let id = ct.id.clone();
            archive.add_connector_type(ct).unwrap();
            for m in modules {
                archive
                    .add_extension_module(&id, ExtensionModule::new(m, format!("bytes of {}", m).into_bytes()))
                    .unwrap();
            }
        }
        archive
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_export_layout_writes_shared_module_once() {
        let mut buf = Cursor::new(Vec::new());
        export_connector_archive(&sample_archive(), &DocumentHeader::default(), &mut buf, 2).unwrap();

        assert_eq!(
            entry_names(buf.get_ref()),
            vec![
                "ConnectorTypes/T1/T1.cdk",
                "ConnectorTypes/T1/a.jar",
                "ConnectorTypes/T2/T2.cdk",
                "ConnectorTypes/shared/m.jar",
                "Manifest.xml",
            ]
        );
    }

    #[test]
    fn test_import_restores_types_modules_and_manifest() {
        let original = sample_archive();
        let mut buf = Cursor::new(Vec::new());
        export_connector_archive(&original, &DocumentHeader::default(), &mut buf, 2).unwrap();

        let mut editor = BasicConfigurationObjectEditor::new();
        let imported = import_connector_archive(Cursor::new(buf.into_inner()), &mut editor).unwrap();

        let t1 = ComponentTypeId::new("T1");
        let t2 = ComponentTypeId::new("T2");
        assert_eq!(imported.entry(&t1), original.entry(&t1));
        assert_eq!(imported.entry(&t2), original.entry(&t2));

        let manifest = ArchiveManifest::parse(imported.manifest().unwrap()).unwrap();
        assert!(manifest.is_shared("m.jar"));
        assert!(validate_archive(&imported, true).unwrap().is_empty());
    }

    #[test]
    fn test_descriptor_of_non_connector_type_is_invalid_element() {
        let mut service = connector("Query", &[]);
        service.type_code = ComponentTypeCode::Service;
        let mut descriptor = Vec::new();
        export_component_types(&[service], &DocumentHeader::default(), &mut descriptor, 0).unwrap();

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("ConnectorTypes/Query/Query.cdk", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&descriptor).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let mut editor = BasicConfigurationObjectEditor::new();
        let err = import_connector_archive(Cursor::new(bytes), &mut editor).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidElement {
                reason: ElementErrorReason::InvalidAttribute { attribute: "ComponentTypeCode", .. },
                ..
            }
        ));
    }

    #[test]
    fn test_validation_modes() {
        let mut archive = ConnectorArchive::new();
        archive.add_connector_type(connector("T1", &["x.jar"])).unwrap();

        let missing = validate_archive(&archive, false).unwrap();
        assert_eq!(
            missing,
            vec![MissingModule {
                connector_type: "T1".into(),
                module: "x.jar".into()
            }]
        );
        assert!(matches!(
            validate_archive(&archive, true),
            Err(ConfigError::MissingExtensionModule { .. })
        ));
    }

    #[test]
    fn test_empty_archive_is_rejected() {
        let mut buf = Cursor::new(Vec::new());
        assert!(matches!(
            export_connector_archive(&ConnectorArchive::new(), &DocumentHeader::default(), &mut buf, 0),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_garbage_input_is_an_archive_error() {
        let mut editor = BasicConfigurationObjectEditor::new();
        assert!(matches!(
            import_connector_archive(&b"not a zip"[..], &mut editor),
            Err(ConfigError::Archive(_))
        ));
    }
}
