//! High-level entry point for configuration import/export.
//!
//! Wraps the document assembler and the archive packager, stamps headers
//! from [`ImportExportConfig`], and remembers the outcome of the last
//! import and export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{Read, Seek, Write};

use cfgx_archive::{packager, ConnectorArchive, MissingModule};
use cfgx_core::*;
use cfgx_xml::{assembler, parse_reader, DocumentHeader, ImportedBindings};

use super::config::ImportExportConfig;

/// What a transfer moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Configuration,
    ComponentTypes,
    ConnectorBindings,
    ConnectorArchive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    pub kind: DocumentKind,
    pub object_count: usize,
    pub at: DateTime<Utc>,
}

impl TransferSummary {
    fn now(kind: DocumentKind, object_count: usize) -> Self {
        Self {
            kind,
            object_count,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationImportExport {
    pub config: ImportExportConfig,
    /// Last successful import.
    pub last_import: Option<TransferSummary>,
    /// Last successful export.
    pub last_export: Option<TransferSummary>,
}

impl ConfigurationImportExport {
    pub fn new(config: ImportExportConfig) -> Self {
        Self {
            config,
            last_import: None,
            last_export: None,
        }
    }

    /// An in-memory editor honouring `regenerate_routing_ids`.
    pub fn new_editor(&self) -> BasicConfigurationObjectEditor {
        BasicConfigurationObjectEditor::new().regenerating_routing_ids(self.config.regenerate_routing_ids)
    }

    fn header(&self) -> DocumentHeader {
        self.config.document_header()
    }

    // ─── Configurations ─────────────────────────────────────────

    /// Export a collection holding one configuration and everything it
    /// references. The writer is consumed.
    pub fn export_configuration<W: Write>(&mut self, objects: &[ConfigObject], out: W) -> ConfigResult<()> {
        assembler::export_configuration(objects, &self.header(), out, self.config.indent)?;
        self.last_export = Some(TransferSummary::now(DocumentKind::Configuration, objects.len()));
        Ok(())
    }

    pub fn import_configuration<R: Read>(
        &mut self,
        input: R,
        editor: &mut dyn ConfigurationObjectEditor,
        name_override: Option<&str>,
    ) -> ConfigResult<Vec<ConfigObject>> {
        let root = parse_reader(input)?;
        let objects = assembler::import_configuration(&root, editor, name_override)?;
        self.last_import = Some(TransferSummary::now(DocumentKind::Configuration, objects.len()));
        Ok(objects)
    }

    /// Header of any ConfigurationDocument.
    pub fn read_header<R: Read>(&self, input: R) -> ConfigResult<Option<DocumentHeader>> {
        let root = parse_reader(input)?;
        Ok(assembler::read_header(&root))
    }

    // ─── Component Types ────────────────────────────────────────

    pub fn export_component_types<W: Write>(&mut self, types: &[ComponentType], out: W) -> ConfigResult<()> {
        assembler::export_component_types(types, &self.header(), out, self.config.indent)?;
        self.last_export = Some(TransferSummary::now(DocumentKind::ComponentTypes, types.len()));
        Ok(())
    }

    pub fn import_component_types<R: Read>(
        &mut self,
        input: R,
        editor: &mut dyn ConfigurationObjectEditor,
        name_override: Option<&str>,
    ) -> ConfigResult<Vec<ComponentType>> {
        let root = parse_reader(input)?;
        let types = assembler::import_component_types(&root, editor, name_override)?;
        self.last_import = Some(TransferSummary::now(DocumentKind::ComponentTypes, types.len()));
        Ok(types)
    }

    // ─── Connector Bindings ─────────────────────────────────────

    pub fn export_connector_bindings<W: Write>(
        &mut self,
        bindings: &[ConnectorBinding],
        types: &[ComponentType],
        out: W,
    ) -> ConfigResult<()> {
        assembler::export_connector_bindings(bindings, types, &self.header(), out, self.config.indent)?;
        self.last_export = Some(TransferSummary::now(DocumentKind::ConnectorBindings, bindings.len()));
        Ok(())
    }

    pub fn import_connector_bindings<R: Read>(
        &mut self,
        input: R,
        configuration: &ConfigurationId,
        editor: &mut dyn ConfigurationObjectEditor,
        name_override: Option<&str>,
    ) -> ConfigResult<ImportedBindings> {
        let root = parse_reader(input)?;
        let imported = assembler::import_connector_bindings(&root, configuration, editor, name_override)?;
        self.last_import = Some(TransferSummary::now(
            DocumentKind::ConnectorBindings,
            imported.bindings.len(),
        ));
        Ok(imported)
    }

    // ─── Connector Archives ─────────────────────────────────────

    pub fn export_connector_archive<W: Write + Seek>(
        &mut self,
        archive: &ConnectorArchive,
        out: W,
    ) -> ConfigResult<()> {
        packager::export_connector_archive(archive, &self.header(), out, self.config.indent)?;
        self.last_export = Some(TransferSummary::now(
            DocumentKind::ConnectorArchive,
            archive.entries().len(),
        ));
        Ok(())
    }

    /// Import and validate an archive. Validation follows
    /// `strict_archive_validation`.
    pub fn import_connector_archive<R: Read>(
        &mut self,
        input: R,
        editor: &mut dyn ConfigurationObjectEditor,
    ) -> ConfigResult<ConnectorArchive> {
        let archive = packager::import_connector_archive(input, editor)?;
        let missing = self.validate_archive(&archive)?;
        if !missing.is_empty() {
            log::info!(
                "connector archive imported with {} missing extension modules",
                missing.len()
            );
        }
        self.last_import = Some(TransferSummary::now(
            DocumentKind::ConnectorArchive,
            archive.entries().len(),
        ));
        Ok(archive)
    }

    pub fn validate_archive(&self, archive: &ConnectorArchive) -> ConfigResult<Vec<MissingModule>> {
        packager::validate_archive(archive, self.config.strict_archive_validation)
    }
}
