//! # cfgx — Configuration Import/Export
//!
//! Serializes a configuration object model (hosts, processes, services,
//! connector bindings, component types, shared resources, authentication
//! providers, resource descriptors) to and from `ConfigurationDocument` XML,
//! checks that every cross reference resolves, and packages connector types
//! with their extension modules as zip archives.
//!
//! Architecture:
//! - `cfgx-core` — object model, object editor, reference resolver, errors
//! - `cfgx-xml` — element names, mapper, type ordering, document assembler
//! - `cfgx-archive` — connector archive packager and manifest
//! - `config` — runtime settings
//! - `service` — [`ConfigurationImportExport`], the single entry point

pub mod config;
pub mod service;

// Re-exports
pub use cfgx_archive as archive;
pub use cfgx_xml as xml;

pub use cfgx_archive::{ArchiveManifest, ConnectorArchive, ExtensionModule, MissingModule};
pub use cfgx_core::*;
pub use cfgx_xml::{DocumentHeader, ImportedBindings};
pub use config::ImportExportConfig;
pub use service::{ConfigurationImportExport, DocumentKind, TransferSummary};
