//! # cfgx-archive — Connector Archives
//!
//! Zip containers carrying connector component types (`.cdk` descriptors),
//! the extension modules they load, and a manifest recording which modules
//! are shared between types.
//!
//! Architecture:
//! - `types` — archive model and container layout
//! - `manifest` — shared-module classification, manifest read/write
//! - `packager` — zip export/import and validation

pub mod types;
pub mod manifest;
pub mod packager;

// Re-exports
pub use types::{layout, ConnectorArchive, ConnectorArchiveEntry, ExtensionModule};
pub use manifest::{ArchiveManifest, ManifestConnectorType, ManifestModule};
pub use packager::{export_connector_archive, import_connector_archive, validate_archive, MissingModule};
