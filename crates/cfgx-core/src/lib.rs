//! # cfgx-core — Configuration Object Model
//!
//! Shared model used by the XML mapper and the connector archive packager:
//! - `ids` — typed identities (composite for processes and deployments)
//! - `types` — component types, property definitions, component objects
//! - `object` — `ConfigObject`, the closed set of exportable objects
//! - `editor` — object editor trait + in-memory implementation
//! - `resolver` — segregation and cross-reference resolution
//! - `error` — `ConfigError` shared by every cfgx crate

pub mod error;
pub mod ids;
pub mod types;
pub mod object;
pub mod editor;
pub mod resolver;

// Re-exports
pub use error::{ConfigError, ConfigResult, ElementErrorReason};
pub use ids::*;
pub use types::*;
pub use object::ConfigObject;
pub use editor::{BasicConfigurationObjectEditor, ConfigurationObjectEditor, EditorAction};
pub use resolver::{resolve_configuration_objects, segregate, SegregatedObjects};
