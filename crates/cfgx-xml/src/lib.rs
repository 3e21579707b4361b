//! # cfgx-xml — ConfigurationDocument XML Format
//!
//! Reading and writing of configuration documents:
//! - **Full configurations** — configuration, hosts, processes, deployed
//!   services, bindings, services, resources and component types
//! - **Component types** — ComponentTypes-only documents (`.cdk`)
//! - **Connector bindings** — bindings plus the types they use
//!
//! Architecture:
//! - `element_names` — every element/attribute name as a `const`
//! - `element` — small in-memory element tree
//! - `xml_parser` — quick-xml reader → element tree
//! - `xml_writer` — element tree → quick-xml writer
//! - `mapper` — per-type object ↔ element conversion
//! - `type_order` — super/parent dependency ordering of component types
//! - `assembler` — whole-document export and import

pub mod element_names;
pub mod element;
pub mod xml_parser;
pub mod xml_writer;
pub mod mapper;
pub mod type_order;
pub mod assembler;

// Re-exports
pub use element::Element;
pub use xml_parser::{parse_document, parse_reader};
pub use xml_writer::{write_document, write_to_string};
pub use type_order::order_component_type_elements;
pub use assembler::{
    build_component_types_document, build_configuration_document,
    build_connector_bindings_document, export_component_types, export_configuration,
    export_connector_bindings, import_component_types, import_configuration,
    import_connector_bindings, read_header, DocumentHeader, ImportedBindings,
};
