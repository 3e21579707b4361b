//! Error types shared by every cfgx crate.

use std::fmt;

use thiserror::Error;

/// Why an XML element could not be turned into a configuration object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementErrorReason {
    /// The element carries a different tag than the mapper expected.
    WrongTag { expected: String },
    /// A required attribute is absent or blank.
    MissingAttribute(&'static str),
    /// An attribute is present but cannot be parsed.
    InvalidAttribute { attribute: &'static str, value: String },
    /// A required child element is absent.
    MissingChild(&'static str),
}

impl fmt::Display for ElementErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongTag { expected } => write!(f, "expected <{}>", expected),
            Self::MissingAttribute(name) => write!(f, "missing required attribute '{}'", name),
            Self::InvalidAttribute { attribute, value } => {
                write!(f, "invalid value '{}' for attribute '{}'", value, attribute)
            }
            Self::MissingChild(name) => write!(f, "missing required child <{}>", name),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Structural or schema violation in an element being parsed.
    #[error("Invalid configuration element <{element}>: {reason}")]
    InvalidElement {
        element: String,
        reason: ElementErrorReason,
    },

    /// A reference inside an object collection points outside of it,
    /// or a mandatory document section is absent.
    #[error("Configuration objects not resolvable: {object} references unknown {kind} '{reference}'")]
    NotResolvable {
        object: String,
        reference: String,
        kind: &'static str,
    },

    /// The super/parent type graph of a component type list has a cycle.
    #[error("Cyclic component type hierarchy involving: {0}")]
    CyclicTypeHierarchy(String),

    /// A connector type declares an extension module the archive lacks.
    #[error("Connector type '{connector_type}' is missing extension module '{module}'")]
    MissingExtensionModule {
        connector_type: String,
        module: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn invalid_element(element: impl Into<String>, reason: ElementErrorReason) -> Self {
        Self::InvalidElement {
            element: element.into(),
            reason,
        }
    }

    pub fn not_resolvable(
        object: impl Into<String>,
        reference: impl Into<String>,
        kind: &'static str,
    ) -> Self {
        Self::NotResolvable {
            object: object.into(),
            reference: reference.into(),
            kind,
        }
    }

    /// Label of the unresolved reference kind, if this is a resolution failure.
    pub fn unresolved_kind(&self) -> Option<&'static str> {
        match self {
            Self::NotResolvable { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

// Allow easy conversion to a front-end friendly String error
impl From<ConfigError> for String {
    fn from(e: ConfigError) -> Self {
        e.to_string()
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
