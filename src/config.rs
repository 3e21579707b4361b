//! Runtime settings for import/export.

use serde::{Deserialize, Serialize};

use cfgx_core::ConfigResult;
use cfgx_xml::DocumentHeader;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportExportConfig {
    /// Written as `UserCreatedBy` in document headers.
    pub user_name: Option<String>,
    pub application_name: String,
    pub application_version: String,
    pub system_version: Option<String>,
    /// Give every imported connector binding a fresh routing UUID.
    pub regenerate_routing_ids: bool,
    /// Fail archive validation on a missing extension module instead of
    /// logging a warning.
    pub strict_archive_validation: bool,
    /// Spaces per XML nesting level; 0 writes a single line.
    pub indent: usize,
}

impl Default for ImportExportConfig {
    fn default() -> Self {
        Self {
            user_name: None,
            application_name: env!("CARGO_PKG_NAME").to_string(),
            application_version: env!("CARGO_PKG_VERSION").to_string(),
            system_version: None,
            regenerate_routing_ids: false,
            strict_archive_validation: false,
            indent: 4,
        }
    }
}

impl ImportExportConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Header for a document exported now.
    pub fn document_header(&self) -> DocumentHeader {
        DocumentHeader {
            user_created_by: self.user_name.clone(),
            application_created_by: Some(self.application_name.clone()),
            application_version_created_by: Some(self.application_version.clone()),
            system_version: self.system_version.clone(),
            document_type_version: None,
            time: Some(chrono::Utc::now()),
        }
    }
}
