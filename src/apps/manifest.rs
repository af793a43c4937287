/*!
 * Application Manifest
 * Immutable identity and display metadata of a registrable application
 */

use crate::core::types::AppId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppManifest {
    /// Globally unique; registry key and process-reuse key
    pub id: AppId,
    pub name: String,
    /// Opaque icon reference, never interpreted by the runtime
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

impl AppManifest {
    pub fn new(id: impl Into<AppId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}
