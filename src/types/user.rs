//! User profile returned by the userinfo endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Stable user identifier
    pub id: String,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    /// Provider-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    /// Look up a provider-specific field
    #[must_use]
    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
