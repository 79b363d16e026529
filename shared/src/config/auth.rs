//! Inbound access configuration

use serde::{Deserialize, Serialize};

/// Shared-secret access control for the inbound API
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessConfig {
    /// Value the `Authorization` header must carry verbatim
    #[serde(default, alias = "accessKey", alias = "accesskey")]
    pub access_key: String,
}

impl AccessConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
        }
    }
}
