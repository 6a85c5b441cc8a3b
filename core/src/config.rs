//! Client configuration.
//!
//! `ClientConfig` is plain serde data so a host application can load it from
//! whatever format it already uses; every field has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::UreqTransport;
use crate::invoker::DEFAULT_USER_AGENT;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Base URLs of the three endpoint kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Regular methods; the API version and a trailing `/` are appended.
    pub api_base: String,
    /// Base64 uploads; the API version and a trailing `/` are appended.
    pub upload_base: String,
    /// Raw uploads; the file name is appended.
    pub binary_upload_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: "https://api.smugmug.com/services/api/json/".to_string(),
            upload_base: "https://upload.smugmug.com/services/api/json/".to_string(),
            binary_upload_base: "https://upload.smugmug.com/".to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints rooted at one server, as the test server lays them out.
    pub fn single_host(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            api_base: format!("{base}/services/api/json/"),
            upload_base: format!("{base}/services/api/json/"),
            binary_upload_base: format!("{base}/upload/"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A fresh pooled transport using this configuration's timeout.
    pub fn transport(&self) -> UreqTransport {
        UreqTransport::new(self.timeout())
    }
}
