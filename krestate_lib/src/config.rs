//! API credentials read from the environment.

use crate::error::ToolError;

pub const DATA_GO_KR_API_KEY: &str = "DATA_GO_KR_API_KEY";
pub const ONBID_API_KEY: &str = "ONBID_API_KEY";
pub const ODCLOUD_API_KEY: &str = "ODCLOUD_API_KEY";
pub const ODCLOUD_SERVICE_KEY: &str = "ODCLOUD_SERVICE_KEY";

/// How odcloud requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OdcloudAuth {
    /// `Authorization: Infuser <key>` header.
    Authorization(String),
    /// `serviceKey` query parameter.
    ServiceKey(String),
}

/// Key material for the upstream services. Missing keys surface as
/// `config_error` payloads when the corresponding service is used, never
/// at construction time.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data_go_kr: Option<String>,
    pub onbid: Option<String>,
    pub odcloud_api: Option<String>,
    pub odcloud_service: Option<String>,
}

impl Config {
    /// Read all keys from the environment. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            data_go_kr: read_env(DATA_GO_KR_API_KEY),
            onbid: read_env(ONBID_API_KEY),
            odcloud_api: read_env(ODCLOUD_API_KEY),
            odcloud_service: read_env(ODCLOUD_SERVICE_KEY),
        }
    }

    /// The MOLIT RTMS service key.
    pub fn molit_key(&self) -> Result<&str, ToolError> {
        self.data_go_kr
            .as_deref()
            .ok_or_else(|| ToolError::config_error(DATA_GO_KR_API_KEY))
    }

    /// The Onbid service key, falling back to the data.go.kr key.
    pub fn onbid_key(&self) -> Result<&str, ToolError> {
        self.onbid
            .as_deref()
            .or(self.data_go_kr.as_deref())
            .ok_or_else(|| ToolError::config_error("ONBID_API_KEY (or DATA_GO_KR_API_KEY)"))
    }

    /// The odcloud credential, preferring the Authorization header mode.
    pub fn odcloud_auth(&self) -> Result<OdcloudAuth, ToolError> {
        if let Some(key) = &self.odcloud_api {
            return Ok(OdcloudAuth::Authorization(key.clone()));
        }
        if let Some(key) = &self.odcloud_service {
            return Ok(OdcloudAuth::ServiceKey(key.clone()));
        }
        if let Some(key) = &self.data_go_kr {
            return Ok(OdcloudAuth::ServiceKey(key.clone()));
        }
        Err(ToolError::config_error(
            "ODCLOUD_API_KEY (or ODCLOUD_SERVICE_KEY, or DATA_GO_KR_API_KEY)",
        ))
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
