use serde::{Deserialize, Serialize};

/// Body of `POST /version`.
///
/// Every field is optional on the wire so that a missing `application` or
/// `version` is reported as a malformed request instead of a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub result: String,
    pub previous: PreviousVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousVersion {
    /// `None` when this host+deployment had never reported before.
    pub version: Option<String>,
}

impl ReportResponse {
    pub fn ok(previous: Option<String>) -> Self {
        Self {
            result: "ok".to_string(),
            previous: PreviousVersion { version: previous },
        }
    }
}
