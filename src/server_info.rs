use serde::{Deserialize, Serialize};

/// Node information returned by `GET /info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub es_version: String,
    pub state: String,
    #[serde(default)]
    pub projections_mode: Option<String>,
}
