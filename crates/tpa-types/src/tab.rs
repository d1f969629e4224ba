use serde::{Deserialize, Serialize};

/// An open workspace tab. UI state only, never sent to the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub id: String,
    pub title: String,
    /// Component key the renderer mounts in the tab.
    pub component: String,
    #[serde(default)]
    pub props: serde_json::Value,
    pub icon: Option<String>,
    #[serde(default = "closable_by_default")]
    pub closable: bool,
}

fn closable_by_default() -> bool {
    true
}
