use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a detail page edits an existing record or creates a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    Create,
    Edit,
}

/// Props resolved from a detail-page URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageContext {
    /// Page identifier, e.g. `policy-detail`.
    pub page: String,
    /// `None` when the page is in create mode.
    pub entity_id: Option<u64>,
    pub mode: PageMode,
}
