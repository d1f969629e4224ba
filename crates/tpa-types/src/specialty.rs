use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::NonEmptyText;

/// A medical specialty, e.g. cardiology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    pub id: u64,
    pub code: NonEmptyText,
    pub name_en: NonEmptyText,
    pub name_ar: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
