use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dosage form of a drug. One drug has many forms; at most one is the default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugForm {
    pub id: u64,
    pub drug_id: u64,
    pub dosage_form: String,
    /// Route of administration, e.g. `ORAL`.
    pub route: String,
    pub strength_value: Option<f64>,
    pub strength_unit: Option<String>,
    #[serde(default)]
    pub is_default_form: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}
