use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::NonEmptyText;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    pub id: u64,
    pub name: NonEmptyText,
    pub effective_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub region: Option<String>,
    pub provider_type: Option<String>,
    #[serde(default)]
    pub items: Vec<PriceListItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListItem {
    pub id: u64,
    pub price_list_id: u64,
    pub procedure_id: u64,
    pub price: f64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Percentage, 0-100.
    pub discount: Option<f64>,
}
