//! Lookup master data.
//!
//! Categories the backend adds later parse as [`LookupCategory::Other`]. Category-specific columns
//! are kept in [`LookupRecord::extra`] rather than modelled one by one.

use serde::{Deserialize, Serialize};

use crate::NonEmptyText;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupCategory {
    Gender,
    MaritalStatus,
    Relationship,
    Nationality,
    Country,
    City,
    Region,
    Currency,
    ProviderType,
    ClaimType,
    AgeGroup,
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecord {
    pub id: u64,
    pub code: NonEmptyText,
    pub name_en: NonEmptyText,
    pub name_ar: Option<String>,
    pub category: Option<LookupCategory>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An `AGE_GROUP` lookup with its age bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupRecord {
    pub id: u64,
    pub code: NonEmptyText,
    pub name_en: NonEmptyText,
    pub name_ar: Option<String>,
    pub min_age: u32,
    /// Open-ended when absent.
    pub max_age: Option<u32>,
}
