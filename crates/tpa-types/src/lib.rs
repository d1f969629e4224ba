//! Backend DTOs mirrored by the TPA front end.
//!
//! These types are passive: the backend creates, validates and persists every entity. The front
//! end only reads them for display, or shapes create/update payloads before submitting them.

pub mod combination_rule;
pub mod drug_form;
pub mod lookup;
pub mod price_list;
pub mod specialty;
pub mod tab;
mod text;

use std::str::FromStr;

pub use combination_rule::{CombinationFactor, CombinationRule, CombinationRuleType};
pub use drug_form::DrugForm;
pub use lookup::{AgeGroupRecord, LookupCategory, LookupRecord};
pub use price_list::{PriceList, PriceListItem};
pub use specialty::Specialty;
pub use tab::TabItem;
pub use text::{NonEmptyText, TextError};

#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("unknown entity kind: {0}")]
    UnknownEntity(String),
    #[error("invalid {entity} payload: {source}")]
    Payload {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type TypesResult<T> = Result<T, TypesError>;

/// Every DTO kind, addressable by a kebab-case name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    CombinationRule,
    DrugForm,
    Lookup,
    AgeGroup,
    PriceList,
    PriceListItem,
    Specialty,
    Tab,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::CombinationRule,
        EntityKind::DrugForm,
        EntityKind::Lookup,
        EntityKind::AgeGroup,
        EntityKind::PriceList,
        EntityKind::PriceListItem,
        EntityKind::Specialty,
        EntityKind::Tab,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::CombinationRule => "combination-rule",
            EntityKind::DrugForm => "drug-form",
            EntityKind::Lookup => "lookup",
            EntityKind::AgeGroup => "age-group",
            EntityKind::PriceList => "price-list",
            EntityKind::PriceListItem => "price-list-item",
            EntityKind::Specialty => "specialty",
            EntityKind::Tab => "tab",
        }
    }

    /// Parse `json` as this kind and re-serialise it in canonical form.
    ///
    /// Fields the type does not model are dropped, except for lookups, which keep them.
    pub fn normalise(self, json: &str) -> TypesResult<serde_json::Value> {
        match self {
            EntityKind::CombinationRule => normalise_as::<CombinationRule>(self, json),
            EntityKind::DrugForm => normalise_as::<DrugForm>(self, json),
            EntityKind::Lookup => normalise_as::<LookupRecord>(self, json),
            EntityKind::AgeGroup => normalise_as::<AgeGroupRecord>(self, json),
            EntityKind::PriceList => normalise_as::<PriceList>(self, json),
            EntityKind::PriceListItem => normalise_as::<PriceListItem>(self, json),
            EntityKind::Specialty => normalise_as::<Specialty>(self, json),
            EntityKind::Tab => normalise_as::<TabItem>(self, json),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| TypesError::UnknownEntity(wanted.to_string()))
    }
}

/// Parse a single DTO from a JSON string.
pub fn from_json<T: serde::de::DeserializeOwned>(
    entity: &'static str,
    json: &str,
) -> TypesResult<T> {
    serde_json::from_str(json).map_err(|source| TypesError::Payload { entity, source })
}

fn normalise_as<T>(kind: EntityKind, json: &str) -> TypesResult<serde_json::Value>
where
    T: serde::de::DeserializeOwned + serde::Serialize,
{
    let value: T = from_json(kind.as_str(), json)?;
    serde_json::to_value(&value).map_err(|source| TypesError::Payload {
        entity: kind.as_str(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().expect("known"), kind);
        }
        assert!(matches!(
            "claim".parse::<EntityKind>(),
            Err(TypesError::UnknownEntity(_))
        ));
    }

    #[test]
    fn normalise_drops_unmodelled_fields() {
        let value = EntityKind::Specialty
            .normalise(
                r#"{"id": 5, "code": " CARD ", "nameEn": "Cardiology", "nameAr": null,
                    "isActive": true, "createdAt": "2025-02-01T08:00:00Z",
                    "updatedAt": null, "legacyRef": "X1"}"#,
            )
            .expect("normalise");
        assert_eq!(value["code"], "CARD");
        assert!(value.get("legacyRef").is_none());
    }

    #[test]
    fn normalise_reports_entity_on_shape_error() {
        let err = EntityKind::PriceListItem
            .normalise(r#"{"id": 1, "price": "free"}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid price-list-item payload"));
    }

    #[test]
    fn tab_defaults_to_closable() {
        let tab: TabItem = from_json(
            "tab",
            r#"{"id": "policy-7", "title": "Policy 7", "component": "PolicyDetail"}"#,
        )
        .expect("parse tab");
        assert!(tab.closable);
        assert!(tab.props.is_null());
    }
}
