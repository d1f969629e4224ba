//! Benefit combination rules.
//!
//! A rule says how a benefit value combines with others once its factors match. The matching
//! itself happens on the backend; these types only carry the shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinationRuleType {
    Copay,
    Coinsurance,
    Deductible,
    Limit,
    Discount,
    /// A type this build does not know about yet.
    #[serde(other)]
    Other,
}

/// One matching condition, e.g. `{"factor": "networkTier", "value": "GOLD"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationFactor {
    pub factor: String,
    pub value: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinationRule {
    pub id: u64,
    #[serde(rename = "type")]
    pub rule_type: CombinationRuleType,
    #[serde(default)]
    pub factors: Vec<CombinationFactor>,
    pub value: f64,
    #[serde(default)]
    pub is_default: bool,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_rule() {
        let rule: CombinationRule = serde_json::from_str(
            r#"{
                "id": 11,
                "type": "COPAY",
                "factors": [{"factor": "networkTier", "value": "GOLD"}],
                "value": 20.5,
                "isDefault": true,
                "effectiveDate": "2024-01-01",
                "expiryDate": null,
                "priority": 3
            }"#,
        )
        .expect("parse rule");

        assert_eq!(rule.rule_type, CombinationRuleType::Copay);
        assert_eq!(rule.factors.len(), 1);
        assert_eq!(rule.factors[0].value, serde_json::json!("GOLD"));
        assert_eq!(
            rule.effective_date,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert!(rule.expiry_date.is_none());
    }

    #[test]
    fn unknown_rule_type_is_tolerated() {
        let rule: CombinationRule = serde_json::from_str(
            r#"{"id": 1, "type": "SURCHARGE", "value": 0, "effectiveDate": null, "expiryDate": null}"#,
        )
        .expect("parse rule");
        assert_eq!(rule.rule_type, CombinationRuleType::Other);
        assert!(rule.factors.is_empty());
        assert!(!rule.is_default);
    }
}
