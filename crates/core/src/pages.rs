//! Page-route parameter resolution.
//!
//! Detail pages are addressed by numeric entity identifiers taken from the URL path. The policy
//! detail page additionally accepts the literal segment `new`, which means "no existing record"
//! and puts the page into create mode.

use api_shared::{PageContext, PageMode};

use crate::constants::NEW_POLICY_SEGMENT;
use crate::{ProxyError, ProxyResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRoute {
    ContractDetail { contract_id: u64 },
    PlanDetail { plan_id: u64 },
    PolicyDetail { policy_id: Option<u64> },
    DrugDetail { drug_id: u64 },
    ProviderDetail { provider_id: u64 },
    ProviderContractDetail { contract_id: u64 },
}

/// Parse a numeric entity identifier from a single path segment.
pub fn parse_entity_id(segment: &str) -> ProxyResult<u64> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProxyError::InvalidPageParam(segment.to_string()));
    }
    segment
        .parse::<u64>()
        .map_err(|_| ProxyError::InvalidPageParam(segment.to_string()))
}

/// Parse a policy identifier: `new` yields `None`, anything else must be numeric.
pub fn parse_policy_id(segment: &str) -> ProxyResult<Option<u64>> {
    if segment.trim() == NEW_POLICY_SEGMENT {
        return Ok(None);
    }
    parse_entity_id(segment).map(Some)
}

impl PageRoute {
    /// Resolve a page URL path such as `/policies/new` or `/drugs/12`.
    ///
    /// A query string or trailing slash is ignored.
    pub fn parse(path: &str) -> ProxyResult<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["contracts", id] => Ok(Self::ContractDetail {
                contract_id: parse_entity_id(id)?,
            }),
            ["plans", id] => Ok(Self::PlanDetail {
                plan_id: parse_entity_id(id)?,
            }),
            ["policies", id] => Ok(Self::PolicyDetail {
                policy_id: parse_policy_id(id)?,
            }),
            ["drugs", id] => Ok(Self::DrugDetail {
                drug_id: parse_entity_id(id)?,
            }),
            ["providers", id] => Ok(Self::ProviderDetail {
                provider_id: parse_entity_id(id)?,
            }),
            ["provider-contracts", id] => Ok(Self::ProviderContractDetail {
                contract_id: parse_entity_id(id)?,
            }),
            _ => Err(ProxyError::InvalidPageParam(path.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ContractDetail { .. } => "contract-detail",
            Self::PlanDetail { .. } => "plan-detail",
            Self::PolicyDetail { .. } => "policy-detail",
            Self::DrugDetail { .. } => "drug-detail",
            Self::ProviderDetail { .. } => "provider-detail",
            Self::ProviderContractDetail { .. } => "provider-contract-detail",
        }
    }

    pub fn entity_id(&self) -> Option<u64> {
        match *self {
            Self::ContractDetail { contract_id } => Some(contract_id),
            Self::PlanDetail { plan_id } => Some(plan_id),
            Self::PolicyDetail { policy_id } => policy_id,
            Self::DrugDetail { drug_id } => Some(drug_id),
            Self::ProviderDetail { provider_id } => Some(provider_id),
            Self::ProviderContractDetail { contract_id } => Some(contract_id),
        }
    }

    /// The props handed to the page renderer.
    pub fn context(&self) -> PageContext {
        let entity_id = self.entity_id();
        PageContext {
            page: self.name().to_string(),
            entity_id,
            mode: if entity_id.is_some() {
                PageMode::Edit
            } else {
                PageMode::Create
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_policy_segment_means_no_id() {
        assert_eq!(parse_policy_id("new").expect("new"), None);
        assert_eq!(parse_policy_id("315").expect("numeric"), Some(315));
    }

    #[test]
    fn policy_route_resolves_create_mode() {
        let route = PageRoute::parse("/policies/new").expect("route");
        assert_eq!(route, PageRoute::PolicyDetail { policy_id: None });

        let ctx = route.context();
        assert_eq!(ctx.page, "policy-detail");
        assert_eq!(ctx.entity_id, None);
        assert_eq!(ctx.mode, PageMode::Create);
    }

    #[test]
    fn numeric_segments_resolve_for_every_page() {
        let cases = [
            ("/contracts/1", PageRoute::ContractDetail { contract_id: 1 }),
            ("/plans/2/", PageRoute::PlanDetail { plan_id: 2 }),
            ("/policies/3", PageRoute::PolicyDetail { policy_id: Some(3) }),
            ("/drugs/4?tab=forms", PageRoute::DrugDetail { drug_id: 4 }),
            ("/providers/5", PageRoute::ProviderDetail { provider_id: 5 }),
            (
                "/provider-contracts/6",
                PageRoute::ProviderContractDetail { contract_id: 6 },
            ),
        ];
        for (path, expected) in cases {
            let route = PageRoute::parse(path).expect(path);
            assert_eq!(route, expected, "{path}");
            assert_eq!(route.context().mode, PageMode::Edit);
        }
    }

    #[test]
    fn new_is_only_special_for_policies() {
        let err = PageRoute::parse("/contracts/new").expect_err("contracts need an id");
        assert!(matches!(err, ProxyError::InvalidPageParam(_)));
    }

    #[test]
    fn rejects_non_numeric_and_unknown_paths() {
        for path in ["/drugs/abc", "/drugs/-1", "/drugs/", "/claims/9", "/policies/1/extra"] {
            assert!(PageRoute::parse(path).is_err(), "{path}");
        }
    }
}
