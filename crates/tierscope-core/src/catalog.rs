// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable registry of the backend tiers available for selection.

use std::collections::HashSet;

use crate::error::TierscopeError;
use crate::types::{Tier, TierId};

/// Validated, ordered set of tiers.
///
/// Construction fails on an empty list, duplicate ids, or non-finite /
/// negative pricing, so a `TierCatalog` value is always usable.
#[derive(Debug, Clone)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TierscopeError> {
        if tiers.is_empty() {
            return Err(TierscopeError::InvalidConfiguration(
                "tier catalog must contain at least one tier".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if tier.id.as_str().trim().is_empty() {
                return Err(TierscopeError::InvalidConfiguration(
                    "tier id must not be empty".to_string(),
                ));
            }
            if !seen.insert(tier.id.clone()) {
                return Err(TierscopeError::InvalidConfiguration(format!(
                    "duplicate tier id `{}`",
                    tier.id
                )));
            }
            if !tier.unit_cost_per_token.is_finite() || tier.unit_cost_per_token < 0.0 {
                return Err(TierscopeError::InvalidConfiguration(format!(
                    "tier `{}` has invalid unit cost {}",
                    tier.id, tier.unit_cost_per_token
                )));
            }
            if !(tier.nominal_quality_multiplier.is_finite() && tier.nominal_quality_multiplier > 0.0)
            {
                return Err(TierscopeError::InvalidConfiguration(format!(
                    "tier `{}` has invalid quality multiplier {}",
                    tier.id, tier.nominal_quality_multiplier
                )));
            }
            if !(tier.speed_multiplier.is_finite() && tier.speed_multiplier > 0.0) {
                return Err(TierscopeError::InvalidConfiguration(format!(
                    "tier `{}` has invalid speed multiplier {}",
                    tier.id, tier.speed_multiplier
                )));
            }
        }

        Ok(Self { tiers })
    }

    pub fn get(&self, id: &TierId) -> Option<&Tier> {
        self.tiers.iter().find(|t| &t.id == id)
    }

    /// Like [`get`](Self::get) but reports a missing tier as an error.
    pub fn require(&self, id: &TierId) -> Result<&Tier, TierscopeError> {
        self.get(id)
            .ok_or_else(|| TierscopeError::UnknownTier(id.to_string()))
    }

    pub fn contains(&self, id: &TierId) -> bool {
        self.get(id).is_some()
    }

    /// Tiers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    pub fn ids(&self) -> Vec<TierId> {
        self.tiers.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Position of a tier in declaration order.
    pub fn position(&self, id: &TierId) -> Option<usize> {
        self.tiers.iter().position(|t| &t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(id: &str, cost: f64) -> Tier {
        Tier {
            id: TierId::new(id),
            unit_cost_per_token: cost,
            nominal_quality_multiplier: 0.85,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = TierCatalog::new(vec![]).unwrap_err();
        assert!(matches!(err, TierscopeError::InvalidConfiguration(_)));
    }

    #[test]
    fn negative_cost_is_rejected() {
        let err = TierCatalog::new(vec![tier("micro", -0.1)]).unwrap_err();
        assert!(err.to_string().contains("invalid unit cost"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = TierCatalog::new(vec![tier("lite", 0.1), tier("lite", 0.2)]).unwrap_err();
        assert!(err.to_string().contains("duplicate tier id"));
    }

    #[test]
    fn lookup_preserves_declaration_order() {
        let catalog =
            TierCatalog::new(vec![tier("micro", 0.000035), tier("lite", 0.00006)]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position(&TierId::new("lite")), Some(1));
        assert!(catalog.contains(&TierId::new("micro")));
        assert!(matches!(
            catalog.require(&TierId::new("pro")),
            Err(TierscopeError::UnknownTier(id)) if id == "pro"
        ));
    }
}
