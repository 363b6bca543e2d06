// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quality/cost-aware tier selection.
//!
//! A tier qualifies for a scenario when its average quality meets the
//! expected quality and its average cost stays within the scenario's cap.
//! Among qualified tiers the highest cost-efficiency ratio wins; with none
//! qualified, the highest-quality tier is the fallback.

use std::cmp::Ordering;

use tierscope_core::types::{AggregateTierPerformance, Scenario, TierId};
use tierscope_core::TierscopeError;
use tracing::{debug, info};

/// Selection outcome with the reasoning behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionDecision {
    /// The chosen tier.
    pub tier_id: TierId,
    /// Whether the tier met the scenario requirements, or was the
    /// highest-quality fallback.
    pub qualified: bool,
    /// Every tier that met the requirements, in input order.
    pub qualified_ids: Vec<TierId>,
}

/// Pick the best tier for `scenario` from `aggregates`.
///
/// Returns `TierscopeError::InvalidState` when `aggregates` is empty.
pub fn select_tier(
    scenario: &Scenario,
    aggregates: &[AggregateTierPerformance],
) -> Result<TierId, TierscopeError> {
    select_tier_explain(scenario, aggregates).map(|decision| decision.tier_id)
}

/// Like [`select_tier`], but also reports how the tier was chosen.
pub fn select_tier_explain(
    scenario: &Scenario,
    aggregates: &[AggregateTierPerformance],
) -> Result<SelectionDecision, TierscopeError> {
    let qualified: Vec<&AggregateTierPerformance> = aggregates
        .iter()
        .filter(|agg| meets_requirements(scenario, agg))
        .collect();

    for agg in aggregates {
        debug!(
            scenario = scenario.name.as_str(),
            tier = %agg.tier_id,
            avg_quality = agg.avg_quality,
            avg_cost = agg.avg_cost,
            efficiency = agg.cost_efficiency_ratio,
            "selection candidate"
        );
    }

    let qualified_ids: Vec<TierId> = qualified.iter().map(|agg| agg.tier_id.clone()).collect();

    let (chosen, is_qualified) = match qualified.iter().copied().max_by(|a, b| by_efficiency(a, b))
    {
        Some(best) => (best, true),
        None => {
            let best = aggregates
                .iter()
                .max_by(|a, b| by_quality(a, b))
                .ok_or_else(|| {
                    TierscopeError::InvalidState(format!(
                        "no tier aggregates to select from for scenario {}",
                        scenario.name
                    ))
                })?;
            (best, false)
        }
    };

    info!(
        scenario = scenario.name.as_str(),
        tier = %chosen.tier_id,
        qualified = is_qualified,
        candidates = qualified_ids.len(),
        "tier selected"
    );

    Ok(SelectionDecision {
        tier_id: chosen.tier_id.clone(),
        qualified: is_qualified,
        qualified_ids,
    })
}

fn meets_requirements(scenario: &Scenario, agg: &AggregateTierPerformance) -> bool {
    agg.avg_quality >= scenario.expected_quality && agg.avg_cost <= scenario.max_cost_per_request
}

/// Ordering where the greater element is the preferred qualified tier:
/// higher efficiency, then lower cost, then smaller id.
fn by_efficiency(a: &AggregateTierPerformance, b: &AggregateTierPerformance) -> Ordering {
    a.cost_efficiency_ratio
        .total_cmp(&b.cost_efficiency_ratio)
        .then_with(|| b.avg_cost.total_cmp(&a.avg_cost))
        .then_with(|| b.tier_id.cmp(&a.tier_id))
}

/// Fallback ordering: higher quality, then lower cost, then smaller id.
fn by_quality(a: &AggregateTierPerformance, b: &AggregateTierPerformance) -> Ordering {
    a.avg_quality
        .total_cmp(&b.avg_quality)
        .then_with(|| b.avg_cost.total_cmp(&a.avg_cost))
        .then_with(|| b.tier_id.cmp(&a.tier_id))
}
