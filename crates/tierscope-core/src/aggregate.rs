// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduction of raw measurements into per-tier aggregate performance.

use crate::catalog::TierCatalog;
use crate::types::{efficiency_ratio, AggregateTierPerformance, Measurement, TierId};

/// Aggregate the measurements belonging to `tier_id`.
///
/// Failed samples are counted in `failed_count` but excluded from every
/// average. Returns `None` when the tier has no completed sample.
pub fn aggregate_tier(
    tier_id: &TierId,
    measurements: &[Measurement],
) -> Option<AggregateTierPerformance> {
    let mut completed = 0usize;
    let mut failed = 0usize;
    let mut quality_sum = 0.0;
    let mut cost_sum = 0.0;
    let mut latency_sum = 0.0;

    for m in measurements.iter().filter(|m| &m.tier_id == tier_id) {
        if m.failed {
            failed += 1;
            continue;
        }
        completed += 1;
        quality_sum += m.quality;
        cost_sum += m.cost;
        latency_sum += m.latency_ms as f64;
    }

    if completed == 0 {
        return None;
    }

    let n = completed as f64;
    let avg_quality = quality_sum / n;
    let avg_cost = cost_sum / n;

    Some(AggregateTierPerformance {
        tier_id: tier_id.clone(),
        avg_quality,
        avg_cost,
        avg_latency_ms: latency_sum / n,
        cost_efficiency_ratio: efficiency_ratio(avg_quality, avg_cost),
        sample_count: completed,
        failed_count: failed,
    })
}

/// Aggregate measurements for every catalog tier, in catalog order.
///
/// Tiers without a completed sample are omitted.
pub fn aggregate_by_tier(
    catalog: &TierCatalog,
    measurements: &[Measurement],
) -> Vec<AggregateTierPerformance> {
    catalog
        .iter()
        .filter_map(|tier| aggregate_tier(&tier.id, measurements))
        .collect()
}
