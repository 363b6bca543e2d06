// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pareto frontier over average quality (maximize) and average cost (minimize).

use tierscope_core::types::AggregateTierPerformance;
use tracing::debug;

/// Whether `a` dominates `b`: at least as good on quality and cost, and
/// strictly better on at least one.
pub fn dominates(a: &AggregateTierPerformance, b: &AggregateTierPerformance) -> bool {
    let no_worse = a.avg_quality >= b.avg_quality && a.avg_cost <= b.avg_cost;
    let better = a.avg_quality > b.avg_quality || a.avg_cost < b.avg_cost;
    no_worse && better
}

/// The non-dominated subset of `aggregates`, in input order.
///
/// Quadratic in the number of tiers. Entries with identical quality and
/// cost do not dominate each other, so both are kept.
pub fn compute_pareto_frontier(
    aggregates: &[AggregateTierPerformance],
) -> Vec<AggregateTierPerformance> {
    let frontier: Vec<AggregateTierPerformance> = aggregates
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !aggregates
                .iter()
                .enumerate()
                .any(|(j, other)| *i != j && dominates(other, candidate))
        })
        .map(|(_, candidate)| candidate.clone())
        .collect();

    debug!(
        candidates = aggregates.len(),
        frontier = frontier.len(),
        "computed pareto frontier"
    );
    frontier
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierscope_core::types::TierId;
    use tierscope_test_utils::aggregate;

    fn ids(aggs: &[AggregateTierPerformance]) -> Vec<&str> {
        aggs.iter().map(|a| a.tier_id.as_str()).collect()
    }

    #[test]
    fn same_cost_higher_quality_dominates() {
        let a = aggregate("A", 70.0, 0.01);
        let b = aggregate("B", 90.0, 0.01);
        let c = aggregate("C", 90.0, 0.02);
        let frontier = compute_pareto_frontier(&[a, b, c]);
        assert_eq!(ids(&frontier), vec!["B"]);
    }

    #[test]
    fn tradeoff_points_all_survive_in_order() {
        let aggs = vec![
            aggregate("pro", 96.0, 0.12),
            aggregate("micro", 70.0, 0.005),
            aggregate("lite", 88.0, 0.02),
        ];
        let frontier = compute_pareto_frontier(&aggs);
        assert_eq!(ids(&frontier), vec!["pro", "micro", "lite"]);
    }

    #[test]
    fn equal_points_do_not_dominate() {
        let a = aggregate("a", 80.0, 0.02);
        let b = aggregate("b", 80.0, 0.02);
        assert!(!dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert_eq!(compute_pareto_frontier(&[a, b]).len(), 2);
    }

    #[test]
    fn dominance_is_strict() {
        let cheap = aggregate("cheap", 80.0, 0.01);
        let pricey = aggregate("pricey", 80.0, 0.02);
        assert!(dominates(&cheap, &pricey));
        assert!(!dominates(&pricey, &cheap));
    }

    #[test]
    fn empty_input_gives_empty_frontier() {
        assert!(compute_pareto_frontier(&[]).is_empty());
    }

    #[test]
    fn frontier_keeps_full_aggregate() {
        let agg = AggregateTierPerformance::new(TierId::new("lite"), 88.0, 0.02, 140.0);
        let frontier = compute_pareto_frontier(std::slice::from_ref(&agg));
        assert_eq!(frontier, vec![agg]);
    }
}
