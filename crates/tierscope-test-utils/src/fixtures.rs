// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value fixtures shared by the workspace tests.

use tierscope_core::catalog::TierCatalog;
use tierscope_core::types::{AggregateTierPerformance, Priority, Scenario, Tier, TierId};

/// The three-tier reference catalog: micro, lite, pro.
pub fn sample_catalog() -> TierCatalog {
    let tier = |id: &str, cost: f64, quality: f64, speed: f64| Tier {
        id: TierId::new(id),
        unit_cost_per_token: cost,
        nominal_quality_multiplier: quality,
        speed_multiplier: speed,
    };
    match TierCatalog::new(vec![
        tier("micro", 0.000035, 0.7, 1.5),
        tier("lite", 0.00006, 0.85, 1.0),
        tier("pro", 0.0008, 0.95, 0.7),
    ]) {
        Ok(catalog) => catalog,
        Err(e) => panic!("reference catalog must be valid: {e}"),
    }
}

/// Aggregate with a single synthetic sample and zero latency.
pub fn aggregate(id: &str, avg_quality: f64, avg_cost: f64) -> AggregateTierPerformance {
    AggregateTierPerformance::new(TierId::new(id), avg_quality, avg_cost, 0.0)
}

/// Scenario with one workload and medium priority.
pub fn scenario(name: &str, expected_quality: f64, max_cost_per_request: f64) -> Scenario {
    Scenario {
        name: name.to_string(),
        expected_quality,
        max_cost_per_request,
        priority: Priority::Medium,
        sample_workloads: vec![format!("{name} workload")],
    }
}

/// The three reference scenarios: simple-qa, technical-analysis, complex-reasoning.
pub fn reference_scenarios() -> Vec<Scenario> {
    let mut simple = scenario("simple-qa", 70.0, 0.01);
    simple.priority = Priority::Low;
    let technical = scenario("technical-analysis", 85.0, 0.05);
    let mut complex = scenario("complex-reasoning", 95.0, 0.15);
    complex.priority = Priority::High;
    vec![simple, technical, complex]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_ordered() {
        let ids: Vec<String> = sample_catalog()
            .ids()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, vec!["micro", "lite", "pro"]);
    }

    #[test]
    fn aggregate_computes_efficiency() {
        let agg = aggregate("lite", 80.0, 0.005);
        assert!((agg.cost_efficiency_ratio - 16_000.0).abs() < 1e-6);
    }
}
