// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget window simulation.
//!
//! Replays traffic round-robin across profiled scenarios, gating every
//! request through budget-aware selection and charging the measured cost
//! to the tracker, until the window runs out or the request cap is hit.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use tierscope_core::catalog::TierCatalog;
use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::TierId;
use tierscope_core::TierscopeError;
use tierscope_cost::{BudgetAlert, BudgetDecision, BudgetStatus, BudgetTracker};

use crate::measure::measure_once;
use crate::profile::ScenarioProfile;

/// Outcome of a simulated budget window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRunSummary {
    /// Requests dispatched, failed ones included.
    pub requests_served: usize,
    pub failed_requests: usize,
    pub total_spend: f64,
    pub utilization: f64,
    pub final_status: BudgetStatus,
    /// Whether the run ended on a `BudgetExceeded` decision.
    pub stopped_on_budget: bool,
    pub alerts: Vec<BudgetAlert>,
    /// Requests served per tier.
    pub tier_usage: BTreeMap<TierId, usize>,
}

/// Simulate up to `max_requests` budget-gated requests.
///
/// Request `i` goes to scenario `profiles[i % profiles.len()]` and uses that
/// scenario's workloads in rotation. Stops at the first `BudgetExceeded`.
/// Fails with `InvalidState` when `profiles` is empty and propagates
/// selection errors (e.g. a scenario with no aggregates).
pub async fn simulate_budget_window(
    tracker: &mut BudgetTracker,
    collector: &dyn MeasurementCollector,
    catalog: &TierCatalog,
    profiles: &[ScenarioProfile],
    max_requests: usize,
    request_timeout: Duration,
) -> Result<BudgetRunSummary, TierscopeError> {
    if profiles.is_empty() {
        return Err(TierscopeError::InvalidState(
            "budget simulation needs at least one profiled scenario".to_string(),
        ));
    }

    let spend_before = tracker.cumulative_spend();
    let mut requests_served = 0;
    let mut failed_requests = 0;
    let mut stopped_on_budget = false;
    let mut tier_usage: BTreeMap<TierId, usize> = BTreeMap::new();

    for i in 0..max_requests {
        let profile = &profiles[i % profiles.len()];
        let scenario = &profile.scenario;

        let tier_id = match tracker.select_within_budget(scenario, &profile.aggregates, catalog)? {
            BudgetDecision::Selected { tier_id, .. } => tier_id,
            BudgetDecision::BudgetExceeded { remaining } => {
                info!(
                    request = i,
                    scenario = scenario.name.as_str(),
                    remaining,
                    "budget simulation stopped: window exhausted"
                );
                stopped_on_budget = true;
                break;
            }
        };

        let round = i / profiles.len();
        let workload = scenario
            .sample_workloads
            .get(round % scenario.sample_workloads.len().max(1))
            .map(String::as_str)
            .unwrap_or_default();

        let m = measure_once(collector, &tier_id, &scenario.name, workload, request_timeout).await;
        if m.failed {
            failed_requests += 1;
        }
        tracker.record_spend(m.cost)?;
        requests_served += 1;
        *tier_usage.entry(tier_id).or_default() += 1;
    }

    let summary = BudgetRunSummary {
        requests_served,
        failed_requests,
        total_spend: tracker.cumulative_spend() - spend_before,
        utilization: tracker.utilization(),
        final_status: tracker.status(),
        stopped_on_budget,
        alerts: tracker.state().alerts.clone(),
        tier_usage,
    };
    info!(
        requests = summary.requests_served,
        total_spend = summary.total_spend,
        utilization = summary.utilization,
        status = %summary.final_status,
        "budget simulation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierscope_core::types::AggregateTierPerformance;
    use tierscope_test_utils::{aggregate, sample_catalog, scenario, FakeCollector, TierProfile};

    fn profile(name: &str, expected: f64, max_cost: f64) -> ScenarioProfile {
        ScenarioProfile {
            scenario: scenario(name, expected, max_cost),
            measurements: Vec::new(),
            aggregates: vec![
                aggregate("micro", 70.0, 0.004),
                aggregate("lite", 86.0, 0.006),
            ],
        }
    }

    fn collector() -> FakeCollector {
        FakeCollector::new()
            .with_tier("micro", TierProfile::new(70.0, 0.25, Duration::from_millis(10)))
            .with_tier("lite", TierProfile::new(86.0, 0.5, Duration::from_millis(10)))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_budget_is_exhausted() {
        let catalog = sample_catalog();
        let mut tracker = BudgetTracker::new(2.0, 0.8, 100, None).unwrap();
        let profiles = vec![profile("qa", 70.0, 0.01), profile("analysis", 85.0, 0.05)];

        let summary = simulate_budget_window(
            &mut tracker,
            &collector(),
            &catalog,
            &profiles,
            100,
            Duration::from_secs(1),
        )
        .await
        .unwrap();

        // micro (0.25) and lite (0.5) alternate: 0.75 per round, 2.25 after 6 requests.
        assert!(summary.stopped_on_budget);
        assert_eq!(summary.requests_served, 6);
        assert_eq!(summary.total_spend, 2.25);
        assert_eq!(summary.final_status, BudgetStatus::Exceeded);
        assert_eq!(summary.alerts.len(), 2);
        assert_eq!(summary.tier_usage.get(&TierId::new("micro")), Some(&3));
        assert_eq!(summary.tier_usage.get(&TierId::new("lite")), Some(&3));
    }

    #[tokio::test(start_paused = true)]
    async fn request_cap_ends_the_run() {
        let catalog = sample_catalog();
        let mut tracker = BudgetTracker::new(100.0, 0.8, 100, None).unwrap();
        let profiles = vec![profile("qa", 70.0, 0.01)];
        let summary = simulate_budget_window(
            &mut tracker,
            &collector(),
            &catalog,
            &profiles,
            4,
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert!(!summary.stopped_on_budget);
        assert_eq!(summary.requests_served, 4);
        assert_eq!(summary.final_status, BudgetStatus::Open);
    }

    #[tokio::test]
    async fn empty_profiles_is_invalid_state() {
        let mut tracker = BudgetTracker::new(10.0, 0.8, 100, None).unwrap();
        let err = simulate_budget_window(
            &mut tracker,
            &collector(),
            &sample_catalog(),
            &[],
            10,
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TierscopeError::InvalidState(_)));
    }

    #[tokio::test]
    async fn scenario_without_aggregates_propagates_error() {
        let mut tracker = BudgetTracker::new(10.0, 0.8, 100, None).unwrap();
        let mut empty = profile("qa", 70.0, 0.01);
        empty.aggregates = Vec::<AggregateTierPerformance>::new();
        let result = simulate_budget_window(
            &mut tracker,
            &collector(),
            &sample_catalog(),
            &[empty],
            10,
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_err());
    }
}
