// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end optimizer runs against a scripted collector.

use std::sync::Arc;
use std::time::Duration;

use tierscope_config::{load_and_validate_str, TierscopeConfig};
use tierscope_core::types::TierId;
use tierscope_core::TierscopeError;
use tierscope_cost::{BudgetDecision, BudgetTracker};
use tierscope_report::{OptimizationConfig, Optimizer};
use tierscope_test_utils::{FakeCollector, TierProfile};

fn reference_collector() -> FakeCollector {
    FakeCollector::new()
        .with_tier("micro", TierProfile::new(72.0, 0.004, Duration::from_millis(400)))
        .with_tier("lite", TierProfile::new(88.0, 0.02, Duration::from_millis(800)))
        .with_tier("pro", TierProfile::new(96.0, 0.09, Duration::from_millis(1500)))
}

fn selected(config: &OptimizationConfig, scenario: &str) -> Option<String> {
    config
        .model_selection
        .get(scenario)
        .map(|id| id.to_string())
}

#[tokio::test(start_paused = true)]
async fn default_configuration_produces_full_report() {
    let optimizer =
        Optimizer::new(TierscopeConfig::default(), Arc::new(reference_collector())).unwrap();
    let report = optimizer.run().await.unwrap();
    let config = &report.config;

    assert_eq!(selected(config, "simple-qa").as_deref(), Some("micro"));
    assert_eq!(selected(config, "technical-analysis").as_deref(), Some("lite"));
    assert_eq!(selected(config, "complex-reasoning").as_deref(), Some("pro"));

    // Every reference tier trades quality for cost, so all sit on the frontier.
    for frontier in config.pareto_frontier.values() {
        assert_eq!(frontier.len(), 3);
    }

    // Fixed latency: the largest batch has the highest throughput.
    assert_eq!(report.sweep.len(), 4);
    assert_eq!(config.batch_optimization.optimal_batch_size, 20);
    assert_eq!(config.batch_optimization.max_concurrent_requests, 20);

    assert_eq!(config.budget_alerts.warning_threshold, 0.8);
    assert_eq!(config.budget_alerts.critical_threshold, 0.95);
    assert_eq!(config.budget_alerts.daily_limit, 10.0);
    assert_eq!(config.quality_thresholds.minimum, 60.0);

    let qa = report
        .scenarios
        .iter()
        .find(|s| s.scenario().name == "simple-qa")
        .unwrap();
    assert!(qa.selection.as_ref().unwrap().qualified);
    assert_eq!(
        qa.budget_decision.as_ref().and_then(|d| d.tier_id()),
        Some(&TierId::new("micro"))
    );
}

#[tokio::test(start_paused = true)]
async fn timed_out_tier_is_excluded_from_selection() {
    let config = load_and_validate_str(
        r#"
[sweep]
request_timeout_ms = 1000
"#,
    )
    .unwrap();
    let collector = FakeCollector::new()
        .with_tier("micro", TierProfile::new(72.0, 0.004, Duration::from_millis(400)))
        .with_tier("lite", TierProfile::new(88.0, 0.02, Duration::from_millis(800)))
        .with_hanging_tier("pro");

    let report = Optimizer::new(config, Arc::new(collector))
        .unwrap()
        .run()
        .await
        .unwrap();

    let complex = report
        .scenarios
        .iter()
        .find(|s| s.scenario().name == "complex-reasoning")
        .unwrap();
    let selection = complex.selection.as_ref().unwrap();
    // Nothing reaches 95, so the highest-quality measured tier is the fallback.
    assert_eq!(selection.tier_id, TierId::new("lite"));
    assert!(!selection.qualified);

    let pro_failures = complex
        .profile
        .measurements
        .iter()
        .filter(|m| m.tier_id == TierId::new("pro") && m.failed)
        .count();
    assert_eq!(pro_failures, complex.scenario().sample_workloads.len());
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_is_reported_per_scenario() {
    let optimizer =
        Optimizer::new(TierscopeConfig::default(), Arc::new(reference_collector())).unwrap();
    let mut tracker = BudgetTracker::from_config(&TierscopeConfig::default()).unwrap();
    tracker.record_spend(10.0).unwrap();

    let report = optimizer.run_with_budget(&tracker).await.unwrap();

    for scenario in &report.scenarios {
        assert!(matches!(
            scenario.budget_decision,
            Some(BudgetDecision::BudgetExceeded { .. })
        ));
    }
    let snapshot = report.config.budget_state.unwrap();
    assert_eq!(snapshot.cumulative_spend, 10.0);
    assert_eq!(snapshot.alert_count, 1);
}

#[tokio::test(start_paused = true)]
async fn unset_sweep_tier_keeps_default_batch_size() {
    let mut config = TierscopeConfig::default();
    config.sweep.tier = None;
    config.sweep.default_batch_size = 7;

    let report = Optimizer::new(config, Arc::new(reference_collector()))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(report.sweep.is_empty());
    assert_eq!(report.config.batch_optimization.optimal_batch_size, 7);
}

#[tokio::test(start_paused = true)]
async fn report_is_written_as_json() {
    let optimizer =
        Optimizer::new(TierscopeConfig::default(), Arc::new(reference_collector())).unwrap();
    let report = optimizer.run().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("optimization-config.json");
    report.config.write_json(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["modelSelection"]["technical-analysis"], "lite");
    assert_eq!(value["batchOptimization"]["optimalBatchSize"], 20);
    assert_eq!(value["budgetAlerts"]["dailyLimit"], 10.0);

    let parsed: OptimizationConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.model_selection, report.config.model_selection);
    assert_eq!(parsed.pareto_frontier, report.config.pareto_frontier);
}

#[test]
fn invalid_tier_list_fails_fast() {
    let mut config = TierscopeConfig::default();
    config.tiers.clear();
    let result = Optimizer::new(config, Arc::new(FakeCollector::new()));
    assert!(matches!(result, Err(TierscopeError::InvalidConfiguration(_))));
}

#[test]
fn semantic_errors_are_rejected_before_any_measurement() {
    let mut config = TierscopeConfig::default();
    config.budget_limits.daily = -5.0;
    config.scenarios[0].max_cost_per_request = -1.0;
    config.scenarios[0].expected_quality = 250.0;
    config.sweep.batch_sizes = vec![0];
    let collector = Arc::new(reference_collector());

    let err = match Optimizer::new(config, collector.clone()) {
        Ok(_) => panic!("invalid configuration was accepted"),
        Err(err) => err,
    };
    let message = match err {
        TierscopeError::InvalidConfiguration(message) => message,
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    };
    assert!(message.contains("budget_limits.daily"));
    assert!(message.contains("max_cost_per_request"));
    assert!(message.contains("expected_quality"));
    assert!(message.contains("batch_sizes"));
    assert_eq!(collector.call_count(), 0);
}

#[test]
fn zero_batch_size_alone_fails_at_construction() {
    let mut config = TierscopeConfig::default();
    config.sweep.batch_sizes = vec![0];
    let collector = Arc::new(reference_collector());

    let result = Optimizer::new(config, collector.clone());
    assert!(matches!(result, Err(TierscopeError::InvalidConfiguration(_))));
    assert_eq!(collector.call_count(), 0);
}
