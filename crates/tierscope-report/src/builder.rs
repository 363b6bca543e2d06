// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `OptimizationConfig` and its builder.
//!
//! The exported JSON keeps the camelCase field names downstream consumers
//! read: `modelSelection`, `budgetAlerts`, `qualityThresholds` and
//! `batchOptimization`. `paretoFrontier` and `budgetState` are additive and
//! omitted when empty.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use tierscope_bench::BatchResult;
use tierscope_config::TierscopeConfig;
use tierscope_core::types::{AggregateTierPerformance, TierId};
use tierscope_core::TierscopeError;
use tierscope_cost::{BudgetState, BudgetStatus};

/// Exported tier routing and budget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
    /// Scenario name to recommended tier.
    pub model_selection: BTreeMap<String, TierId>,
    pub budget_alerts: BudgetAlertThresholds,
    pub quality_thresholds: QualityThresholds,
    pub batch_optimization: BatchOptimization,
    /// Scenario name to the tiers on its quality/cost Pareto frontier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pareto_frontier: BTreeMap<String, Vec<TierId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_state: Option<BudgetSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlertThresholds {
    /// Fraction of the daily limit that triggers a warning.
    pub warning_threshold: f64,
    /// Fraction of the daily limit treated as critical.
    pub critical_threshold: f64,
    pub daily_limit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityThresholds {
    pub minimum: f64,
    pub target: f64,
    pub premium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptimization {
    pub optimal_batch_size: usize,
    pub max_concurrent_requests: usize,
}

/// Budget window state at the time the report was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSnapshot {
    pub cumulative_spend: f64,
    pub window_limit: f64,
    pub status: BudgetStatus,
    pub alert_count: usize,
}

impl OptimizationConfig {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, TierscopeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TierscopeError::Internal(format!("failed to serialize report: {e}")))
    }

    /// Write pretty-printed JSON to `path`, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<(), TierscopeError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| {
            TierscopeError::Internal(format!(
                "failed to write report to {}: {e}",
                path.display()
            ))
        })?;
        info!(path = %path.display(), "optimization config written");
        Ok(())
    }
}

/// Collects analysis outputs into an [`OptimizationConfig`].
///
/// Makes no decisions of its own: every value comes from the configuration
/// or from a component result handed in by the caller.
#[derive(Debug, Clone)]
pub struct OptimizationReportBuilder {
    model_selection: BTreeMap<String, TierId>,
    pareto_frontier: BTreeMap<String, Vec<TierId>>,
    budget_alerts: BudgetAlertThresholds,
    quality_thresholds: QualityThresholds,
    batch_optimization: BatchOptimization,
    budget_state: Option<BudgetSnapshot>,
}

impl OptimizationReportBuilder {
    /// Start from the thresholds, daily limit and default batch size in `config`.
    pub fn from_config(config: &TierscopeConfig) -> Self {
        Self {
            model_selection: BTreeMap::new(),
            pareto_frontier: BTreeMap::new(),
            budget_alerts: BudgetAlertThresholds {
                warning_threshold: config.budget_alerts.warning_ratio,
                critical_threshold: config.budget_alerts.critical_ratio,
                daily_limit: config.budget_limits.daily,
            },
            quality_thresholds: QualityThresholds {
                minimum: config.quality_thresholds.minimum,
                target: config.quality_thresholds.target,
                premium: config.quality_thresholds.premium,
            },
            batch_optimization: BatchOptimization {
                optimal_batch_size: config.sweep.default_batch_size,
                max_concurrent_requests: config.sweep.max_concurrent_requests,
            },
            budget_state: None,
        }
    }

    /// Record the recommended tier for a scenario.
    pub fn selection(mut self, scenario_name: &str, tier_id: TierId) -> Self {
        self.model_selection.insert(scenario_name.to_string(), tier_id);
        self
    }

    /// Record a scenario's Pareto frontier.
    pub fn frontier(mut self, scenario_name: &str, frontier: &[AggregateTierPerformance]) -> Self {
        self.pareto_frontier.insert(
            scenario_name.to_string(),
            frontier.iter().map(|agg| agg.tier_id.clone()).collect(),
        );
        self
    }

    /// Take the optimal batch size from a sweep result.
    pub fn optimal_batch(mut self, result: &BatchResult) -> Self {
        self.batch_optimization.optimal_batch_size = result.batch_size;
        self
    }

    /// Include the budget window and use its limit as the daily limit.
    pub fn budget(mut self, state: &BudgetState) -> Self {
        self.budget_alerts.daily_limit = state.window_limit;
        self.budget_state = Some(BudgetSnapshot {
            cumulative_spend: state.cumulative_spend,
            window_limit: state.window_limit,
            status: state.status,
            alert_count: state.alerts.len(),
        });
        self
    }

    pub fn build(self) -> OptimizationConfig {
        OptimizationConfig {
            model_selection: self.model_selection,
            budget_alerts: self.budget_alerts,
            quality_thresholds: self.quality_thresholds,
            batch_optimization: self.batch_optimization,
            pareto_frontier: self.pareto_frontier,
            budget_state: self.budget_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierscope_cost::BudgetTracker;
    use tierscope_test_utils::aggregate;

    #[test]
    fn defaults_come_from_config() {
        let report = OptimizationReportBuilder::from_config(&TierscopeConfig::default()).build();
        assert!(report.model_selection.is_empty());
        assert_eq!(report.budget_alerts.warning_threshold, 0.8);
        assert_eq!(report.budget_alerts.critical_threshold, 0.95);
        assert_eq!(report.budget_alerts.daily_limit, 10.0);
        assert_eq!(report.quality_thresholds.premium, 90.0);
        assert_eq!(report.batch_optimization.optimal_batch_size, 10);
        assert_eq!(report.batch_optimization.max_concurrent_requests, 20);
    }

    #[test]
    fn json_uses_downstream_field_names() {
        let report = OptimizationReportBuilder::from_config(&TierscopeConfig::default())
            .selection("technical-analysis", TierId::new("lite"))
            .build();
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["modelSelection"]["technical-analysis"], "lite");
        assert_eq!(value["budgetAlerts"]["warningThreshold"], 0.8);
        assert_eq!(value["budgetAlerts"]["criticalThreshold"], 0.95);
        assert_eq!(value["budgetAlerts"]["dailyLimit"], 10.0);
        assert_eq!(value["qualityThresholds"]["target"], 80.0);
        assert_eq!(value["batchOptimization"]["optimalBatchSize"], 10);
        assert_eq!(value["batchOptimization"]["maxConcurrentRequests"], 20);
        assert!(value.get("paretoFrontier").is_none());
        assert!(value.get("budgetState").is_none());
    }

    #[test]
    fn frontier_and_budget_are_included_when_set() {
        let mut tracker = BudgetTracker::new(25.0, 0.8, 100, None).unwrap();
        tracker.record_spend(21.0).unwrap();
        let report = OptimizationReportBuilder::from_config(&TierscopeConfig::default())
            .frontier(
                "qa",
                &[aggregate("micro", 70.0, 0.005), aggregate("lite", 88.0, 0.02)],
            )
            .budget(tracker.state())
            .build();

        assert_eq!(
            report.pareto_frontier["qa"],
            vec![TierId::new("micro"), TierId::new("lite")]
        );
        assert_eq!(report.budget_alerts.daily_limit, 25.0);
        let snapshot = report.budget_state.unwrap();
        assert_eq!(snapshot.status, BudgetStatus::Warning);
        assert_eq!(snapshot.alert_count, 1);
    }

    #[test]
    fn optimal_batch_overrides_default() {
        let result = BatchResult {
            batch_size: 20,
            total_time_ms: 100.0,
            throughput_rps: 200.0,
            avg_latency_ms: 5.0,
            total_cost: 0.12,
            avg_cost_per_request: Some(0.006),
            avg_quality: Some(85.0),
            failed_requests: 0,
        };
        let report = OptimizationReportBuilder::from_config(&TierscopeConfig::default())
            .optimal_batch(&result)
            .build();
        assert_eq!(report.batch_optimization.optimal_batch_size, 20);
    }
}
