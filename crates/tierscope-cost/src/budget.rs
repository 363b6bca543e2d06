// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget tracking over an explicitly reset spend window.
//!
//! The tracker keeps a running total against a window limit and moves through
//! `OPEN -> WARNING -> EXCEEDED`. An alert is raised only on the edge into a
//! state, so repeated spend while already warned or exceeded stays quiet.
//! Windows never roll over on their own: only [`BudgetTracker::reset_window`]
//! starts a new one.
//!
//! Budget exhaustion is not an error. [`BudgetTracker::select_within_budget`]
//! returns [`BudgetDecision::BudgetExceeded`] and the caller decides whether
//! to stop issuing requests.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tierscope_config::TierscopeConfig;
use tierscope_core::catalog::TierCatalog;
use tierscope_core::recording::set_budget_remaining;
use tierscope_core::types::{AggregateTierPerformance, Scenario, TierId};
use tierscope_core::TierscopeError;

use crate::pricing::projected_cost;

/// Budget tracker shared between concurrent recorders.
///
/// The mutex makes each add-and-recompute step atomic.
pub type SharedBudgetTracker = Arc<Mutex<BudgetTracker>>;

/// Window state, ordered by severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString,
    Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// Spend below the warning threshold.
    #[default]
    Open,
    /// Spend at or above the warning threshold.
    Warning,
    /// Spend at or above the window limit. Terminal until reset.
    Exceeded,
}

/// Which threshold an alert reports crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    Warning,
    Exceeded,
}

/// A threshold-crossing notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub kind: AlertKind,
    /// Cumulative spend right after the crossing.
    pub cumulative_spend: f64,
    pub window_limit: f64,
    /// `cumulative_spend / window_limit`.
    pub utilization: f64,
    pub raised_at: DateTime<Utc>,
}

/// Snapshot of the current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetState {
    pub window_limit: f64,
    pub cumulative_spend: f64,
    pub status: BudgetStatus,
    /// Alerts raised since the last reset, oldest first.
    pub alerts: Vec<BudgetAlert>,
}

/// Outcome of budget-gated selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BudgetDecision {
    /// A tier fits the budget.
    Selected { tier_id: TierId, projected_cost: f64 },
    /// No tier's projected cost fits the remaining budget.
    BudgetExceeded { remaining: f64 },
}

impl BudgetDecision {
    /// The selected tier, if any.
    pub fn tier_id(&self) -> Option<&TierId> {
        match self {
            BudgetDecision::Selected { tier_id, .. } => Some(tier_id),
            BudgetDecision::BudgetExceeded { .. } => None,
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, BudgetDecision::BudgetExceeded { .. })
    }
}

/// In-memory spend tracker for a single budget window.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    state: BudgetState,
    /// Fraction of the limit at which the window enters WARNING.
    warning_ratio: f64,
    /// Tokens assumed per request when projecting cost.
    estimated_tokens: u64,
    /// Optional hard cap on any single request's projected cost.
    per_request_cap: Option<f64>,
}

impl BudgetTracker {
    /// Create a tracker with zero spend.
    ///
    /// Fails with `InvalidConfiguration` for a non-positive limit, a warning
    /// ratio outside `(0, 1]`, a zero token estimate or a negative
    /// per-request cap.
    pub fn new(
        window_limit: f64,
        warning_ratio: f64,
        estimated_tokens: u64,
        per_request_cap: Option<f64>,
    ) -> Result<Self, TierscopeError> {
        if !(window_limit.is_finite() && window_limit > 0.0) {
            return Err(TierscopeError::InvalidConfiguration(format!(
                "budget window limit must be positive, got {window_limit}"
            )));
        }
        if !(warning_ratio.is_finite() && warning_ratio > 0.0 && warning_ratio <= 1.0) {
            return Err(TierscopeError::InvalidConfiguration(format!(
                "warning ratio must be within (0, 1], got {warning_ratio}"
            )));
        }
        if estimated_tokens == 0 {
            return Err(TierscopeError::InvalidConfiguration(
                "estimated tokens per request must be at least 1".to_string(),
            ));
        }
        if let Some(cap) = per_request_cap {
            if !(cap.is_finite() && cap >= 0.0) {
                return Err(TierscopeError::InvalidConfiguration(format!(
                    "per-request cap must be non-negative, got {cap}"
                )));
            }
        }

        Ok(Self {
            state: BudgetState {
                window_limit,
                cumulative_spend: 0.0,
                status: BudgetStatus::Open,
                alerts: Vec::new(),
            },
            warning_ratio,
            estimated_tokens,
            per_request_cap,
        })
    }

    /// Build a tracker from the daily limit, warning ratio, token estimate
    /// and per-request cap in `config`.
    pub fn from_config(config: &TierscopeConfig) -> Result<Self, TierscopeError> {
        Self::new(
            config.budget_limits.daily,
            config.budget_alerts.warning_ratio,
            config.selection.estimated_tokens_per_request,
            config.budget_limits.per_request,
        )
    }

    /// Wrap the tracker for use from concurrent tasks.
    pub fn into_shared(self) -> SharedBudgetTracker {
        Arc::new(Mutex::new(self))
    }

    /// Add `amount` to the window's spend and recompute the status.
    ///
    /// Returns the alert raised if this spend crossed into WARNING or
    /// EXCEEDED. Crossing both at once raises only the EXCEEDED alert.
    /// Negative or non-finite amounts are rejected with `InvalidState`.
    pub fn record_spend(&mut self, amount: f64) -> Result<Option<BudgetAlert>, TierscopeError> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(TierscopeError::InvalidState(format!(
                "spend amount must be a non-negative finite number, got {amount}"
            )));
        }

        self.state.cumulative_spend += amount;
        let previous = self.state.status;
        let current = self.compute_status();
        self.state.status = current;
        set_budget_remaining(self.remaining());

        debug!(
            amount,
            cumulative_spend = self.state.cumulative_spend,
            status = %current,
            "recorded spend"
        );

        if current <= previous {
            return Ok(None);
        }

        let kind = match current {
            BudgetStatus::Warning => AlertKind::Warning,
            BudgetStatus::Exceeded => AlertKind::Exceeded,
            BudgetStatus::Open => return Ok(None),
        };
        let alert = BudgetAlert {
            kind,
            cumulative_spend: self.state.cumulative_spend,
            window_limit: self.state.window_limit,
            utilization: self.utilization(),
            raised_at: Utc::now(),
        };

        match kind {
            AlertKind::Warning => warn!(
                cumulative_spend = alert.cumulative_spend,
                window_limit = alert.window_limit,
                warning_ratio = self.warning_ratio,
                "budget warning threshold crossed"
            ),
            AlertKind::Exceeded => warn!(
                cumulative_spend = alert.cumulative_spend,
                window_limit = alert.window_limit,
                "budget window exceeded"
            ),
        }

        self.state.alerts.push(alert.clone());
        Ok(Some(alert))
    }

    /// Pick the tier whose average quality is closest to the scenario's
    /// expected quality among tiers whose projected cost fits
    /// `min(remaining, scenario.max_cost_per_request, per_request_cap)`.
    ///
    /// Ties go to the lower projected cost, then the smaller id. Returns
    /// `BudgetExceeded` when no tier fits. Fails with `InvalidState` when
    /// `aggregates` is empty and with `UnknownTier` when an aggregate names
    /// a tier missing from `catalog`.
    pub fn select_within_budget(
        &self,
        scenario: &Scenario,
        aggregates: &[AggregateTierPerformance],
        catalog: &TierCatalog,
    ) -> Result<BudgetDecision, TierscopeError> {
        if aggregates.is_empty() {
            return Err(TierscopeError::InvalidState(format!(
                "no tier aggregates for budget-gated selection in scenario {}",
                scenario.name
            )));
        }

        let remaining = self.remaining();
        let mut bound = remaining.min(scenario.max_cost_per_request);
        if let Some(cap) = self.per_request_cap {
            bound = bound.min(cap);
        }

        let mut best: Option<(&AggregateTierPerformance, f64)> = None;
        for agg in aggregates {
            let tier = catalog.require(&agg.tier_id)?;
            let cost = projected_cost(tier, self.estimated_tokens);
            let fits = cost <= bound;
            debug!(
                scenario = scenario.name.as_str(),
                tier = %agg.tier_id,
                projected_cost = cost,
                bound,
                fits,
                "budget candidate"
            );
            if !fits {
                continue;
            }
            let better = match best {
                None => true,
                Some((current, current_cost)) => {
                    closer_to_target(scenario.expected_quality, (agg, cost), (current, current_cost))
                        == Ordering::Less
                }
            };
            if better {
                best = Some((agg, cost));
            }
        }

        match best {
            Some((agg, cost)) => {
                info!(
                    scenario = scenario.name.as_str(),
                    tier = %agg.tier_id,
                    projected_cost = cost,
                    remaining,
                    "tier selected within budget"
                );
                Ok(BudgetDecision::Selected {
                    tier_id: agg.tier_id.clone(),
                    projected_cost: cost,
                })
            }
            None => {
                info!(
                    scenario = scenario.name.as_str(),
                    remaining,
                    bound,
                    "no tier fits the remaining budget"
                );
                Ok(BudgetDecision::BudgetExceeded { remaining })
            }
        }
    }

    /// Start a new window: zero spend, clear alerts, return to OPEN.
    pub fn reset_window(&mut self) {
        info!(
            previous_spend = self.state.cumulative_spend,
            window_limit = self.state.window_limit,
            "budget window reset"
        );
        self.state.cumulative_spend = 0.0;
        self.state.status = BudgetStatus::Open;
        self.state.alerts.clear();
        set_budget_remaining(self.remaining());
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn status(&self) -> BudgetStatus {
        self.state.status
    }

    pub fn cumulative_spend(&self) -> f64 {
        self.state.cumulative_spend
    }

    pub fn window_limit(&self) -> f64 {
        self.state.window_limit
    }

    pub fn warning_ratio(&self) -> f64 {
        self.warning_ratio
    }

    pub fn estimated_tokens(&self) -> u64 {
        self.estimated_tokens
    }

    /// Budget left in the window, never negative.
    pub fn remaining(&self) -> f64 {
        (self.state.window_limit - self.state.cumulative_spend).max(0.0)
    }

    /// Fraction of the window limit spent (may exceed 1.0).
    pub fn utilization(&self) -> f64 {
        self.state.cumulative_spend / self.state.window_limit
    }

    fn compute_status(&self) -> BudgetStatus {
        let spend = self.state.cumulative_spend;
        let limit = self.state.window_limit;
        if spend >= limit {
            BudgetStatus::Exceeded
        } else if spend >= limit * self.warning_ratio {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Open
        }
    }
}

/// `Less` when `a` is the better budget candidate: quality closer to
/// `target`, then lower projected cost, then smaller id.
fn closer_to_target(
    target: f64,
    a: (&AggregateTierPerformance, f64),
    b: (&AggregateTierPerformance, f64),
) -> Ordering {
    let distance_a = (a.0.avg_quality - target).abs();
    let distance_b = (b.0.avg_quality - target).abs();
    distance_a
        .total_cmp(&distance_b)
        .then_with(|| a.1.total_cmp(&b.1))
        .then_with(|| a.0.tier_id.cmp(&b.0.tier_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use tierscope_core::recording::BUDGET_REMAINING;
    use tierscope_test_utils::{aggregate, sample_catalog, scenario};
    use tracing_test::traced_test;

    fn tracker(limit: f64) -> BudgetTracker {
        BudgetTracker::new(limit, 0.8, 100, None).unwrap()
    }

    #[test]
    fn transitions_raise_one_alert_per_edge() {
        let mut t = tracker(10.0);

        assert!(t.record_spend(6.0).unwrap().is_none());
        assert_eq!(t.status(), BudgetStatus::Open);

        let warning = t.record_spend(2.5).unwrap().unwrap();
        assert_eq!(warning.kind, AlertKind::Warning);
        assert_eq!(warning.cumulative_spend, 8.5);
        assert_eq!(t.status(), BudgetStatus::Warning);

        let exceeded = t.record_spend(2.0).unwrap().unwrap();
        assert_eq!(exceeded.kind, AlertKind::Exceeded);
        assert_eq!(t.status(), BudgetStatus::Exceeded);
        assert_eq!(t.cumulative_spend(), 10.5);

        assert!(t.record_spend(1.0).unwrap().is_none());
        assert_eq!(t.state().alerts.len(), 2);
    }

    #[test]
    fn repeated_spend_in_warning_is_quiet() {
        let mut t = tracker(10.0);
        assert!(t.record_spend(8.0).unwrap().is_some());
        assert!(t.record_spend(0.5).unwrap().is_none());
        assert!(t.record_spend(0.5).unwrap().is_none());
        assert_eq!(t.state().alerts.len(), 1);
    }

    #[test]
    fn jump_straight_to_exceeded_raises_single_alert() {
        let mut t = tracker(10.0);
        let alert = t.record_spend(12.0).unwrap().unwrap();
        assert_eq!(alert.kind, AlertKind::Exceeded);
        assert_eq!(t.state().alerts.len(), 1);
        assert_eq!(t.remaining(), 0.0);
    }

    #[test]
    fn negative_spend_is_rejected() {
        let mut t = tracker(10.0);
        t.record_spend(1.0).unwrap();
        let err = t.record_spend(-0.5).unwrap_err();
        assert!(matches!(err, TierscopeError::InvalidState(_)));
        assert!(t.record_spend(f64::NAN).is_err());
        assert_eq!(t.cumulative_spend(), 1.0);
    }

    #[test]
    fn reset_window_clears_spend_and_alerts() {
        let mut t = tracker(10.0);
        t.record_spend(11.0).unwrap();
        t.reset_window();
        assert_eq!(t.cumulative_spend(), 0.0);
        assert_eq!(t.status(), BudgetStatus::Open);
        assert!(t.state().alerts.is_empty());
        // Alerts fire again in the new window.
        assert!(t.record_spend(9.0).unwrap().is_some());
    }

    #[test]
    fn remaining_budget_gauge_follows_spend_and_reset() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let gauge = || {
            snapshotter
                .snapshot()
                .into_vec()
                .into_iter()
                .find(|(key, ..)| key.key().name() == BUDGET_REMAINING)
                .and_then(|(_, _, _, value)| match value {
                    DebugValue::Gauge(v) => Some(v.0),
                    _ => None,
                })
        };

        let mut t = tracker(10.0);
        metrics::with_local_recorder(&recorder, || t.record_spend(7.5).unwrap());
        assert_eq!(gauge(), Some(2.5));

        metrics::with_local_recorder(&recorder, || t.record_spend(5.0).unwrap());
        assert_eq!(gauge(), Some(0.0));

        metrics::with_local_recorder(&recorder, || t.reset_window());
        assert_eq!(gauge(), Some(10.0));
    }

    #[test]
    fn invalid_construction_fails_fast() {
        assert!(BudgetTracker::new(0.0, 0.8, 100, None).is_err());
        assert!(BudgetTracker::new(10.0, 1.5, 100, None).is_err());
        assert!(BudgetTracker::new(10.0, 0.8, 0, None).is_err());
        assert!(BudgetTracker::new(10.0, 0.8, 100, Some(-1.0)).is_err());
    }

    #[test]
    fn from_config_uses_daily_limit() {
        let config = TierscopeConfig::default();
        let t = BudgetTracker::from_config(&config).unwrap();
        assert_eq!(t.window_limit(), 10.0);
        assert_eq!(t.warning_ratio(), 0.8);
        assert_eq!(t.estimated_tokens(), 100);
    }

    #[traced_test]
    #[test]
    fn alert_edges_are_logged() {
        let mut t = tracker(10.0);
        t.record_spend(8.5).unwrap();
        assert!(logs_contain("budget warning threshold crossed"));
        t.record_spend(2.0).unwrap();
        assert!(logs_contain("budget window exceeded"));
    }

    #[test]
    fn picks_quality_closest_to_target_that_fits() {
        let catalog = sample_catalog();
        let t = tracker(10.0);
        let s = scenario("technical-analysis", 85.0, 0.05);
        let aggs = vec![
            aggregate("micro", 70.0, 0.005),
            aggregate("lite", 88.0, 0.02),
            aggregate("pro", 96.0, 0.12),
        ];
        // pro projects to 0.08 and exceeds the scenario cap.
        let decision = t.select_within_budget(&s, &aggs, &catalog).unwrap();
        assert_eq!(decision.tier_id(), Some(&TierId::new("lite")));
    }

    #[test]
    fn low_remaining_budget_forces_cheaper_tier() {
        let catalog = sample_catalog();
        let mut t = tracker(10.0);
        t.record_spend(9.995).unwrap();
        let s = scenario("technical-analysis", 85.0, 0.05);
        let aggs = vec![aggregate("micro", 70.0, 0.005), aggregate("lite", 88.0, 0.02)];
        let decision = t.select_within_budget(&s, &aggs, &catalog).unwrap();
        assert_eq!(decision.tier_id(), Some(&TierId::new("micro")));
    }

    #[test]
    fn exhausted_budget_returns_sentinel() {
        let catalog = sample_catalog();
        let mut t = tracker(10.0);
        t.record_spend(10.0).unwrap();
        let s = scenario("simple-qa", 70.0, 0.01);
        let aggs = vec![aggregate("micro", 70.0, 0.005)];
        let decision = t.select_within_budget(&s, &aggs, &catalog).unwrap();
        assert_eq!(decision, BudgetDecision::BudgetExceeded { remaining: 0.0 });
        assert!(decision.is_exceeded());
    }

    #[test]
    fn per_request_cap_tightens_bound() {
        let catalog = sample_catalog();
        let t = BudgetTracker::new(10.0, 0.8, 100, Some(0.005)).unwrap();
        let s = scenario("technical-analysis", 85.0, 0.05);
        let aggs = vec![aggregate("micro", 70.0, 0.005), aggregate("lite", 88.0, 0.02)];
        // lite projects to 0.006, above the 0.005 cap.
        let decision = t.select_within_budget(&s, &aggs, &catalog).unwrap();
        assert_eq!(decision.tier_id(), Some(&TierId::new("micro")));
    }

    #[test]
    fn unknown_tier_in_aggregates_is_an_error() {
        let catalog = sample_catalog();
        let t = tracker(10.0);
        let s = scenario("s", 80.0, 1.0);
        let err = t
            .select_within_budget(&s, &[aggregate("ultra", 99.0, 0.1)], &catalog)
            .unwrap_err();
        assert!(matches!(err, TierscopeError::UnknownTier(id) if id == "ultra"));
    }

    #[test]
    fn empty_aggregates_is_invalid_state() {
        let catalog = sample_catalog();
        let t = tracker(10.0);
        let s = scenario("s", 80.0, 1.0);
        let err = t.select_within_budget(&s, &[], &catalog).unwrap_err();
        assert!(matches!(err, TierscopeError::InvalidState(_)));
    }

    #[tokio::test]
    async fn shared_tracker_serializes_concurrent_spend() {
        let shared = tracker(1000.0).into_shared();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let shared = Arc::clone(&shared);
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    shared.lock().await.record_spend(0.5).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let t = shared.lock().await;
        assert_eq!(t.cumulative_spend(), 80.0);
        assert_eq!(t.status(), BudgetStatus::Open);
    }
}
