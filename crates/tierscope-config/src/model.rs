// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Tierscope.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use tierscope_core::{Priority, Scenario, Tier, TierCatalog, TierId, TierscopeError};

/// Top-level Tierscope configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section defaults to the reference micro/lite/pro setup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierscopeConfig {
    /// Backend tiers available for selection.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,

    /// Workload scenarios to optimize for.
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<ScenarioConfig>,

    /// Spending limits.
    #[serde(default)]
    pub budget_limits: BudgetLimitsConfig,

    /// Quality bands exported with the optimization result.
    #[serde(default)]
    pub quality_thresholds: QualityThresholdsConfig,

    /// Alert ratios relative to the daily limit.
    #[serde(default)]
    pub budget_alerts: BudgetAlertConfig,

    /// Budget-gated selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Throughput sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for TierscopeConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            scenarios: default_scenarios(),
            budget_limits: BudgetLimitsConfig::default(),
            quality_thresholds: QualityThresholdsConfig::default(),
            budget_alerts: BudgetAlertConfig::default(),
            selection: SelectionConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl TierscopeConfig {
    /// Build the validated tier catalog described by `[[tiers]]`.
    pub fn tier_catalog(&self) -> Result<TierCatalog, TierscopeError> {
        TierCatalog::new(self.tiers.iter().map(TierConfig::to_tier).collect())
    }

    /// Core scenario values described by `[[scenarios]]`.
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.scenarios.iter().map(ScenarioConfig::to_scenario).collect()
    }
}

/// A single backend tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Tier identifier, unique within the catalog.
    pub id: String,

    /// Cost in USD per token.
    pub unit_cost_per_token: f64,

    /// Nominal fraction of the expected quality this tier reaches.
    #[serde(default = "default_quality_multiplier")]
    pub nominal_quality_multiplier: f64,

    /// Relative speed (1.0 = baseline).
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
}

impl TierConfig {
    pub fn to_tier(&self) -> Tier {
        Tier {
            id: TierId::new(self.id.clone()),
            unit_cost_per_token: self.unit_cost_per_token,
            nominal_quality_multiplier: self.nominal_quality_multiplier,
            speed_multiplier: self.speed_multiplier,
        }
    }
}

fn default_quality_multiplier() -> f64 {
    1.0
}

fn default_speed_multiplier() -> f64 {
    1.0
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig {
            id: "micro".to_string(),
            unit_cost_per_token: 0.000035,
            nominal_quality_multiplier: 0.7,
            speed_multiplier: 1.5,
        },
        TierConfig {
            id: "lite".to_string(),
            unit_cost_per_token: 0.00006,
            nominal_quality_multiplier: 0.85,
            speed_multiplier: 1.0,
        },
        TierConfig {
            id: "pro".to_string(),
            unit_cost_per_token: 0.0008,
            nominal_quality_multiplier: 0.95,
            speed_multiplier: 0.7,
        },
    ]
}

/// A workload scenario with its quality target and cost ceiling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Scenario name, used as the key in the exported model selection.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Use case label (e.g. `customer-support`).
    #[serde(default)]
    pub use_case: Option<String>,

    /// Required quality on a 0-100 scale.
    pub expected_quality: f64,

    /// Maximum acceptable cost per request in USD.
    pub max_cost_per_request: f64,

    /// Business priority (`low`, `medium`, `high`).
    #[serde(default)]
    pub priority: Priority,

    /// Representative workloads used to profile tiers.
    #[serde(default)]
    pub sample_workloads: Vec<String>,
}

impl ScenarioConfig {
    pub fn to_scenario(&self) -> Scenario {
        Scenario {
            name: self.name.clone(),
            expected_quality: self.expected_quality,
            max_cost_per_request: self.max_cost_per_request,
            priority: self.priority,
            sample_workloads: self.sample_workloads.clone(),
        }
    }
}

fn default_scenarios() -> Vec<ScenarioConfig> {
    vec![
        ScenarioConfig {
            name: "simple-qa".to_string(),
            description: "Short factual question answering".to_string(),
            use_case: Some("customer-support".to_string()),
            expected_quality: 70.0,
            max_cost_per_request: 0.01,
            priority: Priority::Low,
            sample_workloads: vec![
                "What is a managed file system?".to_string(),
                "How is serverless compute billed?".to_string(),
                "How does retrieval-augmented generation work?".to_string(),
            ],
        },
        ScenarioConfig {
            name: "technical-analysis".to_string(),
            description: "Technical explanation and analysis".to_string(),
            use_case: Some("technical-documentation".to_string()),
            expected_quality: 85.0,
            max_cost_per_request: 0.05,
            priority: Priority::Medium,
            sample_workloads: vec![
                "Explain techniques for tuning shared file system performance.".to_string(),
                "Analyze ways to improve vector search precision in a RAG system.".to_string(),
                "Describe design patterns and best practices for serverless architectures."
                    .to_string(),
            ],
        },
        ScenarioConfig {
            name: "complex-reasoning".to_string(),
            description: "Multi-factor reasoning and decision support".to_string(),
            use_case: Some("strategic-planning".to_string()),
            expected_quality: 95.0,
            max_cost_per_request: 0.15,
            priority: Priority::High,
            sample_workloads: vec![
                "Balance cost, performance and security for an enterprise storage rollout and propose an implementation strategy.".to_string(),
                "Optimize consistency, latency and cost together for a multi-region RAG system.".to_string(),
            ],
        },
    ]
}

/// Spending limits in USD.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetLimitsConfig {
    /// Limit for one budget window (a day by default).
    #[serde(default = "default_daily_limit")]
    pub daily: f64,

    /// Monthly limit. Informational; not enforced by the window tracker.
    #[serde(default = "default_monthly_limit")]
    pub monthly: Option<f64>,

    /// Cap on the projected cost of any single request. `None` means no cap.
    #[serde(default = "default_per_request_limit")]
    pub per_request: Option<f64>,
}

impl Default for BudgetLimitsConfig {
    fn default() -> Self {
        Self {
            daily: default_daily_limit(),
            monthly: default_monthly_limit(),
            per_request: default_per_request_limit(),
        }
    }
}

fn default_daily_limit() -> f64 {
    10.0
}

fn default_monthly_limit() -> Option<f64> {
    Some(300.0)
}

fn default_per_request_limit() -> Option<f64> {
    Some(0.20)
}

/// Quality bands on a 0-100 scale.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QualityThresholdsConfig {
    #[serde(default = "default_minimum_quality")]
    pub minimum: f64,

    #[serde(default = "default_target_quality")]
    pub target: f64,

    #[serde(default = "default_premium_quality")]
    pub premium: f64,
}

impl Default for QualityThresholdsConfig {
    fn default() -> Self {
        Self {
            minimum: default_minimum_quality(),
            target: default_target_quality(),
            premium: default_premium_quality(),
        }
    }
}

fn default_minimum_quality() -> f64 {
    60.0
}

fn default_target_quality() -> f64 {
    80.0
}

fn default_premium_quality() -> f64 {
    90.0
}

/// Alert ratios as fractions of the window limit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetAlertConfig {
    /// Utilization at which the tracker enters the warning state.
    #[serde(default = "default_warning_ratio")]
    pub warning_ratio: f64,

    /// Utilization exported as the critical alert threshold.
    #[serde(default = "default_critical_ratio")]
    pub critical_ratio: f64,
}

impl Default for BudgetAlertConfig {
    fn default() -> Self {
        Self {
            warning_ratio: default_warning_ratio(),
            critical_ratio: default_critical_ratio(),
        }
    }
}

fn default_warning_ratio() -> f64 {
    0.8
}

fn default_critical_ratio() -> f64 {
    0.95
}

/// Budget-gated selection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Token count assumed for every request when projecting its cost.
    #[serde(default = "default_estimated_tokens")]
    pub estimated_tokens_per_request: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            estimated_tokens_per_request: default_estimated_tokens(),
        }
    }
}

fn default_estimated_tokens() -> u64 {
    100
}

/// Throughput sweep settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Tier to sweep. Must exist in `[[tiers]]`.
    #[serde(default = "default_sweep_tier")]
    pub tier: Option<String>,

    /// Candidate batch sizes, measured one at a time in this order.
    #[serde(default = "default_batch_sizes")]
    pub batch_sizes: Vec<usize>,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Exported concurrency ceiling for deployments.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Batch size exported when no sweep has been run.
    #[serde(default = "default_batch_size")]
    pub default_batch_size: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            tier: default_sweep_tier(),
            batch_sizes: default_batch_sizes(),
            request_timeout_ms: default_request_timeout_ms(),
            max_concurrent_requests: default_max_concurrent_requests(),
            default_batch_size: default_batch_size(),
        }
    }
}

fn default_sweep_tier() -> Option<String> {
    Some("lite".to_string())
}

fn default_batch_sizes() -> Vec<usize> {
    vec![1, 5, 10, 20]
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_concurrent_requests() -> usize {
    20
}

fn default_batch_size() -> usize {
    10
}
