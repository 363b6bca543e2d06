// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain value types shared by every Tierscope component.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a backend tier (e.g. `micro`, `lite`, `pro`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierId(pub String);

impl TierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TierId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A backend tier with its pricing and nominal characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    /// Cost in USD per token.
    pub unit_cost_per_token: f64,
    /// Nominal fraction of the expected quality this tier reaches.
    pub nominal_quality_multiplier: f64,
    /// Relative speed (1.0 = baseline).
    pub speed_multiplier: f64,
}

impl Tier {
    /// Projected cost of a request consuming `tokens` tokens on this tier.
    pub fn cost_for_tokens(&self, tokens: u64) -> f64 {
        tokens as f64 * self.unit_cost_per_token
    }
}

/// Business priority of a scenario.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString,
    Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A class of workload with its quality target and per-request cost ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Required quality on a 0-100 scale.
    pub expected_quality: f64,
    /// Maximum acceptable cost per request in USD.
    pub max_cost_per_request: f64,
    pub priority: Priority,
    /// Representative workloads used when profiling tiers for this scenario.
    pub sample_workloads: Vec<String>,
}

/// Raw result of a single invocation, as reported by a collector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvocationSample {
    pub cost: f64,
    pub quality: f64,
    pub latency_ms: u64,
    pub tokens: u64,
}

/// One measured request against a tier within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub tier_id: TierId,
    pub scenario_name: String,
    pub tokens: u64,
    pub cost: f64,
    pub quality: f64,
    pub latency_ms: u64,
    /// Set when the request failed or timed out. Failed samples carry zero
    /// cost and quality and are excluded from averages.
    pub failed: bool,
}

impl Measurement {
    /// A completed measurement built from a collector sample.
    pub fn completed(tier_id: TierId, scenario_name: &str, sample: InvocationSample) -> Self {
        Self {
            tier_id,
            scenario_name: scenario_name.to_string(),
            tokens: sample.tokens,
            cost: sample.cost,
            quality: sample.quality,
            latency_ms: sample.latency_ms,
            failed: false,
        }
    }

    /// A zero-cost, zero-quality failure sample.
    pub fn failed(tier_id: TierId, scenario_name: &str, latency_ms: u64) -> Self {
        Self {
            tier_id,
            scenario_name: scenario_name.to_string(),
            tokens: 0,
            cost: 0.0,
            quality: 0.0,
            latency_ms,
            failed: true,
        }
    }
}

/// Per-scenario aggregate of a tier's measured performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTierPerformance {
    pub tier_id: TierId,
    pub avg_quality: f64,
    pub avg_cost: f64,
    pub avg_latency_ms: f64,
    /// `avg_quality / avg_cost`.
    pub cost_efficiency_ratio: f64,
    /// Completed samples contributing to the averages.
    pub sample_count: usize,
    /// Failed or timed-out samples (not part of the averages).
    pub failed_count: usize,
}

impl AggregateTierPerformance {
    /// Build an aggregate from already-averaged values.
    pub fn new(tier_id: TierId, avg_quality: f64, avg_cost: f64, avg_latency_ms: f64) -> Self {
        Self {
            tier_id,
            avg_quality,
            avg_cost,
            avg_latency_ms,
            cost_efficiency_ratio: efficiency_ratio(avg_quality, avg_cost),
            sample_count: 1,
            failed_count: 0,
        }
    }
}

/// Quality per unit of cost. A free tier with positive quality is infinitely
/// efficient; a free tier with no quality scores zero.
pub fn efficiency_ratio(quality: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        quality / cost
    } else if quality > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
