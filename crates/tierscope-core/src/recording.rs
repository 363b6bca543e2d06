// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any installed recorder can collect these
//! metrics. With no recorder installed every call is a no-op.

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

use crate::types::Measurement;

pub const REQUESTS_TOTAL: &str = "tierscope_requests_total";
pub const TOKENS_TOTAL: &str = "tierscope_tokens_total";
pub const RESPONSE_LATENCY: &str = "tierscope_response_latency_seconds";
pub const REQUEST_COST: &str = "tierscope_request_cost";
pub const QUALITY_SCORE: &str = "tierscope_quality_score";
pub const BUDGET_REMAINING: &str = "tierscope_budget_remaining";

/// How a single measured request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Register all Tierscope metric descriptions.
///
/// Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Measured requests by tier and outcome");
    describe_counter!(TOKENS_TOTAL, Unit::Count, "Tokens consumed by completed requests");
    describe_histogram!(RESPONSE_LATENCY, Unit::Seconds, "Per-request response latency");
    describe_histogram!(REQUEST_COST, "Cost of each completed request");
    describe_histogram!(QUALITY_SCORE, "Quality score of each completed request");
    describe_gauge!(BUDGET_REMAINING, "Spend remaining in the current budget window");
}

/// Record one measured request.
///
/// Every outcome counts toward requests and latency. Tokens, cost and quality
/// are only recorded for completed requests.
pub fn record_measurement(measurement: &Measurement, outcome: RequestOutcome) {
    let tier = measurement.tier_id.to_string();
    let outcome: &'static str = outcome.into();
    metrics::counter!(REQUESTS_TOTAL, "tier" => tier.clone(), "outcome" => outcome).increment(1);
    metrics::histogram!(RESPONSE_LATENCY, "tier" => tier.clone())
        .record(measurement.latency_ms as f64 / 1000.0);

    if measurement.failed {
        return;
    }
    metrics::counter!(TOKENS_TOTAL, "tier" => tier.clone()).increment(measurement.tokens);
    metrics::histogram!(REQUEST_COST, "tier" => tier.clone()).record(measurement.cost);
    metrics::histogram!(QUALITY_SCORE, "tier" => tier).record(measurement.quality);
}

/// Set the spend remaining in the current budget window.
pub fn set_budget_remaining(remaining: f64) {
    metrics::gauge!(BUDGET_REMAINING).set(remaining);
}
