// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-negative prices, unique ids and ordered quality bands.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TierscopeConfig;

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn is_quality(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TierscopeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.tiers.is_empty() {
        errors.push(invalid("at least one [[tiers]] entry is required".to_string()));
    }

    let mut tier_ids = HashSet::new();
    for (i, tier) in config.tiers.iter().enumerate() {
        if tier.id.trim().is_empty() {
            errors.push(invalid(format!("tiers[{i}].id must not be empty")));
        } else if !tier_ids.insert(tier.id.as_str()) {
            errors.push(invalid(format!("duplicate tier id `{}` in [[tiers]] array", tier.id)));
        }
        if !is_non_negative(tier.unit_cost_per_token) {
            errors.push(invalid(format!(
                "tiers[{i}].unit_cost_per_token must be non-negative, got {}",
                tier.unit_cost_per_token
            )));
        }
        if !(tier.nominal_quality_multiplier.is_finite() && tier.nominal_quality_multiplier > 0.0) {
            errors.push(invalid(format!(
                "tiers[{i}].nominal_quality_multiplier must be positive, got {}",
                tier.nominal_quality_multiplier
            )));
        }
        if !(tier.speed_multiplier.is_finite() && tier.speed_multiplier > 0.0) {
            errors.push(invalid(format!(
                "tiers[{i}].speed_multiplier must be positive, got {}",
                tier.speed_multiplier
            )));
        }
    }

    let mut scenario_names = HashSet::new();
    for (i, scenario) in config.scenarios.iter().enumerate() {
        if scenario.name.trim().is_empty() {
            errors.push(invalid(format!("scenarios[{i}].name must not be empty")));
        } else if !scenario_names.insert(scenario.name.as_str()) {
            errors.push(invalid(format!(
                "duplicate scenario name `{}` in [[scenarios]] array",
                scenario.name
            )));
        }
        if !is_quality(scenario.expected_quality) {
            errors.push(invalid(format!(
                "scenarios[{i}].expected_quality must be within 0-100, got {}",
                scenario.expected_quality
            )));
        }
        if !is_non_negative(scenario.max_cost_per_request) {
            errors.push(invalid(format!(
                "scenarios[{i}].max_cost_per_request must be non-negative, got {}",
                scenario.max_cost_per_request
            )));
        }
        if scenario.sample_workloads.is_empty() {
            errors.push(invalid(format!(
                "scenarios[{i}].sample_workloads must list at least one workload"
            )));
        }
    }

    let limits = &config.budget_limits;
    if !(limits.daily.is_finite() && limits.daily > 0.0) {
        errors.push(invalid(format!(
            "budget_limits.daily must be positive, got {}",
            limits.daily
        )));
    }
    if let Some(monthly) = limits.monthly {
        if !is_non_negative(monthly) {
            errors.push(invalid(format!(
                "budget_limits.monthly must be non-negative, got {monthly}"
            )));
        }
    }
    if let Some(per_request) = limits.per_request {
        if !is_non_negative(per_request) {
            errors.push(invalid(format!(
                "budget_limits.per_request must be non-negative, got {per_request}"
            )));
        }
    }

    let q = &config.quality_thresholds;
    if !(is_quality(q.minimum) && is_quality(q.target) && is_quality(q.premium)) {
        errors.push(invalid(
            "quality_thresholds values must be within 0-100".to_string(),
        ));
    } else if !(q.minimum <= q.target && q.target <= q.premium) {
        errors.push(invalid(format!(
            "quality_thresholds must satisfy minimum <= target <= premium, got {} / {} / {}",
            q.minimum, q.target, q.premium
        )));
    }

    let alerts = &config.budget_alerts;
    let in_unit = |r: f64| r.is_finite() && r > 0.0 && r <= 1.0;
    if !in_unit(alerts.warning_ratio) || !in_unit(alerts.critical_ratio) {
        errors.push(invalid(format!(
            "budget_alerts ratios must be within (0, 1], got warning={} critical={}",
            alerts.warning_ratio, alerts.critical_ratio
        )));
    } else if alerts.warning_ratio > alerts.critical_ratio {
        errors.push(invalid(format!(
            "budget_alerts.warning_ratio ({}) must not exceed critical_ratio ({})",
            alerts.warning_ratio, alerts.critical_ratio
        )));
    }

    if config.selection.estimated_tokens_per_request == 0 {
        errors.push(invalid(
            "selection.estimated_tokens_per_request must be at least 1".to_string(),
        ));
    }

    let sweep = &config.sweep;
    if sweep.batch_sizes.is_empty() {
        errors.push(invalid("sweep.batch_sizes must not be empty".to_string()));
    }
    if sweep.batch_sizes.contains(&0) {
        errors.push(invalid("sweep.batch_sizes entries must be at least 1".to_string()));
    }
    if sweep.request_timeout_ms == 0 {
        errors.push(invalid("sweep.request_timeout_ms must be at least 1".to_string()));
    }
    if sweep.max_concurrent_requests == 0 {
        errors.push(invalid(
            "sweep.max_concurrent_requests must be at least 1".to_string(),
        ));
    } else if let Some(&largest) = sweep.batch_sizes.iter().max() {
        if largest > sweep.max_concurrent_requests {
            errors.push(invalid(format!(
                "sweep.batch_sizes entry {largest} exceeds sweep.max_concurrent_requests ({})",
                sweep.max_concurrent_requests
            )));
        }
    }
    if sweep.default_batch_size == 0 {
        errors.push(invalid("sweep.default_batch_size must be at least 1".to_string()));
    }
    if let Some(tier) = &sweep.tier {
        if !config.tiers.iter().any(|t| &t.id == tier) {
            errors.push(invalid(format!(
                "sweep.tier `{tier}` does not name a configured tier"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
