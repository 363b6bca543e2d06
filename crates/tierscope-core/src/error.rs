// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tierscope decision engine.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the Tierscope workspace.
///
/// Budget exhaustion is not a variant: it is a normal outcome of
/// budget-gated selection and is returned as a value, not raised.
#[derive(Debug, Error)]
pub enum TierscopeError {
    /// Malformed tiers, scenarios or budget settings. Raised at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An operation was called with inputs it cannot decide on (e.g. no aggregates).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A tier id was referenced that the catalog does not contain.
    #[error("unknown tier: {0}")]
    UnknownTier(String),

    /// A single measurement did not complete within its per-request timeout.
    #[error("measurement for tier {tier_id} timed out after {timeout:?}")]
    MeasurementTimeout { tier_id: String, timeout: Duration },

    /// The measurement collector failed to produce a sample.
    #[error("collector error: {message}")]
    Collector {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TierscopeError {
    /// Whether this error represents a per-request measurement failure that
    /// should be recorded as a failed sample instead of aborting the caller.
    pub fn is_measurement_failure(&self) -> bool {
        matches!(
            self,
            TierscopeError::MeasurementTimeout { .. } | TierscopeError::Collector { .. }
        )
    }
}
