// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Measurement collector trait: the boundary to real backend invocation.

use async_trait::async_trait;

use crate::error::TierscopeError;
use crate::types::{InvocationSample, TierId};

/// Source of per-request measurements.
///
/// Implementations invoke the backend behind `tier_id` with one workload and
/// report what it cost, how good the answer was, and how long it took. How
/// quality is scored and how the backend is reached are up to the
/// implementation; the engine treats the result as opaque data.
#[async_trait]
pub trait MeasurementCollector: Send + Sync {
    async fn invoke(
        &self,
        tier_id: &TierId,
        workload: &str,
    ) -> Result<InvocationSample, TierscopeError>;
}
