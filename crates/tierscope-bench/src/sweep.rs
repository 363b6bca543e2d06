// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throughput sweep over candidate batch sizes.
//!
//! Each batch dispatches all of its requests at once and waits for every one
//! to finish before computing metrics. Batches run one after another so a
//! sweep point never shares the backend with another.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::TierId;
use tierscope_core::TierscopeError;

use crate::measure::measure_once;

/// Scenario name attached to sweep measurements.
const SWEEP_SCENARIO: &str = "throughput-sweep";

/// Metrics for one sweep point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_size: usize,
    /// Wall time from dispatch until the last request finished.
    pub total_time_ms: f64,
    /// Requests per second, failed requests included.
    pub throughput_rps: f64,
    /// `total_time_ms / batch_size`.
    pub avg_latency_ms: f64,
    pub total_cost: f64,
    /// Mean cost over completed requests; `None` if every request failed.
    pub avg_cost_per_request: Option<f64>,
    /// Mean quality over completed requests; `None` if every request failed.
    pub avg_quality: Option<f64>,
    pub failed_requests: usize,
}

/// Measures throughput of a tier at several concurrency levels.
pub struct ThroughputSweepAnalyzer {
    collector: Arc<dyn MeasurementCollector>,
    request_timeout: Duration,
}

impl ThroughputSweepAnalyzer {
    pub fn new(collector: Arc<dyn MeasurementCollector>, request_timeout: Duration) -> Self {
        Self {
            collector,
            request_timeout,
        }
    }

    /// Run one batch per entry of `batch_sizes`, in order.
    ///
    /// Request `i` of a batch uses `workloads[i % workloads.len()]`. Fails
    /// with `InvalidState` for a zero batch size or an empty workload list.
    pub async fn sweep(
        &self,
        tier_id: &TierId,
        batch_sizes: &[usize],
        workloads: &[String],
    ) -> Result<Vec<BatchResult>, TierscopeError> {
        if workloads.is_empty() {
            return Err(TierscopeError::InvalidState(
                "throughput sweep needs at least one workload".to_string(),
            ));
        }
        if batch_sizes.contains(&0) {
            return Err(TierscopeError::InvalidState(
                "throughput sweep batch sizes must be at least 1".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(batch_sizes.len());
        for &batch_size in batch_sizes {
            let result = self.run_batch(tier_id, batch_size, workloads).await;
            debug!(
                tier = %tier_id,
                batch_size,
                throughput_rps = result.throughput_rps,
                failed = result.failed_requests,
                "sweep point measured"
            );
            results.push(result);
        }
        Ok(results)
    }

    async fn run_batch(
        &self,
        tier_id: &TierId,
        batch_size: usize,
        workloads: &[String],
    ) -> BatchResult {
        let collector = self.collector.as_ref();
        let timeout = self.request_timeout;
        let started = Instant::now();
        let measurements = join_all((0..batch_size).map(move |i| {
            let workload = &workloads[i % workloads.len()];
            measure_once(
                collector,
                tier_id,
                SWEEP_SCENARIO,
                workload,
                timeout,
            )
        }))
        .await;
        let elapsed = started.elapsed();

        let completed: Vec<_> = measurements.iter().filter(|m| !m.failed).collect();
        let failed_requests = measurements.len() - completed.len();
        let total_cost: f64 = completed.iter().map(|m| m.cost).sum();
        let (avg_cost_per_request, avg_quality) = if completed.is_empty() {
            (None, None)
        } else {
            let n = completed.len() as f64;
            let quality: f64 = completed.iter().map(|m| m.quality).sum();
            (Some(total_cost / n), Some(quality / n))
        };

        let total_time_ms = elapsed.as_secs_f64() * 1000.0;
        BatchResult {
            batch_size,
            total_time_ms,
            throughput_rps: batch_size as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
            avg_latency_ms: total_time_ms / batch_size as f64,
            total_cost,
            avg_cost_per_request,
            avg_quality,
            failed_requests,
        }
    }
}

/// The sweep point with the highest throughput.
///
/// Ties go to the lower cost per request (a batch with no completed request
/// ranks last), then the smaller batch. Fails with `InvalidState` when
/// `results` is empty.
pub fn pick_optimal(results: &[BatchResult]) -> Result<BatchResult, TierscopeError> {
    let best = results
        .iter()
        .max_by(|a, b| preference(a, b))
        .ok_or_else(|| TierscopeError::InvalidState("no sweep results to choose from".into()))?;
    info!(
        batch_size = best.batch_size,
        throughput_rps = best.throughput_rps,
        "optimal batch size selected"
    );
    Ok(best.clone())
}

/// Greater means preferred.
fn preference(a: &BatchResult, b: &BatchResult) -> Ordering {
    let cost = |r: &BatchResult| r.avg_cost_per_request.unwrap_or(f64::INFINITY);
    a.throughput_rps
        .total_cmp(&b.throughput_rps)
        .then_with(|| cost(b).total_cmp(&cost(a)))
        .then_with(|| b.batch_size.cmp(&a.batch_size))
}
