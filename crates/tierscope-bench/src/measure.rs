// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single timed measurement.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{error, warn};

use tierscope_core::recording::{record_measurement, RequestOutcome};
use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::{Measurement, TierId};
use tierscope_core::TierscopeError;

/// Invoke `tier_id` once with `workload`, bounded by `timeout`.
///
/// Never fails: collector errors and timeouts are logged and returned as a
/// failed measurement whose latency is the time waited. Every outcome is
/// recorded through the metrics facade.
pub async fn measure_once(
    collector: &dyn MeasurementCollector,
    tier_id: &TierId,
    scenario_name: &str,
    workload: &str,
    timeout: Duration,
) -> Measurement {
    let started = Instant::now();
    let result = tokio::time::timeout(timeout, collector.invoke(tier_id, workload)).await;
    let waited_ms = started.elapsed().as_millis() as u64;

    let (measurement, outcome) = match result {
        Ok(Ok(sample)) => (
            Measurement::completed(tier_id.clone(), scenario_name, sample),
            RequestOutcome::Completed,
        ),
        Ok(Err(e)) => {
            if e.is_measurement_failure() {
                warn!(
                    tier = %tier_id,
                    scenario = scenario_name,
                    error = %e,
                    "measurement failed"
                );
            } else {
                error!(
                    tier = %tier_id,
                    scenario = scenario_name,
                    error = %e,
                    "collector rejected the request"
                );
            }
            (
                Measurement::failed(tier_id.clone(), scenario_name, waited_ms),
                RequestOutcome::Failed,
            )
        }
        Err(_elapsed) => {
            let e = TierscopeError::MeasurementTimeout {
                tier_id: tier_id.to_string(),
                timeout,
            };
            warn!(
                tier = %tier_id,
                scenario = scenario_name,
                timeout_ms = timeout.as_millis() as u64,
                error = %e,
                "measurement timed out"
            );
            (
                Measurement::failed(tier_id.clone(), scenario_name, waited_ms),
                RequestOutcome::TimedOut,
            )
        }
    };

    record_measurement(&measurement, outcome);
    measurement
}
