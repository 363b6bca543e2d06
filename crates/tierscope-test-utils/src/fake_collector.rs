// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted measurement collector for deterministic testing.
//!
//! `FakeCollector` implements `MeasurementCollector` with per-tier behavior
//! configured up front. Latency is simulated with `tokio::time::sleep`, so
//! tests running under a paused clock complete instantly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::{InvocationSample, TierId};
use tierscope_core::TierscopeError;

/// Fixed response produced for every invocation of a tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub quality: f64,
    pub cost: f64,
    pub tokens: u64,
    pub latency: Duration,
}

impl TierProfile {
    pub fn new(quality: f64, cost: f64, latency: Duration) -> Self {
        Self {
            quality,
            cost,
            tokens: 100,
            latency,
        }
    }
}

/// How a tier reacts when invoked.
#[derive(Debug, Clone)]
pub enum TierBehavior {
    /// Sleep for the profile latency, then return a sample.
    Respond(TierProfile),
    /// Never complete. Only a caller-side timeout ends the call.
    Hang,
    /// Fail immediately with a collector error.
    Fail(String),
}

/// A collector returning scripted samples per tier.
///
/// Tracks the total number of calls and the peak number of calls in flight
/// at the same time. Invoking a tier with no configured behavior fails with
/// `TierscopeError::UnknownTier`.
#[derive(Default)]
pub struct FakeCollector {
    behaviors: HashMap<TierId, TierBehavior>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    workloads: Mutex<Vec<(TierId, String)>>,
}

impl FakeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a tier that responds with a fixed profile.
    pub fn with_tier(self, id: impl Into<TierId>, profile: TierProfile) -> Self {
        self.with_behavior(id, TierBehavior::Respond(profile))
    }

    /// Configure a tier whose calls never complete.
    pub fn with_hanging_tier(self, id: impl Into<TierId>) -> Self {
        self.with_behavior(id, TierBehavior::Hang)
    }

    /// Configure a tier whose calls fail.
    pub fn with_failing_tier(self, id: impl Into<TierId>, message: &str) -> Self {
        self.with_behavior(id, TierBehavior::Fail(message.to_string()))
    }

    pub fn with_behavior(mut self, id: impl Into<TierId>, behavior: TierBehavior) -> Self {
        self.behaviors.insert(id.into(), behavior);
        self
    }

    /// Total number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the peak concurrency counter, e.g. between batches.
    pub fn reset_peak(&self) {
        self.peak_in_flight.store(0, Ordering::SeqCst);
    }

    /// Every `(tier, workload)` pair received, in call order.
    pub async fn received(&self) -> Vec<(TierId, String)> {
        self.workloads.lock().await.clone()
    }
}

/// Decrements the in-flight counter when a call completes or is dropped.
struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MeasurementCollector for FakeCollector {
    async fn invoke(
        &self,
        tier_id: &TierId,
        workload: &str,
    ) -> Result<InvocationSample, TierscopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.workloads
            .lock()
            .await
            .push((tier_id.clone(), workload.to_string()));

        let behavior = self
            .behaviors
            .get(tier_id)
            .cloned()
            .ok_or_else(|| TierscopeError::UnknownTier(tier_id.to_string()))?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        };

        match behavior {
            TierBehavior::Respond(profile) => {
                tokio::time::sleep(profile.latency).await;
                tracing::debug!(tier = %tier_id, "fake collector responded");
                Ok(InvocationSample {
                    cost: profile.cost,
                    quality: profile.quality,
                    latency_ms: profile.latency.as_millis() as u64,
                    tokens: profile.tokens,
                })
            }
            TierBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(TierscopeError::Internal("pending future resolved".into()))
            }
            TierBehavior::Fail(message) => Err(TierscopeError::Collector {
                message,
                source: None,
            }),
        }
    }
}
