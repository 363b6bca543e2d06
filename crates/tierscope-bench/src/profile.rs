// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scenario profiling of every catalog tier.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use tierscope_core::aggregate::aggregate_by_tier;
use tierscope_core::catalog::TierCatalog;
use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::{AggregateTierPerformance, Measurement, Scenario};

use crate::measure::measure_once;

/// Raw measurements and per-tier aggregates for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProfile {
    pub scenario: Scenario,
    pub measurements: Vec<Measurement>,
    /// Catalog order; tiers with no completed sample are absent.
    pub aggregates: Vec<AggregateTierPerformance>,
}

/// Runs a scenario's sample workloads against every tier, one request at a time.
pub struct ScenarioProfiler {
    collector: Arc<dyn MeasurementCollector>,
    catalog: TierCatalog,
    request_timeout: Duration,
}

impl ScenarioProfiler {
    pub fn new(
        collector: Arc<dyn MeasurementCollector>,
        catalog: TierCatalog,
        request_timeout: Duration,
    ) -> Self {
        Self {
            collector,
            catalog,
            request_timeout,
        }
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    /// Measure every tier against every sample workload of `scenario`.
    pub async fn profile_scenario(&self, scenario: &Scenario) -> ScenarioProfile {
        let mut measurements =
            Vec::with_capacity(self.catalog.len() * scenario.sample_workloads.len());

        for tier in self.catalog.iter() {
            for workload in &scenario.sample_workloads {
                let m = measure_once(
                    self.collector.as_ref(),
                    &tier.id,
                    &scenario.name,
                    workload,
                    self.request_timeout,
                )
                .await;
                measurements.push(m);
            }
        }

        let aggregates = aggregate_by_tier(&self.catalog, &measurements);
        info!(
            scenario = scenario.name.as_str(),
            measurements = measurements.len(),
            tiers_measured = aggregates.len(),
            "scenario profiled"
        );

        ScenarioProfile {
            scenario: scenario.clone(),
            measurements,
            aggregates,
        }
    }

    /// Profile each scenario in turn.
    pub async fn profile_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioProfile> {
        let mut profiles = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            profiles.push(self.profile_scenario(scenario).await);
        }
        profiles
    }
}
