// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end optimization run.
//!
//! Profiles every configured scenario, selects a tier per scenario, computes
//! each scenario's Pareto frontier and budget-gated choice, sweeps the
//! configured tier, and builds the exported [`OptimizationConfig`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use tierscope_bench::{
    pick_optimal, BatchResult, ScenarioProfile, ScenarioProfiler, ThroughputSweepAnalyzer,
};
use tierscope_config::validation::validate_config;
use tierscope_config::TierscopeConfig;
use tierscope_core::catalog::TierCatalog;
use tierscope_core::traits::MeasurementCollector;
use tierscope_core::types::{AggregateTierPerformance, Scenario, TierId};
use tierscope_core::TierscopeError;
use tierscope_cost::{BudgetDecision, BudgetTracker};
use tierscope_router::{compute_pareto_frontier, select_tier_explain, SelectionDecision};

use crate::builder::{OptimizationConfig, OptimizationReportBuilder};

/// Per-scenario analysis detail.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub profile: ScenarioProfile,
    /// `None` when no tier produced a completed sample.
    pub selection: Option<SelectionDecision>,
    pub pareto_frontier: Vec<AggregateTierPerformance>,
    /// Budget-gated choice against the tracker's state at report time.
    pub budget_decision: Option<BudgetDecision>,
}

impl ScenarioReport {
    pub fn scenario(&self) -> &Scenario {
        &self.profile.scenario
    }
}

/// Everything one optimizer run produced.
#[derive(Debug, Clone)]
pub struct OptimizationReport {
    pub config: OptimizationConfig,
    pub scenarios: Vec<ScenarioReport>,
    /// Sweep results for the configured tier; empty when no tier is configured.
    pub sweep: Vec<BatchResult>,
}

/// Drives profiling, selection, Pareto analysis and the throughput sweep.
pub struct Optimizer {
    config: TierscopeConfig,
    catalog: TierCatalog,
    budget: BudgetTracker,
    collector: Arc<dyn MeasurementCollector>,
}

impl Optimizer {
    /// Build an optimizer, validating the whole configuration up front.
    ///
    /// Fails with `InvalidConfiguration` listing every semantic error, before
    /// the collector is ever called.
    pub fn new(
        config: TierscopeConfig,
        collector: Arc<dyn MeasurementCollector>,
    ) -> Result<Self, TierscopeError> {
        if let Err(errors) = validate_config(&config) {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TierscopeError::InvalidConfiguration(message));
        }
        let catalog = config.tier_catalog()?;
        let budget = BudgetTracker::from_config(&config)?;
        Ok(Self {
            config,
            catalog,
            budget,
            collector,
        })
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.sweep.request_timeout_ms)
    }

    /// Run the pipeline against the configured, unspent budget window.
    pub async fn run(&self) -> Result<OptimizationReport, TierscopeError> {
        self.run_with_budget(&self.budget).await
    }

    /// Run the pipeline, gating budget decisions on `tracker`'s current window.
    pub async fn run_with_budget(
        &self,
        tracker: &BudgetTracker,
    ) -> Result<OptimizationReport, TierscopeError> {
        let profiler = ScenarioProfiler::new(
            Arc::clone(&self.collector),
            self.catalog.clone(),
            self.request_timeout(),
        );
        let profiles = profiler.profile_all(&self.config.scenarios()).await;

        let mut builder = OptimizationReportBuilder::from_config(&self.config);
        let mut scenarios = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let name = profile.scenario.name.clone();
            if profile.aggregates.is_empty() {
                warn!(
                    scenario = name.as_str(),
                    "no tier completed a measurement; scenario left out of model selection"
                );
                scenarios.push(ScenarioReport {
                    profile,
                    selection: None,
                    pareto_frontier: Vec::new(),
                    budget_decision: None,
                });
                continue;
            }

            let selection = select_tier_explain(&profile.scenario, &profile.aggregates)?;
            let frontier = compute_pareto_frontier(&profile.aggregates);
            let budget_decision = tracker.select_within_budget(
                &profile.scenario,
                &profile.aggregates,
                &self.catalog,
            )?;

            builder = builder
                .selection(&name, selection.tier_id.clone())
                .frontier(&name, &frontier);

            scenarios.push(ScenarioReport {
                profile,
                selection: Some(selection),
                pareto_frontier: frontier,
                budget_decision: Some(budget_decision),
            });
        }

        let sweep = self.run_sweep().await?;
        if !sweep.is_empty() {
            builder = builder.optimal_batch(&pick_optimal(&sweep)?);
        }

        let config = builder.budget(tracker.state()).build();
        info!(
            scenarios = scenarios.len(),
            selected = config.model_selection.len(),
            optimal_batch_size = config.batch_optimization.optimal_batch_size,
            "optimization run complete"
        );

        Ok(OptimizationReport {
            config,
            scenarios,
            sweep,
        })
    }

    /// Sweep the configured tier using every scenario's sample workloads.
    async fn run_sweep(&self) -> Result<Vec<BatchResult>, TierscopeError> {
        let Some(tier) = self.config.sweep.tier.as_deref() else {
            info!("no sweep tier configured; keeping default batch size");
            return Ok(Vec::new());
        };
        let tier_id = TierId::new(tier);
        self.catalog.require(&tier_id)?;

        let workloads: Vec<String> = self
            .config
            .scenarios
            .iter()
            .flat_map(|s| s.sample_workloads.iter().cloned())
            .collect();
        if workloads.is_empty() {
            warn!(tier, "no sample workloads to sweep with; keeping default batch size");
            return Ok(Vec::new());
        }

        let analyzer =
            ThroughputSweepAnalyzer::new(Arc::clone(&self.collector), self.request_timeout());
        analyzer
            .sweep(&tier_id, &self.config.sweep.batch_sizes, &workloads)
            .await
    }
}
