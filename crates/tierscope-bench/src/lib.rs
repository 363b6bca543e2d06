// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Measurement-driven analysis for Tierscope.
//!
//! Everything here talks to a [`MeasurementCollector`](tierscope_core::MeasurementCollector)
//! and bounds each request with a per-request timeout. Timed-out and failed
//! requests become failed samples instead of aborting the run.
//!
//! - [`ScenarioProfiler`] measures every catalog tier against a scenario's
//!   sample workloads and aggregates the results
//! - [`ThroughputSweepAnalyzer`] measures throughput over candidate batch sizes
//! - [`simulate_budget_window`] replays budget-gated traffic until the window
//!   is exhausted

pub mod budget_run;
pub mod measure;
pub mod profile;
pub mod sweep;

pub use budget_run::{simulate_budget_window, BudgetRunSummary};
pub use measure::measure_once;
pub use profile::{ScenarioProfile, ScenarioProfiler};
pub use sweep::{pick_optimal, BatchResult, ThroughputSweepAnalyzer};
