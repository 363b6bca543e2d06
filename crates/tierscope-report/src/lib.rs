// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deployable optimization output for Tierscope.
//!
//! [`OptimizationReportBuilder`] composes per-scenario tier choices, Pareto
//! frontiers, the optimal batch size and the budget state into an
//! [`OptimizationConfig`]. [`Optimizer`] drives the whole pipeline from a
//! loaded configuration and a measurement collector.

pub mod builder;
pub mod optimizer;

pub use builder::{
    BatchOptimization, BudgetAlertThresholds, BudgetSnapshot, OptimizationConfig,
    OptimizationReportBuilder, QualityThresholds,
};
pub use optimizer::{OptimizationReport, Optimizer, ScenarioReport};
