// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget enforcement and cost projection for Tierscope.
//!
//! This crate provides:
//! - **Budget tracker**: Window spend accounting with edge-triggered warning
//!   and exceeded alerts
//! - **Budget-gated selection**: Picks the tier closest to a scenario's
//!   quality target whose projected cost fits the remaining budget
//! - **Pricing**: Fixed token-estimate cost projection per tier

pub mod budget;
pub mod pricing;

pub use budget::{
    AlertKind, BudgetAlert, BudgetDecision, BudgetState, BudgetStatus, BudgetTracker,
    SharedBudgetTracker,
};
pub use pricing::{projected_cost, DEFAULT_ESTIMATED_TOKENS};
