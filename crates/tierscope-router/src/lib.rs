// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier selection for Tierscope.
//!
//! Picks the most cost-efficient tier meeting a scenario's quality and cost
//! requirements, and computes the Pareto frontier over quality and cost.

pub mod pareto;
pub mod selection;

pub use pareto::{compute_pareto_frontier, dominates};
pub use selection::{select_tier, select_tier_explain, SelectionDecision};
