// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tierscope decision engine.
//!
//! This crate provides the domain value types, the workspace error type, the
//! validated [`TierCatalog`], measurement aggregation, and the
//! [`MeasurementCollector`] capability that every measuring component is
//! generic over.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod recording;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use aggregate::{aggregate_by_tier, aggregate_tier};
pub use catalog::TierCatalog;
pub use error::TierscopeError;
pub use recording::RequestOutcome;
pub use traits::MeasurementCollector;
pub use types::{
    efficiency_ratio, AggregateTierPerformance, InvocationSample, Measurement, Priority,
    Scenario, Tier, TierId,
};
