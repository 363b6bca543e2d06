// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by external collaborators.
//!
//! Traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod collector;

pub use collector::MeasurementCollector;
