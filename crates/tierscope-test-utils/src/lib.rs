// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tierscope integration tests.
//!
//! Provides a scripted measurement collector and value fixtures for fast,
//! deterministic, CI-runnable tests without invoking real model tiers.
//!
//! # Components
//!
//! - [`FakeCollector`] - Scripted collector with call and concurrency counters
//! - [`fixtures`] - Reference catalog, scenarios and aggregate builders

pub mod fake_collector;
pub mod fixtures;

pub use fake_collector::{FakeCollector, TierBehavior, TierProfile};
pub use fixtures::{aggregate, reference_scenarios, sample_catalog, scenario};
