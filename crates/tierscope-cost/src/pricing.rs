// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request cost projection.
//!
//! Budget gating cannot know a request's token count ahead of time, so every
//! tier is priced at a fixed token estimate. The estimate is approximate and
//! configurable through `selection.estimated_tokens_per_request`.

use tierscope_core::types::Tier;

/// Token count assumed for a request when none is configured.
pub const DEFAULT_ESTIMATED_TOKENS: u64 = 100;

/// Projected cost of one request of `estimated_tokens` on `tier`.
pub fn projected_cost(tier: &Tier, estimated_tokens: u64) -> f64 {
    tier.cost_for_tokens(estimated_tokens)
}
