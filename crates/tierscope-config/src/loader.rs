// SPDX-FileCopyrightText: 2026 Tierscope Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tierscope.toml` > `~/.config/tierscope/tierscope.toml` >
//! `/etc/tierscope/tierscope.toml` with environment variable overrides via `TIERSCOPE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TierscopeConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tierscope/tierscope.toml` (system-wide)
/// 3. `~/.config/tierscope/tierscope.toml` (user XDG config)
/// 4. `./tierscope.toml` (local directory)
/// 5. `TIERSCOPE_*` environment variables
pub fn load_config() -> Result<TierscopeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults only.
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TierscopeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TierscopeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TierscopeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TierscopeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TierscopeConfig::default()))
        .merge(Toml::file("/etc/tierscope/tierscope.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tierscope/tierscope.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tierscope.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because section and key
/// names contain underscores: `TIERSCOPE_BUDGET_LIMITS_PER_REQUEST` must map to
/// `budget_limits.per_request`, not `budget.limits.per.request`.
fn env_provider() -> Env {
    Env::prefixed("TIERSCOPE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("budget_limits_", "budget_limits.", 1)
            .replacen("budget_alerts_", "budget_alerts.", 1)
            .replacen("quality_thresholds_", "quality_thresholds.", 1)
            .replacen("selection_", "selection.", 1)
            .replacen("sweep_", "sweep.", 1);
        mapped.into()
    })
}
