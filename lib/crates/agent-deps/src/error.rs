//! Typed errors for the resolution engine.
//!
//! Validation issues are data (see [`crate::types`]); only the operations
//! below can fail outright.

use thiserror::Error;

use crate::types::CircularDependency;

// ── Resolution errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ResolveError {
    /// No deployment order exists because the graph is cyclic.
    #[error("cannot order deployment: {}", describe(.cycles))]
    CycleDetected { cycles: Vec<CircularDependency> },

    #[error("invalid export configuration: {0}")]
    Config(#[from] envy::Error),
}

impl ResolveError {
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}

// ── Range errors ──────────────────────────────────────────────────────────────

/// A version range string that cannot be turned into a version interval.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("invalid version range '{input}': {source}")]
    Syntax {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("unsupported comparator in version range '{input}'")]
    Unsupported { input: String },
}

fn describe(cycles: &[CircularDependency]) -> String {
    let chains: Vec<String> = cycles.iter().map(|c| c.cycle.join(" -> ")).collect();
    format!(
        "{} circular dependency chain(s) detected: {}",
        cycles.len(),
        chains.join("; ")
    )
}
