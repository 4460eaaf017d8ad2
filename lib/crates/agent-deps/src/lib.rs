//! Dependency resolution and validation for agent manifests.
//!
//! Given already-parsed manifests, [`validate_dependencies`] reports every
//! version conflict, circular chain, missing required dependency and contract
//! violation in one pass, and [`calculate_deployment_order`] groups agents
//! into parallel-safe deployment batches.
//!
//! Every call builds its registry and working sets from scratch; there is no
//! shared or cached state, so calls may run concurrently.

pub mod config;
pub mod conflicts;
pub mod contracts;
pub mod cycles;
pub mod error;
pub mod export;
pub mod manifest;
pub mod missing;
pub mod order;
pub mod range;
pub mod registry;
pub mod types;

pub use config::{ExportConfig, GraphFormat, RankDir};
pub use conflicts::detect_version_conflicts;
pub use contracts::check_contracts;
pub use cycles::detect_cycles;
pub use error::{RangeError, ResolveError};
pub use export::export_graph;
pub use manifest::{AgentDependency, AgentManifest};
pub use missing::detect_missing;
pub use order::plan_batches;
pub use range::VersionRange;
pub use registry::DependencyGraph;
pub use types::{
    CircularDependency, ContractViolation, DependencyConflict, MissingDependency, Requester,
    ValidationResult,
};

/// Runs every detector over one shared graph and aggregates the issues.
///
/// Never stops at the first problem; `valid` is true iff nothing was found.
#[must_use]
pub fn validate_dependencies(manifests: &[AgentManifest]) -> ValidationResult {
    let graph = DependencyGraph::build(manifests);

    let result = ValidationResult::new(
        detect_version_conflicts(&graph),
        detect_cycles(&graph),
        detect_missing(&graph),
        check_contracts(&graph),
    );

    tracing::info!(
        agents = graph.len(),
        valid = result.valid,
        issues = result.issue_count(),
        "dependency validation finished"
    );
    result
}

/// Deployment batches, leaves first. Agents within a batch are independent.
///
/// # Errors
///
/// Returns [`ResolveError::CycleDetected`] if the manifests contain a cycle.
/// An empty manifest list is not an error and yields no batches.
pub fn calculate_deployment_order(
    manifests: &[AgentManifest],
) -> Result<Vec<Vec<String>>, ResolveError> {
    let graph = DependencyGraph::build(manifests);
    let batches = plan_batches(&graph)?;
    tracing::info!(
        agents = graph.len(),
        batches = batches.len(),
        "deployment order calculated"
    );
    Ok(batches)
}

/// Graphviz DOT for `manifests` with the default [`ExportConfig`].
#[must_use]
pub fn export_dot(manifests: &[AgentManifest]) -> String {
    export_graph(&DependencyGraph::build(manifests), &ExportConfig::default())
}
