//! Required dependencies whose target is not in the registry.
//!
//! One hop only: an agent is not flagged because something further down its
//! chain is unresolved.

use std::collections::HashSet;

use crate::registry::DependencyGraph;
use crate::types::MissingDependency;

/// Each unresolved `(agent, dependency)` pair once, in declaration order.
/// Optional dependencies are never reported.
#[must_use]
pub fn detect_missing(graph: &DependencyGraph<'_>) -> Vec<MissingDependency> {
    let mut reported: HashSet<(&str, &str)> = HashSet::new();
    let mut missing = Vec::new();

    for (agent, dependency) in graph.edges() {
        if !dependency.required || graph.contains(&dependency.name) {
            continue;
        }
        if reported.insert((agent.name.as_str(), dependency.name.as_str())) {
            missing.push(MissingDependency {
                agent_name: agent.name.clone(),
                dependency_name: dependency.name.clone(),
            });
        }
    }

    tracing::debug!(count = missing.len(), "missing dependency detection finished");
    missing
}
