//! Contract compliance: a dependency declaring expected channels must point
//! at an agent that publishes every one of them.

use std::collections::HashSet;

use crate::registry::DependencyGraph;
use crate::types::ContractViolation;

/// One violation per distinct contract channel the target does not publish.
///
/// Targets absent from the registry are skipped; that case belongs to
/// missing-dependency detection and is never reported twice.
#[must_use]
pub fn check_contracts(graph: &DependencyGraph<'_>) -> Vec<ContractViolation> {
    let mut violations = Vec::new();

    for (agent, dependency) in graph.edges() {
        let contract = dependency.contract_channels();
        if contract.is_empty() {
            continue;
        }
        let Some(target) = graph.get(&dependency.name) else {
            continue;
        };

        let mut checked: HashSet<&str> = HashSet::new();
        for channel in contract {
            if !checked.insert(channel.as_str()) || target.publishes_channel(channel) {
                continue;
            }
            violations.push(ContractViolation {
                agent_name: agent.name.clone(),
                dependency_name: dependency.name.clone(),
                missing_channel: channel.clone(),
            });
        }
    }

    tracing::debug!(count = violations.len(), "contract compliance check finished");
    violations
}
