//! Requester-vs-requester version conflict detection.
//!
//! Only the ranges declared by consumers are compared with each other; the
//! target's own `version` field is not consulted.

use std::collections::HashMap;

use crate::range::VersionRange;
use crate::registry::DependencyGraph;
use crate::types::{DependencyConflict, Requester};

/// One `DependencyConflict` per dependency name, in order of first
/// declaration, whose requesters from distinct agents include a pair with
/// disjoint ranges.
#[must_use]
pub fn detect_version_conflicts(graph: &DependencyGraph<'_>) -> Vec<DependencyConflict> {
    let mut names: Vec<&str> = Vec::new();
    let mut requesters: HashMap<&str, Vec<Requester>> = HashMap::new();

    for (agent, dependency) in graph.edges() {
        let entry = requesters.entry(dependency.name.as_str()).or_insert_with(|| {
            names.push(dependency.name.as_str());
            Vec::new()
        });
        entry.push(Requester {
            agent_name: agent.name.clone(),
            version_range: dependency.version.clone(),
        });
    }

    let conflicts: Vec<DependencyConflict> = names
        .into_iter()
        .filter_map(|name| {
            let group = requesters.remove(name)?;
            has_irreconcilable_pair(name, &group).then(|| DependencyConflict {
                dependency_name: name.to_string(),
                requesters: group,
            })
        })
        .collect();

    tracing::debug!(count = conflicts.len(), "version conflict detection finished");
    conflicts
}

fn has_irreconcilable_pair(name: &str, group: &[Requester]) -> bool {
    let first_agent = group.first().map(|r| r.agent_name.as_str());
    if group.iter().all(|r| Some(r.agent_name.as_str()) == first_agent) {
        return false;
    }

    let parsed: Vec<Option<VersionRange>> = group
        .iter()
        .map(|r| match VersionRange::parse(&r.version_range) {
            Ok(range) => Some(range),
            Err(e) => {
                tracing::warn!(
                    dependency = name,
                    agent = %r.agent_name,
                    error = %e,
                    "unparsable version range; treating it as conflicting"
                );
                None
            }
        })
        .collect();

    for (i, a) in group.iter().enumerate() {
        for (j, b) in group.iter().enumerate().skip(i + 1) {
            if a.agent_name == b.agent_name || a.version_range == b.version_range {
                continue;
            }
            let compatible = match (&parsed[i], &parsed[j]) {
                (Some(ra), Some(rb)) => ra.intersects(rb),
                _ => false,
            };
            if !compatible {
                return true;
            }
        }
    }
    false
}
