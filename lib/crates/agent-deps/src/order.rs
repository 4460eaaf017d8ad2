//! Deployment ordering as parallel-safe batches.
//!
//! Kahn's algorithm run in rounds over edges whose target is in the registry.
//! Dangling edges never block ordering.

use std::collections::{HashMap, HashSet};

use crate::cycles::detect_cycles;
use crate::error::ResolveError;
use crate::registry::DependencyGraph;

/// Batches in deployment order. Batch `k` holds every agent whose in-registry
/// dependencies all sit in batches `0..k`; contents follow registry order.
///
/// # Errors
///
/// Returns [`ResolveError::CycleDetected`] when no complete order exists.
pub fn plan_batches(graph: &DependencyGraph<'_>) -> Result<Vec<Vec<String>>, ResolveError> {
    // Per agent: how many distinct in-registry dependencies are still unplaced.
    let mut waiting: HashMap<&str, usize> = graph
        .agents()
        .map(|agent| {
            let distinct: HashSet<&str> = agent
                .dependencies
                .iter()
                .map(|d| d.name.as_str())
                .filter(|name| graph.contains(name))
                .collect();
            (agent.name.as_str(), distinct.len())
        })
        .collect();

    let mut ready: Vec<&str> = graph
        .agents()
        .map(|agent| agent.name.as_str())
        .filter(|name| waiting.get(name) == Some(&0))
        .collect();
    let mut placed = 0;
    let mut batches: Vec<Vec<String>> = Vec::new();

    while !ready.is_empty() {
        let mut next: Vec<&str> = Vec::new();
        for &name in &ready {
            for dependent in graph.dependents_of(name) {
                let Some(count) = waiting.get_mut(dependent) else {
                    continue;
                };
                *count = count.saturating_sub(1);
                if *count == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_by_key(|name| graph.position(name));

        tracing::debug!(
            batch = batches.len(),
            agents = ready.len(),
            "planned deployment batch"
        );
        placed += ready.len();
        batches.push(ready.iter().map(|name| (*name).to_string()).collect());
        ready = next;
    }

    if placed < graph.len() {
        let cycles = detect_cycles(graph);
        tracing::warn!(
            unplaced = graph.len() - placed,
            cycles = cycles.len(),
            "deployment ordering stalled on circular dependencies"
        );
        return Err(ResolveError::CycleDetected { cycles });
    }

    Ok(batches)
}
