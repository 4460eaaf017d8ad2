//! Name-keyed registry and adjacency map over one manifest set.
//!
//! Edges are target names resolved through the registry, so cyclic
//! references never become cyclic ownership. Nothing here checks that a
//! target exists; each detector decides what a dangling edge means.

use std::collections::HashMap;

use crate::manifest::{AgentDependency, AgentManifest};

/// Registry plus adjacency, built fresh for every resolution call.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    /// Registry order: first occurrence of each name in the input.
    order: Vec<&'a AgentManifest>,
    index: HashMap<&'a str, usize>,
    /// Reverse edges: target name to the registry slots declaring it, each once.
    dependents: HashMap<&'a str, Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Builds the registry in O(agents + edges).
    ///
    /// A manifest whose name was already seen replaces the earlier one and
    /// takes over its position; the two are never merged.
    #[must_use]
    pub fn build(manifests: &'a [AgentManifest]) -> Self {
        let mut order: Vec<&'a AgentManifest> = Vec::with_capacity(manifests.len());
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(manifests.len());

        for manifest in manifests {
            if let Some(&slot) = index.get(manifest.name.as_str()) {
                tracing::warn!(
                    agent = %manifest.name,
                    "duplicate manifest name; later definition replaces the earlier one"
                );
                order[slot] = manifest;
            } else {
                index.insert(manifest.name.as_str(), order.len());
                order.push(manifest);
            }
        }

        let mut dependents: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (slot, &manifest) in order.iter().enumerate() {
            for dependency in &manifest.dependencies {
                let slots = dependents.entry(dependency.name.as_str()).or_default();
                if slots.last() != Some(&slot) {
                    slots.push(slot);
                }
            }
        }

        let graph = Self {
            order,
            index,
            dependents,
        };
        tracing::debug!(
            agents = graph.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        graph
    }

    /// Agents in registry order.
    pub fn agents(&self) -> impl Iterator<Item = &'a AgentManifest> + '_ {
        self.order.iter().copied()
    }

    /// `(agent, dependency)` pairs in registry and declaration order.
    pub fn edges(&self) -> impl Iterator<Item = (&'a AgentManifest, &'a AgentDependency)> + '_ {
        self.agents()
            .flat_map(|agent| agent.dependencies.iter().map(move |dep| (agent, dep)))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a AgentManifest> {
        self.index.get(name).map(|&i| self.order[i])
    }

    /// Registry position of `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Declared dependencies of `name`; empty for unknown names.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> &'a [AgentDependency] {
        match self.get(name) {
            Some(manifest) => &manifest.dependencies,
            None => &[],
        }
    }

    /// Agents declaring a dependency on `name`, in registry order, each once.
    /// `name` need not be in the registry.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&'a str> {
        self.dependents
            .get(name)
            .map(|slots| {
                slots
                    .iter()
                    .map(|&slot| self.order[slot].name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of distinct agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of declared dependency edges, dangling ones included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.order.iter().map(|m| m.dependencies.len()).sum()
    }
}
