//! Circular reference detection.
//!
//! Three-colour depth-first search from every unvisited agent. Each back edge
//! to an in-progress node yields one cycle; traversal then backtracks and
//! carries on, so disjoint cycles are all reported.

use std::collections::{HashMap, HashSet};

use crate::registry::DependencyGraph;
use crate::types::CircularDependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct CycleSearch<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    marks: HashMap<&'a str, Mark>,
    /// Names on the current path, parallel to the frame stack in `visit`.
    stack: Vec<&'a str>,
    seen: HashSet<Vec<String>>,
    cycles: Vec<CircularDependency>,
}

impl<'a> CycleSearch<'_, 'a> {
    /// Depth-first walk from `root` on an explicit frame stack, so chain
    /// depth never grows the call stack. Each frame is an agent and the
    /// index of its next dependency to follow.
    fn visit(&mut self, root: &'a str) {
        let mut frames: Vec<(&'a str, usize)> = vec![(root, 0)];
        self.marks.insert(root, Mark::InProgress);
        self.stack.push(root);

        while let Some(frame) = frames.last_mut() {
            let (name, next) = *frame;
            let Some(dependency) = self.graph.dependencies_of(name).get(next) else {
                frames.pop();
                self.stack.pop();
                self.marks.insert(name, Mark::Done);
                continue;
            };
            frame.1 += 1;

            let target = dependency.name.as_str();
            match self.marks.get(target).copied() {
                Some(Mark::InProgress) => self.record(target),
                Some(Mark::Done) => {}
                None => {
                    self.marks.insert(target, Mark::InProgress);
                    self.stack.push(target);
                    frames.push((target, 0));
                }
            }
        }
    }

    fn record(&mut self, start: &str) {
        let Some(from) = self.stack.iter().position(|&n| n == start) else {
            return;
        };
        let mut cycle: Vec<String> = self.stack[from..].iter().map(|&n| n.to_string()).collect();
        cycle.push(start.to_string());

        if self.seen.insert(cycle.clone()) {
            tracing::debug!(cycle = %cycle.join(" -> "), "found circular dependency");
            self.cycles.push(CircularDependency { cycle });
        }
    }
}

/// Every circular chain in the graph, self-loops included, in discovery order.
#[must_use]
pub fn detect_cycles(graph: &DependencyGraph<'_>) -> Vec<CircularDependency> {
    let mut search = CycleSearch {
        graph,
        marks: HashMap::with_capacity(graph.len()),
        stack: Vec::new(),
        seen: HashSet::new(),
        cycles: Vec::new(),
    };

    for agent in graph.agents() {
        if !search.marks.contains_key(agent.name.as_str()) {
            search.visit(agent.name.as_str());
        }
    }

    tracing::debug!(count = search.cycles.len(), "cycle detection finished");
    search.cycles
}
