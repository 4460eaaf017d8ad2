//! Textual graph descriptions for diagram tooling.
//!
//! Pure formatting over the registry; no validation happens here.

#![allow(clippy::format_push_string)]

use std::collections::HashMap;

use crate::config::{ExportConfig, GraphFormat};
use crate::registry::DependencyGraph;

/// Renders the graph in the configured dialect.
#[must_use]
pub fn export_graph(graph: &DependencyGraph<'_>, config: &ExportConfig) -> String {
    match config.format {
        GraphFormat::Dot => render_dot(graph, config),
        GraphFormat::Mermaid => render_mermaid(graph, config),
    }
}

/// Graphviz DOT: one node per agent, one edge per declared dependency
/// labelled with its range. Optional edges are dashed.
fn render_dot(graph: &DependencyGraph<'_>, config: &ExportConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", dot_id(&config.graph_name)));
    out.push_str(&format!("  rankdir={};\n", config.rank_dir.as_str()));
    out.push_str("  node [shape=box];\n");

    for agent in graph.agents() {
        out.push_str(&format!("  {};\n", dot_id(&agent.name)));
    }
    for (agent, dependency) in graph.edges() {
        let style = if dependency.required { "" } else { ", style=dashed" };
        out.push_str(&format!(
            "  {} -> {} [label={}{style}];\n",
            dot_id(&agent.name),
            dot_id(&dependency.name),
            dot_id(&dependency.version)
        ));
    }

    out.push_str("}\n");
    out
}

/// Mermaid flowchart: `-->` for required edges, `-.->` for optional ones.
///
/// Node ids are positional (`n0`, `n1`, ...) and carry the agent name as the
/// label, so distinct names never share a node. Targets outside the registry
/// are numbered after the agents, in order of first reference.
fn render_mermaid(graph: &DependencyGraph<'_>, config: &ExportConfig) -> String {
    let mut nodes: Vec<&str> = Vec::new();
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let targets = graph.edges().map(|(_, d)| d.name.as_str());
    let names = graph.agents().map(|a| a.name.as_str()).chain(targets);
    for name in names {
        ids.entry(name).or_insert_with(|| {
            nodes.push(name);
            nodes.len() - 1
        });
    }

    let mut out = String::new();
    out.push_str(&format!("flowchart {}\n", config.rank_dir.as_str()));
    for (i, name) in nodes.iter().enumerate() {
        out.push_str(&format!("  n{i}[\"{}\"]\n", mermaid_text(name)));
    }
    for (agent, dependency) in graph.edges() {
        let (Some(from), Some(to)) = (
            ids.get(agent.name.as_str()),
            ids.get(dependency.name.as_str()),
        ) else {
            continue;
        };
        let arrow = if dependency.required { "-->" } else { "-.->" };
        out.push_str(&format!(
            "  n{from} {arrow}|\"{}\"| n{to}\n",
            mermaid_text(&dependency.version)
        ));
    }
    out
}

/// Quoted DOT identifier.
fn dot_id(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

fn mermaid_text(raw: &str) -> String {
    raw.replace('"', "#quot;")
}
