//! End-to-end behaviour of validation and deployment ordering.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use agent_deps::{
    AgentDependency, AgentManifest, ResolveError, calculate_deployment_order, export_dot,
    validate_dependencies,
};
use proptest::collection;
use proptest::prelude::*;

fn agent(name: &str, deps: &[&str]) -> AgentManifest {
    deps.iter().fold(AgentManifest::new(name), |m, d| {
        m.depends_on(AgentDependency::required(*d, "^1.0.0"))
    })
}

fn requires(name: &str, target: &str, range: &str) -> AgentManifest {
    AgentManifest::new(name)
        .depends_on(AgentDependency::required(target, range))
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_validate_no_dependencies_is_valid() {
    let result = validate_dependencies(&[agent("a", &[]), agent("b", &[]), agent("c", &[])]);

    assert!(result.valid);
    assert!(result.conflicts.is_empty());
    assert!(result.cycles.is_empty());
    assert!(result.missing.is_empty());
    assert!(result.contract_violations.is_empty());
}

#[test]
fn test_validate_disjoint_ranges_produce_one_conflict() {
    let result = validate_dependencies(&[
        requires("a", "shared", "^1.0.0"),
        requires("b", "shared", "^2.0.0"),
        AgentManifest::new("shared"),
    ]);

    assert!(!result.valid);
    assert_eq!(result.conflicts.len(), 1);
    let agents: Vec<&str> = result.conflicts[0]
        .requesters
        .iter()
        .map(|r| r.agent_name.as_str())
        .collect();
    assert_eq!(agents, ["a", "b"]);
}

#[test]
fn test_validate_overlapping_ranges_produce_no_conflict() {
    let result = validate_dependencies(&[
        requires("a", "shared", "^1.0.0"),
        requires("b", "shared", "^1.2.0"),
        AgentManifest::new("shared"),
    ]);
    assert!(result.valid);
}

#[test]
fn test_validate_self_dependency_is_a_cycle() {
    let result = validate_dependencies(&[agent("a", &["a"])]);
    assert_eq!(result.cycles.len(), 1);
    assert_eq!(result.cycles[0].cycle, ["a", "a"]);
}

#[test]
fn test_validate_two_and_three_cycles_reported_once() {
    let two = validate_dependencies(&[agent("a", &["b"]), agent("b", &["a"])]);
    assert_eq!(two.cycles.len(), 1);
    assert_eq!(sorted(two.cycles[0].members().to_vec()), ["a", "b"]);

    let three = validate_dependencies(&[
        agent("a", &["b"]),
        agent("b", &["c"]),
        agent("c", &["a"]),
    ]);
    assert_eq!(three.cycles.len(), 1);
    assert_eq!(sorted(three.cycles[0].members().to_vec()), ["a", "b", "c"]);
}

#[test]
fn test_validate_disjoint_two_cycles_are_separate_entries() {
    let result = validate_dependencies(&[
        agent("a", &["b"]),
        agent("b", &["a"]),
        agent("c", &["d"]),
        agent("d", &["c"]),
    ]);
    assert_eq!(result.cycles.len(), 2);
}

#[test]
fn test_validate_required_vs_optional_missing_target() {
    let required = validate_dependencies(&[requires("a", "ghost", "^1.0.0")]);
    assert_eq!(required.missing.len(), 1);
    assert_eq!(required.missing[0].dependency_name, "ghost");

    let dependency = AgentDependency::optional("ghost", "^1.0.0");
    let optional = validate_dependencies(&[AgentManifest::new("a").depends_on(dependency)]);
    assert!(optional.valid);
    assert_eq!(optional.issue_count(), 0);
}

#[test]
fn test_validate_partial_contract_one_violation_per_missing_channel() {
    let dependency = AgentDependency::required("producer", "^1.0.0")
        .with_contract(["a", "b", "c", "d"]);
    let consumer = AgentManifest::new("consumer").depends_on(dependency);
    let producer = AgentManifest::new("producer").publishes(["b", "d", "z"]);

    let result = validate_dependencies(&[consumer.clone(), producer]);
    let channels: Vec<&str> = result
        .contract_violations
        .iter()
        .map(|v| v.missing_channel.as_str())
        .collect();
    assert_eq!(channels, ["a", "c"]);

    let absent = validate_dependencies(&[consumer]);
    assert!(absent.contract_violations.is_empty());
    assert_eq!(absent.missing.len(), 1);
}

#[test]
fn test_validate_is_idempotent() {
    let input = vec![
        agent("a", &["b", "ghost"]),
        agent("b", &["a"]),
        requires("c", "b", "^2.0.0"),
    ];
    assert_eq!(validate_dependencies(&input), validate_dependencies(&input));
}

#[test]
fn test_validate_yaml_fixture_reports_every_issue_kind() {
    const FLEET_YAML: &str = r#"
- name: gateway
  version: "1.0.0"
  dependencies:
    - name: orders
      version: "^1.0.0"
      contract: [orders.created, orders.cancelled]
    - name: metrics
      version: "^0.3.0"
      required: false
- name: orders
  version: "1.4.2"
  publishedChannels: [orders.created]
  dependencies:
    - name: billing
      version: "^2.0.0"
- name: reporting
  dependencies:
    - name: orders
      version: "^2.0.0"
    - name: reporting
      version: "*"
"#;
    let manifests: Vec<AgentManifest> =
        serde_yaml_ng::from_str(FLEET_YAML).expect("fixture parses");
    let result = validate_dependencies(&manifests);

    assert!(!result.valid);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].dependency_name, "orders");
    assert_eq!(result.cycles.len(), 1);
    assert_eq!(result.cycles[0].cycle, ["reporting", "reporting"]);
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].dependency_name, "billing");
    assert_eq!(result.contract_violations.len(), 1);
    assert_eq!(
        result.contract_violations[0].missing_channel,
        "orders.cancelled"
    );
    assert_eq!(result.issue_count(), 4);

    let json = serde_json::to_value(&result).expect("serialize");
    assert_eq!(json["contractViolations"][0]["agentName"], "gateway");
}

// ── Deployment order ─────────────────────────────────────────────────────────

#[test]
fn test_deployment_order_chain() {
    let batches = calculate_deployment_order(&[
        agent("a", &["b"]),
        agent("b", &["c"]),
        agent("c", &[]),
    ])
    .unwrap();
    assert_eq!(batches, vec![vec!["c"], vec!["b"], vec!["a"]]);
}

#[test]
fn test_deployment_order_diamond() {
    let batches = calculate_deployment_order(&[
        agent("a", &["b", "c"]),
        agent("b", &["d"]),
        agent("c", &["d"]),
        agent("d", &[]),
    ])
    .unwrap();

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0], ["d"]);
    assert_eq!(sorted(batches[1].clone()), ["b", "c"]);
    assert_eq!(batches[2], ["a"]);
}

#[test]
fn test_deployment_order_cycle_returns_error() {
    let err = calculate_deployment_order(&[
        agent("a", &["b"]),
        agent("b", &["c"]),
        agent("c", &["a"]),
    ])
    .unwrap_err();
    assert!(matches!(err, ResolveError::CycleDetected { ref cycles } if cycles.len() == 1));
}

#[test]
fn test_deployment_order_empty_input_is_not_a_cycle() {
    let batches = calculate_deployment_order(&[]).unwrap();
    assert_eq!(batches, Vec::<Vec<String>>::new());
}

#[test]
fn test_export_dot_marks_optional_edges() {
    let agent = AgentManifest::new("a")
        .depends_on(AgentDependency::required("b", "^1.0.0"))
        .depends_on(AgentDependency::optional("c", "^2.0.0"));
    let dot = export_dot(&[agent]);

    assert!(dot.contains("\"a\" -> \"b\" [label=\"^1.0.0\"];"));
    assert!(dot.contains("\"a\" -> \"c\" [label=\"^2.0.0\", style=dashed];"));
}

// ── Scale ────────────────────────────────────────────────────────────────────

/// `n0 -> n1 -> ... -> n{len-1}`.
fn chain(len: usize) -> Vec<AgentManifest> {
    (0..len)
        .map(|i| {
            let manifest = AgentManifest::new(format!("n{i}"));
            if i + 1 < len {
                let next = format!("n{}", i + 1);
                manifest.depends_on(AgentDependency::required(next, "^1.0.0"))
            } else {
                manifest
            }
        })
        .collect()
}

#[test]
fn test_validate_deep_chain_does_not_exhaust_the_stack() {
    let fleet = chain(50_000);
    let result = validate_dependencies(&fleet);
    assert!(result.valid);
    assert_eq!(result.issue_count(), 0);
}

#[test]
fn test_validate_deep_chain_closing_back_edge_is_one_cycle() {
    let mut fleet = chain(50_000);
    let last = fleet.len() - 1;
    fleet[last] = AgentManifest::new(format!("n{last}"))
        .depends_on(AgentDependency::required("n0", "^1.0.0"));

    let result = validate_dependencies(&fleet);
    assert_eq!(result.cycles.len(), 1);
    let cycle = &result.cycles[0].cycle;
    assert_eq!(cycle.len(), 50_001);
    assert_eq!(cycle.first(), cycle.last());
}

#[test]
fn test_deployment_order_deep_chain_one_agent_per_batch() {
    let fleet = chain(50_000);
    let batches = calculate_deployment_order(&fleet).unwrap();
    assert_eq!(batches.len(), 50_000);
    assert_eq!(batches[0], ["n49999"]);
    assert_eq!(batches[49_999], ["n0"]);
}

#[test]
fn test_validate_prerelease_outside_plain_ranges_conflicts() {
    let result = validate_dependencies(&[
        requires("a", "shared", "<2.0.0"),
        requires("b", "shared", "=2.0.0-beta.1"),
        requires("c", "other", "^1.0.0"),
        requires("d", "other", "2.0.0-alpha"),
        AgentManifest::new("shared"),
        AgentManifest::new("other"),
    ]);

    let names: Vec<&str> = result
        .conflicts
        .iter()
        .map(|c| c.dependency_name.as_str())
        .collect();
    assert_eq!(names, ["shared", "other"]);
}

// ── Property tests ───────────────────────────────────────────────────────────

/// Agents `n0..nN`; agent `i` may only depend on agents `j > i`, so the
/// graph is acyclic by construction.
fn acyclic_fleet() -> impl Strategy<Value = Vec<AgentManifest>> {
    (1usize..12).prop_flat_map(|n| {
        let matrix = collection::vec(collection::vec(any::<bool>(), n), n);
        matrix.prop_map(move |matrix| {
            (0..n)
                .map(|i| {
                    let mut manifest = AgentManifest::new(format!("n{i}"));
                    for j in (i + 1..n).filter(|&j| matrix[i][j]) {
                        let dependency = AgentDependency::required(format!("n{j}"), "^1.0.0");
                        manifest = manifest.depends_on(dependency);
                    }
                    manifest
                })
                .collect()
        })
    })
}

/// Arbitrary fleet: random edges (cycles and dangling targets allowed),
/// ranges from a small pool so conflicts occur.
fn arbitrary_fleet() -> impl Strategy<Value = Vec<AgentManifest>> {
    let ranges = prop_oneof![
        Just("^1.0.0"),
        Just("^1.4.0"),
        Just("^2.0.0"),
        Just("~1.2.0"),
        Just("latest"),
    ];
    let edge = (0usize..10, ranges, any::<bool>());
    let fleet = collection::vec(collection::vec(edge, 0..4), 1..8);
    fleet.prop_map(|agents| {
        agents
            .into_iter()
            .enumerate()
            .map(|(i, edges)| {
                let mut manifest = AgentManifest::new(format!("n{i}"));
                for (target, range, required) in edges {
                    let name = format!("n{target}");
                    let dependency = if required {
                        AgentDependency::required(name, range)
                    } else {
                        AgentDependency::optional(name, range)
                    };
                    manifest = manifest.depends_on(dependency);
                }
                manifest
            })
            .collect()
    })
}

proptest! {
    /// Manifests without dependencies are always valid.
    #[test]
    fn prop_no_dependencies_always_valid(names in collection::vec("[a-z]{1,8}", 0..20)) {
        let manifests: Vec<AgentManifest> = names.iter().map(AgentManifest::new).collect();
        let result = validate_dependencies(&manifests);
        prop_assert!(result.valid);
        prop_assert_eq!(result.issue_count(), 0);
    }

    /// Identical input gives identical output.
    #[test]
    fn prop_validation_idempotent(fleet in arbitrary_fleet()) {
        prop_assert_eq!(validate_dependencies(&fleet), validate_dependencies(&fleet));
    }

    /// `valid` agrees with the issue lists.
    #[test]
    fn prop_valid_iff_no_issues(fleet in arbitrary_fleet()) {
        let result = validate_dependencies(&fleet);
        prop_assert_eq!(result.valid, result.issue_count() == 0);
    }

    /// Ordering succeeds exactly when no cycle is reported.
    #[test]
    fn prop_order_fails_iff_cycles(fleet in arbitrary_fleet()) {
        let has_cycles = !validate_dependencies(&fleet).cycles.is_empty();
        match calculate_deployment_order(&fleet) {
            Ok(_) => prop_assert!(!has_cycles),
            Err(e) => prop_assert!(e.is_cycle() && has_cycles),
        }
    }

    /// Acyclic fleets order completely, every agent once, after its dependencies.
    #[test]
    fn prop_acyclic_fleet_orders_every_agent(fleet in acyclic_fleet()) {
        let batches = calculate_deployment_order(&fleet).unwrap();

        let mut batch_of: HashMap<&str, usize> = HashMap::new();
        for (k, batch) in batches.iter().enumerate() {
            prop_assert!(!batch.is_empty());
            for name in batch {
                prop_assert!(batch_of.insert(name.as_str(), k).is_none(), "{} placed twice", name);
            }
        }
        prop_assert_eq!(batch_of.len(), fleet.len());

        for manifest in &fleet {
            let own = batch_of[manifest.name.as_str()];
            for dep in &manifest.dependencies {
                prop_assert!(batch_of[dep.name.as_str()] < own);
            }
        }
        prop_assert!(validate_dependencies(&fleet).cycles.is_empty());
    }
}
