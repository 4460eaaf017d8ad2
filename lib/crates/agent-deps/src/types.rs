use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one `validate_dependencies` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff every issue list is empty.
    pub valid: bool,
    pub conflicts: Vec<DependencyConflict>,
    pub cycles: Vec<CircularDependency>,
    pub missing: Vec<MissingDependency>,
    pub contract_violations: Vec<ContractViolation>,
}

impl ValidationResult {
    /// Assembles a result, deriving `valid` from the issue lists.
    #[must_use]
    pub fn new(
        conflicts: Vec<DependencyConflict>,
        cycles: Vec<CircularDependency>,
        missing: Vec<MissingDependency>,
        contract_violations: Vec<ContractViolation>,
    ) -> Self {
        let valid = conflicts.is_empty()
            && cycles.is_empty()
            && missing.is_empty()
            && contract_violations.is_empty();
        Self {
            valid,
            conflicts,
            cycles,
            missing,
            contract_violations,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Total number of issues across all four lists.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.conflicts.len()
            + self.cycles.len()
            + self.missing.len()
            + self.contract_violations.len()
    }
}

/// One agent's declared range for a shared dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub agent_name: String,
    pub version_range: String,
}

/// A dependency whose requesters declare ranges with no common version.
///
/// `requesters` lists every agent that depends on the name, not only the
/// irreconcilable pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyConflict {
    pub dependency_name: String,
    pub requesters: Vec<Requester>,
}

impl fmt::Display for DependencyConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requesters: Vec<String> = self
            .requesters
            .iter()
            .map(|r| format!("{} requires {}", r.agent_name, r.version_range))
            .collect();
        write!(
            f,
            "version conflict on '{}': {}",
            self.dependency_name,
            requesters.join(", ")
        )
    }
}

/// A closed chain of agent names; the first name repeats at the end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircularDependency {
    pub cycle: Vec<String>,
}

impl CircularDependency {
    /// Names taking part in the cycle, without the closing repeat.
    #[must_use]
    pub fn members(&self) -> &[String] {
        match self.cycle.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

impl fmt::Display for CircularDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular dependency: {}", self.cycle.join(" -> "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDependency {
    pub agent_name: String,
    pub dependency_name: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' requires '{}', which is not defined",
            self.agent_name, self.dependency_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractViolation {
    pub agent_name: String,
    pub dependency_name: String,
    pub missing_channel: String,
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' expects '{}' to publish '{}'",
            self.agent_name, self.dependency_name, self.missing_channel
        )
    }
}
