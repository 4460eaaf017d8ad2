// lib/crates/agent-deps/src/manifest.rs

use serde::{Deserialize, Serialize};

/// A deployable agent and the dependencies it declares.
///
/// Records arrive already deserialized; the engine never reads manifest text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentManifest {
    /// Unique key within one resolution call.
    pub name: String,
    /// Concrete version of this agent. Not consulted by conflict detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<AgentDependency>,
    /// Message channels this agent emits.
    #[serde(default)]
    pub published_channels: Vec<String>,
}

impl AgentManifest {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            dependencies: Vec::new(),
            published_channels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a dependency declaration, keeping declaration order.
    #[must_use]
    pub fn depends_on(mut self, dependency: AgentDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    #[must_use]
    pub fn publishes<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.published_channels
            .extend(channels.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if `channel` is in `published_channels`.
    #[must_use]
    pub fn publishes_channel(&self, channel: &str) -> bool {
        self.published_channels.iter().any(|c| c == channel)
    }
}

/// A typed reference from one agent to another, by name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDependency {
    /// Target agent name. May be absent from the registry.
    pub name: String,
    /// Semver range constraint, e.g. `^1.0.0`.
    pub version: String,
    /// Required dependencies are reported when unresolved. Defaults to `true`.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Channels the target is expected to publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<Vec<String>>,
}

fn default_required() -> bool {
    true
}

impl AgentDependency {
    #[must_use]
    pub fn required(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            required: true,
            contract: None,
        }
    }

    #[must_use]
    pub fn optional(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, version)
        }
    }

    #[must_use]
    pub fn with_contract<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contract = Some(channels.into_iter().map(Into::into).collect());
        self
    }

    /// Contract channels, or an empty slice when none were declared.
    #[must_use]
    pub fn contract_channels(&self) -> &[String] {
        self.contract.as_deref().unwrap_or_default()
    }
}
