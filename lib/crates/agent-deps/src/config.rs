use serde::Deserialize;

use crate::error::ResolveError;

/// Environment prefix for exporter settings.
pub const ENV_PREFIX: &str = "AGENT_DEPS_EXPORT_";

/// Graph exporter configuration.
///
/// Each field maps to `AGENT_DEPS_EXPORT_<FIELD>`:
///   - `AGENT_DEPS_EXPORT_FORMAT`     (`dot` or `mermaid`, default `dot`)
///   - `AGENT_DEPS_EXPORT_GRAPH_NAME` (default `dependencies`)
///   - `AGENT_DEPS_EXPORT_RANK_DIR`   (`LR`, `TB`, `RL`, `BT`, default `LR`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: GraphFormat,

    /// DOT graph identifier. Ignored for Mermaid.
    #[serde(default = "default_graph_name")]
    pub graph_name: String,

    #[serde(default)]
    pub rank_dir: RankDir,
}

/// Output dialect of the graph exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Dot,
    Mermaid,
}

/// Layout direction shared by both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDir {
    #[default]
    Lr,
    Tb,
    Rl,
    Bt,
}

impl RankDir {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::Lr => "LR",
            RankDir::Tb => "TB",
            RankDir::Rl => "RL",
            RankDir::Bt => "BT",
        }
    }
}

fn default_graph_name() -> String {
    "dependencies".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: GraphFormat::default(),
            graph_name: default_graph_name(),
            rank_dir: RankDir::default(),
        }
    }
}

impl ExportConfig {
    /// Loads settings from `AGENT_DEPS_EXPORT_*` environment variables.
    pub fn from_env() -> Result<Self, ResolveError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// Same as [`ExportConfig::from_env`] over an explicit variable list.
    pub fn from_vars<I>(vars: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }
}
