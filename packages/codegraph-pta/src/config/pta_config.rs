//! Points-to Analysis Configuration

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::{check_range, Validatable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for the k of any k-limited context abstraction
pub const MAX_CONTEXT_DEPTH: usize = 5;

/// Context abstraction used by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextSensitivity {
    /// Every entity carries the single empty context
    Insensitive,

    /// k most recent call sites (k-CFA)
    CallSite { k: usize },

    /// k most recent receiver allocation sites
    Object { k: usize },

    /// k most recent classes enclosing the receiver allocation sites
    Type { k: usize },
}

impl ContextSensitivity {
    /// Context depth limit (0 for the insensitive abstraction)
    pub fn depth(&self) -> usize {
        match self {
            Self::Insensitive => 0,
            Self::CallSite { k } | Self::Object { k } | Self::Type { k } => *k,
        }
    }

    /// Short name, e.g. `ci`, `2-call`, `1-obj`
    pub fn label(&self) -> String {
        match self {
            Self::Insensitive => "ci".to_string(),
            Self::CallSite { k } => format!("{}-call", k),
            Self::Object { k } => format!("{}-obj", k),
            Self::Type { k } => format!("{}-type", k),
        }
    }
}

impl Default for ContextSensitivity {
    fn default() -> Self {
        ContextSensitivity::Insensitive
    }
}

/// Processing discipline of the propagation work list
///
/// Any order reaches the same fixed point; FIFO bounds redundant
/// re-propagation and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkListOrder {
    Fifo,
    Lifo,
}

impl Default for WorkListOrder {
    fn default() -> Self {
        WorkListOrder::Fifo
    }
}

/// Pointer analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PtaConfig {
    /// Context abstraction
    pub sensitivity: ContextSensitivity,

    /// Work list discipline
    pub worklist_order: WorkListOrder,

    /// Stop after this many work list entries (None = run to fixpoint).
    /// A stopped run yields a partial, unsound result.
    pub max_worklist_entries: Option<usize>,
}

impl PtaConfig {
    /// Create config from preset
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                sensitivity: ContextSensitivity::Insensitive,
                worklist_order: WorkListOrder::Fifo,
                max_worklist_entries: Some(5_000_000),
            },
            Preset::Balanced => Self {
                sensitivity: ContextSensitivity::Object { k: 1 },
                worklist_order: WorkListOrder::Fifo,
                max_worklist_entries: None,
            },
            Preset::Thorough => Self {
                sensitivity: ContextSensitivity::Object { k: 2 },
                worklist_order: WorkListOrder::Fifo,
                max_worklist_entries: None,
            },
            Preset::Custom => Self {
                sensitivity: ContextSensitivity::Insensitive,
                worklist_order: WorkListOrder::Fifo,
                max_worklist_entries: None,
            },
        }
    }

    /// Context-insensitive configuration
    pub fn insensitive() -> Self {
        Self::from_preset(Preset::Custom)
    }

    /// Parse from a YAML document and validate
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        serde_yaml::from_str::<PtaConfig>(yaml)?.validated()
    }

    /// Load from a YAML file and validate
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builder: Set sensitivity
    pub fn sensitivity(mut self, v: ContextSensitivity) -> Self {
        self.sensitivity = v;
        self
    }

    /// Builder: Set worklist_order
    pub fn worklist_order(mut self, v: WorkListOrder) -> Self {
        self.worklist_order = v;
        self
    }

    /// Builder: Set max_worklist_entries
    pub fn max_worklist_entries(mut self, v: Option<usize>) -> Self {
        self.max_worklist_entries = v;
        self
    }
}

impl Validatable for PtaConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.sensitivity != ContextSensitivity::Insensitive {
            check_range(
                self.config_name(),
                "sensitivity.k",
                self.sensitivity.depth(),
                (1, MAX_CONTEXT_DEPTH),
                "use `insensitive` for k = 0; deeper contexts explode the pointer universe",
            )?;
        }

        if self.max_worklist_entries == Some(0) {
            return Err(ConfigError::Validation {
                config: self.config_name(),
                reason: "max_worklist_entries must be positive, or absent for no limit".to_string(),
            });
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "PtaConfig"
    }
}

impl Default for PtaConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
