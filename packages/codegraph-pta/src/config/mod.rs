//! Configuration for the pointer analysis
//!
//! Two tiers, following the codegraph configuration layer:
//! - Level 1: Preset (`PtaConfig::from_preset(Preset::Fast)`)
//! - Level 2: Builder overrides or a YAML document
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_pta::config::{PtaConfig, Preset, ContextSensitivity};
//!
//! let config = PtaConfig::from_preset(Preset::Balanced)
//!     .sensitivity(ContextSensitivity::CallSite { k: 2 });
//! config.validate()?;
//!
//! let config = PtaConfig::from_yaml_str("sensitivity: { kind: object, k: 2 }")?;
//! ```

pub mod error;
pub mod preset;
pub mod pta_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use pta_config::{ContextSensitivity, PtaConfig, WorkListOrder, MAX_CONTEXT_DEPTH};
pub use validation::{check_range, Validatable};
