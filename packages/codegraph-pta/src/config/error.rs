//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting outside its accepted range
    #[error("{config}.{field} = {value} is outside {min}..={max}: {hint}")]
    Range {
        config: &'static str,
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
        hint: &'static str,
    },

    #[error("Unknown preset '{0}' (expected fast, balanced, thorough or custom)")]
    UnknownPreset(String),

    #[error("Cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A setting that is well-typed but meaningless
    #[error("Invalid {config}: {reason}")]
    Validation { config: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_message_names_the_setting() {
        let err = ConfigError::Range {
            config: "PtaConfig",
            field: "sensitivity.k",
            value: 0,
            min: 1,
            max: 5,
            hint: "use `insensitive` instead",
        };
        let msg = err.to_string();
        assert!(msg.starts_with("PtaConfig.sensitivity.k = 0"));
        assert!(msg.contains("1..=5"));
        assert!(msg.ends_with("use `insensitive` instead"));
    }

    #[test]
    fn test_io_message_names_the_file() {
        let err = ConfigError::Io {
            path: PathBuf::from("/etc/pta.yaml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/etc/pta.yaml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
