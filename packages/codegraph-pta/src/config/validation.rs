//! Validation of configuration values
//!
//! Serde accepts any well-typed document; `Validatable` rejects the values
//! the analysis cannot run with. Loading paths call it before handing a
//! config out, and `PointerAnalyzer::new` calls it again for hand-built ones.

use super::error::{ConfigError, ConfigResult};

pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Prefix for error messages
    fn config_name(&self) -> &'static str {
        "config"
    }

    /// `self`, if valid
    fn validated(self) -> ConfigResult<Self>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

/// Check that `value` lies in `min..=max`
pub fn check_range(
    config: &'static str,
    field: &'static str,
    value: usize,
    (min, max): (usize, usize),
    hint: &'static str,
) -> ConfigResult<()> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Range {
        config,
        field,
        value,
        min,
        max,
        hint,
    })
}
