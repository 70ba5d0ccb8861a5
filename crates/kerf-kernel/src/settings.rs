//! Render-boundary settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kerf_kernel_math::{from_f64, Precision, Scalar};

/// Errors from loading or checking [`KernelSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The TOML text did not parse into settings.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Settings that govern the float boundary of the kernel.
///
/// Geometry inside the kernel is exact; these values only matter where
/// results are handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSettings {
    /// Padding added on every side of the structure extent (m).
    pub extent_padding: f64,
    /// Tolerance for float comparisons on the render side (m).
    pub float_tolerance: f64,
    /// Decimal digits kept when a square root is irrational.
    pub sqrt_digits: u32,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            extent_padding: 0.5,
            float_tolerance: 1e-9,
            sqrt_digits: Precision::DEFAULT.sqrt_digits,
        }
    }
}

impl KernelSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.extent_padding < 0.0 {
            return Err(SettingsError::InvalidSettings(
                "extent_padding must be a non-negative number of meters".into(),
            ));
        }
        self.padding()?;
        if !self.float_tolerance.is_finite() || self.float_tolerance <= 0.0 {
            return Err(SettingsError::InvalidSettings(
                "float_tolerance must be positive".into(),
            ));
        }
        if !(1..=200).contains(&self.sqrt_digits) {
            return Err(SettingsError::InvalidSettings(
                "sqrt_digits must be between 1 and 200".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: KernelSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Extent padding as an exact scalar, rounded to the nanometer.
    ///
    /// Fails for NaN, infinite or out-of-range padding.
    pub fn padding(&self) -> Result<Scalar> {
        from_f64(self.extent_padding).ok_or_else(|| {
            SettingsError::InvalidSettings(format!(
                "extent_padding {} is not a representable length",
                self.extent_padding
            ))
        })
    }

    /// Square-root precision.
    pub fn precision(&self) -> Precision {
        Precision {
            sqrt_digits: self.sqrt_digits,
        }
    }

    /// Whether two render-side floats agree within `float_tolerance`.
    pub fn floats_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.float_tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::rational;

    #[test]
    fn test_defaults_are_valid() {
        let s = KernelSettings::default();
        s.validate().unwrap();
        assert_eq!(s.padding().unwrap(), rational(1, 2));
        assert_eq!(s.precision(), Precision::DEFAULT);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s = KernelSettings::from_toml_str("extent_padding = 0.25\n").unwrap();
        assert_eq!(s.padding().unwrap(), rational(1, 4));
        assert_eq!(s.sqrt_digits, Precision::DEFAULT.sqrt_digits);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            KernelSettings::from_toml_str("float_tolerance = 0.0"),
            Err(SettingsError::InvalidSettings(_))
        ));
        assert!(matches!(
            KernelSettings::from_toml_str("extent_padding = -1.0"),
            Err(SettingsError::InvalidSettings(_))
        ));
        assert!(matches!(
            KernelSettings::from_toml_str("sqrt_digits = \"many\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_unrepresentable_padding_rejected() {
        assert!(matches!(
            KernelSettings::from_toml_str("extent_padding = nan"),
            Err(SettingsError::InvalidSettings(_))
        ));
        assert!(matches!(
            KernelSettings::from_toml_str("extent_padding = inf"),
            Err(SettingsError::InvalidSettings(_))
        ));
        assert!(matches!(
            KernelSettings::from_toml_str("extent_padding = 1e300"),
            Err(SettingsError::InvalidSettings(_))
        ));
        let unchecked = KernelSettings {
            extent_padding: f64::NAN,
            ..Default::default()
        };
        assert!(unchecked.padding().is_err());
    }

    #[test]
    fn test_floats_equal_uses_tolerance() {
        let s = KernelSettings {
            float_tolerance: 1e-6,
            ..Default::default()
        };
        assert!(s.floats_equal(1.0, 1.0 + 5e-7));
        assert!(!s.floats_equal(1.0, 1.0 + 5e-6));
    }
}
