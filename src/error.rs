//! Engine-specific error types.
//!
//! Runtime paths (frames, clicks, missing surfaces) never produce errors; the
//! engine degrades silently instead.  Errors only surface from configuration
//! loading, preference persistence and settings validation, so the host can
//! log them and keep running on defaults.

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for the particle engine.
#[derive(Debug)]
pub enum EngineError {
    /// A configuration or preference file could not be read or written.
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A TOML file was present but could not be parsed.
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser diagnostic.
        source: toml::de::Error,
    },

    /// A value could not be serialised to TOML.
    Serialize(toml::ser::Error),

    /// A configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A settings-panel value is outside the range the panel offers.
    SettingOutOfRange {
        /// Name of the setting.
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => {
                write!(f, "failed to access '{}': {}", path.display(), source)
            }
            EngineError::Parse { path, source } => {
                write!(f, "failed to parse '{}': {}", path.display(), source)
            }
            EngineError::Serialize(source) => write!(f, "failed to serialise TOML: {}", source),
            EngineError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            EngineError::SettingOutOfRange {
                name,
                value,
                min,
                max,
            } => write!(
                f,
                "setting '{}' = {} is outside the allowed range [{}, {}]",
                name, value, min, max
            ),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Parse { source, .. } => Some(source),
            EngineError::Serialize(source) => Some(source),
            EngineError::UnsafeConstant { .. } | EngineError::SettingOutOfRange { .. } => None,
        }
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(source: toml::ser::Error) -> Self {
        EngineError::Serialize(source)
    }
}

/// Convenience alias: a `Result` using `EngineError` as the error type.
pub type EngineResult<T> = Result<T, EngineError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::UnsafeConstant {
            name,
            value: f64::from(value),
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn validate_non_negative(name: &'static str, value: f32) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::UnsafeConstant {
            name,
            value: f64::from(value),
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in the inclusive range `[min, max]`.
pub fn validate_setting(name: &'static str, value: f64, min: f64, max: f64) -> EngineResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(EngineError::SettingOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(validate_positive("rate", 1.0).is_ok());
        assert!(validate_positive("rate", 0.0).is_err());
        assert!(validate_positive("rate", f32::NAN).is_err());
    }

    #[test]
    fn setting_error_names_the_range() {
        let err = validate_setting("max_particles", 400.0, 50.0, 300.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "setting 'max_particles' = 400 is outside the allowed range [50, 300]"
        );
    }
}
