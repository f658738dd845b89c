//! Simulation error types.
//!
//! The frame step itself cannot fail. Errors only come from loading
//! configuration, parsing fixed level layouts, persisting high scores, and
//! running out of fixed levels, which the tick turns into a normal
//! game-completion transition.

use std::fmt;

/// Top-level error enum for the brick breaker core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A fixed level source has no layout at this index.
    NoMoreLevels {
        /// Zero-based index that was requested.
        index: u32,
    },

    /// A setting is outside the range the simulation can handle.
    InvalidSetting {
        /// Settings key.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable description of the accepted range.
        safe_range: &'static str,
    },

    /// A fixed level layout could not be parsed.
    InvalidLayout {
        /// One-based line number in the layout text.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading or writing a file failed.
    Io {
        /// Path that was being accessed.
        path: String,
        /// Underlying OS error message.
        message: String,
    },

    /// JSON decoding failed.
    Parse {
        /// Decoder error message.
        message: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NoMoreLevels { index } => {
                write!(f, "no level defined at index {}", index)
            }
            SimError::InvalidSetting {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "setting '{}' = {} is outside its safe range ({})",
                name, value, safe_range
            ),
            SimError::InvalidLayout { line, reason } => {
                write!(f, "invalid level layout at line {}: {}", line, reason)
            }
            SimError::Io { path, message } => write!(f, "i/o error on '{}': {}", path, message),
            SimError::Parse { message } => write!(f, "parse error: {}", message),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Parse {
            message: err.to_string(),
        }
    }
}

impl SimError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        SimError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::NoMoreLevels { index: 4 };
        assert_eq!(err.to_string(), "no level defined at index 4");

        let err = SimError::InvalidSetting {
            name: "ball_speed",
            value: -1.0,
            safe_range: "> 0",
        };
        assert!(err.to_string().contains("ball_speed"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SimError = json_err.into();
        assert!(matches!(err, SimError::Parse { .. }));
    }
}
