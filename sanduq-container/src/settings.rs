//! Container settings.
//!
//! Settings derive [`serde::Deserialize`] with defaults for every
//! field, so a host application can embed them in its own config file:
//!
//! ```toml
//! [container]
//! detect_cycles = true
//! max_suggestions = 3
//! ```

use serde::Deserialize;

/// Tunables for a [`Container`](crate::container::Container).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Track the resolution path and fail with
    /// [`SanduqError::CyclicDependency`](crate::error::SanduqError::CyclicDependency)
    /// instead of recursing until the stack overflows.
    pub detect_cycles: bool,

    /// How many "did you mean?" suggestions a not-found error carries.
    pub max_suggestions: usize,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_suggestions: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ContainerSettings::default();
        assert!(settings.detect_cycles);
        assert_eq!(settings.max_suggestions, 3);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let settings: ContainerSettings =
            serde_json::from_str(r#"{ "max_suggestions": 5 }"#).unwrap();
        assert!(settings.detect_cycles);
        assert_eq!(settings.max_suggestions, 5);
    }

    #[test]
    fn cycle_detection_can_be_disabled() {
        let settings: ContainerSettings =
            serde_json::from_str(r#"{ "detect_cycles": false }"#).unwrap();
        assert!(!settings.detect_cycles);
    }
}
