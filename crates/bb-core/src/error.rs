//! Error types for the feasibility engine

use bb_model::ConfigError;

/// Engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Capacity configuration has the wrong shape
    #[error("invalid capacity configuration: {0}")]
    Capacity(#[from] ConfigError),

    /// Engine configuration could not be parsed
    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl EngineError {
    /// Field the host should point the user at, when known
    #[must_use]
    pub fn field(&self) -> Option<String> {
        match self {
            Self::Capacity(err) => Some(err.field()),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_errors_name_the_field() {
        let err = EngineError::from(ConfigError::MissingField("schedule"));
        assert_eq!(err.field().as_deref(), Some("schedule"));
        assert!(err.to_string().contains("schedule"));
    }
}
