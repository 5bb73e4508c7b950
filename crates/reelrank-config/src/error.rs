//! Configuration errors.

use thiserror::Error;

/// Why a configuration could not be loaded or applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the given path. `load_or_default` treats this as "use defaults".
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    /// A setting parsed but failed validation or named an unknown option.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A `${VAR}` placeholder referenced an unset environment variable.
    #[error("Environment variable {0} referenced by config is not set")]
    EnvVarNotSet(String),

    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_path() {
        let err = ConfigError::NotFound("config/default.toml".to_string());
        assert!(err.to_string().contains("config/default.toml"));
    }

    #[test]
    fn test_invalid_value_names_field() {
        let err = ConfigError::invalid_value("ranking.hybrid", "weights sum to 0.9");
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "ranking.hybrid"));
        assert_eq!(
            err.to_string(),
            "Invalid value for ranking.hybrid: weights sum to 0.9"
        );
    }

    #[test]
    fn test_env_var_not_set_names_variable() {
        let err = ConfigError::EnvVarNotSet("OPENAI_API_KEY".to_string());
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_unreadable_file() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from(io_err);
        assert!(err.to_string().starts_with("Cannot read config"));
    }
}
