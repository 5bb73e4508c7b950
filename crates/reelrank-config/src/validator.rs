//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Allowed distance between a mode's weight sum and 1.0.
const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

/// Longest accepted activity window, in days (about a century).
const MAX_WINDOW_DAYS: i64 = 36_500;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::invalid_value(err.path, err.message)),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_embedding(config, &mut result);
        Self::validate_ranking(config, &mut result);
        Self::validate_activity(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_embedding(config: &Config, result: &mut ValidationResult) {
        let embedding = &config.embedding;

        let valid_providers = ["hash", "openai"];
        if !valid_providers.contains(&embedding.provider.as_str()) {
            result.add_error(ValidationError::new(
                "embedding.provider",
                format!(
                    "Unknown embedding provider '{}', valid values: {:?}",
                    embedding.provider, valid_providers
                ),
            ));
        }

        if embedding.dimension == 0 {
            result.add_error(ValidationError::new(
                "embedding.dimension",
                "dimension must be greater than 0",
            ));
        }

        if let Some(ref url) = embedding.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "embedding.base_url",
                    "base_url must start with http:// or https://",
                ));
            }
        }

        if embedding.provider == "openai" && embedding.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "embedding.api_key",
                "API key is not set, requests to the embedding endpoint will be unauthenticated",
            ));
        }
    }

    fn validate_ranking(config: &Config, result: &mut ValidationResult) {
        let ranking = &config.ranking;

        if ranking.top_k == 0 {
            result.add_error(ValidationError::new(
                "ranking.top_k",
                "top_k must be greater than 0",
            ));
        }

        Self::validate_window(
            "ranking.popularity_window_days",
            ranking.popularity_window_days,
            result,
        );

        if ranking.popularity_saturation == 0 {
            result.add_error(ValidationError::new(
                "ranking.popularity_saturation",
                "popularity_saturation must be greater than 0",
            ));
        }

        if !(ranking.rating_scale > 0.0) || !ranking.rating_scale.is_finite() {
            result.add_error(ValidationError::new(
                "ranking.rating_scale",
                "rating_scale must be a positive finite number",
            ));
        }

        if ranking.max_concurrency == 0 {
            result.add_error(ValidationError::new(
                "ranking.max_concurrency",
                "max_concurrency must be greater than 0",
            ));
        }

        if ranking.max_concurrency > 256 {
            result.add_warning(ValidationWarning::new(
                "ranking.max_concurrency",
                "max_concurrency is very high (>256), each slot may issue a store read",
            ));
        }

        if ranking.deadline_ms == Some(0) {
            result.add_error(ValidationError::new(
                "ranking.deadline_ms",
                "deadline_ms must be greater than 0 when set",
            ));
        }

        Self::validate_weights(
            "ranking.hybrid",
            &ranking.hybrid.as_slice(),
            ranking.hybrid.total(),
            result,
        );
        Self::validate_weights(
            "ranking.ranked",
            &ranking.ranked.as_slice(),
            ranking.ranked.total(),
            result,
        );
    }

    fn validate_weights(path: &str, weights: &[f32], total: f32, result: &mut ValidationResult) {
        if weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
            result.add_error(ValidationError::new(
                path,
                "every weight must lie in [0, 1]",
            ));
        }

        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            result.add_error(ValidationError::new(
                path,
                format!("weights must sum to 1.0, got {}", total),
            ));
        }
    }

    fn validate_window(path: &str, days: i64, result: &mut ValidationResult) {
        if days <= 0 {
            result.add_error(ValidationError::new(path, "window must be positive"));
        } else if days > MAX_WINDOW_DAYS {
            result.add_error(ValidationError::new(
                path,
                format!("window must be at most {} days, got {}", MAX_WINDOW_DAYS, days),
            ));
        }
    }

    fn validate_activity(config: &Config, result: &mut ValidationResult) {
        Self::validate_window("activity.window_days", config.activity.window_days, result);

        if config.activity.top_watched_limit == 0 {
            result.add_error(ValidationError::new(
                "activity.top_watched_limit",
                "top_watched_limit must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
