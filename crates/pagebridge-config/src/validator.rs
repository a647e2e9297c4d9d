//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

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
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_bridge(config, &mut result);
        Self::validate_agent(config, &mut result);
        Self::validate_env(config, &mut result);

        result
    }

    /// Validate and turn the first error into a [`ConfigError`].
    pub fn ensure_valid(config: &Config) -> Result<ValidationResult, ConfigError> {
        let result = Self::validate(config);
        match result.errors.first() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path.clone(),
                message: error.message.clone(),
            }),
            None => Ok(result),
        }
    }

    fn validate_bridge(config: &Config, result: &mut ValidationResult) {
        let bridge = &config.bridge;

        if bridge.marker_id.trim().is_empty() {
            result.add_error(ValidationError::new(
                "bridge.marker_id",
                "Marker id cannot be empty",
            ));
        } else if bridge.marker_id.chars().any(char::is_whitespace) {
            result.add_error(ValidationError::new(
                "bridge.marker_id",
                "Marker id cannot contain whitespace",
            ));
        }

        if bridge.target_origin.trim().is_empty() {
            result.add_error(ValidationError::new(
                "bridge.target_origin",
                "Target origin cannot be empty, use \"*\" or an explicit origin",
            ));
        } else if bridge.is_wildcard_origin() && !bridge.wildcard_origin_confirmed {
            result.add_warning(ValidationWarning::new(
                "bridge.target_origin",
                "Messages are posted with targetOrigin \"*\"; this is only safe for same-origin previews. \
                 Set wildcard_origin_confirmed = true to acknowledge",
            ));
        }

        if bridge.verify_delay_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "bridge.verify_delay_ms",
                "Verification runs immediately after injection and cannot catch a slow document",
            ));
        }

        if bridge.settle_delay_ms > bridge.verify_delay_ms {
            result.add_warning(ValidationWarning::new(
                "bridge.settle_delay_ms",
                "Settle delay is longer than the verification delay",
            ));
        }
    }

    fn validate_agent(config: &Config, result: &mut ValidationResult) {
        let agent = &config.agent;

        for (path, class) in [
            ("agent.hover_class", &agent.hover_class),
            ("agent.selected_class", &agent.selected_class),
        ] {
            if class.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Class name cannot be empty"));
            } else if class.chars().any(char::is_whitespace) {
                result.add_error(ValidationError::new(
                    path,
                    "Class name cannot contain whitespace",
                ));
            }
        }

        if !agent.hover_class.is_empty() && agent.hover_class == agent.selected_class {
            result.add_error(ValidationError::new(
                "agent.selected_class",
                "Hover and selected classes must differ",
            ));
        }

        if agent.text_limit == 0 {
            result.add_error(ValidationError::new(
                "agent.text_limit",
                "text_limit must be greater than 0",
            ));
        }

        if agent.target_origin != config.bridge.target_origin {
            result.add_warning(ValidationWarning::new(
                "agent.target_origin",
                format!(
                    "Selector posts to '{}' while the host posts to '{}'",
                    agent.target_origin, config.bridge.target_origin
                ),
            ));
        }
    }

    fn validate_env(config: &Config, result: &mut ValidationResult) {
        for (path, url) in [
            ("env.deploy_domain", &config.env.deploy_domain),
            ("env.preview_domain", &config.env.preview_domain),
            ("env.api_base_url", &config.env.api_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    path,
                    "URL must start with http:// or https://",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
