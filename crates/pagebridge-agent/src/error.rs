//! Agent error types.

use thiserror::Error;

/// Errors rendering or reading the injectable selector script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Script source has no configuration line")]
    MissingConfig,

    #[error("Invalid script configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_error() {
        let err = ScriptError::MissingConfig;
        assert!(err.to_string().contains("no configuration"));
    }

    #[test]
    fn test_invalid_config_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: ScriptError = json_err.into();
        assert!(matches!(err, ScriptError::InvalidConfig(_)));
        assert!(err.to_string().starts_with("Invalid script configuration"));
    }
}
