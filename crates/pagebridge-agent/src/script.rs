//! Injectable selector script.
//!
//! The agent ships into a real iframe as one self-contained JavaScript payload
//! with the same semantics as [`SelectorAgent`](crate::SelectorAgent). Its
//! configuration is a single `var CONFIG = {...};` line, so the payload can be
//! read back by anything that executes it.

use pagebridge_config::{Config, SelectorConfig};
use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

const TEMPLATE: &str = include_str!("selector_agent.js");
const PLACEHOLDER: &str = "__PAGEBRIDGE_CONFIG__";
const CONFIG_PREFIX: &str = "var CONFIG = ";

/// Configuration embedded in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    /// Id of the script element; the stylesheet id is derived from it.
    pub marker_id: String,

    #[serde(flatten)]
    pub selector: SelectorConfig,
}

impl ScriptConfig {
    pub fn new(marker_id: impl Into<String>, selector: SelectorConfig) -> Self {
        Self {
            marker_id: marker_id.into(),
            selector,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.bridge.marker_id.clone(), config.agent.clone())
    }
}

/// Renders and reads selector payloads.
pub struct SelectorScript;

impl SelectorScript {
    /// Render the payload for `config`.
    pub fn render(config: &ScriptConfig) -> Result<String, ScriptError> {
        let literal = serde_json::to_string(config)?;
        Ok(TEMPLATE.replacen(PLACEHOLDER, &literal, 1))
    }

    /// Recover the configuration from a rendered payload.
    pub fn parse_config(source: &str) -> Result<ScriptConfig, ScriptError> {
        let literal = source
            .lines()
            .map(str::trim)
            .find_map(|line| line.strip_prefix(CONFIG_PREFIX))
            .and_then(|rest| rest.strip_suffix(';'))
            .ok_or(ScriptError::MissingConfig)?;
        Ok(serde_json::from_str(literal)?)
    }
}
