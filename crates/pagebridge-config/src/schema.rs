//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::EnvConfig;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub agent: SelectorConfig,

    #[serde(default)]
    pub env: EnvConfig,
}

/// Host-side bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Id of the injected script element. Its presence marks the document as
    /// instrumented.
    #[serde(default = "default_marker_id")]
    pub marker_id: String,

    /// Delay between the frame's load event and injection.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Delay between an injection attempt and its single verification pass.
    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,

    /// `targetOrigin` used when posting into the frame and back to the host.
    #[serde(default = "default_target_origin")]
    pub target_origin: String,

    /// Set to acknowledge that a `*` target origin is intended.
    #[serde(default)]
    pub wildcard_origin_confirmed: bool,
}

impl BridgeConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }

    /// Whether messages are posted without an origin restriction.
    pub fn is_wildcard_origin(&self) -> bool {
        self.target_origin.trim() == "*"
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            marker_id: default_marker_id(),
            settle_delay_ms: default_settle_delay_ms(),
            verify_delay_ms: default_verify_delay_ms(),
            target_origin: default_target_origin(),
            wildcard_origin_confirmed: false,
        }
    }
}

fn default_marker_id() -> String {
    "visual-editor-script".to_string()
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_verify_delay_ms() -> u64 {
    3000
}

fn default_target_origin() -> String {
    "*".to_string()
}

/// Embedded selector configuration.
///
/// Serialized verbatim into the injected script, so field names are part of
/// the script's contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Class added to the hovered element.
    #[serde(default = "default_hover_class")]
    pub hover_class: String,

    /// Class added to the selected element.
    #[serde(default = "default_selected_class")]
    pub selected_class: String,

    /// Maximum characters of text content reported per element.
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,

    /// Outline color of the hover and selection affordances.
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,

    /// `targetOrigin` for messages posted to the parent window.
    #[serde(default = "default_target_origin")]
    pub target_origin: String,
}

impl SelectorConfig {
    /// Whether `class` is one of the selector's own marker classes.
    pub fn is_marker_class(&self, class: &str) -> bool {
        class == self.hover_class || class == self.selected_class
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            hover_class: default_hover_class(),
            selected_class: default_selected_class(),
            text_limit: default_text_limit(),
            highlight_color: default_highlight_color(),
            target_origin: default_target_origin(),
        }
    }
}

fn default_hover_class() -> String {
    "visual-editor-hover".to_string()
}

fn default_selected_class() -> String {
    "visual-editor-selected".to_string()
}

fn default_text_limit() -> usize {
    200
}

fn default_highlight_color() -> String {
    "#1890ff".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.marker_id, "visual-editor-script");
        assert_eq!(config.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.verify_delay(), Duration::from_millis(3000));
        assert!(config.is_wildcard_origin());
        assert!(!config.wildcard_origin_confirmed);
    }

    #[test]
    fn test_selector_defaults() {
        let config = SelectorConfig::default();
        assert_eq!(config.hover_class, "visual-editor-hover");
        assert_eq!(config.selected_class, "visual-editor-selected");
        assert_eq!(config.text_limit, 200);
        assert!(config.is_marker_class("visual-editor-hover"));
        assert!(!config.is_marker_class("card"));
    }

    #[test]
    fn test_explicit_origin_is_not_wildcard() {
        let config = BridgeConfig {
            target_origin: "https://preview.example.com".to_string(),
            ..Default::default()
        };
        assert!(!config.is_wildcard_origin());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[bridge]\nsettle_delay_ms = 50\n").unwrap();
        assert_eq!(config.bridge.settle_delay_ms, 50);
        assert_eq!(config.bridge.verify_delay_ms, 3000);
        assert_eq!(config.agent, SelectorConfig::default());
    }
}
