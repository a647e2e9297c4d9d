//! Preview environment URLs and code generation types.
//!
//! The preview iframe's `src` is derived from these: generated apps are
//! served under the preview domain while generation is in progress and under
//! the deploy domain once deployed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEPLOY_DOMAIN_VAR: &str = "PAGEBRIDGE_DEPLOY_DOMAIN";
const PREVIEW_DOMAIN_VAR: &str = "PAGEBRIDGE_PREVIEW_DOMAIN";
const API_BASE_URL_VAR: &str = "PAGEBRIDGE_API_BASE_URL";

/// How an app's source was generated. Determines its preview entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeGenType {
    Html,
    MultiFile,
    VueProject,
}

impl CodeGenType {
    pub const ALL: [CodeGenType; 3] = [
        CodeGenType::Html,
        CodeGenType::MultiFile,
        CodeGenType::VueProject,
    ];

    /// Wire value, as used in static resource paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeGenType::Html => "html",
            CodeGenType::MultiFile => "multi_file",
            CodeGenType::VueProject => "vue_project",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CodeGenType::Html => "Native HTML",
            CodeGenType::MultiFile => "Native multi-file",
            CodeGenType::VueProject => "Vue project",
        }
    }
}

impl fmt::Display for CodeGenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeGenType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeGenType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownCodeGenType(s.to_string()))
    }
}

/// Domains the generated apps and the API are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    #[serde(default = "default_deploy_domain")]
    pub deploy_domain: String,

    #[serde(default = "default_preview_domain")]
    pub preview_domain: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl EnvConfig {
    /// Defaults overridden by `PAGEBRIDGE_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replace fields whose `PAGEBRIDGE_*` variable is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(value) = non_empty_var(DEPLOY_DOMAIN_VAR) {
            self.deploy_domain = value;
        }
        if let Some(value) = non_empty_var(PREVIEW_DOMAIN_VAR) {
            self.preview_domain = value;
        }
        if let Some(value) = non_empty_var(API_BASE_URL_VAR) {
            self.api_base_url = value;
        }
        self
    }

    /// URL of a deployed app.
    pub fn deploy_url(&self, deploy_key: &str) -> String {
        format!("{}/{}/", self.deploy_domain.trim_end_matches('/'), deploy_key)
    }

    /// URL of an app's live preview. Vue projects are served from their build
    /// output.
    pub fn preview_url(&self, code_gen_type: CodeGenType, app_id: &str) -> String {
        let base = format!(
            "{}/api/static/{}_{}/",
            self.preview_domain.trim_end_matches('/'),
            code_gen_type,
            app_id
        );
        match code_gen_type {
            CodeGenType::VueProject => format!("{}dist/index.html", base),
            _ => base,
        }
    }

    /// Full URL of an API path. Exactly one `/` separates base and path.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            deploy_domain: default_deploy_domain(),
            preview_domain: default_preview_domain(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_deploy_domain() -> String {
    "http://localhost".to_string()
}

fn default_preview_domain() -> String {
    "http://localhost:8123".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8123/api".to_string()
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
