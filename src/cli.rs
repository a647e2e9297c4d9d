//! CLI definitions for PageBridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pagebridge_config::CodeGenType;

/// PageBridge CLI.
#[derive(Parser)]
#[command(name = "pagebridge")]
#[command(about = "Visual editing bridge for embedded preview pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pagebridge.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the selector script injected into preview frames
    Script,

    /// Print the live preview URL of an app
    PreviewUrl {
        /// Code generation type (html, multi_file, vue_project)
        code_gen_type: CodeGenType,

        /// App ID
        app_id: String,
    },

    /// Print the URL of a deployed app
    DeployUrl {
        /// Deploy key
        deploy_key: String,
    },

    /// Print the full URL of an API path
    ApiUrl {
        /// Path below the API base URL
        path: String,
    },

    /// Validate the configuration file
    CheckConfig,

    /// Run a bridge session against a sample page and print the selection
    Simulate {
        /// Select the element with this id instead of the default card
        #[arg(long)]
        id: Option<String>,
    },
}
