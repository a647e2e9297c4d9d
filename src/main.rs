//! PageBridge - visual editing bridge for embedded preview pages
//!
//! Main entry point for the PageBridge CLI.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pagebridge_agent::{ScriptConfig, SelectorScript};
use pagebridge_config::{Config, ConfigLoader, ConfigValidator};

mod cli;
mod cmd_simulate;

use cli::{Cli, Commands};

/// Get the .pagebridge directory path.
fn pagebridge_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".pagebridge"))
        .unwrap_or_else(|| PathBuf::from(".pagebridge"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// Log files are written to ~/.pagebridge/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = pagebridge_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("pagebridge")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the writer alive for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config_path = PathBuf::from(ConfigLoader::expand_path(&cli.config.to_string_lossy()));
    let config = ConfigLoader::load_or_default(&config_path)?;
    debug!("Loaded configuration from {}", config_path.display());

    match cli.command {
        Commands::Script => {
            let source = SelectorScript::render(&ScriptConfig::from_config(&config))?;
            println!("{}", source);
        }
        Commands::PreviewUrl { code_gen_type, app_id } => {
            println!("{}", config.env.preview_url(code_gen_type, &app_id));
        }
        Commands::DeployUrl { deploy_key } => {
            println!("{}", config.env.deploy_url(&deploy_key));
        }
        Commands::ApiUrl { path } => {
            println!("{}", config.env.api_url(&path));
        }
        Commands::CheckConfig => check_config(&config_path, &config)?,
        Commands::Simulate { id } => {
            cmd_simulate::simulate(&config, id.as_deref()).await?;
        }
    }

    Ok(())
}

/// Print validation findings; fail if there are errors.
fn check_config(path: &std::path::Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("{}: OK ({} warning(s))", path.display(), result.warnings.len());
        Ok(())
    } else {
        Err(format!("{}: {} error(s)", path.display(), result.errors.len()).into())
    }
}
