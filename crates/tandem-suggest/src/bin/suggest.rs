//! Tandem suggestion runner
//!
//! Generate one batch of date suggestions for a profile file.
//!
//! Usage:
//!   cargo run --bin tandem-suggest -- --profile profile.json
//!   cargo run --bin tandem-suggest -- --profile profile.json --category outdoor

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tandem_core::{Error, UserProfile};
use tandem_inference::OpenAIBackend;
use tandem_suggest::SuggestionGenerator;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tandem-suggest")]
#[command(version, about = "Generate date suggestions for a user profile")]
#[command(after_help = "Environment:
  TANDEM_LLM_BASE_URL      OpenAI-compatible endpoint
  TANDEM_LLM_API_KEY       API key (optional for local endpoints)
  TANDEM_LLM_MODEL         Model name
  TANDEM_LLM_TIMEOUT_SECS  Request timeout
  TANDEM_LLM_TEMPERATURE   Sampling temperature")]
struct Args {
    /// Path to a user profile JSON file
    #[arg(short, long, required = true)]
    profile: PathBuf,

    /// Restrict suggestions to one category (dining, outdoor, entertainment,
    /// adventure, relaxation, cultural)
    #[arg(short, long)]
    category: Option<String>,
}

/// Initialize tracing.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "tandem_suggest=info,tandem_inference=info")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = env::var("LOG_FILE").ok();
    let log_ansi = env::var("LOG_ANSI").ok().map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tandem_suggest=info,tandem_inference=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("tandem-suggest.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Logs go to stderr so stdout carries only the batch.
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}

fn load_profile(path: &Path) -> anyhow::Result<UserProfile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse profile {}", path.display()))
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let profile = load_profile(&args.profile)?;

    let backend = OpenAIBackend::from_env().context("Invalid gateway configuration")?;
    let generator = SuggestionGenerator::new(backend);

    let batch = match generator
        .generate(Some(&profile), args.category.as_deref())
        .await
    {
        Ok(batch) => batch,
        Err(Error::GenerationUnavailable(msg)) => {
            error!(error = %msg, "Suggestion generation unavailable");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let batch = match batch.into_non_empty() {
        Ok(batch) => batch,
        Err(e) => {
            error!(error = %e, "No usable suggestions");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(count = batch.len(), "Suggestions ready");
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    let _file_guard = init_tracing();

    run(args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_profile_is_required() {
        let err = Args::try_parse_from(["tandem-suggest", "--category", "dining"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parses_profile_and_category() {
        let args =
            Args::try_parse_from(["tandem-suggest", "-p", "me.json", "--category", "outdoor"])
                .unwrap();
        assert_eq!(args.profile, PathBuf::from("me.json"));
        assert_eq!(args.category.as_deref(), Some("outdoor"));
    }
}
