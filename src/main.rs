use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webui_publish::plugins::ArtifactKind;
use webui_publish::publisher::{self, PublishAction, Publisher};
use webui_publish::{PublishConfig, RegistryClient};

/// Publish plugin source files to an Open WebUI instance
#[derive(Parser, Debug)]
#[command(name = "webui-publish", version, about)]
struct CliArgs {
    #[arg(
        value_name = "PATH",
        help = "Plugin files or directories (defaults to ./functions and ./tools)"
    )]
    paths: Vec<PathBuf>,

    #[arg(
        short = 't',
        long = "type",
        value_enum,
        help = "Force the artifact kind instead of deriving it from the path"
    )]
    kind: Option<ArtifactKind>,

    #[arg(long, value_name = "URL", help = "Registry base URL (overrides WEBUI_URL)")]
    url: Option<String>,

    #[arg(long, value_name = "KEY", help = "Registry API key (overrides WEBUI_KEY)")]
    key: Option<String>,

    #[arg(short = 'c', long, value_name = "FILE", help = "TOML configuration file")]
    config: Option<String>,

    #[arg(long, help = "Print payloads instead of uploading them")]
    dry_run: bool,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();

    let default_filter = if args.verbose {
        "webui_publish=debug"
    } else {
        "webui_publish=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load .env for local dev (if present)
    if dotenvy::dotenv().is_ok() {
        tracing::debug!("Loaded .env");
    }

    let config = load_config(&args)?;
    if !args.dry_run {
        config.validate()?;
    }
    tracing::info!(
        "Publishing to {} (timeout {}s)",
        config.registry.base_url,
        config.registry.timeout_secs
    );

    let roots = if args.paths.is_empty() {
        publisher::default_roots()
    } else {
        args.paths.clone()
    };
    let files = publisher::discover(&roots).context("failed to collect plugin files")?;
    if files.is_empty() {
        tracing::warn!("No plugin files found");
        return Ok(ExitCode::SUCCESS);
    }

    let publisher = Publisher::new(RegistryClient::new(config.registry))
        .with_kind_override(args.kind)
        .with_dry_run(args.dry_run);
    let report = publisher.publish_all(&files).await;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(published) if published.action == PublishAction::DryRun => {
                println!("{}", serde_json::to_string_pretty(&published.payload)?);
            }
            _ => println!("{}", outcome.status_line()),
        }
    }
    println!(
        "{} published, {} failed",
        report.succeeded(),
        report.failed()
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(args: &CliArgs) -> Result<PublishConfig> {
    let mut config = match &args.config {
        Some(path) => PublishConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?
            .with_env_overrides()?,
        None => PublishConfig::from_env()?,
    };

    if let Some(url) = &args.url {
        config.registry.base_url = url.clone();
    }
    if let Some(key) = &args.key {
        config.registry.api_key = key.clone();
    }
    Ok(config)
}
