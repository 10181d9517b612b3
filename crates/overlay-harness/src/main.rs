mod cli;
mod runner;
mod script;

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use overlay_common::ConfigError;
use overlay_config::OverlayConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "overlay=info";

fn load_config(path: Option<&str>) -> Result<OverlayConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = overlay_config::load_from_path(Path::new(path))?;
            overlay_config::validation::validate(&config)?;
            Ok(config)
        }
        None => overlay_config::load_config(),
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config decides the default log level, so it loads before logging is up.
    let loaded = load_config(args.config.as_deref());

    let log_directive = args
        .log_level
        .as_deref()
        .map(|level| format!("overlay={level}"))
        .or_else(|| {
            loaded
                .as_ref()
                .ok()
                .map(|c| format!("overlay={}", c.logging.level.to_lowercase()))
        })
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());
    let directive: Directive = log_directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    tracing::info!("overlay-harness v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        OverlayConfig::default()
    });

    let lines = match &args.script {
        Some(path) => std::fs::File::open(path)
            .and_then(|file| script::read_script(BufReader::new(file))),
        None => script::read_script(std::io::stdin().lock()),
    };
    let lines = match lines {
        Ok(lines) => lines,
        Err(e) => {
            tracing::error!("Failed to read script: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(entries = lines.len(), "script loaded");

    let out = BufWriter::new(std::io::stdout().lock());
    match runner::Runner::new(&config, out).run(lines) {
        Ok((summary, _)) if summary.invalid_lines == 0 => ExitCode::SUCCESS,
        Ok((summary, _)) => {
            tracing::warn!(invalid = summary.invalid_lines, "script had invalid lines");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}
