mod cli;
mod error;
mod output;

use std::fs;
use std::io;
use std::path::Path;
use std::process;
use std::time::Duration;

use clap::Parser;
use m3u::StreamEntry;
use plvet_engine::{CheckConfig, Checker, HttpTransport, ProbeConfig, RetryPolicy};
use tracing::{Level, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::{Args, Commands, OutputFormat};
use crate::error::{AppError, Result};
use crate::output::Reporter;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    // Only a missing/empty playlist aborts the run; dead streams are part
    // of the report and still exit zero.
    if let Err(e) = run(args).await {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Check {
            playlist,
            timeout,
            retries,
            probe_delay,
            user_agent,
            output,
        } => {
            let entries = load_playlist(&playlist)?;
            let config = CheckConfig {
                probe: ProbeConfig {
                    timeout: Duration::from_secs(timeout),
                    user_agent: user_agent
                        .unwrap_or_else(|| plvet_engine::DEFAULT_USER_AGENT.to_owned()),
                    retry: RetryPolicy {
                        max_attempts: retries,
                        ..RetryPolicy::default()
                    },
                    ..ProbeConfig::default()
                },
                entry_delay: Duration::from_millis(probe_delay),
            };
            check(entries, config, output).await
        }

        Commands::Sort { playlist, output } => {
            let text = read_source(&playlist)?;
            write_output(output.as_deref(), &m3u::sort_by_group(&text))
        }

        Commands::Format { playlist, output } => {
            let text = read_source(&playlist)?;
            write_output(output.as_deref(), &m3u::normalize(&text))
        }
    }
}

async fn check(entries: Vec<StreamEntry>, config: CheckConfig, output: OutputFormat) -> Result<()> {
    let transport = HttpTransport::new(&config.probe)?;
    let checker = Checker::new(transport, config);

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock());

    let run = match output {
        OutputFormat::Pretty => {
            if !entries.is_empty() {
                reporter.begin(entries.len())?;
            }
            checker
                .run(entries, |update| {
                    let _ = reporter.progress(&update);
                })
                .await
        }
        OutputFormat::Json => checker.run(entries, |_| {}).await,
    };

    match output {
        OutputFormat::Pretty => reporter.summary(&run)?,
        OutputFormat::Json => reporter.json(&run)?,
    }
    Ok(())
}

fn load_playlist(path: &Path) -> Result<Vec<StreamEntry>> {
    let text = read_source(path)?;
    Ok(m3u::parse(&text)?)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| AppError::Source {
        path: path.display().to_string(),
        source,
    })
}

fn write_output(target: Option<&Path>, text: &str) -> Result<()> {
    match target {
        Some(path) => fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    // Diagnostics go to stderr so the stdout transcript stays capturable.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
