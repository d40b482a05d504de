//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{DiscussionProgress, DiscussionSession, NoProgress};
use roundtable_domain::StandardPromptBuilder;
use roundtable_infrastructure::{ConfigLoader, FileConfig, RoutingGateway};
use roundtable_presentation::{
    Cli, OutputFormat, SimpleProgress, StreamingReporter, TranscriptFormatter,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_overrides(&mut config, &cli);

    let registry = Arc::new(config.to_registry().context("Invalid configuration")?);

    if cli.list_personas {
        print!("{}", TranscriptFormatter::new(&registry).format_roster());
        return Ok(());
    }

    let topic = match cli.topic.as_deref() {
        Some(topic) if !topic.trim().is_empty() => topic,
        _ => bail!("A topic is required, e.g. roundtable \"Tabs or spaces?\""),
    };

    let schedule = config.to_schedule_config().context("Invalid schedule")?;
    let params = config.to_discussion_params();

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(
        &config.providers,
        config.providers_in_use(),
    ));
    if gateway.configured().is_empty() {
        warn!("No provider has an API key; every step will fail");
    }

    let streamed = !cli.quiet && cli.output == OutputFormat::Transcript;
    let progress: Arc<dyn DiscussionProgress> = if cli.quiet {
        Arc::new(NoProgress)
    } else if streamed {
        Arc::new(StreamingReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    if streamed {
        println!();
        println!("+============================================================+");
        println!("|                  Roundtable Discussion                     |");
        println!("+============================================================+");
        println!();
        println!("Topic: {}", topic);
        println!();
    }

    info!(
        personas = registry.roster_len(),
        backends = registry.pool_len(),
        total_turns = schedule.total_turns(),
        "Starting roundtable"
    );

    let mut session = DiscussionSession::new(
        gateway,
        Arc::clone(&registry),
        Arc::new(StandardPromptBuilder::new(Arc::clone(&registry))),
        schedule,
        params,
    )
    .with_progress(progress);

    let outcome = session.run(topic).await?;

    // Output results
    let formatter = TranscriptFormatter::new(&registry);
    let output = match cli.output {
        OutputFormat::Transcript if streamed => formatter.footer(&outcome),
        OutputFormat::Transcript => formatter.format(&outcome),
        OutputFormat::Moderator => formatter.format_moderator_only(&outcome),
        OutputFormat::Json => TranscriptFormatter::format_json(&outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Fold CLI flags into the file configuration; flags win
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(turns) = cli.turns {
        config.schedule.total_turns = Some(turns);
    }
    if let Some(after) = cli.summary_after {
        config.schedule.summary_after = Some(after);
    }
    if cli.no_summary {
        config.schedule.disable_summary = true;
    }
    if let Some(seed) = cli.seed {
        config.discussion.seed = Some(seed);
    }
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` wins over `-v`. With `--log-file` the returned guard must live
/// until exit so buffered lines get flushed.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
