//! CLI entrypoint for legion
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use legion_application::{LegionSession, NoProgress, ProgressNotifier, SessionReply};
use legion_infrastructure::{
    CommandSpeech, ConfigLoader, FileConfig, JsonActorStore, JsonlConversationLogger,
    OllamaGateway, StdRandom, config::expand_home,
};
use legion_presentation::{
    Cli, ConsoleFormatter, LegionRepl, OutputConfig, OutputFormat, ProgressReporter,
    ReplConfig, SimpleProgress,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stderr diagnostics by `-v` count, plus a daily file when `log_dir` is set.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "legion.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Fold command-line flags over the loaded file configuration
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.backend.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(dir) = &cli.cache_dir {
        config.storage.cache_dir = Some(dir.display().to_string());
    }
    if cli.verbose > 0 {
        config.session.verbose = true;
    }
    if cli.tts {
        config.session.speech = true;
    }
    if cli.quiet {
        config.output.show_progress = false;
    }
    if let Some(path) = &cli.conversation_log {
        config.output.conversation_log = Some(path.display().to_string());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting legion");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        match ConfigLoader::load(cli.config.as_ref()) {
            Ok(config) => config,
            Err(e) => bail!("Failed to load configuration: {}", e),
        }
    };
    apply_cli_overrides(&mut file_config, &cli);
    for issue in file_config.validate() {
        warn!("Config: {}", issue);
    }

    OutputConfig::new(file_config.output.color).apply();

    let session_config = file_config
        .session
        .to_session_config(file_config.backend.timeout_secs);
    let verbose = session_config.verbose;

    // === Dependency Injection ===
    let gateway = Arc::new(OllamaGateway::new(
        file_config.backend.base_url.clone(),
        file_config.backend.parse_model(),
    )?);
    let cache_dir = file_config.storage.resolve_cache_dir();
    info!("Actor records in {}", cache_dir.display());
    let store = Arc::new(JsonActorStore::new(cache_dir));
    let rng = Box::new(StdRandom::new(cli.seed));

    let mut session = LegionSession::new(gateway, store, rng, session_config);

    match CommandSpeech::detect() {
        Some(speech) => {
            info!("Speech through {}", speech.program().command());
            session = session.with_speech(Arc::new(speech));
        }
        None if file_config.session.speech => {
            warn!("Speech requested but no synthesizer was found on PATH");
        }
        None => {}
    }

    let transcript_path = match (file_config.output.conversation_log.as_deref(), &cli.log_dir) {
        (Some(path), _) => Some(expand_home(path)),
        (None, Some(dir)) => Some(JsonlConversationLogger::default_path(dir)),
        (None, None) => None,
    };
    if let Some(path) = transcript_path {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                session = session.with_logger(Arc::new(logger));
            }
            None => warn!("Conversation logging disabled"),
        }
    }

    session.bootstrap();

    // Interactive mode
    let Some(input) = cli.input.as_deref() else {
        let repl_config = ReplConfig::default()
            .with_progress(file_config.output.show_progress)
            .with_history_file(file_config.storage.resolve_history_file());
        let mut repl = LegionRepl::new(session).with_config(repl_config);
        repl.run().await?;
        return Ok(());
    };

    // Single round mode
    let progress: Box<dyn ProgressNotifier> = match cli.output {
        OutputFormat::Json => Box::new(NoProgress),
        OutputFormat::Text if file_config.output.show_progress => {
            Box::new(ProgressReporter::new(verbose))
        }
        OutputFormat::Text => Box::new(SimpleProgress),
    };

    let result = session.handle_input(input, progress.as_ref()).await;
    session.shutdown().await;
    let reply = result?;

    match (cli.output, &reply) {
        (OutputFormat::Json, _) => println!("{}", ConsoleFormatter::format_json(&reply)),
        (OutputFormat::Text, SessionReply::Panel(verdict)) => {
            println!("{}", ConsoleFormatter::format_verdict(verdict));
        }
        (OutputFormat::Text, SessionReply::Round(report)) => {
            if verbose {
                println!("{}", ConsoleFormatter::format_decision(&report.decision));
                print!("{}", ConsoleFormatter::format_round_summary(report));
            }
        }
    }

    Ok(())
}
