//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clausal_extractor::{
    AnalysisOutcome, AnalysisPipeline, CancelSignal, EventSink, ExtractionEvent, Extractor,
    Persistence,
};
use clausal_llm::{DocumentProvider, MockProvider, Provider, ProviderKind};
use clausal_store::SqliteStore;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 32;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    database: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let cancel = CancelSignal::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received; cancelling extraction");
                cancel.cancel();
            }
        })
    };

    let (sender, mut receiver) = mpsc::channel(EVENT_BUFFER);
    let show_progress = formatter.format() == OutputFormat::Table;
    let progress = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if show_progress {
                eprintln!("{}", describe(&event));
            }
        }
    });

    let outcome = analyze_file(&args, config, database, EventSink::new(sender), &cancel).await;
    interrupt.abort();
    // The pipeline, and with it the last sender, is gone once analyze_file returns
    let _ = progress.await;

    println!("{}", formatter.format_outcome(&outcome?)?);
    Ok(())
}

/// Run one analysis end to end and return its outcome.
pub async fn analyze_file(
    args: &AnalyzeArgs,
    config: &Config,
    database: &Path,
    events: EventSink,
    cancel: &CancelSignal,
) -> Result<AnalysisOutcome> {
    let kind = args.provider.map(Into::into).unwrap_or(config.providers.default);
    let provider = build_provider(args, config, kind)?;
    run_analysis(args, provider.as_ref(), config, database, events, cancel).await
}

/// Analyze `args.file` with an already built provider.
///
/// A database that cannot be opened does not stop the extraction; the
/// outcome reports `Persistence::Failed` instead.
pub async fn run_analysis(
    args: &AnalyzeArgs,
    provider: &dyn DocumentProvider,
    config: &Config,
    database: &Path,
    events: EventSink,
    cancel: &CancelSignal,
) -> Result<AnalysisOutcome> {
    let bytes = std::fs::read(&args.file)?;
    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::InvalidInput(format!("Invalid file name: {}", args.file.display())))?
        .to_string();

    let persist = !(args.no_save || args.dry_run);
    let (store, open_failure) = if persist {
        match SqliteStore::new(database) {
            Ok(store) => (store, None),
            Err(e) => {
                warn!("Cannot open database {}: {}; the result will not be saved", database.display(), e);
                (SqliteStore::new(":memory:")?, Some(e.to_string()))
            }
        }
    } else {
        (SqliteStore::new(":memory:")?, None)
    };

    debug!(
        "Analyzing '{}' ({} bytes) with {} (persist: {})",
        filename,
        bytes.len(),
        provider.name(),
        persist
    );

    let extractor = Extractor::new(config.extractor.clone()).with_events(events);
    let pipeline = AnalysisPipeline::new(extractor, store);
    let mut outcome = pipeline
        .analyze(&filename, bytes, provider, persist && open_failure.is_none(), cancel)
        .await?;

    if let Some(reason) = open_failure {
        if !cancel.is_cancelled() {
            outcome.persistence = Persistence::Failed(reason);
        }
    }

    Ok(outcome)
}

/// Provider for `kind`, or the canned provider on a dry run.
fn build_provider(
    args: &AnalyzeArgs,
    config: &Config,
    kind: ProviderKind,
) -> Result<Box<dyn DocumentProvider>> {
    if args.dry_run {
        return Ok(Box::new(
            MockProvider::default().with_needs_text(kind == ProviderKind::OpenAi),
        ));
    }

    let mut provider_config = config.provider(kind).clone();
    if let Some(model) = &args.model {
        provider_config = provider_config.with_model(model.clone());
    }
    match args.api_key(kind) {
        Some(key) => provider_config = provider_config.with_api_key(key),
        None => {
            return Err(CliError::Config(format!(
                "No API key for {}; set {} or pass --{}-api-key",
                kind,
                kind.api_key_env(),
                kind
            )))
        }
    }

    Ok(Box::new(Provider::new(kind, provider_config)?))
}

fn describe(event: &ExtractionEvent) -> String {
    format!("  {}", event)
}
