//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::output::Formatter;
use clausal_extractor::{AnalysisPipeline, Extractor};
use clausal_store::SqliteStore;
use std::path::Path;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, database: &Path, formatter: &Formatter) -> Result<()> {
    let pipeline = AnalysisPipeline::new(Extractor::default(), SqliteStore::new(database)?);
    let record = pipeline.get(args.id)?;

    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
