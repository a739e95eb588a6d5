//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use clausal_extractor::{AnalysisPipeline, Extractor};
use clausal_store::SqliteStore;
use std::path::Path;

/// Execute the list command.
pub fn execute_list(database: &Path, formatter: &Formatter) -> Result<()> {
    let pipeline = AnalysisPipeline::new(Extractor::default(), SqliteStore::new(database)?);
    let summaries = pipeline.list()?;

    println!("{}", formatter.format_summaries(&summaries)?);
    Ok(())
}
