//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use clausal_domain::{AnalysisRecord, AnalysisResult, AnalysisSummary, DocumentMetadata};
use clausal_extractor::{AnalysisOutcome, Persistence};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const CELL_WIDTH: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the outcome of an analyze run.
    pub fn format_outcome(&self, outcome: &AnalysisOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(match &outcome.persistence {
                Persistence::Saved(id) => id.to_string(),
                _ => String::new(),
            }),
            OutputFormat::Table => {
                let mut out = self.result_tables(&outcome.result);
                out.push('\n');
                out.push_str(&match &outcome.persistence {
                    Persistence::Saved(id) => self.success(&format!("Saved as analysis {}", id)),
                    Persistence::Skipped => self.info("Result not saved"),
                    Persistence::Failed(reason) => {
                        self.warning(&format!("Result could not be saved: {}", reason))
                    }
                });
                Ok(out)
            }
        }
    }

    /// Format a stored analysis.
    pub fn format_record(&self, record: &AnalysisRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.id.to_string()),
            OutputFormat::Table => {
                let header = format!(
                    "Analysis {} of {} (created {})",
                    record.id, record.filename, record.created_at
                );
                Ok(format!("{}\n{}", self.colorize(&header, "cyan"), self.result_tables(&record.content)))
            }
        }
    }

    /// Format the listing of stored analyses.
    pub fn format_summaries(&self, summaries: &[AnalysisSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summaries)?),
            OutputFormat::Quiet => Ok(summaries
                .iter()
                .map(|s| s.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if summaries.is_empty() {
                    return Ok(self.colorize("No analyses found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "File", "Created (Unix)"]);
                for summary in summaries {
                    builder.push_record([
                        summary.id.to_string(),
                        summary.filename.clone(),
                        summary.created_at.to_string(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Clauses, definitions, missing categories and metadata as text.
    fn result_tables(&self, result: &AnalysisResult) -> String {
        let mut sections = Vec::new();

        if result.clauses.is_empty() {
            sections.push(self.colorize("No clauses found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Type", "Summary", "Citation"]);
            for clause in &result.clauses {
                builder.push_record([
                    clause.clause_type.clone(),
                    truncate(&clause.summary, CELL_WIDTH),
                    clause.citation.clone(),
                ]);
            }
            sections.push(format!("{}\n{}", self.colorize("Clauses", "cyan"), styled(builder)));
        }

        if !result.definitions.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Term", "Definition", "Citation"]);
            for definition in &result.definitions {
                builder.push_record([
                    definition.term.clone(),
                    truncate(&definition.definition, CELL_WIDTH),
                    definition.citation.clone(),
                ]);
            }
            sections.push(format!("{}\n{}", self.colorize("Definitions", "cyan"), styled(builder)));
        }

        if let Some(missing) = result.missing_types.as_ref().filter(|m| !m.is_empty()) {
            sections.push(self.warning(&format!("Not found: {}", missing.join(", "))));
        }

        if !result.metadata.is_empty() {
            sections.push(metadata_lines(&result.metadata));
        }

        sections.join("\n\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn metadata_lines(metadata: &DocumentMetadata) -> String {
    let fields = [
        ("Title", &metadata.title),
        ("Author", &metadata.author),
        ("Subject", &metadata.subject),
        ("Keywords", &metadata.keywords),
        ("Creator", &metadata.creator),
        ("Producer", &metadata.producer),
        ("Created", &metadata.creation_date),
        ("Modified", &metadata.modification_date),
    ];

    fields
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten `text` to at most `max` characters.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
