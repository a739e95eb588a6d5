//! Best-effort progress events

use clausal_domain::AnalysisId;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

/// A step in the life of one extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    /// Input accepted, first attempt about to start
    Started,
    /// A provider call is starting
    AttemptStarted {
        /// 1-based attempt number
        attempt: u32,
    },
    /// A provider call failed in a retryable way
    AttemptFailed {
        /// 1-based attempt number
        attempt: u32,
        /// Human-readable cause
        reason: String,
    },
    /// Waiting before the next attempt
    Backoff {
        /// Delay in milliseconds
        delay_ms: u64,
    },
    /// A response passed validation
    Validated {
        /// Number of clauses
        clauses: usize,
        /// Number of definitions
        definitions: usize,
    },
    /// The result was stored
    Persisted {
        /// Assigned id
        id: AnalysisId,
    },
}

impl fmt::Display for ExtractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionEvent::Started => write!(f, "started"),
            ExtractionEvent::AttemptStarted { attempt } => write!(f, "attempt {} started", attempt),
            ExtractionEvent::AttemptFailed { attempt, reason } => {
                write!(f, "attempt {} failed: {}", attempt, reason)
            }
            ExtractionEvent::Backoff { delay_ms } => write!(f, "retrying in {} ms", delay_ms),
            ExtractionEvent::Validated { clauses, definitions } => {
                write!(f, "validated ({} clauses, {} definitions)", clauses, definitions)
            }
            ExtractionEvent::Persisted { id } => write!(f, "saved as analysis {}", id),
        }
    }
}

/// Optional destination for progress events
///
/// Sending never blocks; a full or closed channel drops the event.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::Sender<ExtractionEvent>>,
}

impl EventSink {
    /// Send events to `sender`
    pub fn new(sender: mpsc::Sender<ExtractionEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Discard all events
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&self, event: ExtractionEvent) {
        if let Some(sender) = &self.sender {
            if let Err(e) = sender.try_send(event) {
                debug!("Dropped progress event: {}", e);
            }
        }
    }
}
