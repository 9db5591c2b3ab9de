//! Intent pipeline
//!
//! INPUT → CLASSIFY → {EXTRACT → CONFIRM → APPEND | REPORT | ANSWER}
//!
//! Console-agnostic: the caller feeds lines and prints the returned
//! [`Outcome`]. Every failure is contained in the outcome of the input
//! that caused it; the pipeline itself never gets stuck.

pub mod payload;

pub use payload::{Classification, Extraction, Intent};

use crate::dates::DateNormalizer;
use crate::error::AssistantError;
use crate::ledger::Ledger;
use crate::models::{EntryDraft, RecordId, Timestamp};
use crate::oracle::RotatingClient;
use crate::prompts;
use crate::report::{PeriodReport, ReportAggregator};
use crate::Result;
use std::fmt;
use tracing::{debug, info, warn};

/// Token that commits a pending entry. Case-sensitive; surrounding whitespace is ignored.
pub const CONFIRM_TOKEN: &str = "ok";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PipelineState {
    Idle,
    AwaitingConfirmation(EntryDraft),
}

/// Result of feeding one line to the pipeline
#[derive(Debug)]
pub enum Outcome {
    /// An entry was extracted; the next line is its confirmation
    PendingConfirmation(EntryDraft),
    Committed(RecordId),
    Discarded,
    Report(PeriodReport),
    Answer(String),
    /// Report kind not handled; nothing happened
    Unsupported(String),
    Failed(AssistantError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PendingConfirmation(draft) => write!(
                f,
                "Extracted entry: {}\nType '{}' to save it, anything else to discard.",
                draft, CONFIRM_TOKEN
            ),
            Outcome::Committed(id) => write!(f, "Entry {} saved.", id),
            Outcome::Discarded => write!(f, "Entry discarded."),
            Outcome::Report(report) => write!(f, "{}", report),
            Outcome::Answer(text) => write!(f, "{}", text.trim_end()),
            Outcome::Unsupported(kind) => write!(f, "Unsupported report type: {}", kind),
            Outcome::Failed(e) => write!(f, "Could not process input: {}", e),
        }
    }
}

pub struct IntentPipeline {
    client: RotatingClient,
    ledger: Ledger,
    model: String,
    clock: fn() -> Timestamp,
    state: PipelineState,
}

impl IntentPipeline {
    pub fn new(client: RotatingClient, model: impl Into<String>) -> Self {
        Self {
            client,
            ledger: Ledger::new(),
            model: model.into(),
            clock: DateNormalizer::now,
            state: PipelineState::Idle,
        }
    }

    /// Replace the wall clock used for defaults and prompts
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self.state, PipelineState::AwaitingConfirmation(_))
    }

    /// Feed one line. While an entry is pending, the line is its confirmation.
    pub async fn submit(&mut self, input: &str) -> Outcome {
        if self.is_awaiting_confirmation() {
            let accepted = input.trim() == CONFIRM_TOKEN;
            return self.confirm(accepted);
        }

        match self.process(input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Input abandoned");
                Outcome::Failed(e)
            }
        }
    }

    /// Resolve a pending entry. Without one this is a no-op `Discarded`.
    pub fn confirm(&mut self, accepted: bool) -> Outcome {
        let state = std::mem::replace(&mut self.state, PipelineState::Idle);
        let PipelineState::AwaitingConfirmation(draft) = state else {
            return Outcome::Discarded;
        };

        if accepted {
            Outcome::Committed(self.ledger.append(draft))
        } else {
            info!("Pending entry discarded");
            Outcome::Discarded
        }
    }

    async fn process(&mut self, input: &str) -> Result<Outcome> {
        let now = (self.clock)();

        let reply = self
            .client
            .call(&self.model, &prompts::classification_prompt(input, now))
            .await?;
        let classification = Classification::parse(&reply.text)?;
        let intent = classification.intent();

        debug!(?intent, "Input classified");

        match intent {
            Intent::Entry => self.extract_entry(input, now).await,
            Intent::Report => self.report(&classification, now),
            Intent::Search => {
                let reply = self
                    .client
                    .call(&self.model, &prompts::question_prompt(input))
                    .await?;
                Ok(Outcome::Answer(reply.text))
            }
        }
    }

    async fn extract_entry(&mut self, input: &str, now: Timestamp) -> Result<Outcome> {
        let reply = self
            .client
            .call(&self.model, &prompts::extraction_prompt(input, now))
            .await?;
        let draft = Extraction::parse(&reply.text)?.into_draft(now);

        debug!(revenue = draft.revenue, cost = draft.cost, "Entry extracted");

        self.state = PipelineState::AwaitingConfirmation(draft.clone());
        Ok(Outcome::PendingConfirmation(draft))
    }

    fn report(&self, classification: &Classification, now: Timestamp) -> Result<Outcome> {
        let period = match classification.report_period(now) {
            Ok(period) => period,
            Err(AssistantError::UnsupportedReport(kind)) => {
                info!(kind = %kind, "Unsupported report type");
                return Ok(Outcome::Unsupported(kind));
            }
            Err(e) => return Err(e),
        };

        let report = ReportAggregator::generate(self.ledger.all(), period)?;
        Ok(Outcome::Report(report))
    }
}
