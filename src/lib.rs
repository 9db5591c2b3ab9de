//! Bookkeeping Assistant
//!
//! A conversational bookkeeper that:
//! - Classifies free-text input with a language model (entry / report / question)
//! - Extracts revenue, cost, note and date from entries, pending user confirmation
//! - Keeps committed entries in an in-memory, append-only ledger
//! - Produces day, month, quarter and year profit reports
//! - Survives oracle outages by rotating through a list of API credentials
//!
//! FLOW:
//! INPUT → CLASSIFY → {EXTRACT → CONFIRM → APPEND | REPORT | ANSWER}

pub mod config;
pub mod dates;
pub mod error;
pub mod intent;
pub mod ledger;
pub mod models;
pub mod oracle;
pub mod prompts;
pub mod report;
pub mod session;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use intent::{IntentPipeline, Outcome};
pub use ledger::Ledger;
pub use report::{PeriodReport, ReportAggregator, ReportPeriod};
