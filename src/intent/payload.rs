//! Structured payloads returned by the oracle
//!
//! Boundary shapes only. Field names follow the prompt contract.

use crate::dates::{DateInput, DateNormalizer};
use crate::error::AssistantError;
use crate::models::{EntryDraft, Timestamp, MAX_AMOUNT};
use crate::report::{ReportKind, ReportPeriod};
use crate::Result;
use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Strip code fences, surrounding whitespace and a leading `json` tag
pub fn clean_structured_output(text: &str) -> &str {
    let trimmed = text.trim_matches(|c: char| c == '`' || c.is_whitespace());
    let body = trimmed
        .strip_prefix("json")
        .or_else(|| trimmed.strip_prefix("JSON"))
        .unwrap_or(trimmed);
    body.trim()
}

fn parse_payload<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    let cleaned = clean_structured_output(text);
    serde_json::from_str(cleaned)
        .map_err(|e| AssistantError::MalformedOutput(format!("{} payload: {}", what, e)))
}

//
// ================= Classification =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Entry,
    Report,
    /// Anything else: a general question
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    pub type_input: String,
    pub report_type: Option<String>,
    pub period: Option<u32>,
    pub year: Option<i32>,
    pub date: Option<String>,
}

impl Classification {
    pub fn parse(text: &str) -> Result<Self> {
        parse_payload(text, "classification")
    }

    pub fn intent(&self) -> Intent {
        match self.type_input.trim().to_lowercase().as_str() {
            "entry" => Intent::Entry,
            "report" => Intent::Report,
            _ => Intent::Search,
        }
    }

    /// Resolve the requested period, filling unset fields from `now`
    pub fn report_period(&self, now: Timestamp) -> Result<ReportPeriod> {
        let code = self.report_type.as_deref().unwrap_or_default();
        let kind = ReportKind::from_code(code).ok_or_else(|| {
            AssistantError::UnsupportedReport(if code.is_empty() {
                "(none)".to_string()
            } else {
                code.to_string()
            })
        })?;

        let year = self.year.unwrap_or_else(|| now.year());

        let period = match kind {
            ReportKind::Day => {
                let input = match &self.date {
                    Some(date) => DateInput::Text(date.clone()),
                    None => DateInput::Now,
                };
                ReportPeriod::Day {
                    date: DateNormalizer::normalize_at(input, now).date(),
                }
            }
            ReportKind::Month => ReportPeriod::Month {
                month: self.period.unwrap_or_else(|| now.month()),
                year,
            },
            ReportKind::Quarter => ReportPeriod::Quarter {
                quarter: self
                    .period
                    .unwrap_or_else(|| ReportPeriod::quarter_of(now.month())),
                year,
            },
            ReportKind::Year => ReportPeriod::Year { year },
        };

        Ok(period)
    }
}

//
// ================= Extraction =================
//

#[derive(Debug, Clone, Deserialize)]
pub struct Extraction {
    #[serde(rename = "doanh_thu")]
    pub revenue: u64,
    #[serde(rename = "chi_phi")]
    pub cost: u64,
    #[serde(rename = "ghi_chu", default)]
    pub note: Option<String>,
    /// Left raw; normalized when the draft is built
    #[serde(rename = "ngay_tao", default)]
    pub created_at: Option<Value>,
}

impl Extraction {
    /// Parse and bound-check. Amounts above `MAX_AMOUNT` are malformed output.
    pub fn parse(text: &str) -> Result<Self> {
        let extraction: Self = parse_payload(text, "extraction")?;
        for (field, amount) in [("doanh_thu", extraction.revenue), ("chi_phi", extraction.cost)] {
            if amount > MAX_AMOUNT {
                return Err(AssistantError::MalformedOutput(format!(
                    "extraction payload: {} {} exceeds {}",
                    field, amount, MAX_AMOUNT
                )));
            }
        }
        Ok(extraction)
    }

    pub fn into_draft(self, now: Timestamp) -> EntryDraft {
        let created_at =
            DateNormalizer::normalize_at(DateInput::from_value(self.created_at.as_ref()), now);

        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        EntryDraft {
            revenue: self.revenue,
            cost: self.cost,
            note,
            created_at,
        }
    }
}
