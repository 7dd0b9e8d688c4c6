//! Calculator result wrappers
//!
//! Calculators produce a [`Calculation`]: the numeric outcome plus a status
//! line. The [`ResultAssembler`] turns that into an [`Assessment`] by
//! attaching the member id and the regulation citation for the jurisdiction
//! and tool. Citations never feed back into the numbers.

use serde::{Deserialize, Serialize};

use crate::citation::{CitationRegistry, ToolKind};
use crate::member::Country;

/// Numeric outcome of a calculator with its human-readable status
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation<T> {
    pub outcome: T,
    pub status: String,
}

impl<T> Calculation<T> {
    pub fn new(outcome: T, status: impl Into<String>) -> Self {
        Self {
            outcome,
            status: status.into(),
        }
    }
}

/// A calculator result as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment<T> {
    pub member_id: String,
    pub country: Country,
    pub tool: ToolKind,
    pub outcome: T,
    pub status: String,
    /// Free-text citation code
    pub regulation: String,
    /// Issuing body
    pub authority: String,
    pub citation_id: Option<String>,
}

impl<T> Assessment<T> {
    /// Convert the outcome, keeping the citation and status
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Assessment<U> {
        Assessment {
            member_id: self.member_id,
            country: self.country,
            tool: self.tool,
            outcome: f(self.outcome),
            status: self.status,
            regulation: self.regulation,
            authority: self.authority,
            citation_id: self.citation_id,
        }
    }
}

/// Regulation text used when the registry has no entry
pub const UNCITED_REGULATION: &str = "No citation on file";
pub const UNCITED_AUTHORITY: &str = "Unknown";

/// Attaches member ids and citations to calculator output
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler<'a> {
    citations: &'a CitationRegistry,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(citations: &'a CitationRegistry) -> Self {
        Self { citations }
    }

    pub fn assemble<T>(
        &self,
        member_id: &str,
        country: Country,
        tool: ToolKind,
        calculation: Calculation<T>,
    ) -> Assessment<T> {
        let (regulation, authority, citation_id) = match self.citations.get(country, tool) {
            Some(citation) => (
                citation.regulation(),
                citation.authority.clone(),
                Some(citation.citation_id.clone()),
            ),
            None => {
                log::warn!("No citation registered for {} {}", country, tool);
                (UNCITED_REGULATION.to_string(), UNCITED_AUTHORITY.to_string(), None)
            }
        };

        Assessment {
            member_id: member_id.to_string(),
            country,
            tool,
            outcome: calculation.outcome,
            status: calculation.status,
            regulation,
            authority,
            citation_id,
        }
    }
}

/// Format a currency amount with thousands separators, e.g. `$1,234.50`
pub(crate) fn money(country: Country, amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}{}{}.{:02}",
        if negative { "-" } else { "" },
        country.currency_symbol(),
        grouped,
        cents % 100
    )
}

/// Format a rate as a percentage with one decimal, e.g. `32.5%`
pub(crate) fn pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
