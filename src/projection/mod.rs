//! Balance projections for each jurisdiction
//!
//! All projectors compound annually. Withdrawals, where modeled, are a flat
//! nominal drain on the starting balance rather than a compounding
//! withdrawal stream.

mod au;
mod us;
mod uk;
mod india;

pub use au::{project_balance as au_project_balance, AuPhase, AuProjectionResult, AuProjectionRules};
pub use us::{project_401k as us_project_401k, UsProjectionResult, UsProjectionRules, UsRegime};
pub use uk::{project_pension_pot as uk_project_pension_pot, UkAccessPhase, UkProjectionResult, UkProjectionRules};
pub use india::{
    project_corpus as in_project_corpus, project_retirement_corpus as in_project_retirement_corpus,
    InProjectionResult, InProjectionRules, InRetirementCorpusResult,
};

use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::Calculation;
use crate::rules::RuleTables;

/// Projection outcome of any jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "jurisdiction")]
pub enum ProjectionOutcome {
    #[serde(rename = "AU")]
    Au(AuProjectionResult),
    #[serde(rename = "US")]
    Us(UsProjectionResult),
    #[serde(rename = "UK")]
    Uk(UkProjectionResult),
    #[serde(rename = "IN")]
    In(InProjectionResult),
}

impl ProjectionOutcome {
    /// Balance (or combined corpus) at the end of the horizon
    pub fn final_balance(&self) -> f64 {
        match self {
            ProjectionOutcome::Au(r) => r.final_balance,
            ProjectionOutcome::Us(r) => r.final_balance,
            ProjectionOutcome::Uk(r) => r.final_pot,
            ProjectionOutcome::In(r) => r.total_corpus,
        }
    }

    pub fn depleted(&self) -> bool {
        match self {
            ProjectionOutcome::Au(r) => r.depleted,
            ProjectionOutcome::Us(r) => r.depleted,
            ProjectionOutcome::Uk(r) => r.depleted,
            ProjectionOutcome::In(_) => false,
        }
    }
}

/// Balance projection rules for one jurisdiction
pub trait ProjectionRules: Send + Sync {
    fn country(&self) -> Country;

    /// Project the member's balance `years` ahead
    fn project(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
        years: u32,
    ) -> Result<Calculation<ProjectionOutcome>, RulesError>;
}

/// Compound growth factor `(1 + rate)^years`
pub(crate) fn growth_factor(rate: f64, years: u32) -> f64 {
    (1.0 + rate).powi(years as i32)
}

/// Future value of a balance plus a level end-of-year contribution
///
/// A zero rate degrades to simple accumulation instead of dividing by zero.
pub(crate) fn future_value(balance: f64, contribution: f64, rate: f64, years: u32) -> f64 {
    if rate == 0.0 {
        return balance + contribution * years as f64;
    }
    let growth = growth_factor(rate, years);
    balance * growth + contribution * (growth - 1.0) / rate
}
