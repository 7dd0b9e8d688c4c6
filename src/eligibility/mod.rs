//! Government and scheme benefit eligibility
//!
//! - **AU**: Age Pension under the assets test, tapered between thresholds
//! - **US**: Social Security benefit by claim age
//! - **UK**: new State Pension from National Insurance years
//! - **IN**: EPS monthly pension and NPS exit split

mod au;
mod us;
mod uk;
mod india;

pub use au::{check_pension_impact as au_check_pension_impact, AgePensionResult, AgePensionStatus, AuEligibilityRules};
pub use us::{check_social_security as us_check_social_security, ClaimTiming, SocialSecurityResult, UsEligibilityRules};
pub use uk::{check_state_pension as uk_check_state_pension, StatePensionResult, UkEligibilityRules};
pub use india::{
    calculate_eps_benefits as in_calculate_eps_benefits, calculate_nps as in_calculate_nps,
    calculate_nps_withdrawal as in_calculate_nps_withdrawal, EpsEligibility, EpsResult,
    InEligibilityRules, NpsResult, NpsWithdrawalResult, INVALID_NPS_SPLIT,
};

use serde::{Deserialize, Serialize};

use crate::citation::ToolKind;
use crate::error::RulesError;
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::Calculation;
use crate::rules::RuleTables;

/// Eligibility outcome of any benefit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "benefit", rename_all = "snake_case")]
pub enum EligibilityOutcome {
    AgePension(AgePensionResult),
    SocialSecurity(SocialSecurityResult),
    StatePension(StatePensionResult),
    Eps(EpsResult),
    Nps(NpsResult),
}

impl EligibilityOutcome {
    /// Whether any benefit is currently payable
    pub fn eligible(&self) -> bool {
        match self {
            EligibilityOutcome::AgePension(r) => r.eligible,
            EligibilityOutcome::SocialSecurity(r) => r.monthly_benefit > 0.0,
            EligibilityOutcome::StatePension(r) => r.entitled && r.years_until_state_pension_age == 0,
            EligibilityOutcome::Eps(r) => r.monthly_pension > 0.0,
            EligibilityOutcome::Nps(r) => r.eligible,
        }
    }
}

/// Benefit eligibility rules for one jurisdiction
///
/// A jurisdiction may have several benefits; each comes back tagged with
/// the tool its citation is filed under.
pub trait EligibilityRules: Send + Sync {
    fn country(&self) -> Country;

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Vec<(ToolKind, Calculation<EligibilityOutcome>)>, RulesError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MaritalStatus;

    #[test]
    fn test_india_reports_eps_and_nps() {
        let tables = RuleTables::default_2024();
        let member = MemberFinancialProfile::new("IN-1", 60, Country::In, 1_500_000.0).with_years_of_service(30);
        let results = InEligibilityRules
            .assess(&tables, &member, &WithdrawalRequest::default())
            .unwrap();

        let tools: Vec<ToolKind> = results.iter().map(|(tool, _)| *tool).collect();
        assert_eq!(tools, vec![ToolKind::EpsPension, ToolKind::NpsAnnuity]);
        assert!(results.iter().all(|(_, calc)| calc.outcome.eligible()));
    }

    #[test]
    fn test_wrong_country_rejected() {
        let tables = RuleTables::default_2024();
        let member = MemberFinancialProfile::new("UK-1", 70, Country::Uk, 100_000.0)
            .with_marital_status(MaritalStatus::Married);
        let err = AuEligibilityRules
            .assess(&tables, &member, &WithdrawalRequest::default())
            .unwrap_err();
        assert_eq!(
            err,
            RulesError::JurisdictionMismatch {
                expected: Country::Au,
                found: Country::Uk
            }
        );
    }

    #[test]
    fn test_outcome_tagged_by_benefit() {
        let tables = RuleTables::default_2024();
        let member = MemberFinancialProfile::new("US-1", 67, Country::Us, 0.0);
        let results = UsEligibilityRules
            .assess(&tables, &member, &WithdrawalRequest::default())
            .unwrap();
        let json = serde_json::to_value(&results[0].1.outcome).unwrap();
        assert_eq!(json["benefit"], "social_security");
        assert_eq!(json["monthly_benefit"], 3_000.0);
    }
}
