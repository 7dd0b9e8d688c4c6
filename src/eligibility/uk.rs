//! UK new State Pension entitlement from National Insurance years

use serde::{Deserialize, Serialize};

use super::{EligibilityOutcome, EligibilityRules};
use crate::citation::ToolKind;
use crate::error::{check_age, ensure_country, RulesError};
use crate::member::{Country, MaritalStatus, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, Calculation};
use crate::rules::{RuleTables, UkRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePensionResult {
    pub state_pension_age: u32,
    pub years_until_state_pension_age: u32,
    pub ni_years: u32,
    pub marital_status: MaritalStatus,
    pub weekly_pension: f64,
    pub annual_pension: f64,
    /// At least the full number of qualifying years
    pub full_eligible: bool,
    /// At least the minimum number of qualifying years
    pub entitled: bool,
}

/// New State Pension for `ni_years` qualifying years
///
/// Pro-rated between the minimum and full qualifying years. The amount is
/// reported whether or not State Pension age has been reached.
pub fn check_state_pension(
    rules: &UkRules,
    age: u32,
    ni_years: u32,
    marital_status: MaritalStatus,
) -> Result<Calculation<StatePensionResult>, RulesError> {
    check_age("age", age)?;
    if ni_years > age {
        return Err(RulesError::invalid(
            "ni_years",
            format!("{} qualifying years exceeds age {}", ni_years, age),
        ));
    }

    let state_pension_age = rules.state_pension_age_for(age);
    let weekly_pension = rules.weekly_state_pension(ni_years);
    let annual_pension = weekly_pension * rules.weeks_per_year;
    let full_eligible = ni_years >= rules.full_ni_years;
    let entitled = ni_years >= rules.minimum_ni_years;

    let mut status = if full_eligible {
        format!(
            "Full new State Pension {}/week ({} NI years >= {})",
            money(Country::Uk, weekly_pension),
            ni_years,
            rules.full_ni_years
        )
    } else if entitled {
        format!(
            "Partial State Pension {}/week ({}/{} NI years, {} more for full rate)",
            money(Country::Uk, weekly_pension),
            ni_years,
            rules.full_ni_years,
            rules.full_ni_years - ni_years
        )
    } else {
        format!(
            "No State Pension: {} NI years is below the {} year minimum",
            ni_years, rules.minimum_ni_years
        )
    };
    let years_until_state_pension_age = state_pension_age.saturating_sub(age);
    if years_until_state_pension_age > 0 {
        status.push_str(&format!(
            "; payable from State Pension age {} ({} years)",
            state_pension_age, years_until_state_pension_age
        ));
    }

    let result = StatePensionResult {
        state_pension_age,
        years_until_state_pension_age,
        ni_years,
        marital_status,
        weekly_pension,
        annual_pension,
        full_eligible,
        entitled,
    };
    Ok(Calculation::new(result, status))
}

/// NI years recorded on the profile, otherwise estimated from a career
/// starting at 25
fn ni_years_for(profile: &MemberFinancialProfile) -> u32 {
    profile
        .years_of_service
        .unwrap_or_else(|| profile.age.saturating_sub(25))
}

/// [`EligibilityRules`] for UK members
#[derive(Debug, Clone, Copy, Default)]
pub struct UkEligibilityRules;

impl EligibilityRules for UkEligibilityRules {
    fn country(&self) -> Country {
        Country::Uk
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
    ) -> Result<Vec<(ToolKind, Calculation<EligibilityOutcome>)>, RulesError> {
        ensure_country(Country::Uk, profile)?;
        let calc = check_state_pension(&tables.uk, profile.age, ni_years_for(profile), profile.marital_status)?;
        Ok(vec![(
            ToolKind::StatePension,
            Calculation::new(EligibilityOutcome::StatePension(calc.outcome), calc.status),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rules() -> UkRules {
        UkRules::default()
    }

    #[test]
    fn test_full_state_pension() {
        let calc = check_state_pension(&rules(), 67, 40, MaritalStatus::Married).unwrap();
        let r = &calc.outcome;
        assert!(r.full_eligible);
        assert!(r.entitled);
        assert_relative_eq!(r.weekly_pension, 221.20, epsilon = 1e-9);
        assert_relative_eq!(r.annual_pension, 11_502.40, epsilon = 1e-6);
        assert_eq!(r.state_pension_age, 67);
        assert_eq!(r.years_until_state_pension_age, 0);
        assert!(calc.status.starts_with("Full new State Pension"));
    }

    #[test]
    fn test_partial_state_pension_before_spa() {
        let calc = check_state_pension(&rules(), 50, 20, MaritalStatus::Single).unwrap();
        let r = &calc.outcome;
        assert!(!r.full_eligible);
        assert!(r.entitled);
        assert_relative_eq!(r.weekly_pension, 221.20 * 20.0 / 35.0, epsilon = 1e-9);
        assert_eq!(r.state_pension_age, 66);
        assert_eq!(r.years_until_state_pension_age, 16);
        assert!(calc.status.contains("15 more for full rate"));
        assert!(calc.status.contains("payable from State Pension age 66"));
    }

    #[test]
    fn test_below_minimum_years() {
        let calc = check_state_pension(&rules(), 30, 5, MaritalStatus::Single).unwrap();
        assert!(!calc.outcome.entitled);
        assert_eq!(calc.outcome.annual_pension, 0.0);
        assert!(calc.status.starts_with("No State Pension"));
    }

    #[test]
    fn test_ni_years_beyond_age_rejected() {
        let err = check_state_pension(&rules(), 30, 31, MaritalStatus::Single).unwrap_err();
        assert!(matches!(err, RulesError::InvalidInput { field: "ni_years", .. }));
    }

    #[test]
    fn test_ni_years_from_profile() {
        let estimated = MemberFinancialProfile::new("UK-1", 60, Country::Uk, 100_000.0);
        assert_eq!(ni_years_for(&estimated), 35);

        let recorded = estimated.clone().with_years_of_service(22);
        assert_eq!(ni_years_for(&recorded), 22);
    }
}
