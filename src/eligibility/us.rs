//! US Social Security retirement benefit eligibility

use serde::{Deserialize, Serialize};

use super::{EligibilityOutcome, EligibilityRules};
use crate::citation::ToolKind;
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MaritalStatus, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, Calculation};
use crate::rules::{RuleTables, UsRules};

/// Claim timing relative to full retirement age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimTiming {
    NotYetEligible,
    EarlyReduced,
    FullRetirementAge,
    DelayedIncreased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    pub claim_timing: ClaimTiming,
    pub earliest_claim_age: u32,
    pub full_retirement_age: u32,
    pub monthly_benefit: f64,
    pub annual_benefit: f64,
    pub spousal_eligible: bool,
    pub years_until_eligible: u32,
    pub years_until_fra: u32,
}

/// Social Security benefit if claimed at the member's current age
///
/// Uses a step table relative to a 3,000 monthly benefit at full retirement
/// age. `balance` does not affect Social Security and is only validated.
pub fn check_social_security(
    rules: &UsRules,
    age: u32,
    marital_status: MaritalStatus,
    balance: f64,
) -> Result<Calculation<SocialSecurityResult>, RulesError> {
    check_age("age", age)?;
    check_amount("balance", balance)?;

    let fra = rules.ss_full_retirement_age;
    let earliest = rules.ss_earliest_claim_age;
    let monthly_benefit = rules.monthly_benefit(age);
    let spousal_eligible = matches!(marital_status, MaritalStatus::Married | MaritalStatus::Widowed);

    let claim_timing = if age < earliest {
        ClaimTiming::NotYetEligible
    } else if age < fra {
        ClaimTiming::EarlyReduced
    } else if age == fra {
        ClaimTiming::FullRetirementAge
    } else {
        ClaimTiming::DelayedIncreased
    };

    let benefit = money(Country::Us, monthly_benefit);
    let mut status = match claim_timing {
        ClaimTiming::NotYetEligible => format!(
            "Not yet eligible: earliest claim age is {} ({} years to go)",
            earliest,
            earliest - age
        ),
        ClaimTiming::EarlyReduced => format!(
            "Early claim at {}: reduced benefit {}/month ({} years before full retirement age {})",
            age,
            benefit,
            fra - age,
            fra
        ),
        ClaimTiming::FullRetirementAge => format!(
            "At full retirement age {}: full benefit {}/month",
            fra, benefit
        ),
        ClaimTiming::DelayedIncreased => format!(
            "Past full retirement age {}: delayed retirement credits increase benefits until {}; estimated {}/month",
            fra, rules.ss_max_delay_age, benefit
        ),
    };
    if spousal_eligible {
        status.push_str(&format!("; spousal benefits available ({})", marital_status.as_str()));
    }

    let result = SocialSecurityResult {
        claim_timing,
        earliest_claim_age: earliest,
        full_retirement_age: fra,
        monthly_benefit,
        annual_benefit: monthly_benefit * 12.0,
        spousal_eligible,
        years_until_eligible: earliest.saturating_sub(age),
        years_until_fra: fra.saturating_sub(age),
    };
    Ok(Calculation::new(result, status))
}

/// [`EligibilityRules`] for US members
#[derive(Debug, Clone, Copy, Default)]
pub struct UsEligibilityRules;

impl EligibilityRules for UsEligibilityRules {
    fn country(&self) -> Country {
        Country::Us
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
    ) -> Result<Vec<(ToolKind, Calculation<EligibilityOutcome>)>, RulesError> {
        ensure_country(Country::Us, profile)?;
        let calc = check_social_security(&tables.us, profile.age, profile.marital_status, profile.balance)?;
        Ok(vec![(
            ToolKind::SocialSecurity,
            Calculation::new(EligibilityOutcome::SocialSecurity(calc.outcome), calc.status),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> UsRules {
        UsRules::default()
    }

    #[test]
    fn test_not_yet_eligible() {
        let calc = check_social_security(&rules(), 58, MaritalStatus::Single, 100_000.0).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.claim_timing, ClaimTiming::NotYetEligible);
        assert_eq!(r.monthly_benefit, 0.0);
        assert_eq!(r.years_until_eligible, 4);
        assert_eq!(r.years_until_fra, 9);
        assert!(calc.status.contains("4 years to go"));
    }

    #[test]
    fn test_early_claim_reduced() {
        let calc = check_social_security(&rules(), 64, MaritalStatus::Married, 780_000.0).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.claim_timing, ClaimTiming::EarlyReduced);
        assert_eq!(r.monthly_benefit, 2_400.0);
        assert_eq!(r.annual_benefit, 28_800.0);
        assert!(r.spousal_eligible);
        assert_eq!(r.years_until_fra, 3);
        assert!(calc.status.contains("spousal benefits available"));
    }

    #[test]
    fn test_full_retirement_age() {
        let calc = check_social_security(&rules(), 67, MaritalStatus::Divorced, 0.0).unwrap();
        assert_eq!(calc.outcome.claim_timing, ClaimTiming::FullRetirementAge);
        assert_eq!(calc.outcome.monthly_benefit, 3_000.0);
        assert!(!calc.outcome.spousal_eligible);
        assert_eq!(calc.outcome.years_until_fra, 0);
    }

    #[test]
    fn test_delayed_claim_keeps_table_amount() {
        let calc = check_social_security(&rules(), 69, MaritalStatus::Widowed, 0.0).unwrap();
        assert_eq!(calc.outcome.claim_timing, ClaimTiming::DelayedIncreased);
        assert_eq!(calc.outcome.monthly_benefit, 3_000.0);
        assert!(calc.outcome.spousal_eligible);
    }
}
