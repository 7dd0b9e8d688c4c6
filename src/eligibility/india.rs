//! Indian EPS pension and NPS exit (annuity / lump sum) evaluation

use serde::{Deserialize, Serialize};

use super::{EligibilityOutcome, EligibilityRules};
use crate::citation::ToolKind;
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{InRules, RuleTables};

/// EPS pension state for the member's age and service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpsEligibility {
    InsufficientService,
    BelowEarlyPensionAge,
    EarlyReducedPension,
    FullPension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpsResult {
    pub service_years: u32,
    /// Monthly salary backed out of the EPF balance
    pub pensionable_salary: f64,
    /// `salary * service / 70`, within the scheme's floor and ceiling
    pub formula_pension: f64,
    /// Share of the formula pension lost to early commencement
    pub reduction_fraction: f64,
    pub monthly_pension: f64,
    pub eligibility: EpsEligibility,
}

/// EPS monthly pension from an EPF balance and years of service
pub fn calculate_eps_benefits(
    rules: &InRules,
    age: u32,
    balance: f64,
    service_years: u32,
) -> Result<Calculation<EpsResult>, RulesError> {
    check_age("age", age)?;
    let balance = check_amount("balance", balance)?;
    if service_years > age {
        return Err(RulesError::invalid(
            "service_years",
            format!("{} years of service exceeds age {}", service_years, age),
        ));
    }

    let pensionable_salary = if service_years == 0 {
        0.0
    } else {
        balance / (service_years as f64 * rules.combined_contribution_rate)
    };
    let formula_pension = (pensionable_salary * service_years as f64 / rules.eps_divisor)
        .max(rules.eps_min_monthly_pension)
        .min(rules.eps_max_monthly_pension);

    let eligibility = if service_years < rules.eps_min_service_years {
        EpsEligibility::InsufficientService
    } else if age >= rules.retirement_age {
        EpsEligibility::FullPension
    } else if age >= rules.eps_early_pension_age {
        EpsEligibility::EarlyReducedPension
    } else {
        EpsEligibility::BelowEarlyPensionAge
    };

    let (reduction_fraction, monthly_pension) = match eligibility {
        EpsEligibility::FullPension => (0.0, formula_pension),
        EpsEligibility::EarlyReducedPension => {
            let reduction = rules.eps_early_reduction_per_year * (rules.retirement_age - age) as f64;
            (reduction, formula_pension * (1.0 - reduction))
        }
        EpsEligibility::InsufficientService | EpsEligibility::BelowEarlyPensionAge => (0.0, 0.0),
    };

    let status = match eligibility {
        EpsEligibility::InsufficientService => format!(
            "Not eligible: {} years of service (minimum {})",
            service_years, rules.eps_min_service_years
        ),
        EpsEligibility::BelowEarlyPensionAge => format!(
            "Not yet eligible: age {} is below early pension age {}",
            age, rules.eps_early_pension_age
        ),
        EpsEligibility::EarlyReducedPension => format!(
            "Early pension {}/month: reduced {} for starting {} years before {}",
            money(Country::In, monthly_pension),
            pct(reduction_fraction),
            rules.retirement_age - age,
            rules.retirement_age
        ),
        EpsEligibility::FullPension => format!(
            "Full pension {}/month after {} years of service",
            money(Country::In, monthly_pension),
            service_years
        ),
    };

    let result = EpsResult {
        service_years,
        pensionable_salary,
        formula_pension,
        reduction_fraction,
        monthly_pension,
        eligibility,
    };
    Ok(Calculation::new(result, status))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpsResult {
    pub corpus: f64,
    pub min_annuity: f64,
    pub max_lump_sum: f64,
    /// Pension from annuitising the minimum share
    pub monthly_pension: f64,
    pub eligible: bool,
    pub years_until_exit: u32,
}

/// NPS exit split at the minimum annuity share
pub fn calculate_nps(rules: &InRules, age: u32, balance: f64) -> Result<Calculation<NpsResult>, RulesError> {
    check_age("age", age)?;
    let corpus = check_amount("balance", balance)?;

    let min_annuity = corpus * rules.nps_min_annuity_fraction;
    let max_lump_sum = corpus * rules.nps_max_lump_sum_fraction;
    let monthly_pension = min_annuity * rules.nps_annuity_return / 12.0;
    let eligible = age >= rules.nps_exit_age;
    let years_until_exit = rules.nps_exit_age.saturating_sub(age);

    let status = if eligible {
        format!(
            "Eligible to exit: annuitise at least {} ({}), take up to {} tax-free",
            money(Country::In, min_annuity),
            pct(rules.nps_min_annuity_fraction),
            money(Country::In, max_lump_sum)
        )
    } else {
        format!(
            "Not yet eligible: exit age {} ({} years to go)",
            rules.nps_exit_age, years_until_exit
        )
    };

    let result = NpsResult {
        corpus,
        min_annuity,
        max_lump_sum,
        monthly_pension,
        eligible,
        years_until_exit,
    };
    Ok(Calculation::new(result, status))
}

/// Status for a split below the minimum annuity share
pub const INVALID_NPS_SPLIT: &str = "Invalid: must purchase minimum 40% annuity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpsWithdrawalResult {
    pub corpus: f64,
    /// Percentage of corpus, 0 to 100
    pub annuity_purchase_pct: f64,
    pub annuity_amount: f64,
    pub lump_sum_withdrawal: f64,
    pub tax_free_lump_sum: f64,
    /// Lump sum beyond the tax-free share of corpus
    pub taxable_lump_sum: f64,
    pub monthly_pension: f64,
    pub valid_split: bool,
    pub eligible: bool,
}

/// NPS exit with a chosen annuity purchase percentage
pub fn calculate_nps_withdrawal(
    rules: &InRules,
    age: u32,
    corpus: f64,
    annuity_purchase_pct: f64,
) -> Result<Calculation<NpsWithdrawalResult>, RulesError> {
    check_age("age", age)?;
    let corpus = check_amount("corpus", corpus)?;
    if !annuity_purchase_pct.is_finite() || !(0.0..=100.0).contains(&annuity_purchase_pct) {
        return Err(RulesError::invalid(
            "annuity_purchase_pct",
            format!("{} is not a percentage between 0 and 100", annuity_purchase_pct),
        ));
    }

    let annuity_amount = corpus * annuity_purchase_pct / 100.0;
    let lump_sum_withdrawal = corpus - annuity_amount;
    let tax_free_lump_sum = lump_sum_withdrawal.min(corpus * rules.nps_max_lump_sum_fraction);
    let taxable_lump_sum = lump_sum_withdrawal - tax_free_lump_sum;
    let monthly_pension = annuity_amount * rules.nps_annuity_return / 12.0;
    let valid_split = annuity_purchase_pct / 100.0 >= rules.nps_min_annuity_fraction;
    let eligible = age >= rules.nps_exit_age;

    let status = if !valid_split {
        INVALID_NPS_SPLIT.to_string()
    } else if !eligible {
        format!(
            "Valid split, but exit is only available from age {} ({} years to go)",
            rules.nps_exit_age,
            rules.nps_exit_age - age
        )
    } else {
        format!(
            "Annuity {} ({}% of corpus) paying {}/month; lump sum {} tax-free",
            money(Country::In, annuity_amount),
            annuity_purchase_pct,
            money(Country::In, monthly_pension),
            money(Country::In, tax_free_lump_sum)
        )
    };

    let result = NpsWithdrawalResult {
        corpus,
        annuity_purchase_pct,
        annuity_amount,
        lump_sum_withdrawal,
        tax_free_lump_sum,
        taxable_lump_sum,
        monthly_pension,
        valid_split,
        eligible,
    };
    Ok(Calculation::new(result, status))
}

/// [`EligibilityRules`] for Indian members: EPS pension and NPS exit
#[derive(Debug, Clone, Copy, Default)]
pub struct InEligibilityRules;

impl EligibilityRules for InEligibilityRules {
    fn country(&self) -> Country {
        Country::In
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
    ) -> Result<Vec<(ToolKind, Calculation<EligibilityOutcome>)>, RulesError> {
        ensure_country(Country::In, profile)?;
        let rules = &tables.india;
        let service = profile
            .years_of_service
            .unwrap_or_else(|| rules.estimated_service_years(profile.age));

        let eps = calculate_eps_benefits(rules, profile.age, profile.balance, service)?;
        let nps = calculate_nps(rules, profile.age, profile.balance)?;
        Ok(vec![
            (
                ToolKind::EpsPension,
                Calculation::new(EligibilityOutcome::Eps(eps.outcome), eps.status),
            ),
            (
                ToolKind::NpsAnnuity,
                Calculation::new(EligibilityOutcome::Nps(nps.outcome), nps.status),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rules() -> InRules {
        InRules::default()
    }

    #[test]
    fn test_eps_full_pension() {
        // 1,008,000 / (20 * 0.24) = 210,000; 210,000 * 20 / 70 = 60,000 -> ceiling
        let calc = calculate_eps_benefits(&rules(), 58, 1_008_000.0, 20).unwrap();
        let r = &calc.outcome;
        assert_relative_eq!(r.pensionable_salary, 210_000.0, epsilon = 1e-6);
        assert_eq!(r.formula_pension, 7_500.0);
        assert_eq!(r.monthly_pension, 7_500.0);
        assert_eq!(r.eligibility, EpsEligibility::FullPension);
    }

    #[test]
    fn test_eps_floor() {
        let calc = calculate_eps_benefits(&rules(), 60, 10_000.0, 12).unwrap();
        assert_eq!(calc.outcome.formula_pension, 1_000.0);
        assert_eq!(calc.outcome.monthly_pension, 1_000.0);
    }

    #[test]
    fn test_eps_early_reduced() {
        // Formula: 84,000 / (0.24 * 70) = 5,000/month, reduced 4% x 3 years
        let calc = calculate_eps_benefits(&rules(), 55, 84_000.0, 15).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.eligibility, EpsEligibility::EarlyReducedPension);
        assert_relative_eq!(r.formula_pension, 5_000.0, epsilon = 1e-9);
        assert_relative_eq!(r.reduction_fraction, 0.12, epsilon = 1e-12);
        assert_relative_eq!(r.monthly_pension, 4_400.0, epsilon = 1e-9);
        assert!(calc.status.starts_with("Early pension"));
    }

    #[test]
    fn test_eps_insufficient_service() {
        let calc = calculate_eps_benefits(&rules(), 60, 500_000.0, 9).unwrap();
        assert_eq!(calc.outcome.eligibility, EpsEligibility::InsufficientService);
        assert_eq!(calc.outcome.monthly_pension, 0.0);
    }

    #[test]
    fn test_eps_below_early_age_and_zero_service() {
        let calc = calculate_eps_benefits(&rules(), 45, 500_000.0, 20).unwrap();
        assert_eq!(calc.outcome.eligibility, EpsEligibility::BelowEarlyPensionAge);
        assert_eq!(calc.outcome.monthly_pension, 0.0);

        let calc = calculate_eps_benefits(&rules(), 24, 0.0, 0).unwrap();
        assert_eq!(calc.outcome.pensionable_salary, 0.0);
    }

    #[test]
    fn test_nps_split() {
        let calc = calculate_nps(&rules(), 61, 2_000_000.0).unwrap();
        let r = &calc.outcome;
        assert!(r.eligible);
        assert_relative_eq!(r.min_annuity, 800_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.max_lump_sum, 1_200_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.monthly_pension, 4_000.0, epsilon = 1e-6);
        assert_eq!(r.years_until_exit, 0);
    }

    #[test]
    fn test_nps_not_yet_eligible() {
        let calc = calculate_nps(&rules(), 45, 900_000.0).unwrap();
        assert!(!calc.outcome.eligible);
        assert_eq!(calc.outcome.years_until_exit, 15);
    }

    #[test]
    fn test_nps_withdrawal_sixty_percent_annuity() {
        let calc = calculate_nps_withdrawal(&rules(), 60, 1_000_000.0, 60.0).unwrap();
        let r = &calc.outcome;
        assert_relative_eq!(r.annuity_amount, 600_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.lump_sum_withdrawal, 400_000.0, epsilon = 1e-6);
        assert_relative_eq!(r.tax_free_lump_sum, 400_000.0, epsilon = 1e-6);
        assert_eq!(r.taxable_lump_sum, 0.0);
        assert!(r.valid_split);
    }

    #[test]
    fn test_nps_withdrawal_below_minimum_annuity() {
        let calc = calculate_nps_withdrawal(&rules(), 62, 1_000_000.0, 30.0).unwrap();
        assert_eq!(calc.status, INVALID_NPS_SPLIT);
        assert!(!calc.outcome.valid_split);
        assert_relative_eq!(calc.outcome.taxable_lump_sum, 100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_nps_withdrawal_rejects_bad_percentage() {
        assert!(calculate_nps_withdrawal(&rules(), 62, 1_000_000.0, 120.0).is_err());
        assert!(calculate_nps_withdrawal(&rules(), 62, 1_000_000.0, f64::NAN).is_err());
    }
}
