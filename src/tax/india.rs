//! Indian EPF withdrawal tax (TDS)

use serde::{Deserialize, Serialize};

use super::{TaxOutcome, TaxRules};
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{InRules, RuleTables};

/// Why an EPF withdrawal is exempt from tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpfExemption {
    ContinuousService,
    RetirementAge,
    BelowThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpfTaxResult {
    /// Years of service assumed from age (career start at 25)
    pub estimated_service_years: u32,
    pub tax_exempt: bool,
    pub exemption: Option<EpfExemption>,
    /// Equal to `tds`: the tax withheld is the whole liability modeled
    pub tax_amount: f64,
    pub tds: f64,
    pub tds_rate: f64,
    pub net_withdrawal: f64,
}

/// TDS on a full EPF withdrawal
///
/// Service is estimated as `age - 25`, not taken from actual tenure.
pub fn calculate_epf_tax(
    rules: &InRules,
    age: u32,
    balance: f64,
    withdrawal: f64,
) -> Result<Calculation<EpfTaxResult>, RulesError> {
    check_age("age", age)?;
    check_amount("balance", balance)?;
    let withdrawal = check_amount("withdrawal", withdrawal)?;

    let service = rules.estimated_service_years(age);
    let exemption = if service >= rules.epf_exempt_service_years {
        Some(EpfExemption::ContinuousService)
    } else if age >= rules.retirement_age {
        Some(EpfExemption::RetirementAge)
    } else if withdrawal <= rules.tds_threshold {
        Some(EpfExemption::BelowThreshold)
    } else {
        None
    };

    let (tds_rate, status) = match exemption {
        Some(EpfExemption::ContinuousService) => (
            0.0,
            format!(
                "Tax-exempt: {} estimated years of service (>= {})",
                service, rules.epf_exempt_service_years
            ),
        ),
        Some(EpfExemption::RetirementAge) => (
            0.0,
            format!("Tax-exempt: age {} >= retirement age {}", age, rules.retirement_age),
        ),
        Some(EpfExemption::BelowThreshold) => (
            0.0,
            format!(
                "Tax-exempt: withdrawal {} within {} TDS threshold",
                money(Country::In, withdrawal),
                money(Country::In, rules.tds_threshold)
            ),
        ),
        None => {
            let rate = rules.tds_brackets.rate_for(withdrawal);
            (
                rate,
                format!(
                    "TDS {} deducted: {} estimated years of service (< {}) and withdrawal above {}",
                    pct(rate),
                    service,
                    rules.epf_exempt_service_years,
                    money(Country::In, rules.tds_threshold)
                ),
            )
        }
    };

    let tds = withdrawal * tds_rate;
    let result = EpfTaxResult {
        estimated_service_years: service,
        tax_exempt: exemption.is_some(),
        exemption,
        tax_amount: tds,
        tds,
        tds_rate,
        net_withdrawal: withdrawal - tds,
    };
    Ok(Calculation::new(result, status))
}

/// [`TaxRules`] for Indian members (EPF)
#[derive(Debug, Clone, Copy, Default)]
pub struct InTaxRules;

impl TaxRules for InTaxRules {
    fn country(&self) -> Country {
        Country::In
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Calculation<TaxOutcome>, RulesError> {
        ensure_country(Country::In, profile)?;
        let calc = calculate_epf_tax(&tables.india, profile.age, profile.balance, request.amount)?;
        Ok(Calculation::new(TaxOutcome::In(calc.outcome), calc.status))
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
    fn test_exempt_after_five_years() {
        // Age 30 -> 5 estimated years
        let calc = calculate_epf_tax(&rules(), 30, 500_000.0, 400_000.0).unwrap();
        assert!(calc.outcome.tax_exempt);
        assert_eq!(calc.outcome.exemption, Some(EpfExemption::ContinuousService));
        assert_eq!(calc.outcome.tds, 0.0);
        assert_eq!(calc.outcome.net_withdrawal, 400_000.0);
    }

    #[test]
    fn test_tds_on_early_large_withdrawal() {
        // Age 28 -> 3 estimated years
        let calc = calculate_epf_tax(&rules(), 28, 180_000.0, 75_000.0).unwrap();
        let r = &calc.outcome;
        assert!(!r.tax_exempt);
        assert_eq!(r.estimated_service_years, 3);
        assert_relative_eq!(r.tds, 7_500.0, epsilon = 1e-9);
        assert_eq!(r.tax_amount, r.tds);
        assert_relative_eq!(r.net_withdrawal, 67_500.0, epsilon = 1e-9);
        assert!(calc.status.starts_with("TDS 10.0% deducted"));
    }

    #[test]
    fn test_small_withdrawal_exempt() {
        let calc = calculate_epf_tax(&rules(), 26, 60_000.0, 50_000.0).unwrap();
        assert_eq!(calc.outcome.exemption, Some(EpfExemption::BelowThreshold));

        let calc = calculate_epf_tax(&rules(), 26, 60_000.0, 50_000.01).unwrap();
        assert!(!calc.outcome.tax_exempt);
    }

    #[test]
    fn test_service_estimate_before_career_start() {
        let calc = calculate_epf_tax(&rules(), 22, 100_000.0, 90_000.0).unwrap();
        assert_eq!(calc.outcome.estimated_service_years, 0);
        assert!(!calc.outcome.tax_exempt);
    }
}
