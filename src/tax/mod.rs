//! Withdrawal tax calculators for each jurisdiction
//!
//! - **AU**: tax-free from preservation age, bracket rate before it
//! - **US**: 10% early withdrawal penalty below 59 plus federal income tax; Roth IRA exempt
//! - **UK**: 25% tax-free (Lump Sum Allowance cap), remainder at basic rate
//! - **IN**: EPF TDS unless exempt by service, age or amount

mod au;
mod us;
mod uk;
mod india;

pub use au::{calculate_tax as au_calculate_tax, AuTaxResult, AuTaxRules};
pub use us::{calculate_401k_tax as us_calculate_401k_tax, UsTaxResult, UsTaxRules};
pub use uk::{calculate_pension_tax as uk_calculate_pension_tax, UkTaxResult, UkTaxRules};
pub use india::{calculate_epf_tax as in_calculate_epf_tax, EpfExemption, EpfTaxResult, InTaxRules};

use serde::{Deserialize, Serialize};

use crate::error::RulesError;
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::Calculation;
use crate::rules::RuleTables;

/// Tax outcome of any jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "jurisdiction")]
pub enum TaxOutcome {
    #[serde(rename = "AU")]
    Au(AuTaxResult),
    #[serde(rename = "US")]
    Us(UsTaxResult),
    #[serde(rename = "UK")]
    Uk(UkTaxResult),
    #[serde(rename = "IN")]
    In(EpfTaxResult),
}

impl TaxOutcome {
    /// Total tax (including penalties) withheld from the withdrawal
    pub fn total_tax(&self) -> f64 {
        match self {
            TaxOutcome::Au(r) => r.tax_amount,
            TaxOutcome::Us(r) => r.total_tax,
            TaxOutcome::Uk(r) => r.tax,
            TaxOutcome::In(r) => r.tax_amount,
        }
    }

    pub fn net_withdrawal(&self) -> f64 {
        match self {
            TaxOutcome::Au(r) => r.net_withdrawal,
            TaxOutcome::Us(r) => r.net_withdrawal,
            TaxOutcome::Uk(r) => r.net_withdrawal,
            TaxOutcome::In(r) => r.net_withdrawal,
        }
    }
}

/// Withdrawal tax rules for one jurisdiction
pub trait TaxRules: Send + Sync {
    /// Jurisdiction these rules apply to
    fn country(&self) -> Country;

    /// Tax on `request` for a member of this jurisdiction
    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Calculation<TaxOutcome>, RulesError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{AccountType, WithdrawalType};

    #[test]
    fn test_outcome_accessors() {
        let tables = RuleTables::default_2024();

        let us = MemberFinancialProfile::new("US-1", 52, Country::Us, 400_000.0);
        let request = WithdrawalRequest::lump_sum(50_000.0).with_account(AccountType::Traditional401k);
        let calc = UsTaxRules.assess(&tables, &us, &request).unwrap();
        assert!((calc.outcome.total_tax() - 16_000.0).abs() < 1e-6);
        assert!((calc.outcome.net_withdrawal() - 34_000.0).abs() < 1e-6);

        let uk = MemberFinancialProfile::new("UK-1", 60, Country::Uk, 100_000.0);
        let request = WithdrawalRequest::lump_sum(10_000.0).with_type(WithdrawalType::Annuity);
        let calc = UkTaxRules.assess(&tables, &uk, &request).unwrap();
        assert!((calc.outcome.total_tax() - 2_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_outcome_serializes_with_jurisdiction_tag() {
        let tables = RuleTables::default_2024();
        let au = MemberFinancialProfile::new("AU-1", 66, Country::Au, 215_000.0);
        let calc = AuTaxRules
            .assess(&tables, &au, &WithdrawalRequest::lump_sum(100_000.0))
            .unwrap();

        let json = serde_json::to_value(&calc.outcome).unwrap();
        assert_eq!(json["jurisdiction"], "AU");
        assert_eq!(json["net_withdrawal"], 100_000.0);
    }
}
