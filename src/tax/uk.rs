//! UK pension withdrawal tax
//!
//! 25% of the pot is available tax-free, capped by the Lump Sum Allowance.
//! The taxable remainder is charged at the basic rate only.

use serde::{Deserialize, Serialize};

use super::{TaxOutcome, TaxRules};
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest, WithdrawalType};
use crate::result::{money, pct, Calculation};
use crate::rules::{RuleTables, UkRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkTaxResult {
    pub withdrawal_type: WithdrawalType,
    pub tax_free_lump_sum: f64,
    pub taxable_amount: f64,
    pub tax: f64,
    pub tax_rate: f64,
    pub net_withdrawal: f64,
}

/// Tax on a pension withdrawal
///
/// - `Lump_Sum` (and `Full`): tax-free = min(amount, 25% of pot, allowance)
/// - `Drawdown`: 25% of the withdrawal is tax-free, capped at the allowance
/// - `Annuity`: fully taxable
pub fn calculate_pension_tax(
    rules: &UkRules,
    age: u32,
    pot: f64,
    amount: f64,
    withdrawal_type: WithdrawalType,
) -> Result<Calculation<UkTaxResult>, RulesError> {
    check_age("age", age)?;
    let pot = check_amount("pot", pot)?;
    let amount = check_amount("amount", amount)?;

    let allowance = rules.lump_sum_allowance;
    let tax_free_lump_sum = match withdrawal_type {
        WithdrawalType::LumpSum | WithdrawalType::Full => {
            amount.min(pot * rules.tax_free_fraction).min(allowance)
        }
        WithdrawalType::Drawdown => (amount * rules.tax_free_fraction).min(allowance),
        WithdrawalType::Annuity => 0.0,
    };
    let taxable_amount = amount - tax_free_lump_sum;
    let tax_rate = rules.tax_brackets.rate_for(taxable_amount);
    let tax = taxable_amount * tax_rate;

    let mut status = match withdrawal_type {
        WithdrawalType::Annuity => format!(
            "Annuity income: fully taxable, {} taxed at {}",
            money(Country::Uk, taxable_amount),
            pct(tax_rate)
        ),
        _ => format!(
            "{}: {} tax-free ({} of {}, capped at Lump Sum Allowance {}), {} taxed at {}",
            withdrawal_type.as_str(),
            money(Country::Uk, tax_free_lump_sum),
            pct(rules.tax_free_fraction),
            if withdrawal_type == WithdrawalType::Drawdown { "withdrawal" } else { "pot" },
            money(Country::Uk, allowance),
            money(Country::Uk, taxable_amount),
            pct(tax_rate)
        ),
    };
    if age < rules.minimum_pension_age {
        status.push_str(&format!(
            " (note: age {} is below normal minimum pension age {})",
            age, rules.minimum_pension_age
        ));
    }

    let result = UkTaxResult {
        withdrawal_type,
        tax_free_lump_sum,
        taxable_amount,
        tax,
        tax_rate,
        net_withdrawal: amount - tax,
    };
    Ok(Calculation::new(result, status))
}

/// [`TaxRules`] for UK members
#[derive(Debug, Clone, Copy, Default)]
pub struct UkTaxRules;

impl TaxRules for UkTaxRules {
    fn country(&self) -> Country {
        Country::Uk
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Calculation<TaxOutcome>, RulesError> {
        ensure_country(Country::Uk, profile)?;
        let calc = calculate_pension_tax(
            &tables.uk,
            profile.age,
            profile.balance,
            request.amount,
            request.withdrawal_type,
        )?;
        Ok(Calculation::new(TaxOutcome::Uk(calc.outcome), calc.status))
    }
}
