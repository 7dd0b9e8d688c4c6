//! Australian superannuation withdrawal tax
//!
//! At or above preservation age the whole withdrawal is tax-free. Below it,
//! a single bracket rate is applied to the entire withdrawal.

use serde::{Deserialize, Serialize};

use super::{TaxOutcome, TaxRules};
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{AuRules, RuleTables};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuTaxResult {
    pub preservation_age: u32,
    pub tax_free_component: f64,
    pub taxable_component: f64,
    pub tax_amount: f64,
    pub tax_rate: f64,
    pub net_withdrawal: f64,
}

/// Tax on a super withdrawal
///
/// `balance` is validated but does not affect the result; the withdrawal is
/// not checked against it.
pub fn calculate_tax(
    rules: &AuRules,
    age: u32,
    preservation_age: Option<u32>,
    balance: f64,
    withdrawal: f64,
) -> Result<Calculation<AuTaxResult>, RulesError> {
    check_age("age", age)?;
    let preservation_age = check_age("preservation_age", preservation_age.unwrap_or(rules.preservation_age))?;
    check_amount("balance", balance)?;
    let withdrawal = check_amount("withdrawal", withdrawal)?;

    if age >= preservation_age {
        let result = AuTaxResult {
            preservation_age,
            tax_free_component: withdrawal,
            taxable_component: 0.0,
            tax_amount: 0.0,
            tax_rate: 0.0,
            net_withdrawal: withdrawal,
        };
        let status = format!(
            "Tax-free withdrawal (age {} >= preservation age {})",
            age, preservation_age
        );
        return Ok(Calculation::new(result, status));
    }

    let tax_rate = rules.tax_brackets.rate_for(withdrawal);
    let tax_amount = withdrawal * tax_rate;
    log::trace!("AU tax: {} at {} = {}", withdrawal, tax_rate, tax_amount);

    let result = AuTaxResult {
        preservation_age,
        tax_free_component: 0.0,
        taxable_component: withdrawal,
        tax_amount,
        tax_rate,
        net_withdrawal: withdrawal - tax_amount,
    };
    let status = format!(
        "Taxable withdrawal (age {} < preservation age {}): {} applied to {}",
        age,
        preservation_age,
        pct(tax_rate),
        money(Country::Au, withdrawal)
    );
    Ok(Calculation::new(result, status))
}

/// [`TaxRules`] for Australian members
#[derive(Debug, Clone, Copy, Default)]
pub struct AuTaxRules;

impl TaxRules for AuTaxRules {
    fn country(&self) -> Country {
        Country::Au
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Calculation<TaxOutcome>, RulesError> {
        ensure_country(Country::Au, profile)?;
        let calc = calculate_tax(
            &tables.au,
            profile.age,
            profile.preservation_age,
            profile.balance,
            request.amount,
        )?;
        Ok(Calculation::new(TaxOutcome::Au(calc.outcome), calc.status))
    }
}
