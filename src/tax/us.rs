//! US 401(k)/IRA withdrawal tax and early withdrawal penalty

use serde::{Deserialize, Serialize};

use super::{TaxOutcome, TaxRules};
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{AccountType, Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{pct, Calculation};
use crate::rules::{RuleTables, UsRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsTaxResult {
    pub account_type: AccountType,
    pub early_withdrawal_penalty: f64,
    pub penalty_rate: f64,
    pub income_tax: f64,
    pub income_tax_rate: f64,
    pub total_tax: f64,
    pub net_withdrawal: f64,
}

/// Penalty and federal income tax on a retirement account withdrawal
///
/// Roth IRA withdrawals are always penalty- and tax-free. Everything else
/// pays the bracket rate on the whole amount, plus the penalty when the
/// member is younger than the early withdrawal age (59, whole years).
pub fn calculate_401k_tax(
    rules: &UsRules,
    account_type: AccountType,
    amount: f64,
    age: u32,
) -> Result<Calculation<UsTaxResult>, RulesError> {
    let amount = check_amount("amount", amount)?;
    check_age("age", age)?;

    if account_type.is_roth() {
        let result = UsTaxResult {
            account_type,
            early_withdrawal_penalty: 0.0,
            penalty_rate: 0.0,
            income_tax: 0.0,
            income_tax_rate: 0.0,
            total_tax: 0.0,
            net_withdrawal: amount,
        };
        return Ok(Calculation::new(
            result,
            format!("{} withdrawal: no penalty and no income tax", account_type.as_str()),
        ));
    }

    let early = age < rules.early_withdrawal_age;
    let penalty_rate = if early { rules.early_withdrawal_penalty } else { 0.0 };
    let early_withdrawal_penalty = amount * penalty_rate;

    let income_tax_rate = rules.tax_brackets.rate_for(amount);
    let income_tax = amount * income_tax_rate;
    let total_tax = early_withdrawal_penalty + income_tax;

    let status = if early {
        format!(
            "Early withdrawal (age {} < {}): {} penalty plus {} income tax",
            age,
            rules.early_withdrawal_age,
            pct(penalty_rate),
            pct(income_tax_rate)
        )
    } else {
        format!(
            "Penalty-free withdrawal (age {} >= {}): {} income tax",
            age,
            rules.early_withdrawal_age,
            pct(income_tax_rate)
        )
    };

    let result = UsTaxResult {
        account_type,
        early_withdrawal_penalty,
        penalty_rate,
        income_tax,
        income_tax_rate,
        total_tax,
        net_withdrawal: amount - total_tax,
    };
    Ok(Calculation::new(result, status))
}

/// [`TaxRules`] for US members
#[derive(Debug, Clone, Copy, Default)]
pub struct UsTaxRules;

impl TaxRules for UsTaxRules {
    fn country(&self) -> Country {
        Country::Us
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Calculation<TaxOutcome>, RulesError> {
        ensure_country(Country::Us, profile)?;
        check_amount("balance", profile.balance)?;
        let calc = calculate_401k_tax(&tables.us, request.account_type, request.amount, profile.age)?;
        Ok(Calculation::new(TaxOutcome::Us(calc.outcome), calc.status))
    }
}
