//! US 401(k) balance projection

use serde::{Deserialize, Serialize};

use super::{future_value, growth_factor, ProjectionOutcome, ProjectionRules};
use crate::error::{check_age, check_amount, check_years, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{RuleTables, UsRules};

/// Contribution or withdrawal regime, chosen by age against retirement age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsRegime {
    Accumulation,
    Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsProjectionResult {
    pub regime: UsRegime,
    pub retirement_age: u32,
    pub return_rate: f64,
    /// Zero while drawing down
    pub annual_contribution: f64,
    /// Zero while accumulating
    pub withdrawal_rate: f64,
    pub years_projected: u32,
    pub final_balance: f64,
    pub depleted: bool,
    /// Age at the end of the horizon reaches the RMD age
    pub rmd_required: bool,
}

/// Project a 401(k) balance `years` ahead
///
/// Before `retirement_age` the balance grows with a level annual
/// contribution (future value of an annuity). From `retirement_age` it grows
/// at the post-60 return with a flat nominal withdrawal drain.
pub fn project_401k(
    rules: &UsRules,
    age: u32,
    balance: f64,
    years: u32,
    retirement_age: Option<u32>,
    annual_contribution: Option<f64>,
) -> Result<Calculation<UsProjectionResult>, RulesError> {
    check_age("age", age)?;
    let balance = check_amount("balance", balance)?;
    let years = check_years("years", years)?;
    let retirement_age = check_age("retirement_age", retirement_age.unwrap_or(rules.default_retirement_age))?;
    let contribution = check_amount(
        "annual_contribution",
        annual_contribution.unwrap_or(rules.annual_contribution),
    )?;

    let rmd_required = age + years >= rules.rmd_age;

    let result = if age < retirement_age {
        let return_rate = rules.accumulation_return(age);
        let final_balance = future_value(balance, contribution, return_rate, years);
        UsProjectionResult {
            regime: UsRegime::Accumulation,
            retirement_age,
            return_rate,
            annual_contribution: contribution,
            withdrawal_rate: 0.0,
            years_projected: years,
            final_balance,
            depleted: false,
            rmd_required,
        }
    } else {
        let return_rate = rules.return_60_plus;
        let withdrawal_rate = rules.distribution_withdrawal_rate(age);
        let raw = balance * growth_factor(return_rate, years) - balance * withdrawal_rate * years as f64;
        UsProjectionResult {
            regime: UsRegime::Distribution,
            retirement_age,
            return_rate,
            annual_contribution: 0.0,
            withdrawal_rate,
            years_projected: years,
            final_balance: raw.max(0.0),
            depleted: raw <= 0.0,
            rmd_required,
        }
    };

    let mut status = match result.regime {
        UsRegime::Accumulation => format!(
            "Accumulating until {}: {} grows to {} over {} years at {} with {}/year contributions",
            retirement_age,
            money(Country::Us, balance),
            money(Country::Us, result.final_balance),
            years,
            pct(result.return_rate),
            money(Country::Us, contribution)
        ),
        UsRegime::Distribution => format!(
            "Distributing: {} projected to {} over {} years at {} return, {} withdrawal",
            money(Country::Us, balance),
            money(Country::Us, result.final_balance),
            years,
            pct(result.return_rate),
            pct(result.withdrawal_rate)
        ),
    };
    if result.depleted {
        status.push_str("; balance depleted");
    }
    if rmd_required {
        status.push_str(&format!("; required minimum distributions apply from age {}", rules.rmd_age));
    }

    Ok(Calculation::new(result, status))
}

/// [`ProjectionRules`] for US members, using default retirement age and contribution
#[derive(Debug, Clone, Copy, Default)]
pub struct UsProjectionRules;

impl ProjectionRules for UsProjectionRules {
    fn country(&self) -> Country {
        Country::Us
    }

    fn project(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
        years: u32,
    ) -> Result<Calculation<ProjectionOutcome>, RulesError> {
        ensure_country(Country::Us, profile)?;
        let calc = project_401k(&tables.us, profile.age, profile.balance, years, None, None)?;
        Ok(Calculation::new(ProjectionOutcome::Us(calc.outcome), calc.status))
    }
}
