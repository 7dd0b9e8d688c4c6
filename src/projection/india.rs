//! Indian retirement corpus projection across EPF and NPS

use serde::{Deserialize, Serialize};

use super::{future_value, ProjectionOutcome, ProjectionRules};
use crate::error::{check_age, check_amount, check_years, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{InRules, RuleTables};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InProjectionResult {
    pub epf_balance: f64,
    pub nps_balance: f64,
    pub epf_projected: f64,
    pub nps_projected: f64,
    pub total_corpus: f64,
    pub years_projected: u32,
}

/// Project a single corpus figure split between EPF and NPS
pub fn project_corpus(
    rules: &InRules,
    age: u32,
    balance: f64,
    years: u32,
) -> Result<Calculation<InProjectionResult>, RulesError> {
    check_age("age", age)?;
    let balance = check_amount("balance", balance)?;
    let years = check_years("years", years)?;

    let epf_balance = balance * rules.epf_share;
    let nps_balance = balance - epf_balance;
    let epf_projected = future_value(epf_balance, 0.0, rules.epf_return, years);
    let nps_projected = future_value(nps_balance, 0.0, rules.nps_return, years);
    let total_corpus = epf_projected + nps_projected;

    let status = format!(
        "{} projected to {} over {} years (EPF {} at {}, NPS {} at {})",
        money(Country::In, balance),
        money(Country::In, total_corpus),
        years,
        money(Country::In, epf_projected),
        pct(rules.epf_return),
        money(Country::In, nps_projected),
        pct(rules.nps_return)
    );

    let result = InProjectionResult {
        epf_balance,
        nps_balance,
        epf_projected,
        nps_projected,
        total_corpus,
        years_projected: years,
    };
    Ok(Calculation::new(result, status))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InRetirementCorpusResult {
    pub retirement_age: u32,
    /// Zero once retirement age has been reached; the corpus is then frozen
    pub years_to_retirement: u32,
    pub epf_corpus: f64,
    pub nps_corpus: f64,
    pub total_corpus: f64,
    pub total_contributions: f64,
}

/// Project EPF and NPS balances with monthly contributions to retirement age
pub fn project_retirement_corpus(
    rules: &InRules,
    age: u32,
    epf_balance: f64,
    nps_balance: f64,
    epf_monthly: f64,
    nps_monthly: f64,
    retirement_age: u32,
) -> Result<Calculation<InRetirementCorpusResult>, RulesError> {
    check_age("age", age)?;
    let retirement_age = check_age("retirement_age", retirement_age)?;
    let epf_balance = check_amount("epf_balance", epf_balance)?;
    let nps_balance = check_amount("nps_balance", nps_balance)?;
    let epf_annual = check_amount("epf_monthly", epf_monthly)? * 12.0;
    let nps_annual = check_amount("nps_monthly", nps_monthly)? * 12.0;

    let years = retirement_age.saturating_sub(age);
    let epf_corpus = future_value(epf_balance, epf_annual, rules.epf_return, years);
    let nps_corpus = future_value(nps_balance, nps_annual, rules.nps_return, years);
    let total_corpus = epf_corpus + nps_corpus;
    let total_contributions = (epf_annual + nps_annual) * years as f64;

    let status = if years == 0 {
        format!(
            "At or past retirement age {}: corpus frozen at {}",
            retirement_age,
            money(Country::In, total_corpus)
        )
    } else {
        format!(
            "Projected corpus {} at age {} ({} years, {} contributed)",
            money(Country::In, total_corpus),
            retirement_age,
            years,
            money(Country::In, total_contributions)
        )
    };

    let result = InRetirementCorpusResult {
        retirement_age,
        years_to_retirement: years,
        epf_corpus,
        nps_corpus,
        total_corpus,
        total_contributions,
    };
    Ok(Calculation::new(result, status))
}

/// [`ProjectionRules`] for Indian members (EPF/NPS split)
#[derive(Debug, Clone, Copy, Default)]
pub struct InProjectionRules;

impl ProjectionRules for InProjectionRules {
    fn country(&self) -> Country {
        Country::In
    }

    fn project(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
        years: u32,
    ) -> Result<Calculation<ProjectionOutcome>, RulesError> {
        ensure_country(Country::In, profile)?;
        let calc = project_corpus(&tables.india, profile.age, profile.balance, years)?;
        Ok(Calculation::new(ProjectionOutcome::In(calc.outcome), calc.status))
    }
}
