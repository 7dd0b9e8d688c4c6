//! Australian Age Pension eligibility with the assets test taper

use serde::{Deserialize, Serialize};

use super::{EligibilityOutcome, EligibilityRules};
use crate::citation::ToolKind;
use crate::error::{check_age, check_amount, ensure_country, RulesError};
use crate::member::{Country, MaritalStatus, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, Calculation};
use crate::rules::{AuRules, RuleTables};

/// Where the member sits on the assets test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePensionStatus {
    BelowPensionAge,
    FullPension,
    PartPension,
    AssetsAboveCutOff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgePensionResult {
    pub age_pension_age: u32,
    pub couple: bool,
    /// Super balance left after the proposed withdrawal (never below zero)
    pub after_withdrawal_balance: f64,
    pub assessable_assets: f64,
    pub lower_threshold: f64,
    pub upper_threshold: f64,
    pub eligible: bool,
    pub pension_status: AgePensionStatus,
    pub full_annual_pension: f64,
    pub annual_pension: f64,
    /// Remaining balance drawn at the flat 4% assumption
    pub annual_super_income: f64,
    pub combined_annual_income: f64,
}

/// Age Pension entitlement after a proposed super withdrawal
pub fn check_pension_impact(
    rules: &AuRules,
    age: u32,
    marital_status: MaritalStatus,
    balance: f64,
    other_assets: f64,
    withdrawal: f64,
) -> Result<Calculation<AgePensionResult>, RulesError> {
    check_age("age", age)?;
    let balance = check_amount("balance", balance)?;
    let other_assets = check_amount("other_assets", other_assets)?;
    let withdrawal = check_amount("withdrawal", withdrawal)?;

    let couple = marital_status.is_couple();
    let thresholds = rules.asset_thresholds(couple);
    let household = if couple { "couple" } else { "single" };

    let after_withdrawal_balance = (balance - withdrawal).max(0.0);
    let assessable_assets = after_withdrawal_balance + other_assets;
    let annual_super_income = after_withdrawal_balance * rules.super_income_rate;

    let (pension_status, annual_pension) = if age < rules.age_pension_age {
        (AgePensionStatus::BelowPensionAge, 0.0)
    } else if assessable_assets <= thresholds.lower {
        (AgePensionStatus::FullPension, thresholds.full_pension)
    } else if assessable_assets >= thresholds.upper {
        (AgePensionStatus::AssetsAboveCutOff, 0.0)
    } else {
        (AgePensionStatus::PartPension, thresholds.tapered_pension(assessable_assets))
    };

    let assets = money(Country::Au, assessable_assets);
    let status = match pension_status {
        AgePensionStatus::BelowPensionAge => format!(
            "Not eligible: age {} is below Age Pension age {} ({} years to go)",
            age,
            rules.age_pension_age,
            rules.age_pension_age - age
        ),
        AgePensionStatus::FullPension => format!(
            "Full Age Pension {}/year: assessable assets {} at or below {} {} threshold",
            money(Country::Au, annual_pension),
            assets,
            money(Country::Au, thresholds.lower),
            household
        ),
        AgePensionStatus::PartPension => format!(
            "Part Age Pension {}/year: assessable assets {} tapered between {} and {} ({})",
            money(Country::Au, annual_pension),
            assets,
            money(Country::Au, thresholds.lower),
            money(Country::Au, thresholds.upper),
            household
        ),
        AgePensionStatus::AssetsAboveCutOff => format!(
            "No Age Pension: assessable assets {} at or above {} {} cut-off",
            assets,
            money(Country::Au, thresholds.upper),
            household
        ),
    };

    let result = AgePensionResult {
        age_pension_age: rules.age_pension_age,
        couple,
        after_withdrawal_balance,
        assessable_assets,
        lower_threshold: thresholds.lower,
        upper_threshold: thresholds.upper,
        eligible: annual_pension > 0.0,
        pension_status,
        full_annual_pension: thresholds.full_pension,
        annual_pension,
        annual_super_income,
        combined_annual_income: annual_pension + annual_super_income,
    };
    Ok(Calculation::new(result, status))
}

/// [`EligibilityRules`] for Australian members
#[derive(Debug, Clone, Copy, Default)]
pub struct AuEligibilityRules;

impl EligibilityRules for AuEligibilityRules {
    fn country(&self) -> Country {
        Country::Au
    }

    fn assess(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
    ) -> Result<Vec<(ToolKind, Calculation<EligibilityOutcome>)>, RulesError> {
        ensure_country(Country::Au, profile)?;
        let calc = check_pension_impact(
            &tables.au,
            profile.age,
            profile.marital_status,
            profile.balance,
            profile.other_assets,
            request.amount,
        )?;
        Ok(vec![(
            ToolKind::AgePension,
            Calculation::new(EligibilityOutcome::AgePension(calc.outcome), calc.status),
        )])
    }
}
