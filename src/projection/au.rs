//! Australian super balance projection by retirement phase

use serde::{Deserialize, Serialize};

use super::{growth_factor, ProjectionOutcome, ProjectionRules};
use crate::error::{check_age, check_amount, check_years, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest};
use crate::result::{money, pct, Calculation};
use crate::rules::{AuRules, PhaseRates, RuleTables};

/// Retirement phase, selected by age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuPhase {
    /// Below preservation age
    Accumulation,
    /// Preservation age to 69
    EarlyRetirement,
    /// 70 to 79
    MidRetirement,
    /// 80 and over
    LateRetirement,
}

impl AuPhase {
    pub fn for_age(age: u32, preservation_age: u32) -> Self {
        if age < preservation_age {
            AuPhase::Accumulation
        } else if age < 70 {
            AuPhase::EarlyRetirement
        } else if age < 80 {
            AuPhase::MidRetirement
        } else {
            AuPhase::LateRetirement
        }
    }

    pub fn rates(&self, rules: &AuRules) -> PhaseRates {
        match self {
            AuPhase::Accumulation => rules.accumulation,
            AuPhase::EarlyRetirement => rules.early_retirement,
            AuPhase::MidRetirement => rules.mid_retirement,
            AuPhase::LateRetirement => rules.late_retirement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuPhase::Accumulation => "Accumulation",
            AuPhase::EarlyRetirement => "Early retirement",
            AuPhase::MidRetirement => "Mid retirement",
            AuPhase::LateRetirement => "Late retirement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuProjectionResult {
    pub phase: AuPhase,
    pub return_rate: f64,
    pub withdrawal_rate: f64,
    /// Horizon actually projected, after the cap
    pub years_projected: u32,
    /// Never below zero
    pub final_balance: f64,
    pub depleted: bool,
    pub summary: String,
}

/// Project a super balance forward at the member's current phase rates
///
/// `final = balance * (1 + r)^years - balance * w * years`: withdrawals are a
/// flat nominal drain on the starting balance, not compounded. Horizons past
/// the rule table's maximum are capped rather than rejected.
pub fn project_balance(
    rules: &AuRules,
    age: u32,
    preservation_age: Option<u32>,
    balance: f64,
    years: u32,
) -> Result<Calculation<AuProjectionResult>, RulesError> {
    check_age("age", age)?;
    let preservation_age = check_age("preservation_age", preservation_age.unwrap_or(rules.preservation_age))?;
    let balance = check_amount("balance", balance)?;
    let years_projected = check_years("years", years)?.min(rules.max_projection_years);

    let phase = AuPhase::for_age(age, preservation_age);
    let PhaseRates {
        return_rate,
        withdrawal_rate,
    } = phase.rates(rules);

    let raw = balance * growth_factor(return_rate, years_projected)
        - balance * withdrawal_rate * years_projected as f64;
    let depleted = raw <= 0.0;
    let final_balance = raw.max(0.0);
    log::trace!("AU projection: phase={:?} raw={} years={}", phase, raw, years_projected);

    let mut summary = format!(
        "{} phase: {} projected to {} over {} years ({} return, {} withdrawal)",
        phase.as_str(),
        money(Country::Au, balance),
        money(Country::Au, final_balance),
        years_projected,
        pct(return_rate),
        pct(withdrawal_rate)
    );
    if depleted {
        summary.push_str("; balance depleted");
    }
    if years_projected < years {
        summary.push_str(&format!(" (horizon capped at {} years)", rules.max_projection_years));
    }

    let result = AuProjectionResult {
        phase,
        return_rate,
        withdrawal_rate,
        years_projected,
        final_balance,
        depleted,
        summary: summary.clone(),
    };
    Ok(Calculation::new(result, summary))
}

/// [`ProjectionRules`] for Australian members
#[derive(Debug, Clone, Copy, Default)]
pub struct AuProjectionRules;

impl ProjectionRules for AuProjectionRules {
    fn country(&self) -> Country {
        Country::Au
    }

    fn project(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        _request: &WithdrawalRequest,
        years: u32,
    ) -> Result<Calculation<ProjectionOutcome>, RulesError> {
        ensure_country(Country::Au, profile)?;
        let calc = project_balance(&tables.au, profile.age, profile.preservation_age, profile.balance, years)?;
        Ok(Calculation::new(ProjectionOutcome::Au(calc.outcome), calc.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rules() -> AuRules {
        AuRules::default()
    }

    #[test]
    fn test_phase_selection() {
        assert_eq!(AuPhase::for_age(45, 60), AuPhase::Accumulation);
        assert_eq!(AuPhase::for_age(59, 60), AuPhase::Accumulation);
        assert_eq!(AuPhase::for_age(60, 60), AuPhase::EarlyRetirement);
        assert_eq!(AuPhase::for_age(69, 60), AuPhase::EarlyRetirement);
        assert_eq!(AuPhase::for_age(70, 60), AuPhase::MidRetirement);
        assert_eq!(AuPhase::for_age(80, 60), AuPhase::LateRetirement);
        assert_eq!(AuPhase::for_age(58, 57), AuPhase::EarlyRetirement);
    }

    #[test]
    fn test_accumulation_growth() {
        let calc = project_balance(&rules(), 40, None, 100_000.0, 10).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.phase, AuPhase::Accumulation);
        assert_relative_eq!(r.final_balance, 100_000.0 * 1.07f64.powi(10), epsilon = 1e-6);
        assert!(!r.depleted);
        assert!(r.summary.starts_with("Accumulation phase"));
    }

    #[test]
    fn test_flat_withdrawal_drain() {
        let calc = project_balance(&rules(), 65, Some(60), 500_000.0, 10).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.phase, AuPhase::EarlyRetirement);
        let expected = 500_000.0 * 1.06f64.powi(10) - 500_000.0 * 0.04 * 10.0;
        assert_relative_eq!(r.final_balance, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_horizon_capped() {
        let capped = project_balance(&rules(), 30, None, 50_000.0, 45).unwrap();
        let thirty = project_balance(&rules(), 30, None, 50_000.0, 30).unwrap();
        assert_eq!(capped.outcome.years_projected, 30);
        assert_eq!(capped.outcome.final_balance, thirty.outcome.final_balance);
        assert!(capped.status.contains("horizon capped at 30 years"));
    }

    #[test]
    fn test_late_retirement_rates() {
        let calc = project_balance(&rules(), 85, None, 200_000.0, 12).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.phase, AuPhase::LateRetirement);
        assert_eq!(r.return_rate, 0.04);
        assert_eq!(r.withdrawal_rate, 0.06);
        let expected = 200_000.0 * 1.04f64.powi(12) - 200_000.0 * 0.06 * 12.0;
        assert_relative_eq!(r.final_balance, expected, epsilon = 1e-6);
        assert!(!r.depleted);
    }

    #[test]
    fn test_zero_years_keeps_balance() {
        let calc = project_balance(&rules(), 70, None, 123_456.0, 0).unwrap();
        assert_eq!(calc.outcome.final_balance, 123_456.0);
        assert!(!calc.outcome.depleted);
    }

    #[test]
    fn test_zero_balance_reports_depleted() {
        let calc = project_balance(&rules(), 70, None, 0.0, 5).unwrap();
        assert_eq!(calc.outcome.final_balance, 0.0);
        assert!(calc.outcome.depleted);
    }
}
