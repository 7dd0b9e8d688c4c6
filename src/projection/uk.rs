//! UK defined contribution pot projection under drawdown

use serde::{Deserialize, Serialize};

use super::{growth_factor, ProjectionOutcome, ProjectionRules};
use crate::error::{check_age, check_amount, check_years, ensure_country, RulesError};
use crate::member::{Country, MemberFinancialProfile, WithdrawalRequest, WithdrawalType};
use crate::result::{money, pct, Calculation};
use crate::rules::{RuleTables, UkRules};

/// Pension access phase, selected by age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UkAccessPhase {
    /// Below minimum pension age: growth only
    PreAccess,
    EarlyDrawdown,
    MidDrawdown,
    LateDrawdown,
}

impl UkAccessPhase {
    pub fn for_age(age: u32, rules: &UkRules) -> Self {
        if age < rules.minimum_pension_age {
            UkAccessPhase::PreAccess
        } else if age < 65 {
            UkAccessPhase::EarlyDrawdown
        } else if age < 75 {
            UkAccessPhase::MidDrawdown
        } else {
            UkAccessPhase::LateDrawdown
        }
    }

    pub fn return_rate(&self, rules: &UkRules) -> f64 {
        match self {
            UkAccessPhase::PreAccess => rules.pre_access_return,
            UkAccessPhase::EarlyDrawdown => rules.early_drawdown_return,
            UkAccessPhase::MidDrawdown => rules.mid_drawdown_return,
            UkAccessPhase::LateDrawdown => rules.late_drawdown_return,
        }
    }

    pub fn allows_drawdown(&self) -> bool {
        !matches!(self, UkAccessPhase::PreAccess)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkProjectionResult {
    pub phase: UkAccessPhase,
    pub return_rate: f64,
    /// Drawdown actually applied (zero before access)
    pub annual_drawdown: f64,
    pub years_projected: u32,
    pub final_pot: f64,
    pub depleted: bool,
    /// `None` when first-year growth covers the drawdown
    pub years_until_depletion: Option<f64>,
}

/// Project a pension pot with a flat annual drawdown
pub fn project_pension_pot(
    rules: &UkRules,
    age: u32,
    pot: f64,
    years: u32,
    annual_drawdown: f64,
) -> Result<Calculation<UkProjectionResult>, RulesError> {
    check_age("age", age)?;
    let pot = check_amount("pot", pot)?;
    let years = check_years("years", years)?;
    let requested_drawdown = check_amount("annual_drawdown", annual_drawdown)?;

    let phase = UkAccessPhase::for_age(age, rules);
    let return_rate = phase.return_rate(rules);
    let annual_drawdown = if phase.allows_drawdown() { requested_drawdown } else { 0.0 };

    let raw = pot * growth_factor(return_rate, years) - annual_drawdown * years as f64;
    log::trace!("UK projection: phase={:?} drawdown={} raw={}", phase, annual_drawdown, raw);
    let growth = pot * return_rate;
    let years_until_depletion = if annual_drawdown > growth {
        Some(pot / (annual_drawdown - growth))
    } else {
        None
    };
    let depleted = raw <= 0.0;
    let final_pot = raw.max(0.0);

    let mut status = if phase.allows_drawdown() {
        format!(
            "{} drawdown from {}: {} pot projected to {} over {} years at {}",
            money(Country::Uk, annual_drawdown),
            match phase {
                UkAccessPhase::EarlyDrawdown => "early access",
                UkAccessPhase::MidDrawdown => "mid retirement",
                _ => "late retirement",
            },
            money(Country::Uk, pot),
            money(Country::Uk, final_pot),
            years,
            pct(return_rate)
        )
    } else {
        format!(
            "Pre-access growth until age {}: {} projected to {} over {} years at {}",
            rules.minimum_pension_age,
            money(Country::Uk, pot),
            money(Country::Uk, final_pot),
            years,
            pct(return_rate)
        )
    };
    if !phase.allows_drawdown() && requested_drawdown > 0.0 {
        status.push_str("; drawdown not applied before minimum pension age");
    }
    match years_until_depletion {
        Some(remaining) => status.push_str(&format!("; pot lasts about {:.1} years", remaining)),
        None if phase.allows_drawdown() => status.push_str("; growth covers the drawdown"),
        None => {}
    }

    let result = UkProjectionResult {
        phase,
        return_rate,
        annual_drawdown,
        years_projected: years,
        final_pot,
        depleted,
        years_until_depletion,
    };
    Ok(Calculation::new(result, status))
}

/// [`ProjectionRules`] for UK members
///
/// A `Drawdown` request supplies the annual drawdown; other request types
/// project growth only.
#[derive(Debug, Clone, Copy, Default)]
pub struct UkProjectionRules;

impl ProjectionRules for UkProjectionRules {
    fn country(&self) -> Country {
        Country::Uk
    }

    fn project(
        &self,
        tables: &RuleTables,
        profile: &MemberFinancialProfile,
        request: &WithdrawalRequest,
        years: u32,
    ) -> Result<Calculation<ProjectionOutcome>, RulesError> {
        ensure_country(Country::Uk, profile)?;
        let drawdown = match request.withdrawal_type {
            WithdrawalType::Drawdown => request.amount,
            _ => 0.0,
        };
        let calc = project_pension_pot(&tables.uk, profile.age, profile.balance, years, drawdown)?;
        Ok(Calculation::new(ProjectionOutcome::Uk(calc.outcome), calc.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rules() -> UkRules {
        UkRules::default()
    }

    #[test]
    fn test_access_phases() {
        let rules = rules();
        assert_eq!(UkAccessPhase::for_age(54, &rules), UkAccessPhase::PreAccess);
        assert_eq!(UkAccessPhase::for_age(55, &rules), UkAccessPhase::EarlyDrawdown);
        assert_eq!(UkAccessPhase::for_age(65, &rules), UkAccessPhase::MidDrawdown);
        assert_eq!(UkAccessPhase::for_age(75, &rules), UkAccessPhase::LateDrawdown);
        assert_eq!(UkAccessPhase::LateDrawdown.return_rate(&rules), 0.035);
    }

    #[test]
    fn test_pre_access_growth_only() {
        let calc = project_pension_pot(&rules(), 45, 100_000.0, 10, 5_000.0).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.phase, UkAccessPhase::PreAccess);
        assert_eq!(r.annual_drawdown, 0.0);
        assert_relative_eq!(r.final_pot, 100_000.0 * 1.05f64.powi(10), epsilon = 1e-6);
        assert_eq!(r.years_until_depletion, None);
        assert!(calc.status.contains("drawdown not applied"));
    }

    #[test]
    fn test_depletion_estimate() {
        // Growth 9,000 against a 24,000 drawdown: 200,000 / 15,000
        let calc = project_pension_pot(&rules(), 60, 200_000.0, 10, 24_000.0).unwrap();
        let r = &calc.outcome;
        assert_eq!(r.phase, UkAccessPhase::EarlyDrawdown);
        assert_relative_eq!(r.years_until_depletion.unwrap(), 200_000.0 / 15_000.0, epsilon = 1e-9);
        let expected = 200_000.0 * 1.045f64.powi(10) - 240_000.0;
        assert_relative_eq!(r.final_pot, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_sustainable_drawdown() {
        let calc = project_pension_pot(&rules(), 68, 500_000.0, 20, 15_000.0).unwrap();
        assert_eq!(calc.outcome.years_until_depletion, None);
        assert!(!calc.outcome.depleted);
        assert!(calc.status.contains("growth covers the drawdown"));
    }

    #[test]
    fn test_heavy_drawdown_depletes() {
        let calc = project_pension_pot(&rules(), 80, 50_000.0, 10, 20_000.0).unwrap();
        assert!(calc.outcome.depleted);
        assert_eq!(calc.outcome.final_pot, 0.0);
    }
}
