//! UK pension rule constants

use super::brackets::BracketTable;

#[derive(Debug, Clone, PartialEq)]
pub struct UkRules {
    /// Share of a pot (or of each drawdown) paid tax-free
    pub tax_free_fraction: f64,
    /// Lump Sum Allowance, the lifetime cap on tax-free cash
    pub lump_sum_allowance: f64,
    /// Taxable portion is charged at the basic rate only
    pub tax_brackets: BracketTable,
    /// Normal minimum pension age
    pub minimum_pension_age: u32,

    /// Full new State Pension, per week
    pub full_weekly_state_pension: f64,
    pub full_ni_years: u32,
    pub minimum_ni_years: u32,
    /// State Pension age for members currently younger than it
    pub state_pension_age: u32,
    /// State Pension age for members already at or past `state_pension_age`
    pub later_state_pension_age: u32,
    pub weeks_per_year: f64,

    /// Growth before the pot can be accessed
    pub pre_access_return: f64,
    /// 55 to 64
    pub early_drawdown_return: f64,
    /// 65 to 74
    pub mid_drawdown_return: f64,
    /// 75 and over
    pub late_drawdown_return: f64,
}

impl Default for UkRules {
    fn default() -> Self {
        Self {
            tax_free_fraction: 0.25,
            lump_sum_allowance: 268_275.0,
            tax_brackets: BracketTable::flat(0.20),
            minimum_pension_age: 55,
            full_weekly_state_pension: 221.20,
            full_ni_years: 35,
            minimum_ni_years: 10,
            state_pension_age: 66,
            later_state_pension_age: 67,
            weeks_per_year: 52.0,
            pre_access_return: 0.05,
            early_drawdown_return: 0.045,
            mid_drawdown_return: 0.04,
            late_drawdown_return: 0.035,
        }
    }
}

impl UkRules {
    /// State Pension age under the two-tier model
    pub fn state_pension_age_for(&self, age: u32) -> u32 {
        if age < self.state_pension_age {
            self.state_pension_age
        } else {
            self.later_state_pension_age
        }
    }

    /// Weekly State Pension for a number of qualifying years
    pub fn weekly_state_pension(&self, ni_years: u32) -> f64 {
        if ni_years < self.minimum_ni_years {
            return 0.0;
        }
        let counted = ni_years.min(self.full_ni_years) as f64;
        self.full_weekly_state_pension * counted / self.full_ni_years as f64
    }
}
