//! Indian EPF, EPS and NPS rule constants

use super::brackets::BracketTable;

#[derive(Debug, Clone, PartialEq)]
pub struct InRules {
    /// Assumed career start, used to estimate years of service
    pub career_start_age: u32,
    /// Continuous service after which EPF withdrawals are tax-free
    pub epf_exempt_service_years: u32,
    /// Retirement age; EPF withdrawals from here are tax-free
    pub retirement_age: u32,
    /// Withdrawals at or below this amount attract no TDS
    pub tds_threshold: f64,
    /// TDS on taxable EPF withdrawals
    pub tds_brackets: BracketTable,

    /// Employer + employee contribution rate used to back out salary
    pub combined_contribution_rate: f64,
    /// EPS pension formula divisor
    pub eps_divisor: f64,
    pub eps_min_monthly_pension: f64,
    pub eps_max_monthly_pension: f64,
    pub eps_min_service_years: u32,
    /// Earliest age for a reduced EPS pension
    pub eps_early_pension_age: u32,
    /// Reduction per year the pension starts before `retirement_age`
    pub eps_early_reduction_per_year: f64,

    pub nps_min_annuity_fraction: f64,
    /// Tax-free lump sum cap as a share of corpus
    pub nps_max_lump_sum_fraction: f64,
    pub nps_exit_age: u32,
    pub nps_annuity_return: f64,

    pub epf_return: f64,
    pub nps_return: f64,
    /// EPF share when a single corpus figure is split between schemes
    pub epf_share: f64,
}

impl Default for InRules {
    fn default() -> Self {
        Self {
            career_start_age: 25,
            epf_exempt_service_years: 5,
            retirement_age: 58,
            tds_threshold: 50_000.0,
            tds_brackets: BracketTable::flat(0.10),
            combined_contribution_rate: 0.24,
            eps_divisor: 70.0,
            eps_min_monthly_pension: 1_000.0,
            eps_max_monthly_pension: 7_500.0,
            eps_min_service_years: 10,
            eps_early_pension_age: 50,
            eps_early_reduction_per_year: 0.04,
            nps_min_annuity_fraction: 0.40,
            nps_max_lump_sum_fraction: 0.60,
            nps_exit_age: 60,
            nps_annuity_return: 0.06,
            epf_return: 0.0825,
            nps_return: 0.10,
            epf_share: 0.5,
        }
    }
}

impl InRules {
    /// Estimated years of service, assuming work began at `career_start_age`
    pub fn estimated_service_years(&self, age: u32) -> u32 {
        age.saturating_sub(self.career_start_age)
    }
}
