//! US 401(k)/IRA and Social Security rule constants

use super::brackets::{BracketTable, TaxBracket};

#[derive(Debug, Clone, PartialEq)]
pub struct UsRules {
    /// Withdrawals below this age attract the early withdrawal penalty.
    /// Whole years: a 59 year old is already past the threshold.
    pub early_withdrawal_age: u32,
    pub early_withdrawal_penalty: f64,

    /// 2024 federal brackets (single filer), applied to the whole withdrawal
    pub tax_brackets: BracketTable,

    /// Earliest Social Security claim age
    pub ss_earliest_claim_age: u32,
    /// Full retirement age
    pub ss_full_retirement_age: u32,
    /// Latest age delayed retirement credits accrue to
    pub ss_max_delay_age: u32,
    /// Monthly benefit by claim age, relative to a 3,000 FRA benefit
    pub ss_benefit_by_claim_age: Vec<(u32, f64)>,

    /// Default age contributions stop and withdrawals begin
    pub default_retirement_age: u32,
    /// Nominal annual contribution while accumulating
    pub annual_contribution: f64,
    /// Accumulation return below 50
    pub return_under_50: f64,
    /// Accumulation return 50 to 59
    pub return_50_to_59: f64,
    /// Accumulation return 60 and over, also used while drawing down
    pub return_60_plus: f64,

    pub withdrawal_rate: f64,
    /// Ages 73-74, per the 2023 Uniform Lifetime Table divisor
    pub rmd_first_years_withdrawal_rate: f64,
    /// 80 and over
    pub withdrawal_rate_80_plus: f64,

    /// Required minimum distributions start at this age (SECURE 2.0)
    pub rmd_age: u32,
}

impl Default for UsRules {
    fn default() -> Self {
        Self {
            early_withdrawal_age: 59,
            early_withdrawal_penalty: 0.10,
            tax_brackets: BracketTable::builtin(vec![
                TaxBracket::up_to(11_000.0, 0.10),
                TaxBracket::up_to(44_625.0, 0.12),
                TaxBracket::up_to(95_375.0, 0.22),
                TaxBracket::up_to(182_100.0, 0.24),
                TaxBracket::open(0.32),
            ]),
            ss_earliest_claim_age: 62,
            ss_full_retirement_age: 67,
            ss_max_delay_age: 70,
            ss_benefit_by_claim_age: vec![
                (62, 2_100.0),
                (63, 2_250.0),
                (64, 2_400.0),
                (65, 2_600.0),
                (66, 2_800.0),
                (67, 3_000.0),
            ],
            default_retirement_age: 65,
            annual_contribution: 10_000.0,
            return_under_50: 0.08,
            return_50_to_59: 0.07,
            return_60_plus: 0.06,
            withdrawal_rate: 0.04,
            rmd_first_years_withdrawal_rate: 0.0366,
            withdrawal_rate_80_plus: 0.05,
            rmd_age: 73,
        }
    }
}

impl UsRules {
    /// Monthly Social Security benefit when claiming at `age`
    ///
    /// Zero below the earliest claim age; ages past the table keep the last
    /// (full retirement age) amount.
    pub fn monthly_benefit(&self, age: u32) -> f64 {
        if age < self.ss_earliest_claim_age {
            return 0.0;
        }
        self.ss_benefit_by_claim_age
            .iter()
            .rev()
            .find(|(claim_age, _)| age >= *claim_age)
            .map(|(_, benefit)| *benefit)
            .unwrap_or(0.0)
    }

    /// Accumulation-phase return for the member's current age
    pub fn accumulation_return(&self, age: u32) -> f64 {
        if age < 50 {
            self.return_under_50
        } else if age < 60 {
            self.return_50_to_59
        } else {
            self.return_60_plus
        }
    }

    /// Drawdown-phase withdrawal rate for the member's current age
    pub fn distribution_withdrawal_rate(&self, age: u32) -> f64 {
        if age >= 80 {
            self.withdrawal_rate_80_plus
        } else if (73..=74).contains(&age) {
            self.rmd_first_years_withdrawal_rate
        } else {
            self.withdrawal_rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benefit_table() {
        let rules = UsRules::default();
        assert_eq!(rules.monthly_benefit(61), 0.0);
        assert_eq!(rules.monthly_benefit(62), 2_100.0);
        assert_eq!(rules.monthly_benefit(63), 2_250.0);
        assert_eq!(rules.monthly_benefit(64), 2_400.0);
        assert_eq!(rules.monthly_benefit(65), 2_600.0);
        assert_eq!(rules.monthly_benefit(66), 2_800.0);
        assert_eq!(rules.monthly_benefit(67), 3_000.0);
        assert_eq!(rules.monthly_benefit(72), 3_000.0);
    }

    #[test]
    fn test_federal_brackets() {
        let rules = UsRules::default();
        assert_eq!(rules.tax_brackets.rate_for(11_000.0), 0.10);
        assert_eq!(rules.tax_brackets.rate_for(50_000.0), 0.22);
        assert_eq!(rules.tax_brackets.rate_for(182_100.0), 0.24);
        assert_eq!(rules.tax_brackets.rate_for(182_100.5), 0.32);
    }

    #[test]
    fn test_withdrawal_rate_bands() {
        let rules = UsRules::default();
        assert_eq!(rules.distribution_withdrawal_rate(67), 0.04);
        assert_eq!(rules.distribution_withdrawal_rate(73), 0.0366);
        assert_eq!(rules.distribution_withdrawal_rate(74), 0.0366);
        assert_eq!(rules.distribution_withdrawal_rate(75), 0.04);
        assert_eq!(rules.distribution_withdrawal_rate(80), 0.05);
    }

    #[test]
    fn test_accumulation_return_bands() {
        let rules = UsRules::default();
        assert_eq!(rules.accumulation_return(35), 0.08);
        assert_eq!(rules.accumulation_return(50), 0.07);
        assert_eq!(rules.accumulation_return(59), 0.07);
        assert_eq!(rules.accumulation_return(60), 0.06);
    }
}
