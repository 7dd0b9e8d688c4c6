//! Australian superannuation rule constants

use super::brackets::{BracketTable, TaxBracket};

/// Age Pension asset-test thresholds for one household type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetTestThresholds {
    /// Full pension is paid at or below this level of assessable assets
    pub lower: f64,
    /// Pension tapers to zero at this level
    pub upper: f64,
    /// Full annual pension for the household
    pub full_pension: f64,
}

impl AssetTestThresholds {
    /// Annual pension after the linear asset taper
    pub fn tapered_pension(&self, assessable_assets: f64) -> f64 {
        if assessable_assets <= self.lower {
            self.full_pension
        } else if assessable_assets >= self.upper {
            0.0
        } else {
            let taper = (assessable_assets - self.lower) / (self.upper - self.lower);
            self.full_pension * (1.0 - taper)
        }
    }
}

/// Return/withdrawal assumptions for one retirement phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseRates {
    pub return_rate: f64,
    pub withdrawal_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuRules {
    /// Default preservation age when the profile has no override
    pub preservation_age: u32,

    /// Rates for withdrawals taken before preservation age
    pub tax_brackets: BracketTable,

    /// Qualifying age for the Age Pension
    pub age_pension_age: u32,

    pub single_assets: AssetTestThresholds,
    pub couple_assets: AssetTestThresholds,

    /// Flat drawdown assumption used to turn remaining super into income
    pub super_income_rate: f64,

    /// Longest projection horizon in years
    pub max_projection_years: u32,

    pub accumulation: PhaseRates,
    /// Preservation age to 69
    pub early_retirement: PhaseRates,
    /// 70 to 79
    pub mid_retirement: PhaseRates,
    /// 80 and over
    pub late_retirement: PhaseRates,
}

impl Default for AuRules {
    fn default() -> Self {
        Self {
            preservation_age: 60,
            tax_brackets: BracketTable::builtin(vec![
                TaxBracket::up_to(45_000.0, 0.19),
                TaxBracket::up_to(120_000.0, 0.325),
                TaxBracket::open(0.37),
            ]),
            age_pension_age: 67,
            single_assets: AssetTestThresholds {
                lower: 314_000.0,
                upper: 674_000.0,
                full_pension: 29_024.00, // 1,116.30 per fortnight
            },
            couple_assets: AssetTestThresholds {
                lower: 470_000.0,
                upper: 1_012_500.0,
                full_pension: 43_752.80, // 1,682.80 per fortnight combined
            },
            super_income_rate: 0.04,
            max_projection_years: 30,
            accumulation: PhaseRates {
                return_rate: 0.07,
                withdrawal_rate: 0.0,
            },
            early_retirement: PhaseRates {
                return_rate: 0.06,
                withdrawal_rate: 0.04,
            },
            mid_retirement: PhaseRates {
                return_rate: 0.05,
                withdrawal_rate: 0.05,
            },
            late_retirement: PhaseRates {
                return_rate: 0.04,
                withdrawal_rate: 0.06,
            },
        }
    }
}

impl AuRules {
    pub fn asset_thresholds(&self, couple: bool) -> &AssetTestThresholds {
        if couple {
            &self.couple_assets
        } else {
            &self.single_assets
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_brackets() {
        let rules = AuRules::default();
        assert_eq!(rules.tax_brackets.rate_for(45_000.0), 0.19);
        assert_eq!(rules.tax_brackets.rate_for(45_000.01), 0.325);
        assert_eq!(rules.tax_brackets.rate_for(120_000.01), 0.37);
    }

    #[test]
    fn test_taper_endpoints() {
        let rules = AuRules::default();
        let single = rules.asset_thresholds(false);

        assert_eq!(single.tapered_pension(0.0), single.full_pension);
        assert_eq!(single.tapered_pension(314_000.0), single.full_pension);
        assert_eq!(single.tapered_pension(674_000.0), 0.0);
        assert_eq!(single.tapered_pension(2_000_000.0), 0.0);

        // Midpoint pays half
        assert_relative_eq!(single.tapered_pension(494_000.0), single.full_pension / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_couple_thresholds() {
        let rules = AuRules::default();
        let couple = rules.asset_thresholds(true);
        assert_eq!(couple.lower, 470_000.0);
        assert_eq!(couple.upper, 1_012_500.0);
    }
}
