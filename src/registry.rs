//! Country-keyed lookup of rule implementations
//!
//! Each jurisdiction registers one implementation per capability. The
//! built-in registry covers all four countries; individual capabilities can
//! be replaced, e.g. to trial a regulation change without touching the others.

use std::fmt;

use crate::eligibility::{
    AuEligibilityRules, EligibilityRules, InEligibilityRules, UkEligibilityRules, UsEligibilityRules,
};
use crate::member::Country;
use crate::projection::{AuProjectionRules, InProjectionRules, ProjectionRules, UkProjectionRules, UsProjectionRules};
use crate::tax::{AuTaxRules, InTaxRules, TaxRules, UkTaxRules, UsTaxRules};

/// Rule implementations for one jurisdiction
struct CountryRules {
    tax: Box<dyn TaxRules>,
    eligibility: Box<dyn EligibilityRules>,
    projection: Box<dyn ProjectionRules>,
}

impl CountryRules {
    fn new(
        tax: impl TaxRules + 'static,
        eligibility: impl EligibilityRules + 'static,
        projection: impl ProjectionRules + 'static,
    ) -> Self {
        Self {
            tax: Box::new(tax),
            eligibility: Box::new(eligibility),
            projection: Box::new(projection),
        }
    }
}

pub struct RulesRegistry {
    au: CountryRules,
    us: CountryRules,
    uk: CountryRules,
    india: CountryRules,
}

impl RulesRegistry {
    /// Registry with the built-in implementation for every country
    pub fn builtin() -> Self {
        Self {
            au: CountryRules::new(AuTaxRules, AuEligibilityRules, AuProjectionRules),
            us: CountryRules::new(UsTaxRules, UsEligibilityRules, UsProjectionRules),
            uk: CountryRules::new(UkTaxRules, UkEligibilityRules, UkProjectionRules),
            india: CountryRules::new(InTaxRules, InEligibilityRules, InProjectionRules),
        }
    }

    fn slot(&self, country: Country) -> &CountryRules {
        match country {
            Country::Au => &self.au,
            Country::Us => &self.us,
            Country::Uk => &self.uk,
            Country::In => &self.india,
        }
    }

    fn slot_mut(&mut self, country: Country) -> &mut CountryRules {
        match country {
            Country::Au => &mut self.au,
            Country::Us => &mut self.us,
            Country::Uk => &mut self.uk,
            Country::In => &mut self.india,
        }
    }

    pub fn tax(&self, country: Country) -> &dyn TaxRules {
        self.slot(country).tax.as_ref()
    }

    pub fn eligibility(&self, country: Country) -> &dyn EligibilityRules {
        self.slot(country).eligibility.as_ref()
    }

    pub fn projection(&self, country: Country) -> &dyn ProjectionRules {
        self.slot(country).projection.as_ref()
    }

    /// Replace the tax rules of the country the implementation reports
    pub fn register_tax(&mut self, rules: impl TaxRules + 'static) {
        let country = rules.country();
        log::debug!("Registering tax rules for {}", country);
        self.slot_mut(country).tax = Box::new(rules);
    }

    pub fn register_eligibility(&mut self, rules: impl EligibilityRules + 'static) {
        let country = rules.country();
        log::debug!("Registering eligibility rules for {}", country);
        self.slot_mut(country).eligibility = Box::new(rules);
    }

    pub fn register_projection(&mut self, rules: impl ProjectionRules + 'static) {
        let country = rules.country();
        log::debug!("Registering projection rules for {}", country);
        self.slot_mut(country).projection = Box::new(rules);
    }
}

impl Default for RulesRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RulesRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulesRegistry")
            .field("countries", &Country::ALL)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulesError;
    use crate::member::{MemberFinancialProfile, WithdrawalRequest};
    use crate::result::Calculation;
    use crate::rules::RuleTables;
    use crate::tax::TaxOutcome;

    #[test]
    fn test_builtin_covers_every_country() {
        let registry = RulesRegistry::builtin();
        for country in Country::ALL {
            assert_eq!(registry.tax(country).country(), country);
            assert_eq!(registry.eligibility(country).country(), country);
            assert_eq!(registry.projection(country).country(), country);
        }
    }

    /// Flat 15% on every AU withdrawal
    struct FlatAuTax;

    impl TaxRules for FlatAuTax {
        fn country(&self) -> Country {
            Country::Au
        }

        fn assess(
            &self,
            tables: &RuleTables,
            profile: &MemberFinancialProfile,
            request: &WithdrawalRequest,
        ) -> Result<Calculation<TaxOutcome>, RulesError> {
            let mut calc = AuTaxRules.assess(tables, profile, request)?;
            if let TaxOutcome::Au(result) = &mut calc.outcome {
                result.tax_rate = 0.15;
                result.tax_amount = request.amount * 0.15;
                result.net_withdrawal = request.amount - result.tax_amount;
            }
            Ok(calc)
        }
    }

    #[test]
    fn test_register_replaces_one_country() {
        let mut registry = RulesRegistry::builtin();
        registry.register_tax(FlatAuTax);

        let tables = RuleTables::default_2024();
        let member = MemberFinancialProfile::new("AU-1", 66, Country::Au, 100_000.0);
        let calc = registry
            .tax(Country::Au)
            .assess(&tables, &member, &WithdrawalRequest::lump_sum(10_000.0))
            .unwrap();
        assert!((calc.outcome.total_tax() - 1_500.0).abs() < 1e-9);

        // Other countries untouched
        let us = MemberFinancialProfile::new("US-1", 52, Country::Us, 100_000.0);
        let calc = registry
            .tax(Country::Us)
            .assess(&tables, &us, &WithdrawalRequest::lump_sum(50_000.0))
            .unwrap();
        assert!((calc.outcome.total_tax() - 16_000.0).abs() < 1e-6);
    }
}
