//! Tax bracket tables
//!
//! Brackets are applied to the whole amount: the first bracket whose upper
//! bound covers the amount supplies a single rate for every dollar. This is
//! not how marginal income tax works, but it is how these withdrawal
//! estimates are defined, so lookups return a rate rather than a tax figure.

use serde::{Deserialize, Serialize};

/// A single bracket: amounts up to and including `upper_bound` use `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound (None = open top bracket)
    pub upper_bound: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub fn up_to(upper_bound: f64, rate: f64) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn open(rate: f64) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    fn covers(&self, amount: f64) -> bool {
        self.upper_bound.map_or(true, |upper| amount <= upper)
    }
}

/// Ordered bracket table ending in an open bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Build a table, sorting bounded brackets ascending with the open bracket last
    ///
    /// Returns an error message if the table has no open bracket, more than
    /// one open bracket, or a rate outside 0..=1.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, String> {
        let open_count = brackets.iter().filter(|b| b.upper_bound.is_none()).count();
        if open_count != 1 {
            return Err(format!("expected exactly one open bracket, found {}", open_count));
        }
        if let Some(bad) = brackets.iter().find(|b| !(0.0..=1.0).contains(&b.rate)) {
            return Err(format!("rate {} is outside 0..=1", bad.rate));
        }

        brackets.sort_by(|a, b| match (a.upper_bound, b.upper_bound) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(Self { brackets })
    }

    /// Built-in table, already ordered with the open bracket last
    pub(super) fn builtin(brackets: Vec<TaxBracket>) -> Self {
        debug_assert!(brackets.last().map_or(false, |b| b.upper_bound.is_none()));
        Self { brackets }
    }

    /// Single flat rate for every amount
    pub fn flat(rate: f64) -> Self {
        Self {
            brackets: vec![TaxBracket::open(rate)],
        }
    }

    /// Rate applied to the whole of `amount`
    pub fn rate_for(&self, amount: f64) -> f64 {
        self.brackets
            .iter()
            .find(|b| b.covers(amount))
            .or_else(|| self.brackets.last())
            .map(|b| b.rate)
            .unwrap_or(0.0)
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn au_table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::open(0.37),
            TaxBracket::up_to(120_000.0, 0.325),
            TaxBracket::up_to(45_000.0, 0.19),
        ])
        .unwrap()
    }

    #[test]
    fn test_brackets_sorted() {
        let table = au_table();
        assert_eq!(table.brackets()[0].upper_bound, Some(45_000.0));
        assert_eq!(table.brackets()[2].upper_bound, None);
    }

    #[test]
    fn test_rate_lookup_is_inclusive() {
        let table = au_table();
        assert_eq!(table.rate_for(0.0), 0.19);
        assert_eq!(table.rate_for(45_000.0), 0.19);
        assert_eq!(table.rate_for(45_000.01), 0.325);
        assert_eq!(table.rate_for(120_000.0), 0.325);
        assert_eq!(table.rate_for(1_000_000.0), 0.37);
    }

    #[test]
    fn test_flat_table() {
        let table = BracketTable::flat(0.2);
        assert_eq!(table.rate_for(10.0), 0.2);
        assert_eq!(table.rate_for(1e9), 0.2);
    }

    #[test]
    fn test_invalid_tables() {
        assert!(BracketTable::new(vec![TaxBracket::up_to(10.0, 0.1)]).is_err());
        assert!(BracketTable::new(vec![TaxBracket::open(0.1), TaxBracket::open(0.2)]).is_err());
        assert!(BracketTable::new(vec![TaxBracket::open(1.5)]).is_err());
    }
}
