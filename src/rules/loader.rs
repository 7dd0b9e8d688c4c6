//! CSV-based rule table loader
//!
//! Loads bracket overrides from data/rules/

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::brackets::{BracketTable, TaxBracket};
use crate::error::LoadError;
use crate::member::Country;

/// Default path to the rule table directory
pub const DEFAULT_RULES_PATH: &str = "data/rules";

#[derive(Debug, Deserialize)]
struct BracketRow {
    country: String,
    #[serde(default)]
    upper_bound: Option<f64>,
    rate: f64,
}

/// Load tax bracket tables from `tax_brackets.csv`
///
/// Returns one table per country present in the file. Countries missing from
/// the file keep their built-in tables.
pub fn load_tax_brackets(path: &Path) -> Result<BTreeMap<Country, BracketTable>, LoadError> {
    let file_path = path.join("tax_brackets.csv");
    let file = std::fs::File::open(&file_path).map_err(|source| LoadError::Io {
        path: file_path.display().to_string(),
        source,
    })?;
    load_tax_brackets_from_reader(file)
}

/// Load tax bracket tables from any reader
pub fn load_tax_brackets_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<BTreeMap<Country, BracketTable>, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows: BTreeMap<Country, Vec<TaxBracket>> = BTreeMap::new();

    for result in reader.deserialize() {
        let row: BracketRow = result?;
        let country: Country = row.country.parse()?;
        rows.entry(country).or_default().push(TaxBracket {
            upper_bound: row.upper_bound,
            rate: row.rate,
        });
    }

    rows.into_iter()
        .map(|(country, brackets)| {
            BracketTable::new(brackets)
                .map(|table| (country, table))
                .map_err(|reason| LoadError::InvalidBrackets { country, reason })
        })
        .collect()
}
