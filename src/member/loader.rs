//! Load member profiles and proposed withdrawals from CSV

use super::{
    AccountType, Country, EmploymentStatus, MaritalStatus, MemberFinancialProfile,
    WithdrawalRequest, WithdrawalType,
};
use crate::error::LoadError;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the sample member file
pub const DEFAULT_MEMBERS_PATH: &str = "data/members/sample_members.csv";

/// A member profile paired with the withdrawal being asked about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub profile: MemberFinancialProfile,
    pub request: WithdrawalRequest,
}

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    member_id: String,
    age: u32,
    country: String,
    balance: f64,
    #[serde(default)]
    other_assets: Option<f64>,
    #[serde(default)]
    marital_status: String,
    #[serde(default)]
    employment_status: String,
    #[serde(default)]
    preservation_age: Option<u32>,
    #[serde(default)]
    years_of_service: Option<u32>,
    #[serde(default)]
    withdrawal_amount: Option<f64>,
    #[serde(default)]
    withdrawal_type: String,
    #[serde(default)]
    account_type: String,
}

impl CsvRow {
    fn into_record(self) -> Result<MemberRecord, LoadError> {
        let country: Country = self.country.parse()?;
        let marital_status: MaritalStatus = self.marital_status.parse()?;
        let employment_status: EmploymentStatus = self.employment_status.parse()?;
        let withdrawal_type: WithdrawalType = self.withdrawal_type.parse()?;
        let account_type: AccountType = self.account_type.parse()?;

        Ok(MemberRecord {
            profile: MemberFinancialProfile {
                member_id: self.member_id,
                age: self.age,
                country,
                balance: self.balance,
                other_assets: self.other_assets.unwrap_or(0.0),
                marital_status,
                employment_status,
                preservation_age: self.preservation_age,
                years_of_service: self.years_of_service,
            },
            request: WithdrawalRequest {
                amount: self.withdrawal_amount.unwrap_or(0.0),
                withdrawal_type,
                account_type,
            },
        })
    }
}

/// Load all member records from a CSV file
pub fn load_members<P: AsRef<Path>>(path: P) -> Result<Vec<MemberRecord>, LoadError> {
    let reader = Reader::from_path(path)?;
    collect_records(reader)
}

/// Load member records from any reader (e.g., string buffer, request body)
pub fn load_members_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<MemberRecord>, LoadError> {
    collect_records(Reader::from_reader(reader))
}

/// Load the bundled sample members
pub fn load_sample_members() -> Result<Vec<MemberRecord>, LoadError> {
    load_members(DEFAULT_MEMBERS_PATH)
}

fn collect_records<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<MemberRecord>, LoadError> {
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }

    log::debug!("Loaded {} member records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
member_id,age,country,balance,other_assets,marital_status,employment_status,preservation_age,years_of_service,withdrawal_amount,withdrawal_type,account_type
AU-001,66,AU,215000,50000,married,retired,60,,100000,,
US-001,52,US,400000,,single,employed,,,50000,,401k
UK-001,58,UK,300000,,divorced,employed,,30,60000,Drawdown,
IN-001,45,IN,1200000,,married,employed,,,80000,Full,
";

    #[test]
    fn test_load_from_reader() {
        let records = load_members_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        let au = &records[0];
        assert_eq!(au.profile.country, Country::Au);
        assert_eq!(au.profile.preservation_age, Some(60));
        assert_eq!(au.profile.other_assets, 50_000.0);
        assert_eq!(au.profile.employment_status, EmploymentStatus::Retired);
        assert_eq!(au.request.amount, 100_000.0);
        assert_eq!(au.request.withdrawal_type, WithdrawalType::LumpSum);

        let us = &records[1];
        assert_eq!(us.profile.other_assets, 0.0);
        assert_eq!(us.request.account_type, AccountType::Traditional401k);

        let uk = &records[2];
        assert_eq!(uk.profile.years_of_service, Some(30));
        assert_eq!(uk.request.withdrawal_type, WithdrawalType::Drawdown);

        assert_eq!(records[3].request.withdrawal_type, WithdrawalType::Full);
    }

    #[test]
    fn test_unknown_country_rejected() {
        let csv = "member_id,age,country,balance\nX-1,40,FR,1000\n";
        let err = load_members_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownCountry(ref c) if c == "FR"));
    }

    #[test]
    fn test_load_sample_members() {
        let records = load_sample_members().expect("Failed to load sample members");
        assert!(records.len() >= 8);
        for country in Country::ALL {
            assert!(records.iter().any(|r| r.profile.country == country));
        }
    }
}
