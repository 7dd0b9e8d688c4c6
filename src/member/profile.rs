//! Member financial profile and withdrawal request structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;

/// Jurisdiction a member's retirement savings are held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    /// Australia (superannuation)
    #[serde(rename = "AU")]
    Au,
    /// United States (401(k) / IRA)
    #[serde(rename = "US")]
    Us,
    /// United Kingdom (defined contribution pension pots)
    #[serde(rename = "UK")]
    Uk,
    /// India (EPF / EPS / NPS)
    #[serde(rename = "IN")]
    In,
}

impl Country {
    pub const ALL: [Country; 4] = [Country::Au, Country::Us, Country::Uk, Country::In];

    /// ISO-style two letter code used in data files and citations
    pub fn code(&self) -> &'static str {
        match self {
            Country::Au => "AU",
            Country::Us => "US",
            Country::Uk => "UK",
            Country::In => "IN",
        }
    }

    /// Currency symbol balances are implicitly held in
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Country::Au => "A$",
            Country::Us => "$",
            Country::Uk => "£",
            Country::In => "₹",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AU" | "AUS" => Ok(Country::Au),
            "US" | "USA" => Ok(Country::Us),
            "UK" | "GB" | "GBR" => Ok(Country::Uk),
            "IN" | "IND" => Ok(Country::In),
            _ => Err(LoadError::UnknownCountry(s.to_string())),
        }
    }
}

/// Marital status of the member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Assessed as a couple for means-tested benefits
    pub fn is_couple(&self) -> bool {
        matches!(self, MaritalStatus::Married)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "single",
            MaritalStatus::Married => "married",
            MaritalStatus::Divorced => "divorced",
            MaritalStatus::Widowed => "widowed",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "" => Ok(MaritalStatus::Single),
            "married" | "couple" => Ok(MaritalStatus::Married),
            "divorced" => Ok(MaritalStatus::Divorced),
            "widowed" => Ok(MaritalStatus::Widowed),
            _ => Err(LoadError::UnknownValue {
                field: "marital_status",
                value: s.to_string(),
            }),
        }
    }
}

/// Employment status of the member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
}

impl FromStr for EmploymentStatus {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "employed" | "full_time" | "part_time" | "" => Ok(EmploymentStatus::Employed),
            "self_employed" => Ok(EmploymentStatus::SelfEmployed),
            "unemployed" => Ok(EmploymentStatus::Unemployed),
            "retired" => Ok(EmploymentStatus::Retired),
            _ => Err(LoadError::UnknownValue {
                field: "employment_status",
                value: s.to_string(),
            }),
        }
    }
}

/// How a withdrawal is taken
///
/// Only the UK pension tax rules distinguish between types. EPF withdrawals
/// are implicitly `Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WithdrawalType {
    #[default]
    #[serde(rename = "Lump_Sum", alias = "lump_sum")]
    LumpSum,
    #[serde(alias = "drawdown")]
    Drawdown,
    #[serde(alias = "annuity")]
    Annuity,
    #[serde(alias = "full")]
    Full,
}

impl WithdrawalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalType::LumpSum => "Lump_Sum",
            WithdrawalType::Drawdown => "Drawdown",
            WithdrawalType::Annuity => "Annuity",
            WithdrawalType::Full => "Full",
        }
    }
}

impl FromStr for WithdrawalType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "lump_sum" | "" => Ok(WithdrawalType::LumpSum),
            "drawdown" => Ok(WithdrawalType::Drawdown),
            "annuity" => Ok(WithdrawalType::Annuity),
            "full" => Ok(WithdrawalType::Full),
            _ => Err(LoadError::UnknownValue {
                field: "withdrawal_type",
                value: s.to_string(),
            }),
        }
    }
}

/// US retirement account the withdrawal is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountType {
    #[default]
    #[serde(rename = "401k")]
    Traditional401k,
    #[serde(rename = "Traditional_IRA")]
    TraditionalIra,
    #[serde(rename = "Roth_IRA")]
    RothIra,
}

impl AccountType {
    pub fn is_roth(&self) -> bool {
        matches!(self, AccountType::RothIra)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Traditional401k => "401(k)",
            AccountType::TraditionalIra => "Traditional IRA",
            AccountType::RothIra => "Roth IRA",
        }
    }
}

impl FromStr for AccountType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' ', '(', ')'], "_").as_str() {
            "401k" | "401_k_" | "traditional_401k" | "" => Ok(AccountType::Traditional401k),
            "ira" | "traditional_ira" => Ok(AccountType::TraditionalIra),
            "roth_ira" | "roth" => Ok(AccountType::RothIra),
            _ => Err(LoadError::UnknownValue {
                field: "account_type",
                value: s.to_string(),
            }),
        }
    }
}

/// A member's financial position, the sole input entity of every calculator
///
/// Owned by the caller and passed by reference; calculators never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberFinancialProfile {
    /// Opaque member identifier
    pub member_id: String,

    /// Current age in whole years
    pub age: u32,

    /// Jurisdiction of the member's savings
    pub country: Country,

    /// Retirement balance in the country's currency
    pub balance: f64,

    /// Other assessable assets (AU asset test)
    #[serde(default)]
    pub other_assets: f64,

    #[serde(default)]
    pub marital_status: MaritalStatus,

    #[serde(default)]
    pub employment_status: EmploymentStatus,

    /// Override for the jurisdiction's preservation/eligibility age
    #[serde(default)]
    pub preservation_age: Option<u32>,

    /// Known years of service (EPS) or National Insurance qualifying years (UK)
    #[serde(default)]
    pub years_of_service: Option<u32>,
}

impl MemberFinancialProfile {
    /// Create a profile with default status fields
    pub fn new(member_id: impl Into<String>, age: u32, country: Country, balance: f64) -> Self {
        Self {
            member_id: member_id.into(),
            age,
            country,
            balance,
            other_assets: 0.0,
            marital_status: MaritalStatus::default(),
            employment_status: EmploymentStatus::default(),
            preservation_age: None,
            years_of_service: None,
        }
    }

    pub fn with_other_assets(mut self, other_assets: f64) -> Self {
        self.other_assets = other_assets;
        self
    }

    pub fn with_marital_status(mut self, marital_status: MaritalStatus) -> Self {
        self.marital_status = marital_status;
        self
    }

    pub fn with_preservation_age(mut self, preservation_age: u32) -> Self {
        self.preservation_age = Some(preservation_age);
        self
    }

    pub fn with_years_of_service(mut self, years: u32) -> Self {
        self.years_of_service = Some(years);
        self
    }
}

/// A proposed withdrawal
///
/// `amount` is deliberately not checked against the balance so callers can
/// ask hypothetical questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WithdrawalRequest {
    pub amount: f64,

    #[serde(default)]
    pub withdrawal_type: WithdrawalType,

    /// US only
    #[serde(default)]
    pub account_type: AccountType,
}

impl WithdrawalRequest {
    pub fn lump_sum(amount: f64) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, withdrawal_type: WithdrawalType) -> Self {
        self.withdrawal_type = withdrawal_type;
        self
    }

    pub fn with_account(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }
}
