//! JSON tool-call boundary for the advisory agent
//!
//! One [`ToolCall`] variant per engine operation, tagged by `operation`:
//!
//! ```json
//! {"operation": "us_calculate_401k_tax", "member_id": "US-2001",
//!  "account_type": "401k", "amount": 50000, "age": 52}
//! ```
//!
//! [`RulesEngine::dispatch`] runs the call and returns the assessment as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{RulesEngine, DEFAULT_PROJECTION_YEARS};
use crate::error::RulesError;
use crate::member::{AccountType, MaritalStatus, MemberFinancialProfile, WithdrawalRequest, WithdrawalType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ToolCall {
    AuCalculateTax {
        member_id: String,
        age: u32,
        preservation_age: Option<u32>,
        balance: f64,
        withdrawal: f64,
    },
    AuCheckPensionImpact {
        member_id: String,
        age: u32,
        #[serde(default)]
        marital_status: MaritalStatus,
        balance: f64,
        #[serde(default)]
        other_assets: f64,
        #[serde(default)]
        withdrawal: f64,
    },
    AuProjectBalance {
        member_id: String,
        age: u32,
        preservation_age: Option<u32>,
        balance: f64,
        years: u32,
    },
    #[serde(rename = "us_calculate_401k_tax")]
    UsCalculate401kTax {
        member_id: String,
        #[serde(default)]
        account_type: AccountType,
        amount: f64,
        age: u32,
    },
    UsCheckSocialSecurity {
        member_id: String,
        age: u32,
        #[serde(default)]
        marital_status: MaritalStatus,
        #[serde(default)]
        balance: f64,
    },
    #[serde(rename = "us_project_401k")]
    UsProject401k {
        member_id: String,
        age: u32,
        balance: f64,
        years: u32,
        retirement_age: Option<u32>,
        annual_contribution: Option<f64>,
    },
    UkCalculatePensionTax {
        member_id: String,
        age: u32,
        pot: f64,
        amount: f64,
        #[serde(default)]
        withdrawal_type: WithdrawalType,
    },
    UkCheckStatePension {
        member_id: String,
        age: u32,
        ni_years: u32,
        #[serde(default)]
        marital_status: MaritalStatus,
    },
    UkProjectPensionPot {
        member_id: String,
        age: u32,
        pot: f64,
        years: u32,
        #[serde(default)]
        annual_drawdown: f64,
    },
    InCalculateEpfTax {
        member_id: String,
        age: u32,
        balance: f64,
        withdrawal: f64,
    },
    InCalculateNps {
        member_id: String,
        age: u32,
        balance: f64,
    },
    InCalculateNpsWithdrawal {
        member_id: String,
        age: u32,
        corpus: f64,
        annuity_purchase_pct: f64,
    },
    InCalculateEpsBenefits {
        member_id: String,
        age: u32,
        balance: f64,
        service_years: u32,
    },
    InProjectCorpus {
        member_id: String,
        age: u32,
        balance: f64,
        years: u32,
    },
    InProjectRetirementCorpus {
        member_id: String,
        age: u32,
        epf_balance: f64,
        nps_balance: f64,
        #[serde(default)]
        epf_monthly: f64,
        #[serde(default)]
        nps_monthly: f64,
        retirement_age: u32,
    },
    /// Every capability for one member, routed by country
    EvaluateMember {
        profile: MemberFinancialProfile,
        #[serde(default)]
        request: WithdrawalRequest,
        years: Option<u32>,
    },
}

impl ToolCall {
    /// Operation name as it appears in the `operation` tag
    pub fn operation(&self) -> &'static str {
        match self {
            ToolCall::AuCalculateTax { .. } => "au_calculate_tax",
            ToolCall::AuCheckPensionImpact { .. } => "au_check_pension_impact",
            ToolCall::AuProjectBalance { .. } => "au_project_balance",
            ToolCall::UsCalculate401kTax { .. } => "us_calculate_401k_tax",
            ToolCall::UsCheckSocialSecurity { .. } => "us_check_social_security",
            ToolCall::UsProject401k { .. } => "us_project_401k",
            ToolCall::UkCalculatePensionTax { .. } => "uk_calculate_pension_tax",
            ToolCall::UkCheckStatePension { .. } => "uk_check_state_pension",
            ToolCall::UkProjectPensionPot { .. } => "uk_project_pension_pot",
            ToolCall::InCalculateEpfTax { .. } => "in_calculate_epf_tax",
            ToolCall::InCalculateNps { .. } => "in_calculate_nps",
            ToolCall::InCalculateNpsWithdrawal { .. } => "in_calculate_nps_withdrawal",
            ToolCall::InCalculateEpsBenefits { .. } => "in_calculate_eps_benefits",
            ToolCall::InProjectCorpus { .. } => "in_project_corpus",
            ToolCall::InProjectRetirementCorpus { .. } => "in_project_retirement_corpus",
            ToolCall::EvaluateMember { .. } => "evaluate_member",
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, RulesError> {
    serde_json::to_value(value).map_err(|e| RulesError::Serialization(e.to_string()))
}

impl RulesEngine {
    /// Run a tool call and return its assessment as JSON
    pub fn dispatch(&self, call: &ToolCall) -> Result<Value, RulesError> {
        log::debug!("dispatch {}", call.operation());

        match call {
            ToolCall::AuCalculateTax { member_id, age, preservation_age, balance, withdrawal } => {
                to_json(&self.au_calculate_tax(member_id, *age, *preservation_age, *balance, *withdrawal)?)
            }
            ToolCall::AuCheckPensionImpact { member_id, age, marital_status, balance, other_assets, withdrawal } => {
                to_json(&self.au_check_pension_impact(
                    member_id,
                    *age,
                    *marital_status,
                    *balance,
                    *other_assets,
                    *withdrawal,
                )?)
            }
            ToolCall::AuProjectBalance { member_id, age, preservation_age, balance, years } => {
                to_json(&self.au_project_balance(member_id, *age, *preservation_age, *balance, *years)?)
            }
            ToolCall::UsCalculate401kTax { member_id, account_type, amount, age } => {
                to_json(&self.us_calculate_401k_tax(member_id, *account_type, *amount, *age)?)
            }
            ToolCall::UsCheckSocialSecurity { member_id, age, marital_status, balance } => {
                to_json(&self.us_check_social_security(member_id, *age, *marital_status, *balance)?)
            }
            ToolCall::UsProject401k { member_id, age, balance, years, retirement_age, annual_contribution } => {
                to_json(&self.us_project_401k(
                    member_id,
                    *age,
                    *balance,
                    *years,
                    *retirement_age,
                    *annual_contribution,
                )?)
            }
            ToolCall::UkCalculatePensionTax { member_id, age, pot, amount, withdrawal_type } => {
                to_json(&self.uk_calculate_pension_tax(member_id, *age, *pot, *amount, *withdrawal_type)?)
            }
            ToolCall::UkCheckStatePension { member_id, age, ni_years, marital_status } => {
                to_json(&self.uk_check_state_pension(member_id, *age, *ni_years, *marital_status)?)
            }
            ToolCall::UkProjectPensionPot { member_id, age, pot, years, annual_drawdown } => {
                to_json(&self.uk_project_pension_pot(member_id, *age, *pot, *years, *annual_drawdown)?)
            }
            ToolCall::InCalculateEpfTax { member_id, age, balance, withdrawal } => {
                to_json(&self.in_calculate_epf_tax(member_id, *age, *balance, *withdrawal)?)
            }
            ToolCall::InCalculateNps { member_id, age, balance } => {
                to_json(&self.in_calculate_nps(member_id, *age, *balance)?)
            }
            ToolCall::InCalculateNpsWithdrawal { member_id, age, corpus, annuity_purchase_pct } => {
                to_json(&self.in_calculate_nps_withdrawal(member_id, *age, *corpus, *annuity_purchase_pct)?)
            }
            ToolCall::InCalculateEpsBenefits { member_id, age, balance, service_years } => {
                to_json(&self.in_calculate_eps_benefits(member_id, *age, *balance, *service_years)?)
            }
            ToolCall::InProjectCorpus { member_id, age, balance, years } => {
                to_json(&self.in_project_corpus(member_id, *age, *balance, *years)?)
            }
            ToolCall::InProjectRetirementCorpus {
                member_id,
                age,
                epf_balance,
                nps_balance,
                epf_monthly,
                nps_monthly,
                retirement_age,
            } => to_json(&self.in_project_retirement_corpus(
                member_id,
                *age,
                *epf_balance,
                *nps_balance,
                *epf_monthly,
                *nps_monthly,
                *retirement_age,
            )?),
            ToolCall::EvaluateMember { profile, request, years } => {
                to_json(&self.evaluate_member(profile, request, years.unwrap_or(DEFAULT_PROJECTION_YEARS))?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(value: Value) -> ToolCall {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_and_dispatch_us_tax() {
        let engine = RulesEngine::new();
        let tool = call(json!({
            "operation": "us_calculate_401k_tax",
            "member_id": "US-2001",
            "account_type": "401k",
            "amount": 50000.0,
            "age": 52
        }));
        assert_eq!(tool.operation(), "us_calculate_401k_tax");

        let out = engine.dispatch(&tool).unwrap();
        assert_eq!(out["member_id"], "US-2001");
        assert_eq!(out["outcome"]["total_tax"], 16000.0);
        assert_eq!(out["citation_id"], "US-IRC-72T");
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let tool = call(json!({
            "operation": "uk_calculate_pension_tax",
            "member_id": "UK-1",
            "age": 60,
            "pot": 400000.0,
            "amount": 100000.0
        }));
        match &tool {
            ToolCall::UkCalculatePensionTax { withdrawal_type, .. } => {
                assert_eq!(*withdrawal_type, WithdrawalType::LumpSum)
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_nps_invalid_split_status() {
        let engine = RulesEngine::new();
        let out = engine
            .dispatch(&call(json!({
                "operation": "in_calculate_nps_withdrawal",
                "member_id": "IN-1",
                "age": 61,
                "corpus": 1000000.0,
                "annuity_purchase_pct": 30.0
            })))
            .unwrap();
        assert_eq!(out["status"], "Invalid: must purchase minimum 40% annuity");
        assert_eq!(out["outcome"]["valid_split"], false);
    }

    #[test]
    fn test_evaluate_member_call() {
        let engine = RulesEngine::new();
        let out = engine
            .dispatch(&call(json!({
                "operation": "evaluate_member",
                "profile": {
                    "member_id": "AU-1001",
                    "age": 66,
                    "country": "AU",
                    "balance": 215000.0,
                    "other_assets": 50000.0,
                    "marital_status": "married",
                    "employment_status": "retired",
                    "preservation_age": 60,
                    "years_of_service": null
                },
                "request": {"amount": 100000.0, "withdrawal_type": "Lump_Sum", "account_type": "401k"}
            })))
            .unwrap();
        assert_eq!(out["tax"]["outcome"]["jurisdiction"], "AU");
        assert_eq!(out["eligibility"][0]["tool"], "age_pension");
        assert_eq!(out["projection"]["citation_id"], "AU-SISR-7");
    }

    #[test]
    fn test_invalid_input_propagates() {
        let engine = RulesEngine::new();
        let err = engine
            .dispatch(&call(json!({
                "operation": "in_calculate_nps_withdrawal",
                "member_id": "IN-1",
                "age": 61,
                "corpus": 1000000.0,
                "annuity_purchase_pct": 140.0
            })))
            .unwrap_err();
        assert!(matches!(err, RulesError::InvalidInput { field: "annuity_purchase_pct", .. }));
    }

    #[test]
    fn test_unknown_operation_rejected() {
        let parsed: Result<ToolCall, _> = serde_json::from_value(json!({"operation": "au_do_magic"}));
        assert!(parsed.is_err());
    }
}
