//! Retirement Rules - multi-jurisdiction retirement benefit rules engine
//!
//! This library provides, for members in Australia, the United States, the
//! United Kingdom and India:
//! - Withdrawal tax (preservation ages, early withdrawal penalties, tax-free cash, TDS)
//! - Government and scheme benefit eligibility (Age Pension, Social Security, State Pension, EPS, NPS)
//! - Balance projections with phase-dependent return and withdrawal assumptions
//! - Regulation citations attached to every result
//!
//! Every calculator is a pure function of its inputs and the rule tables.

pub mod error;
pub mod member;
pub mod rules;
pub mod citation;
pub mod result;
pub mod tax;
pub mod eligibility;
pub mod projection;
pub mod registry;
pub mod engine;
pub mod tool;

// Re-export commonly used types
pub use error::{LoadError, RulesError};
pub use member::{Country, MemberFinancialProfile, MemberRecord, WithdrawalRequest};
pub use rules::RuleTables;
pub use citation::{Citation, CitationRegistry, ToolKind};
pub use result::{Assessment, Calculation, ResultAssembler};
pub use registry::RulesRegistry;
pub use engine::{MemberReport, RulesEngine, DEFAULT_PROJECTION_YEARS};
pub use tool::ToolCall;
