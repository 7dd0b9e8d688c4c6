//! Member profiles, withdrawal requests and member file loading

mod profile;
pub mod loader;

pub use profile::{
    AccountType, Country, EmploymentStatus, MaritalStatus, MemberFinancialProfile,
    WithdrawalRequest, WithdrawalType,
};
pub use loader::{load_members, load_members_from_reader, load_sample_members, MemberRecord};
