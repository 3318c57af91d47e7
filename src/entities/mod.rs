// Entity Models
//
// Each customer has:
// - Stable identity (UUID) that NEVER changes
// - An append-only statement of credit/debit entries
// - A registry for creation, lookup and removal

pub mod customer;
pub mod statement;

pub use customer::{Customer, CustomerRegistry, SEED_CUSTOMER_ID};
pub use statement::{EntryKind, StatementEntry};
