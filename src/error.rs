// Ledger Errors - Domain failure kinds
//
// Every variant maps to a 4xx response in the API layer (see api.rs).

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// No customer carries the requested id
    #[error("Customer not found")]
    NotFound,

    /// A customer with this tax id is already registered
    #[error("Customer already exists")]
    DuplicateTaxId(String),

    #[error("Insufficient funds")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid amount - {0}")]
    InvalidAmount(Decimal),

    /// The balance would leave the representable decimal range
    #[error("Amount overflows the account balance")]
    Overflow,
}

pub type LedgerResult<T> = Result<T, LedgerError>;
