// Customer Ledger - Core Library
// Exposes all modules for use in the API server and tests

pub mod api;
pub mod config;
pub mod entities;
pub mod error;

// Re-export commonly used types
pub use api::{router, AppState};
pub use config::ServerConfig;
pub use entities::{Customer, CustomerRegistry, EntryKind, StatementEntry};
pub use error::{LedgerError, LedgerResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
