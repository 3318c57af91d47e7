// 👤 Customer Entity - Stable identity with an append-only statement
//
// "Name is a VALUE (can change), id and tax id are IDENTITY (never change)"
//
// - id: UUID generated at creation, never reused
// - tax_id: external identifier, unique across the registry
// - statement: entries are appended, never edited or removed one by one

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::statement::{self, StatementEntry};
use crate::error::{LedgerError, LedgerResult};

/// Example customer present when the server starts with seed data
pub const SEED_CUSTOMER_ID: &str = "758f7eb2-2b2e-48a5-b8bc-946e5919bc44";
pub const SEED_CUSTOMER_TAX_ID: &str = "12345678910";
pub const SEED_CUSTOMER_NAME: &str = "Muffin Pimentão";

// ============================================================================
// CUSTOMER ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    // ========================================================================
    // IDENTITY (never changes)
    // ========================================================================
    /// External tax number (e.g. a CPF)
    tax_id: String,

    /// Stable identity (UUID v4)
    id: String,

    // ========================================================================
    // VALUES
    // ========================================================================
    pub name: String,

    statement: Vec<StatementEntry>,
}

impl Customer {
    /// Create new customer with a fresh UUID and an empty statement
    pub fn new(tax_id: String, name: String) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), tax_id, name)
    }

    fn with_id(id: String, tax_id: String, name: String) -> Self {
        Customer {
            tax_id,
            id,
            name,
            statement: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn statement(&self) -> &[StatementEntry] {
        &self.statement
    }

    /// Current balance, folded from the statement
    pub fn balance(&self) -> LedgerResult<Decimal> {
        statement::balance(&self.statement)
    }

    /// Push an entry to the end of the statement
    pub fn append(&mut self, entry: StatementEntry) {
        self.statement.push(entry);
    }

    pub fn update_name(&mut self, name: String) {
        self.name = name;
    }

    /// Record a credit stamped now
    ///
    /// Rejected when the new balance would not fit in a `Decimal`.
    pub fn deposit(&mut self, description: String, amount: Decimal) -> LedgerResult<&StatementEntry> {
        ensure_non_negative(amount)?;
        self.balance()?
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.append(StatementEntry::credit(description, amount));
        Ok(self.last_entry())
    }

    /// Record a debit stamped now
    ///
    /// Fails without touching the statement when `amount` exceeds the
    /// balance. Withdrawing the exact balance is allowed.
    pub fn withdraw(&mut self, description: String, amount: Decimal) -> LedgerResult<&StatementEntry> {
        ensure_non_negative(amount)?;

        let available = self.balance()?;
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        self.append(StatementEntry::debit(description, amount));
        Ok(self.last_entry())
    }

    /// Statement entries recorded on `date` (time of day ignored)
    pub fn entries_on(&self, date: NaiveDate) -> Vec<StatementEntry> {
        statement::entries_on(&self.statement, date)
    }

    fn last_entry(&self) -> &StatementEntry {
        // Only called right after a push
        &self.statement[self.statement.len() - 1]
    }
}

fn ensure_non_negative(amount: Decimal) -> LedgerResult<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

// ============================================================================
// CUSTOMER REGISTRY
// ============================================================================

/// Registry of all customers, in creation order
///
/// Lives in process memory only. Callers that share it across threads wrap
/// it in a mutex (see `api::AppState`).
#[derive(Debug, Default)]
pub struct CustomerRegistry {
    customers: Vec<Customer>,
}

impl CustomerRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        CustomerRegistry {
            customers: Vec::new(),
        }
    }

    /// Registry holding the example customer
    pub fn seeded() -> Self {
        CustomerRegistry {
            customers: vec![Customer::with_id(
                SEED_CUSTOMER_ID.to_string(),
                SEED_CUSTOMER_TAX_ID.to_string(),
                SEED_CUSTOMER_NAME.to_string(),
            )],
        }
    }

    /// Open an account for a new tax id
    pub fn create(&mut self, tax_id: String, name: String) -> LedgerResult<&Customer> {
        if self.find_by_tax_id(&tax_id).is_some() {
            return Err(LedgerError::DuplicateTaxId(tax_id));
        }

        // ids are never reused
        let mut customer = Customer::new(tax_id, name);
        while self.customers.iter().any(|c| c.id == customer.id) {
            customer.id = uuid::Uuid::new_v4().to_string();
        }

        self.customers.push(customer);
        Ok(&self.customers[self.customers.len() - 1])
    }

    pub fn find_by_id(&self, id: &str) -> LedgerResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or(LedgerError::NotFound)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> LedgerResult<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LedgerError::NotFound)
    }

    pub fn find_by_tax_id(&self, tax_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.tax_id == tax_id)
    }

    /// Remove a customer (and its statement) by id
    pub fn delete(&mut self, id: &str) -> LedgerResult<Customer> {
        let position = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or(LedgerError::NotFound)?;

        Ok(self.customers.remove(position))
    }

    pub fn count(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.customers.iter().map(|c| c.id()).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
