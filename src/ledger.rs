// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory ledger of transactions and categories.
//!
//! The report engine only ever reads through [`LedgerSource`]; mutations go
//! through [`Ledger`] directly, or through [`SharedLedger`] when several
//! callers share one ledger.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, Result};
use crate::models::{Category, CategoryName, NewTransaction, Transaction, TransactionType};

/// Read side of the ledger consumed by the report engine.
pub trait LedgerSource {
    /// Transactions whose calendar date lies in `[start, end]`, newest first.
    /// A missing bound leaves that side open.
    fn query_transactions(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<Transaction>;

    fn all_transactions(&self) -> Vec<Transaction>;

    fn category_by_id(&self, id: i64) -> Result<Category>;

    fn all_categories(&self) -> Vec<Category>;
}

/// Inclusive calendar-date filter, ordered by date descending. Equal
/// timestamps keep their ledger order.
pub fn filter_by_date(
    transactions: &[Transaction],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| {
            let day = t.date.date();
            start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

fn validate(amount: Decimal, description: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Amount must be greater than 0"));
    }
    if description.trim().is_empty() {
        return Err(LedgerError::validation("Description must not be empty"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    enforce_category_type: bool,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a ledger from a stored snapshot without re-validating it.
    pub fn from_parts(categories: Vec<Category>, transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            categories,
            enforce_category_type: false,
        }
    }

    /// When enabled, add/update require an existing category whose type
    /// matches the transaction's type.
    pub fn with_category_type_check(mut self, enabled: bool) -> Self {
        self.enforce_category_type = enabled;
        self
    }

    pub fn enforces_category_type(&self) -> bool {
        self.enforce_category_type
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Registers a category. `id == 0` assigns the next free id.
    pub fn add_category(
        &mut self,
        id: i64,
        name: CategoryName,
        r#type: TransactionType,
    ) -> Result<Category> {
        let id = if id == 0 {
            self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
        } else {
            id
        };
        if self.categories.iter().any(|c| c.id == id) {
            return Err(LedgerError::validation(format!(
                "Category id {} already exists",
                id
            )));
        }
        let category = Category { id, name, r#type };
        debug!(id, name = name.key(), kind = %r#type, "category added");
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        self.add_transaction_at(new, SystemClock.now())
    }

    /// Validates and appends a transaction, filling in the id and date
    /// defaults. `now` is used when the input carries no date.
    pub fn add_transaction_at(
        &mut self,
        new: NewTransaction,
        now: NaiveDateTime,
    ) -> Result<Transaction> {
        validate(new.amount, &new.description)?;
        self.check_category(new.category_id, new.r#type)?;

        let id = if new.id == 0 {
            self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
        } else {
            if self.transaction(new.id).is_some() {
                return Err(LedgerError::validation(format!(
                    "Transaction id {} already exists",
                    new.id
                )));
            }
            new.id
        };

        let stored = Transaction {
            id,
            amount: new.amount,
            date: new.date.unwrap_or(now),
            description: new.description,
            category_id: new.category_id,
            r#type: new.r#type,
        };
        debug!(id, amount = %stored.amount, "transaction added");
        self.transactions.push(stored.clone());
        Ok(stored)
    }

    /// Replaces the stored transaction carrying `updated.id` with a fresh
    /// value. Callers holding the previous value keep an unchanged copy.
    pub fn update_transaction(&mut self, updated: Transaction) -> Result<Transaction> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == updated.id)
            .ok_or_else(|| LedgerError::transaction_not_found(updated.id))?;
        validate(updated.amount, &updated.description)?;
        self.check_category(updated.category_id, updated.r#type)?;

        debug!(id = updated.id, "transaction updated");
        self.transactions[pos] = updated.clone();
        Ok(updated)
    }

    /// Removes the first transaction equal to `tx`. Returns whether
    /// anything was removed; an absent transaction is not an error.
    pub fn delete_transaction(&mut self, tx: &Transaction) -> bool {
        match self.transactions.iter().position(|t| t == tx) {
            Some(pos) => {
                self.transactions.remove(pos);
                debug!(id = tx.id, "transaction deleted");
                true
            }
            None => false,
        }
    }

    pub fn delete_by_id(&mut self, id: i64) -> Option<Transaction> {
        let tx = self.transaction(id)?.clone();
        self.delete_transaction(&tx);
        Some(tx)
    }

    fn check_category(&self, category_id: i64, r#type: TransactionType) -> Result<()> {
        if !self.enforce_category_type {
            return Ok(());
        }
        let category = self.category_by_id(category_id)?;
        if category.r#type != r#type {
            return Err(LedgerError::validation(format!(
                "Transaction type {} does not match category '{}' ({})",
                r#type, category.name, category.r#type
            )));
        }
        Ok(())
    }
}

impl LedgerSource for Ledger {
    fn query_transactions(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<Transaction> {
        filter_by_date(&self.transactions, start, end)
    }

    fn all_transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    fn category_by_id(&self, id: i64) -> Result<Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::category_not_found(id))
    }

    fn all_categories(&self) -> Vec<Category> {
        self.categories.clone()
    }
}

/// A ledger shared between callers. Readers run concurrently; add, update
/// and delete take the lock exclusively.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> Result<R> {
        let guard = self.inner.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(f(&guard))
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> Result<R> {
        let mut guard = self.inner.write().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    /// Consistent copy of the ledger, taken under the read lock.
    pub fn snapshot(&self) -> Result<Ledger> {
        self.read(Ledger::clone)
    }
}
