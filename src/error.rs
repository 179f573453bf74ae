// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by the ledger and the report engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Input rejected before it reached the ledger.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A running sum left the representable `Decimal` range.
    #[error("Amount overflow while computing {0}")]
    Overflow(&'static str),

    #[error("Ledger lock poisoned by a panicked writer")]
    LockPoisoned,
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn transaction_not_found(id: i64) -> Self {
        LedgerError::NotFound {
            entity: "Transaction",
            id,
        }
    }

    pub fn category_not_found(id: i64) -> Self {
        LedgerError::NotFound {
            entity: "Category",
            id,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
