// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// User input rejected before it reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("amount {0} exceeds the supported maximum")]
    AmountTooLarge(Decimal),
    #[error("budget must not be negative, got {0}")]
    NegativeBudget(Decimal),
    #[error("category label must not be empty")]
    EmptyLabel,
    #[error("a category labelled '{0}' already exists")]
    DuplicateLabel(String),
    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("invalid transaction type '{0}', expected income or expense")]
    InvalidType(String),
    #[error("invalid month '{0}', expected all or 1-12")]
    InvalidMonth(String),
    #[error("unsupported currency '{0}', expected BRL, USD or EUR")]
    InvalidCurrency(String),
    #[error("unsupported language '{0}', expected pt-BR or en-US")]
    InvalidLanguage(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("key-value store failure")]
    Sqlite(#[from] rusqlite::Error),
    #[error("malformed document JSON")]
    Json(#[from] serde_json::Error),
    #[error("document schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to persist document")]
    Persist(#[from] PersistError),
}
