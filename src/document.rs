// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The persisted document and its schema history.
//!
//! Three shapes have been written over time:
//!
//! * v0: a bare array of transactions under [`LEGACY_TRANSACTIONS_KEY`],
//!   each naming its category by label.
//! * v1: `{transactions, categories, settings}` under [`DOCUMENT_KEY`] with no
//!   `version` field, still joined by label.
//! * v2: the current shape, versioned, with transactions joined by category id.
//!
//! [`decode`] accepts any of them and returns a v2 document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::error::PersistError;
use crate::models::{
    AppSettings, Category, FALLBACK_COLOR, MAX_AMOUNT, Transaction, TransactionType, category_slug,
    default_categories,
};

pub const SCHEMA_VERSION: u32 = 2;
pub const DOCUMENT_KEY: &str = "fintrack_document";
pub const LEGACY_TRANSACTIONS_KEY: &str = "fintrack_transactions_v1";
pub const CORRUPT_BACKUP_KEY: &str = "fintrack_document.corrupt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub settings: AppSettings,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            transactions: Vec::new(),
            categories: default_categories(),
            settings: AppSettings::default(),
        }
    }
}

#[derive(Deserialize)]
struct LegacyTransaction {
    #[serde(default)]
    id: String,
    description: String,
    amount: Decimal,
    category: String,
    date: String,
    #[serde(rename = "type")]
    r#type: TransactionType,
}

#[derive(Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    transactions: Vec<LegacyTransaction>,
    #[serde(default = "default_categories")]
    categories: Vec<Category>,
    #[serde(default)]
    settings: AppSettings,
}

fn malformed(msg: &str) -> PersistError {
    PersistError::Json(<serde_json::Error as serde::de::Error>::custom(msg))
}

/// Parse a stored blob of any known shape. Returns the current-schema
/// document together with the version it was read as.
///
/// Unparseable input is reported as [`PersistError::Json`]; a version newer
/// than [`SCHEMA_VERSION`] as [`PersistError::UnsupportedVersion`].
pub fn decode(raw: &str) -> Result<(Document, u32), PersistError> {
    let value: Value = serde_json::from_str(raw)?;
    let version = match &value {
        Value::Array(_) => 0,
        Value::Object(map) => match map.get("version") {
            None => 1,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| malformed("document version is not a number"))?,
        },
        _ => return Err(malformed("document is neither an object nor an array")),
    };
    if version > SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }
    if version == SCHEMA_VERSION {
        let mut doc: Document = serde_json::from_value(value)?;
        normalize(&mut doc)?;
        return Ok((doc, version));
    }

    let legacy = if version == 0 {
        LegacyDocument {
            transactions: serde_json::from_value(value)?,
            categories: default_categories(),
            settings: AppSettings::default(),
        }
    } else {
        serde_json::from_value(value)?
    };
    let mut categories = legacy.categories;
    let transactions = migrate_transactions(legacy.transactions, &mut categories);
    let mut doc = Document {
        version: SCHEMA_VERSION,
        transactions,
        categories,
        settings: legacy.settings,
    };
    normalize(&mut doc)?;
    Ok((doc, version))
}

pub fn encode(doc: &Document) -> Result<String, PersistError> {
    Ok(serde_json::to_string(doc)?)
}

/// Rewrite label-joined transactions as id-joined ones. A label without a
/// matching category gets a new category so its spend stays visible.
fn migrate_transactions(
    legacy: Vec<LegacyTransaction>,
    categories: &mut Vec<Category>,
) -> Vec<Transaction> {
    let mut out = Vec::with_capacity(legacy.len());
    for lt in legacy {
        let Some(date) = legacy_date(&lt.date) else {
            warn!(id = %lt.id, date = %lt.date, "Skipping legacy transaction with unreadable date");
            continue;
        };
        let category_id = match categories.iter().find(|c| c.label == lt.category) {
            Some(c) => c.id.clone(),
            None => {
                let id = category_slug(&lt.category, categories.iter().map(|c| c.id.as_str()));
                info!(label = %lt.category, id = %id, "Creating category for unmatched legacy label");
                categories.push(Category::new(&id, &lt.category, FALLBACK_COLOR));
                id
            }
        };
        out.push(Transaction {
            id: lt.id,
            description: lt.description,
            amount: lt.amount,
            category_id,
            date,
            r#type: lt.r#type,
        });
    }
    out
}

/// Enforce what the store relies on: non-negative amounts within
/// [`MAX_AMOUNT`] and unique, non-empty transaction ids.
fn normalize(doc: &mut Document) -> Result<(), PersistError> {
    let mut seen_ids = HashSet::new();
    for t in &mut doc.transactions {
        // Older builds accepted signed input; the type carries the sign.
        t.amount = t.amount.abs();
        if t.amount > MAX_AMOUNT {
            return Err(malformed("transaction amount out of range"));
        }
        if t.id.is_empty() || seen_ids.contains(&t.id) {
            let fresh = loop {
                let id = uuid::Uuid::new_v4().to_string();
                if !seen_ids.contains(&id) {
                    break id;
                }
            };
            warn!(old = %t.id, new = %fresh, "Replacing empty or duplicate transaction id");
            t.id = fresh;
        }
        seen_ids.insert(t.id.clone());
    }
    if doc
        .categories
        .iter()
        .any(|c| c.budget.is_some_and(|b| b > MAX_AMOUNT))
    {
        return Err(malformed("category budget out of range"));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn legacy_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
