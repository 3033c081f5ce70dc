// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Datelike;

use crate::error::ValidationError;
use crate::models::{Transaction, TransactionType};

/// Either every value (`all`) or exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == value,
        }
    }
}

fn is_all(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("all")
}

pub fn parse_type_choice(s: &str) -> Result<Choice<TransactionType>, ValidationError> {
    if is_all(s) {
        return Ok(Choice::All);
    }
    Ok(Choice::Only(s.parse()?))
}

/// `all`, or a month number written as `1`..`12` or `01`..`12`.
pub fn parse_month_choice(s: &str) -> Result<Choice<u32>, ValidationError> {
    if is_all(s) {
        return Ok(Choice::All);
    }
    match s.trim().parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(Choice::Only(m)),
        _ => Err(ValidationError::InvalidMonth(s.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Case-insensitive substring of the description; empty matches all.
    pub search: String,
    /// Category id.
    pub category: Choice<String>,
    pub kind: Choice<TransactionType>,
    /// Calendar month of the transaction date, 1-12.
    pub month: Choice<u32>,
}

impl Criteria {
    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_string();
        self
    }

    pub fn category(mut self, id: &str) -> Self {
        self.category = Choice::Only(id.to_string());
        self
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Choice::Only(kind);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Choice::Only(month);
        self
    }
}

pub fn matches(t: &Transaction, c: &Criteria) -> bool {
    matches_lowered(t, c, &c.search.to_lowercase())
}

fn matches_lowered(t: &Transaction, c: &Criteria, needle: &str) -> bool {
    (needle.is_empty() || t.description.to_lowercase().contains(needle))
        && c.category.admits(&t.category_id)
        && c.kind.admits(&t.r#type)
        && c.month.admits(&t.date.month())
}

/// The transactions matching `criteria`, in their original order.
pub fn filter<'a, I>(transactions: I, criteria: &Criteria) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let needle = criteria.search.to_lowercase();
    transactions
        .into_iter()
        .filter(|t| matches_lowered(t, criteria, &needle))
        .collect()
}
