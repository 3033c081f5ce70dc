// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Colour used for categories created without one, and for spend that
/// resolves to no category.
pub const FALLBACK_COLOR: &str = "#94a3b8";

/// Largest amount or budget accepted (one quadrillion). Keeps every sum the
/// aggregation engine can form well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(ValidationError::InvalidType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
}

impl Transaction {
    /// Contribution of this transaction to the balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.r#type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A transaction as submitted by the user, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub category_id: String,
    pub date: NaiveDate,
    pub r#type: TransactionType,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        validate_amount(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Decimal>,
}

impl Category {
    pub fn new(id: &str, label: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            budget: None,
        }
    }

    /// The budget, if one is tracked. Zero and negative ceilings count as none.
    pub fn tracked_budget(&self) -> Option<Decimal> {
        self.budget.filter(|b| *b > Decimal::ZERO)
    }
}

pub fn validate_label(label: &str) -> Result<(), ValidationError> {
    if label.trim().is_empty() {
        return Err(ValidationError::EmptyLabel);
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !HEX_COLOR.is_match(color) {
        return Err(ValidationError::InvalidColor(color.to_string()));
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(())
}

pub fn validate_budget(budget: Option<Decimal>) -> Result<(), ValidationError> {
    match budget {
        Some(b) if b < Decimal::ZERO => Err(ValidationError::NegativeBudget(b)),
        Some(b) if b > MAX_AMOUNT => Err(ValidationError::AmountTooLarge(b)),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    #[serde(rename = "BRL")]
    Brl,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Brl => "BRL",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Brl => "R$",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::Brl),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(ValidationError::InvalidCurrency(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::EnUs => "en-US",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt-br" => Ok(Self::PtBr),
            "en-us" => Ok(Self::EnUs),
            _ => Err(ValidationError::InvalidLanguage(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub user_name: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            user_name: "Usuário".to_string(),
            currency: Currency::default(),
            language: Language::default(),
        }
    }
}

/// Categories every new document starts with.
pub fn default_categories() -> Vec<Category> {
    [
        ("alimentacao", "Alimentação", "#3b82f6"),
        ("lazer", "Lazer", "#10b981"),
        ("moradia", "Moradia", "#6366f1"),
        ("transporte", "Transporte", "#f59e0b"),
        ("saude", "Saúde", "#ef4444"),
        ("educacao", "Educação", "#8b5cf6"),
        ("salario", "Salário", "#10b981"),
        ("outros", "Outros", "#94a3b8"),
        ("investimentos", "Investimentos", "#6366f1"),
        ("assinaturas", "Assinaturas", "#f43f5e"),
    ]
    .into_iter()
    .map(|(id, label, color)| Category::new(id, label, color))
    .collect()
}

/// Derive a stable category id from a display label, e.g. "Saúde" -> "saude".
/// The result is made unique against `taken` by suffixing `-2`, `-3`, ...
pub fn category_slug<'a, I>(label: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut base = String::new();
    for ch in label.trim().chars().flat_map(|c| c.to_lowercase()) {
        let folded = match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            c => c,
        };
        if folded.is_ascii_alphanumeric() {
            base.push(folded);
        } else if !base.is_empty() && !base.ends_with('-') {
            base.push('-');
        }
    }
    while base.ends_with('-') {
        base.pop();
    }
    if base.is_empty() {
        base.push_str("categoria");
    }

    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_folds_accents() {
        assert_eq!(category_slug("Saúde", []), "saude");
        assert_eq!(category_slug("Educação", []), "educacao");
        assert_eq!(category_slug("  Pets & Vet ", []), "pets-vet");
    }

    #[test]
    fn slug_avoids_taken_ids() {
        assert_eq!(category_slug("Lazer", ["lazer"]), "lazer-2");
        assert_eq!(category_slug("Lazer", ["lazer", "lazer-2"]), "lazer-3");
        assert_eq!(category_slug("!!!", []), "categoria");
    }

    #[test]
    fn expense_counts_against_balance() {
        let mut t = Transaction {
            id: "1".into(),
            description: "Luz".into(),
            amount: Decimal::new(1050, 1),
            category_id: "moradia".into(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            r#type: TransactionType::Expense,
        };
        assert_eq!(t.signed_amount(), Decimal::new(-1050, 1));
        t.r#type = TransactionType::Income;
        assert_eq!(t.signed_amount(), Decimal::new(1050, 1));
    }

    #[test]
    fn zero_budget_is_untracked() {
        let mut c = Category::new("x", "X", FALLBACK_COLOR);
        c.budget = Some(Decimal::ZERO);
        assert_eq!(c.tracked_budget(), None);
    }
}
