// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals, budget usage and chart series derived from a transaction list.
//! Nothing here is persisted; every function is a pure fold.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Category, FALLBACK_COLOR, Transaction, TransactionType};

/// Usage at or above this percentage of the budget is a warning.
pub const WARNING_PERCENT: Decimal = Decimal::from_parts(85, 0, 0, false, 0);

pub const UNCATEGORIZED_LABEL: &str = "Sem categoria";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    /// No positive budget set.
    Untracked,
    Ok,
    Warning,
    Over,
}

impl BudgetLevel {
    pub fn for_percent(percent: Decimal, tracked: bool) -> Self {
        if !tracked {
            Self::Untracked
        } else if percent >= Decimal::ONE_HUNDRED {
            Self::Over
        } else if percent >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Untracked => "-",
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Over => "over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub id: String,
    pub label: String,
    pub color: String,
    pub budget: Option<Decimal>,
    pub spent: Decimal,
    /// `spent / budget * 100`, unbounded; `0` when no budget is tracked.
    pub percent: Decimal,
    pub level: BudgetLevel,
}

impl CategoryUsage {
    pub fn new(category: &Category, spent: Decimal) -> Self {
        let tracked = category.tracked_budget();
        let percent = budget_percent(spent, category.budget);
        Self {
            id: category.id.clone(),
            label: category.label.clone(),
            color: category.color.clone(),
            budget: category.budget,
            spent,
            percent,
            level: BudgetLevel::for_percent(percent, tracked.is_some()),
        }
    }

    pub fn remaining(&self) -> Option<Decimal> {
        if self.level == BudgetLevel::Untracked {
            return None;
        }
        self.budget.map(|b| b - self.spent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: Summary,
    pub categories: Vec<CategoryUsage>,
    /// Expense total whose category id matches no category.
    pub uncategorized: Decimal,
    /// Spent across budgeted categories as a percentage of their combined budget.
    pub budget_usage: Decimal,
}

impl Report {
    pub fn category(&self, id: &str) -> Option<&CategoryUsage> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// `spent / budget * 100`. A tiny budget can push the ratio past what
/// `Decimal` holds; that saturates at `Decimal::MAX`, which still reads as over.
pub fn budget_percent(spent: Decimal, budget: Option<Decimal>) -> Decimal {
    match budget {
        Some(b) if b > Decimal::ZERO => spent
            .checked_div(b)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX),
        _ => Decimal::ZERO,
    }
}

pub fn summary<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut s = Summary::default();
    for t in transactions {
        match t.r#type {
            TransactionType::Income => s.total_income += t.amount,
            TransactionType::Expense => s.total_expense += t.amount,
        }
        s.balance += t.signed_amount();
    }
    s
}

pub fn summarize<'a, I>(transactions: I, categories: &[Category]) -> Report
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let transactions: Vec<&Transaction> = transactions.into_iter().collect();
    let totals = summary(transactions.iter().copied());
    let mut spent: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense)
    {
        *spent.entry(t.category_id.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }

    let usage: Vec<CategoryUsage> = categories
        .iter()
        .map(|c| {
            let s = spent.remove(c.id.as_str()).unwrap_or(Decimal::ZERO);
            CategoryUsage::new(c, s)
        })
        .collect();
    // Whatever is left matched no category.
    let uncategorized: Decimal = spent.values().copied().sum();

    let (budgeted_spent, budget_total) = usage
        .iter()
        .filter_map(|u| u.budget.filter(|b| *b > Decimal::ZERO).map(|b| (u.spent, b)))
        .fold((Decimal::ZERO, Decimal::ZERO), |(s, b), (us, ub)| (s + us, b + ub));

    Report {
        summary: totals,
        categories: usage,
        uncategorized,
        budget_usage: budget_percent(budgeted_spent, Some(budget_total)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub label: String,
    pub color: String,
    pub total: Decimal,
}

/// Expense totals per category, largest first. Spend whose category is gone
/// is grouped under [`UNCATEGORIZED_LABEL`].
pub fn expenses_by_category<'a, I>(transactions: I, categories: &[Category]) -> Vec<CategorySpend>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_id: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions {
        if t.r#type == TransactionType::Expense {
            *by_id.entry(t.category_id.as_str()).or_insert(Decimal::ZERO) += t.amount;
        }
    }

    let mut uncategorized = Decimal::ZERO;
    let mut out = Vec::new();
    for (id, total) in by_id {
        match categories.iter().find(|c| c.id == id) {
            Some(c) => out.push(CategorySpend {
                label: c.label.clone(),
                color: c.color.clone(),
                total,
            }),
            None => uncategorized += total,
        }
    }
    if !uncategorized.is_zero() {
        out.push(CategorySpend {
            label: UNCATEGORIZED_LABEL.to_string(),
            color: FALLBACK_COLOR.to_string(),
            total: uncategorized,
        });
    }
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.label.cmp(&b.label)));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthFlow {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income and expense per calendar month, newest month first.
pub fn cashflow_by_month<'a, I>(transactions: I) -> Vec<MonthFlow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = map
            .entry(t.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }
    map.into_iter()
        .rev()
        .map(|(month, (income, expense))| MonthFlow {
            month,
            income,
            expense,
        })
        .collect()
}
