// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, BudgetLevel, CategoryUsage};
use crate::filter::{Criteria, parse_month_choice};
use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::{category_for, fmt_percent, maybe_print_json, money, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<P: Persistence>(store: &mut Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("clear", sub)) => clear(store, sub)?,
        Some(("status", sub)) => status(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set<P: Persistence>(store: &mut Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let cat = category_for(store, sub.get_one::<String>("category").unwrap())?;
    let (id, label) = (cat.id.clone(), cat.label.clone());
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    store.update_category_budget(&id, Some(amount))?;
    println!("Budget set for {} = {}", label, money(store.settings(), &amount));
    Ok(())
}

fn clear<P: Persistence>(store: &mut Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let cat = category_for(store, sub.get_one::<String>("category").unwrap())?;
    let (id, label) = (cat.id.clone(), cat.label.clone());
    store.update_category_budget(&id, None)?;
    println!("Budget cleared for {}", label);
    Ok(())
}

/// Budgeted categories with their usage, optionally limited to one month.
pub fn budget_rows<P: Persistence>(
    store: &Store<P>,
    sub: &clap::ArgMatches,
) -> Result<Vec<CategoryUsage>> {
    let mut criteria = Criteria::default();
    if let Some(m) = sub.get_one::<String>("month") {
        criteria.month = parse_month_choice(m)?;
    }
    let visible = store.filtered(&criteria);
    let report = aggregate::summarize(visible, store.categories());
    Ok(report
        .categories
        .into_iter()
        .filter(|u| u.level != BudgetLevel::Untracked)
        .collect())
}

fn status<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let data = budget_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let settings = store.settings();
        let rows = data
            .iter()
            .map(|u| {
                vec![
                    u.label.clone(),
                    u.budget.map(|b| money(settings, &b)).unwrap_or_default(),
                    money(settings, &u.spent),
                    fmt_percent(&u.percent),
                    u.level.as_str().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Used", "Status"], rows)
        );
    }
    Ok(())
}
