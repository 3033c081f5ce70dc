// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, UNCATEGORIZED_LABEL};
use crate::filter::{Criteria, parse_month_choice};
use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::{fmt_percent, maybe_print_json, money, pretty_table};
use anyhow::Result;

pub fn handle<P: Persistence>(store: &Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("by-category", sub)) => by_category(store, sub)?,
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_criteria(sub: &clap::ArgMatches) -> Result<Criteria> {
    let mut c = Criteria::default();
    if let Some(m) = sub.get_one::<String>("month") {
        c.month = parse_month_choice(m)?;
    }
    Ok(c)
}

fn summary<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let visible = store.filtered(&month_criteria(sub)?);
    let report = aggregate::summarize(visible, store.categories());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let settings = store.settings();
    let s = &report.summary;
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                money(settings, &s.total_income),
                money(settings, &s.total_expense),
                money(settings, &s.balance),
            ]],
        )
    );

    let mut rows: Vec<Vec<String>> = report
        .categories
        .iter()
        .filter(|u| !u.spent.is_zero() || u.budget.is_some())
        .map(|u| {
            vec![
                u.label.clone(),
                money(settings, &u.spent),
                u.budget.map(|b| money(settings, &b)).unwrap_or_default(),
                fmt_percent(&u.percent),
                u.level.as_str().to_string(),
            ]
        })
        .collect();
    if !report.uncategorized.is_zero() {
        rows.push(vec![
            UNCATEGORIZED_LABEL.to_string(),
            money(settings, &report.uncategorized),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Budget", "Used", "Status"], rows)
    );
    println!("Total budget used: {}", fmt_percent(&report.budget_usage));
    Ok(())
}

fn by_category<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let visible = store.filtered(&month_criteria(sub)?);
    let data = aggregate::expenses_by_category(visible, store.categories());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let settings = store.settings();
        let rows = data
            .iter()
            .map(|c| vec![c.label.clone(), c.color.clone(), money(settings, &c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Color", "Spent"], rows));
    }
    Ok(())
}

fn cashflow<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let mut data = aggregate::cashflow_by_month(store.transactions());
    data.truncate(months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let settings = store.settings();
        let rows = data
            .iter()
            .map(|f| {
                vec![
                    f.month.clone(),
                    money(settings, &f.income),
                    money(settings, &f.expense),
                    money(settings, &(f.income - f.expense)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}
