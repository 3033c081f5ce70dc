// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::{Choice, Criteria, parse_month_choice, parse_type_choice};
use crate::models::NewTransaction;
use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::{
    Confirm, StdinConfirm, category_for, fmt_date, maybe_print_json, money, parse_date,
    parse_decimal, pretty_table, today,
};
use anyhow::Result;
use serde::Serialize;

pub fn handle<P: Persistence>(store: &mut Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        Some(("clear", sub)) => {
            clear(store, sub, &mut StdinConfirm)?;
        }
        _ => {}
    }
    Ok(())
}

pub fn new_transaction<P: Persistence>(
    store: &Store<P>,
    sub: &clap::ArgMatches,
) -> Result<NewTransaction> {
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let r#type = sub.get_one::<String>("type").unwrap().parse()?;
    let category = category_for(store, sub.get_one::<String>("category").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    Ok(NewTransaction {
        description: description.to_string(),
        amount,
        category_id: category.id.clone(),
        date,
        r#type,
    })
}

fn add<P: Persistence>(store: &mut Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let new = new_transaction(store, sub)?;
    let tx = store.add(new)?;
    println!(
        "Recorded {} {} on {} '{}' (id: {})",
        tx.r#type, tx.amount, tx.date, tx.description, tx.id
    );
    Ok(())
}

pub fn criteria<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<Criteria> {
    let mut c = Criteria::default();
    if let Some(s) = sub.get_one::<String>("search") {
        c.search = s.clone();
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        if !cat.trim().eq_ignore_ascii_case("all") {
            c.category = Choice::Only(category_for(store, cat)?.id.clone());
        }
    }
    if let Some(t) = sub.get_one::<String>("type") {
        c.kind = parse_type_choice(t)?;
    }
    if let Some(m) = sub.get_one::<String>("month") {
        c.month = parse_month_choice(m)?;
    }
    Ok(c)
}

fn list<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let settings = store.settings();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let sign = if r.r#type == "INCOME" { "+" } else { "-" };
                vec![
                    r.id.clone(),
                    fmt_date(&r.date, settings.language),
                    r.description.clone(),
                    format!("{} {}", sign, money(settings, &r.amount)),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Description", "Amount", "Category"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: chrono::NaiveDate,
    pub description: String,
    pub amount: rust_decimal::Decimal,
    #[serde(rename = "type")]
    pub r#type: String,
    pub category: String,
}

pub fn query_rows<P: Persistence>(
    store: &Store<P>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let criteria = criteria(store, sub)?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    let data = store
        .filtered(&criteria)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date,
            description: t.description.clone(),
            amount: t.amount,
            r#type: t.r#type.to_string(),
            category: store
                .category(&t.category_id)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| crate::aggregate::UNCATEGORIZED_LABEL.to_string()),
        })
        .collect();
    Ok(data)
}

fn remove<P: Persistence>(store: &mut Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    if store.delete(id)? {
        println!("Removed transaction {}", id);
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}

/// Returns whether the transactions were cleared.
pub fn clear<P: Persistence>(
    store: &mut Store<P>,
    sub: &clap::ArgMatches,
    confirm: &mut dyn Confirm,
) -> Result<bool> {
    let count = store.transactions().len();
    let prompt = format!(
        "Delete ALL {} transactions? This cannot be undone.",
        count
    );
    if !sub.get_flag("yes") && !confirm.confirm(&prompt)? {
        println!("Nothing deleted");
        return Ok(false);
    }
    store.clear_all()?;
    println!("Deleted {} transactions", count);
    Ok(true)
}
