// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::UNCATEGORIZED_LABEL;
use crate::storage::Persistence;
use crate::store::Store;
use anyhow::{Context, Result, bail};
use serde_json::json;

pub fn handle<P: Persistence>(store: &Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions<P: Persistence>(store: &Store<P>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    // Oldest first, the way a spreadsheet reads.
    let rows: Vec<_> = store
        .transactions()
        .iter()
        .rev()
        .map(|t| {
            let category = store
                .category(&t.category_id)
                .map(|c| c.label.as_str())
                .unwrap_or(UNCATEGORIZED_LABEL);
            (t, category)
        })
        .collect();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Cannot write {}", out))?;
            wtr.write_record(["id", "date", "description", "amount", "type", "category"])?;
            for (t, category) in &rows {
                let date = t.date.to_string();
                let amount = t.amount.to_string();
                wtr.write_record([
                    t.id.as_str(),
                    date.as_str(),
                    t.description.as_str(),
                    amount.as_str(),
                    t.r#type.as_str(),
                    *category,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|(t, category)| {
                    json!({
                        "id": t.id, "date": t.date, "description": t.description,
                        "amount": t.amount, "type": t.r#type, "category": category
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Cannot write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
