// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::{category_for, maybe_print_json, money, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<P: Persistence>(store: &mut Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let label = sub.get_one::<String>("label").unwrap();
            let color = sub.get_one::<String>("color").map(|s| s.trim());
            let budget = sub
                .get_one::<String>("budget")
                .map(|s| parse_decimal(s))
                .transpose()?;
            let cat = store.add_category(label, color, budget)?;
            println!("Added category '{}' (id: {})", cat.label, cat.id);
        }
        Some(("list", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &store.categories())? {
                let settings = store.settings();
                let data = store
                    .categories()
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.label.clone(),
                            c.color.clone(),
                            c.budget.map(|b| money(settings, &b)).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Category", "Color", "Budget"], data)
                );
            }
        }
        Some(("rename", sub)) => {
            let id = category_for(store, sub.get_one::<String>("category").unwrap())?
                .id
                .clone();
            let label = sub.get_one::<String>("label").unwrap();
            store.rename_category(&id, label)?;
            println!("Renamed category {} to '{}'", id, label.trim());
        }
        Some(("rm", sub)) => {
            let id = category_for(store, sub.get_one::<String>("category").unwrap())?
                .id
                .clone();
            store.remove_category(&id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
