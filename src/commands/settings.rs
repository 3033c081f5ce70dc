// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AppSettings;
use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::{Result, bail};

pub fn handle<P: Persistence>(store: &mut Store<P>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let next = updated(store.settings(), sub)?;
            store.update_settings(next)?;
            show(store.settings());
        }
        _ => show(store.settings()),
    }
    Ok(())
}

pub fn updated(current: &AppSettings, sub: &clap::ArgMatches) -> Result<AppSettings> {
    let mut next = current.clone();
    if let Some(name) = sub.get_one::<String>("name") {
        let name = name.trim();
        if name.is_empty() {
            bail!("Name must not be empty");
        }
        next.user_name = name.to_string();
    }
    if let Some(c) = sub.get_one::<String>("currency") {
        next.currency = c.parse()?;
    }
    if let Some(l) = sub.get_one::<String>("language") {
        next.language = l.parse()?;
    }
    Ok(next)
}

fn show(s: &AppSettings) {
    println!(
        "{}",
        pretty_table(
            &["Name", "Currency", "Language"],
            vec![vec![
                s.user_name.clone(),
                s.currency.code().to_string(),
                s.language.tag().to_string(),
            ]],
        )
    );
}
