// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::BudgetLevel;
use crate::storage::Persistence;
use crate::store::Store;
use crate::utils::{fmt_percent, pretty_table};
use anyhow::Result;
use std::collections::HashMap;

/// Problems found in the document, as (issue, detail) pairs.
pub fn issues<P: Persistence>(store: &Store<P>) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at a category that no longer exists
    for t in store.transactions() {
        if store.category(&t.category_id).is_none() {
            rows.push((
                "dangling_category".to_string(),
                format!("{} {} ({})", t.date, t.description, t.category_id),
            ));
        }
    }

    // 2) Two categories sharing a label make label lookups ambiguous
    let mut labels: HashMap<&str, usize> = HashMap::new();
    for c in store.categories() {
        *labels.entry(c.label.as_str()).or_insert(0) += 1;
    }
    let mut dupes: Vec<_> = labels.into_iter().filter(|(_, n)| *n > 1).collect();
    dupes.sort();
    for (label, n) in dupes {
        rows.push(("duplicate_label".to_string(), format!("{} x{}", label, n)));
    }

    // 3) Budgets already exceeded
    for u in store.report().categories {
        if u.level == BudgetLevel::Over {
            rows.push((
                "over_budget".to_string(),
                format!("{} {}", u.label, fmt_percent(&u.percent)),
            ));
        }
    }
    rows
}

pub fn handle<P: Persistence>(store: &Store<P>) -> Result<()> {
    let rows = issues(store);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = rows.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
