// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use fintrack::storage::{KvPersistence, MemoryKv};
use fintrack::store::Store;
use fintrack::utils::Confirm;
use fintrack::{cli, commands::transactions};

type MemStore = Store<KvPersistence<MemoryKv>>;

fn setup() -> MemStore {
    let mut store = Store::load(KvPersistence::new(MemoryKv::new())).unwrap();
    for args in [
        ["Salário", "5000", "income", "Salário", "2025-01-05"],
        ["Aluguel", "1500", "expense", "moradia", "2025-01-10"],
        ["Mercado", "320.40", "expense", "alimentacao", "2025-02-03"],
    ] {
        let [desc, amount, kind, cat, date] = args;
        let matches = cli::build_cli().get_matches_from([
            "fintrack", "tx", "add", "-d", desc, "-a", amount, "-t", kind, "-c", cat, "--date",
            date,
        ]);
        let (_, tx_m) = matches.subcommand().unwrap();
        let (_, add_m) = tx_m.subcommand().unwrap();
        let new = transactions::new_transaction(&store, add_m).unwrap();
        store.add(new).unwrap();
    }
    store
}

fn list_rows(store: &MemStore, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["fintrack", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(store, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

struct Scripted(bool);

impl Confirm for Scripted {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[test]
fn list_limit_respected() {
    let store = setup();
    let rows = list_rows(&store, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "Mercado");
    assert_eq!(rows[1].description, "Aluguel");
}

#[test]
fn list_filters_resolve_labels() {
    let store = setup();
    let rows = list_rows(&store, &["--month", "01", "--type", "expense"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Moradia");
    assert_eq!(rows[0].r#type, "EXPENSE");

    let rows = list_rows(&store, &["--category", "Alimentação"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Mercado");

    let rows = list_rows(&store, &["--search", "SAL", "--category", "all", "--type", "all"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Salário");
}

#[test]
fn list_rejects_bad_filters() {
    let store = setup();
    for args in [
        ["--month", "13"],
        ["--type", "transfer"],
        ["--category", "nope"],
        ["--category", "MORADIA"],
    ] {
        let matches = cli::build_cli().get_matches_from(
            ["fintrack", "tx", "list"].into_iter().chain(args),
        );
        let (_, tx_m) = matches.subcommand().unwrap();
        let (_, list_m) = tx_m.subcommand().unwrap();
        assert!(transactions::query_rows(&store, list_m).is_err());
    }
}

#[test]
fn add_rejects_unknown_category_and_negative_amount() {
    let store = setup();
    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "add", "-d", "X", "-a", "10", "-c", "Unknown",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, add_m) = tx_m.subcommand().unwrap();
    assert!(transactions::new_transaction(&store, add_m).is_err());

    let matches = cli::build_cli().get_matches_from([
        "fintrack", "tx", "add", "-d", "X", "--amount=-10", "-c", "lazer",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, add_m) = tx_m.subcommand().unwrap();
    let new = transactions::new_transaction(&store, add_m).unwrap();
    let mut store = store;
    assert!(store.add(new).is_err());
    assert_eq!(store.transactions().len(), 3);
}

#[test]
fn clear_respects_confirmation() {
    let mut store = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "clear"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, clear_m) = tx_m.subcommand().unwrap();

    assert!(!transactions::clear(&mut store, clear_m, &mut Scripted(false)).unwrap());
    assert_eq!(store.transactions().len(), 3);

    assert!(transactions::clear(&mut store, clear_m, &mut Scripted(true)).unwrap());
    assert!(store.transactions().is_empty());
    assert_eq!(store.categories().len(), 10);
}

#[test]
fn clear_with_yes_skips_prompt() {
    let mut store = setup();
    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "clear", "--yes"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, clear_m) = tx_m.subcommand().unwrap();
    assert!(transactions::clear(&mut store, clear_m, &mut Scripted(false)).unwrap());
    assert!(store.transactions().is_empty());
}
