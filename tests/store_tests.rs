// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::document::{self, CORRUPT_BACKUP_KEY, DOCUMENT_KEY, Document};
use fintrack::error::{PersistError, StoreError, ValidationError};
use fintrack::models::{AppSettings, Currency, MAX_AMOUNT, NewTransaction, TransactionType};
use fintrack::storage::{KeyValueStore, KvPersistence, MemoryKv, Persistence};
use fintrack::store::Store;
use rust_decimal::Decimal;

type MemStore = Store<KvPersistence<MemoryKv>>;

fn setup() -> MemStore {
    Store::load(KvPersistence::new(MemoryKv::new())).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn salary() -> NewTransaction {
    NewTransaction {
        description: "Salário".into(),
        amount: Decimal::from(5000),
        category_id: "salario".into(),
        date: date("2024-01-05"),
        r#type: TransactionType::Income,
    }
}

fn rent() -> NewTransaction {
    NewTransaction {
        description: "Aluguel".into(),
        amount: Decimal::from(1500),
        category_id: "moradia".into(),
        date: date("2024-01-10"),
        r#type: TransactionType::Expense,
    }
}

/// What is currently stored, decoded.
fn stored(store: &MemStore) -> Document {
    let raw = store.persistence().kv().get(DOCUMENT_KEY).unwrap().unwrap();
    document::decode(&raw).unwrap().0
}

/// Fails every write.
struct ReadOnly;

impl Persistence for ReadOnly {
    fn load(&mut self) -> Result<Option<Document>, PersistError> {
        Ok(None)
    }

    fn save(&mut self, _doc: &Document) -> Result<(), PersistError> {
        Err(PersistError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

/// Accepts the initial write, rejects everything after it.
struct FailAfterLoad {
    saves: usize,
}

impl Persistence for FailAfterLoad {
    fn load(&mut self) -> Result<Option<Document>, PersistError> {
        Ok(None)
    }

    fn save(&mut self, _doc: &Document) -> Result<(), PersistError> {
        self.saves += 1;
        if self.saves > 1 {
            return Err(PersistError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(())
    }
}

#[test]
fn fresh_store_has_default_categories_and_is_persisted() {
    let store = setup();
    assert!(store.transactions().is_empty());
    assert_eq!(store.categories().len(), 10);
    assert!(store.category("moradia").is_some());
    assert_eq!(store.settings(), &AppSettings::default());
    assert_eq!(&stored(&store), store.document());
}

#[test]
fn add_prepends_and_persists() {
    let mut store = setup();
    let first = store.add(salary()).unwrap().id.clone();
    let second = store.add(rent()).unwrap().id.clone();
    assert_ne!(first, second);
    assert_eq!(store.transactions()[0].id, second);
    assert_eq!(store.transactions()[1].id, first);
    assert_eq!(stored(&store).transactions, store.transactions());
}

#[test]
fn add_rejects_invalid_input() {
    let mut store = setup();
    let mut blank = salary();
    blank.description = "   ".into();
    let err = store.add(blank).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyDescription)
    ));

    let mut negative = rent();
    negative.amount = Decimal::from(-3);
    assert!(store.add(negative).is_err());
    assert!(store.transactions().is_empty());
    assert!(stored(&store).transactions.is_empty());
}

#[test]
fn amounts_and_budgets_above_the_maximum_are_rejected() {
    let mut store = setup();
    let mut huge = rent();
    huge.amount = MAX_AMOUNT + Decimal::ONE;
    assert!(matches!(
        store.add(huge),
        Err(StoreError::Validation(ValidationError::AmountTooLarge(_)))
    ));
    assert!(matches!(
        store.update_category_budget("moradia", Some(MAX_AMOUNT * Decimal::TEN)),
        Err(StoreError::Validation(ValidationError::AmountTooLarge(_)))
    ));
    assert!(store.transactions().is_empty());

    let mut top = rent();
    top.amount = MAX_AMOUNT;
    store.add(top.clone()).unwrap();
    store.add(top).unwrap();
    store
        .update_category_budget("moradia", Some(Decimal::new(1, 2)))
        .unwrap();
    let report = store.report();
    assert_eq!(report.summary.total_expense, MAX_AMOUNT * Decimal::TWO);
    assert_eq!(report.category("moradia").unwrap().level, fintrack::aggregate::BudgetLevel::Over);
}

#[test]
fn single_income_summary() {
    let mut store = setup();
    store.add(salary()).unwrap();
    let s = store.report().summary;
    assert_eq!(s.total_income, Decimal::from(5000));
    assert_eq!(s.total_expense, Decimal::ZERO);
    assert_eq!(s.balance, Decimal::from(5000));
}

#[test]
fn delete_restores_expense_total() {
    let mut store = setup();
    store.add(salary()).unwrap();
    let rent_id = store.add(rent()).unwrap().id.clone();
    assert_eq!(store.report().summary.total_expense, Decimal::from(1500));

    assert!(store.delete(&rent_id).unwrap());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.report().summary.total_expense, Decimal::ZERO);
    assert_eq!(stored(&store).transactions.len(), 1);
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut store = setup();
    store.add(salary()).unwrap();
    store.add(rent()).unwrap();
    let before = store.transactions().to_vec();
    assert!(!store.delete("no-such-id").unwrap());
    assert_eq!(store.transactions(), before.as_slice());
}

#[test]
fn clear_all_keeps_categories_and_settings() {
    let mut store = setup();
    store.add(salary()).unwrap();
    store.add(rent()).unwrap();
    store
        .update_category_budget("moradia", Some(Decimal::from(2000)))
        .unwrap();
    let categories = store.categories().to_vec();
    let settings = store.settings().clone();

    store.clear_all().unwrap();
    assert!(store.transactions().is_empty());
    assert_eq!(store.categories(), categories.as_slice());
    assert_eq!(store.settings(), &settings);
    assert!(stored(&store).transactions.is_empty());
}

#[test]
fn budget_update_by_id() {
    let mut store = setup();
    assert!(store
        .update_category_budget("moradia", Some(Decimal::from(2000)))
        .unwrap());
    assert_eq!(
        store.category("moradia").unwrap().budget,
        Some(Decimal::from(2000))
    );
    assert!(!store
        .update_category_budget("nope", Some(Decimal::from(1)))
        .unwrap());
    assert!(store.update_category_budget("moradia", None).unwrap());
    assert_eq!(store.category("moradia").unwrap().budget, None);
    assert!(store
        .update_category_budget("moradia", Some(Decimal::from(-1)))
        .is_err());
}

#[test]
fn rename_keeps_spend_attached() {
    let mut store = setup();
    store.add(rent()).unwrap();
    assert!(store.rename_category("moradia", "Casa").unwrap());
    let report = store.report();
    let usage = report.category("moradia").unwrap();
    assert_eq!(usage.label, "Casa");
    assert_eq!(usage.spent, Decimal::from(1500));
    assert_eq!(report.uncategorized, Decimal::ZERO);
}

#[test]
fn removed_category_spend_becomes_uncategorized() {
    let mut store = setup();
    store.add(rent()).unwrap();
    assert!(store.remove_category("moradia").unwrap());
    assert!(!store.remove_category("moradia").unwrap());
    let report = store.report();
    assert!(report.category("moradia").is_none());
    assert_eq!(report.uncategorized, Decimal::from(1500));
    assert_eq!(report.summary.total_expense, Decimal::from(1500));
}

#[test]
fn add_category_slugs_and_rejects_duplicates() {
    let mut store = setup();
    let cat = store
        .add_category("Pets & Vet", Some("#123abc"), Some(Decimal::from(300)))
        .unwrap();
    assert_eq!(cat.id, "pets-vet");
    assert_eq!(cat.budget, Some(Decimal::from(300)));

    assert!(matches!(
        store.add_category("Lazer", None, None),
        Err(StoreError::Validation(ValidationError::DuplicateLabel(_)))
    ));
    assert!(matches!(
        store.add_category("Gifts", Some("red"), None),
        Err(StoreError::Validation(ValidationError::InvalidColor(_)))
    ));
    assert!(store.rename_category("lazer", "Moradia").is_err());
}

#[test]
fn resolve_category_by_id_or_label() {
    let store = setup();
    assert_eq!(store.resolve_category("saude").unwrap().label, "Saúde");
    assert_eq!(store.resolve_category("Saúde").unwrap().id, "saude");
    assert_eq!(store.resolve_category("moradia").unwrap().id, "moradia");
    assert!(store.resolve_category("MORADIA").is_none());
    assert!(store.resolve_category("saúde").is_none());
    assert!(store.resolve_category("Unknown").is_none());
}

#[test]
fn settings_update_persists() {
    let mut store = setup();
    let next = AppSettings {
        user_name: "Ana Souza".into(),
        currency: Currency::Usd,
        ..AppSettings::default()
    };
    store.update_settings(next.clone()).unwrap();
    assert_eq!(store.settings(), &next);
    assert_eq!(stored(&store).settings, next);
}

#[test]
fn reload_reproduces_document() {
    let mut store = setup();
    store.add(salary()).unwrap();
    store.add(rent()).unwrap();
    store
        .update_category_budget("moradia", Some(Decimal::new(199950, 2)))
        .unwrap();
    let before = store.document().clone();

    let kv = store.into_persistence().into_inner();
    let reloaded = Store::load(KvPersistence::new(kv)).unwrap();
    assert_eq!(reloaded.document(), &before);
}

#[test]
fn save_then_load_round_trips() {
    let mut doc = Document::default();
    doc.settings.user_name = "Bia".into();
    doc.categories[0].budget = Some(Decimal::new(1234, 1));

    let mut p = KvPersistence::new(MemoryKv::new());
    p.save(&doc).unwrap();
    assert_eq!(p.load().unwrap(), Some(doc));
}

#[test]
fn corrupt_document_falls_back_to_defaults() {
    let kv = MemoryKv::new().with(DOCUMENT_KEY, "{\"transactions\": [oops");
    let store = Store::load(KvPersistence::new(kv)).unwrap();
    assert!(store.transactions().is_empty());
    assert_eq!(store.categories().len(), 10);

    let kv = store.persistence().kv();
    assert_eq!(
        kv.get(CORRUPT_BACKUP_KEY).unwrap().as_deref(),
        Some("{\"transactions\": [oops")
    );
    assert_eq!(&stored(&store), store.document());
}

#[test]
fn newer_schema_is_refused_and_left_alone() {
    let raw = r#"{"version": 99, "transactions": [], "categories": [], "settings": {"userName": "x"}}"#;
    let kv = MemoryKv::new().with(DOCUMENT_KEY, raw);
    let err = Store::load(KvPersistence::new(kv)).err().unwrap();
    assert!(matches!(
        err,
        StoreError::Persist(PersistError::UnsupportedVersion { found: 99, .. })
    ));
}

#[test]
fn failed_save_leaves_memory_untouched() {
    assert!(Store::load(ReadOnly).is_err());

    let mut store = Store::load(FailAfterLoad { saves: 0 }).unwrap();
    assert!(matches!(store.add(salary()), Err(StoreError::Persist(_))));
    assert!(store.transactions().is_empty());
    assert!(store.clear_all().is_err());
    assert_eq!(store.categories().len(), 10);
}
