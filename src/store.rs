// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The authoritative in-memory copy of the document.
//!
//! Every mutator builds the next document, hands it to the [`Persistence`]
//! backend, and only replaces the in-memory copy once the write succeeded.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::aggregate::{self, Report};
use crate::document::Document;
use crate::error::{StoreError, ValidationError};
use crate::filter::{self, Criteria};
use crate::models::{
    AppSettings, Category, FALLBACK_COLOR, NewTransaction, Transaction, category_slug,
    validate_budget, validate_color, validate_label,
};
use crate::storage::Persistence;

pub struct Store<P: Persistence> {
    persistence: P,
    doc: Document,
}

impl<P: Persistence> Store<P> {
    /// Read the stored document, or start from the defaults when there is
    /// none, and write it back in the current schema.
    pub fn load(mut persistence: P) -> Result<Self, StoreError> {
        let doc = match persistence.load()? {
            Some(doc) => doc,
            None => {
                info!("No stored document; starting with default categories");
                Document::default()
            }
        };
        persistence.save(&doc)?;
        debug!(
            transactions = doc.transactions.len(),
            categories = doc.categories.len(),
            "Store loaded"
        );
        Ok(Self { persistence, doc })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.doc.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.doc.categories
    }

    pub fn settings(&self) -> &AppSettings {
        &self.doc.settings
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.doc.transactions.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.doc.categories.iter().find(|c| c.id == id)
    }

    /// Look a category up by id, then by exact label.
    pub fn resolve_category(&self, key: &str) -> Option<&Category> {
        let cats = &self.doc.categories;
        cats.iter()
            .find(|c| c.id == key)
            .or_else(|| cats.iter().find(|c| c.label == key))
    }

    pub fn report(&self) -> Report {
        aggregate::summarize(&self.doc.transactions, &self.doc.categories)
    }

    pub fn filtered(&self, criteria: &Criteria) -> Vec<&Transaction> {
        filter::filter(&self.doc.transactions, criteria)
    }

    pub fn add(&mut self, new: NewTransaction) -> Result<&Transaction, StoreError> {
        new.validate()?;
        let tx = Transaction {
            id: self.fresh_id(),
            description: new.description.trim().to_string(),
            amount: new.amount,
            category_id: new.category_id,
            date: new.date,
            r#type: new.r#type,
        };
        info!(id = %tx.id, kind = %tx.r#type, amount = %tx.amount, "Adding transaction");
        let mut next = self.doc.clone();
        next.transactions.insert(0, tx);
        self.commit(next)?;
        Ok(&self.doc.transactions[0])
    }

    /// Returns whether a transaction was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.doc.transactions.iter().position(|t| t.id == id) else {
            debug!(id, "Delete of unknown transaction ignored");
            return Ok(false);
        };
        let mut next = self.doc.clone();
        next.transactions.remove(pos);
        self.commit(next)?;
        info!(id, "Deleted transaction");
        Ok(true)
    }

    /// Replace a category's budget; `None` stops tracking it.
    pub fn update_category_budget(
        &mut self,
        category_id: &str,
        budget: Option<Decimal>,
    ) -> Result<bool, StoreError> {
        validate_budget(budget)?;
        let Some(pos) = self.category_pos(category_id) else {
            debug!(category_id, "Budget update for unknown category ignored");
            return Ok(false);
        };
        let mut next = self.doc.clone();
        next.categories[pos].budget = budget;
        self.commit(next)?;
        info!(category_id, budget = ?budget, "Updated category budget");
        Ok(true)
    }

    /// Drop every transaction. Categories and settings stay.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let removed = self.doc.transactions.len();
        let mut next = self.doc.clone();
        next.transactions.clear();
        self.commit(next)?;
        info!(removed, "Cleared all transactions");
        Ok(())
    }

    pub fn add_category(
        &mut self,
        label: &str,
        color: Option<&str>,
        budget: Option<Decimal>,
    ) -> Result<&Category, StoreError> {
        let label = label.trim();
        validate_label(label)?;
        self.ensure_label_free(label, None)?;
        let color = color.unwrap_or(FALLBACK_COLOR);
        validate_color(color)?;
        validate_budget(budget)?;

        let id = category_slug(label, self.doc.categories.iter().map(|c| c.id.as_str()));
        let mut category = Category::new(&id, label, color);
        category.budget = budget;
        let mut next = self.doc.clone();
        next.categories.push(category);
        self.commit(next)?;
        info!(id = %id, label, "Added category");
        Ok(&self.doc.categories[self.doc.categories.len() - 1])
    }

    /// Transactions follow the category through a rename since they join by id.
    pub fn rename_category(&mut self, category_id: &str, label: &str) -> Result<bool, StoreError> {
        let label = label.trim();
        validate_label(label)?;
        let Some(pos) = self.category_pos(category_id) else {
            return Ok(false);
        };
        self.ensure_label_free(label, Some(category_id))?;
        let mut next = self.doc.clone();
        next.categories[pos].label = label.to_string();
        self.commit(next)?;
        info!(category_id, label, "Renamed category");
        Ok(true)
    }

    /// Transactions that referenced the category keep its id and are
    /// reported as uncategorized from then on.
    pub fn remove_category(&mut self, category_id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.category_pos(category_id) else {
            return Ok(false);
        };
        let mut next = self.doc.clone();
        next.categories.remove(pos);
        self.commit(next)?;
        info!(category_id, "Removed category");
        Ok(true)
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> Result<(), StoreError> {
        let mut next = self.doc.clone();
        next.settings = settings;
        self.commit(next)?;
        info!("Updated settings");
        Ok(())
    }

    fn commit(&mut self, next: Document) -> Result<(), StoreError> {
        self.persistence.save(&next)?;
        self.doc = next;
        Ok(())
    }

    fn category_pos(&self, id: &str) -> Option<usize> {
        self.doc.categories.iter().position(|c| c.id == id)
    }

    fn ensure_label_free(&self, label: &str, except: Option<&str>) -> Result<(), ValidationError> {
        let clash = self
            .doc
            .categories
            .iter()
            .any(|c| Some(c.id.as_str()) != except && c.label == label);
        if clash {
            return Err(ValidationError::DuplicateLabel(label.to_string()));
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if self.transaction(&id).is_none() {
                return id;
            }
        }
    }
}
