// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use accord_app::{AccountRecord, ContactRecord, KnowledgeArticle, RecordId};
use accord_store::Store;
use accord_tui::WorkspaceSnapshot;
use anyhow::Result;

/// Applies UI mutations to the in-memory store. Missing ids are ignored by
/// the store itself, so only duplicate creates surface as errors.
pub struct StoreRuntime<'a> {
    store: &'a mut Store,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }
}

impl accord_tui::AppRuntime for StoreRuntime<'_> {
    fn load_workspace(&mut self) -> Result<WorkspaceSnapshot> {
        Ok(WorkspaceSnapshot {
            dashboard: self.store.dashboard().records().to_vec(),
            accounts: self.store.accounts().records().to_vec(),
            contacts: self.store.contacts().records().to_vec(),
            reports: self.store.reports().to_vec(),
            knowledge: self.store.knowledge().to_vec(),
        })
    }

    fn create_account(&mut self, record: AccountRecord) -> Result<()> {
        self.store.accounts_mut().create(record)?;
        Ok(())
    }

    fn update_account(&mut self, record: AccountRecord) -> Result<()> {
        self.store.accounts_mut().update(record);
        Ok(())
    }

    fn delete_account(&mut self, id: RecordId) -> Result<()> {
        self.store.accounts_mut().delete(id);
        Ok(())
    }

    fn reorder_accounts(&mut self, active: RecordId, over: RecordId) -> Result<()> {
        self.store.accounts_mut().reorder(active, over);
        Ok(())
    }

    fn create_contact(&mut self, record: ContactRecord) -> Result<()> {
        self.store.contacts_mut().create(record)?;
        Ok(())
    }

    fn update_contact(&mut self, record: ContactRecord) -> Result<()> {
        self.store.contacts_mut().update(record);
        Ok(())
    }

    fn delete_contact(&mut self, id: RecordId) -> Result<()> {
        self.store.contacts_mut().delete(id);
        Ok(())
    }

    fn reorder_contacts(&mut self, active: RecordId, over: RecordId) -> Result<()> {
        self.store.contacts_mut().reorder(active, over);
        Ok(())
    }

    fn reorder_dashboard(&mut self, active: RecordId, over: RecordId) -> Result<()> {
        self.store.dashboard_mut().reorder(active, over);
        Ok(())
    }

    fn create_article(&mut self, category_id: &str, article: KnowledgeArticle) -> Result<()> {
        self.store.insert_article(category_id, article)
    }
}
