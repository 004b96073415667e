// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use accord_app::{
    AccountRecord, BaseRecord, ContactRecord, KnowledgeArticle, KnowledgeCategory, Record,
    RecordId, ReportEntry, move_item,
};
use anyhow::{Context, Result, anyhow, bail};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const DASHBOARD_FILE: &str = "dashboard.json";
pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const CONTACTS_FILE: &str = "contacts.json";
pub const REPORTS_FILE: &str = "reports.json";
pub const KNOWLEDGE_FILE: &str = "knowledge.json";

pub const SEED_FILES: [&str; 5] = [
    DASHBOARD_FILE,
    ACCOUNTS_FILE,
    CONTACTS_FILE,
    REPORTS_FILE,
    KNOWLEDGE_FILE,
];

const BUNDLED_DASHBOARD: &str = include_str!("../data/dashboard.json");
const BUNDLED_ACCOUNTS: &str = include_str!("../data/accounts.json");
const BUNDLED_CONTACTS: &str = include_str!("../data/contacts.json");
const BUNDLED_REPORTS: &str = include_str!("../data/reports.json");
const BUNDLED_KNOWLEDGE: &str = include_str!("../data/knowledge.json");

/// An ordered set of records keyed by id. Order is significant: it is the
/// default row order of every table built over the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<R> {
    name: &'static str,
    records: Vec<R>,
}

impl<R: Record> Collection<R> {
    pub fn new(name: &'static str, records: Vec<R>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(record.id()) {
                bail!(
                    "{name} contains id {} more than once -- give every record a unique id",
                    record.id()
                );
            }
        }
        Ok(Self { name, records })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    pub fn next_id(&self) -> RecordId {
        RecordId::next_after(self.records.iter().map(Record::id))
    }

    /// Prepends `record`; the new record becomes the first row.
    pub fn create(&mut self, record: R) -> Result<RecordId> {
        let id = record.id();
        if self.position(id).is_some() {
            bail!("{} already has a record with id {id}", self.name);
        }
        self.records.insert(0, record);
        info!(collection = self.name, %id, "record created");
        Ok(id)
    }

    /// Replaces the record carrying the same id in place. Returns false when
    /// no such record exists.
    pub fn update(&mut self, record: R) -> bool {
        let id = record.id();
        match self.position(id) {
            Some(index) => {
                self.records[index] = record;
                info!(collection = self.name, %id, "record updated");
                true
            }
            None => {
                debug!(collection = self.name, %id, "update skipped, record missing");
                false
            }
        }
    }

    pub fn delete(&mut self, id: RecordId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                info!(collection = self.name, %id, "record deleted");
                true
            }
            None => {
                debug!(collection = self.name, %id, "delete skipped, record missing");
                false
            }
        }
    }

    /// Moves `active` to the position `over` holds in the full collection.
    pub fn reorder(&mut self, active: RecordId, over: RecordId) -> bool {
        let (Some(from), Some(to)) = (self.position(active), self.position(over)) else {
            debug!(collection = self.name, %active, %over, "reorder skipped, record missing");
            return false;
        };
        if from == to {
            return false;
        }
        move_item(&mut self.records, from, to);
        debug!(collection = self.name, %active, from, to, "record moved");
        true
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    dashboard: Collection<BaseRecord>,
    accounts: Collection<AccountRecord>,
    contacts: Collection<ContactRecord>,
    reports: Vec<ReportEntry>,
    knowledge: Vec<KnowledgeCategory>,
}

impl Store {
    /// Builds a store from the seed documents compiled into this crate.
    pub fn seeded() -> Result<Self> {
        let store = Self::from_documents(
            "bundled seed data",
            BUNDLED_DASHBOARD,
            BUNDLED_ACCOUNTS,
            BUNDLED_CONTACTS,
            BUNDLED_REPORTS,
            BUNDLED_KNOWLEDGE,
        )?;
        store.log_counts("bundled");
        Ok(store)
    }

    /// Loads the five seed documents from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!(
                "seed directory {} does not exist -- create it or drop the seed_dir setting",
                dir.display()
            );
        }
        let read = |file: &str| -> Result<String> {
            let path = dir.join(file);
            fs::read_to_string(&path).with_context(|| {
                format!(
                    "read seed file {} -- the directory must hold {}",
                    path.display(),
                    SEED_FILES.join(", ")
                )
            })
        };
        let store = Self::from_documents(
            &dir.display().to_string(),
            &read(DASHBOARD_FILE)?,
            &read(ACCOUNTS_FILE)?,
            &read(CONTACTS_FILE)?,
            &read(REPORTS_FILE)?,
            &read(KNOWLEDGE_FILE)?,
        )?;
        store.log_counts(&dir.display().to_string());
        Ok(store)
    }

    pub fn from_documents(
        origin: &str,
        dashboard: &str,
        accounts: &str,
        contacts: &str,
        reports: &str,
        knowledge: &str,
    ) -> Result<Self> {
        let dashboard = parse_document::<Vec<BaseRecord>>(origin, DASHBOARD_FILE, dashboard)?;
        let accounts = parse_document::<Vec<AccountRecord>>(origin, ACCOUNTS_FILE, accounts)?;
        let contacts = parse_document::<Vec<ContactRecord>>(origin, CONTACTS_FILE, contacts)?;
        let reports = parse_document::<Vec<ReportEntry>>(origin, REPORTS_FILE, reports)?;
        let knowledge =
            parse_document::<Vec<KnowledgeCategory>>(origin, KNOWLEDGE_FILE, knowledge)?;
        Self::from_parts(dashboard, accounts, contacts, reports, knowledge)
    }

    pub fn from_parts(
        dashboard: Vec<BaseRecord>,
        accounts: Vec<AccountRecord>,
        contacts: Vec<ContactRecord>,
        reports: Vec<ReportEntry>,
        knowledge: Vec<KnowledgeCategory>,
    ) -> Result<Self> {
        Ok(Self {
            dashboard: Collection::new("dashboard", dashboard)?,
            accounts: Collection::new("accounts", accounts)?,
            contacts: Collection::new("contacts", contacts)?,
            reports,
            knowledge,
        })
    }

    pub fn empty() -> Self {
        Self {
            dashboard: Collection {
                name: "dashboard",
                records: Vec::new(),
            },
            accounts: Collection {
                name: "accounts",
                records: Vec::new(),
            },
            contacts: Collection {
                name: "contacts",
                records: Vec::new(),
            },
            reports: Vec::new(),
            knowledge: Vec::new(),
        }
    }

    fn log_counts(&self, origin: &str) {
        info!(
            origin,
            dashboard = self.dashboard.len(),
            accounts = self.accounts.len(),
            contacts = self.contacts.len(),
            reports = self.reports.len(),
            categories = self.knowledge.len(),
            articles = self.article_count(),
            "seed data loaded"
        );
    }

    pub fn dashboard(&self) -> &Collection<BaseRecord> {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Collection<BaseRecord> {
        &mut self.dashboard
    }

    pub fn accounts(&self) -> &Collection<AccountRecord> {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut Collection<AccountRecord> {
        &mut self.accounts
    }

    pub fn contacts(&self) -> &Collection<ContactRecord> {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut Collection<ContactRecord> {
        &mut self.contacts
    }

    pub fn reports(&self) -> &[ReportEntry] {
        &self.reports
    }

    pub fn knowledge(&self) -> &[KnowledgeCategory] {
        &self.knowledge
    }

    pub fn article_count(&self) -> usize {
        self.knowledge
            .iter()
            .map(|category| category.articles.len())
            .sum()
    }

    /// Prepends `article` to the category's article list.
    pub fn insert_article(&mut self, category_id: &str, article: KnowledgeArticle) -> Result<()> {
        let category = self
            .knowledge
            .iter_mut()
            .find(|category| category.id == category_id)
            .ok_or_else(|| anyhow!("knowledge category {category_id:?} does not exist"))?;
        if category
            .articles
            .iter()
            .any(|existing| existing.id == article.id)
        {
            bail!(
                "category {category_id:?} already has an article with id {:?}",
                article.id
            );
        }
        info!(category = category_id, article = %article.id, "article created");
        category.articles.insert(0, article);
        Ok(())
    }
}

fn parse_document<T: DeserializeOwned>(origin: &str, file: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("decode {file} from {origin}"))
}
