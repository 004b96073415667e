// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use accord_app::{
    ACCOUNT_PRIORITIES, ACCOUNT_STAGES, ACCOUNT_STATUSES, ACCOUNT_TYPES, AccountRecord,
    ArticleStatus, BaseRecord, CONTACT_SOURCES, CONTACT_STAGES, CONTACT_STATUSES, ContactRecord,
    INTEREST_LEVELS, KnowledgeArticle, KnowledgeCategory, RecordId, ReportEntry,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const REVIEWERS: [&str; 6] = [
    "Eddie Lake",
    "Jamik Tashpulatov",
    "Priya Patel",
    "Jordan Carter",
    "Emily Whalen",
    "Dakota Garcia",
];

const ENTRY_TYPES: [&str; 5] = [
    "Narrative",
    "Technical content",
    "Legal",
    "Plain language",
    "Cover page",
];
const ENTRY_STATUSES: [&str; 3] = ["Done", "In Process", "Not Started"];

const COMPANY_PREFIXES: [&str; 10] = [
    "Northwind",
    "Contoso",
    "Fabrikam",
    "Tailspin",
    "Woodgrove",
    "Litware",
    "Proseware",
    "Relecloud",
    "Wingtip",
    "Alpine",
];
const COMPANY_SUFFIXES: [&str; 5] = ["Traders", "Group", "Partners", "Labs", "Holdings"];
const INDUSTRIES: [&str; 6] = [
    "Logistics",
    "Healthcare",
    "Finance",
    "Retail",
    "Education",
    "Manufacturing",
];
const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const FIRST_NAMES: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];
const LAST_NAMES: [&str; 12] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Turner", "Brooks",
];
const ROLES: [&str; 5] = [
    "Program Lead",
    "Policy Analyst",
    "Director",
    "Grants Officer",
    "Planner",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible workspace records. The same seed always
/// yields the same sequence.
#[derive(Debug, Clone)]
pub struct RecordFaker {
    rng: DeterministicRng,
}

impl RecordFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn entry(&mut self, id: i64) -> BaseRecord {
        let header = format!("{} section", self.company());
        let kind = self.pick(&ENTRY_TYPES);
        let status = self.pick(&ENTRY_STATUSES);
        self.base(id, &header, kind, status)
    }

    pub fn account(&mut self, id: i64) -> AccountRecord {
        let header = self.company();
        let kind = self.pick(&ACCOUNT_TYPES);
        let status = self.pick(&ACCOUNT_STATUSES);
        let mut record = account(id, &header, status);
        record.base.kind = kind.to_owned();
        record.industry = self.pick(&INDUSTRIES).to_owned();
        record.region = self.pick(&REGIONS).to_owned();
        record.stage = self.pick(&ACCOUNT_STAGES).to_owned();
        record.priority = self.pick(&ACCOUNT_PRIORITIES).to_owned();
        record.base.target = self.count().to_string();
        record.base.limit = self.count().to_string();
        if self.rng.bool() {
            record.executive_sponsor = Some(self.person());
        }
        record
    }

    pub fn contact(&mut self, id: i64) -> ContactRecord {
        let header = format!("{} outreach", self.company());
        let status = self.pick(&CONTACT_STATUSES);
        let mut record = contact(id, &header, status);
        record.base.kind = self.pick(&CONTACT_SOURCES).to_owned();
        record.company = self.company();
        record.role = self.pick(&ROLES).to_owned();
        record.stage = self.pick(&CONTACT_STAGES).to_owned();
        record.interest_level = self.pick(&INTEREST_LEVELS).to_owned();
        let name = self.person();
        record.email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        record
    }

    fn base(&mut self, id: i64, header: &str, kind: &str, status: &str) -> BaseRecord {
        BaseRecord {
            id: RecordId::new(id),
            header: header.to_owned(),
            kind: kind.to_owned(),
            status: status.to_owned(),
            target: self.count().to_string(),
            limit: self.count().to_string(),
            reviewer: self.pick(&REVIEWERS).to_owned(),
        }
    }

    fn company(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&COMPANY_PREFIXES),
            self.pick(&COMPANY_SUFFIXES)
        )
    }

    fn person(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn count(&mut self) -> usize {
        1 + self.rng.int_n(40)
    }

    fn pick<'a>(&mut self, values: &'a [&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }
}

pub fn entry(id: i64, header: &str, status: &str) -> BaseRecord {
    BaseRecord {
        id: RecordId::new(id),
        header: header.to_owned(),
        kind: "Narrative".to_owned(),
        status: status.to_owned(),
        target: "10".to_owned(),
        limit: "20".to_owned(),
        reviewer: "Eddie Lake".to_owned(),
    }
}

pub fn account(id: i64, header: &str, status: &str) -> AccountRecord {
    AccountRecord {
        base: BaseRecord {
            kind: ACCOUNT_TYPES[0].to_owned(),
            ..entry(id, header, status)
        },
        industry: "Logistics".to_owned(),
        region: "West".to_owned(),
        stage: ACCOUNT_STAGES[0].to_owned(),
        priority: ACCOUNT_PRIORITIES[0].to_owned(),
        owner_email: "eddie.lake@example.com".to_owned(),
        next_meeting: "2024-07-18".to_owned(),
        last_interaction: "2024-07-02".to_owned(),
        summary: String::new(),
        notes: String::new(),
        annual_contract_value: None,
        renewal_date: None,
        executive_sponsor: None,
        escalation_contact: None,
        success_plan_link: None,
        risk_level: None,
    }
}

pub fn contact(id: i64, header: &str, status: &str) -> ContactRecord {
    ContactRecord {
        base: BaseRecord {
            kind: CONTACT_SOURCES[0].to_owned(),
            ..entry(id, header, status)
        },
        company: "City of Lakeview".to_owned(),
        role: "Infrastructure Director".to_owned(),
        email: "m.chen@lakeview.example".to_owned(),
        phone: "+1 555 0101".to_owned(),
        stage: CONTACT_STAGES[0].to_owned(),
        last_activity: "2024-07-02".to_owned(),
        next_step: "Schedule scoping workshop".to_owned(),
        interest_level: INTEREST_LEVELS[0].to_owned(),
        notes: String::new(),
        timezone: None,
        linkedin_profile: None,
        preferred_contact_method: None,
        meeting_cadence: None,
        lifecycle_stage: None,
    }
}

pub fn report(id: &str, title: &str, owner: &str) -> ReportEntry {
    ReportEntry {
        id: id.to_owned(),
        title: title.to_owned(),
        owner: owner.to_owned(),
        last_updated: "2024-07-01".to_owned(),
        status: "Published".to_owned(),
        summary: format!("{title} summary."),
    }
}

pub fn article(id: &str, title: &str, owner: &str, highlights: &[&str]) -> KnowledgeArticle {
    KnowledgeArticle {
        id: id.to_owned(),
        title: title.to_owned(),
        owner: owner.to_owned(),
        status: ArticleStatus::Published,
        updated: "2024-07-01".to_owned(),
        summary: format!("{title} summary."),
        highlights: highlights.iter().map(|line| (*line).to_owned()).collect(),
    }
}

/// Two categories: `foundations` with two articles and `playbooks` with one.
pub fn categories() -> Vec<KnowledgeCategory> {
    vec![
        KnowledgeCategory {
            id: "foundations".to_owned(),
            title: "Foundations".to_owned(),
            description: "Orientation guides.".to_owned(),
            articles: vec![
                article(
                    "executive-briefing",
                    "Executive briefing overview",
                    "Jordan Carter",
                    &["Align roadmap and budgets"],
                ),
                article(
                    "workspace-orientation",
                    "Workspace orientation guide",
                    "Priya Patel",
                    &["Persona matrix"],
                ),
            ],
        },
        KnowledgeCategory {
            id: "playbooks".to_owned(),
            title: "Playbooks".to_owned(),
            description: "Execution guides.".to_owned(),
            articles: vec![article(
                "support-readiness",
                "Support readiness checklist",
                "Emily Whalen",
                &["Follow-the-sun roster"],
            )],
        },
    ]
}

/// Record sets mirroring the five seed documents.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    pub dashboard: Vec<BaseRecord>,
    pub accounts: Vec<AccountRecord>,
    pub contacts: Vec<ContactRecord>,
    pub reports: Vec<ReportEntry>,
    pub knowledge: Vec<KnowledgeCategory>,
}

impl SeedSet {
    /// `count` faked records per table collection plus the fixture reports
    /// and categories.
    pub fn faked(seed: u64, count: usize) -> Self {
        let mut faker = RecordFaker::new(seed);
        let ids = 1..=count as i64;
        Self {
            dashboard: ids.clone().map(|id| faker.entry(id)).collect(),
            accounts: ids.clone().map(|id| faker.account(id)).collect(),
            contacts: ids.map(|id| faker.contact(id)).collect(),
            reports: vec![
                report("rpt-pipeline", "Pipeline review", "Jordan Carter"),
                report("rpt-risk", "Renewal risk register", "Priya Patel"),
            ],
            knowledge: categories(),
        }
    }

    /// Writes the set as `dashboard.json`, `accounts.json`, `contacts.json`,
    /// `reports.json` and `knowledge.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        write_json(dir, "dashboard.json", &self.dashboard)?;
        write_json(dir, "accounts.json", &self.accounts)?;
        write_json(dir, "contacts.json", &self.contacts)?;
        write_json(dir, "reports.json", &self.reports)?;
        write_json(dir, "knowledge.json", &self.knowledge)?;
        Ok(())
    }
}

/// A temp directory populated with `set`'s seed documents.
pub fn seed_dir(set: &SeedSet) -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().context("create temp seed dir")?;
    set.write_to(dir.path())?;
    Ok(dir)
}

fn write_json<T: serde::Serialize>(dir: &Path, file: &str, value: &T) -> Result<()> {
    let path = dir.join(file);
    let encoded = serde_json::to_string_pretty(value).with_context(|| format!("encode {file}"))?;
    fs::write(&path, encoded).with_context(|| format!("write {}", path.display()))
}
