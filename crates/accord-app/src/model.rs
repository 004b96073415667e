// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

pub const ACCOUNT_TYPES: [&str; 7] = [
    "Enterprise",
    "Mid-Market",
    "SMB",
    "Education",
    "Financial",
    "Logistics",
    "Insurance",
];
pub const ACCOUNT_STATUSES: [&str; 4] = ["Active", "In Process", "Pending", "Closed"];
pub const ACCOUNT_STAGES: [&str; 6] = [
    "Qualification",
    "Solutioning",
    "Proposal",
    "Adoption",
    "Expansion",
    "Optimization",
];
pub const ACCOUNT_PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];
pub const RISK_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Critical"];

pub const CONTACT_SOURCES: [&str; 5] = [
    "Municipal",
    "Provincial",
    "Federal",
    "Community",
    "Internal",
];
pub const CONTACT_STATUSES: [&str; 4] = ["New", "Contacted", "Qualified", "Nurture"];
pub const CONTACT_STAGES: [&str; 4] = ["Discovery", "Evaluation", "Proposal", "Decision"];
pub const INTEREST_LEVELS: [&str; 3] = ["High", "Medium", "Low"];
pub const CONTACT_METHODS: [&str; 4] = ["Email", "Phone", "Teams", "In-person"];
pub const LIFECYCLE_STAGES: [&str; 5] = [
    "Proposed",
    "Planning",
    "Implementation",
    "Complete",
    "Review",
];
pub const DEFAULT_MEETING_CADENCE: &str = "Weekly";
pub const UNASSIGNED_OWNER: &str = "Unassigned";

/// Placeholder for a missing optional value in detail views.
pub const MISSING_VALUE: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Dashboard,
    Accounts,
    Contacts,
    Reports,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::Accounts, Self::Contacts, Self::Reports];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Accounts => "accounts",
            Self::Contacts => "contacts",
            Self::Reports => "reports",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dashboard" => Some(Self::Dashboard),
            "accounts" => Some(Self::Accounts),
            "contacts" => Some(Self::Contacts),
            "reports" => Some(Self::Reports),
            _ => None,
        }
    }

    /// Sidebar label.
    pub const fn nav_label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Accounts => "Action Plans",
            Self::Contacts => "Strategic Actions",
            Self::Reports => "Knowledge Base",
        }
    }

    /// Search result group label.
    pub const fn search_label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Accounts => "Accounts",
            Self::Contacts => "Contacts",
            Self::Reports => "Reports",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Workspace Overview",
            Self::Accounts => "Accounts",
            Self::Contacts => "Contacts",
            Self::Reports => "Knowledge Base",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Dashboard => "Track demand, performance, and current work at a glance.",
            Self::Accounts => "Manage key customer relationships and review owner assignments.",
            Self::Contacts => {
                "Keep an eye on inbound and outbound opportunities ready for follow-up."
            }
            Self::Reports => {
                "Browse curated articles, playbooks, and insight reports for your team."
            }
        }
    }
}

/// Fields every tabular record carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub id: RecordId,
    pub header: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub target: String,
    pub limit: String,
    pub reviewer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub industry: String,
    pub region: String,
    pub stage: String,
    pub priority: String,
    pub owner_email: String,
    pub next_meeting: String,
    pub last_interaction: String,
    pub summary: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_contract_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executive_sponsor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_plan_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub company: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub stage: String,
    pub last_activity: String,
    pub next_step: String,
    pub interest_level: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_cadence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_stage: Option<String>,
}

/// Row of the reports collection; searched by title and owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub last_updated: String,
    pub status: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleStatus {
    Published,
    Draft,
    #[serde(rename = "In Review")]
    InReview,
}

impl ArticleStatus {
    pub const ALL: [Self; 3] = [Self::Published, Self::Draft, Self::InReview];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Published => "Published",
            Self::Draft => "Draft",
            Self::InReview => "In Review",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Published" => Some(Self::Published),
            "Draft" => Some(Self::Draft),
            "In Review" => Some(Self::InReview),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub status: ArticleStatus,
    pub updated: String,
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub articles: Vec<KnowledgeArticle>,
}

/// Anything the table engine can display: an id plus the shared base fields.
pub trait Record: Clone {
    fn base(&self) -> &BaseRecord;

    fn id(&self) -> RecordId {
        self.base().id
    }
}

impl Record for BaseRecord {
    fn base(&self) -> &BaseRecord {
        self
    }
}

impl Record for AccountRecord {
    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

impl Record for ContactRecord {
    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

/// Collapses an empty string into `None` so optional fields round-trip cleanly.
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountRecord, ArticleStatus, KnowledgeArticle, Section};

    #[test]
    fn section_round_trips_through_str() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse("settings"), None);
    }

    #[test]
    fn account_json_uses_camel_case_and_type_key() -> anyhow::Result<()> {
        let raw = r#"{
            "id": 7,
            "header": "Northwind",
            "type": "Enterprise",
            "status": "Active",
            "target": "12",
            "limit": "20",
            "reviewer": "Eddie Lake",
            "industry": "Logistics",
            "region": "West",
            "stage": "Adoption",
            "priority": "High",
            "ownerEmail": "eddie@example.com",
            "nextMeeting": "2026-03-02",
            "lastInteraction": "2026-02-20",
            "summary": "",
            "notes": "",
            "executiveSponsor": "Renewal Committee"
        }"#;
        let account: AccountRecord = serde_json::from_str(raw)?;
        assert_eq!(account.base.kind, "Enterprise");
        assert_eq!(account.owner_email, "eddie@example.com");
        assert_eq!(account.executive_sponsor.as_deref(), Some("Renewal Committee"));
        assert_eq!(account.risk_level, None);
        Ok(())
    }

    #[test]
    fn article_status_accepts_spaced_label() -> anyhow::Result<()> {
        let raw = r#"{"id":"a","title":"t","owner":"o","status":"In Review","updated":"2026-01-01","summary":"s"}"#;
        let article: KnowledgeArticle = serde_json::from_str(raw)?;
        assert_eq!(article.status, ArticleStatus::InReview);
        assert!(article.highlights.is_empty());
        Ok(())
    }
}
