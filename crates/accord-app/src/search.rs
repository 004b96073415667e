// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{AccountRecord, BaseRecord, ContactRecord, ReportEntry, Section};

pub const DASHBOARD_HIT_LIMIT: usize = 5;
pub const ACCOUNT_HIT_LIMIT: usize = 5;
pub const CONTACT_HIT_LIMIT: usize = 5;
pub const NO_RESULTS_MESSAGE: &str =
    "No results found. Try a different keyword or use a suggestion above.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSuggestion {
    pub label: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const SEARCH_SUGGESTIONS: [SearchSuggestion; 4] = [
    SearchSuggestion {
        label: "Accounts: Upcoming renewals",
        description: "Find accounts with renewal plans or executive sponsors",
        query: "renewal",
    },
    SearchSuggestion {
        label: "Contacts: High interest",
        description: "Locate contacts marked as high interest or active",
        query: "high",
    },
    SearchSuggestion {
        label: "Accounts: Escalation owners",
        description: "Jump to accounts with escalation contacts assigned",
        query: "escalation",
    },
    SearchSuggestion {
        label: "Contacts: LinkedIn profiles",
        description: "Surface contacts that include a LinkedIn link",
        query: "linkedin",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub section: Section,
    pub title: String,
    pub subtitle: String,
}

/// Read-only views of the four searchable collections.
#[derive(Debug, Clone, Copy)]
pub struct SearchSources<'a> {
    pub dashboard: &'a [BaseRecord],
    pub accounts: &'a [AccountRecord],
    pub contacts: &'a [ContactRecord],
    pub reports: &'a [ReportEntry],
}

fn any_contains<'a>(fields: impl IntoIterator<Item = Option<&'a str>>, query: &str) -> bool {
    fields
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_lowercase().contains(query))
}

fn joined(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Case-insensitive substring search over every collection. Hits keep
/// collection order and are grouped Dashboard, Accounts, Contacts, Reports.
pub fn search(sources: SearchSources<'_>, query: &str) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let dashboard = sources
        .dashboard
        .iter()
        .filter(|record| {
            any_contains(
                [Some(record.header.as_str()), Some(record.reviewer.as_str())],
                &query,
            )
        })
        .take(DASHBOARD_HIT_LIMIT)
        .map(|record| SearchHit {
            section: Section::Dashboard,
            title: record.header.clone(),
            subtitle: format!("Owner: {}", record.reviewer),
        });

    let accounts = sources
        .accounts
        .iter()
        .filter(|record| {
            any_contains(
                [
                    Some(record.base.header.as_str()),
                    Some(record.base.reviewer.as_str()),
                    Some(record.industry.as_str()),
                    Some(record.region.as_str()),
                    record.executive_sponsor.as_deref(),
                    record.escalation_contact.as_deref(),
                    Some(record.owner_email.as_str()),
                    record.annual_contract_value.as_deref(),
                ],
                &query,
            )
        })
        .take(ACCOUNT_HIT_LIMIT)
        .map(|record| SearchHit {
            section: Section::Accounts,
            title: record.base.header.clone(),
            subtitle: joined(&[record.industry.as_str(), record.base.reviewer.as_str()]),
        });

    let contacts = sources
        .contacts
        .iter()
        .filter(|record| {
            any_contains(
                [
                    Some(record.base.header.as_str()),
                    Some(record.company.as_str()),
                    Some(record.role.as_str()),
                    Some(record.base.reviewer.as_str()),
                    Some(record.email.as_str()),
                    Some(record.phone.as_str()),
                    Some(record.interest_level.as_str()),
                    record.preferred_contact_method.as_deref(),
                    record.lifecycle_stage.as_deref(),
                ],
                &query,
            )
        })
        .take(CONTACT_HIT_LIMIT)
        .map(|record| SearchHit {
            section: Section::Contacts,
            title: record.base.header.clone(),
            subtitle: joined(&[record.company.as_str(), record.base.reviewer.as_str()]),
        });

    let reports = sources
        .reports
        .iter()
        .filter(|report| {
            any_contains(
                [Some(report.title.as_str()), Some(report.owner.as_str())],
                &query,
            )
        })
        .map(|report| SearchHit {
            section: Section::Reports,
            title: report.title.clone(),
            subtitle: format!("Owner: {}", report.owner),
        });

    dashboard
        .chain(accounts)
        .chain(contacts)
        .chain(reports)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{SEARCH_SUGGESTIONS, SearchSources, search};
    use crate::{
        AccountForm, AccountRecord, BaseRecord, ContactForm, ContactRecord, RecordForm, RecordId,
        ReportEntry, Section,
    };

    fn entry(id: i64, header: &str, reviewer: &str) -> BaseRecord {
        BaseRecord {
            id: RecordId::new(id),
            header: header.to_owned(),
            kind: "Narrative".to_owned(),
            status: "Done".to_owned(),
            target: "1".to_owned(),
            limit: "1".to_owned(),
            reviewer: reviewer.to_owned(),
        }
    }

    fn account(id: i64, header: &str, sponsor: Option<&str>) -> AccountRecord {
        let mut record = AccountForm {
            header: header.to_owned(),
            industry: "Logistics".to_owned(),
            reviewer: "Eddie Lake".to_owned(),
            ..AccountForm::default()
        }
        .into_record(RecordId::new(id));
        record.executive_sponsor = sponsor.map(str::to_owned);
        record
    }

    fn contact(id: i64, header: &str, company: &str) -> ContactRecord {
        ContactForm {
            header: header.to_owned(),
            company: company.to_owned(),
            reviewer: "Jamik Tashpulatov".to_owned(),
            ..ContactForm::default()
        }
        .into_record(RecordId::new(id))
    }

    fn report(title: &str, owner: &str) -> ReportEntry {
        ReportEntry {
            id: title.to_lowercase(),
            title: title.to_owned(),
            owner: owner.to_owned(),
            last_updated: "2026-01-01".to_owned(),
            status: "Published".to_owned(),
            summary: String::new(),
        }
    }

    struct Fixture {
        dashboard: Vec<BaseRecord>,
        accounts: Vec<AccountRecord>,
        contacts: Vec<ContactRecord>,
        reports: Vec<ReportEntry>,
    }

    impl Fixture {
        fn sources(&self) -> SearchSources<'_> {
            SearchSources {
                dashboard: &self.dashboard,
                accounts: &self.accounts,
                contacts: &self.contacts,
                reports: &self.reports,
            }
        }
    }

    fn fixture() -> Fixture {
        Fixture {
            dashboard: vec![entry(1, "Renewal timeline", "Maya Johnson")],
            accounts: vec![
                account(1, "Northwind", Some("Renewal Committee")),
                account(2, "Contoso", None),
            ],
            contacts: vec![contact(1, "Ada Lovelace", ""), contact(2, "Grace Hopper", "Navy")],
            reports: vec![report("Renewal playbook", "Maya Johnson")],
        }
    }

    #[test]
    fn renewal_finds_account_by_executive_sponsor() {
        let fixture = fixture();
        let hits = search(fixture.sources(), "  RENEWAL ");
        let sections = hits.iter().map(|hit| hit.section).collect::<Vec<_>>();
        assert_eq!(
            sections,
            vec![Section::Dashboard, Section::Accounts, Section::Reports]
        );
        assert_eq!(hits[1].title, "Northwind");
        assert_eq!(hits[1].subtitle, "Logistics • Eddie Lake");
        assert_eq!(hits[0].subtitle, "Owner: Maya Johnson");
    }

    #[test]
    fn blank_query_yields_nothing() {
        let fixture = fixture();
        assert!(search(fixture.sources(), "").is_empty());
        assert!(search(fixture.sources(), "   ").is_empty());
    }

    #[test]
    fn contact_subtitle_skips_empty_company() {
        let fixture = fixture();
        let hits = search(fixture.sources(), "jamik");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].subtitle, "Jamik Tashpulatov");
        assert_eq!(hits[1].subtitle, "Navy • Jamik Tashpulatov");
    }

    #[test]
    fn accounts_truncate_at_five_but_reports_do_not() {
        let mut fixture = fixture();
        fixture.accounts = (1..=8)
            .map(|id| account(id, &format!("Account {id}"), None))
            .collect();
        fixture.reports = (1..=8)
            .map(|id| report(&format!("Report {id}"), "Maya"))
            .collect();
        let hits = search(fixture.sources(), "logistics");
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].title, "Account 1");
        assert_eq!(search(fixture.sources(), "report").len(), 8);
    }

    #[test]
    fn suggestions_are_plain_queries() {
        let queries = SEARCH_SUGGESTIONS.map(|suggestion| suggestion.query);
        assert_eq!(queries, ["renewal", "high", "escalation", "linkedin"]);
    }
}
