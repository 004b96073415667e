// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{AccountRecord, ContactRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↗",
            Self::Down => "↘",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub description: &'static str,
    pub trend_label: String,
    pub trend: TrendDirection,
}

fn count_status<'a>(statuses: impl Iterator<Item = &'a str>, wanted: &str) -> usize {
    statuses.filter(|status| *status == wanted).count()
}

/// Headline metrics for the home screen, recomputed from the collections.
pub fn summary_cards(accounts: &[AccountRecord], contacts: &[ContactRecord]) -> Vec<SummaryCard> {
    let account_statuses = || accounts.iter().map(|account| account.base.status.as_str());
    let contact_statuses = || contacts.iter().map(|contact| contact.base.status.as_str());
    let active = count_status(account_statuses(), "Active");
    let pending = count_status(account_statuses(), "Pending");
    let new_contacts = count_status(contact_statuses(), "New");
    let qualified = count_status(contact_statuses(), "Qualified");

    vec![
        SummaryCard {
            title: "Total Action Plans",
            value: accounts.len().to_string(),
            description: "Strategic initiatives across all departments.",
            trend_label: format!("+{active} in progress"),
            trend: TrendDirection::Up,
        },
        SummaryCard {
            title: "Active Projects",
            value: active.to_string(),
            description: "Strategic actions currently being implemented.",
            trend_label: format!("{pending} pending approval"),
            trend: if pending > active {
                TrendDirection::Down
            } else {
                TrendDirection::Up
            },
        },
        SummaryCard {
            title: "New Actions",
            value: new_contacts.to_string(),
            description: "Recently added strategic actions ready for review.",
            trend_label: format!("+{new_contacts} this month"),
            trend: TrendDirection::Up,
        },
        SummaryCard {
            title: "Qualified contacts",
            value: qualified.to_string(),
            description: "Decision makers aligned on solution scope and value.",
            trend_label: format!("{qualified} ready to hand off"),
            trend: TrendDirection::Up,
        },
    ]
}
