// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::crud::{CrudLabels, CrudRecord};
use crate::detail::{DetailField, DetailHooks, DetailSection};
use crate::forms::AccountForm;
use crate::model::AccountRecord;
use crate::table::{ColumnDef, standard_columns};
use crate::views::ViewDefinition;

pub const ACTIVE_VIEW_ID: &str = "active";
pub const INACTIVE_VIEW_ID: &str = "inactive";

pub fn is_active(account: &AccountRecord) -> bool {
    matches!(account.base.status.as_str(), "Active" | "In Process")
}

pub fn is_inactive(account: &AccountRecord) -> bool {
    matches!(account.base.status.as_str(), "Pending" | "Closed")
}

fn detail_description(account: &AccountRecord) -> String {
    format!("Priority {}", account.priority)
}

fn detail_sections(account: &AccountRecord) -> Vec<DetailSection> {
    let base = &account.base;
    vec![
        DetailSection {
            heading: Some("Company overview"),
            fields: vec![
                DetailField::or_dash("Industry", Some(account.industry.as_str())),
                DetailField::or_dash("Region", Some(account.region.as_str())),
                DetailField::or_dash("Stage", Some(account.stage.as_str())),
                DetailField::or_dash("Priority", Some(account.priority.as_str())),
                DetailField::or_dash("Target", Some(base.target.as_str())),
                DetailField::or_dash("Limit", Some(base.limit.as_str())),
                DetailField::or_dash(
                    "Annual contract value",
                    account.annual_contract_value.as_deref(),
                ),
                DetailField::or_dash("Renewal date", account.renewal_date.as_deref()),
            ],
        },
        DetailSection {
            heading: Some("Ownership"),
            fields: vec![
                DetailField::or_dash("Owner", Some(base.reviewer.as_str())),
                DetailField::or_dash("Owner email", Some(account.owner_email.as_str())),
                DetailField::or_dash("Next meeting", Some(account.next_meeting.as_str())),
                DetailField::or_dash("Last interaction", Some(account.last_interaction.as_str())),
                DetailField::or_dash("Executive sponsor", account.executive_sponsor.as_deref()),
                DetailField::or_dash(
                    "Escalation contact",
                    account.escalation_contact.as_deref(),
                ),
                DetailField::or_dash("Risk level", account.risk_level.as_deref()),
                DetailField::or_dash("Success plan", account.success_plan_link.as_deref()),
            ],
        },
        DetailSection {
            heading: None,
            fields: vec![
                DetailField::multiline(
                    "Action Plan Summary",
                    &account.summary,
                    "No summary captured yet.",
                ),
                DetailField::multiline("Notes", &account.notes, "No additional notes."),
            ],
        },
    ]
}

impl CrudRecord for AccountRecord {
    type Form = AccountForm;

    const LABELS: CrudLabels = CrudLabels {
        noun: "account",
        plural: "accounts",
        title_noun: "Account",
        outline: "All Accounts",
        create_title: "Create account",
        edit_title: "Edit account",
        create_description: "Add a new account to the workspace.",
        edit_description: "Update the details for this account.",
        create_submit: "Save Account",
        edit_submit: "Save Changes",
    };

    fn columns() -> Vec<ColumnDef<Self>> {
        let mut columns = standard_columns();
        columns.extend([
            ColumnDef::<Self>::data("industry", "Industry", |account| {
                account.industry.as_str()
            })
            .hidden_by_default(),
            ColumnDef::<Self>::data("priority", "Priority", |account| {
                account.priority.as_str()
            })
            .hidden_by_default(),
        ]);
        columns
    }

    fn views() -> Vec<ViewDefinition<Self>> {
        vec![
            ViewDefinition::new(ACTIVE_VIEW_ID, "Active Accounts", is_active),
            ViewDefinition::new(INACTIVE_VIEW_ID, "Inactive Accounts", is_inactive),
        ]
    }

    fn detail_hooks() -> DetailHooks<Self> {
        DetailHooks {
            title: None,
            description: Some(detail_description),
            body: Some(detail_sections),
            open_externally: true,
        }
    }
}
