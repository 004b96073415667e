// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::crud::{CrudLabels, CrudRecord};
use crate::detail::{DetailField, DetailHooks, DetailSection};
use crate::forms::ContactForm;
use crate::model::ContactRecord;
use crate::table::{ColumnDef, standard_columns};
use crate::views::ViewDefinition;

pub const ACTIVE_VIEW_ID: &str = "active";
pub const COMPLETED_VIEW_ID: &str = "completed";

const COMPLETED_STATUS: &str = "Nurture";

pub fn is_active(contact: &ContactRecord) -> bool {
    contact.base.status != COMPLETED_STATUS
}

pub fn is_completed(contact: &ContactRecord) -> bool {
    contact.base.status == COMPLETED_STATUS
}

fn detail_description(contact: &ContactRecord) -> String {
    format!("Interest level {}", contact.interest_level)
}

fn detail_sections(contact: &ContactRecord) -> Vec<DetailSection> {
    let base = &contact.base;
    let mut follow_up = vec![
        DetailField::or_dash("Last activity", Some(contact.last_activity.as_str())),
        DetailField::or_dash("Next step", Some(contact.next_step.as_str())),
    ];
    if let Some(profile) = contact
        .linkedin_profile
        .as_deref()
        .filter(|profile| !profile.is_empty())
    {
        follow_up.push(DetailField::new("LinkedIn", profile));
    }
    follow_up.push(DetailField::multiline(
        "Notes",
        &contact.notes,
        "No notes captured.",
    ));

    vec![
        DetailSection {
            heading: Some("Contact information"),
            fields: vec![
                DetailField::or_dash("Company", Some(contact.company.as_str())),
                DetailField::or_dash("Role", Some(contact.role.as_str())),
                DetailField::or_dash("Email", Some(contact.email.as_str())),
                DetailField::or_dash("Phone", Some(contact.phone.as_str())),
                DetailField::or_dash("Time zone", contact.timezone.as_deref()),
                DetailField::or_dash(
                    "Preferred contact",
                    contact.preferred_contact_method.as_deref(),
                ),
            ],
        },
        DetailSection {
            heading: Some("Engagement"),
            fields: vec![
                DetailField::or_dash("Stage", Some(contact.stage.as_str())),
                DetailField::or_dash("Status", Some(base.status.as_str())),
                DetailField::or_dash("Interest", Some(contact.interest_level.as_str())),
                DetailField::or_dash("Owner", Some(base.reviewer.as_str())),
                DetailField::or_dash("Lifecycle stage", contact.lifecycle_stage.as_deref()),
                DetailField::or_dash("Meeting cadence", contact.meeting_cadence.as_deref()),
            ],
        },
        DetailSection {
            heading: None,
            fields: follow_up,
        },
    ]
}

impl CrudRecord for ContactRecord {
    type Form = ContactForm;

    const LABELS: CrudLabels = CrudLabels {
        noun: "contact",
        plural: "contacts",
        title_noun: "Contact",
        outline: "All Contacts",
        create_title: "Create contact",
        edit_title: "Edit contact",
        create_description: "Add a new relationship record to the workspace.",
        edit_description: "Update the relationship record for this contact.",
        create_submit: "Save Contact",
        edit_submit: "Save Changes",
    };

    fn columns() -> Vec<ColumnDef<Self>> {
        let mut columns = standard_columns();
        columns.extend([
            ColumnDef::<Self>::data("company", "Company", |contact| contact.company.as_str())
                .hidden_by_default(),
            ColumnDef::<Self>::data("interest", "Interest", |contact| {
                contact.interest_level.as_str()
            })
            .hidden_by_default(),
        ]);
        columns
    }

    fn views() -> Vec<ViewDefinition<Self>> {
        vec![
            ViewDefinition::new(ACTIVE_VIEW_ID, "Active Actions", is_active),
            ViewDefinition::new(COMPLETED_VIEW_ID, "Completed Actions", is_completed),
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
