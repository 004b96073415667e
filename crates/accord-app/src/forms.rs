// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

use anyhow::{Result, bail};

use crate::model::{
    ACCOUNT_PRIORITIES, ACCOUNT_STAGES, ACCOUNT_STATUSES, ACCOUNT_TYPES, AccountRecord,
    ArticleStatus, BaseRecord, CONTACT_METHODS, CONTACT_SOURCES, CONTACT_STAGES,
    CONTACT_STATUSES, ContactRecord, DEFAULT_MEETING_CADENCE, INTEREST_LEVELS, LIFECYCLE_STAGES,
    RISK_LEVELS, UNASSIGNED_OWNER, non_empty,
};
use crate::{KnowledgeCategory, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Choice(&'static [&'static str]),
}

/// One labelled input of a record form, bound to a `String` slot of `F`.
pub struct FormFieldSpec<F> {
    pub label: &'static str,
    pub kind: FieldKind,
    pub read: fn(&F) -> &str,
    pub write: fn(&mut F) -> &mut String,
}

impl<F> Clone for FormFieldSpec<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FormFieldSpec<F> {}

impl<F> fmt::Debug for FormFieldSpec<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFieldSpec")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

macro_rules! field {
    ($label:literal, $kind:expr, $slot:ident) => {
        FormFieldSpec {
            label: $label,
            kind: $kind,
            read: |form| form.$slot.as_str(),
            write: |form| &mut form.$slot,
        }
    };
}

/// What a dialog renderer needs to display and edit a form, independent of
/// the record behind it.
pub trait FormEditor {
    fn field_count(&self) -> usize;
    fn field_label(&self, index: usize) -> &'static str;
    fn field_kind(&self, index: usize) -> FieldKind;
    fn field_value(&self, index: usize) -> String;
    fn insert_char(&mut self, index: usize, ch: char);
    fn delete_char(&mut self, index: usize);
    fn cycle_choice(&mut self, index: usize, delta: isize);
}

/// A form bound to one record type, edited through its field specs.
pub trait RecordForm: Clone + Default + fmt::Debug + FormEditor {
    type Record;

    fn field_specs() -> Vec<FormFieldSpec<Self>>;
    /// Prefills the form; optional fields become `""` or their first choice.
    fn from_record(record: &Self::Record) -> Self;
    fn validate(&self) -> Result<()>;
    fn into_record(self, id: RecordId) -> Self::Record;
}

fn cycle_in(options: &[&str], current: &str, delta: isize) -> String {
    if options.is_empty() {
        return current.to_owned();
    }
    let position = options
        .iter()
        .position(|option| *option == current)
        .map_or(if delta >= 0 { -1 } else { 0 }, |index| index as isize);
    let next = (position + delta).rem_euclid(options.len() as isize) as usize;
    options[next].to_owned()
}

macro_rules! spec_form_editor {
    ($form:ty) => {
        impl FormEditor for $form {
            fn field_count(&self) -> usize {
                Self::field_specs().len()
            }

            fn field_label(&self, index: usize) -> &'static str {
                Self::field_specs().get(index).map_or("", |spec| spec.label)
            }

            fn field_kind(&self, index: usize) -> FieldKind {
                Self::field_specs()
                    .get(index)
                    .map_or(FieldKind::Text, |spec| spec.kind)
            }

            fn field_value(&self, index: usize) -> String {
                Self::field_specs()
                    .get(index)
                    .map(|spec| (spec.read)(self).to_owned())
                    .unwrap_or_default()
            }

            fn insert_char(&mut self, index: usize, ch: char) {
                if let Some(spec) = Self::field_specs().get(index) {
                    match spec.kind {
                        FieldKind::Text if ch == '\n' => {}
                        FieldKind::Text | FieldKind::Multiline => (spec.write)(self).push(ch),
                        FieldKind::Choice(_) => {}
                    }
                }
            }

            fn delete_char(&mut self, index: usize) {
                if let Some(spec) = Self::field_specs().get(index)
                    && !matches!(spec.kind, FieldKind::Choice(_))
                {
                    (spec.write)(self).pop();
                }
            }

            fn cycle_choice(&mut self, index: usize, delta: isize) {
                if let Some(spec) = Self::field_specs().get(index)
                    && let FieldKind::Choice(options) = spec.kind
                {
                    let next = cycle_in(options, (spec.read)(self), delta);
                    *(spec.write)(self) = next;
                }
            }
        }
    };
}

fn require(value: &str, field: &str, article: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{field} is required -- enter {article} {field} and retry");
    }
    Ok(())
}

fn require_count(value: &str, field: &str) -> Result<()> {
    let value = value.trim();
    if !value.is_empty() && value.parse::<u32>().is_err() {
        bail!("{field} must be a whole number -- got {value:?}");
    }
    Ok(())
}

fn require_email(value: &str, field: &str) -> Result<()> {
    let value = value.trim();
    if !value.is_empty() && !value.contains('@') {
        bail!("{field} must be an email address -- got {value:?}");
    }
    Ok(())
}

fn count_or_zero(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        "0".to_owned()
    } else {
        value.to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountForm {
    pub header: String,
    pub industry: String,
    pub region: String,
    pub executive_sponsor: String,
    pub escalation_contact: String,
    pub kind: String,
    pub stage: String,
    pub priority: String,
    pub status: String,
    pub target: String,
    pub limit: String,
    pub annual_contract_value: String,
    pub renewal_date: String,
    pub reviewer: String,
    pub owner_email: String,
    pub next_meeting: String,
    pub last_interaction: String,
    pub risk_level: String,
    pub success_plan_link: String,
    pub summary: String,
    pub notes: String,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            header: String::new(),
            industry: String::new(),
            region: String::new(),
            executive_sponsor: String::new(),
            escalation_contact: String::new(),
            kind: ACCOUNT_TYPES[0].to_owned(),
            stage: ACCOUNT_STAGES[0].to_owned(),
            priority: ACCOUNT_PRIORITIES[0].to_owned(),
            status: ACCOUNT_STATUSES[0].to_owned(),
            target: "0".to_owned(),
            limit: "0".to_owned(),
            annual_contract_value: String::new(),
            renewal_date: String::new(),
            reviewer: UNASSIGNED_OWNER.to_owned(),
            owner_email: String::new(),
            next_meeting: String::new(),
            last_interaction: String::new(),
            risk_level: RISK_LEVELS[0].to_owned(),
            success_plan_link: String::new(),
            summary: String::new(),
            notes: String::new(),
        }
    }
}

impl RecordForm for AccountForm {
    type Record = AccountRecord;

    fn field_specs() -> Vec<FormFieldSpec<Self>> {
        vec![
            field!("Account name", FieldKind::Text, header),
            field!("Industry", FieldKind::Text, industry),
            field!("Region", FieldKind::Text, region),
            field!("Executive sponsor", FieldKind::Text, executive_sponsor),
            field!("Escalation contact", FieldKind::Text, escalation_contact),
            field!("Type", FieldKind::Choice(&ACCOUNT_TYPES), kind),
            field!("Stage", FieldKind::Choice(&ACCOUNT_STAGES), stage),
            field!("Priority", FieldKind::Choice(&ACCOUNT_PRIORITIES), priority),
            field!("Status", FieldKind::Choice(&ACCOUNT_STATUSES), status),
            field!("Target", FieldKind::Text, target),
            field!("Limit", FieldKind::Text, limit),
            field!("Annual contract value", FieldKind::Text, annual_contract_value),
            field!("Renewal date", FieldKind::Text, renewal_date),
            field!("Owner", FieldKind::Text, reviewer),
            field!("Owner email", FieldKind::Text, owner_email),
            field!("Next meeting", FieldKind::Text, next_meeting),
            field!("Last interaction", FieldKind::Text, last_interaction),
            field!("Risk level", FieldKind::Choice(&RISK_LEVELS), risk_level),
            field!("Success plan link", FieldKind::Text, success_plan_link),
            field!("Action Plan Summary", FieldKind::Multiline, summary),
            field!("Notes", FieldKind::Multiline, notes),
        ]
    }

    fn from_record(record: &AccountRecord) -> Self {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            header: record.base.header.clone(),
            industry: record.industry.clone(),
            region: record.region.clone(),
            executive_sponsor: optional(&record.executive_sponsor),
            escalation_contact: optional(&record.escalation_contact),
            kind: record.base.kind.clone(),
            stage: record.stage.clone(),
            priority: record.priority.clone(),
            status: record.base.status.clone(),
            target: record.base.target.clone(),
            limit: record.base.limit.clone(),
            annual_contract_value: optional(&record.annual_contract_value),
            renewal_date: optional(&record.renewal_date),
            reviewer: record.base.reviewer.clone(),
            owner_email: record.owner_email.clone(),
            next_meeting: record.next_meeting.clone(),
            last_interaction: record.last_interaction.clone(),
            risk_level: record
                .risk_level
                .clone()
                .unwrap_or_else(|| RISK_LEVELS[0].to_owned()),
            success_plan_link: optional(&record.success_plan_link),
            summary: record.summary.clone(),
            notes: record.notes.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.header, "account name", "an")?;
        require_count(&self.target, "target")?;
        require_count(&self.limit, "limit")?;
        require_email(&self.owner_email, "owner email")?;
        Ok(())
    }

    fn into_record(self, id: RecordId) -> AccountRecord {
        AccountRecord {
            base: BaseRecord {
                id,
                header: self.header.trim().to_owned(),
                kind: self.kind,
                status: self.status,
                target: count_or_zero(&self.target),
                limit: count_or_zero(&self.limit),
                reviewer: self.reviewer,
            },
            industry: self.industry,
            region: self.region,
            stage: self.stage,
            priority: self.priority,
            owner_email: self.owner_email,
            next_meeting: self.next_meeting,
            last_interaction: self.last_interaction,
            summary: self.summary,
            notes: self.notes,
            annual_contract_value: non_empty(self.annual_contract_value),
            renewal_date: non_empty(self.renewal_date),
            executive_sponsor: non_empty(self.executive_sponsor),
            escalation_contact: non_empty(self.escalation_contact),
            success_plan_link: non_empty(self.success_plan_link),
            risk_level: non_empty(self.risk_level),
        }
    }
}

spec_form_editor!(AccountForm);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub header: String,
    pub company: String,
    pub role: String,
    pub reviewer: String,
    pub kind: String,
    pub status: String,
    pub stage: String,
    pub interest_level: String,
    pub email: String,
    pub phone: String,
    pub target: String,
    pub limit: String,
    pub timezone: String,
    pub last_activity: String,
    pub preferred_contact_method: String,
    pub meeting_cadence: String,
    pub lifecycle_stage: String,
    pub next_step: String,
    pub linkedin_profile: String,
    pub notes: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            header: String::new(),
            company: String::new(),
            role: String::new(),
            reviewer: UNASSIGNED_OWNER.to_owned(),
            kind: CONTACT_SOURCES[0].to_owned(),
            status: CONTACT_STATUSES[0].to_owned(),
            stage: CONTACT_STAGES[0].to_owned(),
            interest_level: INTEREST_LEVELS[0].to_owned(),
            email: String::new(),
            phone: String::new(),
            target: "0".to_owned(),
            limit: "0".to_owned(),
            timezone: String::new(),
            last_activity: String::new(),
            preferred_contact_method: CONTACT_METHODS[0].to_owned(),
            meeting_cadence: DEFAULT_MEETING_CADENCE.to_owned(),
            lifecycle_stage: LIFECYCLE_STAGES[0].to_owned(),
            next_step: String::new(),
            linkedin_profile: String::new(),
            notes: String::new(),
        }
    }
}

impl RecordForm for ContactForm {
    type Record = ContactRecord;

    fn field_specs() -> Vec<FormFieldSpec<Self>> {
        vec![
            field!("Contact name", FieldKind::Text, header),
            field!("Company", FieldKind::Text, company),
            field!("Role", FieldKind::Text, role),
            field!("Owner", FieldKind::Text, reviewer),
            field!("Source", FieldKind::Choice(&CONTACT_SOURCES), kind),
            field!("Status", FieldKind::Choice(&CONTACT_STATUSES), status),
            field!("Stage", FieldKind::Choice(&CONTACT_STAGES), stage),
            field!("Interest", FieldKind::Choice(&INTEREST_LEVELS), interest_level),
            field!("Email", FieldKind::Text, email),
            field!("Phone", FieldKind::Text, phone),
            field!("Target", FieldKind::Text, target),
            field!("Limit", FieldKind::Text, limit),
            field!("Time zone", FieldKind::Text, timezone),
            field!("Last activity", FieldKind::Text, last_activity),
            field!(
                "Preferred contact",
                FieldKind::Choice(&CONTACT_METHODS),
                preferred_contact_method
            ),
            field!("Meeting cadence", FieldKind::Text, meeting_cadence),
            field!(
                "Lifecycle stage",
                FieldKind::Choice(&LIFECYCLE_STAGES),
                lifecycle_stage
            ),
            field!("Next step", FieldKind::Text, next_step),
            field!("LinkedIn profile", FieldKind::Text, linkedin_profile),
            field!("Notes", FieldKind::Multiline, notes),
        ]
    }

    fn from_record(record: &ContactRecord) -> Self {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        let or_first = |value: &Option<String>, options: &[&str]| {
            value.clone().unwrap_or_else(|| options[0].to_owned())
        };
        Self {
            header: record.base.header.clone(),
            company: record.company.clone(),
            role: record.role.clone(),
            reviewer: record.base.reviewer.clone(),
            kind: record.base.kind.clone(),
            status: record.base.status.clone(),
            stage: record.stage.clone(),
            interest_level: record.interest_level.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            target: record.base.target.clone(),
            limit: record.base.limit.clone(),
            timezone: optional(&record.timezone),
            last_activity: record.last_activity.clone(),
            preferred_contact_method: or_first(&record.preferred_contact_method, &CONTACT_METHODS),
            meeting_cadence: record
                .meeting_cadence
                .clone()
                .unwrap_or_else(|| DEFAULT_MEETING_CADENCE.to_owned()),
            lifecycle_stage: or_first(&record.lifecycle_stage, &LIFECYCLE_STAGES),
            next_step: record.next_step.clone(),
            linkedin_profile: optional(&record.linkedin_profile),
            notes: record.notes.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        require(&self.header, "contact name", "a")?;
        require_count(&self.target, "target")?;
        require_count(&self.limit, "limit")?;
        require_email(&self.email, "email")?;
        Ok(())
    }

    fn into_record(self, id: RecordId) -> ContactRecord {
        ContactRecord {
            base: BaseRecord {
                id,
                header: self.header.trim().to_owned(),
                kind: self.kind,
                status: self.status,
                target: count_or_zero(&self.target),
                limit: count_or_zero(&self.limit),
                reviewer: self.reviewer,
            },
            company: self.company,
            role: self.role,
            email: self.email,
            phone: self.phone,
            stage: self.stage,
            last_activity: self.last_activity,
            next_step: self.next_step,
            interest_level: self.interest_level,
            notes: self.notes,
            timezone: non_empty(self.timezone),
            linkedin_profile: non_empty(self.linkedin_profile),
            preferred_contact_method: non_empty(self.preferred_contact_method),
            meeting_cadence: non_empty(self.meeting_cadence),
            lifecycle_stage: non_empty(self.lifecycle_stage),
        }
    }
}

spec_form_editor!(ContactForm);

const ARTICLE_FIELD_LABELS: [&str; 6] = [
    "Category",
    "Title",
    "Owner",
    "Status",
    "Summary",
    "Highlights",
];
const ARTICLE_STATUS_LABELS: [&str; 3] = [
    ArticleStatus::Published.label(),
    ArticleStatus::Draft.label(),
    ArticleStatus::InReview.label(),
];

/// Draft of a new knowledge article. Carries the category choices it was
/// opened with so it can be edited on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleForm {
    pub category_id: String,
    pub title: String,
    pub owner: String,
    pub status: ArticleStatus,
    pub summary: String,
    pub highlights: String,
    categories: Vec<(String, String)>,
}

impl ArticleForm {
    /// Blank draft filed under the first category, as a new draft.
    pub fn for_categories(categories: &[KnowledgeCategory]) -> Self {
        let categories = categories
            .iter()
            .map(|category| (category.id.clone(), category.title.clone()))
            .collect::<Vec<_>>();
        let category_id = categories
            .first()
            .map(|(id, _)| id.clone())
            .unwrap_or_default();
        Self {
            category_id,
            title: String::new(),
            owner: String::new(),
            status: ArticleStatus::Draft,
            summary: String::new(),
            highlights: String::new(),
            categories,
        }
    }

    /// One trimmed entry per non-blank line.
    pub fn highlight_lines(&self) -> Vec<String> {
        self.highlights
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    fn category_title(&self) -> &str {
        self.categories
            .iter()
            .find(|(id, _)| *id == self.category_id)
            .map_or(self.category_id.as_str(), |(_, title)| title.as_str())
    }

    fn text_slot(&mut self, index: usize) -> Option<&mut String> {
        match index {
            1 => Some(&mut self.title),
            2 => Some(&mut self.owner),
            4 => Some(&mut self.summary),
            5 => Some(&mut self.highlights),
            _ => None,
        }
    }
}

impl FormEditor for ArticleForm {
    fn field_count(&self) -> usize {
        ARTICLE_FIELD_LABELS.len()
    }

    fn field_label(&self, index: usize) -> &'static str {
        ARTICLE_FIELD_LABELS.get(index).copied().unwrap_or("")
    }

    fn field_kind(&self, index: usize) -> FieldKind {
        match index {
            0 => FieldKind::Choice(&[]),
            3 => FieldKind::Choice(&ARTICLE_STATUS_LABELS),
            4 | 5 => FieldKind::Multiline,
            _ => FieldKind::Text,
        }
    }

    fn field_value(&self, index: usize) -> String {
        match index {
            0 => self.category_title().to_owned(),
            1 => self.title.clone(),
            2 => self.owner.clone(),
            3 => self.status.label().to_owned(),
            4 => self.summary.clone(),
            5 => self.highlights.clone(),
            _ => String::new(),
        }
    }

    fn insert_char(&mut self, index: usize, ch: char) {
        let multiline = matches!(self.field_kind(index), FieldKind::Multiline);
        if let Some(slot) = self.text_slot(index)
            && (multiline || ch != '\n')
        {
            slot.push(ch);
        }
    }

    fn delete_char(&mut self, index: usize) {
        if let Some(slot) = self.text_slot(index) {
            slot.pop();
        }
    }

    fn cycle_choice(&mut self, index: usize, delta: isize) {
        match index {
            0 => {
                let ids = self
                    .categories
                    .iter()
                    .map(|(id, _)| id.as_str())
                    .collect::<Vec<_>>();
                self.category_id = cycle_in(&ids, &self.category_id, delta);
            }
            3 => {
                let next = cycle_in(&ARTICLE_STATUS_LABELS, self.status.label(), delta);
                if let Some(status) = ArticleStatus::parse(&next) {
                    self.status = status;
                }
            }
            _ => {}
        }
    }
}
