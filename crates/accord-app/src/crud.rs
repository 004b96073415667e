// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Create/edit/delete over one collection, layered on a [`TableEngine`].
//! The view never mutates the collection; it emits [`CrudEvent`]s for the
//! owner and re-syncs from the owner's snapshot afterwards.

use anyhow::Result;

use crate::commands::{ActionSet, BulkAction};
use crate::detail::DetailHooks;
use crate::forms::RecordForm;
use crate::ids::RecordId;
use crate::model::Record;
use crate::table::{ColumnDef, TableEngine, TableEvent};
use crate::views::ViewDefinition;

/// User-facing wording for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrudLabels {
    pub noun: &'static str,
    pub plural: &'static str,
    pub title_noun: &'static str,
    pub outline: &'static str,
    pub create_title: &'static str,
    pub edit_title: &'static str,
    pub create_description: &'static str,
    pub edit_description: &'static str,
    pub create_submit: &'static str,
    pub edit_submit: &'static str,
}

impl CrudLabels {
    pub fn count_noun(&self, count: usize) -> &'static str {
        if count == 1 { self.noun } else { self.plural }
    }
}

/// A record type with everything needed to manage it through a [`CrudView`].
pub trait CrudRecord: Record {
    type Form: RecordForm<Record = Self>;

    const LABELS: CrudLabels;

    fn columns() -> Vec<ColumnDef<Self>>;
    fn views() -> Vec<ViewDefinition<Self>>;
    fn detail_hooks() -> DetailHooks<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDialog<F> {
    pub mode: DialogMode,
    pub form: F,
    pub field: usize,
}

impl<F: RecordForm> FormDialog<F> {
    pub fn move_field(&mut self, delta: isize) {
        let count = self.form.field_count();
        if count == 0 {
            return;
        }
        self.field = (self.field as isize + delta).rem_euclid(count as isize) as usize;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogCopy {
    pub title: &'static str,
    pub description: &'static str,
    pub submit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: NoticeTone,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: NoticeTone::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudEvent<R> {
    Created(R),
    Updated(R),
    Deleted(RecordId),
    Reordered { active: RecordId, over: RecordId },
    Notice(Notice),
}

#[derive(Debug)]
pub struct CrudView<R: CrudRecord> {
    table: TableEngine<R>,
    dialog: Option<FormDialog<R::Form>>,
    selected: Vec<RecordId>,
    reset_signal: u64,
    high_water: i64,
}

impl<R: CrudRecord> CrudView<R> {
    pub fn new(page_size: usize) -> Self {
        let mut table = TableEngine::new(R::columns())
            .with_views(R::views())
            .with_outline_label(R::LABELS.outline)
            .with_detail_hooks(R::detail_hooks())
            .with_page_size(page_size);
        table.observe_clear_signal(0);
        Self {
            table,
            dialog: None,
            selected: Vec::new(),
            reset_signal: 0,
            high_water: 0,
        }
    }

    pub fn labels(&self) -> CrudLabels {
        R::LABELS
    }

    pub fn table(&self) -> &TableEngine<R> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableEngine<R> {
        &mut self.table
    }

    pub fn selected_ids(&self) -> &[RecordId] {
        &self.selected
    }

    pub fn reset_signal(&self) -> u64 {
        self.reset_signal
    }

    /// Takes a fresh snapshot from the owner.
    pub fn sync(&mut self, data: Vec<R>) -> Vec<CrudEvent<R>> {
        if let Some(max) = data.iter().map(|record| record.id().get()).max() {
            self.high_water = self.high_water.max(max);
        }
        if let Some(DialogMode::Edit(id)) = self.dialog.as_ref().map(|dialog| dialog.mode)
            && !data.iter().any(|record| record.id() == id)
        {
            self.dialog = None;
        }
        let events = self.table.sync(data);
        self.observe(&events)
    }

    /// Folds table events into view state; returns what the owner must apply.
    pub fn observe(&mut self, events: &[TableEvent]) -> Vec<CrudEvent<R>> {
        let mut out = Vec::new();
        for event in events {
            match event {
                TableEvent::SelectionChanged(ids) => self.selected = ids.clone(),
                TableEvent::OpenDetail(id) => {
                    self.open_edit(*id);
                }
                TableEvent::Reordered { active, over } => out.push(CrudEvent::Reordered {
                    active: *active,
                    over: *over,
                }),
                TableEvent::CursorUpdated | TableEvent::Status(_) => {}
            }
        }
        out
    }

    pub fn action_set(&self) -> ActionSet {
        ActionSet::for_selection(!self.selected.is_empty(), self.selected.len())
    }

    /// Runs a toolbar action if the current toolbar offers it.
    pub fn run_action(&mut self, action: BulkAction) -> Vec<CrudEvent<R>> {
        if !self.action_set().contains(action) {
            return Vec::new();
        }
        match action {
            BulkAction::Add => {
                self.open_create();
                Vec::new()
            }
            BulkAction::ExportAll => self.export_all(),
            BulkAction::AssignOwner => self.assign_owner(),
            BulkAction::ExportSelected => self.export_selected(),
            BulkAction::DeleteSelected => self.bulk_delete(),
            BulkAction::ClearSelection => {
                self.clear_selection();
                Vec::new()
            }
        }
    }

    // -- dialog --

    pub fn dialog(&self) -> Option<&FormDialog<R::Form>> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut FormDialog<R::Form>> {
        self.dialog.as_mut()
    }

    pub fn dialog_copy(&self) -> Option<DialogCopy> {
        let labels = R::LABELS;
        self.dialog.as_ref().map(|dialog| match dialog.mode {
            DialogMode::Create => DialogCopy {
                title: labels.create_title,
                description: labels.create_description,
                submit: labels.create_submit,
            },
            DialogMode::Edit(_) => DialogCopy {
                title: labels.edit_title,
                description: labels.edit_description,
                submit: labels.edit_submit,
            },
        })
    }

    pub fn open_create(&mut self) {
        self.dialog = Some(FormDialog {
            mode: DialogMode::Create,
            form: R::Form::default(),
            field: 0,
        });
    }

    /// Opens the edit dialog prefilled from `id`; returns false when `id` is
    /// not in the collection.
    pub fn open_edit(&mut self, id: RecordId) -> bool {
        let Some(record) = self.table.record(id) else {
            return false;
        };
        self.dialog = Some(FormDialog {
            mode: DialogMode::Edit(id),
            form: R::Form::from_record(record),
            field: 0,
        });
        true
    }

    /// Closes the dialog and resets the form to create defaults.
    pub fn cancel(&mut self) {
        self.dialog = None;
    }

    /// Validates the draft and emits the create or update. On a validation
    /// error the dialog stays open with the draft intact.
    pub fn submit(&mut self) -> Result<Vec<CrudEvent<R>>> {
        let Some(dialog) = self.dialog.as_ref() else {
            return Ok(Vec::new());
        };
        dialog.form.validate()?;
        let Some(dialog) = self.dialog.take() else {
            return Ok(Vec::new());
        };
        let labels = R::LABELS;
        let events = match dialog.mode {
            DialogMode::Create => {
                let id = self.next_id();
                let record = dialog.form.into_record(id);
                vec![
                    CrudEvent::Created(record),
                    CrudEvent::Notice(Notice::success(format!("{} created", labels.title_noun))),
                ]
            }
            DialogMode::Edit(id) => {
                let record = dialog.form.into_record(id);
                vec![
                    CrudEvent::Updated(record),
                    CrudEvent::Notice(Notice::success(format!("{} updated", labels.title_noun))),
                ]
            }
        };
        Ok(events)
    }

    /// `max + 1` over the collection, never below an id handed out before.
    pub fn next_id(&self) -> RecordId {
        let seen = RecordId::new(self.high_water);
        RecordId::next_after(self.table.data().iter().map(Record::id).chain([seen]))
    }

    // -- bulk actions --

    pub fn assign_owner(&mut self) -> Vec<CrudEvent<R>> {
        match self.selected.first().copied() {
            Some(id) => {
                self.open_edit(id);
                Vec::new()
            }
            None => vec![CrudEvent::Notice(Notice::error(format!(
                "Select at least one {} to assign",
                R::LABELS.noun
            )))],
        }
    }

    pub fn bulk_delete(&mut self) -> Vec<CrudEvent<R>> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        let doomed = std::mem::take(&mut self.selected);
        if let Some(DialogMode::Edit(id)) = self.dialog.as_ref().map(|dialog| dialog.mode)
            && doomed.contains(&id)
        {
            self.dialog = None;
        }
        let mut events = doomed
            .into_iter()
            .map(CrudEvent::Deleted)
            .collect::<Vec<_>>();
        self.clear_selection();
        events.push(CrudEvent::Notice(Notice::success(format!(
            "Selected {} deleted",
            R::LABELS.plural
        ))));
        events
    }

    /// Bumps the reset signal; the table clears its selection when it sees it.
    pub fn clear_selection(&mut self) {
        self.reset_signal += 1;
        self.selected.clear();
        let events = self.table.observe_clear_signal(self.reset_signal);
        self.observe(&events);
    }

    pub fn export_all(&self) -> Vec<CrudEvent<R>> {
        let count = self.table.data().len();
        vec![CrudEvent::Notice(Notice::success(format!(
            "Exported {count} {} to PDF",
            R::LABELS.count_noun(count)
        )))]
    }

    pub fn export_selected(&self) -> Vec<CrudEvent<R>> {
        let count = self.selected.len();
        if count == 0 {
            return vec![CrudEvent::Notice(Notice::error(format!(
                "Select at least one {} to export",
                R::LABELS.noun
            )))];
        }
        vec![CrudEvent::Notice(Notice::success(format!(
            "Exported {count} {} to PDF",
            R::LABELS.count_noun(count)
        )))]
    }
}

#[cfg(test)]
mod tests {
    use super::{CrudEvent, CrudView, DialogMode, NoticeTone};
    use crate::commands::{ActionSet, BulkAction};
    use crate::forms::RecordForm;
    use crate::table::{DragEnd, TableCommand, TableEvent, TableSurface};
    use crate::{AccountForm, AccountRecord, BaseRecord, RecordId};

    fn account(id: i64, header: &str, status: &str) -> AccountRecord {
        AccountRecord {
            base: BaseRecord {
                id: RecordId::new(id),
                header: header.to_owned(),
                kind: "Enterprise".to_owned(),
                status: status.to_owned(),
                target: "10".to_owned(),
                limit: "12".to_owned(),
                reviewer: "Eddie Lake".to_owned(),
            },
            industry: "Logistics".to_owned(),
            region: "West".to_owned(),
            stage: "Adoption".to_owned(),
            priority: "High".to_owned(),
            owner_email: "eddie@example.com".to_owned(),
            next_meeting: String::new(),
            last_interaction: String::new(),
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

    fn view_with(rows: Vec<AccountRecord>) -> CrudView<AccountRecord> {
        let mut view = CrudView::new(10);
        view.sync(rows);
        view
    }

    fn created(events: &[CrudEvent<AccountRecord>]) -> Option<&AccountRecord> {
        events.iter().find_map(|event| match event {
            CrudEvent::Created(record) => Some(record),
            _ => None,
        })
    }

    fn named(name: &str) -> AccountForm {
        AccountForm {
            header: name.to_owned(),
            ..AccountForm::default()
        }
    }

    /// Applies create/delete events the way the store does: prepend on create.
    fn apply(rows: &mut Vec<AccountRecord>, events: &[CrudEvent<AccountRecord>]) {
        for event in events {
            match event {
                CrudEvent::Created(record) => rows.insert(0, record.clone()),
                CrudEvent::Deleted(id) => rows.retain(|row| row.base.id != *id),
                _ => {}
            }
        }
    }

    #[test]
    fn creates_from_empty_assign_sequential_ids() -> anyhow::Result<()> {
        let mut rows = Vec::new();
        let mut view = view_with(Vec::new());
        for n in 1..=4 {
            view.open_create();
            if let Some(dialog) = view.dialog_mut() {
                dialog.form = named(&format!("Account {n}"));
            }
            let events = view.submit()?;
            apply(&mut rows, &events);
            view.sync(rows.clone());
        }
        let mut ids = rows.iter().map(|row| row.base.id.get()).collect::<Vec<_>>();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(rows[0].base.header, "Account 4");
        Ok(())
    }

    #[test]
    fn id_after_deleting_max_is_not_reused() -> anyhow::Result<()> {
        let mut rows = vec![account(1, "a", "Active"), account(2, "b", "Active")];
        let mut view = view_with(rows.clone());
        rows.retain(|row| row.base.id != RecordId::new(2));
        view.sync(rows.clone());

        view.open_create();
        if let Some(dialog) = view.dialog_mut() {
            dialog.form = named("c");
        }
        let events = view.submit()?;
        assert_eq!(
            created(&events).map(|record| record.base.id),
            Some(RecordId::new(3))
        );
        Ok(())
    }

    #[test]
    fn rejected_create_does_not_consume_its_id() -> anyhow::Result<()> {
        let mut view = view_with(Vec::new());
        for _ in 0..2 {
            view.open_create();
            if let Some(dialog) = view.dialog_mut() {
                dialog.form = named("Northwind");
            }
            let events = view.submit()?;
            assert_eq!(
                created(&events).map(|record| record.base.id),
                Some(RecordId::new(1))
            );
            // The owner never stored it, so the snapshot stays empty.
            view.sync(Vec::new());
        }
        Ok(())
    }

    #[test]
    fn invalid_submit_keeps_dialog_open() {
        let mut view = view_with(Vec::new());
        view.open_create();
        let error = view.submit().expect_err("blank name");
        assert!(error.to_string().contains("account name is required"));
        assert!(view.dialog().is_some());
    }

    #[test]
    fn edit_keeps_original_id_and_closes() -> anyhow::Result<()> {
        let mut view = view_with(vec![account(7, "Northwind", "Active")]);
        assert!(view.open_edit(RecordId::new(7)));
        assert_eq!(
            view.dialog_copy().map(|copy| copy.title),
            Some("Edit account")
        );
        if let Some(dialog) = view.dialog_mut() {
            dialog.form.region = "East".to_owned();
        }
        let events = view.submit()?;
        match &events[0] {
            CrudEvent::Updated(record) => {
                assert_eq!(record.base.id, RecordId::new(7));
                assert_eq!(record.region, "East");
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(view.dialog().is_none());
        Ok(())
    }

    #[test]
    fn cancel_resets_to_create_defaults() {
        let mut view = view_with(vec![account(1, "a", "Active")]);
        view.open_edit(RecordId::new(1));
        view.cancel();
        view.open_create();
        let dialog = view.dialog().expect("dialog open");
        assert_eq!(dialog.mode, DialogMode::Create);
        assert_eq!(dialog.form, AccountForm::default());
    }

    #[test]
    fn toolbar_follows_selection() {
        let mut view = view_with(vec![account(1, "a", "Active"), account(2, "b", "Closed")]);
        assert_eq!(view.action_set(), ActionSet::Idle);
        let events = view.table_mut().apply(TableCommand::ToggleRow);
        view.observe(&events);
        assert_eq!(view.action_set(), ActionSet::Selection { count: 1 });
    }

    #[test]
    fn assign_owner_edits_first_selected() {
        let mut view = view_with(vec![account(1, "a", "Active"), account(2, "b", "Closed")]);
        let events = view.table_mut().toggle_row(RecordId::new(2));
        view.observe(&events);
        let events = view.table_mut().toggle_row(RecordId::new(1));
        view.observe(&events);
        view.run_action(BulkAction::AssignOwner);
        assert_eq!(
            view.dialog().map(|dialog| dialog.mode),
            Some(DialogMode::Edit(RecordId::new(1)))
        );
    }

    #[test]
    fn bulk_delete_closes_dialog_of_deleted_record() {
        let mut view = view_with(vec![
            account(1, "a", "Active"),
            account(2, "b", "Active"),
            account(3, "c", "Active"),
        ]);
        for id in [1, 3] {
            let events = view.table_mut().toggle_row(RecordId::new(id));
            view.observe(&events);
        }
        view.open_edit(RecordId::new(3));

        let events = view.run_action(BulkAction::DeleteSelected);
        assert_eq!(
            events[..2],
            [
                CrudEvent::Deleted(RecordId::new(1)),
                CrudEvent::Deleted(RecordId::new(3)),
            ]
        );
        match &events[2] {
            CrudEvent::Notice(notice) => assert_eq!(notice.message, "Selected accounts deleted"),
            other => panic!("expected notice, got {other:?}"),
        }
        assert!(view.dialog().is_none());
        assert!(view.selected_ids().is_empty());
        assert!(view.table().selected_ids().is_empty());
        assert_eq!(view.reset_signal(), 1);
    }

    #[test]
    fn bulk_delete_keeps_dialog_of_surviving_record() {
        let mut view = view_with(vec![account(1, "a", "Active"), account(2, "b", "Active")]);
        let events = view.table_mut().toggle_row(RecordId::new(1));
        view.observe(&events);
        view.open_edit(RecordId::new(2));
        view.bulk_delete();
        assert!(view.dialog().is_some());
    }

    #[test]
    fn export_reports_counts_and_requires_selection() {
        let mut view = view_with(vec![account(1, "a", "Active"), account(2, "b", "Active")]);
        let notice = |events: Vec<CrudEvent<AccountRecord>>| match events.into_iter().next() {
            Some(CrudEvent::Notice(notice)) => notice,
            other => panic!("expected notice, got {other:?}"),
        };

        assert_eq!(notice(view.export_all()).message, "Exported 2 accounts to PDF");
        let missing = notice(view.export_selected());
        assert_eq!(missing.tone, NoticeTone::Error);
        assert_eq!(missing.message, "Select at least one account to export");

        let events = view.table_mut().toggle_row(RecordId::new(2));
        view.observe(&events);
        assert_eq!(
            notice(view.export_selected()).message,
            "Exported 1 account to PDF"
        );
    }

    #[test]
    fn row_open_routes_to_edit_dialog() {
        let mut view = view_with(vec![account(5, "a", "Active")]);
        let events = view.table_mut().apply(TableCommand::OpenRow);
        assert_eq!(events, vec![TableEvent::OpenDetail(RecordId::new(5))]);
        view.observe(&events);
        assert_eq!(
            view.dialog().map(|dialog| dialog.mode),
            Some(DialogMode::Edit(RecordId::new(5)))
        );
    }

    #[test]
    fn reorder_is_forwarded_to_owner() {
        let mut view = view_with(vec![account(1, "a", "Active"), account(2, "b", "Active")]);
        let events = view.table_mut().drag_end(DragEnd {
            active: RecordId::new(2),
            over: Some(RecordId::new(1)),
        });
        assert_eq!(
            view.observe(&events),
            vec![CrudEvent::Reordered {
                active: RecordId::new(2),
                over: RecordId::new(1),
            }]
        );
    }

    #[test]
    fn sync_closes_dialog_when_record_disappears() {
        let mut view = view_with(vec![account(1, "a", "Active")]);
        view.open_edit(RecordId::new(1));
        view.sync(Vec::new());
        assert!(view.dialog().is_none());
        assert!(AccountForm::from_record(&account(1, "a", "Active")).validate().is_ok());
    }
}
