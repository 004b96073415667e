// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Record-agnostic table state: sorting, the status facet, column
//! visibility, pagination, selection, manual reorder, view switching, and the
//! detail drawer. The engine only ever sees snapshots handed to [`TableEngine::sync`];
//! changes the owner must apply come back as [`TableEvent`]s.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::detail::{DetailHooks, DetailView};
use crate::ids::RecordId;
use crate::model::Record;
use crate::views::{DEFAULT_OUTLINE_LABEL, OUTLINE_VIEW_ID, ViewDefinition, ViewTab};

pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const NO_RESULTS_LABEL: &str = "No results.";
pub const ALL_STATUSES_LABEL: &str = "All statuses";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    DragHandle,
    Select,
    Label,
    Data,
}

pub struct ColumnDef<R> {
    pub key: &'static str,
    pub header: &'static str,
    pub kind: ColumnKind,
    pub value: fn(&R) -> &str,
    pub sortable: bool,
    pub hideable: bool,
    pub visible_by_default: bool,
    pub align_right: bool,
}

impl<R> ColumnDef<R> {
    pub fn data(key: &'static str, header: &'static str, value: fn(&R) -> &str) -> Self {
        Self {
            key,
            header,
            kind: ColumnKind::Data,
            value,
            sortable: true,
            hideable: true,
            visible_by_default: true,
            align_right: false,
        }
    }

    pub fn right_aligned(mut self) -> Self {
        self.align_right = true;
        self
    }

    pub fn hidden_by_default(mut self) -> Self {
        self.visible_by_default = false;
        self
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ColumnDef<R> {}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish_non_exhaustive()
    }
}

fn blank_cell<R>(_: &R) -> &str {
    ""
}

/// Drag handle, selector, label, then the shared base fields.
pub fn standard_columns<R: Record>() -> Vec<ColumnDef<R>> {
    vec![
        ColumnDef::<R> {
            key: "drag",
            header: "",
            kind: ColumnKind::DragHandle,
            value: blank_cell,
            sortable: false,
            hideable: false,
            visible_by_default: true,
            align_right: false,
        },
        ColumnDef::<R> {
            key: "select",
            header: "",
            kind: ColumnKind::Select,
            value: blank_cell,
            sortable: false,
            hideable: false,
            visible_by_default: true,
            align_right: false,
        },
        ColumnDef::<R> {
            key: "header",
            header: "Header",
            kind: ColumnKind::Label,
            value: |record| record.base().header.as_str(),
            sortable: true,
            hideable: false,
            visible_by_default: true,
            align_right: false,
        },
        ColumnDef::<R>::data("type", "Section Type", |record| {
            record.base().kind.as_str()
        }),
        ColumnDef::<R>::data("status", "Status", |record| {
            record.base().status.as_str()
        }),
        ColumnDef::<R>::data("target", "Target", |record| {
            record.base().target.as_str()
        })
        .right_aligned(),
        ColumnDef::<R>::data("limit", "Limit", |record| record.base().limit.as_str())
            .right_aligned(),
        ColumnDef::<R>::data("reviewer", "Reviewer", |record| {
            record.base().reviewer.as_str()
        }),
    ]
}

/// Case-insensitive comparison where digit runs compare by numeric value.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut left = left.chars().peekable();
    let mut right = right.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                let a_digits = take_digits(&mut left);
                let b_digits = take_digits(&mut right);
                let a_trimmed = a_digits.trim_start_matches('0');
                let b_trimmed = b_digits.trim_start_matches('0');
                let ordering = a_trimmed
                    .len()
                    .cmp(&b_trimmed.len())
                    .then_with(|| a_trimmed.cmp(b_trimmed));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(a), Some(b)) => {
                let ordering = a.to_lowercase().cmp(b.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(&next) = chars.peek() {
        if !next.is_ascii_digit() {
            break;
        }
        digits.push(next);
        chars.next();
    }
    digits
}

/// Moves the item at `from` so it lands at `to`, shifting the rest.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Normalized end of a drag gesture, independent of the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub active: RecordId,
    pub over: Option<RecordId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection {
    All,
    Some,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    CycleSort,
    ClearSort,
    ToggleRow,
    TogglePage,
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    CyclePageSize,
    NextView,
    PreviousView,
    OpenFilter,
    MoveFilterDraft(isize),
    ApplyFilter,
    ClearFilter,
    DismissFilter,
    OpenColumns,
    MoveColumnCursor(isize),
    ToggleColumn,
    ResetColumns,
    CloseColumns,
    OpenRow,
    PreviewRow,
    CloseDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    NoRows,
    SortUnavailable,
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    FilterOpen,
    FilterApplied(String),
    FilterCleared,
    FilterDismissed,
    ColumnsOpen,
    ColumnsClosed,
    ColumnHidden(&'static str),
    ColumnShown(&'static str),
    ColumnLocked(&'static str),
    ColumnUnknown(usize),
    ColumnsReset,
    Page { number: usize, count: usize },
    AlreadyFirstPage,
    AlreadyLastPage,
    PageSize(usize),
    PageSizeUnsupported(usize),
    View(&'static str),
    RowMoved(String),
    DetailClosed,
}

impl TableStatus {
    pub fn message(&self) -> String {
        match self {
            Self::NoRows => "no rows".to_owned(),
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::FilterOpen => "filter open".to_owned(),
            Self::FilterApplied(status) => format!("filter status: {status}"),
            Self::FilterCleared => "filter cleared".to_owned(),
            Self::FilterDismissed => "filter unchanged".to_owned(),
            Self::ColumnsOpen => "columns open".to_owned(),
            Self::ColumnsClosed => "columns closed".to_owned(),
            Self::ColumnHidden(label) => format!("column hidden: {label}"),
            Self::ColumnShown(label) => format!("column shown: {label}"),
            Self::ColumnLocked(label) => format!("column always shown: {label}"),
            Self::ColumnUnknown(index) => format!("no column at position {index}"),
            Self::ColumnsReset => "all columns shown".to_owned(),
            Self::Page { number, count } => format!("page {number} of {count}"),
            Self::AlreadyFirstPage => "already on first page".to_owned(),
            Self::AlreadyLastPage => "already on last page".to_owned(),
            Self::PageSize(size) => format!("{size} rows per page"),
            Self::PageSizeUnsupported(size) => format!("page size {size} unsupported"),
            Self::View(label) => format!("view: {label}"),
            Self::RowMoved(label) => format!("moved {label}"),
            Self::DetailClosed => "detail closed".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
    /// Full ascending list of selected ids after any selection change.
    SelectionChanged(Vec<RecordId>),
    /// The owner must apply the same move to its collection.
    Reordered {
        active: RecordId,
        over: RecordId,
    },
    /// Row open routed to the owner by [`DetailHooks::open_externally`].
    OpenDetail(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDialogView {
    pub options: Vec<FilterOption>,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDialogView {
    pub entries: Vec<(&'static str, bool)>,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: &'static str,
    pub kind: ColumnKind,
    pub sort: Option<SortDirection>,
    pub align_right: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: RecordId,
    pub cells: Vec<String>,
    pub selected: bool,
}

/// Everything a renderer needs for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub views: Vec<ViewTab>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<DisplayRow>,
    pub page_selection: PageSelection,
    pub selection_summary: String,
    pub page_number: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub status_filter: Option<String>,
    pub hidden_count: usize,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl PageView {
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_number, self.page_count)
    }
}

/// Object-safe face of a [`TableEngine`] so callers can drive whichever table
/// is on screen without knowing its record type.
pub trait TableSurface {
    fn apply(&mut self, command: TableCommand) -> Vec<TableEvent>;
    fn drag_end(&mut self, drag: DragEnd) -> Vec<TableEvent>;
    fn page_view(&self) -> PageView;
    fn detail_view(&self) -> Option<DetailView>;
    fn filter_dialog(&self) -> Option<FilterDialogView>;
    fn column_dialog(&self) -> Option<ColumnDialogView>;
    fn cursor_record_id(&self) -> Option<RecordId>;
    fn page_record_ids(&self) -> Vec<RecordId>;
    fn set_cursor_row(&mut self, row: usize);
}

pub struct TableEngine<R> {
    columns: Vec<ColumnDef<R>>,
    views: Vec<ViewDefinition<R>>,
    outline_label: &'static str,
    hooks: DetailHooks<R>,
    data: Vec<R>,
    active_view: &'static str,
    sort: Option<SortSpec>,
    status_filter: Option<String>,
    filter_draft: Option<String>,
    column_dialog: Option<usize>,
    hidden_columns: BTreeSet<usize>,
    page_size: usize,
    page_index: usize,
    selected: BTreeSet<RecordId>,
    last_clear_signal: Option<u64>,
    cursor_row: usize,
    cursor_col: usize,
    detail: Option<RecordId>,
}

impl<R> fmt::Debug for TableEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableEngine")
            .field("rows", &self.data.len())
            .field("active_view", &self.active_view)
            .field("sort", &self.sort)
            .field("status_filter", &self.status_filter)
            .field("page_size", &self.page_size)
            .field("page_index", &self.page_index)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl<R: Record> TableEngine<R> {
    pub fn new(columns: Vec<ColumnDef<R>>) -> Self {
        let hidden_columns = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.hideable && !column.visible_by_default)
            .map(|(index, _)| index)
            .collect();
        Self {
            columns,
            views: Vec::new(),
            outline_label: DEFAULT_OUTLINE_LABEL,
            hooks: DetailHooks::default(),
            data: Vec::new(),
            active_view: OUTLINE_VIEW_ID,
            sort: None,
            status_filter: None,
            filter_draft: None,
            column_dialog: None,
            hidden_columns,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            selected: BTreeSet::new(),
            last_clear_signal: None,
            cursor_row: 0,
            cursor_col: 0,
            detail: None,
        }
    }

    pub fn with_views(mut self, views: Vec<ViewDefinition<R>>) -> Self {
        self.views = views;
        if self.active_view_definition().is_none() {
            self.active_view = OUTLINE_VIEW_ID;
        }
        self
    }

    pub fn with_outline_label(mut self, label: &'static str) -> Self {
        self.outline_label = label;
        self
    }

    pub fn with_detail_hooks(mut self, hooks: DetailHooks<R>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Unsupported sizes keep the default.
    pub fn with_page_size(mut self, size: usize) -> Self {
        if PAGE_SIZES.contains(&size) {
            self.page_size = size;
        }
        self
    }

    /// Replaces the snapshot. Selected ids that no longer exist are dropped.
    pub fn sync(&mut self, data: Vec<R>) -> Vec<TableEvent> {
        self.data = data;
        let before = self.selected.len();
        let present = self.data.iter().map(Record::id).collect::<BTreeSet<_>>();
        self.selected.retain(|id| present.contains(id));
        if let Some(id) = self.detail
            && !present.contains(&id)
        {
            self.detail = None;
        }
        self.clamp_cursor();
        if self.selected.len() == before {
            Vec::new()
        } else {
            vec![self.selection_event()]
        }
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    pub fn record(&self, id: RecordId) -> Option<&R> {
        self.data.iter().find(|record| record.id() == id)
    }

    pub fn columns(&self) -> &[ColumnDef<R>] {
        &self.columns
    }

    pub fn outline_label(&self) -> &'static str {
        self.outline_label
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.data.iter().position(|record| record.id() == id)
    }

    // -- views --

    fn active_view_definition(&self) -> Option<&ViewDefinition<R>> {
        self.views.iter().find(|view| view.id == self.active_view)
    }

    /// Active view id; unknown ids resolve to the outline.
    pub fn active_view(&self) -> &'static str {
        match self.active_view_definition() {
            Some(view) => view.id,
            None => OUTLINE_VIEW_ID,
        }
    }

    pub fn view_tabs(&self) -> Vec<ViewTab> {
        let active = self.active_view();
        let mut tabs = vec![ViewTab {
            id: OUTLINE_VIEW_ID,
            label: self.outline_label,
            badge: None,
            active: active == OUTLINE_VIEW_ID,
        }];
        tabs.extend(self.views.iter().map(|view| ViewTab {
            id: view.id,
            label: view.label,
            badge: Some(view.badge(&self.data)).filter(|count| *count > 0),
            active: active == view.id,
        }));
        tabs
    }

    pub fn select_view(&mut self, id: &str) -> TableStatus {
        match self.views.iter().find(|view| view.id == id).copied() {
            Some(view) => {
                self.active_view = view.id;
                self.clamp_cursor();
                TableStatus::View(view.label)
            }
            None => {
                self.active_view = OUTLINE_VIEW_ID;
                self.clamp_cursor();
                TableStatus::View(self.outline_label)
            }
        }
    }

    fn rotate_view(&mut self, delta: isize) -> TableStatus {
        let tabs = self.view_tabs();
        let current = tabs.iter().position(|tab| tab.active).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        self.select_view(tabs[next].id)
    }

    // -- row pipeline: view, status facet, sort, page --

    pub fn view_rows(&self) -> Vec<&R> {
        let view = self.active_view_definition();
        self.data
            .iter()
            .filter(|record| view.is_none_or(|view| view.matches(record)))
            .collect()
    }

    pub fn filtered_rows(&self) -> Vec<&R> {
        let mut rows = self
            .view_rows()
            .into_iter()
            .filter(|record| {
                self.status_filter
                    .as_deref()
                    .is_none_or(|status| record.base().status == status)
            })
            .collect::<Vec<_>>();
        if let Some(sort) = self.sort
            && let Some(column) = self.columns.get(sort.column)
        {
            let value = column.value;
            rows.sort_by(|left, right| {
                let ordering = natural_cmp(value(left), value(right));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        rows
    }

    pub fn page_rows(&self) -> Vec<&R> {
        let start = self.page_index() * self.page_size;
        self.filtered_rows()
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    // -- sorting --

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Unsorted, ascending, descending, unsorted.
    pub fn cycle_sort(&mut self, column: usize) -> TableStatus {
        let Some(def) = self.columns.get(column) else {
            return TableStatus::SortUnavailable;
        };
        if !def.sortable {
            return TableStatus::SortUnavailable;
        }
        let header = def.header;
        let next = match self.sort {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Asc => Some(SortDirection::Desc),
                SortDirection::Desc => None,
            },
            _ => Some(SortDirection::Asc),
        };
        self.sort = next.map(|direction| SortSpec { column, direction });
        self.clamp_cursor();
        match next {
            Some(SortDirection::Asc) => TableStatus::SortAsc(header),
            Some(SortDirection::Desc) => TableStatus::SortDesc(header),
            None => TableStatus::SortCleared,
        }
    }

    pub fn clear_sort(&mut self) -> TableStatus {
        self.sort = None;
        TableStatus::SortCleared
    }

    // -- status facet --

    pub fn status_filter(&self) -> Option<&str> {
        self.status_filter.as_deref()
    }

    /// "All statuses" followed by the distinct statuses of the snapshot.
    pub fn status_options(&self) -> Vec<FilterOption> {
        let mut statuses = self
            .data
            .iter()
            .map(|record| record.base().status.as_str())
            .filter(|status| !status.is_empty())
            .collect::<Vec<_>>();
        statuses.sort_by(|left, right| {
            left.to_lowercase()
                .cmp(&right.to_lowercase())
                .then_with(|| left.cmp(right))
        });
        statuses.dedup();

        let mut options = vec![FilterOption {
            label: ALL_STATUSES_LABEL.to_owned(),
            value: String::new(),
        }];
        options.extend(statuses.into_iter().map(|status| FilterOption {
            label: status.to_owned(),
            value: status.to_owned(),
        }));
        options
    }

    /// Opens the dialog with the draft seeded from the committed value.
    pub fn open_filter_dialog(&mut self) -> TableStatus {
        self.filter_draft = Some(self.status_filter.clone().unwrap_or_default());
        TableStatus::FilterOpen
    }

    pub fn filter_draft(&self) -> Option<&str> {
        self.filter_draft.as_deref()
    }

    pub fn set_filter_draft(&mut self, value: impl Into<String>) {
        if self.filter_draft.is_some() {
            self.filter_draft = Some(value.into());
        }
    }

    fn move_filter_draft(&mut self, delta: isize) {
        let Some(draft) = self.filter_draft.as_deref() else {
            return;
        };
        let options = self.status_options();
        let current = options
            .iter()
            .position(|option| option.value == draft)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(options.len() as isize) as usize;
        self.filter_draft = Some(options[next].value.clone());
    }

    /// Commits the draft; an empty draft removes the filter.
    pub fn apply_filter(&mut self) -> TableStatus {
        let draft = self.filter_draft.take().unwrap_or_default();
        self.status_filter = if draft.is_empty() { None } else { Some(draft) };
        self.clamp_cursor();
        match &self.status_filter {
            Some(status) => TableStatus::FilterApplied(status.clone()),
            None => TableStatus::FilterCleared,
        }
    }

    pub fn clear_filter(&mut self) -> TableStatus {
        self.filter_draft = None;
        self.status_filter = None;
        self.clamp_cursor();
        TableStatus::FilterCleared
    }

    /// Closes the dialog and discards the draft.
    pub fn dismiss_filter_dialog(&mut self) -> TableStatus {
        self.filter_draft = None;
        TableStatus::FilterDismissed
    }

    // -- column visibility --

    /// Columns offered in the column dialog.
    pub fn hideable_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.hideable)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_column_visible(&self, index: usize) -> bool {
        !self.hidden_columns.contains(&index)
    }

    pub fn visible_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|index| self.is_column_visible(*index))
            .collect()
    }

    pub fn toggle_column(&mut self, index: usize) -> TableStatus {
        let Some(column) = self.columns.get(index) else {
            return TableStatus::ColumnUnknown(index);
        };
        if !column.hideable {
            return TableStatus::ColumnLocked(column.header);
        }
        let header = column.header;
        let status = if self.hidden_columns.remove(&index) {
            TableStatus::ColumnShown(header)
        } else {
            self.hidden_columns.insert(index);
            TableStatus::ColumnHidden(header)
        };
        self.clamp_cursor();
        status
    }

    pub fn reset_columns(&mut self) -> TableStatus {
        self.hidden_columns.clear();
        TableStatus::ColumnsReset
    }

    // -- pagination --

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count_for(self.filtered_rows().len(), self.page_size)
    }

    /// Effective page index, clamped to the current page count.
    pub fn page_index(&self) -> usize {
        self.page_index.min(self.page_count() - 1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    /// Keeps the page index unless the new page count no longer reaches it.
    pub fn set_page_size(&mut self, size: usize) -> TableStatus {
        if !PAGE_SIZES.contains(&size) {
            return TableStatus::PageSizeUnsupported(size);
        }
        self.page_size = size;
        let count = self.page_count();
        if self.page_index >= count {
            self.page_index = count - 1;
        }
        self.clamp_cursor();
        TableStatus::PageSize(size)
    }

    fn cycle_page_size(&mut self) -> TableStatus {
        let current = PAGE_SIZES
            .iter()
            .position(|size| *size == self.page_size)
            .unwrap_or(0);
        self.set_page_size(PAGE_SIZES[(current + 1) % PAGE_SIZES.len()])
    }

    pub fn first_page(&mut self) -> TableStatus {
        if !self.can_previous_page() {
            return TableStatus::AlreadyFirstPage;
        }
        self.go_to_page(0)
    }

    pub fn previous_page(&mut self) -> TableStatus {
        if !self.can_previous_page() {
            return TableStatus::AlreadyFirstPage;
        }
        self.go_to_page(self.page_index() - 1)
    }

    pub fn next_page(&mut self) -> TableStatus {
        if !self.can_next_page() {
            return TableStatus::AlreadyLastPage;
        }
        self.go_to_page(self.page_index() + 1)
    }

    pub fn last_page(&mut self) -> TableStatus {
        if !self.can_next_page() {
            return TableStatus::AlreadyLastPage;
        }
        self.go_to_page(self.page_count() - 1)
    }

    fn go_to_page(&mut self, index: usize) -> TableStatus {
        self.page_index = index;
        self.cursor_row = 0;
        TableStatus::Page {
            number: index + 1,
            count: self.page_count(),
        }
    }

    // -- selection --

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selected.iter().copied().collect()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    fn selection_event(&self) -> TableEvent {
        TableEvent::SelectionChanged(self.selected_ids())
    }

    pub fn toggle_row(&mut self, id: RecordId) -> Vec<TableEvent> {
        if self.position(id).is_none() {
            return Vec::new();
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        vec![self.selection_event()]
    }

    /// Selects every row of the current page, or clears them when all are
    /// already selected. Rows on other pages are untouched.
    pub fn toggle_page_selection(&mut self) -> Vec<TableEvent> {
        let ids = self
            .page_rows()
            .into_iter()
            .map(Record::id)
            .collect::<Vec<_>>();
        if ids.is_empty() {
            return Vec::new();
        }
        if ids.iter().all(|id| self.selected.contains(id)) {
            for id in &ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(ids);
        }
        vec![self.selection_event()]
    }

    pub fn page_selection(&self) -> PageSelection {
        let ids = self
            .page_rows()
            .into_iter()
            .map(Record::id)
            .collect::<Vec<_>>();
        let selected = ids.iter().filter(|id| self.selected.contains(id)).count();
        if selected == 0 {
            PageSelection::None
        } else if selected == ids.len() {
            PageSelection::All
        } else {
            PageSelection::Some
        }
    }

    pub fn selection_summary(&self) -> String {
        let rows = self.filtered_rows();
        let selected = rows
            .iter()
            .filter(|record| self.selected.contains(&record.id()))
            .count();
        format!("{selected} of {} row(s) selected.", rows.len())
    }

    /// Clears the selection whenever `signal` differs from the last value seen.
    pub fn observe_clear_signal(&mut self, signal: u64) -> Vec<TableEvent> {
        if self.last_clear_signal == Some(signal) {
            return Vec::new();
        }
        self.last_clear_signal = Some(signal);
        self.selected.clear();
        vec![self.selection_event()]
    }

    // -- manual reorder --

    /// Moves `active` to where `over` sits in the full snapshot, whatever view,
    /// filter or sort is applied. Unresolvable drops do nothing.
    pub fn drag_end(&mut self, drag: DragEnd) -> Vec<TableEvent> {
        let Some(over) = drag.over else {
            return Vec::new();
        };
        if drag.active == over {
            return Vec::new();
        }
        let (Some(from), Some(to)) = (self.position(drag.active), self.position(over)) else {
            return Vec::new();
        };
        let label = self.data[from].base().header.clone();
        move_item(&mut self.data, from, to);
        vec![
            TableEvent::Reordered {
                active: drag.active,
                over,
            },
            TableEvent::Status(TableStatus::RowMoved(label)),
        ]
    }

    // -- detail drawer --

    pub fn open_row(&mut self, id: RecordId) -> Vec<TableEvent> {
        if self.position(id).is_none() {
            return Vec::new();
        }
        if self.hooks.open_externally {
            return vec![TableEvent::OpenDetail(id)];
        }
        self.detail = Some(id);
        Vec::new()
    }

    /// Opens the drawer even when row open is routed to the owner.
    pub fn preview_row(&mut self, id: RecordId) {
        if self.position(id).is_some() {
            self.detail = Some(id);
        }
    }

    pub fn close_detail(&mut self) -> TableStatus {
        self.detail = None;
        TableStatus::DetailClosed
    }

    pub fn detail_id(&self) -> Option<RecordId> {
        self.detail
    }

    // -- cursor --

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    fn clamp_cursor(&mut self) {
        let rows = self.page_rows().len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
        let columns = self.visible_columns().len();
        self.cursor_col = self.cursor_col.min(columns.saturating_sub(1));
    }

    fn move_row(&mut self, delta: isize) {
        let rows = self.page_rows().len();
        if rows == 0 {
            self.cursor_row = 0;
            return;
        }
        let next = (self.cursor_row as isize + delta).clamp(0, rows as isize - 1);
        self.cursor_row = next as usize;
    }

    fn move_col(&mut self, delta: isize) {
        let columns = self.visible_columns().len();
        if columns == 0 {
            self.cursor_col = 0;
            return;
        }
        let next = (self.cursor_col as isize + delta).clamp(0, columns as isize - 1);
        self.cursor_col = next as usize;
    }

    fn cursor_column_index(&self) -> Option<usize> {
        self.visible_columns().get(self.cursor_col).copied()
    }

    fn move_column_cursor(&mut self, delta: isize) {
        let Some(cursor) = self.column_dialog else {
            return;
        };
        let len = self.hideable_columns().len();
        if len == 0 {
            return;
        }
        self.column_dialog = Some((cursor as isize + delta).rem_euclid(len as isize) as usize);
    }

    fn toggle_column_at_cursor(&mut self) -> Option<TableStatus> {
        let cursor = self.column_dialog?;
        let index = self.hideable_columns().get(cursor).copied()?;
        Some(self.toggle_column(index))
    }

    fn status(status: TableStatus) -> Vec<TableEvent> {
        vec![TableEvent::Status(status)]
    }
}

fn page_count_for(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

impl<R: Record> TableSurface for TableEngine<R> {
    fn apply(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::MoveRow(delta) => {
                self.move_row(delta);
                vec![TableEvent::CursorUpdated]
            }
            TableCommand::MoveColumn(delta) => {
                self.move_col(delta);
                vec![TableEvent::CursorUpdated]
            }
            TableCommand::JumpFirstRow => {
                self.cursor_row = 0;
                vec![TableEvent::CursorUpdated]
            }
            TableCommand::JumpLastRow => {
                self.cursor_row = self.page_rows().len().saturating_sub(1);
                vec![TableEvent::CursorUpdated]
            }
            TableCommand::CycleSort => match self.cursor_column_index() {
                Some(column) => Self::status(self.cycle_sort(column)),
                None => Self::status(TableStatus::SortUnavailable),
            },
            TableCommand::ClearSort => Self::status(self.clear_sort()),
            TableCommand::ToggleRow => match self.cursor_record_id() {
                Some(id) => self.toggle_row(id),
                None => Self::status(TableStatus::NoRows),
            },
            TableCommand::TogglePage => self.toggle_page_selection(),
            TableCommand::FirstPage => Self::status(self.first_page()),
            TableCommand::PreviousPage => Self::status(self.previous_page()),
            TableCommand::NextPage => Self::status(self.next_page()),
            TableCommand::LastPage => Self::status(self.last_page()),
            TableCommand::CyclePageSize => Self::status(self.cycle_page_size()),
            TableCommand::NextView => Self::status(self.rotate_view(1)),
            TableCommand::PreviousView => Self::status(self.rotate_view(-1)),
            TableCommand::OpenFilter => Self::status(self.open_filter_dialog()),
            TableCommand::MoveFilterDraft(delta) => {
                self.move_filter_draft(delta);
                Vec::new()
            }
            TableCommand::ApplyFilter => Self::status(self.apply_filter()),
            TableCommand::ClearFilter => Self::status(self.clear_filter()),
            TableCommand::DismissFilter => Self::status(self.dismiss_filter_dialog()),
            TableCommand::OpenColumns => {
                self.column_dialog = Some(0);
                Self::status(TableStatus::ColumnsOpen)
            }
            TableCommand::MoveColumnCursor(delta) => {
                self.move_column_cursor(delta);
                Vec::new()
            }
            TableCommand::ToggleColumn => self
                .toggle_column_at_cursor()
                .map(Self::status)
                .unwrap_or_default(),
            TableCommand::ResetColumns => Self::status(self.reset_columns()),
            TableCommand::CloseColumns => {
                self.column_dialog = None;
                Self::status(TableStatus::ColumnsClosed)
            }
            TableCommand::OpenRow => match self.cursor_record_id() {
                Some(id) => self.open_row(id),
                None => Self::status(TableStatus::NoRows),
            },
            TableCommand::PreviewRow => match self.cursor_record_id() {
                Some(id) => {
                    self.preview_row(id);
                    Vec::new()
                }
                None => Self::status(TableStatus::NoRows),
            },
            TableCommand::CloseDetail => Self::status(self.close_detail()),
        }
    }

    fn drag_end(&mut self, drag: DragEnd) -> Vec<TableEvent> {
        TableEngine::drag_end(self, drag)
    }

    fn page_view(&self) -> PageView {
        let visible = self.visible_columns();
        let headers = visible
            .iter()
            .map(|index| {
                let column = &self.columns[*index];
                HeaderCell {
                    label: column.header,
                    kind: column.kind,
                    sort: self
                        .sort
                        .filter(|spec| spec.column == *index)
                        .map(|spec| spec.direction),
                    align_right: column.align_right,
                }
            })
            .collect();
        let rows = self
            .page_rows()
            .into_iter()
            .map(|record| DisplayRow {
                id: record.id(),
                selected: self.selected.contains(&record.id()),
                cells: visible
                    .iter()
                    .map(|index| (self.columns[*index].value)(record).to_owned())
                    .collect(),
            })
            .collect();
        PageView {
            views: self.view_tabs(),
            headers,
            rows,
            page_selection: self.page_selection(),
            selection_summary: self.selection_summary(),
            page_number: self.page_index() + 1,
            page_count: self.page_count(),
            page_size: self.page_size,
            status_filter: self.status_filter.clone(),
            hidden_count: self.hidden_columns.len(),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
        }
    }

    fn detail_view(&self) -> Option<DetailView> {
        let record = self.record(self.detail?)?;
        Some(self.hooks.render(record))
    }

    fn filter_dialog(&self) -> Option<FilterDialogView> {
        let draft = self.filter_draft.clone()?;
        Some(FilterDialogView {
            options: self.status_options(),
            draft,
        })
    }

    fn column_dialog(&self) -> Option<ColumnDialogView> {
        let cursor = self.column_dialog?;
        let entries = self
            .hideable_columns()
            .into_iter()
            .map(|index| (self.columns[index].header, self.is_column_visible(index)))
            .collect();
        Some(ColumnDialogView { entries, cursor })
    }

    fn cursor_record_id(&self) -> Option<RecordId> {
        self.page_rows().get(self.cursor_row).map(|record| record.id())
    }

    fn page_record_ids(&self) -> Vec<RecordId> {
        self.page_rows().into_iter().map(Record::id).collect()
    }

    fn set_cursor_row(&mut self, row: usize) {
        self.cursor_row = row;
        self.clamp_cursor();
    }
}
