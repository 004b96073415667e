// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod drag;

pub use drag::{DragSensor, KeyboardDragInput, KeyboardSensor, MouseDragInput, MouseSensor};

use accord_app::{
    AccountRecord, AppCommand, AppEvent, AppState, BaseRecord, ColumnKind, ContactRecord,
    CrudEvent, CrudRecord, CrudView, DEFAULT_PAGE_SIZE, DetailView, DragEnd, FieldKind,
    FormEditor, KnowledgeArticle, KnowledgeBase, KnowledgeCategory, NO_ARTICLE_SELECTED,
    NO_MATCHING_ARTICLES, NO_RESULTS_LABEL, NO_RESULTS_MESSAGE, PageSelection, PageView, RecordId,
    ReportEntry, SEARCH_DESCRIPTION, SEARCH_PLACEHOLDER, SEARCH_SUGGESTIONS, SEARCH_TITLE,
    SIDEBAR_ITEMS, SIDEBAR_USER, SearchHit, SearchSources, Section, SortDirection, SummaryCard,
    TableCommand, TableEngine, TableEvent, TableSurface, search, sidebar_active,
    sidebar_active_document, standard_columns, summary_cards,
};
use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::warn;

const SIDEBAR_WIDTH: u16 = 26;
const DRAG_HANDLE: &str = "⠿";
const DRAG_MARKER: &str = "▶";
const CURSOR_MARKER: &str = "›";
const ARTICLE_FORM_DESCRIPTION: &str = "Capture a new playbook, briefing or insight report.";
const ARTICLE_FORM_TITLE: &str = "Create article";
const ARTICLE_FORM_SUBMIT: &str = "Save Article";

/// Everything the UI reads from the store owner in one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceSnapshot {
    pub dashboard: Vec<BaseRecord>,
    pub accounts: Vec<AccountRecord>,
    pub contacts: Vec<ContactRecord>,
    pub reports: Vec<ReportEntry>,
    pub knowledge: Vec<KnowledgeCategory>,
}

/// The seam between the UI and whoever owns the collections. Views emit
/// mutations; the runtime applies them and the UI re-syncs from
/// [`AppRuntime::load_workspace`].
pub trait AppRuntime {
    fn load_workspace(&mut self) -> Result<WorkspaceSnapshot>;
    fn create_account(&mut self, record: AccountRecord) -> Result<()>;
    fn update_account(&mut self, record: AccountRecord) -> Result<()>;
    fn delete_account(&mut self, id: RecordId) -> Result<()>;
    fn reorder_accounts(&mut self, active: RecordId, over: RecordId) -> Result<()>;
    fn create_contact(&mut self, record: ContactRecord) -> Result<()>;
    fn update_contact(&mut self, record: ContactRecord) -> Result<()>;
    fn delete_contact(&mut self, id: RecordId) -> Result<()>;
    fn reorder_contacts(&mut self, active: RecordId, over: RecordId) -> Result<()>;
    fn reorder_dashboard(&mut self, active: RecordId, over: RecordId) -> Result<()>;
    fn create_article(&mut self, category_id: &str, article: KnowledgeArticle) -> Result<()>;
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub page_size: usize,
    pub status_clear: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            status_clear: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Binds a CRUD record type to its slot in [`ViewData`] and its runtime
/// mutations, so key handling is written once for both domains.
trait CrudBinding: CrudRecord {
    fn view(view_data: &ViewData) -> &CrudView<Self>;
    fn view_mut(view_data: &mut ViewData) -> &mut CrudView<Self>;
    fn create<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()>;
    fn update<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()>;
    fn delete<R: AppRuntime>(runtime: &mut R, id: RecordId) -> Result<()>;
    fn reorder<R: AppRuntime>(runtime: &mut R, active: RecordId, over: RecordId) -> Result<()>;
}

impl CrudBinding for AccountRecord {
    fn view(view_data: &ViewData) -> &CrudView<Self> {
        &view_data.accounts
    }

    fn view_mut(view_data: &mut ViewData) -> &mut CrudView<Self> {
        &mut view_data.accounts
    }

    fn create<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()> {
        runtime.create_account(record)
    }

    fn update<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()> {
        runtime.update_account(record)
    }

    fn delete<R: AppRuntime>(runtime: &mut R, id: RecordId) -> Result<()> {
        runtime.delete_account(id)
    }

    fn reorder<R: AppRuntime>(runtime: &mut R, active: RecordId, over: RecordId) -> Result<()> {
        runtime.reorder_accounts(active, over)
    }
}

impl CrudBinding for ContactRecord {
    fn view(view_data: &ViewData) -> &CrudView<Self> {
        &view_data.contacts
    }

    fn view_mut(view_data: &mut ViewData) -> &mut CrudView<Self> {
        &mut view_data.contacts
    }

    fn create<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()> {
        runtime.create_contact(record)
    }

    fn update<R: AppRuntime>(runtime: &mut R, record: Self) -> Result<()> {
        runtime.update_contact(record)
    }

    fn delete<R: AppRuntime>(runtime: &mut R, id: RecordId) -> Result<()> {
        runtime.delete_contact(id)
    }

    fn reorder<R: AppRuntime>(runtime: &mut R, active: RecordId, over: RecordId) -> Result<()> {
        runtime.reorder_contacts(active, over)
    }
}

#[derive(Debug)]
struct ViewData {
    options: UiOptions,
    dashboard: TableEngine<BaseRecord>,
    cards: Vec<SummaryCard>,
    accounts: CrudView<AccountRecord>,
    contacts: CrudView<ContactRecord>,
    reports: Vec<ReportEntry>,
    knowledge: KnowledgeBase,
    knowledge_loaded: bool,
    knowledge_field: usize,
    knowledge_search: bool,
    keyboard_drag: KeyboardSensor,
    mouse_drag: MouseSensor,
    help_visible: bool,
    status_token: u64,
    table_offset: usize,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        Self {
            options,
            dashboard: TableEngine::new(standard_columns()).with_page_size(options.page_size),
            cards: Vec::new(),
            accounts: CrudView::new(options.page_size),
            contacts: CrudView::new(options.page_size),
            reports: Vec::new(),
            knowledge: KnowledgeBase::default(),
            knowledge_loaded: false,
            knowledge_field: 0,
            knowledge_search: false,
            keyboard_drag: KeyboardSensor::default(),
            mouse_drag: MouseSensor::default(),
            help_visible: false,
            status_token: 0,
            table_offset: 0,
        }
    }

    fn search_sources(&self) -> SearchSources<'_> {
        SearchSources {
            dashboard: self.dashboard.data(),
            accounts: self.accounts.table().data(),
            contacts: self.contacts.table().data(),
            reports: &self.reports,
        }
    }
}

impl Default for ViewData {
    fn default() -> Self {
        Self::new(UiOptions::default())
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(runtime, &mut view_data) {
        warn!(error = %format!("{error:#}"), "initial load failed");
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &mut view_data)) {
            result = Err(anyhow::Error::new(error).context("draw frame"));
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size().context("read terminal size")?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse_event(state, runtime, &mut view_data, &internal_tx, mouse, area);
                }
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(
        internal_tx,
        view_data.status_token,
        view_data.options.status_clear,
    );
}

fn dispatch(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::SectionChanged(_) => {
                view_data.keyboard_drag = KeyboardSensor::default();
                view_data.mouse_drag = MouseSensor::default();
                view_data.knowledge_search = false;
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(
                    internal_tx,
                    view_data.status_token,
                    view_data.options.status_clear,
                );
            }
            _ => {}
        }
    }
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let snapshot = runtime.load_workspace()?;
    view_data.cards = summary_cards(&snapshot.accounts, &snapshot.contacts);
    view_data.dashboard.sync(snapshot.dashboard);
    view_data.accounts.sync(snapshot.accounts);
    view_data.contacts.sync(snapshot.contacts);
    view_data.reports = snapshot.reports;
    if !view_data.knowledge_loaded {
        view_data.knowledge = KnowledgeBase::new(snapshot.knowledge);
        view_data.knowledge_loaded = true;
    }
    Ok(())
}

fn refresh_or_report<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = refresh_view_data(runtime, view_data) {
        warn!(error = %format!("{error:#}"), "reload failed");
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("load failed: {error}"),
        );
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if state.search.is_some() {
        handle_search_key(state, view_data, internal_tx, key);
        return false;
    }

    if section_is_modal(state.section, view_data) {
        handle_section_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
            return false;
        }
        (KeyCode::Char('/'), _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
            dispatch(state, view_data, internal_tx, AppCommand::OpenSearch);
            return false;
        }
        (KeyCode::Tab, _) => {
            dispatch(state, view_data, internal_tx, AppCommand::NextSection);
            return false;
        }
        (KeyCode::BackTab, _) => {
            dispatch(state, view_data, internal_tx, AppCommand::PrevSection);
            return false;
        }
        (KeyCode::Char(digit @ '1'..='4'), KeyModifiers::NONE) => {
            let index = digit as usize - '1' as usize;
            if let Some(section) = Section::ALL.get(index).copied() {
                dispatch(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::SelectSection(section),
                );
            }
            return false;
        }
        _ => {}
    }

    handle_section_key(state, runtime, view_data, internal_tx, key);
    false
}

/// True when the active section holds an overlay or text input that must
/// see every key first.
fn section_is_modal(section: Section, view_data: &ViewData) -> bool {
    match section {
        Section::Reports => view_data.knowledge.draft().is_some() || view_data.knowledge_search,
        Section::Accounts if view_data.accounts.dialog().is_some() => true,
        Section::Contacts if view_data.contacts.dialog().is_some() => true,
        table_section => {
            view_data.keyboard_drag.is_dragging()
                || surface(view_data, table_section).is_some_and(|surface| {
                    surface.filter_dialog().is_some()
                        || surface.column_dialog().is_some()
                        || surface.detail_view().is_some()
                })
        }
    }
}

fn handle_section_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match state.section {
        Section::Dashboard => {
            handle_table_key(state, runtime, view_data, internal_tx, key);
        }
        Section::Accounts => {
            handle_crud_key::<AccountRecord, R>(state, runtime, view_data, internal_tx, key);
        }
        Section::Contacts => {
            handle_crud_key::<ContactRecord, R>(state, runtime, view_data, internal_tx, key);
        }
        Section::Reports => handle_knowledge_key(state, runtime, view_data, internal_tx, key),
    }
}

// -- search overlay --

fn search_hits(state: &AppState, view_data: &ViewData) -> Vec<SearchHit> {
    let query = state.search_query().unwrap_or_default();
    search(view_data.search_sources(), query)
}

fn handle_search_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let query_blank = state.search_query().is_none_or(|query| query.trim().is_empty());
    let len = if query_blank {
        SEARCH_SUGGESTIONS.len()
    } else {
        search_hits(state, view_data).len()
    };
    let command = match key.code {
        KeyCode::Esc => AppCommand::CloseSearch,
        KeyCode::Down => AppCommand::MoveSearchCursor { delta: 1, len },
        KeyCode::Up => AppCommand::MoveSearchCursor { delta: -1, len },
        KeyCode::Backspace => AppCommand::SearchBackspace,
        KeyCode::Enter => {
            let cursor = state.search.as_ref().map_or(0, |search| search.cursor);
            if query_blank {
                AppCommand::ApplySuggestion(cursor)
            } else {
                match search_hits(state, view_data).get(cursor) {
                    Some(hit) => AppCommand::ChooseHit(hit.section),
                    None => return,
                }
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            AppCommand::SearchInput(ch)
        }
        _ => return,
    };
    dispatch(state, view_data, internal_tx, command);
}

// -- tables --

fn surface(view_data: &ViewData, section: Section) -> Option<&dyn TableSurface> {
    match section {
        Section::Dashboard => Some(&view_data.dashboard),
        Section::Accounts => Some(view_data.accounts.table()),
        Section::Contacts => Some(view_data.contacts.table()),
        Section::Reports => None,
    }
}

fn surface_mut(view_data: &mut ViewData, section: Section) -> Option<&mut dyn TableSurface> {
    match section {
        Section::Dashboard => Some(&mut view_data.dashboard),
        Section::Accounts => Some(view_data.accounts.table_mut()),
        Section::Contacts => Some(view_data.contacts.table_mut()),
        Section::Reports => None,
    }
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let command = match key.code {
        KeyCode::Char('j') | KeyCode::Down => TableCommand::MoveRow(1),
        KeyCode::Char('k') | KeyCode::Up => TableCommand::MoveRow(-1),
        KeyCode::Char('h') | KeyCode::Left => TableCommand::MoveColumn(-1),
        KeyCode::Char('l') | KeyCode::Right => TableCommand::MoveColumn(1),
        KeyCode::Char('g') => TableCommand::JumpFirstRow,
        KeyCode::Char('G') => TableCommand::JumpLastRow,
        KeyCode::Char('s') => TableCommand::CycleSort,
        KeyCode::Char('S') => TableCommand::ClearSort,
        KeyCode::Char(' ') => TableCommand::ToggleRow,
        KeyCode::Char('A') => TableCommand::TogglePage,
        KeyCode::Home => TableCommand::FirstPage,
        KeyCode::PageUp => TableCommand::PreviousPage,
        KeyCode::PageDown => TableCommand::NextPage,
        KeyCode::End => TableCommand::LastPage,
        KeyCode::Char('p') => TableCommand::CyclePageSize,
        KeyCode::Char(']') => TableCommand::NextView,
        KeyCode::Char('[') => TableCommand::PreviousView,
        KeyCode::Char('f') => TableCommand::OpenFilter,
        KeyCode::Char('F') => TableCommand::ClearFilter,
        KeyCode::Char('c') => TableCommand::OpenColumns,
        KeyCode::Enter => TableCommand::OpenRow,
        KeyCode::Char('v') => TableCommand::PreviewRow,
        _ => return None,
    };
    Some(command)
}

fn filter_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    let command = match key.code {
        KeyCode::Char('j') | KeyCode::Down => TableCommand::MoveFilterDraft(1),
        KeyCode::Char('k') | KeyCode::Up => TableCommand::MoveFilterDraft(-1),
        KeyCode::Enter => TableCommand::ApplyFilter,
        KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => TableCommand::ClearFilter,
        KeyCode::Esc => TableCommand::DismissFilter,
        _ => return None,
    };
    Some(command)
}

fn column_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    let command = match key.code {
        KeyCode::Char('j') | KeyCode::Down => TableCommand::MoveColumnCursor(1),
        KeyCode::Char('k') | KeyCode::Up => TableCommand::MoveColumnCursor(-1),
        KeyCode::Char(' ') | KeyCode::Enter => TableCommand::ToggleColumn,
        KeyCode::Char('r') => TableCommand::ResetColumns,
        KeyCode::Esc | KeyCode::Char('c') => TableCommand::CloseColumns,
        _ => return None,
    };
    Some(command)
}

fn keyboard_drag_input_for_key(key: KeyEvent) -> Option<KeyboardDragInput> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(KeyboardDragInput::Move(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(KeyboardDragInput::Move(-1)),
        KeyCode::Char('m') | KeyCode::Enter | KeyCode::Char(' ') => Some(KeyboardDragInput::Drop),
        KeyCode::Esc => Some(KeyboardDragInput::Cancel),
        _ => None,
    }
}

/// Handles a key against the table of the active section. Returns false when
/// the key means nothing to the table.
fn handle_table_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let section = state.section;
    let Some(table) = surface(view_data, section) else {
        return false;
    };
    let filter_open = table.filter_dialog().is_some();
    let columns_open = table.column_dialog().is_some();
    let detail_open = table.detail_view().is_some();
    let rows = table.page_record_ids();
    let cursor_row = table.page_view().cursor_row;

    if view_data.keyboard_drag.is_dragging() {
        if let Some(input) = keyboard_drag_input_for_key(key) {
            let end = view_data.keyboard_drag.feed(input, &rows);
            if input == KeyboardDragInput::Cancel {
                emit_status(state, view_data, internal_tx, "move canceled");
            }
            if let Some(end) = end {
                finish_drag(state, runtime, view_data, internal_tx, end);
            }
        }
        return true;
    }

    let command = if filter_open {
        filter_command_for_key(key)
    } else if columns_open {
        column_command_for_key(key)
    } else if detail_open {
        matches!(key.code, KeyCode::Esc | KeyCode::Char('v')).then_some(TableCommand::CloseDetail)
    } else if key.code == KeyCode::Char('m') {
        if view_data
            .keyboard_drag
            .feed(KeyboardDragInput::Grab(cursor_row), &rows)
            .is_none()
            && view_data.keyboard_drag.is_dragging()
        {
            emit_status(
                state,
                view_data,
                internal_tx,
                "moving row: j/k to choose, m to drop, esc to cancel",
            );
        }
        return true;
    } else {
        table_command_for_key(key)
    };

    let Some(command) = command else {
        return filter_open || columns_open || detail_open;
    };
    let events = match surface_mut(view_data, section) {
        Some(table) => table.apply(command),
        None => return false,
    };
    route_table_events(state, runtime, view_data, internal_tx, section, events);
    true
}

fn finish_drag<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    end: DragEnd,
) {
    let section = state.section;
    let events = match surface_mut(view_data, section) {
        Some(table) => table.drag_end(end),
        None => return,
    };
    route_table_events(state, runtime, view_data, internal_tx, section, events);
}

fn route_table_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    section: Section,
    events: Vec<TableEvent>,
) {
    for event in &events {
        if let TableEvent::Status(status) = event {
            emit_status(state, view_data, internal_tx, status.message());
        }
    }
    match section {
        Section::Dashboard => {
            let mut moved = false;
            for event in &events {
                if let TableEvent::Reordered { active, over } = event {
                    moved = true;
                    if let Err(error) = runtime.reorder_dashboard(*active, *over) {
                        warn!(error = %format!("{error:#}"), "dashboard reorder failed");
                        emit_status(
                            state,
                            view_data,
                            internal_tx,
                            format!("save failed: {error}"),
                        );
                    }
                }
            }
            if moved {
                refresh_or_report(state, runtime, view_data, internal_tx);
            }
        }
        Section::Accounts => {
            let crud = view_data.accounts.observe(&events);
            apply_crud_events(state, runtime, view_data, internal_tx, crud);
        }
        Section::Contacts => {
            let crud = view_data.contacts.observe(&events);
            apply_crud_events(state, runtime, view_data, internal_tx, crud);
        }
        Section::Reports => {}
    }
}

// -- CRUD views --

fn apply_crud_events<D: CrudBinding, R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<CrudEvent<D>>,
) {
    let mut mutated = false;
    for event in events {
        let result = match event {
            CrudEvent::Created(record) => D::create(runtime, record),
            CrudEvent::Updated(record) => D::update(runtime, record),
            CrudEvent::Deleted(id) => D::delete(runtime, id),
            CrudEvent::Reordered { active, over } => D::reorder(runtime, active, over),
            CrudEvent::Notice(notice) => {
                emit_status(state, view_data, internal_tx, notice.message);
                continue;
            }
        };
        mutated = true;
        if let Err(error) = result {
            warn!(
                collection = D::LABELS.plural,
                error = %format!("{error:#}"),
                "mutation failed"
            );
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("save failed: {error}"),
            );
        }
    }
    if mutated {
        refresh_or_report(state, runtime, view_data, internal_tx);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKeyOutcome {
    Submit,
    Cancel,
    Edited,
    Ignored,
}

/// Applies one key to a form draft. Enter inserts a newline in multiline
/// fields and submits everywhere else.
fn edit_form_with_key(
    form: &mut impl FormEditor,
    field: &mut usize,
    key: KeyEvent,
) -> FormKeyOutcome {
    let count = form.field_count();
    if count == 0 {
        return FormKeyOutcome::Ignored;
    }
    *field = (*field).min(count - 1);
    let kind = form.field_kind(*field);
    let step = |field: &mut usize, delta: isize| {
        *field = (*field as isize + delta).rem_euclid(count as isize) as usize;
    };
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => FormKeyOutcome::Cancel,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => FormKeyOutcome::Submit,
        (KeyCode::Enter, _) if matches!(kind, FieldKind::Multiline) => {
            form.insert_char(*field, '\n');
            FormKeyOutcome::Edited
        }
        (KeyCode::Enter, _) => FormKeyOutcome::Submit,
        (KeyCode::Tab | KeyCode::Down, _) => {
            step(field, 1);
            FormKeyOutcome::Edited
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            step(field, -1);
            FormKeyOutcome::Edited
        }
        (KeyCode::Left, _) if matches!(kind, FieldKind::Choice(_)) => {
            form.cycle_choice(*field, -1);
            FormKeyOutcome::Edited
        }
        (KeyCode::Right | KeyCode::Char(' '), _) if matches!(kind, FieldKind::Choice(_)) => {
            form.cycle_choice(*field, 1);
            FormKeyOutcome::Edited
        }
        (KeyCode::Backspace, _) => {
            form.delete_char(*field);
            FormKeyOutcome::Edited
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            form.insert_char(*field, ch);
            FormKeyOutcome::Edited
        }
        _ => FormKeyOutcome::Ignored,
    }
}

fn handle_crud_key<D: CrudBinding, R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let Some(dialog) = D::view_mut(view_data).dialog_mut() {
        let mut field = dialog.field;
        let outcome = edit_form_with_key(&mut dialog.form, &mut field, key);
        dialog.field = field;
        match outcome {
            FormKeyOutcome::Submit => match D::view_mut(view_data).submit() {
                Ok(events) => apply_crud_events(state, runtime, view_data, internal_tx, events),
                Err(error) => emit_status(state, view_data, internal_tx, error.to_string()),
            },
            FormKeyOutcome::Cancel => {
                D::view_mut(view_data).cancel();
                emit_status(state, view_data, internal_tx, "form canceled");
            }
            FormKeyOutcome::Edited | FormKeyOutcome::Ignored => {}
        }
        return;
    }

    if handle_table_key(state, runtime, view_data, internal_tx, key) {
        return;
    }

    if let KeyCode::Char(ch) = key.code
        && !key.modifiers.contains(KeyModifiers::CONTROL)
    {
        let view = D::view_mut(view_data);
        if let Some(action) = view.action_set().action_for_key(ch) {
            let events = view.run_action(action);
            apply_crud_events(state, runtime, view_data, internal_tx, events);
        }
    }
}

// -- knowledge base --

fn handle_knowledge_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let Some(draft) = view_data.knowledge.draft_mut() {
        let outcome = edit_form_with_key(draft, &mut view_data.knowledge_field, key);
        match outcome {
            FormKeyOutcome::Submit => submit_article(state, runtime, view_data, internal_tx),
            FormKeyOutcome::Cancel => view_data.knowledge.cancel_create(),
            FormKeyOutcome::Edited | FormKeyOutcome::Ignored => {}
        }
        return;
    }

    if view_data.knowledge_search {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => view_data.knowledge_search = false,
            KeyCode::Backspace => view_data.knowledge.pop_search_char(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                view_data.knowledge.push_search_char(ch);
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => view_data.knowledge.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => view_data.knowledge.move_selection(-1),
        KeyCode::Char('s') => view_data.knowledge_search = true,
        KeyCode::Esc => view_data.knowledge.set_search_term(""),
        KeyCode::Char('a') => {
            if view_data.knowledge.open_create() {
                view_data.knowledge_field = 0;
            } else {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    "no categories to file an article under",
                );
            }
        }
        _ => {}
    }
}

fn submit_article<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(created) = view_data.knowledge.create_article(runtime.now()) else {
        return;
    };
    let article = view_data
        .knowledge
        .categories()
        .iter()
        .find(|category| category.id == created.category_id)
        .and_then(|category| {
            category
                .articles
                .iter()
                .find(|article| article.id == created.article_id)
        })
        .cloned();
    let Some(article) = article else {
        return;
    };
    let title = article.title.clone();
    match runtime.create_article(&created.category_id, article) {
        Ok(()) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("article created: {title}"),
        ),
        Err(error) => {
            warn!(error = %format!("{error:#}"), "article save failed");
            view_data
                .knowledge
                .remove_article(&created.category_id, &created.article_id);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("save failed: {error}"),
            );
        }
    }
}

// -- mouse --

fn handle_mouse_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
    area: Rect,
) {
    if view_data.help_visible
        || state.search.is_some()
        || section_is_modal(state.section, view_data)
    {
        return;
    }
    let section = state.section;
    let Some(body) = table_area(section, layout_areas(area).body) else {
        return;
    };
    let Some(table) = surface(view_data, section) else {
        return;
    };
    let rows = table.page_record_ids();
    let row = row_at(body, view_data.table_offset, mouse.column, mouse.row)
        .filter(|index| *index < rows.len());
    let input = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => MouseDragInput::Down(row),
        MouseEventKind::Drag(MouseButton::Left) => MouseDragInput::Drag(row),
        MouseEventKind::Up(MouseButton::Left) => MouseDragInput::Up(row),
        _ => return,
    };
    if let (MouseDragInput::Down(Some(index)), Some(table)) =
        (input, surface_mut(view_data, section))
    {
        table.set_cursor_row(index);
    }
    if let Some(end) = view_data.mouse_drag.feed(input, &rows) {
        finish_drag(state, runtime, view_data, internal_tx, end);
    }
}

/// Page row under a pointer, given the bordered table area (top border,
/// then the header row, then data rows scrolled by `offset`).
fn row_at(table: Rect, offset: usize, column: u16, row: u16) -> Option<usize> {
    let first_row = table.y.saturating_add(2);
    let inside_x = column > table.x && column < table.x + table.width.saturating_sub(1);
    let inside_y = row >= first_row && row < table.y + table.height.saturating_sub(1);
    (inside_x && inside_y).then(|| offset + usize::from(row - first_row))
}

/// Data rows that fit below the borders and the header row.
fn visible_table_rows(table: Rect) -> usize {
    usize::from(table.height.saturating_sub(3)).max(1)
}

/// Keeps the previous scroll position unless the cursor left the window.
fn follow_cursor(offset: usize, cursor: usize, rows: usize, visible: usize) -> usize {
    let offset = offset.min(rows.saturating_sub(visible));
    if cursor < offset {
        cursor
    } else if cursor >= offset + visible {
        cursor + 1 - visible
    } else {
        offset
    }
}

// -- layout --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Areas {
    sidebar: Rect,
    header: Rect,
    body: Rect,
    status: Rect,
}

fn layout_areas(area: Rect) -> Areas {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(columns[1]);
    Areas {
        sidebar: columns[0],
        header: rows[0],
        body: rows[1],
        status: rows[2],
    }
}

/// Splits a table section's body into its bands; the table is band 2.
fn table_bands(section: Section, body: Rect) -> Option<[Rect; 4]> {
    let top = match section {
        Section::Dashboard => 5,
        Section::Accounts | Section::Contacts => 1,
        Section::Reports => return None,
    };
    let bands = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(body);
    Some([bands[0], bands[1], bands[2], bands[3]])
}

fn table_area(section: Section, body: Rect) -> Option<Rect> {
    table_bands(section, body).map(|bands| bands[2])
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn drawer_rect(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area)[1]
}

// -- rendering --

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &mut ViewData) {
    let areas = layout_areas(frame.area());

    let sidebar = Paragraph::new(render_sidebar_text(state))
        .block(Block::default().borders(Borders::ALL).title("accord"));
    frame.render_widget(sidebar, areas.sidebar);

    let header = Paragraph::new(format!(
        "{}\n{}",
        state.section.title(),
        state.section.description()
    ))
    .style(Style::default().fg(Color::White))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, areas.header);

    match state.section {
        Section::Reports => render_knowledge(frame, areas.body, view_data),
        section => render_table_section(frame, areas.body, section, view_data),
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, areas.status);

    render_overlays(frame, state, view_data);
}

fn render_table_section(
    frame: &mut ratatui::Frame<'_>,
    body: Rect,
    section: Section,
    view_data: &mut ViewData,
) {
    let (Some(bands), Some(table)) = (table_bands(section, body), surface(view_data, section))
    else {
        return;
    };
    let page = table.page_view();
    view_data.table_offset = follow_cursor(
        view_data.table_offset,
        page.cursor_row,
        page.rows.len(),
        visible_table_rows(bands[2]),
    );
    let view_data = &*view_data;

    match section {
        Section::Dashboard => render_cards(frame, bands[0], &view_data.cards),
        Section::Accounts => {
            let hint = view_data.accounts.action_set().hint();
            frame.render_widget(Paragraph::new(hint), bands[0]);
        }
        Section::Contacts => {
            let hint = view_data.contacts.action_set().hint();
            frame.render_widget(Paragraph::new(hint), bands[0]);
        }
        Section::Reports => {}
    }

    let selected = page.views.iter().position(|tab| tab.active).unwrap_or(0);
    let tabs = Tabs::new(view_tab_titles(&page))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, bands[1]);

    render_page_table(frame, bands[2], section, &page, view_data);

    frame.render_widget(Paragraph::new(table_footer_text(&page)), bands[3]);
}

fn render_cards(frame: &mut ratatui::Frame<'_>, area: Rect, cards: &[SummaryCard]) {
    if cards.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    for (card, slot) in cards.iter().zip(slots.iter()) {
        let widget = Paragraph::new(render_card_text(card))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(card.title));
        frame.render_widget(widget, *slot);
    }
}

fn render_page_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    section: Section,
    page: &PageView,
    view_data: &ViewData,
) {
    let widths = page
        .headers
        .iter()
        .map(|header| match header.kind {
            ColumnKind::DragHandle => Constraint::Length(1),
            ColumnKind::Select => Constraint::Length(3),
            ColumnKind::Label => Constraint::Min(20),
            ColumnKind::Data => Constraint::Min(8),
        })
        .collect::<Vec<_>>();

    let header = Row::new(
        page.headers
            .iter()
            .map(|header| {
                Cell::from(header_label(header.kind, header.label, header.sort, page)).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>(),
    );

    let dragging = view_data
        .keyboard_drag
        .active()
        .or_else(|| view_data.mouse_drag.active());
    let over = view_data
        .keyboard_drag
        .over()
        .or_else(|| view_data.mouse_drag.over());

    let rows = if page.rows.is_empty() {
        // The label sits under the primary column; the handle column is too narrow.
        let label_column = page
            .headers
            .iter()
            .position(|header| header.kind == ColumnKind::Label)
            .unwrap_or(0);
        let cells = (0..page.headers.len())
            .map(|index| {
                if index == label_column {
                    Cell::from(NO_RESULTS_LABEL).style(Style::default().fg(Color::DarkGray))
                } else {
                    Cell::from("")
                }
            })
            .collect::<Vec<_>>();
        vec![Row::new(cells)]
    } else {
        page.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let cursor = row_index == page.cursor_row;
                let cells = row
                    .cells
                    .iter()
                    .zip(page.headers.iter())
                    .enumerate()
                    .map(|(col_index, (value, header))| {
                        let text = match header.kind {
                            ColumnKind::DragHandle if dragging == Some(row.id) => {
                                Text::from(DRAG_MARKER)
                            }
                            ColumnKind::DragHandle => Text::from(DRAG_HANDLE),
                            ColumnKind::Select => Text::from(checkbox(row.selected)),
                            _ if header.align_right => {
                                Text::from(value.clone()).alignment(Alignment::Right)
                            }
                            _ => Text::from(value.clone()),
                        };
                        let mut style = Style::default();
                        if over == Some(row.id) && dragging.is_some() {
                            style = style.fg(Color::Magenta);
                        }
                        if cursor {
                            style = style.bg(Color::DarkGray);
                        }
                        if cursor && col_index == page.cursor_col {
                            style = Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD);
                        }
                        Cell::from(text).style(style)
                    })
                    .collect::<Vec<_>>();
                Row::new(cells)
            })
            .collect()
    };

    let title = match section {
        Section::Accounts => view_data.accounts.labels().outline,
        Section::Contacts => view_data.contacts.labels().outline,
        _ => "Dashboard entries",
    };
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    let mut table_state = TableState::default().with_offset(view_data.table_offset);
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_knowledge(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let list = Paragraph::new(render_knowledge_list_text(view_data)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("articles ({})", view_data.knowledge.article_count())),
    );
    frame.render_widget(list, panes[0]);

    let title = view_data
        .knowledge
        .selected_category()
        .map_or("article", |category| category.title.as_str());
    let article = Paragraph::new(render_article_text(&view_data.knowledge))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(article, panes[1]);
}

fn render_overlays(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let screen = frame.area();
    let section = state.section;

    if let Some(table) = surface(view_data, section) {
        if let Some(detail) = table.detail_view() {
            let area = drawer_rect(screen);
            frame.render_widget(Clear, area);
            let drawer = Paragraph::new(render_detail_text(&detail))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("details").borders(Borders::ALL));
            frame.render_widget(drawer, area);
        }
        if table.filter_dialog().is_some() {
            let area = centered_rect(40, 50, screen);
            frame.render_widget(Clear, area);
            let dialog = Paragraph::new(render_filter_text(table))
                .block(Block::default().title("filter status").borders(Borders::ALL));
            frame.render_widget(dialog, area);
        }
        if table.column_dialog().is_some() {
            let area = centered_rect(40, 50, screen);
            frame.render_widget(Clear, area);
            let dialog = Paragraph::new(render_columns_text(table))
                .block(Block::default().title("columns").borders(Borders::ALL));
            frame.render_widget(dialog, area);
        }
    }

    let form = match section {
        Section::Accounts => crud_form_text(&view_data.accounts),
        Section::Contacts => crud_form_text(&view_data.contacts),
        Section::Reports => view_data.knowledge.draft().map(|draft| {
            (
                ARTICLE_FORM_TITLE,
                render_form_text(
                    ARTICLE_FORM_DESCRIPTION,
                    draft,
                    view_data.knowledge_field,
                    ARTICLE_FORM_SUBMIT,
                ),
            )
        }),
        Section::Dashboard => None,
    };
    if let Some((title, (text, cursor_line))) = form {
        let area = centered_rect(70, 84, screen);
        frame.render_widget(Clear, area);
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = cursor_line.saturating_sub(visible.saturating_sub(3));
        let dialog = Paragraph::new(text)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(dialog, area);
    }

    if state.search.is_some() {
        let area = centered_rect(70, 70, screen);
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_search_text(state, view_data))
            .block(Block::default().title(SEARCH_TITLE).borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 72, screen);
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn crud_form_text<D: CrudRecord>(view: &CrudView<D>) -> Option<(&'static str, (String, usize))> {
    let dialog = view.dialog()?;
    let copy = view.dialog_copy()?;
    Some((
        copy.title,
        render_form_text(copy.description, &dialog.form, dialog.field, copy.submit),
    ))
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn header_label(
    kind: ColumnKind,
    label: &str,
    sort: Option<SortDirection>,
    page: &PageView,
) -> String {
    match kind {
        ColumnKind::DragHandle => String::new(),
        ColumnKind::Select => match page.page_selection {
            PageSelection::All => "[x]".to_owned(),
            PageSelection::Some => "[-]".to_owned(),
            PageSelection::None => "[ ]".to_owned(),
        },
        ColumnKind::Label | ColumnKind::Data => match sort {
            Some(SortDirection::Asc) => format!("{label} ↑"),
            Some(SortDirection::Desc) => format!("{label} ↓"),
            None => label.to_owned(),
        },
    }
}

fn view_tab_titles(page: &PageView) -> Vec<String> {
    page.views
        .iter()
        .map(|tab| match tab.badge {
            Some(count) => format!("{} ({count})", tab.label),
            None => tab.label.to_owned(),
        })
        .collect()
}

fn table_footer_text(page: &PageView) -> String {
    let mut parts = vec![
        page.selection_summary.clone(),
        page.page_label(),
        format!("{} per page", page.page_size),
    ];
    if let Some(status) = &page.status_filter {
        parts.push(format!("status: {status}"));
    }
    if page.hidden_count > 0 {
        parts.push(format!("{} hidden", page.hidden_count));
    }
    parts.join(" | ")
}

fn render_card_text(card: &SummaryCard) -> String {
    format!(
        "{}\n{}\n{} {}",
        card.value,
        card.description,
        card.trend.arrow(),
        card.trend_label
    )
}

fn render_sidebar_text(state: &AppState) -> String {
    let highlighted = sidebar_active(state.section);
    let document = sidebar_active_document(state.section);
    let mut lines = Vec::new();
    let mut group = None;
    for item in SIDEBAR_ITEMS {
        if group != Some(item.group) {
            if group.is_some() {
                lines.push(String::new());
            }
            if !item.group.is_empty() {
                lines.push(item.group.to_uppercase());
            }
            group = Some(item.group);
        }
        let active = match item.section {
            Some(section) => section == highlighted || Some(section) == document,
            None => state.search.is_some(),
        };
        let marker = if active { "▸" } else { " " };
        lines.push(format!("{marker} {}", item.label));
    }
    lines.push(String::new());
    lines.push(SIDEBAR_USER.to_owned());
    lines.join("\n")
}

/// Form body plus the line index of the focused field, for scrolling.
fn render_form_text(
    description: &str,
    form: &impl FormEditor,
    field: usize,
    submit: &str,
) -> (String, usize) {
    let mut lines = vec![description.to_owned(), String::new()];
    let mut cursor_line = 0;
    for index in 0..form.field_count() {
        let focused = index == field;
        if focused {
            cursor_line = lines.len();
        }
        let marker = if focused { CURSOR_MARKER } else { " " };
        let label = form.field_label(index);
        let value = form.field_value(index);
        match form.field_kind(index) {
            FieldKind::Choice(_) => lines.push(format!("{marker} {label}: ‹ {value} ›")),
            FieldKind::Text => lines.push(format!("{marker} {label}: {value}")),
            FieldKind::Multiline => {
                lines.push(format!("{marker} {label}:"));
                if value.is_empty() {
                    lines.push("    ".to_owned());
                }
                lines.extend(value.split('\n').map(|line| format!("    {line}")));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "tab/shift+tab field | ←/→ choose | enter {submit} | ctrl+s save | esc cancel"
    ));
    (lines.join("\n"), cursor_line)
}

fn render_detail_text(detail: &DetailView) -> String {
    let mut lines = vec![detail.title.clone(), detail.description.clone()];
    for section in &detail.sections {
        lines.push(String::new());
        if let Some(heading) = section.heading {
            lines.push(heading.to_uppercase());
        }
        for field in &section.fields {
            if field.multiline {
                lines.push(format!("{}:", field.label));
                lines.extend(field.value.lines().map(|line| format!("  {line}")));
            } else {
                lines.push(format!("{}: {}", field.label, field.value));
            }
        }
    }
    lines.push(String::new());
    lines.push("esc close".to_owned());
    lines.join("\n")
}

fn render_filter_text(table: &dyn TableSurface) -> String {
    let Some(dialog) = table.filter_dialog() else {
        return String::new();
    };
    let mut lines = dialog
        .options
        .iter()
        .map(|option| {
            let marker = if option.value == dialog.draft { "●" } else { "○" };
            format!("{marker} {}", option.label)
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("j/k choose | enter apply | x clear | esc dismiss".to_owned());
    lines.join("\n")
}

fn render_columns_text(table: &dyn TableSurface) -> String {
    let Some(dialog) = table.column_dialog() else {
        return String::new();
    };
    let mut lines = dialog
        .entries
        .iter()
        .enumerate()
        .map(|(index, (label, visible))| {
            let marker = if index == dialog.cursor { CURSOR_MARKER } else { " " };
            format!("{marker} {} {label}", checkbox(*visible))
        })
        .collect::<Vec<_>>();
    if lines.is_empty() {
        lines.push("no hideable columns".to_owned());
    }
    lines.push(String::new());
    lines.push("space toggle | r show all | esc close".to_owned());
    lines.join("\n")
}

fn render_search_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(search_state) = state.search.as_ref() else {
        return String::new();
    };
    let mut lines = vec![SEARCH_DESCRIPTION.to_owned(), String::new()];
    if search_state.query.is_empty() {
        lines.push(format!("> {SEARCH_PLACEHOLDER}"));
    } else {
        lines.push(format!("> {}▏", search_state.query));
    }
    lines.push(String::new());

    if search_state.query.trim().is_empty() {
        lines.push("Quick suggestions".to_owned());
        for (index, suggestion) in SEARCH_SUGGESTIONS.iter().enumerate() {
            let marker = if index == search_state.cursor {
                CURSOR_MARKER
            } else {
                " "
            };
            lines.push(format!(
                "{marker} {} - {}",
                suggestion.label, suggestion.description
            ));
        }
        return lines.join("\n");
    }

    let hits = search_hits(state, view_data);
    if hits.is_empty() {
        lines.push(NO_RESULTS_MESSAGE.to_owned());
        return lines.join("\n");
    }
    let mut group = None;
    for (index, hit) in hits.iter().enumerate() {
        if group != Some(hit.section) {
            lines.push(hit.section.search_label().to_owned());
            group = Some(hit.section);
        }
        let marker = if index == search_state.cursor {
            CURSOR_MARKER
        } else {
            " "
        };
        if hit.subtitle.is_empty() {
            lines.push(format!("{marker} {}", hit.title));
        } else {
            lines.push(format!("{marker} {}  {}", hit.title, hit.subtitle));
        }
    }
    lines.join("\n")
}

fn render_knowledge_list_text(view_data: &ViewData) -> String {
    let knowledge = &view_data.knowledge;
    let cursor = if view_data.knowledge_search { "▏" } else { "" };
    let mut lines = vec![
        format!("search: {}{cursor}", knowledge.search_term()),
        String::new(),
    ];
    let selected = knowledge
        .selected_category()
        .zip(knowledge.selected_article())
        .map(|(category, article)| (category.id.as_str(), article.id.as_str()));
    let matches = knowledge.filtered();
    if matches.iter().all(|entry| entry.articles.is_empty()) {
        lines.push(NO_MATCHING_ARTICLES.to_owned());
        return lines.join("\n");
    }
    for entry in matches {
        lines.push(format!(
            "{} ({})",
            entry.category.title,
            entry.articles.len()
        ));
        for article in entry.articles {
            let marker = if selected == Some((entry.category.id.as_str(), article.id.as_str())) {
                CURSOR_MARKER
            } else {
                " "
            };
            lines.push(format!("  {marker} {}", article.title));
        }
    }
    lines.join("\n")
}

fn render_article_text(knowledge: &KnowledgeBase) -> String {
    let Some(article) = knowledge.selected_article() else {
        return NO_ARTICLE_SELECTED.to_owned();
    };
    let mut lines = Vec::new();
    if let Some(category) = knowledge.selected_category() {
        lines.push(category.description.clone());
        lines.push(String::new());
    }
    lines.push(article.title.clone());
    lines.push(format!(
        "{} • {} • updated {}",
        article.owner,
        article.status.label(),
        article.updated
    ));
    lines.push(String::new());
    lines.push(article.summary.clone());
    if !article.highlights.is_empty() {
        lines.push(String::new());
        lines.push("Highlights".to_owned());
        lines.extend(article.highlights.iter().map(|line| format!("- {line}")));
    }
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    let section_hint = match state.section {
        Section::Dashboard => "enter details | m move | f filter | s sort".to_owned(),
        Section::Accounts => view_data.accounts.action_set().hint(),
        Section::Contacts => view_data.contacts.action_set().hint(),
        Section::Reports => "j/k article | s search | a add article".to_owned(),
    };
    format!("{section_hint} | / search | tab section | ? help | ctrl+q quit")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help | / or ctrl+k search | tab/shift+tab section | 1-4 jump to section\n\
table: j/k/h/l move | g/G first/last row | s sort | S clear sort | [/] view\n\
table: space select row | A select page | pgup/pgdn page | home/end first/last page | p page size\n\
table: f filter | F clear filter | c columns | enter open | v preview | m move row\n\
move: j/k choose target | m or enter drop | esc cancel | mouse drag also moves rows\n\
toolbar: a add | x export | o assign owner | d delete selected | u clear selection\n\
form: tab/shift+tab field | ←/→ or space choose | enter submit | ctrl+s save | esc cancel\n\
knowledge: j/k article | s search articles | esc clear search | a add article\n\
search: type query | up/down choose | enter open | esc close"
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, Areas, FormKeyOutcome, InternalEvent, KeyboardSensor, UiOptions, ViewData,
        WorkspaceSnapshot, edit_form_with_key, follow_cursor, handle_key_event,
        handle_mouse_event, help_overlay_text, layout_areas, process_internal_events,
        refresh_view_data, render, render_article_text, render_detail_text, render_form_text,
        render_search_text, render_sidebar_text, status_text, table_area, table_command_for_key,
        table_footer_text, visible_table_rows,
    };
    use accord_app::{
        AccountForm, AccountRecord, AppCommand, AppState, BaseRecord, ContactRecord,
        DetailField, DetailSection, DetailView, FormEditor, KnowledgeArticle, RecordForm,
        RecordId, Section, TableCommand, TableSurface, move_item,
    };
    use accord_testkit::{account, categories, contact, entry, report};
    use anyhow::{Result, bail};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use std::sync::mpsc;
    use std::time::Duration;
    use time::OffsetDateTime;
    use time::macros::datetime;

    #[derive(Debug, Default)]
    struct TestRuntime {
        workspace: WorkspaceSnapshot,
        articles: Vec<(String, KnowledgeArticle)>,
        fail_mutations: bool,
        load_count: usize,
    }

    impl TestRuntime {
        fn seeded() -> Self {
            Self {
                workspace: WorkspaceSnapshot {
                    dashboard: vec![
                        entry(1, "Cover page", "Done"),
                        entry(2, "Table of contents", "In Process"),
                        entry(3, "Executive summary", "Done"),
                    ],
                    accounts: vec![
                        {
                            let mut record = account(1, "Northwind Traders", "Active");
                            record.executive_sponsor = Some("Renewal Committee".to_owned());
                            record
                        },
                        account(2, "Wingtip Toys", "Pending"),
                        account(3, "Contoso", "Closed"),
                    ],
                    contacts: vec![
                        contact(1, "Harbour Bridge Renewal", "New"),
                        contact(2, "Transit Corridor Study", "Nurture"),
                    ],
                    reports: vec![report("rpt-1", "Pipeline review", "Jordan Carter")],
                    knowledge: categories(),
                },
                ..Self::default()
            }
        }

        fn mutate(&mut self) -> Result<()> {
            if self.fail_mutations {
                bail!("store unavailable");
            }
            Ok(())
        }

        fn account_ids(&self) -> Vec<i64> {
            self.workspace
                .accounts
                .iter()
                .map(|record| record.base.id.get())
                .collect()
        }

        fn dashboard_ids(&self) -> Vec<i64> {
            self.workspace
                .dashboard
                .iter()
                .map(|record| record.id.get())
                .collect()
        }
    }

    fn reorder_in<T>(
        records: &mut Vec<T>,
        id_of: impl Fn(&T) -> RecordId,
        active: RecordId,
        over: RecordId,
    ) {
        let from = records.iter().position(|record| id_of(record) == active);
        let to = records.iter().position(|record| id_of(record) == over);
        if let (Some(from), Some(to)) = (from, to) {
            move_item(records, from, to);
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_workspace(&mut self) -> Result<WorkspaceSnapshot> {
            self.load_count += 1;
            Ok(self.workspace.clone())
        }

        fn create_account(&mut self, record: AccountRecord) -> Result<()> {
            self.mutate()?;
            self.workspace.accounts.insert(0, record);
            Ok(())
        }

        fn update_account(&mut self, record: AccountRecord) -> Result<()> {
            self.mutate()?;
            if let Some(slot) = self
                .workspace
                .accounts
                .iter_mut()
                .find(|existing| existing.base.id == record.base.id)
            {
                *slot = record;
            }
            Ok(())
        }

        fn delete_account(&mut self, id: RecordId) -> Result<()> {
            self.mutate()?;
            self.workspace.accounts.retain(|record| record.base.id != id);
            Ok(())
        }

        fn reorder_accounts(&mut self, active: RecordId, over: RecordId) -> Result<()> {
            self.mutate()?;
            reorder_in(
                &mut self.workspace.accounts,
                |record: &AccountRecord| record.base.id,
                active,
                over,
            );
            Ok(())
        }

        fn create_contact(&mut self, record: ContactRecord) -> Result<()> {
            self.mutate()?;
            self.workspace.contacts.insert(0, record);
            Ok(())
        }

        fn update_contact(&mut self, record: ContactRecord) -> Result<()> {
            self.mutate()?;
            if let Some(slot) = self
                .workspace
                .contacts
                .iter_mut()
                .find(|existing| existing.base.id == record.base.id)
            {
                *slot = record;
            }
            Ok(())
        }

        fn delete_contact(&mut self, id: RecordId) -> Result<()> {
            self.mutate()?;
            self.workspace.contacts.retain(|record| record.base.id != id);
            Ok(())
        }

        fn reorder_contacts(&mut self, active: RecordId, over: RecordId) -> Result<()> {
            self.mutate()?;
            reorder_in(
                &mut self.workspace.contacts,
                |record: &ContactRecord| record.base.id,
                active,
                over,
            );
            Ok(())
        }

        fn reorder_dashboard(&mut self, active: RecordId, over: RecordId) -> Result<()> {
            self.mutate()?;
            reorder_in(
                &mut self.workspace.dashboard,
                |record: &BaseRecord| record.id,
                active,
                over,
            );
            Ok(())
        }

        fn create_article(&mut self, category_id: &str, article: KnowledgeArticle) -> Result<()> {
            self.mutate()?;
            self.articles.push((category_id.to_owned(), article));
            Ok(())
        }

        fn now(&self) -> OffsetDateTime {
            datetime!(2024-07-09 10:00 UTC)
        }
    }

    fn view_data_for_test() -> ViewData {
        ViewData::new(UiOptions {
            status_clear: Duration::from_secs(60),
            ..UiOptions::default()
        })
    }

    fn screen_lines(state: &AppState, view_data: &mut ViewData, area: Rect) -> Vec<String> {
        let mut terminal =
            Terminal::new(TestBackend::new(area.width, area.height)).expect("test backend");
        terminal
            .draw(|frame| render(frame, state, view_data))
            .expect("draw frame");
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn loaded(runtime: &mut TestRuntime) -> ViewData {
        let mut view_data = view_data_for_test();
        refresh_view_data(runtime, &mut view_data).expect("test workspace loads");
        view_data
    }

    fn internal_tx() -> mpsc::Sender<InternalEvent> {
        let (tx, _rx) = mpsc::channel();
        tx
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        keys: &[KeyEvent],
    ) {
        let tx = internal_tx();
        for key in keys {
            let _ = handle_key_event(state, runtime, view_data, &tx, *key);
        }
    }

    fn type_text(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        text: &str,
    ) {
        let keys = text.chars().map(|ch| key(KeyCode::Char(ch))).collect::<Vec<_>>();
        press(state, runtime, view_data, &keys);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);
        let tx = internal_tx();
        assert!(handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ));
    }

    #[test]
    fn tab_and_digits_switch_sections() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Tab)]);
        assert_eq!(state.section, Section::Accounts);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::BackTab)]);
        assert_eq!(state.section, Section::Dashboard);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('4'))]);
        assert_eq!(state.section, Section::Reports);
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('?'))]);
        assert!(view_data.help_visible);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Tab)]);
        assert_eq!(state.section, Section::Dashboard);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Esc)]);
        assert!(!view_data.help_visible);
        assert!(help_overlay_text().contains("m move row"));
    }

    #[test]
    fn search_finds_renewal_sponsor_and_navigates() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('/'))]);
        assert!(state.search.is_some());
        let empty = render_search_text(&state, &view_data);
        assert!(empty.contains("Accounts: Upcoming renewals"));

        // "renewal" also matches a contact header; accounts come first.
        type_text(&mut state, &mut runtime, &mut view_data, "renewal");
        let text = render_search_text(&state, &view_data);
        assert!(text.contains("Northwind Traders"), "{text}");
        assert!(text.contains("Harbour Bridge Renewal"), "{text}");

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);
        assert_eq!(state.section, Section::Accounts);
        assert!(state.search.is_none());
    }

    #[test]
    fn enter_on_blank_search_applies_suggestion() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                key(KeyCode::Char('/')),
                key(KeyCode::Down),
                key(KeyCode::Enter),
            ],
        );
        assert_eq!(state.search_query(), Some("high"));
    }

    #[test]
    fn create_account_through_dialog_prepends_next_id() {
        let mut state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('a'))]);
        assert!(view_data.accounts.dialog().is_some());
        type_text(&mut state, &mut runtime, &mut view_data, "Fabrikam");
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);

        assert!(view_data.accounts.dialog().is_none());
        assert_eq!(runtime.account_ids(), vec![4, 1, 2, 3]);
        assert_eq!(runtime.workspace.accounts[0].base.header, "Fabrikam");
        assert_eq!(state.status_line.as_deref(), Some("Account created"));
        assert_eq!(view_data.accounts.table().data().len(), 4);
    }

    #[test]
    fn blank_account_name_keeps_dialog_open() {
        let mut state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('a')), key(KeyCode::Enter)],
        );
        assert!(view_data.accounts.dialog().is_some());
        assert!(
            state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("account name is required"))
        );
        assert_eq!(runtime.account_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn selection_swaps_toolbar_and_delete_removes_rows() {
        let mut state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char(' ')), key(KeyCode::Char('j')), key(KeyCode::Char(' '))],
        );
        assert_eq!(
            view_data.accounts.selected_ids(),
            &[RecordId::new(1), RecordId::new(2)]
        );
        assert!(status_text(&AppState::starting_at(Section::Accounts), &view_data)
            .starts_with("2 selected"));

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('d'))]);
        assert_eq!(runtime.account_ids(), vec![3]);
        assert!(view_data.accounts.selected_ids().is_empty());
        assert!(view_data.accounts.table().selected_ids().is_empty());
        assert_eq!(state.status_line.as_deref(), Some("Selected accounts deleted"));
    }

    #[test]
    fn enter_opens_edit_dialog_and_submit_updates() {
        let mut state = AppState::starting_at(Section::Contacts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);
        let dialog = view_data.contacts.dialog().expect("edit dialog open");
        assert_eq!(dialog.form.field_value(0), "Harbour Bridge Renewal");

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Backspace), key(KeyCode::Char('!')), key(KeyCode::Enter)],
        );
        assert_eq!(runtime.workspace.contacts[0].base.header, "Harbour Bridge Renewa!");
        assert_eq!(state.status_line.as_deref(), Some("Contact updated"));
    }

    #[test]
    fn preview_opens_drawer_and_esc_closes_it() {
        let mut state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('v'))]);
        let detail = view_data.accounts.table().detail_view().expect("drawer open");
        assert_eq!(detail.title, "Northwind Traders");

        // Section keys are modal while the drawer is open.
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Tab)]);
        assert_eq!(state.section, Section::Accounts);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Esc)]);
        assert!(view_data.accounts.table().detail_view().is_none());
    }

    #[test]
    fn dashboard_enter_uses_default_drawer() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);
        let detail = view_data.dashboard.detail_view().expect("drawer open");
        let text = render_detail_text(&detail);
        assert!(text.contains("Target / limit: 10 / 20"), "{text}");
    }

    #[test]
    fn filter_dialog_commits_on_enter() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('f')), key(KeyCode::Char('j'))],
        );
        assert_eq!(view_data.dashboard.status_filter(), None);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);
        assert_eq!(view_data.dashboard.status_filter(), Some("Done"));
        assert_eq!(state.status_line.as_deref(), Some("filter status: Done"));
        assert_eq!(view_data.dashboard.filtered_rows().len(), 2);
    }

    #[test]
    fn keyboard_move_reorders_dashboard_in_store() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                key(KeyCode::Char('m')),
                key(KeyCode::Char('j')),
                key(KeyCode::Char('j')),
                key(KeyCode::Char('m')),
            ],
        );
        assert_eq!(runtime.dashboard_ids(), vec![2, 3, 1]);
        assert_eq!(state.status_line.as_deref(), Some("moved Cover page"));
        assert_eq!(view_data.keyboard_drag, KeyboardSensor::default());
    }

    #[test]
    fn keyboard_move_cancel_leaves_order() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                key(KeyCode::Char('m')),
                key(KeyCode::Char('j')),
                key(KeyCode::Esc),
            ],
        );
        assert_eq!(runtime.dashboard_ids(), vec![1, 2, 3]);
        assert_eq!(state.status_line.as_deref(), Some("move canceled"));
    }

    #[test]
    fn empty_table_renders_full_no_results_label() {
        let state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::default();
        let mut view_data = loaded(&mut runtime);

        let lines = screen_lines(&state, &mut view_data, Rect::new(0, 0, 140, 40));
        assert!(
            lines.iter().any(|line| line.contains("No results.")),
            "screen:\n{}",
            lines.join("\n")
        );
    }

    #[test]
    fn follow_cursor_scrolls_only_when_cursor_leaves_window() {
        assert_eq!(follow_cursor(0, 4, 50, 10), 0);
        assert_eq!(follow_cursor(0, 12, 50, 10), 3);
        assert_eq!(follow_cursor(3, 5, 50, 10), 3);
        assert_eq!(follow_cursor(3, 1, 50, 10), 1);
        // A shrunken page pulls the window back.
        assert_eq!(follow_cursor(40, 2, 5, 10), 0);
    }

    #[test]
    fn large_page_scrolls_to_cursor_and_mouse_hits_scrolled_rows() {
        let mut state = AppState::starting_at(Section::Dashboard);
        let mut runtime = TestRuntime {
            workspace: WorkspaceSnapshot {
                dashboard: (1..=50)
                    .map(|id| entry(id, &format!("Entry {id}"), "Done"))
                    .collect(),
                ..WorkspaceSnapshot::default()
            },
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::new(UiOptions {
            page_size: 50,
            status_clear: Duration::from_secs(60),
        });
        refresh_view_data(&mut runtime, &mut view_data).expect("test workspace loads");

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('G'))]);
        assert_eq!(view_data.dashboard.cursor_row(), 49);

        let area = Rect::new(0, 0, 140, 40);
        let lines = screen_lines(&state, &mut view_data, area);
        assert!(lines.iter().any(|line| line.contains("Entry 50")));

        let Areas { body, .. } = layout_areas(area);
        let table = table_area(Section::Dashboard, body).expect("dashboard has a table");
        let offset = 50 - visible_table_rows(table);
        assert_eq!(view_data.table_offset, offset);

        let tx = internal_tx();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: table.x + 4,
            row: table.y + 2,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut state, &mut runtime, &mut view_data, &tx, click, area);
        assert_eq!(view_data.dashboard.cursor_row(), offset);
    }

    #[test]
    fn mouse_drag_reorders_accounts() {
        let mut state = AppState::starting_at(Section::Accounts);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);
        let tx = internal_tx();

        let area = Rect::new(0, 0, 120, 40);
        let Areas { body, .. } = layout_areas(area);
        let table = table_area(Section::Accounts, body).expect("accounts has a table");
        let first_row = table.y + 2;
        let column = table.x + 4;
        let mouse = |kind, row| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        for event in [
            mouse(MouseEventKind::Down(MouseButton::Left), first_row + 2),
            mouse(MouseEventKind::Drag(MouseButton::Left), first_row + 1),
            mouse(MouseEventKind::Drag(MouseButton::Left), first_row),
            mouse(MouseEventKind::Up(MouseButton::Left), first_row),
        ] {
            handle_mouse_event(&mut state, &mut runtime, &mut view_data, &tx, event, area);
        }
        assert_eq!(runtime.account_ids(), vec![3, 1, 2]);
    }

    #[test]
    fn failed_mutation_is_reported_on_status_line() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);
        runtime.fail_mutations = true;

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('m')), key(KeyCode::Char('j')), key(KeyCode::Char('m'))],
        );
        assert_eq!(
            state.status_line.as_deref(),
            Some("save failed: store unavailable")
        );
        // The re-sync restores the owner's order.
        let ids = view_data
            .dashboard
            .data()
            .iter()
            .map(|record| record.id.get())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn knowledge_create_article_persists_through_runtime() {
        let mut state = AppState::starting_at(Section::Reports);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('a')), key(KeyCode::Tab)],
        );
        type_text(&mut state, &mut runtime, &mut view_data, "Escalation matrix");
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);

        assert!(view_data.knowledge.draft().is_none());
        assert_eq!(runtime.articles.len(), 1);
        let (category_id, article) = &runtime.articles[0];
        assert_eq!(category_id, "foundations");
        assert_eq!(article.title, "Escalation matrix");
        assert_eq!(article.owner, "Unassigned");
        assert_eq!(article.updated, "2024-07-09");
        assert_eq!(
            view_data.knowledge.selected_article().map(|article| article.title.as_str()),
            Some("Escalation matrix")
        );
        assert!(render_article_text(&view_data.knowledge).contains("Summary forthcoming."));
    }

    #[test]
    fn knowledge_create_rolls_back_when_store_refuses() {
        let mut state = AppState::starting_at(Section::Reports);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);
        let before = view_data.knowledge.article_count();
        runtime.fail_mutations = true;

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('a')), key(KeyCode::Tab)],
        );
        type_text(&mut state, &mut runtime, &mut view_data, "Escalation matrix");
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);

        assert!(runtime.articles.is_empty());
        assert_eq!(view_data.knowledge.article_count(), before);
        assert_ne!(
            view_data.knowledge.selected_article().map(|article| article.title.as_str()),
            Some("Escalation matrix")
        );
        assert_eq!(
            state.status_line.as_deref(),
            Some("save failed: store unavailable")
        );
    }

    #[test]
    fn knowledge_blank_title_closes_without_effect() {
        let mut state = AppState::starting_at(Section::Reports);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('a')), key(KeyCode::Enter)],
        );
        assert!(view_data.knowledge.draft().is_none());
        assert!(runtime.articles.is_empty());
        assert_eq!(view_data.knowledge.article_count(), 3);
    }

    #[test]
    fn knowledge_search_filters_list() {
        let mut state = AppState::starting_at(Section::Reports);
        let mut runtime = TestRuntime::seeded();
        let mut view_data = loaded(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('s'))]);
        type_text(&mut state, &mut runtime, &mut view_data, "roster");
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Enter)]);
        let matches = view_data.knowledge.filtered();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category.id, "playbooks");

        // Typing while searching never leaked into section switching.
        assert_eq!(state.section, Section::Reports);
    }

    #[test]
    fn stale_status_clear_is_ignored() {
        let mut state = AppState::default();
        let mut view_data = view_data_for_test();
        let (tx, rx) = mpsc::channel();
        state.dispatch(AppCommand::SetStatus("saved".to_owned()));
        view_data.status_token = 2;

        tx.send(InternalEvent::ClearStatus { token: 1 })
            .expect("channel open");
        process_internal_events(&mut state, &mut view_data, &rx);
        assert_eq!(state.status_line.as_deref(), Some("saved"));

        tx.send(InternalEvent::ClearStatus { token: 2 })
            .expect("channel open");
        process_internal_events(&mut state, &mut view_data, &rx);
        assert_eq!(state.status_line, None);
    }

    #[test]
    fn sidebar_marks_dashboard_and_document_for_reports() {
        let text = render_sidebar_text(&AppState::starting_at(Section::Reports));
        assert!(text.contains("▸ Dashboard"), "{text}");
        assert!(text.contains("▸ Knowledge Base"), "{text}");
        assert!(text.contains("  Action Plans"), "{text}");
        assert!(text.contains("STRATEGIC PLANNING"), "{text}");
    }

    #[test]
    fn table_keys_map_to_commands() {
        assert_eq!(
            table_command_for_key(key(KeyCode::Char('j'))),
            Some(TableCommand::MoveRow(1))
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::PageDown)),
            Some(TableCommand::NextPage)
        );
        assert_eq!(
            table_command_for_key(key(KeyCode::Char(']'))),
            Some(TableCommand::NextView)
        );
        assert_eq!(table_command_for_key(key(KeyCode::Char('a'))), None);
        assert_eq!(
            table_command_for_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn footer_reports_selection_and_page() {
        let mut runtime = TestRuntime::seeded();
        let view_data = loaded(&mut runtime);
        let page = view_data.dashboard.page_view();
        assert_eq!(
            table_footer_text(&page),
            "0 of 3 row(s) selected. | Page 1 of 1 | 10 per page"
        );
    }

    #[test]
    fn form_editing_cycles_choices_and_wraps_fields() {
        let mut form = AccountForm::default();
        let mut field = 0;
        assert_eq!(
            edit_form_with_key(&mut form, &mut field, key(KeyCode::BackTab)),
            FormKeyOutcome::Edited
        );
        assert_eq!(field, form.field_count() - 1);

        field = 5;
        edit_form_with_key(&mut form, &mut field, key(KeyCode::Right));
        assert_eq!(form.field_value(5), "Mid-Market");

        field = form.field_count() - 1;
        edit_form_with_key(&mut form, &mut field, key(KeyCode::Char('a')));
        edit_form_with_key(&mut form, &mut field, key(KeyCode::Enter));
        edit_form_with_key(&mut form, &mut field, key(KeyCode::Char('b')));
        assert_eq!(form.field_value(field), "a\nb");
        assert_eq!(
            edit_form_with_key(&mut form, &mut field, key(KeyCode::Esc)),
            FormKeyOutcome::Cancel
        );
    }

    #[test]
    fn form_text_marks_focused_field() {
        let form = AccountForm::from_record(&account(5, "Northwind", "Active"));
        let (text, cursor_line) = render_form_text("Update it.", &form, 5, "Save Changes");
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[cursor_line], "› Type: ‹ Enterprise ›");
        assert!(text.contains("  Account name: Northwind"));
        assert!(text.contains("enter Save Changes"));
    }

    #[test]
    fn detail_text_renders_headings_and_multiline() {
        let detail = DetailView {
            title: "Northwind".to_owned(),
            description: "Priority High".to_owned(),
            sections: vec![DetailSection {
                heading: Some("Ownership"),
                fields: vec![
                    DetailField::new("Owner", "Eddie Lake"),
                    DetailField::multiline("Notes", "line one\nline two", "No additional notes."),
                ],
            }],
        };
        let text = render_detail_text(&detail);
        assert!(text.contains("OWNERSHIP\nOwner: Eddie Lake\nNotes:\n  line one\n  line two"));
    }
}
