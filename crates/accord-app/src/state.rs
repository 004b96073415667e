// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::Section;
use crate::search::SEARCH_SUGGESTIONS;

pub const SIDEBAR_USER: &str = "J. Duplessis-Savard";
pub const SEARCH_TITLE: &str = "Search workspace";
pub const SEARCH_DESCRIPTION: &str = "Search across dashboard entries, accounts, and contacts.";
pub const SEARCH_PLACEHOLDER: &str = "Search by title, owner, company, or status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarItem {
    pub group: &'static str,
    pub label: &'static str,
    /// `None` for the search launcher.
    pub section: Option<Section>,
}

pub const SIDEBAR_ITEMS: [SidebarItem; 5] = [
    SidebarItem {
        group: "Dashboard",
        label: "Dashboard",
        section: Some(Section::Dashboard),
    },
    SidebarItem {
        group: "Strategic Planning",
        label: "Action Plans",
        section: Some(Section::Accounts),
    },
    SidebarItem {
        group: "Strategic Planning",
        label: "Strategic Actions",
        section: Some(Section::Contacts),
    },
    SidebarItem {
        group: "Documents",
        label: "Knowledge Base",
        section: Some(Section::Reports),
    },
    SidebarItem {
        group: "",
        label: "Search",
        section: None,
    },
];

/// Main-navigation entry to highlight; the knowledge base lives under
/// documents, so the main list keeps Dashboard lit while it is open.
pub fn sidebar_active(section: Section) -> Section {
    match section {
        Section::Reports => Section::Dashboard,
        other => other,
    }
}

/// Document entry to highlight, if any.
pub fn sidebar_active_document(section: Section) -> Option<Section> {
    (section == Section::Reports).then_some(Section::Reports)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    /// Highlighted hit, or suggestion while the query is blank.
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub section: Section,
    pub search: Option<SearchState>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::starting_at(Section::Dashboard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SelectSection(Section),
    NextSection,
    PrevSection,
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    MoveSearchCursor { delta: isize, len: usize },
    ApplySuggestion(usize),
    /// Navigate to the section of a chosen hit and close the overlay.
    ChooseHit(Section),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SectionChanged(Section),
    SearchOpened,
    SearchClosed,
    SearchQueryChanged(String),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn starting_at(section: Section) -> Self {
        Self {
            section,
            search: None,
            status_line: None,
        }
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_ref().map(|search| search.query.as_str())
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SelectSection(section) => self.select(section),
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::OpenSearch => {
                self.search = Some(SearchState::default());
                vec![AppEvent::SearchOpened]
            }
            AppCommand::CloseSearch => {
                if self.search.take().is_some() {
                    vec![AppEvent::SearchClosed]
                } else {
                    Vec::new()
                }
            }
            AppCommand::SearchInput(ch) => self.edit_query(|query| query.push(ch)),
            AppCommand::SearchBackspace => self.edit_query(|query| {
                query.pop();
            }),
            AppCommand::MoveSearchCursor { delta, len } => {
                if let Some(search) = self.search.as_mut()
                    && len > 0
                {
                    let next = (search.cursor as isize + delta).clamp(0, len as isize - 1);
                    search.cursor = next as usize;
                }
                Vec::new()
            }
            AppCommand::ApplySuggestion(index) => match SEARCH_SUGGESTIONS.get(index) {
                Some(suggestion) => self.edit_query(|query| {
                    query.clear();
                    query.push_str(suggestion.query);
                }),
                None => Vec::new(),
            },
            AppCommand::ChooseHit(section) => {
                let mut events = self.select(section);
                if self.search.take().is_some() {
                    events.push(AppEvent::SearchClosed);
                }
                events
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn select(&mut self, section: Section) -> Vec<AppEvent> {
        if self.section == section {
            return Vec::new();
        }
        self.section = section;
        vec![AppEvent::SectionChanged(section)]
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let sections = Section::ALL;
        let current = sections
            .iter()
            .position(|section| *section == self.section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.select(sections[next])
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) -> Vec<AppEvent> {
        let Some(search) = self.search.as_mut() else {
            return Vec::new();
        };
        edit(&mut search.query);
        search.cursor = 0;
        vec![AppEvent::SearchQueryChanged(search.query.clone())]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, sidebar_active, sidebar_active_document};
    use crate::Section;

    #[test]
    fn section_rotation_wraps() {
        let mut state = AppState::starting_at(Section::Reports);

        let events = state.dispatch(AppCommand::NextSection);
        assert_eq!(state.section, Section::Dashboard);
        assert_eq!(events, vec![AppEvent::SectionChanged(Section::Dashboard)]);

        state.dispatch(AppCommand::PrevSection);
        assert_eq!(state.section, Section::Reports);
    }

    #[test]
    fn selecting_current_section_is_quiet() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::SelectSection(Section::Dashboard)).is_empty());
    }

    #[test]
    fn reports_highlights_dashboard_and_document() {
        assert_eq!(sidebar_active(Section::Reports), Section::Dashboard);
        assert_eq!(sidebar_active(Section::Contacts), Section::Contacts);
        assert_eq!(sidebar_active_document(Section::Reports), Some(Section::Reports));
        assert_eq!(sidebar_active_document(Section::Accounts), None);
    }

    #[test]
    fn search_typing_and_suggestions() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::SearchInput('x')).is_empty());

        state.dispatch(AppCommand::OpenSearch);
        state.dispatch(AppCommand::SearchInput('h'));
        state.dispatch(AppCommand::SearchInput('i'));
        state.dispatch(AppCommand::SearchBackspace);
        assert_eq!(state.search_query(), Some("h"));

        let events = state.dispatch(AppCommand::ApplySuggestion(2));
        assert_eq!(
            events,
            vec![AppEvent::SearchQueryChanged("escalation".to_owned())]
        );
    }

    #[test]
    fn choosing_hit_navigates_and_closes() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::OpenSearch);
        let events = state.dispatch(AppCommand::ChooseHit(Section::Accounts));
        assert_eq!(
            events,
            vec![
                AppEvent::SectionChanged(Section::Accounts),
                AppEvent::SearchClosed,
            ]
        );
        assert!(state.search.is_none());
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("Account created".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("Account created"));
        assert_eq!(state.dispatch(AppCommand::ClearStatus), vec![AppEvent::StatusCleared]);
        assert_eq!(state.status_line, None);
    }
}
