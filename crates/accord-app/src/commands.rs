// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Add,
    ExportAll,
    AssignOwner,
    ExportSelected,
    DeleteSelected,
    ClearSelection,
}

impl BulkAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::ExportAll => "export all",
            Self::AssignOwner => "assign owner",
            Self::ExportSelected => "export selected",
            Self::DeleteSelected => "delete selected",
            Self::ClearSelection => "clear selection",
        }
    }

    pub const fn key(self) -> char {
        match self {
            Self::Add => 'a',
            Self::ExportAll | Self::ExportSelected => 'x',
            Self::AssignOwner => 'o',
            Self::DeleteSelected => 'd',
            Self::ClearSelection => 'u',
        }
    }
}

const IDLE_ACTIONS: [BulkAction; 2] = [BulkAction::Add, BulkAction::ExportAll];
const SELECTION_ACTIONS: [BulkAction; 4] = [
    BulkAction::AssignOwner,
    BulkAction::ExportSelected,
    BulkAction::DeleteSelected,
    BulkAction::ClearSelection,
];

/// The two mutually exclusive toolbars of a CRUD view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSet {
    Idle,
    Selection { count: usize },
}

impl ActionSet {
    pub fn for_selection(has_selection: bool, count: usize) -> Self {
        if has_selection && count > 0 {
            Self::Selection { count }
        } else {
            Self::Idle
        }
    }

    pub fn actions(self) -> &'static [BulkAction] {
        match self {
            Self::Idle => &IDLE_ACTIONS,
            Self::Selection { .. } => &SELECTION_ACTIONS,
        }
    }

    pub fn contains(self, action: BulkAction) -> bool {
        self.actions().contains(&action)
    }

    /// Resolves a toolbar key against the actions currently offered.
    pub fn action_for_key(self, key: char) -> Option<BulkAction> {
        self.actions()
            .iter()
            .copied()
            .find(|action| action.key() == key)
    }

    pub fn hint(self) -> String {
        let actions = self
            .actions()
            .iter()
            .map(|action| format!("{} {}", action.key(), action.label()))
            .collect::<Vec<_>>()
            .join("  ");
        match self {
            Self::Idle => actions,
            Self::Selection { count } => format!("{count} selected  {actions}"),
        }
    }
}
