// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

/// Id of the implicit view that shows every row.
pub const OUTLINE_VIEW_ID: &str = "outline";
pub const DEFAULT_OUTLINE_LABEL: &str = "Outline";

/// Named predicate over a collection; one is active per table at a time.
pub struct ViewDefinition<R> {
    pub id: &'static str,
    pub label: &'static str,
    pub predicate: fn(&R) -> bool,
}

impl<R> ViewDefinition<R> {
    pub const fn new(id: &'static str, label: &'static str, predicate: fn(&R) -> bool) -> Self {
        Self {
            id,
            label,
            predicate,
        }
    }

    pub fn matches(&self, record: &R) -> bool {
        (self.predicate)(record)
    }

    pub fn badge(&self, records: &[R]) -> usize {
        records.iter().filter(|record| self.matches(record)).count()
    }
}

impl<R> Clone for ViewDefinition<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for ViewDefinition<R> {}

impl<R> fmt::Debug for ViewDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDefinition")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// One entry of the view switcher as shown above a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTab {
    pub id: &'static str,
    pub label: &'static str,
    pub badge: Option<usize>,
    pub active: bool,
}
