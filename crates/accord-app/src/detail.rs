// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

use crate::model::{MISSING_VALUE, Record};

pub const DEFAULT_DETAIL_DESCRIPTION: &str = "Review the latest status and owners for this entry.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
}

impl DetailField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            multiline: false,
        }
    }

    /// Field whose empty value renders as the missing-value dash.
    pub fn or_dash(label: &'static str, value: Option<&str>) -> Self {
        let value = value.filter(|value| !value.is_empty()).unwrap_or(MISSING_VALUE);
        Self::new(label, value)
    }

    pub fn multiline(label: &'static str, value: &str, fallback: &str) -> Self {
        let value = if value.trim().is_empty() {
            fallback
        } else {
            value
        };
        Self {
            label,
            value: value.to_owned(),
            multiline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub heading: Option<&'static str>,
    pub fields: Vec<DetailField>,
}

/// Fully rendered drawer content for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub description: String,
    pub sections: Vec<DetailSection>,
}

/// Per-table renderers for the detail drawer. Every hook is optional; missing
/// hooks fall back to the built-in rendering of the base fields.
///
/// `open_externally` routes "open row" to the table owner as an event instead
/// of opening the drawer.
pub struct DetailHooks<R> {
    pub title: Option<fn(&R) -> String>,
    pub description: Option<fn(&R) -> String>,
    pub body: Option<fn(&R) -> Vec<DetailSection>>,
    pub open_externally: bool,
}

impl<R> Default for DetailHooks<R> {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            body: None,
            open_externally: false,
        }
    }
}

impl<R> Clone for DetailHooks<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for DetailHooks<R> {}

impl<R> fmt::Debug for DetailHooks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailHooks")
            .field("title", &self.title.is_some())
            .field("description", &self.description.is_some())
            .field("body", &self.body.is_some())
            .field("open_externally", &self.open_externally)
            .finish()
    }
}

impl<R: Record> DetailHooks<R> {
    pub fn render(&self, record: &R) -> DetailView {
        let title = self
            .title
            .map_or_else(|| record.base().header.clone(), |title| title(record));
        let description = self.description.map_or_else(
            || DEFAULT_DETAIL_DESCRIPTION.to_owned(),
            |description| description(record),
        );
        let sections = self
            .body
            .map_or_else(|| default_sections(record), |body| body(record));
        DetailView {
            title,
            description,
            sections,
        }
    }
}

pub fn default_sections<R: Record>(record: &R) -> Vec<DetailSection> {
    let base = record.base();
    vec![DetailSection {
        heading: None,
        fields: vec![
            DetailField::new("Section type", base.kind.as_str()),
            DetailField::new("Status", base.status.as_str()),
            DetailField::new("Target / limit", format!("{} / {}", base.target, base.limit)),
            DetailField::new("Reviewer", base.reviewer.as_str()),
        ],
    }]
}
