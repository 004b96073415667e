// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer key of a record, unique within its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Next id for a collection whose ids are `ids`: `max + 1`, or `1` when empty.
    pub fn next_after<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let max = ids.into_iter().map(Self::get).max().unwrap_or(0);
        Self(max.max(0) + 1)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn next_after_empty_is_one() {
        assert_eq!(RecordId::next_after(Vec::new()), RecordId::new(1));
    }

    #[test]
    fn next_after_skips_past_max_not_len() {
        let ids = [3, 9, 4].map(RecordId::new);
        assert_eq!(RecordId::next_after(ids), RecordId::new(10));
    }
}
