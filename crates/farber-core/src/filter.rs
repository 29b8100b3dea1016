//! Client-side filtering
//!
//! Filters are pure functions of a collection plus the current search text
//! and selections. Nothing here touches storage.

use std::fmt;
use std::str::FromStr;

/// Select value meaning "no filter"
pub const ALL: &str = "all";

/// A select filter: everything, or exactly one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl<T: FromStr> Selection<T> {
    /// Parse a select value, [`ALL`] (or an empty value) meaning no filter
    pub fn parse(value: &str) -> Result<Self, T::Err> {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Ok(Selection::All)
        } else {
            value.parse().map(Selection::Only)
        }
    }
}

impl Selection<String> {
    /// Free-text select value; any non-[`ALL`] value is accepted as is
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// Case-insensitive substring match of `needle` against any of `fields`
///
/// The needle is trimmed first; an empty needle matches everything.
pub fn matches_search(needle: &str, fields: &[&str]) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Distinct values in first-seen order
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|v| v == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
