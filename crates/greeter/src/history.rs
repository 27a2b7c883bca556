//! Greeting history.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// The kind of greeting that produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingKind {
    Standard,
    Multilang,
    TimeBased,
    Custom,
}

impl GreetingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GreetingKind::Standard => "standard",
            GreetingKind::Multilang => "multilang",
            GreetingKind::TimeBased => "time_based",
            GreetingKind::Custom => "custom",
        }
    }
}

impl fmt::Display for GreetingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successful greeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Local>,
    pub kind: GreetingKind,
    /// The greeted name. Custom messages have none.
    pub name: Option<String>,
    /// Language code, for multilingual greetings.
    pub language: Option<String>,
    /// The text returned to the caller.
    pub text: String,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Local>, kind: GreetingKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            kind,
            name: None,
            language: None,
            text: text.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        self.language = Some(code.into());
        self
    }
}

/// Recent greetings, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, evicting the oldest ones so at most `limit` remain.
    ///
    /// `None` keeps every entry.
    pub fn push(&mut self, entry: HistoryEntry, limit: Option<usize>) {
        if let Some(limit) = limit {
            while self.entries.len() >= limit.max(1) {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
    }

    /// All entries in call order.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// The last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
