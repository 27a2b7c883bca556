//! Session statistics.

use crate::GreetingKind;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Greeting counters for one session.
///
/// `total_greetings` always equals the sum of the four per-kind counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub total_greetings: u64,
    pub standard_greetings: u64,
    pub multilang_greetings: u64,
    pub time_based_greetings: u64,
    pub custom_messages: u64,
    /// Multilingual greetings per language code.
    pub language_usage: BTreeMap<String, u64>,
}

impl Counters {
    /// Count one successful greeting of `kind`.
    pub fn record(&mut self, kind: GreetingKind) {
        self.total_greetings += 1;
        let counter = match kind {
            GreetingKind::Standard => &mut self.standard_greetings,
            GreetingKind::Multilang => &mut self.multilang_greetings,
            GreetingKind::TimeBased => &mut self.time_based_greetings,
            GreetingKind::Custom => &mut self.custom_messages,
        };
        *counter += 1;
    }

    /// Count one use of a language.
    pub fn record_language(&mut self, code: &str) {
        *self.language_usage.entry(code.to_string()).or_insert(0) += 1;
    }

    pub fn is_consistent(&self) -> bool {
        self.total_greetings
            == self.standard_greetings
                + self.multilang_greetings
                + self.time_based_greetings
                + self.custom_messages
    }
}

/// Point-in-time copy of the session statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot {
    #[serde(flatten)]
    pub counters: Counters,
    pub session_start: DateTime<Local>,
    pub session_duration: Duration,
}

impl StatisticsSnapshot {
    pub(crate) fn new(
        counters: &Counters,
        session_start: DateTime<Local>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            counters: counters.clone(),
            session_start,
            session_duration: (now - session_start).to_std().unwrap_or_default(),
        }
    }

    /// Session length in minutes, rounded to two decimals.
    pub fn session_duration_minutes(&self) -> f64 {
        (self.session_duration.as_secs_f64() / 60.0 * 100.0).round() / 100.0
    }
}
