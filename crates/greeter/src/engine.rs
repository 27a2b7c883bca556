//! The greeting engine.

use crate::clock::{Clock, SystemClock, TimeSlot};
use crate::history::{GreetingKind, History, HistoryEntry};
use crate::stats::{Counters, StatisticsSnapshot};
use crate::template::{self, FALLBACK_NAME, FALLBACK_TEMPLATE};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use settings::Config;
use tracing::{Span, debug, info, warn};
use uuid::Uuid;

const DEFAULT_NAME_KEY: &str = "greetings.default_name";
const LANGUAGES_KEY: &str = "greetings.languages";
const TIME_BASED_ENABLED_KEY: &str = "greetings.time_based.enabled";
const HISTORY_LIMIT_KEY: &str = "greetings.history.max_entries";

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_LIMIT: u64 = 100;

/// A unique identifier for an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates greetings and keeps per-session statistics and history.
///
/// Every public call either succeeds, counting exactly one greeting and
/// appending exactly one history entry, or fails without touching either.
pub struct Engine<C = SystemClock> {
    pub id: SessionId,
    config: Config,
    clock: C,
    span: Span,
    counters: Counters,
    session_start: DateTime<Local>,
    history: History,
}

impl Engine {
    /// Create an engine reading the system clock.
    ///
    /// Events are recorded inside `span`; subscriber setup belongs to the
    /// host.
    pub fn new(config: Config, span: Span) -> Self {
        Self::with_clock(config, span, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    /// Create an engine reading time from `clock`.
    pub fn with_clock(config: Config, span: Span, clock: C) -> Self {
        let id = SessionId::new();
        let session_start = clock.now();
        info!(parent: &span, session = %id, "greeting engine initialized");

        Self {
            id,
            config,
            clock,
            span,
            counters: Counters::default(),
            session_start,
            history: History::new(),
        }
    }

    /// Settings the engine reads templates from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access for the host to reload or replace settings.
    ///
    /// Later greetings use the new document.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// `Hello, {name}!`
    pub fn standard_greeting(&mut self, name: Option<&str>) -> String {
        let name = self.resolve_name(name);
        let greeting = template::render(FALLBACK_TEMPLATE, &name);

        debug!(parent: &self.span, %name, "generated standard greeting");
        self.record(
            HistoryEntry::new(self.clock.now(), GreetingKind::Standard, &greeting).with_name(name),
        );
        greeting
    }

    /// Greeting from the template configured for `language`.
    ///
    /// The code is matched case-insensitively.
    pub fn multilang_greeting(&mut self, name: Option<&str>, language: &str) -> Result<String> {
        let code = language.trim().to_lowercase();
        let Some(template) = self.language_template(&code) else {
            let available = self.available_languages();
            warn!(parent: &self.span, code = %code, "unsupported language requested");
            return Err(Error::UnsupportedLanguage { code, available });
        };

        let name = self.resolve_name(name);
        let greeting = template::render(&template, &name);

        debug!(parent: &self.span, %name, language = %code, "generated multilingual greeting");
        self.counters.record_language(&code);
        self.record(
            HistoryEntry::new(self.clock.now(), GreetingKind::Multilang, &greeting)
                .with_name(name)
                .with_language(code),
        );
        Ok(greeting)
    }

    /// Greeting for the current time of day.
    ///
    /// When time-based greetings are disabled this is a standard greeting and
    /// is counted as one.
    pub fn time_based_greeting(&mut self, name: Option<&str>) -> String {
        if !self.config.get_bool(TIME_BASED_ENABLED_KEY, true) {
            return self.standard_greeting(name);
        }

        let now = self.clock.now();
        let slot = TimeSlot::at(&now);
        let template = self.config.get_str(
            &format!("greetings.time_based.{}", slot.key()),
            FALLBACK_TEMPLATE,
        );
        let name = self.resolve_name(name);
        let greeting = template::render(&template, &name);

        debug!(parent: &self.span, %name, %slot, "generated time-based greeting");
        self.record(HistoryEntry::new(now, GreetingKind::TimeBased, &greeting).with_name(name));
        greeting
    }

    /// Trim `message` and wrap it in the decorative marker.
    pub fn process_custom_message(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        let processed = template::decorate(message);

        let preview: String = message.chars().take(50).collect();
        debug!(parent: &self.span, %preview, "processed custom message");
        self.record(HistoryEntry::new(self.clock.now(), GreetingKind::Custom, &processed));
        Ok(processed)
    }

    /// Configured language codes, sorted.
    ///
    /// Entries whose template is not a string are left out.
    pub fn available_languages(&self) -> Vec<String> {
        let Some(table) = self.config.get_table(LANGUAGES_KEY) else {
            return Vec::new();
        };
        let mut codes: Vec<String> = table
            .iter()
            .filter(|(_, template)| template.is_str())
            .map(|(code, _)| code.clone())
            .collect();
        codes.sort();
        codes
    }

    /// Copy of the counters with the session duration as of now.
    pub fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot::new(&self.counters, self.session_start, self.clock.now())
    }

    pub fn session_start(&self) -> DateTime<Local> {
        self.session_start
    }

    /// Every retained entry, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// The last `n` entries, most recent first.
    pub fn recent_history(&self, n: usize) -> Vec<HistoryEntry> {
        self.history.recent(n)
    }

    /// Drop every history entry. Statistics are kept.
    pub fn clear_history(&mut self) {
        info!(parent: &self.span, cleared = self.history.len(), "history cleared");
        self.history.clear();
    }

    fn resolve_name(&self, name: Option<&str>) -> String {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.config.get_str(DEFAULT_NAME_KEY, FALLBACK_NAME),
        }
    }

    fn language_template(&self, code: &str) -> Option<String> {
        self.config
            .get_table(LANGUAGES_KEY)?
            .get(code)?
            .as_str()
            .map(str::to_string)
    }

    fn history_limit(&self) -> Option<usize> {
        match self.config.get_u64(HISTORY_LIMIT_KEY, DEFAULT_HISTORY_LIMIT) {
            0 => None,
            limit => Some(usize::try_from(limit).unwrap_or(usize::MAX)),
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.counters.record(entry.kind);
        let limit = self.history_limit();
        self.history.push(entry, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use chrono::{TimeDelta, TimeZone};

    const SETTINGS: &str = r#"
[greetings]
default_name = "World"

[greetings.languages]
en = "Hello, {name}!"
es = "¡Hola, {name}!"
fr = "Bonjour, {name}!"
xx = 42

[greetings.time_based]
enabled = true
morning = "Good morning, {name}!"
afternoon = "Good afternoon, {name}!"
evening = "Good evening, {name}!"

[greetings.history]
max_entries = 3
"#;

    fn at_hour(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, hour, 30, 0).earliest().unwrap()
    }

    fn engine() -> Engine<ManualClock> {
        engine_with(SETTINGS)
    }

    fn engine_with(settings: &str) -> Engine<ManualClock> {
        let config = Config::parse(settings).unwrap();
        Engine::with_clock(config, Span::none(), ManualClock::new(at_hour(9)))
    }

    #[test]
    fn test_standard_greeting_uses_name() {
        let mut engine = engine();
        assert_eq!(engine.standard_greeting(Some("Alice")), "Hello, Alice!");
        assert_eq!(engine.standard_greeting(Some("  Bob ")), "Hello, Bob!");
    }

    #[test]
    fn test_standard_greeting_default_name() {
        let mut engine = engine_with("[greetings]\ndefault_name = \"Friend\"\n");
        assert_eq!(engine.standard_greeting(None), "Hello, Friend!");
        assert_eq!(engine.standard_greeting(Some("   ")), "Hello, Friend!");

        let mut bare = engine_with("");
        assert_eq!(bare.standard_greeting(Some("")), "Hello, World!");
    }

    #[test]
    fn test_multilang_lowercases_code() {
        let mut engine = engine();
        let greeting = engine.multilang_greeting(Some("Marie"), " FR ").unwrap();
        assert_eq!(greeting, "Bonjour, Marie!");
        let stats = engine.statistics();
        assert_eq!(stats.counters.language_usage["fr"], 1);
        assert_eq!(engine.history()[0].language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_non_string_language_is_unsupported() {
        let mut engine = engine();
        let err = engine.multilang_greeting(None, "xx").unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedLanguage {
                code: "xx".into(),
                available: vec!["en".into(), "es".into(), "fr".into()],
            }
        );
    }

    #[test]
    fn test_available_languages_sorted() {
        let engine = engine();
        assert_eq!(engine.available_languages(), ["en", "es", "fr"]);
        assert!(engine_with("").available_languages().is_empty());
    }

    #[test]
    fn test_missing_slot_template_falls_back() {
        let mut engine = engine();
        engine.clock().set(at_hour(23));
        assert_eq!(engine.time_based_greeting(Some("Owl")), "Hello, Owl!");
        assert_eq!(engine.statistics().counters.time_based_greetings, 1);
    }

    #[test]
    fn test_custom_message_rejects_blank() {
        let mut engine = engine();
        assert_eq!(engine.process_custom_message("  \t "), Err(Error::EmptyMessage));
        assert_eq!(engine.statistics().counters, Counters::default());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_history_limit_from_settings() {
        let mut engine = engine();
        for name in ["a", "b", "c", "d"] {
            engine.standard_greeting(Some(name));
        }
        let names: Vec<_> = engine
            .history()
            .into_iter()
            .filter_map(|e| e.name)
            .collect();
        assert_eq!(names, ["b", "c", "d"]);
        assert_eq!(engine.statistics().counters.standard_greetings, 4);
        assert_eq!(engine.recent_history(1)[0].name.as_deref(), Some("d"));
    }

    #[test]
    fn test_zero_history_limit_is_unbounded() {
        let mut engine = engine_with("[greetings.history]\nmax_entries = 0\n");
        for _ in 0..150 {
            engine.standard_greeting(None);
        }
        assert_eq!(engine.history().len(), 150);
    }

    #[test]
    fn test_default_history_limit() {
        let mut engine = engine_with("");
        for _ in 0..(DEFAULT_HISTORY_LIMIT + 5) {
            engine.standard_greeting(None);
        }
        assert_eq!(engine.history().len() as u64, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_session_duration_tracks_clock() {
        let engine = engine();
        assert_eq!(engine.statistics().session_duration.as_secs(), 0);
        engine.clock().advance(TimeDelta::minutes(3));
        let stats = engine.statistics();
        assert_eq!(stats.session_duration.as_secs(), 180);
        assert_eq!(stats.session_duration_minutes(), 3.0);
        assert_eq!(stats.session_start, engine.session_start());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(engine().id, engine().id);
    }
}
