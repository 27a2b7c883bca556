//! Greeting engine: templated greetings with session statistics and history.
//!
//! The [`Engine`] renders four kinds of greeting from a [`settings::Config`]:
//!
//! - **standard**: `Hello, {name}!`
//! - **multilang**: a per-language template from `greetings.languages`
//! - **time_based**: a template for the current [`TimeSlot`] from
//!   `greetings.time_based`
//! - **custom**: free text, trimmed and decorated
//!
//! Each successful call bumps the session [`Counters`] and appends a
//! [`HistoryEntry`]. Failed calls change nothing.
//!
//! # Example
//!
//! ```
//! use greeter::Engine;
//! use settings::Config;
//!
//! let config = Config::parse(r#"
//! [greetings.languages]
//! es = "¡Hola, {name}!"
//! "#)?;
//! let mut engine = Engine::new(config, tracing::Span::none());
//!
//! assert_eq!(engine.standard_greeting(Some("Alice")), "Hello, Alice!");
//! assert_eq!(engine.multilang_greeting(Some("Carlos"), "es")?, "¡Hola, Carlos!");
//! assert_eq!(engine.statistics().counters.total_greetings, 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod clock;
mod engine;
mod error;
mod history;
mod stats;
pub mod template;

pub use clock::{Clock, ManualClock, SystemClock, TimeSlot};
pub use engine::{DEFAULT_HISTORY_LIMIT, Engine, SessionId};
pub use error::{Error, Result};
pub use history::{GreetingKind, History, HistoryEntry};
pub use stats::{Counters, StatisticsSnapshot};
