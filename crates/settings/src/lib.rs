//! Settings document with dotted-path lookups.
//!
//! A [`Config`] wraps a parsed TOML table. Values are read by dotted key
//! (`greetings.time_based.enabled`) and every typed accessor takes a default
//! that is returned when the key is missing, walks through a non-table, or
//! holds a value of the wrong type. Lookups never fail.
//!
//! ```no_run
//! use settings::Config;
//!
//! let config = Config::load("config/settings.toml")?;
//! let name = config.get_str("greetings.default_name", "World");
//! let enabled = config.get_bool("greetings.time_based.enabled", true);
//! # Ok::<(), settings::Error>(())
//! ```

mod config;
mod error;

pub use config::{AppInfo, Config};
pub use error::{Error, Result};

pub use toml::{Table, Value};
