//! Settings document loading and lookup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, info, warn};

const BUILTIN: &str = include_str!("default.toml");

/// Application name and version as configured under `[app]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

/// A parsed settings document.
#[derive(Debug, Clone, Default)]
pub struct Config {
    document: Table,
    source: Option<PathBuf>,
}

impl Config {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = read_document(path)?;
        info!(path = %path.display(), "settings loaded");

        Ok(Self {
            document,
            source: Some(path.to_path_buf()),
        })
    }

    /// Parse settings from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let document = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Self::from_table(document))
    }

    /// Wrap an already-built table.
    pub fn from_table(document: Table) -> Self {
        Self {
            document,
            source: None,
        }
    }

    /// The compiled-in default document.
    pub fn builtin() -> Self {
        Self::from_table(toml::from_str(BUILTIN).unwrap_or_default())
    }

    /// Path the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Re-read the backing file.
    ///
    /// The document is replaced as a whole. If reading or parsing fails the
    /// current document is left untouched.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.source.as_deref().ok_or(Error::NotFileBacked)?;
        info!(path = %path.display(), "reloading settings");
        self.document = read_document(path)?;
        Ok(())
    }

    /// The full document.
    pub fn document(&self) -> &Table {
        &self.document
    }

    /// Look up a value by dotted key.
    ///
    /// Returns `None` when a segment is missing or an intermediate value is
    /// not a table.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.document.get(first)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        Some(value)
    }

    /// Look up a table by dotted key.
    pub fn get_table(&self, key: &str) -> Option<&Table> {
        self.lookup(key, Value::as_table)
    }

    /// Look up a string, falling back to `default`.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.lookup(key, Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Look up a boolean, falling back to `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.lookup(key, Value::as_bool).unwrap_or(default)
    }

    /// Look up a non-negative integer, falling back to `default`.
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.lookup(key, |v| v.as_integer().and_then(|i| u64::try_from(i).ok()))
            .unwrap_or(default)
    }

    /// Look up any deserializable value, falling back to `default`.
    pub fn get_or<T>(&self, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        self.lookup(key, |v| v.clone().try_into().ok())
            .unwrap_or(default)
    }

    /// Whether `app.debug` is set.
    pub fn is_debug_enabled(&self) -> bool {
        self.get_bool("app.debug", false)
    }

    /// Application name and version.
    pub fn app_info(&self) -> AppInfo {
        AppInfo {
            name: self.get_str("app.name", "Hello World"),
            version: self.get_str("app.version", "1.0.0"),
        }
    }

    fn lookup<'a, T>(
        &'a self,
        key: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        match self.get(key).and_then(extract) {
            Some(value) => {
                debug!(key, "settings value found");
                Some(value)
            }
            None => {
                warn!(key, "settings key missing or mistyped, using default");
                None
            }
        }
    }
}

fn read_document(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const SAMPLE: &str = r#"
[app]
name = "Greeter"
debug = true

[greetings]
default_name = "Friend"
count = 3
negative = -1

[greetings.languages]
en = "Hello, {name}!"
es = "¡Hola, {name}!"
"#;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("settings-{tag}-{}.toml", std::process::id()))
    }

    #[test]
    fn test_get_nested_value() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.get_str("greetings.default_name", "World"), "Friend");
        assert_eq!(config.get_str("app.name", "x"), "Greeter");
    }

    #[test]
    fn test_missing_key_returns_default() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.get_str("greetings.nope", "World"), "World");
        assert_eq!(config.get_str("nope.deeper.still", "World"), "World");
        assert!(config.get("nope").is_none());
    }

    #[test]
    fn test_traversal_through_scalar_returns_default() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.get("greetings.default_name.inner").is_none());
        assert!(config.get_bool("greetings.default_name.inner", true));
    }

    #[test]
    fn test_wrong_type_returns_default() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(!config.get_bool("greetings.default_name", false));
        assert_eq!(config.get_str("greetings.count", "n/a"), "n/a");
        assert_eq!(config.get_u64("greetings.negative", 7), 7);
        assert_eq!(config.get_u64("greetings.count", 7), 3);
    }

    #[test]
    fn test_get_table_and_generic() {
        let config = Config::parse(SAMPLE).unwrap();
        let languages = config.get_table("greetings.languages").unwrap();
        assert_eq!(languages.len(), 2);

        let map: BTreeMap<String, String> = config.get_or("greetings.languages", BTreeMap::new());
        assert_eq!(map.get("es").map(String::as_str), Some("¡Hola, {name}!"));

        let fallback: Vec<String> = config.get_or("greetings.languages", vec!["x".into()]);
        assert_eq!(fallback, vec!["x".to_string()]);
    }

    #[test]
    fn test_app_info_and_debug() {
        let config = Config::parse(SAMPLE).unwrap();
        assert!(config.is_debug_enabled());
        let info = config.app_info();
        assert_eq!(info.name, "Greeter");
        assert_eq!(info.version, "1.0.0");

        assert!(!Config::default().is_debug_enabled());
    }

    #[test]
    fn test_document_is_whole_table() {
        let config = Config::parse(SAMPLE).unwrap();
        let document = config.document();
        assert!(document.contains_key("app"));
        assert!(document.contains_key("greetings"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[greetings\nbroken").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_builtin_document() {
        let config = Config::builtin();
        assert_eq!(config.get_str("greetings.default_name", ""), "World");
        assert_eq!(config.get_table("greetings.languages").unwrap().len(), 5);
        assert!(config.get_bool("greetings.time_based.enabled", false));
        assert!(config.source().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(temp_path("missing-never-written")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_reload_replaces_document() {
        let path = temp_path("reload");
        std::fs::write(&path, "[greetings]\ndefault_name = \"World\"\n").unwrap();

        let mut config = Config::load(&path).unwrap();
        assert_eq!(config.get_str("greetings.default_name", ""), "World");

        std::fs::write(&path, "[greetings]\ndefault_name = \"Universe\"\n").unwrap();
        config.reload().unwrap();
        assert_eq!(config.get_str("greetings.default_name", ""), "Universe");

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(config.reload().is_err());
        assert_eq!(config.get_str("greetings.default_name", ""), "Universe");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reload_without_file() {
        let mut config = Config::parse(SAMPLE).unwrap();
        assert!(matches!(config.reload(), Err(Error::NotFileBacked)));
    }
}
