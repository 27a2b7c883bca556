//! Greeting templates.
//!
//! A template is plain text with one placeholder, `{name}`, standing for the
//! greeted name. Every occurrence is replaced; nothing else is interpreted.

/// The name placeholder.
pub const PLACEHOLDER: &str = "{name}";

/// Template used when a slot has no configured text.
pub const FALLBACK_TEMPLATE: &str = "Hello, {name}!";

/// Name used when the settings do not provide one.
pub const FALLBACK_NAME: &str = "World";

const MARKER: &str = "✨";

/// Substitute `name` into `template`.
pub fn render(template: &str, name: &str) -> String {
    template.replace(PLACEHOLDER, name)
}

/// Wrap an already-trimmed message in the decorative marker.
pub fn decorate(message: &str) -> String {
    format!("{MARKER} {message} {MARKER}")
}
