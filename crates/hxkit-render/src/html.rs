//! Trusted markup produced by a render.

use std::fmt;

use minijinja::Value;

/// Rendered markup that has already passed through the template engine.
///
/// When a child's `Html` is injected into its parent as a partial it is
/// handed to the engine as a safe string, so auto-escaping in the parent
/// template does not escape it a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Html(String);

impl Html {
    /// Wraps already-rendered markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the markup into a template value marked safe.
    pub fn into_value(self) -> Value {
        Value::from_safe_string(self.0)
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Html {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Html> for String {
    fn from(html: Html) -> Self {
        html.0
    }
}
