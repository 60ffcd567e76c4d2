//! Request-scoped context handed to every render.
//!
//! A [`RenderContext`] is created by the caller for one logical render (usually
//! one HTTP request) and passed down the whole component tree unchanged. It is
//! exposed to templates as `ctx`, so handlers can publish request metadata
//! (the HTMX target, a CSRF token, a locale) without threading it through
//! every component's data.
//!
//! # Example
//!
//! ```rust
//! use hxkit_render::RenderContext;
//!
//! let ctx = RenderContext::new()
//!     .with_extra("target", "#content")
//!     .with_extra("locale", "en");
//!
//! assert_eq!(ctx.get_extra("target"), Some("#content"));
//! ```
//!
//! Reentrancy tracking is deliberately not stored here: the active render
//! chain is an explicit parameter of the orchestrator, so one context can be
//! shared by concurrent renders.

use std::collections::BTreeMap;

use minijinja::Value;

/// Information available to templates at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Additional string key-value pairs, visible to templates as `ctx.<key>`.
    pub extras: BTreeMap<String, String>,
}

impl RenderContext {
    /// Creates an empty render context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extra key-value pair to the context.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Gets an extra value by key.
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(|s| s.as_str())
    }

    pub(crate) fn to_value(&self) -> Value {
        Value::from_iter(
            self.extras
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extras() {
        let ctx = RenderContext::new().with_extra("a", "1").with_extra("b", "2");
        assert_eq!(ctx.get_extra("a"), Some("1"));
        assert_eq!(ctx.get_extra("missing"), None);
    }

    #[test]
    fn test_to_value_exposes_extras() {
        let ctx = RenderContext::new().with_extra("target", "#main");
        let value = ctx.to_value();
        let target = value.get_attr("target").unwrap();
        assert_eq!(target.as_str(), Some("#main"));
    }
}
