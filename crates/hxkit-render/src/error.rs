//! Error types for component rendering.
//!
//! [`RenderError`] is the single error type returned by every rendering
//! operation. Errors are never retried or swallowed: the first failure in a
//! component tree aborts the whole render and is returned unchanged, so the
//! variant tells the caller which stage failed.

use std::io;

/// Errors that can occur while composing or rendering components.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A component appeared twice in its own active render chain.
    ///
    /// `chain` lists the entry templates of the chain, ending with the
    /// component that was re-entered.
    #[error("circular reference detected in partials: {chain}")]
    CircularReference { chain: String },

    /// Render was invoked on a component with no template identifiers.
    #[error("no templates provided for rendering")]
    NoTemplates,

    /// The template source has no template with this name.
    #[error("template not found: {name}")]
    TemplateNotFound { name: String },

    /// Reading a template from its source failed.
    #[error("failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The engine failed to parse the template set.
    #[error("failed to compile templates [{templates}]: {message}")]
    Compile { templates: String, message: String },

    /// The engine failed while executing a compiled template.
    #[error("failed to render templates [{templates}]: {message}")]
    Execution { templates: String, message: String },

    /// A cache entry was not the compiled type the engine expects.
    #[error("cached template for {key} has an unexpected type")]
    CacheType { key: String },

    /// Data passed to `set_data_from` did not serialize to a mapping.
    #[error("invalid component data: {0}")]
    Data(String),

    /// A wrapping parent was dropped before the wrap chain was resolved.
    #[error("wrapper for slot '{slot}' is no longer alive")]
    DetachedWrapper { slot: String },
}

impl RenderError {
    /// Creates a compile error for the given template set.
    pub fn compile(templates: &[String], message: impl Into<String>) -> Self {
        Self::Compile {
            templates: templates.join(", "),
            message: message.into(),
        }
    }

    /// Creates an execution error for the given template set.
    pub fn execution(templates: &[String], message: impl Into<String>) -> Self {
        Self::Execution {
            templates: templates.join(", "),
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::TemplateNotFound { name: name.into() }
    }

    /// Returns true for [`RenderError::CircularReference`].
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularReference { .. })
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Data(err.to_string())
    }
}
