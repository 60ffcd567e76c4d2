//! Template sources.
//!
//! A [`TemplateSource`] supplies template text by identifier. Components are
//! agnostic to where the text lives: [`DirSource`] reads from a directory on
//! disk, [`EmbeddedSource`] serves content compiled into the binary (for
//! example via `include_str!`).
//!
//! Identifiers are `/`-separated relative paths such as `"layout/page.html"`.
//!
//! ```rust
//! use hxkit_render::{EmbeddedSource, TemplateSource};
//!
//! let source = EmbeddedSource::from_entries(&[
//!     ("page.html", "<h1>{{ data.title }}</h1>"),
//! ]);
//! assert!(source.load("page.html").is_ok());
//! assert!(source.load("missing.html").is_err());
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Component as PathComponent, Path, PathBuf};

use crate::error::RenderError;

/// Supplies template source text by identifier.
pub trait TemplateSource: Send + Sync {
    /// Loads the template with the given identifier.
    ///
    /// Returns [`RenderError::TemplateNotFound`] when the source has no such
    /// template, and [`RenderError::Io`] for any other read failure.
    fn load(&self, name: &str) -> Result<String, RenderError>;
}

/// Reads templates from a directory on disk.
///
/// Identifiers are resolved relative to the root. Identifiers that would
/// escape the root (absolute paths, `..` segments) are reported as not found.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory templates are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let contained = relative
            .components()
            .all(|c| matches!(c, PathComponent::Normal(_) | PathComponent::CurDir));
        if !contained {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl Default for DirSource {
    fn default() -> Self {
        Self::new("./")
    }
}

impl TemplateSource for DirSource {
    fn load(&self, name: &str) -> Result<String, RenderError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| RenderError::not_found(name))?;

        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => RenderError::not_found(name),
            _ => RenderError::Io {
                name: name.to_string(),
                source: err,
            },
        })
    }
}

/// Serves templates from memory.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSource {
    entries: HashMap<String, String>,
}

impl EmbeddedSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source from `(identifier, content)` pairs.
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        let mut source = Self::new();
        for (name, content) in entries {
            source.insert(*name, *content);
        }
        source
    }

    /// Adds or replaces a template.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), content.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TemplateSource for EmbeddedSource {
    fn load(&self, name: &str) -> Result<String, RenderError> {
        let name = name.strip_prefix("./").unwrap_or(name);
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::not_found(name))
    }
}
