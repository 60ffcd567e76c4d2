//! Commonly used types in one import.
//!
//! ```rust
//! use hxkit_render::prelude::*;
//!
//! let page = Component::from_template("page.html")
//!     .fs(EmbeddedSource::from_entries(&[("page.html", "{{ data.n }}")]))
//!     .add_data("n", 7);
//! let html = page.render(&RenderContext::new())?;
//! assert_eq!(html.as_str(), "7");
//! # Ok::<(), RenderError>(())
//! ```

pub use crate::{Component, DataMap, EmbeddedSource, Html, RenderContext, RenderError};
