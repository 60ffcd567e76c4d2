//! Composable HTML template components.
//!
//! `hxkit-render` renders trees of template *components*. Each component owns
//! a list of template identifiers plus data; components nest through named
//! slots, and a parent's template receives each child's rendered output as a
//! partial:
//!
//! ```rust
//! use hxkit_render::{Component, EmbeddedSource, RenderContext};
//!
//! let source = EmbeddedSource::from_entries(&[
//!     ("page.html", "<h1>{{ data.title }}</h1>{{ partials.nav }}"),
//!     ("nav.html", "<a>{{ data.title }}</a>"),
//! ]);
//!
//! let nav = Component::from_template("nav.html").fs(source.clone());
//! let page = Component::from_template("page.html")
//!     .fs(source)
//!     .add_data("title", "Home")
//!     .with(&nav, "nav");
//!
//! let html = page.render(&RenderContext::new()).unwrap();
//! assert_eq!(html.as_str(), "<h1>Home</h1><a>Home</a>");
//! ```
//!
//! Templates see five top-level names: `ctx`, `data`, `global`, `partials`
//! and `url` (see [`engine`] for details).
//!
//! ## Modules
//!
//! - [`component`]: the [`Component`] handle and its composition API
//! - [`engine`]: the [`TemplateEngine`] trait and [`MiniJinjaEngine`]
//! - [`cache`]: [`TemplateCache`], [`MemoryCache`] and cache keys
//! - [`source`]: where template text comes from
//!
//! ## Process-wide settings
//!
//! Default template functions and the cache switch are shared by every
//! component; see [`add_default_function`] and
//! [`set_template_cache_enabled`].

pub mod cache;
pub mod component;
mod context;
mod defaults;
pub mod engine;
mod error;
mod functions;
mod html;
pub mod prelude;
mod render;
pub mod source;

pub use cache::{global_cache, CacheKey, CacheStats, MemoryCache, NoCache, TemplateCache};
pub use component::{Component, DataMap};
pub use context::RenderContext;
pub use defaults::{
    add_default_function, clear_default_functions, default_functions,
    set_template_cache_enabled, template_cache_enabled, TEMPLATE_CACHE_ENV,
};
pub use engine::{
    base_name, CompiledTemplate, Envelope, EnvironmentSetup, MiniJinjaEngine, MiniJinjaTemplate,
    TemplateEngine,
};
pub use error::RenderError;
pub use functions::{template_function, FunctionMap};
pub use html::Html;
pub use source::{DirSource, EmbeddedSource, TemplateSource};

// Template value type used for data and functions.
pub use minijinja::Value;
