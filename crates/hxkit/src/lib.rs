//! # hxkit
//!
//! Server-side helpers for HTMX applications:
//!
//! - composable template components with layered data and a shared template
//!   cache (re-exported from `hxkit-render`)
//! - HTMX request and response headers (re-exported from `hxkit-headers`)
//! - [`render_for_request`], which picks between a fragment and a full page
//!   based on the request headers
//!
//! Nothing here depends on a web framework. Handlers pass in the request's
//! `http::Uri` and `http::HeaderMap` and get back markup and headers.

mod error;
pub mod prelude;
mod request;

pub use error::Error;
pub use request::{
    render_for_request, request_context, respond, Rendered, CTX_CURRENT_URL, CTX_PARTIAL,
    CTX_TARGET, CTX_TRIGGER, CTX_TRIGGER_NAME,
};

// Rendering (from hxkit-render)
pub use hxkit_render::{cache, component, engine, source};
pub use hxkit_render::{
    add_default_function, base_name, clear_default_functions, default_functions, global_cache,
    set_template_cache_enabled, template_cache_enabled, template_function, CacheKey, CacheStats,
    CompiledTemplate, Component, DataMap, DirSource, EmbeddedSource, Envelope, EnvironmentSetup,
    FunctionMap, Html, MemoryCache, MiniJinjaEngine, MiniJinjaTemplate, NoCache, RenderContext,
    RenderError, TemplateCache, TemplateEngine, TemplateSource, Value, TEMPLATE_CACHE_ENV,
};

// Protocol headers (from hxkit-headers)
pub use hxkit_headers::names;
pub use hxkit_headers::{
    is_boosted_request, is_htmx_request, HeaderError, HistoryUpdate, HxRequestHeaders, HxResponse,
    Location, ScrollPosition, Swap, SwapStyle, Trigger, TriggerTiming,
};
