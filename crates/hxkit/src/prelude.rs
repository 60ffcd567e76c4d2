//! One-line import for handlers.
//!
//! ```rust
//! use hxkit::prelude::*;
//! ```

pub use crate::{render_for_request, respond, Rendered};
pub use hxkit_headers::{HxRequestHeaders, HxResponse, Swap, SwapStyle, Trigger};
pub use hxkit_render::{Component, EmbeddedSource, Html, RenderContext, RenderError};
