//! Error type for request-aware rendering.

use hxkit_headers::HeaderError;
use hxkit_render::RenderError;

/// Errors from [`crate::respond`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rendering the component tree failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A response header value was invalid.
    #[error(transparent)]
    Header(#[from] HeaderError),
}
