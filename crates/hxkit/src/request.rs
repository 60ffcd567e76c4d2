//! Rendering driven by the incoming request.
//!
//! The same component serves both kinds of HTMX traffic: a partial request
//! (an `hx-get` swapping one element) gets just the component's own markup,
//! while a normal navigation, a boosted link or a history restore gets the
//! full page built by walking the component's wrap chain.

use http::header::{CONTENT_TYPE, VARY};
use http::{HeaderMap, HeaderValue, Uri};
use hxkit_headers::{HxRequestHeaders, HxResponse};
use hxkit_render::{Component, Html, RenderContext, RenderError};

use crate::error::Error;

/// `ctx` key holding `"true"` when only a fragment is rendered.
pub const CTX_PARTIAL: &str = "hx_partial";
/// `ctx` key holding the `HX-Target` element id.
pub const CTX_TARGET: &str = "hx_target";
/// `ctx` key holding the `HX-Trigger` element id.
pub const CTX_TRIGGER: &str = "hx_trigger";
/// `ctx` key holding the `HX-Trigger-Name` element name.
pub const CTX_TRIGGER_NAME: &str = "hx_trigger_name";
/// `ctx` key holding the browser's `HX-Current-URL`.
pub const CTX_CURRENT_URL: &str = "hx_current_url";

/// Builds the render context for a request, exposing its HTMX headers to
/// templates under the `hx_*` keys.
pub fn request_context(hx: &HxRequestHeaders) -> RenderContext {
    let partial = if hx.is_partial() { "true" } else { "false" };
    let mut ctx = RenderContext::new().with_extra(CTX_PARTIAL, partial);

    let optional = [
        (CTX_TARGET, &hx.target),
        (CTX_TRIGGER, &hx.trigger),
        (CTX_TRIGGER_NAME, &hx.trigger_name),
        (CTX_CURRENT_URL, &hx.current_url),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            ctx = ctx.with_extra(key, value.as_str());
        }
    }
    ctx
}

/// Renders `component` for a request.
///
/// The request URI becomes the component tree's source URL. Partial HTMX
/// requests render the component alone; every other request renders the
/// outermost component of its wrap chain.
///
/// ```rust
/// use http::{HeaderMap, HeaderValue, Uri};
/// use hxkit::{render_for_request, Component, EmbeddedSource};
///
/// let source = EmbeddedSource::from_entries(&[
///     ("layout.html", "<html>{{ partials.body }}</html>"),
///     ("list.html", "<ul>{{ ctx.hx_partial }}</ul>"),
/// ]);
/// let layout = Component::from_template("layout.html").fs(source.clone());
/// let list = Component::from_template("list.html")
///     .fs(source)
///     .wrap(&layout, "body");
/// let uri: Uri = "/items".parse().unwrap();
///
/// let full = render_for_request(&list, &uri, &HeaderMap::new()).unwrap();
/// assert_eq!(full.as_str(), "<html><ul>false</ul></html>");
///
/// let mut headers = HeaderMap::new();
/// headers.insert("hx-request", HeaderValue::from_static("true"));
/// let fragment = render_for_request(&list, &uri, &headers).unwrap();
/// assert_eq!(fragment.as_str(), "<ul>true</ul>");
/// ```
pub fn render_for_request(
    component: &Component,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Html, RenderError> {
    let hx = HxRequestHeaders::from_headers(headers);
    let ctx = request_context(&hx);

    let target = if hx.is_partial() {
        tracing::debug!(path = uri.path(), target = ?hx.target, "rendering htmx fragment");
        component.clone()
    } else {
        tracing::debug!(path = uri.path(), boosted = hx.boosted, "rendering full page");
        component.resolve_root()?
    };

    target.set_url(uri.clone());
    target.render(&ctx)
}

/// Rendered markup plus the response headers to send with it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: Html,
    pub headers: HeaderMap,
}

/// Renders like [`render_for_request`] and builds the response headers.
///
/// The headers carry `Content-Type: text/html; charset=utf-8`,
/// `Vary: HX-Request` (the body depends on it) and everything configured on
/// `response`.
pub fn respond(
    component: &Component,
    uri: &Uri,
    headers: &HeaderMap,
    response: &HxResponse,
) -> Result<Rendered, Error> {
    let html = render_for_request(component, uri, headers)?;

    let mut out = HeaderMap::new();
    out.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    out.insert(VARY, HeaderValue::from_static("HX-Request"));
    response.apply(&mut out)?;

    Ok(Rendered { html, headers: out })
}
