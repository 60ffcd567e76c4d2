//! HTMX request headers.
//!
//! HTMX marks every request it sends with `HX-Request: true` and adds
//! headers describing what triggered it and where the response will land.
//! [`HxRequestHeaders`] reads them all from an `http::HeaderMap`:
//!
//! ```rust
//! use http::{HeaderMap, HeaderValue};
//! use hxkit_headers::HxRequestHeaders;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("hx-request", HeaderValue::from_static("true"));
//! headers.insert("hx-target", HeaderValue::from_static("content"));
//!
//! let hx = HxRequestHeaders::from_headers(&headers);
//! assert!(hx.is_htmx());
//! assert!(hx.is_partial());
//! assert_eq!(hx.target.as_deref(), Some("content"));
//! ```

use http::{HeaderMap, HeaderName};

use crate::names;

/// The HTMX headers of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HxRequestHeaders {
    /// `HX-Request`: the request was issued by HTMX.
    pub request: bool,
    /// `HX-Boosted`: issued by an element using `hx-boost`.
    pub boosted: bool,
    /// `HX-Current-URL`: the browser's current URL.
    pub current_url: Option<String>,
    /// `HX-History-Restore-Request`: a history restore after a cache miss.
    pub history_restore: bool,
    /// `HX-Prompt`: the user's answer to an `hx-prompt`.
    pub prompt: Option<String>,
    /// `HX-Target`: id of the target element.
    pub target: Option<String>,
    /// `HX-Trigger`: id of the triggering element.
    pub trigger: Option<String>,
    /// `HX-Trigger-Name`: name of the triggering element.
    pub trigger_name: Option<String>,
}

impl HxRequestHeaders {
    /// Reads the HTMX headers. Missing or non-UTF-8 values are treated as
    /// absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            request: flag(headers, &names::HX_REQUEST),
            boosted: flag(headers, &names::HX_BOOSTED),
            current_url: text(headers, &names::HX_CURRENT_URL),
            history_restore: flag(headers, &names::HX_HISTORY_RESTORE_REQUEST),
            prompt: text(headers, &names::HX_PROMPT),
            target: text(headers, &names::HX_TARGET),
            trigger: text(headers, &names::HX_TRIGGER),
            trigger_name: text(headers, &names::HX_TRIGGER_NAME),
        }
    }

    pub fn is_htmx(&self) -> bool {
        self.request
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    /// True when the response should be a fragment rather than a full page:
    /// an HTMX request that is neither boosted nor a history restore.
    pub fn is_partial(&self) -> bool {
        self.request && !self.boosted && !self.history_restore
    }
}

/// Returns true if the request carries `HX-Request: true`.
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    flag(headers, &names::HX_REQUEST)
}

/// Returns true if the request carries `HX-Boosted: true`.
#[must_use]
pub fn is_boosted_request(headers: &HeaderMap) -> bool {
    flag(headers, &names::HX_BOOSTED)
}

fn flag(headers: &HeaderMap, name: &HeaderName) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

fn text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_plain_request() {
        let headers = HeaderMap::new();
        let hx = HxRequestHeaders::from_headers(&headers);
        assert_eq!(hx, HxRequestHeaders::default());
        assert!(!hx.is_htmx());
        assert!(!hx.is_partial());
    }

    #[test]
    fn test_flags_require_true() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("false"));
        assert!(!is_htmx_request(&headers));

        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx_request(&headers));
    }

    #[test]
    fn test_boosted_is_not_partial() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        headers.insert("hx-boosted", HeaderValue::from_static("true"));

        let hx = HxRequestHeaders::from_headers(&headers);
        assert!(hx.is_htmx());
        assert!(hx.is_boosted());
        assert!(is_boosted_request(&headers));
        assert!(!hx.is_partial());
    }

    #[test]
    fn test_history_restore_is_not_partial() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        headers.insert(
            "hx-history-restore-request",
            HeaderValue::from_static("true"),
        );
        assert!(!HxRequestHeaders::from_headers(&headers).is_partial());
    }

    #[test]
    fn test_text_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        headers.insert(
            "hx-current-url",
            HeaderValue::from_static("https://example.com/items"),
        );
        headers.insert("hx-prompt", HeaderValue::from_static("yes"));
        headers.insert("hx-trigger", HeaderValue::from_static("save-btn"));
        headers.insert("hx-trigger-name", HeaderValue::from_static("save"));

        let hx = HxRequestHeaders::from_headers(&headers);
        assert_eq!(
            hx.current_url.as_deref(),
            Some("https://example.com/items")
        );
        assert_eq!(hx.prompt.as_deref(), Some("yes"));
        assert_eq!(hx.trigger.as_deref(), Some("save-btn"));
        assert_eq!(hx.trigger_name.as_deref(), Some("save"));
        assert!(hx.target.is_none());
    }

    #[test]
    fn test_non_utf8_value_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-target", HeaderValue::from_bytes(&[0xff]).unwrap());
        assert!(HxRequestHeaders::from_headers(&headers).target.is_none());
    }
}
