//! HTMX response headers.
//!
//! [`HxResponse`] collects the headers a handler wants to send back and
//! writes them into an `http::HeaderMap` with [`HxResponse::apply`].
//! Values are validated when applied, so a builder can be assembled freely
//! and fail in one place.
//!
//! ```rust
//! use http::HeaderMap;
//! use hxkit_headers::{HxResponse, Swap, SwapStyle, Trigger};
//!
//! let mut headers = HeaderMap::new();
//! HxResponse::new()
//!     .retarget("#errors")
//!     .reswap(Swap::new(SwapStyle::OuterHtml))
//!     .trigger(Trigger::new().event("validation-failed"))
//!     .apply(&mut headers)?;
//!
//! assert_eq!(headers["hx-retarget"], "#errors");
//! assert_eq!(headers["hx-reswap"], "outerHTML");
//! assert_eq!(headers["hx-trigger"], "validation-failed");
//! # Ok::<(), hxkit_headers::HeaderError>(())
//! ```

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::HeaderError;
use crate::names;
use crate::swap::Swap;
use crate::trigger::Trigger;

/// A client-side navigation target for `HX-Location`.
///
/// Only `path` is required; the rest map to the options of
/// `htmx.ajax()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<serde_json::Value>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target = Some(selector.into());
        self
    }

    #[must_use]
    pub fn swap(mut self, swap: impl Into<Swap>) -> Self {
        self.swap = Some(swap.into().to_string());
        self
    }

    #[must_use]
    pub fn select(mut self, selector: impl Into<String>) -> Self {
        self.select = Some(selector.into());
        self
    }

    /// A bare path renders as plain text, anything richer as JSON.
    fn header_value(&self) -> Result<String, HeaderError> {
        if *self == Location::new(self.path.clone()) {
            return Ok(self.path.clone());
        }
        Ok(serde_json::to_string(self)?)
    }
}

/// Value of `HX-Push-Url` and `HX-Replace-Url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// Put this URL in the location bar.
    Url(String),
    /// Leave the history untouched (`false`).
    Disabled,
}

impl HistoryUpdate {
    fn as_str(&self) -> &str {
        match self {
            HistoryUpdate::Url(url) => url,
            HistoryUpdate::Disabled => "false",
        }
    }
}

/// Builder for HTMX response headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HxResponse {
    location: Option<Location>,
    push_url: Option<HistoryUpdate>,
    redirect: Option<String>,
    refresh: bool,
    replace_url: Option<HistoryUpdate>,
    reswap: Option<Swap>,
    retarget: Option<String>,
    reselect: Option<String>,
    triggers: Vec<Trigger>,
}

impl HxResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client-side redirect without a full page reload (`HX-Location`).
    #[must_use]
    pub fn location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Push a URL onto the browser history (`HX-Push-Url`).
    #[must_use]
    pub fn push_url(mut self, url: impl Into<String>) -> Self {
        self.push_url = Some(HistoryUpdate::Url(url.into()));
        self
    }

    /// Prevent the history update an `hx-push-url` attribute asked for.
    #[must_use]
    pub fn disable_push_url(mut self) -> Self {
        self.push_url = Some(HistoryUpdate::Disabled);
        self
    }

    /// Full page redirect (`HX-Redirect`).
    #[must_use]
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(url.into());
        self
    }

    /// Full page refresh (`HX-Refresh: true`).
    #[must_use]
    pub fn refresh(mut self) -> Self {
        self.refresh = true;
        self
    }

    /// Replace the current URL in the location bar (`HX-Replace-Url`).
    #[must_use]
    pub fn replace_url(mut self, url: impl Into<String>) -> Self {
        self.replace_url = Some(HistoryUpdate::Url(url.into()));
        self
    }

    #[must_use]
    pub fn disable_replace_url(mut self) -> Self {
        self.replace_url = Some(HistoryUpdate::Disabled);
        self
    }

    /// Override how the response is swapped (`HX-Reswap`).
    #[must_use]
    pub fn reswap(mut self, swap: impl Into<Swap>) -> Self {
        self.reswap = Some(swap.into());
        self
    }

    /// Override the target element (`HX-Retarget`).
    #[must_use]
    pub fn retarget(mut self, selector: impl Into<String>) -> Self {
        self.retarget = Some(selector.into());
        self
    }

    /// Swap only part of the response (`HX-Reselect`).
    #[must_use]
    pub fn reselect(mut self, selector: impl Into<String>) -> Self {
        self.reselect = Some(selector.into());
        self
    }

    /// Adds client-side events. A later trigger with the same timing
    /// replaces an earlier one.
    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers
            .retain(|existing| existing.get_timing() != trigger.get_timing());
        self.triggers.push(trigger);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == HxResponse::default()
    }

    /// Writes every configured header into `headers`, replacing existing
    /// values of the same names.
    ///
    /// Nothing is written if any value is invalid.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), HeaderError> {
        let entries = self.entries()?;
        tracing::trace!(count = entries.len(), "applying htmx response headers");
        for (name, value) in entries {
            headers.insert(name, value);
        }
        Ok(())
    }

    /// The configured headers as validated name/value pairs.
    pub fn entries(&self) -> Result<Vec<(HeaderName, HeaderValue)>, HeaderError> {
        let mut entries = Vec::new();

        if let Some(location) = &self.location {
            entries.push(entry("HX-Location", names::HX_LOCATION, location.header_value()?)?);
        }
        if let Some(push) = &self.push_url {
            entries.push(entry("HX-Push-Url", names::HX_PUSH_URL, push.as_str())?);
        }
        if let Some(url) = &self.redirect {
            entries.push(entry("HX-Redirect", names::HX_REDIRECT, url)?);
        }
        if self.refresh {
            entries.push((names::HX_REFRESH, HeaderValue::from_static("true")));
        }
        if let Some(replace) = &self.replace_url {
            entries.push(entry("HX-Replace-Url", names::HX_REPLACE_URL, replace.as_str())?);
        }
        if let Some(swap) = &self.reswap {
            entries.push(entry("HX-Reswap", names::HX_RESWAP, swap.to_string())?);
        }
        if let Some(selector) = &self.retarget {
            entries.push(entry("HX-Retarget", names::HX_RETARGET, selector)?);
        }
        if let Some(selector) = &self.reselect {
            entries.push(entry("HX-Reselect", names::HX_RESELECT, selector)?);
        }
        for trigger in self.triggers.iter().filter(|t| !t.is_empty()) {
            let name = trigger.get_timing().header_name();
            entries.push(entry("HX-Trigger", name, trigger.header_value()?)?);
        }

        Ok(entries)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::new(path)
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::new(path)
    }
}

fn entry(
    label: &'static str,
    name: HeaderName,
    value: impl AsRef<str>,
) -> Result<(HeaderName, HeaderValue), HeaderError> {
    let value = value.as_ref();
    let value = HeaderValue::from_str(value).map_err(|_| HeaderError::invalid(label, value))?;
    Ok((name, value))
}
