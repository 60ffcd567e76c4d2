//! HTMX header names.
//!
//! Names are lowercase, as `http` stores them; lookups are
//! case-insensitive either way.

use http::HeaderName;

// Request headers
pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_BOOSTED: HeaderName = HeaderName::from_static("hx-boosted");
pub const HX_CURRENT_URL: HeaderName = HeaderName::from_static("hx-current-url");
pub const HX_HISTORY_RESTORE_REQUEST: HeaderName =
    HeaderName::from_static("hx-history-restore-request");
pub const HX_PROMPT: HeaderName = HeaderName::from_static("hx-prompt");
pub const HX_TARGET: HeaderName = HeaderName::from_static("hx-target");
pub const HX_TRIGGER_NAME: HeaderName = HeaderName::from_static("hx-trigger-name");

// Shared by requests (id of the triggering element) and responses (events)
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

// Response headers
pub const HX_LOCATION: HeaderName = HeaderName::from_static("hx-location");
pub const HX_PUSH_URL: HeaderName = HeaderName::from_static("hx-push-url");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_REFRESH: HeaderName = HeaderName::from_static("hx-refresh");
pub const HX_REPLACE_URL: HeaderName = HeaderName::from_static("hx-replace-url");
pub const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");
pub const HX_RETARGET: HeaderName = HeaderName::from_static("hx-retarget");
pub const HX_RESELECT: HeaderName = HeaderName::from_static("hx-reselect");
pub const HX_TRIGGER_AFTER_SETTLE: HeaderName =
    HeaderName::from_static("hx-trigger-after-settle");
pub const HX_TRIGGER_AFTER_SWAP: HeaderName = HeaderName::from_static("hx-trigger-after-swap");
