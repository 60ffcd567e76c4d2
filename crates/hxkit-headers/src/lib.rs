//! HTMX request and response headers.
//!
//! Reading what HTMX sent:
//!
//! ```rust
//! use http::{HeaderMap, HeaderValue};
//! use hxkit_headers::HxRequestHeaders;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("hx-request", HeaderValue::from_static("true"));
//! assert!(HxRequestHeaders::from_headers(&headers).is_partial());
//! ```
//!
//! Telling HTMX what to do with the response is done with [`HxResponse`],
//! [`Swap`] and [`Trigger`]. This crate works on plain `http` types and does
//! not depend on any web framework.

mod error;
pub mod names;
mod request;
mod response;
mod swap;
mod trigger;

pub use error::HeaderError;
pub use request::{is_boosted_request, is_htmx_request, HxRequestHeaders};
pub use response::{HistoryUpdate, HxResponse, Location};
pub use swap::{ScrollPosition, Swap, SwapStyle};
pub use trigger::{Trigger, TriggerTiming};
