//! Client-side events triggered by a response.
//!
//! A [`Trigger`] collects events for one of the three `HX-Trigger` headers.
//! Plain events render as a comma-separated list; as soon as one event
//! carries detail the whole header switches to a JSON object mapping event
//! names to their detail (`null` for plain events).

use http::HeaderName;
use serde::Serialize;

use crate::error::HeaderError;
use crate::names;

/// When HTMX fires the events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriggerTiming {
    /// As soon as the response is received (`HX-Trigger`).
    #[default]
    Immediate,
    /// After the settle step (`HX-Trigger-After-Settle`).
    AfterSettle,
    /// After the swap step (`HX-Trigger-After-Swap`).
    AfterSwap,
}

impl TriggerTiming {
    pub fn header_name(&self) -> HeaderName {
        match self {
            TriggerTiming::Immediate => names::HX_TRIGGER,
            TriggerTiming::AfterSettle => names::HX_TRIGGER_AFTER_SETTLE,
            TriggerTiming::AfterSwap => names::HX_TRIGGER_AFTER_SWAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TriggerEvent {
    Plain(String),
    WithDetail(String, serde_json::Value),
}

impl TriggerEvent {
    fn name(&self) -> &str {
        match self {
            TriggerEvent::Plain(name) | TriggerEvent::WithDetail(name, _) => name,
        }
    }
}

/// Events for one trigger header.
///
/// ```rust
/// use hxkit_headers::Trigger;
///
/// let plain = Trigger::new().event("saved").event("refresh");
/// assert_eq!(plain.header_value().unwrap(), "saved, refresh");
///
/// let detailed = Trigger::new()
///     .event("saved")
///     .event_with_detail("notice", &serde_json::json!({"level": "info"}))
///     .unwrap();
/// assert_eq!(
///     detailed.header_value().unwrap(),
///     r#"{"notice":{"level":"info"},"saved":null}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trigger {
    events: Vec<TriggerEvent>,
    timing: TriggerTiming,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timing(mut self, timing: TriggerTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn get_timing(&self) -> TriggerTiming {
        self.timing
    }

    /// Adds an event without detail.
    #[must_use]
    pub fn event(mut self, name: impl Into<String>) -> Self {
        self.events.push(TriggerEvent::Plain(name.into()));
        self
    }

    /// Adds an event with a detail object.
    pub fn event_with_detail<T: Serialize>(
        mut self,
        name: impl Into<String>,
        detail: &T,
    ) -> Result<Self, HeaderError> {
        let detail = serde_json::to_value(detail)?;
        self.events
            .push(TriggerEvent::WithDetail(name.into(), detail));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event names in the order they were added.
    pub fn event_names(&self) -> Vec<&str> {
        self.events.iter().map(TriggerEvent::name).collect()
    }

    /// Renders the header value.
    pub fn header_value(&self) -> Result<String, HeaderError> {
        let has_detail = self
            .events
            .iter()
            .any(|e| matches!(e, TriggerEvent::WithDetail(..)));

        if !has_detail {
            return Ok(self.event_names().join(", "));
        }

        let mut map = serde_json::Map::new();
        for event in &self.events {
            match event {
                TriggerEvent::Plain(name) => {
                    map.insert(name.clone(), serde_json::Value::Null);
                }
                TriggerEvent::WithDetail(name, detail) => {
                    map.insert(name.clone(), detail.clone());
                }
            }
        }
        Ok(serde_json::to_string(&serde_json::Value::Object(map))?)
    }
}
