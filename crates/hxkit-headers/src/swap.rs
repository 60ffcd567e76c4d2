//! Swap modes and modifiers.
//!
//! A [`Swap`] describes how HTMX puts a response into the page: a
//! [`SwapStyle`] followed by optional modifiers. Its `Display` form is the
//! string used both by the `hx-swap` attribute and the `HX-Reswap` response
//! header.
//!
//! ```rust
//! use std::time::Duration;
//! use hxkit_headers::{ScrollPosition, Swap, SwapStyle};
//!
//! let swap = Swap::new(SwapStyle::OuterHtml)
//!     .transition(true)
//!     .settle(Duration::from_millis(250))
//!     .scroll(ScrollPosition::Top);
//!
//! assert_eq!(swap.to_string(), "outerHTML transition:true settle:250ms scroll:top");
//! ```

use std::fmt;
use std::time::Duration;

/// Where the response content goes relative to the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SwapStyle {
    #[default]
    InnerHtml,
    OuterHtml,
    TextContent,
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
    Delete,
    None,
}

impl SwapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStyle::InnerHtml => "innerHTML",
            SwapStyle::OuterHtml => "outerHTML",
            SwapStyle::TextContent => "textContent",
            SwapStyle::BeforeBegin => "beforebegin",
            SwapStyle::AfterBegin => "afterbegin",
            SwapStyle::BeforeEnd => "beforeend",
            SwapStyle::AfterEnd => "afterend",
            SwapStyle::Delete => "delete",
            SwapStyle::None => "none",
        }
    }
}

impl fmt::Display for SwapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollPosition {
    Top,
    Bottom,
}

impl ScrollPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollPosition::Top => "top",
            ScrollPosition::Bottom => "bottom",
        }
    }
}

/// A scroll or show modifier, optionally aimed at another element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScrollTarget {
    selector: Option<String>,
    position: ScrollPosition,
}

impl fmt::Display for ScrollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Some(selector) => write!(f, "{}:{}", selector, self.position.as_str()),
            None => f.write_str(self.position.as_str()),
        }
    }
}

/// A swap style plus modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Swap {
    style: SwapStyle,
    transition: Option<bool>,
    swap_delay: Option<Duration>,
    settle_delay: Option<Duration>,
    ignore_title: Option<bool>,
    scroll: Option<ScrollTarget>,
    show: Option<ScrollTarget>,
    focus_scroll: Option<bool>,
}

impl Swap {
    pub fn new(style: SwapStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn style(&self) -> SwapStyle {
        self.style
    }

    /// Use the View Transitions API for this swap.
    #[must_use]
    pub fn transition(mut self, enabled: bool) -> Self {
        self.transition = Some(enabled);
        self
    }

    /// Delay between receiving the response and swapping it in.
    #[must_use]
    pub fn swap(mut self, delay: Duration) -> Self {
        self.swap_delay = Some(delay);
        self
    }

    /// Delay between the swap and the settle step.
    #[must_use]
    pub fn settle(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// Keep the page title even if the response contains a `<title>`.
    #[must_use]
    pub fn ignore_title(mut self, ignore: bool) -> Self {
        self.ignore_title = Some(ignore);
        self
    }

    /// Scroll the target element.
    #[must_use]
    pub fn scroll(mut self, position: ScrollPosition) -> Self {
        self.scroll = Some(ScrollTarget {
            selector: None,
            position,
        });
        self
    }

    /// Scroll the element matching `selector` instead of the target.
    #[must_use]
    pub fn scroll_to(mut self, selector: impl Into<String>, position: ScrollPosition) -> Self {
        self.scroll = Some(ScrollTarget {
            selector: Some(selector.into()),
            position,
        });
        self
    }

    /// Scroll the viewport so the target is shown.
    #[must_use]
    pub fn show(mut self, position: ScrollPosition) -> Self {
        self.show = Some(ScrollTarget {
            selector: None,
            position,
        });
        self
    }

    /// Scroll the viewport so the element matching `selector` is shown.
    #[must_use]
    pub fn show_element(mut self, selector: impl Into<String>, position: ScrollPosition) -> Self {
        self.show = Some(ScrollTarget {
            selector: Some(selector.into()),
            position,
        });
        self
    }

    /// Scroll focused inputs into view after the swap.
    #[must_use]
    pub fn focus_scroll(mut self, enabled: bool) -> Self {
        self.focus_scroll = Some(enabled);
        self
    }
}

impl From<SwapStyle> for Swap {
    fn from(style: SwapStyle) -> Self {
        Swap::new(style)
    }
}

impl fmt::Display for Swap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style.as_str())?;
        if let Some(enabled) = self.transition {
            write!(f, " transition:{enabled}")?;
        }
        if let Some(delay) = self.swap_delay {
            write!(f, " swap:{}", format_delay(delay))?;
        }
        if let Some(delay) = self.settle_delay {
            write!(f, " settle:{}", format_delay(delay))?;
        }
        if let Some(ignore) = self.ignore_title {
            write!(f, " ignoreTitle:{ignore}")?;
        }
        if let Some(scroll) = &self.scroll {
            write!(f, " scroll:{scroll}")?;
        }
        if let Some(show) = &self.show {
            write!(f, " show:{show}")?;
        }
        if let Some(enabled) = self.focus_scroll {
            write!(f, " focus-scroll:{enabled}")?;
        }
        Ok(())
    }
}

/// Whole seconds render as `2s`, anything else in milliseconds.
fn format_delay(delay: Duration) -> String {
    let millis = delay.as_millis();
    if millis % 1000 == 0 && millis > 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{millis}ms")
    }
}
