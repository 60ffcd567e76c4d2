//! Process-wide rendering defaults.
//!
//! Two pieces of state are shared by every component in the process:
//!
//! - the default template function registry, layered under each component's
//!   own functions at render time
//! - the template cache switch
//!
//! # Template cache switch
//!
//! Caching is on unless the `HXKIT_TEMPLATE_CACHE` environment variable is set
//! to `0`, `false`, `off` or `no` when the switch is first read. Turn it off
//! during development to pick up template edits without restarting:
//!
//! ```rust
//! use hxkit_render::{set_template_cache_enabled, template_cache_enabled};
//!
//! set_template_cache_enabled(false);
//! assert!(!template_cache_enabled());
//! set_template_cache_enabled(true);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use once_cell::sync::Lazy;

use crate::functions::{template_function, FunctionMap};

/// Environment variable read once to seed the cache switch.
pub const TEMPLATE_CACHE_ENV: &str = "HXKIT_TEMPLATE_CACHE";

static TEMPLATE_CACHE_ENABLED: Lazy<AtomicBool> =
    Lazy::new(|| AtomicBool::new(cache_enabled_from_env()));

static DEFAULT_FUNCTIONS: Lazy<RwLock<FunctionMap>> = Lazy::new(|| RwLock::new(FunctionMap::new()));

fn cache_enabled_from_env() -> bool {
    match std::env::var(TEMPLATE_CACHE_ENV) {
        Ok(val) => !(val == "0"
            || val.eq_ignore_ascii_case("false")
            || val.eq_ignore_ascii_case("off")
            || val.eq_ignore_ascii_case("no")),
        Err(_) => true,
    }
}

/// Enables or disables template cache lookups for every component.
///
/// With the cache disabled every render recompiles its template set.
pub fn set_template_cache_enabled(enabled: bool) {
    TEMPLATE_CACHE_ENABLED.store(enabled, Ordering::SeqCst);
    tracing::debug!(enabled, "template cache switch changed");
}

/// Returns whether template cache lookups are enabled.
pub fn template_cache_enabled() -> bool {
    TEMPLATE_CACHE_ENABLED.load(Ordering::SeqCst)
}

/// Registers a function available to every component's templates.
///
/// A component function with the same name takes precedence.
pub fn add_default_function<F, Rv, Args>(name: impl Into<String>, f: F)
where
    F: Function<Rv, Args>,
    Rv: FunctionResult,
    Args: for<'a> FunctionArgs<'a>,
{
    let mut guard = DEFAULT_FUNCTIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    guard.insert(name.into(), template_function(f));
}

/// Returns a snapshot of the default function registry.
pub fn default_functions() -> FunctionMap {
    DEFAULT_FUNCTIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Removes every default function.
pub fn clear_default_functions() {
    DEFAULT_FUNCTIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
