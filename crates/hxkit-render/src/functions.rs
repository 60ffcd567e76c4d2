//! Template function registries.
//!
//! Functions are stored as callable template values so that components can
//! hold functions of any signature side by side. At render time a component's
//! own registry is layered over the process-wide defaults (see
//! [`crate::add_default_function`]); on a name collision the component's
//! function wins.

use std::collections::BTreeMap;

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use minijinja::Value;

use crate::defaults;

/// Name to callable map. Ordered so that name sets iterate deterministically.
pub type FunctionMap = BTreeMap<String, Value>;

/// Wraps a Rust function or closure as a callable template value.
///
/// ```rust
/// use hxkit_render::template_function;
///
/// let shout = template_function(|s: String| s.to_uppercase());
/// let env = minijinja::Environment::new();
/// let out = env
///     .render_str("{{ shout('hi') }}", minijinja::context! { shout => shout })
///     .unwrap();
/// assert_eq!(out, "HI");
/// ```
pub fn template_function<F, Rv, Args>(f: F) -> Value
where
    F: Function<Rv, Args>,
    Rv: FunctionResult,
    Args: for<'a> FunctionArgs<'a>,
{
    Value::from_function(f)
}

/// Returns the defaults overridden by `local`.
pub(crate) fn effective_functions(local: &FunctionMap) -> FunctionMap {
    let mut functions = defaults::default_functions();
    for (name, function) in local {
        functions.insert(name.clone(), function.clone());
    }
    functions
}
