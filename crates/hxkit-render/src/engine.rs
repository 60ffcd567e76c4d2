//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! component tree and the library that actually parses and executes
//! templates. The default implementation is [`MiniJinjaEngine`].
//!
//! An engine works in two steps so that the expensive one can be cached:
//!
//! 1. [`compile`](TemplateEngine::compile) loads every identifier of a
//!    component's template set from a [`TemplateSource`] and produces an
//!    opaque [`CompiledTemplate`].
//! 2. [`execute`](TemplateEngine::execute) runs a compiled template against
//!    an [`Envelope`].
//!
//! Compiled templates are stored type-erased so that one cache can serve
//! components using different engines. An engine handed a compiled template
//! of the wrong type reports [`RenderError::CacheType`].
//!
//! # The envelope
//!
//! Templates see these top-level names:
//!
//! | Name | Content |
//! |------|---------|
//! | `ctx` | the [`RenderContext`] extras |
//! | `data` | the component's local data |
//! | `global` | data shared down the tree |
//! | `partials` | rendered child components, by slot name |
//! | `url` | `none`, or a map with `href`, `path`, `query`, `host` |
//!
//! Template functions are visible at the top level under their own names.
//! An envelope name shadows a function of the same name.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Uri;
use minijinja::{Environment, ErrorKind, Value};

use crate::component::DataMap;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::functions::FunctionMap;
use crate::source::TemplateSource;

/// A compiled template set, as produced by [`TemplateEngine::compile`].
pub type CompiledTemplate = Arc<dyn Any + Send + Sync>;

/// Envelope key for the render context.
pub const ENVELOPE_CTX: &str = "ctx";
/// Envelope key for local data.
pub const ENVELOPE_DATA: &str = "data";
/// Envelope key for global data.
pub const ENVELOPE_GLOBAL: &str = "global";
/// Envelope key for rendered partials.
pub const ENVELOPE_PARTIALS: &str = "partials";
/// Envelope key for the source URL.
pub const ENVELOPE_URL: &str = "url";

/// Everything a template can read while it executes.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    pub ctx: &'a RenderContext,
    pub data: &'a DataMap,
    pub global: &'a DataMap,
    pub partials: &'a DataMap,
    pub url: Option<&'a Uri>,
}

impl Envelope<'_> {
    /// Builds the top-level template context: functions first, then the
    /// envelope names on top.
    pub fn to_value(&self, functions: &FunctionMap) -> Value {
        let mut root: BTreeMap<String, Value> = functions.clone();
        root.insert(ENVELOPE_CTX.into(), self.ctx.to_value());
        root.insert(ENVELOPE_DATA.into(), map_value(self.data));
        root.insert(ENVELOPE_GLOBAL.into(), map_value(self.global));
        root.insert(ENVELOPE_PARTIALS.into(), map_value(self.partials));
        root.insert(ENVELOPE_URL.into(), url_value(self.url));
        Value::from_iter(root)
    }
}

fn map_value(map: &DataMap) -> Value {
    Value::from_iter(map.iter().map(|(k, v)| (k.clone(), v.clone())))
}

fn url_value(url: Option<&Uri>) -> Value {
    let Some(url) = url else {
        return Value::from(());
    };
    Value::from_iter([
        ("href", Value::from(url.to_string())),
        ("path", Value::from(url.path())),
        ("query", url.query().map(Value::from).unwrap_or_default()),
        ("host", url.host().map(Value::from).unwrap_or_default()),
    ])
}

/// A template engine that compiles template sets and executes them.
pub trait TemplateEngine: Send + Sync {
    /// Short identifier, part of every cache key so engines never share
    /// entries.
    fn name(&self) -> &'static str;

    /// Loads and parses `templates` from `source`.
    ///
    /// `root` is the name the entry template is registered under.
    /// `functions` is the complete effective registry for this render.
    fn compile(
        &self,
        root: &str,
        templates: &[String],
        functions: &FunctionMap,
        source: &dyn TemplateSource,
    ) -> Result<CompiledTemplate, RenderError>;

    /// Executes a compiled template.
    ///
    /// `functions` is the effective registry of the component being
    /// rendered, which may differ in implementation (not in names) from the
    /// one the template was compiled with.
    fn execute(
        &self,
        compiled: &CompiledTemplate,
        envelope: &Envelope<'_>,
        functions: &FunctionMap,
    ) -> Result<String, RenderError>;
}

/// Hook run on every fresh MiniJinja environment before templates are added.
pub type EnvironmentSetup = Arc<dyn Fn(&mut Environment<'static>) + Send + Sync>;

/// MiniJinja-based template engine.
///
/// Each identifier is registered under its base name (`"layout/page.html"`
/// becomes `"page.html"`) and, when different, under the full identifier, so
/// attached fragments can be included either way:
///
/// ```jinja
/// {% include "footer.html" %}
/// ```
///
/// Auto-escaping follows MiniJinja's default: on for `.html`, `.htm` and
/// `.xml` names.
///
/// # Example
///
/// ```rust
/// use hxkit_render::{Component, EmbeddedSource, MiniJinjaEngine, NoCache, RenderContext};
/// use std::sync::Arc;
///
/// let engine = MiniJinjaEngine::new().with_setup(|env| {
///     env.add_filter("shout", |s: String| s.to_uppercase());
/// });
///
/// let page = Component::from_template("page.html")
///     .fs(EmbeddedSource::from_entries(&[("page.html", "{{ data.word | shout }}")]))
///     .engine(engine)
///     .cache(Arc::new(NoCache))
///     .add_data("word", "hi");
///
/// assert_eq!(page.render(&RenderContext::new()).unwrap().as_str(), "HI");
/// ```
#[derive(Clone, Default)]
pub struct MiniJinjaEngine {
    setup: Option<EnvironmentSetup>,
}

/// A template set compiled by [`MiniJinjaEngine`].
pub struct MiniJinjaTemplate {
    env: Environment<'static>,
    root: String,
    templates: Vec<String>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook that customizes each new environment, e.g. to add
    /// filters, tests or change the undefined behavior.
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut Environment<'static>) + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(setup));
        self
    }
}

impl fmt::Debug for MiniJinjaEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaEngine")
            .field("setup", &self.setup.is_some())
            .finish()
    }
}

impl fmt::Debug for MiniJinjaTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaTemplate")
            .field("root", &self.root)
            .field("templates", &self.templates)
            .finish()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn name(&self) -> &'static str {
        "minijinja"
    }

    fn compile(
        &self,
        root: &str,
        templates: &[String],
        functions: &FunctionMap,
        source: &dyn TemplateSource,
    ) -> Result<CompiledTemplate, RenderError> {
        let mut env = Environment::new();
        if let Some(setup) = &self.setup {
            setup(&mut env);
        }

        for name in templates {
            let content = source.load(name)?;
            let base = base_name(name);
            if base != name {
                env.add_template_owned(name.clone(), content.clone())
                    .map_err(|err| classify(err, templates, true))?;
            }
            env.add_template_owned(base.to_string(), content)
                .map_err(|err| classify(err, templates, true))?;
        }

        for (name, function) in functions {
            env.add_global(name.clone(), function.clone());
        }

        env.get_template(root)
            .map_err(|err| classify(err, templates, true))?;

        Ok(Arc::new(MiniJinjaTemplate {
            env,
            root: root.to_string(),
            templates: templates.to_vec(),
        }))
    }

    fn execute(
        &self,
        compiled: &CompiledTemplate,
        envelope: &Envelope<'_>,
        functions: &FunctionMap,
    ) -> Result<String, RenderError> {
        let compiled = (**compiled)
            .downcast_ref::<MiniJinjaTemplate>()
            .ok_or_else(|| RenderError::CacheType {
                key: self.name().to_string(),
            })?;

        let template = compiled
            .env
            .get_template(&compiled.root)
            .map_err(|err| classify(err, &compiled.templates, false))?;

        template
            .render(envelope.to_value(functions))
            .map_err(|err| classify(err, &compiled.templates, false))
    }
}

/// Returns the last `/`-separated segment of an identifier.
pub fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn classify(err: minijinja::Error, templates: &[String], compiling: bool) -> RenderError {
    match err.kind() {
        ErrorKind::TemplateNotFound => match err.detail() {
            Some(detail) => RenderError::not_found(detail),
            None => RenderError::not_found(err.to_string()),
        },
        ErrorKind::SyntaxError | ErrorKind::BadEscape => {
            RenderError::compile(templates, err.to_string())
        }
        _ if compiling => RenderError::compile(templates, err.to_string()),
        _ => RenderError::execution(templates, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::template_function;
    use crate::source::EmbeddedSource;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn empty_envelope<'a>(ctx: &'a RenderContext, empty: &'a DataMap) -> Envelope<'a> {
        Envelope {
            ctx,
            data: empty,
            global: empty,
            partials: empty,
            url: None,
        }
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("layout/page.html"), "page.html");
        assert_eq!(base_name("page.html"), "page.html");
    }

    #[test]
    fn test_compile_and_execute() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::from_entries(&[("page.html", "{{ data.title }}")]);
        let compiled = engine
            .compile("page.html", &names(&["page.html"]), &FunctionMap::new(), &source)
            .unwrap();

        let ctx = RenderContext::new();
        let mut data = DataMap::new();
        data.insert("title".into(), Value::from("Home"));
        let empty = DataMap::new();
        let envelope = Envelope {
            data: &data,
            ..empty_envelope(&ctx, &empty)
        };

        let output = engine
            .execute(&compiled, &envelope, &FunctionMap::new())
            .unwrap();
        assert_eq!(output, "Home");
    }

    #[test]
    fn test_attached_templates_resolve_by_base_name() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::from_entries(&[
            ("views/page.html", "[{% include 'footer.html' %}]"),
            ("layout/footer.html", "foot"),
        ]);
        let templates = names(&["views/page.html", "layout/footer.html"]);
        let compiled = engine
            .compile("page.html", &templates, &FunctionMap::new(), &source)
            .unwrap();

        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let output = engine
            .execute(&compiled, &empty_envelope(&ctx, &empty), &FunctionMap::new())
            .unwrap();
        assert_eq!(output, "[foot]");
    }

    #[test]
    fn test_syntax_error_is_compile_error() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::from_entries(&[("bad.html", "{{ unclosed")]);
        let result = engine.compile("bad.html", &names(&["bad.html"]), &FunctionMap::new(), &source);
        assert!(matches!(result, Err(RenderError::Compile { .. })));
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::new();
        let result = engine.compile("a.html", &names(&["a.html"]), &FunctionMap::new(), &source);
        assert!(matches!(result, Err(RenderError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_runtime_failure_is_execution_error() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::from_entries(&[("page.html", "{{ fail() }}")]);
        let mut functions = FunctionMap::new();
        functions.insert(
            "fail".into(),
            template_function(|| -> Result<String, minijinja::Error> {
                Err(minijinja::Error::new(ErrorKind::InvalidOperation, "boom"))
            }),
        );
        let compiled = engine
            .compile("page.html", &names(&["page.html"]), &functions, &source)
            .unwrap();

        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let result = engine.execute(&compiled, &empty_envelope(&ctx, &empty), &functions);
        assert!(matches!(result, Err(RenderError::Execution { .. })));
    }

    #[test]
    fn test_execute_uses_current_function_implementations() {
        let engine = MiniJinjaEngine::new();
        let source = EmbeddedSource::from_entries(&[("page.html", "{{ label() }}")]);
        let mut first = FunctionMap::new();
        first.insert("label".into(), template_function(|| "first"));
        let compiled = engine
            .compile("page.html", &names(&["page.html"]), &first, &source)
            .unwrap();

        let mut second = FunctionMap::new();
        second.insert("label".into(), template_function(|| "second"));

        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let output = engine
            .execute(&compiled, &empty_envelope(&ctx, &empty), &second)
            .unwrap();
        assert_eq!(output, "second");
    }

    #[test]
    fn test_wrong_compiled_type_is_cache_type_error() {
        let engine = MiniJinjaEngine::new();
        let bogus: CompiledTemplate = Arc::new(42u32);
        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let result = engine.execute(&bogus, &empty_envelope(&ctx, &empty), &FunctionMap::new());
        assert!(matches!(result, Err(RenderError::CacheType { .. })));
    }

    #[test]
    fn test_envelope_url_fields() {
        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let uri: Uri = "https://example.com/items?page=2".parse().unwrap();
        let envelope = Envelope {
            url: Some(&uri),
            ..empty_envelope(&ctx, &empty)
        };

        let env = Environment::new();
        let output = env
            .render_str(
                "{{ url.path }}|{{ url.query }}|{{ url.host }}",
                envelope.to_value(&FunctionMap::new()),
            )
            .unwrap();
        assert_eq!(output, "/items|page=2|example.com");
    }

    #[test]
    fn test_envelope_names_shadow_functions() {
        let ctx = RenderContext::new();
        let empty = DataMap::new();
        let mut functions = FunctionMap::new();
        functions.insert("data".into(), template_function(|| "fn"));

        let value = empty_envelope(&ctx, &empty).to_value(&functions);
        let env = Environment::new();
        let output = env
            .render_str("{{ data is mapping }}", value)
            .unwrap();
        assert_eq!(output, "true");
    }
}
