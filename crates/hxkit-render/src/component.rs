//! Components and their composition API.
//!
//! A [`Component`] is one node of a render tree: a list of template
//! identifiers plus the data, functions and child components needed to render
//! them. Components are built per request (or per render unit), configured
//! through chained calls and then rendered with [`Component::render`].
//!
//! # Handles
//!
//! `Component` is a handle. Cloning it is cheap and yields another handle to
//! the same node, which is how one node can be registered as a child of
//! several parents. Every composition method mutates the node and returns a
//! handle to it, so calls chain:
//!
//! ```rust
//! use hxkit_render::Component;
//!
//! let nav = Component::from_template("nav.html").add_data("active", "home");
//! let page = Component::from_template("page.html")
//!     .add_data("title", "Home")
//!     .add_global_data("user", "ada")
//!     .with(&nav, "nav")
//!     .attach("footer.html");
//!
//! assert_eq!(page.templates(), vec!["page.html", "footer.html"]);
//! assert_eq!(page.slots(), vec!["nav"]);
//! ```
//!
//! # Data scopes
//!
//! - local data (`data` in templates) belongs to one component
//! - global data (`global`) flows from a parent to all its descendants
//! - partials (`partials`) hold the rendered output of child components
//!
//! Before a child renders, its parent's local and global data are merged into
//! it without overwriting: a key the child already has keeps the child's
//! value.
//!
//! # Reuse
//!
//! [`Component::reset`] drops data, partials, children and the URL but keeps
//! templates and functions, so a pre-configured component can serve many
//! requests and keep hitting the same cache entry.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use http::Uri;
use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use minijinja::Value;
use serde::Serialize;

use crate::cache::{global_cache, TemplateCache};
use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::RenderError;
use crate::functions::{template_function, FunctionMap};
use crate::html::Html;
use crate::source::{DirSource, TemplateSource};

/// Key to value map used for every data scope.
pub type DataMap = BTreeMap<String, Value>;

/// Identity of a component node, stable for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ComponentId(usize);

pub(crate) struct ComponentState {
    pub(crate) templates: Vec<String>,
    pub(crate) data: DataMap,
    pub(crate) global: DataMap,
    pub(crate) partials: DataMap,
    pub(crate) children: BTreeMap<String, Component>,
    pub(crate) wrapper: Option<(Weak<Mutex<ComponentState>>, String)>,
    pub(crate) url: Option<Uri>,
    pub(crate) functions: FunctionMap,
    pub(crate) source: Arc<dyn TemplateSource>,
    pub(crate) engine: Arc<dyn TemplateEngine>,
    pub(crate) cache: Arc<dyn TemplateCache>,
}

/// A renderable node of a component tree.
#[derive(Clone)]
pub struct Component {
    inner: Arc<Mutex<ComponentState>>,
}

impl Component {
    /// Creates a component rendering the given template identifiers.
    ///
    /// The first identifier is the entry template; the others are available
    /// to it by name (for `include`, `extends` or `import`).
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = ComponentState {
            templates: templates.into_iter().map(Into::into).collect(),
            data: DataMap::new(),
            global: DataMap::new(),
            partials: DataMap::new(),
            children: BTreeMap::new(),
            wrapper: None,
            url: None,
            functions: FunctionMap::new(),
            source: Arc::new(DirSource::default()),
            engine: Arc::new(MiniJinjaEngine::new()),
            cache: global_cache(),
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Creates a component with a single template.
    pub fn from_template(name: impl Into<String>) -> Self {
        Self::new([name.into()])
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ComponentState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn id(&self) -> ComponentId {
        ComponentId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    fn handle(&self) -> Self {
        self.clone()
    }

    /// Returns true when both handles point at the same node.
    pub fn ptr_eq(&self, other: &Component) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------

    /// Marks this component as rendered inside `parent` at `slot`.
    ///
    /// This records a back-reference only; the parent does not own this
    /// component until the wrap chain is resolved by
    /// [`render_wrapped`](Self::render_wrapped). The caller keeps the parent
    /// alive.
    pub fn wrap(&self, parent: &Component, slot: impl Into<String>) -> Self {
        self.lock().wrapper = Some((Arc::downgrade(&parent.inner), slot.into()));
        self.handle()
    }

    /// Registers `child` to be rendered into `slot` before this component.
    ///
    /// If this component already has a source URL the child receives it
    /// immediately.
    pub fn with(&self, child: &Component, slot: impl Into<String>) -> Self {
        let url = self.lock().url.clone();
        if let Some(url) = url {
            child.set_url(url);
        }
        self.lock().children.insert(slot.into(), child.clone());
        self.handle()
    }

    /// Appends a template identifier without rendering it as a partial.
    ///
    /// Use this for layout fragments the entry template includes directly.
    pub fn attach(&self, template: impl Into<String>) -> Self {
        self.lock().templates.push(template.into());
        self.handle()
    }

    /// Replaces the local data.
    pub fn set_data(&self, data: DataMap) -> Self {
        self.lock().data = data;
        self.handle()
    }

    /// Replaces the local data with the fields of a serializable value.
    ///
    /// The value must serialize to a mapping (a struct or a map).
    pub fn set_data_from<T: Serialize>(&self, value: &T) -> Result<Self, RenderError> {
        let data = to_data_map(value)?;
        Ok(self.set_data(data))
    }

    /// Sets one local data key.
    pub fn add_data(&self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.lock()
            .data
            .insert(key.into(), Value::from_serialize(&value));
        self.handle()
    }

    /// Replaces the global data.
    pub fn set_global_data(&self, data: DataMap) -> Self {
        self.lock().global = data;
        self.handle()
    }

    /// Sets one global data key.
    pub fn add_global_data(&self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.lock()
            .global
            .insert(key.into(), Value::from_serialize(&value));
        self.handle()
    }

    /// Registers a function callable from this component's templates.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn add_template_function<F, Rv, Args>(&self, name: impl Into<String>, f: F) -> Self
    where
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.lock()
            .functions
            .insert(name.into(), template_function(f));
        self.handle()
    }

    /// Registers several functions built with [`template_function`].
    pub fn add_template_functions(&self, functions: FunctionMap) -> Self {
        self.lock().functions.extend(functions);
        self.handle()
    }

    /// Sets the source URL on this component and every current child.
    ///
    /// Children registered later only receive it through
    /// [`with`](Self::with) or another call to `set_url`.
    pub fn set_url(&self, url: Uri) {
        let mut visited = HashSet::new();
        self.propagate_url(&url, &mut visited);
    }

    fn propagate_url(&self, url: &Uri, visited: &mut HashSet<ComponentId>) {
        if !visited.insert(self.id()) {
            return;
        }
        let children: Vec<Component> = {
            let mut state = self.lock();
            state.url = Some(url.clone());
            state.children.values().cloned().collect()
        };
        for child in children {
            child.propagate_url(url, visited);
        }
    }

    /// Clears data, global data, partials, children and the URL.
    ///
    /// Templates, functions and the source, engine and cache settings stay.
    pub fn reset(&self) -> Self {
        {
            let mut state = self.lock();
            state.data.clear();
            state.global.clear();
            state.partials.clear();
            state.children.clear();
            state.url = None;
        }
        self.handle()
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Sets where template identifiers are loaded from.
    ///
    /// Defaults to a [`DirSource`] rooted at `./`.
    pub fn fs(&self, source: impl TemplateSource + 'static) -> Self {
        self.fs_shared(Arc::new(source))
    }

    /// Like [`fs`](Self::fs), sharing an existing source.
    pub fn fs_shared(&self, source: Arc<dyn TemplateSource>) -> Self {
        self.lock().source = source;
        self.handle()
    }

    /// Sets the template engine. Defaults to [`MiniJinjaEngine`].
    pub fn engine(&self, engine: impl TemplateEngine + 'static) -> Self {
        self.lock().engine = Arc::new(engine);
        self.handle()
    }

    /// Sets the template cache. Defaults to [`global_cache`].
    pub fn cache(&self, cache: Arc<dyn TemplateCache>) -> Self {
        self.lock().cache = cache;
        self.handle()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn templates(&self) -> Vec<String> {
        self.lock().templates.clone()
    }

    pub fn data(&self) -> DataMap {
        self.lock().data.clone()
    }

    pub fn global_data(&self) -> DataMap {
        self.lock().global.clone()
    }

    /// Rendered child outputs from the last render, by slot.
    pub fn partials(&self) -> DataMap {
        self.lock().partials.clone()
    }

    pub fn url(&self) -> Option<Uri> {
        self.lock().url.clone()
    }

    /// Slot names of the registered children, in render order.
    pub fn slots(&self) -> Vec<String> {
        self.lock().children.keys().cloned().collect()
    }

    pub fn child(&self, slot: &str) -> Option<Component> {
        self.lock().children.get(slot).cloned()
    }

    pub fn function_names(&self) -> Vec<String> {
        self.lock().functions.keys().cloned().collect()
    }

    pub fn is_wrapped(&self) -> bool {
        self.lock().wrapper.is_some()
    }

    /// The slot this component fills in its wrapper.
    pub fn target(&self) -> Option<String> {
        self.lock().wrapper.as_ref().map(|(_, slot)| slot.clone())
    }

    /// The wrapping parent, if it is set and still alive.
    pub fn wrapper(&self) -> Option<Component> {
        let state = self.lock();
        let (parent, _) = state.wrapper.as_ref()?;
        parent.upgrade().map(|inner| Component { inner })
    }

    // ------------------------------------------------------------------
    // Render traversal
    // ------------------------------------------------------------------

    /// Copies keys of `input` missing from the local data.
    pub(crate) fn inject_data(&self, input: &DataMap) {
        merge_missing(&mut self.lock().data, input);
    }

    /// Copies keys of `input` missing from the global data.
    pub(crate) fn inject_global_data(&self, input: &DataMap) {
        merge_missing(&mut self.lock().global, input);
    }

    pub(crate) fn add_partial(&self, slot: &str, html: Html) {
        self.lock().partials.insert(slot.to_string(), html.into_value());
    }
}

fn merge_missing(target: &mut DataMap, input: &DataMap) {
    for (key, value) in input {
        target
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

fn to_data_map<T: Serialize>(value: &T) -> Result<DataMap, RenderError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(key, value)| (key, Value::from_serialize(&value)))
            .collect()),
        other => Err(RenderError::Data(format!(
            "expected a mapping, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Component")
            .field("templates", &state.templates)
            .field("data", &state.data.keys().collect::<Vec<_>>())
            .field("global", &state.global.keys().collect::<Vec<_>>())
            .field("slots", &state.children.keys().collect::<Vec<_>>())
            .field("target", &state.wrapper.as_ref().map(|(_, slot)| slot))
            .field("url", &state.url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_template_order() {
        let c = Component::new(["page.html", "footer.html"]);
        assert_eq!(c.templates(), vec!["page.html", "footer.html"]);
    }

    #[test]
    fn test_data_starts_empty() {
        let c = Component::from_template("page.html");
        assert!(c.data().is_empty());
        assert!(c.global_data().is_empty());
        assert!(c.partials().is_empty());
    }

    #[test]
    fn test_add_and_set_data() {
        let c = Component::from_template("page.html")
            .add_data("a", 1)
            .add_data("b", "two");
        assert_eq!(c.data().len(), 2);

        let mut replacement = DataMap::new();
        replacement.insert("c".into(), Value::from(3));
        c.set_data(replacement);
        assert_eq!(c.data().keys().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_set_data_from_struct() {
        #[derive(Serialize)]
        struct Page {
            title: String,
            count: u32,
        }

        let c = Component::from_template("page.html")
            .set_data_from(&Page {
                title: "Home".into(),
                count: 3,
            })
            .unwrap();
        let data = c.data();
        assert_eq!(data["title"].as_str(), Some("Home"));
        assert_eq!(data["count"], Value::from(3));
    }

    #[test]
    fn test_set_data_from_rejects_non_mapping() {
        let c = Component::from_template("page.html");
        let result = c.set_data_from(&vec![1, 2, 3]);
        assert!(matches!(result, Err(RenderError::Data(_))));
    }

    #[test]
    fn test_global_data() {
        let c = Component::from_template("page.html").add_global_data("site", "hx");
        assert_eq!(c.global_data()["site"].as_str(), Some("hx"));

        c.set_global_data(DataMap::new());
        assert!(c.global_data().is_empty());
    }

    #[test]
    fn test_inject_is_non_destructive() {
        let child = Component::from_template("child.html").add_data("x", 1);
        let parent = Component::from_template("parent.html")
            .add_data("x", 2)
            .add_data("y", 3);

        child.inject_data(&parent.data());

        let data = child.data();
        assert_eq!(data["x"], Value::from(1));
        assert_eq!(data["y"], Value::from(3));
    }

    #[test]
    fn test_inject_global_is_non_destructive() {
        let child = Component::from_template("child.html").add_global_data("theme", "dark");
        let parent = Component::from_template("parent.html")
            .add_global_data("theme", "light")
            .add_global_data("user", "ada");

        child.inject_global_data(&parent.global_data());

        let global = child.global_data();
        assert_eq!(global["theme"].as_str(), Some("dark"));
        assert_eq!(global["user"].as_str(), Some("ada"));
    }

    #[test]
    fn test_with_registers_child() {
        let nav = Component::from_template("nav.html");
        let page = Component::from_template("page.html").with(&nav, "nav");
        assert_eq!(page.slots(), vec!["nav"]);
        assert!(page.child("nav").unwrap().ptr_eq(&nav));
    }

    #[test]
    fn test_with_replaces_slot() {
        let a = Component::from_template("a.html");
        let b = Component::from_template("b.html");
        let page = Component::from_template("page.html")
            .with(&a, "main")
            .with(&b, "main");
        assert!(page.child("main").unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_with_propagates_existing_url() {
        let page = Component::from_template("page.html");
        page.set_url("/home".parse().unwrap());

        let nav = Component::from_template("nav.html");
        page.with(&nav, "nav");
        assert_eq!(nav.url().unwrap().path(), "/home");
    }

    #[test]
    fn test_set_url_reaches_current_children_only() {
        let nav = Component::from_template("nav.html");
        let item = Component::from_template("item.html");
        nav.with(&item, "item");
        let page = Component::from_template("page.html").with(&nav, "nav");

        page.set_url("/a".parse().unwrap());
        assert_eq!(nav.url().unwrap().path(), "/a");
        assert_eq!(item.url().unwrap().path(), "/a");

        let late = Component::from_template("late.html");
        page.lock().children.insert("late".into(), late.clone());
        assert!(late.url().is_none());
    }

    #[test]
    fn test_set_url_terminates_on_cycles() {
        let a = Component::from_template("a.html");
        let b = Component::from_template("b.html");
        a.with(&b, "b");
        b.with(&a, "a");

        a.set_url("/loop".parse().unwrap());
        assert_eq!(b.url().unwrap().path(), "/loop");
    }

    #[test]
    fn test_attach_appends() {
        let c = Component::from_template("page.html").attach("footer.html");
        assert_eq!(c.templates(), vec!["page.html", "footer.html"]);
    }

    #[test]
    fn test_template_functions_replace_by_name() {
        let c = Component::from_template("page.html")
            .add_template_function("f", || 1)
            .add_template_function("f", || 2)
            .add_template_function("g", || 3);
        assert_eq!(c.function_names(), vec!["f", "g"]);

        let mut more = FunctionMap::new();
        more.insert("h".into(), template_function(|| 4));
        c.add_template_functions(more);
        assert_eq!(c.function_names(), vec!["f", "g", "h"]);
    }

    #[test]
    fn test_wrap_records_back_reference() {
        let layout = Component::from_template("layout.html");
        let body = Component::from_template("body.html").wrap(&layout, "content");

        assert!(body.is_wrapped());
        assert_eq!(body.target().as_deref(), Some("content"));
        assert!(body.wrapper().unwrap().ptr_eq(&layout));
        assert!(layout.slots().is_empty());
    }

    #[test]
    fn test_wrapper_does_not_keep_parent_alive() {
        let body = Component::from_template("body.html");
        {
            let layout = Component::from_template("layout.html");
            body.wrap(&layout, "content");
        }
        assert!(body.is_wrapped());
        assert!(body.wrapper().is_none());
    }

    #[test]
    fn test_reset_keeps_templates_and_functions() {
        let nav = Component::from_template("nav.html");
        let c = Component::new(["page.html", "footer.html"])
            .add_data("a", 1)
            .add_global_data("b", 2)
            .add_template_function("f", || 1)
            .with(&nav, "nav");
        c.set_url("/x".parse().unwrap());
        c.add_partial("nav", Html::new("<nav></nav>"));

        c.reset();

        assert!(c.data().is_empty());
        assert!(c.global_data().is_empty());
        assert!(c.partials().is_empty());
        assert!(c.slots().is_empty());
        assert!(c.url().is_none());
        assert_eq!(c.templates(), vec!["page.html", "footer.html"]);
        assert_eq!(c.function_names(), vec!["f"]);
    }

    #[test]
    fn test_clones_share_one_node() {
        let a = Component::from_template("page.html");
        let b = a.clone();
        b.add_data("k", "v");
        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.data()["k"].as_str(), Some("v"));
    }
}
