//! Render orchestration.
//!
//! Rendering a component is a depth-first walk of its children:
//!
//! 1. The component is pushed onto the active chain. Finding it there already
//!    means the partial graph loops back on itself, which fails the whole
//!    render with [`RenderError::CircularReference`].
//! 2. Children render in slot-name order. Each child first receives the
//!    parent's local and global data (without overwriting its own keys), and
//!    its output is stored as a partial under its slot.
//! 3. The component's own template set is compiled (or fetched from the
//!    cache) and executed against the [`Envelope`].
//!
//! The active chain is a per-call value, never stored on the component, so a
//! shared component can be rendered by concurrent requests. No component
//! lock is held while a child renders.

use std::sync::Arc;

use http::Uri;

use crate::cache::{CacheKey, TemplateCache};
use crate::component::{Component, ComponentId, DataMap};
use crate::context::RenderContext;
use crate::defaults::template_cache_enabled;
use crate::engine::{base_name, CompiledTemplate, Envelope, TemplateEngine};
use crate::error::RenderError;
use crate::functions::{effective_functions, FunctionMap};
use crate::html::Html;
use crate::source::TemplateSource;

/// Components currently being rendered by one call, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ActiveChain {
    entries: Vec<(ComponentId, String)>,
}

impl ActiveChain {
    fn enter(&mut self, id: ComponentId, label: String) -> Result<(), RenderError> {
        if self.entries.iter().any(|(active, _)| *active == id) {
            return Err(RenderError::CircularReference {
                chain: self.describe(&label),
            });
        }
        self.entries.push((id, label));
        Ok(())
    }

    fn leave(&mut self) {
        self.entries.pop();
    }

    fn describe(&self, last: &str) -> String {
        self.entries
            .iter()
            .map(|(_, label)| label.as_str())
            .chain(std::iter::once(last))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Everything needed to execute one component, copied out of its lock.
struct RenderPlan {
    templates: Vec<String>,
    data: DataMap,
    global: DataMap,
    partials: DataMap,
    url: Option<Uri>,
    functions: FunctionMap,
    source: Arc<dyn TemplateSource>,
    engine: Arc<dyn TemplateEngine>,
    cache: Arc<dyn TemplateCache>,
}

impl Component {
    /// Renders this component and all of its children.
    ///
    /// Returns the first error met anywhere in the tree; no partial output is
    /// returned on failure. Partials produced by children stay on their
    /// parents afterwards and are cleared by [`reset`](Self::reset).
    ///
    /// An error does not roll anything back: children rendered before the
    /// failing one keep the injected data, and their partials stay on this
    /// component.
    pub fn render(&self, ctx: &RenderContext) -> Result<Html, RenderError> {
        let mut chain = ActiveChain::default();
        self.render_in(ctx, &mut chain)
    }

    /// Resolves the wrap chain and renders the outermost component.
    ///
    /// See [`resolve_root`](Self::resolve_root).
    pub fn render_wrapped(&self, ctx: &RenderContext) -> Result<Html, RenderError> {
        self.resolve_root()?.render(ctx)
    }

    /// Walks up the [`wrap`](Self::wrap) chain, registering each component in
    /// its wrapper's slot, and returns the outermost component.
    ///
    /// A component that is not wrapped is its own root.
    pub fn resolve_root(&self) -> Result<Component, RenderError> {
        let mut current = self.clone();
        let mut seen = ActiveChain::default();
        seen.enter(current.id(), current.label())?;

        while let Some(slot) = current.target() {
            let parent = current
                .wrapper()
                .ok_or_else(|| RenderError::DetachedWrapper { slot: slot.clone() })?;
            seen.enter(parent.id(), parent.label())?;
            parent.with(&current, slot);
            current = parent;
        }
        Ok(current)
    }

    pub(crate) fn render_in(
        &self,
        ctx: &RenderContext,
        chain: &mut ActiveChain,
    ) -> Result<Html, RenderError> {
        chain.enter(self.id(), self.label())?;
        let result = self.render_entered(ctx, chain);
        chain.leave();
        result
    }

    fn render_entered(
        &self,
        ctx: &RenderContext,
        chain: &mut ActiveChain,
    ) -> Result<Html, RenderError> {
        let (children, data, global) = {
            let state = self.lock();
            let children: Vec<(String, Component)> = state
                .children
                .iter()
                .map(|(slot, child)| (slot.clone(), child.clone()))
                .collect();
            (children, state.data.clone(), state.global.clone())
        };

        tracing::trace!(
            template = %self.label(),
            children = children.len(),
            depth = chain.entries.len(),
            "rendering component"
        );

        for (slot, child) in children {
            child.inject_data(&data);
            child.inject_global_data(&global);
            let html = child.render_in(ctx, chain)?;
            self.add_partial(&slot, html);
        }

        let plan = self.plan();
        if plan.templates.is_empty() {
            return Err(RenderError::NoTemplates);
        }
        plan.execute(ctx)
    }

    fn plan(&self) -> RenderPlan {
        let state = self.lock();
        RenderPlan {
            templates: state.templates.clone(),
            data: state.data.clone(),
            global: state.global.clone(),
            partials: state.partials.clone(),
            url: state.url.clone(),
            functions: state.functions.clone(),
            source: Arc::clone(&state.source),
            engine: Arc::clone(&state.engine),
            cache: Arc::clone(&state.cache),
        }
    }

    /// Entry template name used in chain descriptions.
    fn label(&self) -> String {
        self.lock()
            .templates
            .first()
            .cloned()
            .unwrap_or_else(|| "<no templates>".to_string())
    }
}

impl RenderPlan {
    fn execute(self, ctx: &RenderContext) -> Result<Html, RenderError> {
        let root = match self.templates.first() {
            Some(first) => base_name(first).to_string(),
            None => return Err(RenderError::NoTemplates),
        };
        let functions = effective_functions(&self.functions);
        let key = CacheKey::new(self.engine.name(), &self.templates, &functions);
        let compiled = self.compiled(&root, &key, &functions)?;

        let envelope = Envelope {
            ctx,
            data: &self.data,
            global: &self.global,
            partials: &self.partials,
            url: self.url.as_ref(),
        };

        match self.engine.execute(&compiled, &envelope, &functions) {
            Ok(output) => Ok(Html::new(output)),
            Err(RenderError::CacheType { .. }) => {
                tracing::warn!(key = %key, "cached template has an unexpected type");
                Err(RenderError::CacheType {
                    key: key.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn compiled(
        &self,
        root: &str,
        key: &CacheKey,
        functions: &FunctionMap,
    ) -> Result<CompiledTemplate, RenderError> {
        if template_cache_enabled() {
            if let Some(compiled) = self.cache.lookup(key) {
                tracing::debug!(key = %key, "template cache hit");
                return Ok(compiled);
            }
            tracing::debug!(key = %key, "template cache miss");
        }

        tracing::debug!(root, templates = ?self.templates, "compiling templates");
        let compiled =
            self.engine
                .compile(root, &self.templates, functions, self.source.as_ref())?;
        self.cache.store(key.clone(), Arc::clone(&compiled));
        tracing::debug!(key = %key, "template cache store");
        Ok(compiled)
    }
}
