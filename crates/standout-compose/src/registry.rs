//! Registry of templates, partials and layouts.
//!
//! [`Registry`] owns three independent maps, one per [`Kind`], keyed by the
//! name an artifact was registered under. Registering compiles the source,
//! stores the artifact, then cross-links it with what is already there (see
//! [`crate::associate`]). After that, every template can include every
//! partial and extend every layout, partials can include each other, and
//! layouts can include partials, whatever order things were registered in.
//!
//! # Example
//!
//! ```rust
//! use minijinja::context;
//! use standout_compose::{Executor, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register_template("page", r#"{% extends "layouts/base" %}{% block body %}{% include "partials/hello" %}{% endblock %}"#)?;
//! registry.register_layout("base", "<main>{% block body %}{% endblock %}</main>")?;
//! registry.register_partial("hello", "Hello, {{ name }}!")?;
//!
//! let page = registry.template("page").unwrap();
//! assert_eq!(page.render(context! { name => "world" })?, "<main>Hello, world!</main>");
//! # Ok::<(), standout_compose::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! Registration and [`reset`](Registry::reset) take `&mut self`; rendering
//! takes `&self`. Once everything is registered the registry can be shared
//! across threads for concurrent rendering.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use minijinja::Value;
use tracing::debug;

use crate::artifact::{Artifact, Kind};
use crate::config::Config;
use crate::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::functions::FunctionTable;
use crate::prefix::Prefixes;

type ArtifactMap<F> = BTreeMap<String, Artifact<F>>;

/// Caller-owned store of registered artifacts.
pub struct Registry<E: TemplateEngine = MiniJinjaEngine> {
    pub(crate) engine: E,
    pub(crate) prefixes: Prefixes,
    pub(crate) templates: ArtifactMap<E::Form>,
    pub(crate) partials: ArtifactMap<E::Form>,
    pub(crate) layouts: ArtifactMap<E::Form>,
}

impl Registry<MiniJinjaEngine> {
    /// Creates an empty registry with the default MiniJinja engine.
    pub fn new() -> Self {
        Self::with_engine(MiniJinjaEngine::new())
    }

    /// Creates an empty registry whose artifacts all see `functions`.
    pub fn with_functions(functions: FunctionTable) -> Self {
        Self::with_engine(MiniJinjaEngine::with_functions(functions))
    }

    /// Creates an empty registry from configuration.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_functions(config, FunctionTable::new())
    }

    pub fn with_config_and_functions(config: Config, functions: FunctionTable) -> Self {
        let engine = MiniJinjaEngine::with_functions(functions).options(config.engine);
        let mut registry = Self::with_engine(engine);
        registry.prefixes = config.prefixes;
        registry
    }
}

impl Default for Registry<MiniJinjaEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TemplateEngine> Registry<E> {
    /// Creates an empty registry backed by `engine`.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            prefixes: Prefixes::default(),
            templates: BTreeMap::new(),
            partials: BTreeMap::new(),
            layouts: BTreeMap::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Replaces the partial and layout prefixes.
    ///
    /// Only affects associations made from now on. Subtrees already merged
    /// keep the names they were merged under.
    pub fn set_prefixes(&mut self, prefixes: Prefixes) {
        self.prefixes = prefixes;
    }

    /// Registers a root template. It receives every partial and layout.
    ///
    /// # Errors
    ///
    /// [`Error::Compile`] if the source does not compile; nothing is stored.
    /// [`Error::Association`] if a merge fails; the template stays
    /// registered with the merges done so far.
    pub fn register_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.register(Kind::Template, name, source)
    }

    /// Registers a partial. It is merged into every template, partial and
    /// layout, and receives every existing partial.
    ///
    /// # Errors
    ///
    /// Same as [`register_template`](Self::register_template).
    pub fn register_partial(&mut self, name: &str, source: &str) -> Result<()> {
        self.register(Kind::Partial, name, source)
    }

    /// Registers a layout. It is merged into every template and receives
    /// every existing partial.
    ///
    /// # Errors
    ///
    /// Same as [`register_template`](Self::register_template).
    pub fn register_layout(&mut self, name: &str, source: &str) -> Result<()> {
        self.register(Kind::Layout, name, source)
    }

    /// Registers an artifact of `kind`: compile, store, associate.
    ///
    /// Registering a name that already exists for `kind` replaces the
    /// stored artifact. Artifacts that merged the old version keep it.
    pub fn register(&mut self, kind: Kind, name: &str, source: &str) -> Result<()> {
        let form = self
            .engine
            .compile(name, source)
            .map_err(|err| Error::compile(kind, name, err))?;

        if self.put(Artifact::new(kind, name, form)).is_some() {
            debug!(%kind, name, "replaced existing artifact");
        } else {
            debug!(%kind, name, "registered artifact");
        }

        self.associate(kind, name)
    }

    /// Stores `artifact` under its name, returning the one it replaced.
    pub(crate) fn put(&mut self, artifact: Artifact<E::Form>) -> Option<Artifact<E::Form>> {
        let name = artifact.name().to_string();
        self.map_mut(artifact.kind()).insert(name, artifact)
    }

    /// Looks up an artifact by kind and name.
    pub fn get(&self, kind: Kind, name: &str) -> Option<&Artifact<E::Form>> {
        self.map(kind).get(name)
    }

    pub fn template(&self, name: &str) -> Option<&Artifact<E::Form>> {
        self.get(Kind::Template, name)
    }

    pub fn partial(&self, name: &str) -> Option<&Artifact<E::Form>> {
        self.get(Kind::Partial, name)
    }

    pub fn layout(&self, name: &str) -> Option<&Artifact<E::Form>> {
        self.get(Kind::Layout, name)
    }

    /// Whether an artifact of `kind` is registered under `name`.
    pub fn contains(&self, kind: Kind, name: &str) -> bool {
        self.map(kind).contains_key(name)
    }

    /// All artifacts of `kind`, ordered by name.
    pub fn artifacts(&self, kind: Kind) -> impl Iterator<Item = &Artifact<E::Form>> {
        self.map(kind).values()
    }

    /// Registered names of `kind`, in sorted order.
    pub fn names(&self, kind: Kind) -> impl Iterator<Item = &str> {
        self.map(kind).keys().map(String::as_str)
    }

    /// Number of artifacts of `kind`.
    pub fn len(&self, kind: Kind) -> usize {
        self.map(kind).len()
    }

    /// Whether no artifact of any kind is registered.
    pub fn is_empty(&self) -> bool {
        Kind::ALL.iter().all(|kind| self.map(*kind).is_empty())
    }

    /// Removes every artifact of every kind, and with them every
    /// association. Prefixes and engine are kept.
    pub fn reset(&mut self) {
        self.templates.clear();
        self.partials.clear();
        self.layouts.clear();
        debug!("registry reset");
    }

    /// Renders the artifact of `kind` named `name` into `sink`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if nothing is registered under that name,
    /// otherwise whatever rendering reports.
    pub fn execute(
        &self,
        kind: Kind,
        name: &str,
        sink: &mut dyn io::Write,
        data: Value,
    ) -> Result<()> {
        self.get(kind, name)
            .ok_or_else(|| Error::not_found(kind, name))?
            .execute(sink, data)
    }

    /// Renders the artifact of `kind` named `name` to a string.
    pub fn render(&self, kind: Kind, name: &str, data: Value) -> Result<String> {
        self.get(kind, name)
            .ok_or_else(|| Error::not_found(kind, name))?
            .render(data)
    }

    pub(crate) fn map(&self, kind: Kind) -> &ArtifactMap<E::Form> {
        match kind {
            Kind::Template => &self.templates,
            Kind::Partial => &self.partials,
            Kind::Layout => &self.layouts,
        }
    }

    fn map_mut(&mut self, kind: Kind) -> &mut ArtifactMap<E::Form> {
        match kind {
            Kind::Template => &mut self.templates,
            Kind::Partial => &mut self.partials,
            Kind::Layout => &mut self.layouts,
        }
    }
}

impl<E: TemplateEngine> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("prefixes", &self.prefixes)
            .field("templates", &self.names(Kind::Template).collect::<Vec<_>>())
            .field("partials", &self.names(Kind::Partial).collect::<Vec<_>>())
            .field("layouts", &self.names(Kind::Layout).collect::<Vec<_>>())
            .finish()
    }
}
