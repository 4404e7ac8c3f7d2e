//! Template engine abstraction.
//!
//! The registry never looks inside a compiled artifact. It only needs to
//! compile source, ask whether a name resolves, merge another artifact's
//! root under a name, and render. [`TemplateEngine`] and [`CompiledForm`]
//! capture exactly that, and [`MiniJinjaEngine`] is the default backend.

use std::fmt;
use std::io;
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};

use crate::config::EngineOptions;
use crate::functions::FunctionTable;

/// A compiled artifact as produced by a [`TemplateEngine`].
///
/// A compiled form is a set of named templates: the root, under the name it
/// was compiled with, plus every tree merged in with
/// [`add_tree`](Self::add_tree). Templates inside the set can reference each
/// other by name.
pub trait CompiledForm {
    /// The root of a compiled form, detached so it can be merged into other
    /// forms.
    type Tree: Clone;

    /// Returns the root tree.
    fn tree(&self) -> Self::Tree;

    /// Whether `name` resolves inside this form.
    fn lookup(&self, name: &str) -> bool;

    /// Makes `tree` available inside this form under `name`.
    ///
    /// Replaces an existing template of the same name; callers that must not
    /// replace check [`lookup`](Self::lookup) first.
    fn add_tree(&mut self, name: &str, tree: &Self::Tree) -> Result<(), minijinja::Error>;

    /// Renders the template named `name` into `sink`.
    fn execute_template(
        &self,
        name: &str,
        sink: &mut dyn io::Write,
        data: Value,
    ) -> Result<(), minijinja::Error>;
}

/// A template engine that compiles source text into a [`CompiledForm`].
pub trait TemplateEngine {
    type Form: CompiledForm;

    /// Compiles `source` as the root of a new form named `name`.
    fn compile(&self, name: &str, source: &str) -> Result<Self::Form, minijinja::Error>;
}

/// MiniJinja-based template engine.
///
/// Every artifact gets its own [`Environment`], set up with the engine's
/// [`FunctionTable`] and [`EngineOptions`]. Merging adds the other
/// artifact's root source to that environment, so `{% include %}`,
/// `{% extends %}` and `{% import %}` resolve names within the artifact.
///
/// # Example
///
/// ```rust
/// use minijinja::context;
/// use standout_compose::{CompiledForm, MiniJinjaEngine, TemplateEngine};
///
/// let engine = MiniJinjaEngine::new();
/// let mut page = engine.compile("page", r#"{% include "partials/row" %}!"#).unwrap();
/// let row = engine.compile("row", "{{ label }}").unwrap();
///
/// page.add_tree("partials/row", &row.tree()).unwrap();
///
/// let mut out = Vec::new();
/// page.execute_template("page", &mut out, context! { label => "hi" }).unwrap();
/// assert_eq!(out, b"hi!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MiniJinjaEngine {
    functions: Arc<FunctionTable>,
    options: EngineOptions,
}

impl MiniJinjaEngine {
    /// Creates an engine with default options and an empty function table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given function table.
    pub fn with_functions(functions: FunctionTable) -> Self {
        Self {
            functions: Arc::new(functions),
            options: EngineOptions::default(),
        }
    }

    /// Replaces the engine options.
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine_options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        if self.options.strict_undefined {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        env.set_keep_trailing_newline(self.options.keep_trailing_newline);
        if self.options.auto_escape {
            env.set_auto_escape_callback(|_| AutoEscape::Html);
        }
        self.functions.apply(&mut env);
        env
    }
}

impl TemplateEngine for MiniJinjaEngine {
    type Form = MiniJinjaForm;

    fn compile(&self, name: &str, source: &str) -> Result<MiniJinjaForm, minijinja::Error> {
        let source: Arc<str> = Arc::from(source);
        let mut env = self.environment();
        env.add_template_owned(name.to_string(), source.to_string())?;
        Ok(MiniJinjaForm {
            root: name.to_string(),
            source: SourceTree(source),
            env,
        })
    }
}

/// Root source of a [`MiniJinjaForm`], shared between the forms it is
/// merged into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree(Arc<str>);

impl SourceTree {
    pub fn source(&self) -> &str {
        &self.0
    }
}

/// A compiled artifact backed by its own MiniJinja environment.
pub struct MiniJinjaForm {
    root: String,
    source: SourceTree,
    env: Environment<'static>,
}

impl MiniJinjaForm {
    /// The name the root template was compiled under.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// The underlying environment, for rendering with MiniJinja directly.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Names of every template in this form, root included.
    pub fn template_names(&self) -> Vec<&str> {
        self.env.templates().map(|(name, _)| name).collect()
    }
}

impl CompiledForm for MiniJinjaForm {
    type Tree = SourceTree;

    fn tree(&self) -> SourceTree {
        self.source.clone()
    }

    fn lookup(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn add_tree(&mut self, name: &str, tree: &SourceTree) -> Result<(), minijinja::Error> {
        self.env
            .add_template_owned(name.to_string(), tree.source().to_string())
    }

    fn execute_template(
        &self,
        name: &str,
        sink: &mut dyn io::Write,
        data: Value,
    ) -> Result<(), minijinja::Error> {
        let output = self.env.get_template(name)?.render(data)?;
        write_output(sink, &output)
    }
}

/// Writes rendered output to `sink`, reporting failures as engine errors.
pub(crate) fn write_output(sink: &mut dyn io::Write, output: &str) -> Result<(), minijinja::Error> {
    sink.write_all(output.as_bytes()).map_err(|err| {
        minijinja::Error::new(
            minijinja::ErrorKind::WriteFailure,
            "failed to write rendered output",
        )
        .with_source(err)
    })
}

impl fmt::Debug for MiniJinjaForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniJinjaForm")
            .field("root", &self.root)
            .field("templates", &self.template_names())
            .finish()
    }
}
