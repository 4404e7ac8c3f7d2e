//! Functions and filters installed into every compiled artifact.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::{Environment, Value};

type Installer = Arc<dyn Fn(&mut Environment<'static>) + Send + Sync>;

/// A table of globals and environment customizations shared by every
/// artifact a [`MiniJinjaEngine`](crate::MiniJinjaEngine) compiles.
///
/// Globals are stored as values, so callables go through
/// [`Value::from_function`]. Filters and tests have no value form in
/// MiniJinja; register those with [`install`](Self::install).
///
/// ```rust
/// use minijinja::Value;
/// use standout_compose::FunctionTable;
///
/// let mut table = FunctionTable::new();
/// table.add_function("shout", Value::from_function(|s: String| s.to_uppercase()));
/// table.install(|env| env.add_filter("twice", |s: String| format!("{s}{s}")));
/// assert!(table.contains("shout"));
/// ```
#[derive(Clone, Default)]
pub struct FunctionTable {
    globals: BTreeMap<String, Value>,
    installers: Vec<Installer>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the default filters registered.
    ///
    /// - `nl`: appends a newline to its input.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.install(|env| env.add_filter("nl", |value: Value| format!("{}\n", value)));
        table
    }

    /// Adds a global callable (or any other global value) under `name`.
    ///
    /// A later call with the same name replaces the earlier value.
    pub fn add_function(&mut self, name: impl Into<String>, function: Value) -> &mut Self {
        self.globals.insert(name.into(), function);
        self
    }

    /// Adds a customization applied to each environment at creation.
    pub fn install<F>(&mut self, installer: F) -> &mut Self
    where
        F: Fn(&mut Environment<'static>) + Send + Sync + 'static,
    {
        self.installers.push(Arc::new(installer));
        self
    }

    /// Whether a global named `name` is in the table.
    pub fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty() && self.installers.is_empty()
    }

    /// Applies every global and installer to `env`.
    pub fn apply(&self, env: &mut Environment<'static>) {
        for (name, value) in &self.globals {
            env.add_global(name.clone(), value.clone());
        }
        for installer in &self.installers {
            installer(env);
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("globals", &self.globals.keys().collect::<Vec<_>>())
            .field("installers", &self.installers.len())
            .finish()
    }
}
