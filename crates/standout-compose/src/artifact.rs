//! Registered artifacts and their kinds.

use std::borrow::Cow;
use std::fmt;
use std::io;

use minijinja::Value;
use serde::{Deserialize, Serialize};

use crate::engine::{CompiledForm, MiniJinjaForm};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::prefix::Prefixes;

/// The three kinds of artifact a [`Registry`](crate::Registry) holds.
///
/// - `Template`: a root. Receives every partial and layout, is never merged
///   into anything.
/// - `Partial`: a reusable fragment, visible to every other artifact.
/// - `Layout`: a page skeleton, visible to templates, sees every partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Template,
    Partial,
    Layout,
}

impl Kind {
    /// All kinds, in registration-map order.
    pub const ALL: [Kind; 3] = [Kind::Template, Kind::Partial, Kind::Layout];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Template => "template",
            Kind::Partial => "partial",
            Kind::Layout => "layout",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, compiled unit of template source.
///
/// An artifact's name and kind never change after registration. Its
/// compiled form only grows: the registry merges other artifacts into it as
/// they are registered.
pub struct Artifact<F = MiniJinjaForm> {
    name: String,
    kind: Kind,
    compiled: F,
}

impl<F: CompiledForm> Artifact<F> {
    pub(crate) fn new(kind: Kind, name: impl Into<String>, compiled: F) -> Self {
        Self {
            name: name.into(),
            kind,
            compiled,
        }
    }

    /// The name the artifact was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The engine's compiled form.
    pub fn compiled(&self) -> &F {
        &self.compiled
    }

    pub(crate) fn compiled_mut(&mut self) -> &mut F {
        &mut self.compiled
    }

    /// The key other artifacts reference this one by, or `None` for
    /// templates.
    pub fn prefixed_name(&self, prefixes: &Prefixes) -> Option<Cow<'_, str>> {
        prefixes.prefixed(self.kind, &self.name)
    }

    /// Whether `name` resolves inside this artifact, either as its own root
    /// or as a merged subtree.
    pub fn contains(&self, name: &str) -> bool {
        self.compiled.lookup(name)
    }

    /// Renders the subtree registered under `name` instead of the root.
    pub fn execute_named(&self, name: &str, sink: &mut dyn io::Write, data: Value) -> Result<()> {
        self.compiled
            .execute_template(name, sink, data)
            .map_err(|err| Error::render(name, err))
    }
}

impl<F: CompiledForm> Executor for Artifact<F> {
    fn execute(&self, sink: &mut dyn io::Write, data: Value) -> Result<()> {
        self.execute_named(&self.name, sink, data)
    }
}

impl<F: CompiledForm> fmt::Debug for Artifact<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
