//! Namespacing of partial and layout names.
//!
//! Partials and layouts are referenced from other artifacts by a prefixed
//! name: `{% include "partials/row" %}` or `{% extends "layouts/page" %}`.
//! The prefix is applied idempotently, so an artifact registered as
//! `"partials/row"` and one registered as `"row"` resolve to the same key.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::artifact::Kind;

/// Default prefix for partial names.
pub const DEFAULT_PARTIAL_PREFIX: &str = "partials/";

/// Default prefix for layout names.
pub const DEFAULT_LAYOUT_PREFIX: &str = "layouts/";

/// Returns `name` with `prefix` prepended, unless it already starts with it.
///
/// ```rust
/// use standout_compose::prefixed_name;
///
/// assert_eq!(prefixed_name("partials/", "row"), "partials/row");
/// assert_eq!(prefixed_name("partials/", "partials/row"), "partials/row");
/// ```
pub fn prefixed_name<'a>(prefix: &str, name: &'a str) -> Cow<'a, str> {
    if name.starts_with(prefix) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{}{}", prefix, name))
    }
}

/// The namespace prefixes used for partials and layouts.
///
/// Prefixes are read each time a prefixed name is computed. Changing them
/// after artifacts have been associated does not rename the subtrees that
/// were already merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefixes {
    /// Prefix for partials (default `"partials/"`).
    pub partial: String,
    /// Prefix for layouts (default `"layouts/"`).
    pub layout: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            partial: DEFAULT_PARTIAL_PREFIX.to_string(),
            layout: DEFAULT_LAYOUT_PREFIX.to_string(),
        }
    }
}

impl Prefixes {
    /// Creates a prefix pair.
    pub fn new(partial: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            partial: partial.into(),
            layout: layout.into(),
        }
    }

    /// The prefix for `kind`, or `None` for templates, which are never
    /// referenced by name.
    pub fn for_kind(&self, kind: Kind) -> Option<&str> {
        match kind {
            Kind::Template => None,
            Kind::Partial => Some(&self.partial),
            Kind::Layout => Some(&self.layout),
        }
    }

    /// The key under which an artifact of `kind` named `name` is merged
    /// into other artifacts.
    pub fn prefixed<'a>(&self, kind: Kind, name: &'a str) -> Option<Cow<'a, str>> {
        self.for_kind(kind).map(|prefix| prefixed_name(prefix, name))
    }
}
