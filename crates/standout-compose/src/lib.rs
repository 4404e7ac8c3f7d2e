//! # Standout Compose - Templates, Partials and Layouts
//!
//! `standout-compose` lets three kinds of named template artifacts be
//! registered independently, in any order, and still call each other:
//!
//! - Templates: roots that get rendered. They can include every partial and
//!   extend every layout.
//! - Partials: reusable fragments, referenced as `"partials/<name>"`. They
//!   can include each other, themselves included.
//! - Layouts: page skeletons, referenced as `"layouts/<name>"`. They can
//!   include every partial.
//!
//! Templates are compiled with [MiniJinja](https://docs.rs/minijinja), the
//! same engine standout-render uses.
//!
//! ## Quick Start
//!
//! ```rust
//! use minijinja::context;
//! use standout_compose::{Executor, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register_partial("foo", "foo")?;
//! registry.register_layout(
//!     "header",
//!     r#"<h2>{% block content %}{% endblock %} {% include "partials/foo" %}</h2>"#,
//! )?;
//! registry.register_template(
//!     "test",
//!     r#"{% extends "layouts/header" %}{% block content %}test{% endblock %}"#,
//! )?;
//!
//! let test = registry.template("test").unwrap();
//! assert_eq!(test.render(context! {})?, "<h2>test foo</h2>");
//! # Ok::<(), standout_compose::Error>(())
//! ```
//!
//! ## How Registration Works
//!
//! Each artifact owns a compiled form that holds its own root plus copies of
//! every artifact it may reference. Registering an artifact compiles it,
//! stores it, then merges it into (and merges into it) whatever is already
//! registered. See [`associate`] for the rules.
//!
//! ## Key Types
//!
//! - [`Registry`]: caller-owned store, the registration entry points
//! - [`Artifact`] and [`Kind`]: what the registry holds
//! - [`Executor`]: render capability shared by artifacts and MiniJinja templates
//! - [`TemplateEngine`] / [`CompiledForm`]: the engine seam, [`MiniJinjaEngine`] by default
//! - [`FunctionTable`]: globals and filters installed into every artifact
//! - [`Config`]: prefixes and engine options, loadable from YAML or JSON

mod artifact;
pub mod associate;
mod config;
mod engine;
mod error;
mod executor;
mod functions;
mod prefix;
mod registry;

pub use artifact::{Artifact, Kind};
pub use config::{Config, EngineOptions};
pub use engine::{CompiledForm, MiniJinjaEngine, MiniJinjaForm, SourceTree, TemplateEngine};
pub use error::{Error, Result};
pub use executor::Executor;
pub use functions::FunctionTable;
pub use prefix::{prefixed_name, Prefixes, DEFAULT_LAYOUT_PREFIX, DEFAULT_PARTIAL_PREFIX};
pub use registry::Registry;
