//! Error types for registration and rendering.
//!
//! Registration can fail in two ways. A [`Error::Compile`] leaves the
//! registry untouched. An [`Error::Association`] happens after the new
//! artifact is stored: merges done before the failure stay in place and the
//! remaining ones are skipped, so the artifact is registered but only
//! partially wired. Recovering from that means calling
//! [`Registry::reset`](crate::Registry::reset) and registering again.

use crate::artifact::Kind;

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while registering or rendering artifacts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source text could not be compiled by the engine.
    #[error("failed to compile {kind} \"{name}\": {source}")]
    Compile {
        kind: Kind,
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The engine rejected merging `name` into the artifact `target`.
    #[error("failed to associate \"{name}\" into {kind} \"{target}\": {source}")]
    Association {
        /// Kind of the artifact that was being merged into.
        kind: Kind,
        target: String,
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// Evaluation failed while rendering.
    #[error("failed to render \"{name}\": {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// No artifact of that kind is registered under the name.
    #[error("{kind} not found: \"{name}\"")]
    NotFound { kind: Kind, name: String },

    /// Rendered output was not valid UTF-8.
    #[error("rendered output is not valid UTF-8: {0}")]
    Output(#[from] std::string::FromUtf8Error),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn compile(kind: Kind, name: &str, source: minijinja::Error) -> Self {
        Self::Compile {
            kind,
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn render(name: &str, source: minijinja::Error) -> Self {
        Self::Render {
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn not_found(kind: Kind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// Whether this is a compile failure.
    pub fn is_compile(&self) -> bool {
        matches!(self, Self::Compile { .. })
    }

    /// Whether this is an association failure.
    pub fn is_association(&self) -> bool {
        matches!(self, Self::Association { .. })
    }

    /// Whether this is a render failure.
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
