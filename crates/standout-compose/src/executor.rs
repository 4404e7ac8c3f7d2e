//! The render capability shared by every artifact.
//!
//! Callers that only need to produce output depend on [`Executor`], not on
//! whether they hold a template, a partial, a layout or a plain MiniJinja
//! template.

use std::io;

use minijinja::Value;

use crate::engine::write_output;
use crate::error::{Error, Result};

/// Something that renders against a data value into a sink.
pub trait Executor {
    /// Renders into `sink`.
    ///
    /// Fails on evaluation errors (undefined values in strict mode, a
    /// missing included template, a failing function) and on sink write
    /// errors.
    fn execute(&self, sink: &mut dyn io::Write, data: Value) -> Result<()>;

    /// Renders into a string.
    fn render(&self, data: Value) -> Result<String> {
        let mut out = Vec::new();
        self.execute(&mut out, data)?;
        Ok(String::from_utf8(out)?)
    }
}

impl Executor for minijinja::Template<'_, '_> {
    fn execute(&self, sink: &mut dyn io::Write, data: Value) -> Result<()> {
        minijinja::Template::render(self, data)
            .and_then(|output| write_output(sink, &output))
            .map_err(|err| Error::render(self.name(), err))
    }
}
