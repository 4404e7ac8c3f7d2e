//! Cross-linking of artifacts at registration time.
//!
//! Each registration merges the new artifact's root into every artifact
//! that should be able to call it, and merges into the new artifact every
//! root it should be able to call. Merges always use the source's prefixed
//! name as the key.
//!
//! | Registered | Merged into                      | Receives              |
//! |------------|----------------------------------|-----------------------|
//! | template   | nothing                          | every partial, layout |
//! | partial    | every template, partial, layout  | every partial         |
//! | layout     | every template                   | every partial         |
//!
//! A merge is skipped when the destination already resolves the key. That
//! check is what makes running the full propagation on every call safe: no
//! duplicate subtrees, no clobbering of a subtree merged earlier, and
//! partials that include each other do not recurse.
//!
//! The first failing merge stops the propagation. Merges already performed
//! by the same call are kept.

use tracing::{debug, trace, warn};

use crate::artifact::{Artifact, Kind};
use crate::engine::{CompiledForm, TemplateEngine};
use crate::error::{Error, Result};
use crate::registry::Registry;

type Subtree<E> = (String, <<E as TemplateEngine>::Form as CompiledForm>::Tree);

impl<E: TemplateEngine> Registry<E> {
    /// Wires the freshly stored artifact `name` of `kind` into the registry.
    pub(crate) fn associate(&mut self, kind: Kind, name: &str) -> Result<()> {
        let linked = match kind {
            Kind::Template => self.associate_template(name)?,
            Kind::Partial => self.associate_partial(name)?,
            Kind::Layout => self.associate_layout(name)?,
        };
        debug!(%kind, name, linked, "associated artifact");
        Ok(())
    }

    fn associate_template(&mut self, name: &str) -> Result<usize> {
        let mut sources = self.subtrees(Kind::Partial);
        sources.extend(self.subtrees(Kind::Layout));

        let Some(template) = self.templates.get_mut(name) else {
            return Ok(0);
        };
        link_all(template, &sources)
    }

    fn associate_partial(&mut self, name: &str) -> Result<usize> {
        let Some((key, tree)) = self.subtree(Kind::Partial, name) else {
            return Ok(0);
        };
        let mut linked = 0;

        for template in self.templates.values_mut() {
            linked += link(template, &key, &tree)? as usize;
        }
        // Includes the partial itself, so it can recurse into itself.
        for other in self.partials.values_mut() {
            linked += link(other, &key, &tree)? as usize;
        }

        let others = self.subtrees(Kind::Partial);
        if let Some(partial) = self.partials.get_mut(name) {
            linked += link_all(partial, &others)?;
        }

        for layout in self.layouts.values_mut() {
            linked += link(layout, &key, &tree)? as usize;
        }
        Ok(linked)
    }

    fn associate_layout(&mut self, name: &str) -> Result<usize> {
        let Some((key, tree)) = self.subtree(Kind::Layout, name) else {
            return Ok(0);
        };
        let mut linked = 0;

        for template in self.templates.values_mut() {
            linked += link(template, &key, &tree)? as usize;
        }

        let partials = self.subtrees(Kind::Partial);
        if let Some(layout) = self.layouts.get_mut(name) {
            linked += link_all(layout, &partials)?;
        }
        Ok(linked)
    }

    /// The prefixed key and root tree of one artifact.
    fn subtree(&self, kind: Kind, name: &str) -> Option<Subtree<E>> {
        let artifact = self.get(kind, name)?;
        let key = artifact.prefixed_name(&self.prefixes)?.into_owned();
        Some((key, artifact.compiled().tree()))
    }

    /// Prefixed keys and root trees of every artifact of `kind`.
    fn subtrees(&self, kind: Kind) -> Vec<Subtree<E>> {
        self.map(kind)
            .values()
            .filter_map(|artifact| {
                let key = artifact.prefixed_name(&self.prefixes)?.into_owned();
                Some((key, artifact.compiled().tree()))
            })
            .collect()
    }
}

fn link_all<F: CompiledForm>(target: &mut Artifact<F>, sources: &[(String, F::Tree)]) -> Result<usize> {
    let mut linked = 0;
    for (key, tree) in sources {
        linked += link(target, key, tree)? as usize;
    }
    Ok(linked)
}

/// Merges `tree` into `target` under `key` unless `key` already resolves.
fn link<F: CompiledForm>(target: &mut Artifact<F>, key: &str, tree: &F::Tree) -> Result<bool> {
    if target.contains(key) {
        trace!(into = target.name(), key, "already associated");
        return Ok(false);
    }

    if let Err(source) = target.compiled_mut().add_tree(key, tree) {
        warn!(
            into = target.name(),
            key,
            error = %source,
            "association failed, artifact is partially wired"
        );
        return Err(Error::Association {
            kind: target.kind(),
            target: target.name().to_string(),
            name: key.to_string(),
            source,
        });
    }

    trace!(into = target.name(), key, "associated");
    Ok(true)
}
