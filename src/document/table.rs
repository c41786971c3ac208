//! Facade binding table
//!
//! Facades are entries in a table owned by the document, keyed by stable
//! node path. Invalidation is an explicit sweep over the table after each
//! structural edit: bindings whose paths still map onto the new tree
//! generation are rebound (possibly at a shifted index), the rest become
//! forgotten and fail fast on any later use.
//!
//! Slots are never reused: a forgotten slot stays forgotten so that every
//! outstanding facade handle observes the invalidation.

use std::collections::HashMap;

use crate::facade::StaleFacade;
use crate::parsing::Tree;

/// Stable path of a node within one tree generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodePath {
    /// Attribute-owning tag, by tag index
    Tag(usize),
    /// Attribute `attr` of tag `tag`
    Attribute { tag: usize, attr: usize },
}

impl NodePath {
    pub(crate) fn describe(&self) -> String {
        match self {
            NodePath::Tag(tag) => format!("tag {}", tag),
            NodePath::Attribute { tag, attr } => format!("attribute {} of tag {}", attr, tag),
        }
    }

    fn exists_in(&self, tree: &Tree) -> bool {
        match *self {
            NodePath::Tag(tag) => tree.tag(tag).is_some(),
            NodePath::Attribute { tag, attr } => tree
                .tag(tag)
                .is_some_and(|node| attr < node.attributes.len()),
        }
    }
}

/// One slot in the table
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// Bound to a node of the current generation
    Live { path: NodePath, generation: u64 },
    /// Invalidated; `path` is what the slot was last bound to
    Forgotten { path: NodePath },
}

/// The table of facade bindings for one document
#[derive(Debug, Default)]
pub(crate) struct FacadeTable {
    slots: Vec<Binding>,
    by_path: HashMap<NodePath, usize>,
}

impl FacadeTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get the live slot for a path, creating one if none exists.
    ///
    /// Paths are deduplicated: two facades for the same node share a slot,
    /// so they are invalidated together.
    pub(crate) fn register(&mut self, path: NodePath, generation: u64) -> usize {
        if let Some(&slot) = self.by_path.get(&path) {
            return slot;
        }
        let slot = self.slots.len();
        self.slots.push(Binding::Live { path, generation });
        self.by_path.insert(path, slot);
        slot
    }

    /// Resolve a slot to its current path, failing fast on forgotten slots.
    pub(crate) fn resolve(&self, slot: usize) -> Result<NodePath, StaleFacade> {
        match self.slots.get(slot) {
            Some(Binding::Live { path, .. }) => Ok(*path),
            Some(Binding::Forgotten { path }) => Err(StaleFacade::new(path.describe())),
            None => Err(StaleFacade::new(format!("unknown facade slot {}", slot))),
        }
    }

    /// Rebind after inserting `count` attributes at `index` in tag `tag`.
    ///
    /// Attribute bindings of that tag at `index` or later shift by `count`;
    /// everything else keeps its path. Bindings whose (possibly shifted)
    /// path does not exist in the new tree are forgotten.
    pub(crate) fn sweep_after_insert(
        &mut self,
        tree: &Tree,
        tag: usize,
        index: usize,
        count: usize,
        generation: u64,
    ) {
        self.sweep(tree, generation, |path| match path {
            NodePath::Attribute { tag: t, attr } if t == tag && attr >= index => {
                Some(NodePath::Attribute {
                    tag: t,
                    attr: attr + count,
                })
            }
            other => Some(other),
        });
    }

    /// Rebind after removing the attribute at `index` in tag `tag`.
    ///
    /// The removed attribute's binding is forgotten; later attributes of the
    /// same tag shift down by one.
    pub(crate) fn sweep_after_remove(
        &mut self,
        tree: &Tree,
        tag: usize,
        index: usize,
        generation: u64,
    ) {
        self.sweep(tree, generation, |path| match path {
            NodePath::Attribute { tag: t, attr } if t == tag && attr == index => None,
            NodePath::Attribute { tag: t, attr } if t == tag && attr > index => {
                Some(NodePath::Attribute {
                    tag: t,
                    attr: attr - 1,
                })
            }
            other => Some(other),
        });
    }

    fn sweep(
        &mut self,
        tree: &Tree,
        generation: u64,
        remap: impl Fn(NodePath) -> Option<NodePath>,
    ) {
        for slot in &mut self.slots {
            if let Binding::Live { path, .. } = slot {
                let old_path = *path;
                *slot = match remap(old_path) {
                    Some(new_path) if new_path.exists_in(tree) => Binding::Live {
                        path: new_path,
                        generation,
                    },
                    Some(new_path) => Binding::Forgotten { path: new_path },
                    None => Binding::Forgotten { path: old_path },
                };
            }
        }
        self.rebuild_index();
    }

    /// Forget every binding (re-parse failure or wholesale text replacement).
    pub(crate) fn forget_all(&mut self) {
        for slot in &mut self.slots {
            if let Binding::Live { path, .. } = slot {
                *slot = Binding::Forgotten { path: *path };
            }
        }
        self.by_path.clear();
    }

    fn rebuild_index(&mut self) {
        self.by_path.clear();
        for (slot, binding) in self.slots.iter().enumerate() {
            if let Binding::Live { path, .. } = binding {
                self.by_path.entry(*path).or_insert(slot);
            }
        }
    }

    #[cfg(test)]
    fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Binding::Live { .. }))
            .count()
    }
}
