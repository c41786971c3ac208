//! Node facades
//!
//! Facades are long-lived handles onto nodes of the current tree
//! generation. They never hold node data themselves; every accessor
//! resolves the facade's binding against the document first, so a facade
//! observed after a structural edit either follows its node to the new
//! generation or reports [`StaleFacade`].
//!
//! Attribute-bearing behavior lives on [`AttributeHolder`] so that any
//! future facade kind with an attribute list picks it up wholesale. The
//! trait is sealed; outside the crate it is read-and-call only.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::document::table::NodePath;
use crate::document::DocumentInner;
use crate::manipulation::{
    attribute_insert_offset, attribute_removal_range, attributes_to_return, replace_text_range,
    verify_and_get_index, EditError,
};
use crate::parsing::AttributeNode;
use crate::structures::AttributeStructure;
use crate::writer::{render_attributes, FormattingContext};

/// A facade was used after the node it was bound to left the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFacade {
    node: String,
}

impl StaleFacade {
    pub(crate) fn new(node: impl Into<String>) -> Self {
        Self { node: node.into() }
    }
}

impl fmt::Display for StaleFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "facade for {} is no longer bound to the current tree",
            self.node
        )
    }
}

impl std::error::Error for StaleFacade {}

mod sealed {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::document::DocumentInner;

    pub trait FacadeCore {
        fn document(&self) -> &Rc<RefCell<DocumentInner>>;
        fn slot(&self) -> usize;
    }
}

use sealed::FacadeCore;

/// Attribute-list capability for facades whose node carries attributes.
///
/// All operations resolve the holder first and fail fast with
/// [`StaleFacade`] if its binding is gone. Structural edits re-parse the
/// document and rebind surviving facades onto the new generation.
pub trait AttributeHolder: FacadeCore {
    /// Facades for every attribute, in source order.
    fn attributes(&self) -> Result<Vec<Attr>, StaleFacade> {
        let doc = Rc::clone(self.document());
        let slots = {
            let mut inner = doc.borrow_mut();
            let tag = inner.resolve_tag(self.slot())?;
            let count = inner.tag_node(tag)?.attributes.len();
            let generation = inner.generation;
            (0..count)
                .map(|attr| {
                    inner
                        .facades
                        .register(NodePath::Attribute { tag, attr }, generation)
                })
                .collect::<Vec<_>>()
        };
        Ok(slots
            .into_iter()
            .map(|slot| Attr::new(Rc::clone(&doc), slot))
            .collect())
    }

    /// Facade for the first attribute with the given name.
    fn attribute(&self, name: &str) -> Result<Option<Attr>, StaleFacade> {
        self.attribute_matching(|attr| attr.name == name)
    }

    /// Facade for the first attribute the predicate accepts.
    fn attribute_matching(
        &self,
        predicate: impl Fn(&AttributeNode) -> bool,
    ) -> Result<Option<Attr>, StaleFacade> {
        let doc = Rc::clone(self.document());
        let slot = {
            let mut inner = doc.borrow_mut();
            let tag = inner.resolve_tag(self.slot())?;
            let found = inner.tag_node(tag)?.attributes.iter().position(&predicate);
            let generation = inner.generation;
            found.map(|attr| {
                inner
                    .facades
                    .register(NodePath::Attribute { tag, attr }, generation)
            })
        };
        Ok(slot.map(|slot| Attr::new(Rc::clone(&doc), slot)))
    }

    /// Insert attributes at the given attribute index.
    ///
    /// `index` may equal the current attribute count, which appends. One
    /// facade per structure comes back, in input order, bound to the new
    /// tree generation. An empty slice is a no-op and returns an empty
    /// vector, but the index is still validated.
    fn insert_attributes(
        &self,
        index: usize,
        structures: &[AttributeStructure],
    ) -> Result<Vec<Attr>, EditError> {
        let doc = Rc::clone(self.document());
        let (tag, index, offset) = {
            let inner = doc.borrow();
            let tag = inner.resolve_tag(self.slot())?;
            let node = inner.tag_node(tag)?;
            let index = verify_and_get_index(index, node.attributes.len())?;
            (tag, index, attribute_insert_offset(node, index))
        };
        if structures.is_empty() {
            return Ok(Vec::new());
        }
        let rendered = format!(
            " {}",
            render_attributes(structures, FormattingContext::default())
        );
        let slots = {
            let mut inner = doc.borrow_mut();
            replace_text_range(&mut inner, offset..offset, &rendered)?;
            let generation = inner.generation;
            let DocumentInner { tree, facades, .. } = &mut *inner;
            facades.sweep_after_insert(tree, tag, index, structures.len(), generation);
            attributes_to_return(facades, tag, index, structures.len(), generation)
        };
        Ok(slots
            .into_iter()
            .map(|slot| Attr::new(Rc::clone(&doc), slot))
            .collect())
    }

    /// Insert a single attribute at the given attribute index.
    fn insert_attribute(
        &self,
        index: usize,
        structure: &AttributeStructure,
    ) -> Result<Attr, EditError> {
        let mut attrs = self.insert_attributes(index, std::slice::from_ref(structure))?;
        Ok(attrs
            .pop()
            .expect("one facade is returned per inserted structure"))
    }

    /// Append attributes after the current last attribute.
    fn add_attributes(&self, structures: &[AttributeStructure]) -> Result<Vec<Attr>, EditError> {
        let length = {
            let inner = self.document().borrow();
            let tag = inner.resolve_tag(self.slot())?;
            inner.tag_node(tag)?.attributes.len()
        };
        self.insert_attributes(length, structures)
    }

    /// Append a single attribute.
    fn add_attribute(&self, structure: &AttributeStructure) -> Result<Attr, EditError> {
        let length = {
            let inner = self.document().borrow();
            let tag = inner.resolve_tag(self.slot())?;
            inner.tag_node(tag)?.attributes.len()
        };
        self.insert_attribute(length, structure)
    }
}

/// Facade onto a tag node
#[derive(Clone)]
pub struct Tag {
    doc: Rc<RefCell<DocumentInner>>,
    slot: usize,
}

impl Tag {
    pub(crate) fn new(doc: Rc<RefCell<DocumentInner>>, slot: usize) -> Self {
        Self { doc, slot }
    }

    /// The tag's name.
    pub fn name(&self) -> Result<String, StaleFacade> {
        let inner = self.doc.borrow();
        let tag = inner.resolve_tag(self.slot)?;
        Ok(inner.tag_node(tag)?.name.clone())
    }

    /// Whether the tag is written in `<Name/>` form.
    pub fn is_self_closing(&self) -> Result<bool, StaleFacade> {
        let inner = self.doc.borrow();
        let tag = inner.resolve_tag(self.slot)?;
        Ok(inner.tag_node(tag)?.self_closing)
    }

    /// Byte span of the whole tag in the current buffer.
    pub fn span(&self) -> Result<Range<usize>, StaleFacade> {
        let inner = self.doc.borrow();
        let tag = inner.resolve_tag(self.slot)?;
        Ok(inner.tag_node(tag)?.span.clone())
    }

    /// Source text of the whole tag.
    pub fn text(&self) -> Result<String, StaleFacade> {
        let inner = self.doc.borrow();
        let tag = inner.resolve_tag(self.slot)?;
        let span = inner.tag_node(tag)?.span.clone();
        Ok(inner.text[span].to_string())
    }
}

impl FacadeCore for Tag {
    fn document(&self) -> &Rc<RefCell<DocumentInner>> {
        &self.doc
    }

    fn slot(&self) -> usize {
        self.slot
    }
}

impl AttributeHolder for Tag {}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Tag");
        match self.name() {
            Ok(name) => debug.field("name", &name),
            Err(_) => debug.field("stale", &true),
        };
        debug.finish()
    }
}

/// Facade onto an attribute node
#[derive(Clone)]
pub struct Attr {
    doc: Rc<RefCell<DocumentInner>>,
    slot: usize,
}

impl Attr {
    pub(crate) fn new(doc: Rc<RefCell<DocumentInner>>, slot: usize) -> Self {
        Self { doc, slot }
    }

    /// The attribute's name.
    pub fn name(&self) -> Result<String, StaleFacade> {
        let inner = self.doc.borrow();
        let (tag, attr) = inner.resolve_attribute(self.slot)?;
        Ok(inner.attribute_node(tag, attr)?.name.clone())
    }

    /// The initializer text including its delimiters, if present.
    pub fn initializer(&self) -> Result<Option<String>, StaleFacade> {
        let inner = self.doc.borrow();
        let (tag, attr) = inner.resolve_attribute(self.slot)?;
        Ok(inner
            .attribute_node(tag, attr)?
            .initializer
            .as_ref()
            .map(|init| init.text.clone()))
    }

    /// The attribute's index within its tag.
    pub fn index(&self) -> Result<usize, StaleFacade> {
        let inner = self.doc.borrow();
        let (_, attr) = inner.resolve_attribute(self.slot)?;
        Ok(attr)
    }

    /// Byte span of the attribute in the current buffer.
    pub fn span(&self) -> Result<Range<usize>, StaleFacade> {
        let inner = self.doc.borrow();
        let (tag, attr) = inner.resolve_attribute(self.slot)?;
        Ok(inner.attribute_node(tag, attr)?.span.clone())
    }

    /// Source text of the attribute.
    pub fn text(&self) -> Result<String, StaleFacade> {
        let inner = self.doc.borrow();
        let (tag, attr) = inner.resolve_attribute(self.slot)?;
        let span = inner.attribute_node(tag, attr)?.span.clone();
        Ok(inner.text[span].to_string())
    }

    /// Remove the attribute from its tag.
    ///
    /// The removed span covers the attribute and the separator before it,
    /// which makes removal the exact inverse of insertion at the same
    /// index. Later attribute facades of the same tag shift down by one.
    pub fn remove(self) -> Result<(), EditError> {
        let (tag, index, range) = {
            let inner = self.doc.borrow();
            let (tag, attr) = inner.resolve_attribute(self.slot)?;
            let node = inner.tag_node(tag)?;
            (tag, attr, attribute_removal_range(node, attr))
        };
        let mut inner = self.doc.borrow_mut();
        replace_text_range(&mut inner, range, "")?;
        let generation = inner.generation;
        let DocumentInner { tree, facades, .. } = &mut *inner;
        facades.sweep_after_remove(tree, tag, index, generation);
        Ok(())
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Attr");
        match self.name() {
            Ok(name) => debug.field("name", &name),
            Err(_) => debug.field("stale", &true),
        };
        debug.finish()
    }
}
