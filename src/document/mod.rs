//! Document ownership and lifecycle
//!
//! A [`Document`] owns the source buffer, the current tree generation, and
//! the facade binding table. The buffer is invariant-bound: at all times it
//! is a syntactically complete document (the constructor and every splice
//! enforce this by parsing). All mutation goes through the manipulation
//! engine; nothing else touches the buffer.
//!
//! Documents are single-threaded. Facades share the underlying state
//! through `Rc<RefCell<_>>`; callers serialize structural edits themselves.

pub(crate) mod table;

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::facade::{StaleFacade, Tag};
use crate::host::{FileSystemHost, HostError};
use crate::parsing::{parse, AttributeNode, ParseError, TagNode, Tree};

use table::{FacadeTable, NodePath};

/// Shared state behind every document and facade handle
pub(crate) struct DocumentInner {
    /// The source buffer: full text of the document
    pub(crate) text: String,
    /// Current tree generation, always derived from `text`
    pub(crate) tree: Tree,
    /// Generation counter, bumped by every successful re-parse
    pub(crate) generation: u64,
    /// Facade binding table
    pub(crate) facades: FacadeTable,
}

impl DocumentInner {
    pub(crate) fn resolve_tag(&self, slot: usize) -> Result<usize, StaleFacade> {
        match self.facades.resolve(slot)? {
            NodePath::Tag(tag) => Ok(tag),
            path => Err(StaleFacade::new(path.describe())),
        }
    }

    pub(crate) fn resolve_attribute(&self, slot: usize) -> Result<(usize, usize), StaleFacade> {
        match self.facades.resolve(slot)? {
            NodePath::Attribute { tag, attr } => Ok((tag, attr)),
            path => Err(StaleFacade::new(path.describe())),
        }
    }

    /// Tag node for a resolved tag index.
    ///
    /// Resolution validates paths against the current tree, so a miss here
    /// means the facade went stale between resolve and access.
    pub(crate) fn tag_node(&self, tag: usize) -> Result<&TagNode, StaleFacade> {
        self.tree
            .tag(tag)
            .ok_or_else(|| StaleFacade::new(NodePath::Tag(tag).describe()))
    }

    pub(crate) fn attribute_node(
        &self,
        tag: usize,
        attr: usize,
    ) -> Result<&AttributeNode, StaleFacade> {
        self.tag_node(tag)?
            .attributes
            .get(attr)
            .ok_or_else(|| StaleFacade::new(NodePath::Attribute { tag, attr }.describe()))
    }
}

/// A parsed markup document with structural editing support
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
    /// Parse source text into a document.
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        let tree = parse(&text)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                text,
                tree,
                generation: 0,
                facades: FacadeTable::new(),
            })),
        })
    }

    /// Read and parse a document through a file system host.
    pub fn from_path(host: &dyn FileSystemHost, path: &Path) -> Result<Self, LoadError> {
        let text = host.read_file(path)?;
        Ok(Self::parse(text)?)
    }

    /// Persist the current source buffer through a file system host.
    pub fn save(&self, host: &mut dyn FileSystemHost, path: &Path) -> Result<(), HostError> {
        host.write_file(path, &self.inner.borrow().text)
    }

    /// The full current text of the source buffer.
    ///
    /// After a failed splice this is the post-splice (possibly malformed)
    /// text; see [`set_text`](Self::set_text) for the reload path.
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// The current tree generation number.
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// A clone of the current parse tree generation.
    pub fn tree(&self) -> Tree {
        self.inner.borrow().tree.clone()
    }

    /// Replace the whole document text and re-parse.
    ///
    /// This is the explicit recovery path after a `SpliceFailed` edit: every
    /// outstanding facade is forgotten, whether or not the new text parses.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), ParseError> {
        let text = text.into();
        let tree = parse(&text)?;
        let mut inner = self.inner.borrow_mut();
        inner.facades.forget_all();
        inner.text = text;
        inner.tree = tree;
        inner.generation += 1;
        Ok(())
    }

    /// Number of attribute-owning tags in the document.
    pub fn tag_count(&self) -> usize {
        self.inner.borrow().tree.tag_count()
    }

    /// Facades for every attribute-owning tag, in source order.
    pub fn tags(&self) -> Vec<Tag> {
        let mut inner = self.inner.borrow_mut();
        let count = inner.tree.tag_count();
        let generation = inner.generation;
        let slots: Vec<usize> = (0..count)
            .map(|tag| inner.facades.register(NodePath::Tag(tag), generation))
            .collect();
        drop(inner);
        slots
            .into_iter()
            .map(|slot| Tag::new(Rc::clone(&self.inner), slot))
            .collect()
    }

    /// Facade for the tag at the given tag index.
    pub fn tag(&self, index: usize) -> Option<Tag> {
        let mut inner = self.inner.borrow_mut();
        if inner.tree.tag(index).is_none() {
            return None;
        }
        let generation = inner.generation;
        let slot = inner.facades.register(NodePath::Tag(index), generation);
        drop(inner);
        Some(Tag::new(Rc::clone(&self.inner), slot))
    }

    /// Facade for the first tag with the given name, if any.
    pub fn find_tag(&self, name: &str) -> Option<Tag> {
        let inner = self.inner.borrow();
        let found = inner.tree.tags().position(|tag| tag.name == name);
        drop(inner);
        found.and_then(|index| self.tag(index))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("generation", &inner.generation)
            .field("text", &inner.text)
            .finish()
    }
}

/// Errors that can occur when loading a document through a host
#[derive(Debug)]
pub enum LoadError {
    /// The host failed to provide the file
    Host(HostError),
    /// The file contents did not parse
    Parse(ParseError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Host(err) => write!(f, "host error: {}", err),
            LoadError::Parse(err) => write!(f, "parse error: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Host(err) => Some(err),
            LoadError::Parse(err) => Some(err),
        }
    }
}

impl From<HostError> for LoadError {
    fn from(err: HostError) -> Self {
        LoadError::Host(err)
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        LoadError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_read_back_text() {
        let doc = Document::parse("<Foo bar>").unwrap();
        assert_eq!(doc.text(), "<Foo bar>");
        assert_eq!(doc.generation(), 0);
        assert_eq!(doc.tag_count(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(Document::parse("<Foo").is_err());
    }

    #[test]
    fn test_tag_lookup() {
        let doc = Document::parse("<a/><b/>text").unwrap();
        assert_eq!(doc.tag(0).unwrap().name().unwrap(), "a");
        assert_eq!(doc.tag(1).unwrap().name().unwrap(), "b");
        assert!(doc.tag(2).is_none());
    }

    #[test]
    fn test_find_tag_returns_first_match() {
        let doc = Document::parse("<a x/><b/><a y/>").unwrap();
        let tag = doc.find_tag("a").unwrap();
        assert_eq!(tag.text().unwrap(), "<a x/>");
        assert!(doc.find_tag("missing").is_none());
    }

    #[test]
    fn test_find_tag_hands_back_an_editable_facade() {
        use crate::facade::AttributeHolder;
        use crate::structures::AttributeStructure;

        let doc = Document::parse("<a/><b/>").unwrap();
        let tag = doc.find_tag("b").unwrap();
        tag.insert_attribute(0, &AttributeStructure::new("x"))
            .unwrap();
        assert_eq!(doc.text(), "<a/><b x/>");
    }

    #[test]
    fn test_set_text_forgets_all_facades() {
        let mut doc = Document::parse("<Foo bar>").unwrap();
        let tag = doc.tag(0).unwrap();
        doc.set_text("<Other>").unwrap();
        assert!(tag.name().is_err());
        assert_eq!(doc.generation(), 1);
        assert_eq!(doc.find_tag("Other").unwrap().name().unwrap(), "Other");
    }

    #[test]
    fn test_facades_for_the_same_node_share_invalidation() {
        let mut doc = Document::parse("<Foo>").unwrap();
        let first = doc.tag(0).unwrap();
        let second = doc.tag(0).unwrap();
        doc.set_text("<Foo>").unwrap();
        assert!(first.name().is_err());
        assert!(second.name().is_err());
    }
}
