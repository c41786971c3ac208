//! tagedit - structural editing for tag-based markup documents
//!
//! The crate parses a flat stream of tags, closing tags, and text into a
//! positioned tree, then lets callers edit attribute lists structurally:
//! describe the attributes to add as plain data, and the engine computes
//! the byte position, splices the source text, re-parses, and hands back
//! live handles onto the new tree.
//!
//! ## Quick tour
//!
//! ```ignore
//! use tagedit::{AttributeHolder, AttributeStructure, Document};
//!
//! let doc = Document::parse("<Foo a b>")?;
//! let tag = doc.find_tag("Foo").unwrap();
//! tag.insert_attribute(1, &AttributeStructure::new("c"))?;
//! assert_eq!(doc.text(), "<Foo a c b>");
//! ```
//!
//! ## Layout
//!
//! - [`lexing`] / [`parsing`]: source text to positioned tree
//! - [`structures`]: plain-data descriptions of attributes to insert
//! - [`writer`]: deterministic rendering of structures to text
//! - [`manipulation`]: index validation, position calculation, splicing
//! - [`document`] / [`facade`]: buffer ownership and live node handles
//! - [`host`]: file system boundary
//! - [`snapshot`]: serializable view of a parsed tree

pub mod document;
pub mod facade;
pub mod host;
pub mod lexing;
pub mod manipulation;
pub mod parsing;
pub mod snapshot;
pub mod structures;
pub mod writer;

pub use document::{Document, LoadError};
pub use facade::{Attr, AttributeHolder, StaleFacade, Tag};
pub use host::{FileSystemHost, HostError, InMemoryFileSystemHost, RealFileSystemHost};
pub use manipulation::{verify_and_get_index, EditError};
pub use parsing::{parse, ParseError, Tree};
pub use snapshot::{
    snapshot_from_document, snapshot_from_tree, AttributeSnapshot, DocumentSnapshot, NodeSnapshot,
};
pub use structures::{is_valid_attribute_name, AttributeStructure};
pub use writer::{render_attributes, CodeWriter, FormattingContext};
