//! Tree snapshots - a normalized serializable view of a parsed document
//!
//! Snapshots flatten the tree into plain serde structs so callers can dump
//! a document's structure to JSON (or any serde format) without walking
//! nodes themselves. Spans are carried as `[start, end)` byte offsets into
//! the text the snapshot was taken from.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::parsing::{InitializerKind, Node, Tree};

/// Snapshot of a whole document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub generation: u64,
    pub nodes: Vec<NodeSnapshot>,
}

/// Snapshot of one top-level node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Tag {
        name: String,
        span: (usize, usize),
        self_closing: bool,
        attributes: Vec<AttributeSnapshot>,
    },
    Closing {
        name: String,
        span: (usize, usize),
    },
    Text {
        span: (usize, usize),
        text: String,
    },
}

/// Snapshot of one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub name: String,
    pub span: (usize, usize),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<InitializerSnapshot>,
}

/// Snapshot of an attribute initializer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializerSnapshot {
    pub kind: String,
    pub text: String,
}

/// Take a snapshot of a document's current tree generation.
pub fn snapshot_from_document(document: &Document) -> DocumentSnapshot {
    DocumentSnapshot {
        generation: document.generation(),
        nodes: snapshot_nodes(&document.tree()),
    }
}

/// Take a snapshot of a bare tree (generation reported as zero).
pub fn snapshot_from_tree(tree: &Tree) -> DocumentSnapshot {
    DocumentSnapshot {
        generation: 0,
        nodes: snapshot_nodes(tree),
    }
}

fn snapshot_nodes(tree: &Tree) -> Vec<NodeSnapshot> {
    tree.nodes
        .iter()
        .map(|node| match node {
            Node::Tag(tag) => NodeSnapshot::Tag {
                name: tag.name.clone(),
                span: (tag.span.start, tag.span.end),
                self_closing: tag.self_closing,
                attributes: tag
                    .attributes
                    .iter()
                    .map(|attr| AttributeSnapshot {
                        name: attr.name.clone(),
                        span: (attr.span.start, attr.span.end),
                        initializer: attr.initializer.as_ref().map(|init| InitializerSnapshot {
                            kind: match init.kind {
                                InitializerKind::String => "string".to_string(),
                                InitializerKind::Expression => "expression".to_string(),
                            },
                            text: init.text.clone(),
                        }),
                    })
                    .collect(),
            },
            Node::Closing(closing) => NodeSnapshot::Closing {
                name: closing.name.clone(),
                span: (closing.span.start, closing.span.end),
            },
            Node::Text(text) => NodeSnapshot::Text {
                span: (text.span.start, text.span.end),
                text: text.text.clone(),
            },
        })
        .collect()
}
