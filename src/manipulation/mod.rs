//! The structural mutation engine
//!
//! Everything else in this crate is straightforward traversal or I/O; this
//! module is the part that has to keep three things consistent through an
//! edit: the source buffer, the immutable tree derived from it, and the
//! long-lived facades bound to tree nodes.
//!
//! An insertion runs through five stages, data flowing strictly forward:
//!
//!     resolve index -> compute anchor offset -> render fragment
//!         -> splice + re-parse + sweep -> project result facades
//!
//! The index resolver and position calculator live here, as does the splicer
//! ([`replace_text_range`]). Rendering is in [`writer`](crate::writer) and
//! the facade-level orchestration in [`facade`](crate::facade).

use std::fmt;
use std::ops::Range;

use crate::document::table::{FacadeTable, NodePath};
use crate::document::DocumentInner;
use crate::facade::StaleFacade;
use crate::parsing::{parse, ParseError, TagNode};

/// Errors that can occur during a structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The requested insertion index is outside the valid range.
    ///
    /// Recoverable: the caller corrects the index and retries. The engine
    /// never silently clamps.
    OutOfRange {
        /// The index that was requested
        index: usize,
        /// Current collection length; valid indices are `0..=length`
        length: usize,
    },
    /// The document no longer parsed after the splice.
    ///
    /// Terminal for this edit: the source buffer keeps the post-splice text
    /// and every facade is forgotten. The caller reloads a known-good state
    /// or repairs the text explicitly; there is no silent rollback.
    SpliceFailed { source: ParseError },
    /// An operation was attempted through a forgotten facade
    StaleFacade(StaleFacade),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::OutOfRange { index, length } => {
                write!(f, "index {} is out of range (valid range: 0..={})", index, length)
            }
            EditError::SpliceFailed { source } => {
                write!(f, "document failed to re-parse after splice: {}", source)
            }
            EditError::StaleFacade(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditError::SpliceFailed { source } => Some(source),
            EditError::StaleFacade(err) => Some(err),
            EditError::OutOfRange { .. } => None,
        }
    }
}

impl From<StaleFacade> for EditError {
    fn from(err: StaleFacade) -> Self {
        EditError::StaleFacade(err)
    }
}

/// Validate an insertion index against the current collection length.
///
/// Returns the index unchanged when `0 <= index <= length`. This is the
/// single gate keeping invalid splice positions out of the position
/// calculator; it has no side effects.
pub fn verify_and_get_index(index: usize, length: usize) -> Result<usize, EditError> {
    if index > length {
        Err(EditError::OutOfRange { index, length })
    } else {
        Ok(index)
    }
}

/// Byte offset at which attribute text must be spliced into a tag.
///
/// Index 0 anchors on the end of the tag's name token; any other index
/// anchors on the end of the preceding attribute. Anchors are recomputed
/// from the current tree immediately before each splice, so offsets stay
/// correct no matter how earlier edits shifted the text.
///
/// Callers must pass a verified index; an empty collection with index 0
/// resolves through the name-token rule.
pub(crate) fn attribute_insert_offset(tag: &TagNode, index: usize) -> usize {
    if index == 0 {
        tag.name_span.end
    } else {
        tag.attributes[index - 1].span.end
    }
}

/// Byte range to delete when removing the attribute at `index`.
///
/// Stretches back to the same anchor an insertion at `index` would use, so
/// removal is the exact textual inverse of insertion.
pub(crate) fn attribute_removal_range(tag: &TagNode, index: usize) -> Range<usize> {
    attribute_insert_offset(tag, index)..tag.attributes[index].span.end
}

/// Replace a byte range of the source buffer and re-parse.
///
/// On success the document holds the next tree generation; the caller is
/// responsible for sweeping the facade table against it. On re-parse
/// failure the buffer keeps the new text, every facade is forgotten, and
/// the edit fails with [`EditError::SpliceFailed`].
pub(crate) fn replace_text_range(
    inner: &mut DocumentInner,
    range: Range<usize>,
    new_text: &str,
) -> Result<(), EditError> {
    inner.text.replace_range(range, new_text);
    match parse(&inner.text) {
        Ok(tree) => {
            inner.tree = tree;
            inner.generation += 1;
            Ok(())
        }
        Err(source) => {
            inner.facades.forget_all();
            Err(EditError::SpliceFailed { source })
        }
    }
}

/// Project the freshly inserted attribute range onto facade slots.
///
/// Re-reads nothing from the old generation: the slots are registered
/// against the paths `[start, start + count)` in the new tree, one per
/// input structure, in input order.
pub(crate) fn attributes_to_return(
    facades: &mut FacadeTable,
    tag: usize,
    start: usize,
    count: usize,
    generation: u64,
) -> Vec<usize> {
    (start..start + count)
        .map(|attr| facades.register(NodePath::Attribute { tag, attr }, generation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse, Node};

    fn tag_of(source: &str) -> TagNode {
        match parse(source).unwrap().nodes.into_iter().next().unwrap() {
            Node::Tag(tag) => tag,
            other => panic!("expected a tag, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_index_accepts_bounds_inclusive() {
        assert_eq!(verify_and_get_index(0, 0).unwrap(), 0);
        assert_eq!(verify_and_get_index(0, 3).unwrap(), 0);
        assert_eq!(verify_and_get_index(3, 3).unwrap(), 3);
    }

    #[test]
    fn test_verify_index_rejects_past_length() {
        let err = verify_and_get_index(4, 3).unwrap_err();
        assert_eq!(err, EditError::OutOfRange { index: 4, length: 3 });
    }

    #[test]
    fn test_insert_offset_anchors_on_name_for_index_zero() {
        let tag = tag_of("<Foo>");
        assert_eq!(attribute_insert_offset(&tag, 0), 4);

        // Same rule with existing attributes present.
        let tag = tag_of("<Foo a b>");
        assert_eq!(attribute_insert_offset(&tag, 0), 4);
    }

    #[test]
    fn test_insert_offset_anchors_on_preceding_attribute() {
        let tag = tag_of("<Foo a b>");
        assert_eq!(attribute_insert_offset(&tag, 1), 6);
        assert_eq!(attribute_insert_offset(&tag, 2), 8);
    }

    #[test]
    fn test_removal_range_is_the_inverse_of_insertion() {
        let tag = tag_of("<Foo a c b>");
        // Removing "c" takes the separator back to the end of "a".
        assert_eq!(attribute_removal_range(&tag, 1), 6..8);
        // Removing the first attribute takes the separator back to the name.
        assert_eq!(attribute_removal_range(&tag, 0), 4..6);
    }
}
