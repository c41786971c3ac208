//! Structured text writer
//!
//! Renders sequences of structure descriptors into formatted source text.
//! The writer is deterministic by construction: the same descriptor sequence
//! and formatting context always yield byte-identical output, which the
//! round-trip and idempotence tests rely on.
//!
//! The pieces compose the way the format requires: a structure writer knows
//! how to render one descriptor, and a separator combinator renders a whole
//! sequence with the configured separator between entries and no trailing
//! separator. For attribute lists the separator is a single space.

use crate::structures::AttributeStructure;

/// Formatting context for a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingContext {
    /// Current indentation depth
    pub indent_level: usize,
    /// Text written once per indentation level at the start of a line
    pub indent_unit: String,
}

impl Default for FormattingContext {
    fn default() -> Self {
        Self {
            indent_level: 0,
            indent_unit: "    ".to_string(),
        }
    }
}

impl FormattingContext {
    /// Context with the given indentation depth and the default unit
    pub fn indented(indent_level: usize) -> Self {
        Self {
            indent_level,
            ..Self::default()
        }
    }
}

/// Accumulating text writer with indentation support
///
/// Indentation is queued rather than written eagerly: it is emitted in front
/// of the next fragment written after a newline, so blank lines stay blank.
#[derive(Debug)]
pub struct CodeWriter {
    out: String,
    context: FormattingContext,
    at_line_start: bool,
}

impl CodeWriter {
    /// Create a writer with the default formatting context
    pub fn new() -> Self {
        Self::with_context(FormattingContext::default())
    }

    /// Create a writer with an explicit formatting context
    pub fn with_context(context: FormattingContext) -> Self {
        Self {
            out: String::new(),
            context,
            at_line_start: false,
        }
    }

    /// Write a text fragment, emitting queued indentation first
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.context.indent_level {
                self.out.push_str(&self.context.indent_unit);
            }
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    /// Write a single space separator
    pub fn space(&mut self) {
        self.write(" ");
    }

    /// End the current line and queue indentation for the next one
    pub fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Borrow the accumulated text
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume the writer and return the accumulated text
    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders one structure descriptor into a writer
pub trait StructureToText {
    /// The descriptor type this writer renders
    type Structure;

    /// Render one descriptor
    fn write_structure(&self, writer: &mut CodeWriter, structure: &Self::Structure);
}

/// Renders an [`AttributeStructure`] as `name` or `name=initializer`
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeStructureToText;

impl StructureToText for AttributeStructureToText {
    type Structure = AttributeStructure;

    fn write_structure(&self, writer: &mut CodeWriter, structure: &AttributeStructure) {
        writer.write(&structure.name);
        if let Some(initializer) = &structure.initializer {
            writer.write("=");
            writer.write(initializer);
        }
    }
}

/// Renders a descriptor sequence separated by single spaces
///
/// No separator is written before the first entry or after the last one;
/// rendering an empty sequence writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSeparated<W>(pub W);

impl<W: StructureToText> SpaceSeparated<W> {
    /// Render all descriptors in order
    pub fn write_all(&self, writer: &mut CodeWriter, structures: &[W::Structure]) {
        for (i, structure) in structures.iter().enumerate() {
            if i > 0 {
                writer.space();
            }
            self.0.write_structure(writer, structure);
        }
    }
}

/// Render an attribute descriptor sequence to a text fragment.
///
/// Convenience entry point used by the insertion pipeline.
pub fn render_attributes(structures: &[AttributeStructure], context: FormattingContext) -> String {
    let mut writer = CodeWriter::with_context(context);
    SpaceSeparated(AttributeStructureToText).write_all(&mut writer, structures);
    writer.finish()
}
