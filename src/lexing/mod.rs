//! Lexing for the markup format
//!
//! The lexer turns source text into a flat sequence of `(Token, Range<usize>)`
//! pairs. Byte ranges always index into the original source, so every later
//! stage (tree building, position calculation, splicing) can recover the
//! exact source text of a token.

pub mod tokens;

use std::fmt;
use std::ops::Range;

use logos::Logos;

pub use tokens::Token;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// An opening brace with no balancing close brace
    UnbalancedBrace { offset: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnbalancedBrace { offset } => {
                write!(f, "unbalanced brace at byte offset {}", offset)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize source text into `(Token, byte range)` pairs.
///
/// Whitespace tokens are kept: the parser needs them to separate attributes,
/// and text runs are reassembled from the spans of whatever tokens they cover.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            // The only rule that can reject input is the braced-expression callback.
            Err(()) => return Err(LexError::UnbalancedBrace { offset: span.start }),
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spans_cover_the_source() {
        let source = "<Foo a=\"b\">text</Foo>";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.first().unwrap().1.start, 0);
        assert_eq!(tokens.last().unwrap().1.end, source.len());

        // Spans are contiguous: no gaps, no overlaps.
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].1.end, pair[1].1.start);
        }
    }

    #[test]
    fn test_tokenize_reports_unbalanced_brace() {
        let err = tokenize("ab {oops").unwrap_err();
        assert_eq!(err, LexError::UnbalancedBrace { offset: 3 });
    }

    #[test]
    fn test_tokenize_empty_source() {
        assert_eq!(tokenize("").unwrap(), Vec::new());
    }
}
