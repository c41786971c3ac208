//! Token definitions for the markup format
//!
//! All tokens are defined with the logos derive macro. The lexer is run over
//! the whole document; the parser decides from context whether a token is tag
//! structure or plain text content (any token other than `TagOpen` and
//! `CloseTagOpen` can appear inside a text run).
//!
//! Braced expressions (`{...}`) are matched as a single token by a callback
//! that scans for the balancing close brace. An unbalanced open brace is the
//! only way tokenization can fail.

use logos::{Lexer, Logos};

/// All possible tokens in the markup format
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Start of a closing tag: `</`
    #[token("</")]
    CloseTagOpen,

    /// Start of an opening or self-closing tag: `<`
    #[token("<")]
    TagOpen,

    /// End of a self-closing tag: `/>`
    #[token("/>")]
    SelfCloseEnd,

    /// End of an opening or closing tag: `>`
    #[token(">")]
    TagEnd,

    /// Attribute initializer marker
    #[token("=")]
    Equals,

    /// Tag or attribute name
    #[regex(r"[A-Za-z_][A-Za-z0-9_.:-]*", priority = 3)]
    Name,

    /// Quoted string literal (double or single quotes, no escapes)
    #[regex(r#""[^"]*""#, priority = 5)]
    #[regex(r"'[^']*'", priority = 5)]
    StringLiteral,

    /// Balanced braced expression: `{...}`
    #[token("{", lex_braced_expression)]
    BracedExpression,

    /// Runs of spaces, tabs, and newlines
    #[regex(r"[ \t\r\n]+", priority = 2)]
    Whitespace,

    /// Any other single character outside the rules above (text content)
    #[regex(r"[^<]", priority = 0)]
    Other,
}

/// Consume up to and including the `}` balancing the already-matched `{`.
///
/// Returns false when the remainder of the input runs out before the brace is
/// balanced, which makes logos report an error token at the `{` position.
fn lex_braced_expression(lex: &mut Lexer<Token>) -> bool {
    let mut depth = 1usize;
    for (i, byte) in lex.remainder().bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    lex.bump(i + 1);
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

impl Token {
    /// Check if this token starts a tag of either kind
    pub fn starts_tag(&self) -> bool {
        matches!(self, Token::TagOpen | Token::CloseTagOpen)
    }

    /// Check if this token is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .map(|result| result.expect("unexpected lex error"))
            .collect()
    }

    #[test]
    fn test_open_tag_tokens() {
        assert_eq!(
            lex_all("<Foo bar>"),
            vec![
                Token::TagOpen,
                Token::Name,
                Token::Whitespace,
                Token::Name,
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_self_closing_tag_tokens() {
        assert_eq!(
            lex_all("<Foo/>"),
            vec![Token::TagOpen, Token::Name, Token::SelfCloseEnd]
        );
    }

    #[test]
    fn test_closing_tag_tokens() {
        assert_eq!(
            lex_all("</Foo>"),
            vec![Token::CloseTagOpen, Token::Name, Token::TagEnd]
        );
    }

    #[test]
    fn test_string_initializer_tokens() {
        assert_eq!(
            lex_all(r#"<a b="c">"#),
            vec![
                Token::TagOpen,
                Token::Name,
                Token::Whitespace,
                Token::Name,
                Token::Equals,
                Token::StringLiteral,
                Token::TagEnd,
            ]
        );
    }

    #[test]
    fn test_braced_expression_is_one_token() {
        assert_eq!(
            lex_all("{a { b } c}"),
            vec![Token::BracedExpression]
        );
    }

    #[test]
    fn test_braced_expression_spans_include_braces() {
        let mut lexer = Token::lexer("x{1 + 2}y");
        assert_eq!(lexer.next(), Some(Ok(Token::Name)));
        assert_eq!(lexer.next(), Some(Ok(Token::BracedExpression)));
        assert_eq!(lexer.span(), 1..8);
        assert_eq!(lexer.next(), Some(Ok(Token::Name)));
    }

    #[test]
    fn test_unbalanced_brace_is_an_error() {
        let results: Vec<_> = Token::lexer("{never closed").collect();
        assert!(results.iter().any(|r| r.is_err()));
    }

    #[test]
    fn test_text_content_lexes_without_errors() {
        let tokens = lex_all("plain text, punctuation! & more\n");
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| !t.starts_tag()));
    }
}
