// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Smalltix method source.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written for maximum control over the small disambiguation rules
//! Smalltalk syntax needs:
//!
//! - `-` starts a number only when immediately followed by a digit,
//!   otherwise it begins a binary selector run.
//! - `.` is a decimal point only when immediately followed by a digit,
//!   otherwise it is the statement separator.
//! - An identifier immediately followed by `:` (but not `:=`) is a
//!   keyword selector part.
//! - `:` immediately followed by a letter is a block parameter.
//!
//! Whitespace and `"..."` comments are skipped, not tokenized. Lexing is
//! all-or-nothing: the first unrecognized character aborts with a
//! [`LexError`] carrying its exact source offset.
//!
//! # Example
//!
//! ```
//! use smalltix_core::parse::{lex, TokenKind};
//!
//! let tokens = lex("x + 1").unwrap();
//! assert_eq!(tokens.len(), 4); // x, +, 1, <eof>
//! assert!(tokens[3].kind().is_eof());
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::error::LexError;
use super::{Span, Token, TokenKind};

/// Characters that may appear in a binary selector run.
const fn is_binary_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '\\' | '<' | '>' | '=' | '@' | '%' | '&' | '?' | ',' | '~'
    )
}

/// A lexer that tokenizes Smalltix method source.
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    position: usize,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            position: 0,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks at the character after the next one.
    fn peek_char_second(&self) -> Option<char> {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    /// Creates a span from start to current position.
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.current_position())
    }

    /// Extracts source text for a span.
    fn text_for(&self, span: Span) -> &'src str {
        &self.source[span.as_range()]
    }

    /// Skips whitespace and `"..."` comments.
    ///
    /// A comment left open at end of input simply consumes the rest of
    /// the source, matching the statement-level grammar where a trailing
    /// comment carries no semantic weight.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance_while(char::is_whitespace);
                }
                Some('"') => {
                    self.advance(); // opening quote
                    self.advance_while(|c| c != '"');
                    self.advance(); // closing quote (or end of input)
                }
                _ => break,
            }
        }
    }

    /// Lexes the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for any character outside the recognized
    /// classes.
    pub fn lex_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let start = self.current_position();
        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => self.lex_token_kind(c, start)?,
        };

        Ok(Token::new(kind, self.span_from(start)))
    }

    /// Lexes a token kind based on the first character.
    fn lex_token_kind(&mut self, c: char, start: u32) -> Result<TokenKind, LexError> {
        let kind = match c {
            'a'..='z' | 'A'..='Z' | '_' => self.lex_identifier_or_keyword(),

            '0'..='9' => self.lex_number(),

            '\'' => self.lex_string(),

            '#' => self.lex_symbol(start)?,

            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            '[' => {
                self.advance();
                TokenKind::LeftBracket
            }
            ']' => {
                self.advance();
                TokenKind::RightBracket
            }
            '^' => {
                self.advance();
                TokenKind::Caret
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '.' => {
                self.advance();
                TokenKind::Period
            }
            '|' => {
                self.advance();
                TokenKind::Pipe
            }

            ':' => self.lex_colon(start)?,

            c if is_binary_char(c) => self.lex_binary_selector(),

            _ => {
                self.advance();
                return Err(LexError::unexpected_char(c, self.span_from(start)));
            }
        };
        Ok(kind)
    }

    /// Lexes an identifier or keyword selector part.
    fn lex_identifier_or_keyword(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        // An identifier immediately followed by a colon is a keyword part,
        // unless the colon starts `:=` (assignment to the identifier).
        if self.peek_char() == Some(':') && self.peek_char_second() != Some('=') {
            self.advance(); // consume the colon
            let text = self.text_for(self.span_from(start));
            TokenKind::Keyword(EcoString::from(text))
        } else {
            let text = self.text_for(self.span_from(start));
            TokenKind::Identifier(EcoString::from(text))
        }
    }

    /// Lexes an integer or float literal, with the leading `-` (if any)
    /// already confirmed to precede a digit.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.current_position();

        if self.peek_char() == Some('-') {
            self.advance();
        }
        self.advance_while(|c| c.is_ascii_digit());

        // A decimal point only when immediately followed by a digit;
        // otherwise the dot is the statement separator.
        let is_float = if self.peek_char() == Some('.')
            && self.peek_char_second().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // consume '.'
            self.advance_while(|c| c.is_ascii_digit());
            true
        } else {
            false
        };

        let text = self.text_for(self.span_from(start));
        if is_float {
            TokenKind::Float(EcoString::from(text))
        } else {
            TokenKind::Integer(EcoString::from(text))
        }
    }

    /// Lexes a single-quoted string literal with `''` escapes.
    ///
    /// An unterminated string consumes the rest of the source as content.
    fn lex_string(&mut self) -> TokenKind {
        let start = self.current_position();
        self.advance(); // opening quote

        loop {
            match self.peek_char() {
                None => break,
                Some('\'') => {
                    if self.peek_char_second() == Some('\'') {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        let content_span = Span::new(start + 1, self.current_position());
        self.advance(); // closing quote (or end of input)

        let content = self.text_for(content_span).replace("''", "'");
        TokenKind::String(EcoString::from(content))
    }

    /// Lexes a symbol literal: `#name` or `#'quoted symbol'`.
    fn lex_symbol(&mut self, start: u32) -> Result<TokenKind, LexError> {
        self.advance(); // #

        match self.peek_char() {
            Some('\'') => {
                self.advance(); // opening quote
                let content_start = self.current_position();
                self.advance_while(|c| c != '\'');
                let content_span = Span::new(content_start, self.current_position());
                self.advance(); // closing quote (or end of input)
                let content = self.text_for(content_span);
                Ok(TokenKind::Symbol(EcoString::from(content)))
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name_start = self.current_position();
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
                let name = self.text_for(self.span_from(name_start));
                Ok(TokenKind::Symbol(EcoString::from(name)))
            }
            _ => Err(LexError::unexpected_char('#', self.span_from(start))),
        }
    }

    /// Lexes the token starting with `:` — either `:=` or a block parameter.
    fn lex_colon(&mut self, start: u32) -> Result<TokenKind, LexError> {
        self.advance(); // :
        match self.peek_char() {
            Some('=') => {
                self.advance();
                Ok(TokenKind::Assign)
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name_start = self.current_position();
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let name = self.text_for(self.span_from(name_start));
                Ok(TokenKind::BlockParameter(EcoString::from(name)))
            }
            _ => Err(LexError::unexpected_char(':', self.span_from(start))),
        }
    }

    /// Lexes a binary selector: a maximal run of operator characters.
    ///
    /// `-` immediately followed by a digit is a negative number instead.
    fn lex_binary_selector(&mut self) -> TokenKind {
        if self.peek_char() == Some('-')
            && self.peek_char_second().is_some_and(|c| c.is_ascii_digit())
        {
            return self.lex_number();
        }

        let start = self.current_position();
        self.advance_while(is_binary_char);
        let text = self.text_for(self.span_from(start));
        TokenKind::BinarySelector(EcoString::from(text))
    }
}

/// Lexes source into a vector of tokens terminated by an EOF token.
///
/// The EOF token's span sits at the final source offset.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no partial token stream
/// is produced.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex_token()?;
        let is_eof = token.kind().is_eof();
        tokens.push(token);
        if is_eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to lex and extract just the token kinds (EOF dropped).
    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let tokens = lex(source).expect("lexes cleanly");
        let mut kinds: Vec<_> = tokens.into_iter().map(Token::into_kind).collect();
        assert_eq!(kinds.pop(), Some(TokenKind::Eof));
        kinds
    }

    #[test]
    fn lex_empty() {
        assert!(lex_kinds("").is_empty());
        assert!(lex_kinds("   ").is_empty());
        assert!(lex_kinds("\"just a comment\"").is_empty());
    }

    #[test]
    fn lex_identifiers() {
        assert_eq!(
            lex_kinds("foo bar Baz _private x1"),
            vec![
                TokenKind::Identifier("foo".into()),
                TokenKind::Identifier("bar".into()),
                TokenKind::Identifier("Baz".into()),
                TokenKind::Identifier("_private".into()),
                TokenKind::Identifier("x1".into()),
            ]
        );
    }

    #[test]
    fn lex_keywords() {
        assert_eq!(
            lex_kinds("at: put: ifTrue:"),
            vec![
                TokenKind::Keyword("at:".into()),
                TokenKind::Keyword("put:".into()),
                TokenKind::Keyword("ifTrue:".into()),
            ]
        );
    }

    #[test]
    fn lex_keyword_vs_assignment() {
        // `x:= 1` must lex as identifier + assign, not keyword `x:`.
        assert_eq!(
            lex_kinds("x:= 1"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Assign,
                TokenKind::Integer("1".into()),
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        assert_eq!(
            lex_kinds("42 0 3.14 -17 -0.5"),
            vec![
                TokenKind::Integer("42".into()),
                TokenKind::Integer("0".into()),
                TokenKind::Float("3.14".into()),
                TokenKind::Integer("-17".into()),
                TokenKind::Float("-0.5".into()),
            ]
        );
    }

    #[test]
    fn lex_dot_is_separator_unless_decimal() {
        // `3.` is integer then statement separator, `3.5` is a float.
        assert_eq!(
            lex_kinds("3. 3.5."),
            vec![
                TokenKind::Integer("3".into()),
                TokenKind::Period,
                TokenKind::Float("3.5".into()),
                TokenKind::Period,
            ]
        );
    }

    #[test]
    fn lex_minus_disambiguation() {
        // `-` is part of a number only when directly followed by a digit.
        assert_eq!(
            lex_kinds("3 - 4"),
            vec![
                TokenKind::Integer("3".into()),
                TokenKind::BinarySelector("-".into()),
                TokenKind::Integer("4".into()),
            ]
        );
        assert_eq!(
            lex_kinds("x - y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::BinarySelector("-".into()),
                TokenKind::Identifier("y".into()),
            ]
        );
    }

    #[test]
    fn lex_strings() {
        assert_eq!(
            lex_kinds("'hello' ''"),
            vec![
                TokenKind::String("hello".into()),
                TokenKind::String("".into()),
            ]
        );
    }

    #[test]
    fn lex_string_with_escaped_quote() {
        assert_eq!(lex_kinds("'it''s'"), vec![TokenKind::String("it's".into())]);
    }

    #[test]
    fn lex_symbols() {
        assert_eq!(
            lex_kinds("#foo #at:put: #'hello world'"),
            vec![
                TokenKind::Symbol("foo".into()),
                TokenKind::Symbol("at:put:".into()),
                TokenKind::Symbol("hello world".into()),
            ]
        );
    }

    #[test]
    fn lex_punctuation() {
        assert_eq!(
            lex_kinds(":= ^ ; . | ( ) [ ]"),
            vec![
                TokenKind::Assign,
                TokenKind::Caret,
                TokenKind::Semicolon,
                TokenKind::Period,
                TokenKind::Pipe,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn lex_binary_selectors() {
        assert_eq!(
            lex_kinds("+ * <= >= == ~= @ ,"),
            vec![
                TokenKind::BinarySelector("+".into()),
                TokenKind::BinarySelector("*".into()),
                TokenKind::BinarySelector("<=".into()),
                TokenKind::BinarySelector(">=".into()),
                TokenKind::BinarySelector("==".into()),
                TokenKind::BinarySelector("~=".into()),
                TokenKind::BinarySelector("@".into()),
                TokenKind::BinarySelector(",".into()),
            ]
        );
    }

    #[test]
    fn lex_block_parameters() {
        assert_eq!(
            lex_kinds("[ :each :i | each ]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::BlockParameter("each".into()),
                TokenKind::BlockParameter("i".into()),
                TokenKind::Pipe,
                TokenKind::Identifier("each".into()),
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn lex_message_send() {
        assert_eq!(
            lex_kinds("array at: 1 put: value"),
            vec![
                TokenKind::Identifier("array".into()),
                TokenKind::Keyword("at:".into()),
                TokenKind::Integer("1".into()),
                TokenKind::Keyword("put:".into()),
                TokenKind::Identifier("value".into()),
            ]
        );
    }

    #[test]
    fn lex_skips_comments() {
        assert_eq!(
            lex_kinds("x \"a note\" y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Identifier("y".into()),
            ]
        );
    }

    #[test]
    fn lex_spans_are_correct() {
        let tokens = lex("foo bar").unwrap();
        assert_eq!(tokens[0].span().start(), 0);
        assert_eq!(tokens[0].span().end(), 3);
        assert_eq!(tokens[1].span().start(), 4);
        assert_eq!(tokens[1].span().end(), 7);
    }

    #[test]
    fn lex_eof_carries_final_offset() {
        let tokens = lex("abc ").unwrap();
        let eof = tokens.last().unwrap();
        assert!(eof.kind().is_eof());
        assert_eq!(eof.span().start(), 4);
    }

    #[test]
    fn lex_error_unknown_char() {
        let err = lex("x § y").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character '§'");
        assert_eq!(err.span.start(), 2);
    }

    #[test]
    fn lex_error_bare_colon() {
        // A colon not starting `:=` or a block parameter is unrecognized.
        let err = lex("x : 1").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character ':'");
    }

    #[test]
    fn lex_error_bare_hash() {
        assert!(lex("# 1").is_err());
    }
}
