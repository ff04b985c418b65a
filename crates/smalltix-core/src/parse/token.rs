// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Smalltix lexical analysis.
//!
//! A token pairs a [`TokenKind`] with the [`Span`] it occupies in the
//! source text. Whitespace and `"..."` comments are skipped by the lexer
//! and never appear in the token stream.
//!
//! # Smalltalk Syntax Coverage
//!
//! Tokens cover the full single-method message syntax:
//! - Unary messages: `object message`
//! - Binary messages: `3 + 4`
//! - Keyword messages: `array at: 1 put: value`
//! - Blocks: `[ :x | x + 1 ]`
//! - Cascades: `coll add: 1; add: 2; yourself`

use ecow::EcoString;

use super::Span;

/// The kind of token, not including source location.
///
/// Tokens are designed to be cheap to clone (using [`EcoString`] for
/// string data).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier: `foo`, `myVariable`, `Array`
    Identifier(EcoString),

    /// An integer literal: `42`, `-17`
    Integer(EcoString),

    /// A floating-point literal: `3.14`, `-0.5`
    Float(EcoString),

    /// A single-quoted string: `'hello world'` (with `''` as escaped quote)
    String(EcoString),

    /// A symbol literal: `#foo`, `#'hello world'`
    Symbol(EcoString),

    // === Message Selectors ===
    /// A keyword selector part: `at:`, `put:`, `ifTrue:`
    ///
    /// Invariant: the stored text always ends with `:`.
    Keyword(EcoString),

    /// A binary selector: `+`, `-`, `*`, `<=`, `~=`, etc.
    BinarySelector(EcoString),

    /// A block parameter declaration: `:each` in `[ :each | ... ]`
    ///
    /// The stored text is the bare name, without the leading colon.
    BlockParameter(EcoString),

    // === Delimiters ===
    /// Left parenthesis: `(`
    LeftParen,

    /// Right parenthesis: `)`
    RightParen,

    /// Left bracket (block start): `[`
    LeftBracket,

    /// Right bracket (block end): `]`
    RightBracket,

    // === Punctuation ===
    /// Assignment operator: `:=`
    Assign,

    /// Return operator: `^`
    Caret,

    /// Cascade separator: `;`
    Semicolon,

    /// Statement separator: `.`
    Period,

    /// Temporary/parameter list delimiter: `|`
    Pipe,

    // === Special ===
    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is a literal value.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Float(_) | Self::String(_) | Self::Symbol(_)
        )
    }

    /// Returns `true` if this token is an identifier.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Returns `true` if this token is a message selector component.
    #[must_use]
    pub const fn is_selector(&self) -> bool {
        matches!(self, Self::Keyword(_) | Self::BinarySelector(_))
    }

    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns the string content if this token carries one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Identifier(s)
            | Self::Integer(s)
            | Self::Float(s)
            | Self::String(s)
            | Self::Symbol(s)
            | Self::Keyword(s)
            | Self::BinarySelector(s)
            | Self::BlockParameter(s) => Some(s),
            Self::LeftParen
            | Self::RightParen
            | Self::LeftBracket
            | Self::RightBracket
            | Self::Assign
            | Self::Caret
            | Self::Semicolon
            | Self::Period
            | Self::Pipe
            | Self::Eof => None,
        }
    }

    /// A short human-readable description, used in parse errors.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "an identifier",
            Self::Integer(_) => "an integer literal",
            Self::Float(_) => "a float literal",
            Self::String(_) => "a string literal",
            Self::Symbol(_) => "a symbol literal",
            Self::Keyword(_) => "a keyword selector",
            Self::BinarySelector(_) => "a binary selector",
            Self::BlockParameter(_) => "a block parameter",
            Self::LeftParen => "'('",
            Self::RightParen => "')'",
            Self::LeftBracket => "'['",
            Self::RightBracket => "']'",
            Self::Assign => "':='",
            Self::Caret => "'^'",
            Self::Semicolon => "';'",
            Self::Period => "'.'",
            Self::Pipe => "'|'",
            Self::Eof => "end of input",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::Integer(s)
            | Self::Float(s)
            | Self::Keyword(s)
            | Self::BinarySelector(s) => write!(f, "{s}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Symbol(s) => write!(f, "#{s}"),
            Self::BlockParameter(s) => write!(f, ":{s}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Assign => write!(f, ":="),
            Self::Caret => write!(f, "^"),
            Self::Semicolon => write!(f, ";"),
            Self::Period => write!(f, "."),
            Self::Pipe => write!(f, "|"),
            Self::Eof => write!(f, "<eof>"),
        }
    }
}

/// A token with its source location.
///
/// # Examples
///
/// ```
/// use smalltix_core::parse::{Token, TokenKind, Span};
///
/// let token = Token::new(TokenKind::Identifier("foo".into()), Span::new(0, 3));
/// assert!(matches!(token.kind(), TokenKind::Identifier(_)));
/// assert_eq!(token.span().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the kind of this token.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Consumes the token and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> TokenKind {
        self.kind
    }

    /// Returns the source span of this token.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::Identifier("foo".into()).to_string(), "foo");
        assert_eq!(TokenKind::Integer("42".into()).to_string(), "42");
        assert_eq!(TokenKind::String("hello".into()).to_string(), "'hello'");
        assert_eq!(TokenKind::Symbol("sym".into()).to_string(), "#sym");
        assert_eq!(TokenKind::Keyword("at:".into()).to_string(), "at:");
        assert_eq!(TokenKind::BinarySelector("+".into()).to_string(), "+");
        assert_eq!(TokenKind::BlockParameter("each".into()).to_string(), ":each");
        assert_eq!(TokenKind::Assign.to_string(), ":=");
        assert_eq!(TokenKind::Caret.to_string(), "^");
        assert_eq!(TokenKind::Eof.to_string(), "<eof>");
    }

    #[test]
    fn token_kind_predicates() {
        assert!(TokenKind::Integer("1".into()).is_literal());
        assert!(TokenKind::Symbol("sym".into()).is_literal());
        assert!(!TokenKind::Identifier("x".into()).is_literal());

        assert!(TokenKind::Identifier("foo".into()).is_identifier());
        assert!(!TokenKind::Keyword("at:".into()).is_identifier());

        assert!(TokenKind::Keyword("at:".into()).is_selector());
        assert!(TokenKind::BinarySelector("+".into()).is_selector());
        assert!(!TokenKind::Pipe.is_selector());

        assert!(TokenKind::Eof.is_eof());
        assert!(!TokenKind::Period.is_eof());
    }

    #[test]
    fn token_kind_as_str() {
        assert_eq!(TokenKind::Identifier("foo".into()).as_str(), Some("foo"));
        assert_eq!(TokenKind::Keyword("at:".into()).as_str(), Some("at:"));
        assert_eq!(TokenKind::BlockParameter("x".into()).as_str(), Some("x"));
        assert_eq!(TokenKind::LeftParen.as_str(), None);
        assert_eq!(TokenKind::Eof.as_str(), None);
    }

    #[test]
    fn token_creation_and_accessors() {
        let token = Token::new(TokenKind::Identifier("foo".into()), Span::new(0, 3));
        assert!(matches!(token.kind(), TokenKind::Identifier(s) if s == "foo"));
        assert_eq!(token.span().start(), 0);
        assert_eq!(token.span().end(), 3);
    }
}
