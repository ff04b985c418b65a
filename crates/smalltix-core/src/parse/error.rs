// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for lexing and parsing.
//!
//! Errors carry source locations ([`Span`]) for precise diagnostics.
//! They integrate with [`miette`] for annotated error reporting.

use miette::Diagnostic;
use thiserror::Error;

use super::{Span, TokenKind};

/// A lexical error encountered during tokenization.
///
/// Lexing is all-or-nothing: the first unrecognized character aborts the
/// compilation with one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("unexpected character {character:?}")]
#[diagnostic(code(smalltix::lex))]
pub struct LexError {
    /// The character outside every recognized class.
    pub character: char,
    /// The source location of the error.
    #[label("here")]
    pub span: Span,
}

impl LexError {
    /// Creates an "unexpected character" error.
    #[must_use]
    pub const fn unexpected_char(character: char, span: Span) -> Self {
        Self { character, span }
    }
}

/// A structural error encountered during parsing.
///
/// Parsing aborts at the first structural mismatch; no partial AST is
/// handed to the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// A specific token kind was required and something else appeared.
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(smalltix::parse::unexpected_token))]
    UnexpectedToken {
        /// Description of the expected token.
        expected: &'static str,
        /// The token actually found.
        found: TokenKind,
        /// Location of the offending token.
        #[label("found {found} here")]
        span: Span,
    },

    /// The method did not begin with a unary, binary, or keyword pattern.
    #[error("expected a message pattern, found {found}")]
    #[diagnostic(
        code(smalltix::parse::missing_pattern),
        help("a method starts with its selector: `name`, `+ arg`, or `key: arg`")
    )]
    MissingMessagePattern {
        /// The token actually found.
        found: TokenKind,
        /// Location of the offending token.
        #[label("here")]
        span: Span,
    },

    /// A `;` cascade followed an expression that is not a message send.
    #[error("cascade requires a preceding message send")]
    #[diagnostic(
        code(smalltix::parse::cascade_receiver),
        help("only `receiver message; more; ...` can be cascaded")
    )]
    CascadeWithoutSend {
        /// Location of the semicolon.
        #[label("`;` here")]
        span: Span,
    },

    /// A block or parenthesized expression reached end of input unclosed.
    #[error("unterminated {construct}")]
    #[diagnostic(code(smalltix::parse::unterminated))]
    Unterminated {
        /// What was left open: "block" or "parenthesized expression".
        construct: &'static str,
        /// Location where the construct opened.
        #[label("opened here")]
        span: Span,
    },
}

impl ParseError {
    /// Creates an "expected X, found Y" error.
    #[must_use]
    pub const fn unexpected(expected: &'static str, found: TokenKind, span: Span) -> Self {
        Self::UnexpectedToken {
            expected,
            found,
            span,
        }
    }
}
