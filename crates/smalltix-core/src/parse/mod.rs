// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing for Smalltix method source.
//!
//! The parsing pipeline has two stages:
//!
//! 1. **Lexing** ([`lex`]): source text to a flat token stream
//! 2. **Parsing** ([`parse_method`]): token stream to a [`Method`] AST
//!
//! Both stages are fail-fast: the first lexical or structural error
//! aborts compilation, so the code generator only ever sees a complete,
//! well-formed AST.
//!
//! # Example
//!
//! ```
//! use smalltix_core::parse::parse_source;
//!
//! let method = parse_source("double ^ self + self .").unwrap();
//! assert_eq!(method.selector.name(), "double");
//! ```

mod error;
mod lexer;
mod parser;
#[cfg(test)]
mod property_tests;
mod span;
mod token;

pub use error::{LexError, ParseError};
pub use lexer::{Lexer, lex};
pub use parser::parse_method;
pub use span::Span;
pub use token::{Token, TokenKind};

use crate::ast::Method;
use crate::error::Error;

/// Lexes and parses a complete method from source text.
///
/// # Errors
///
/// Returns the first [`LexError`] or [`ParseError`] encountered.
pub fn parse_source(source: &str) -> Result<Method, Error> {
    let tokens = lex(source)?;
    let method = parse_method(tokens)?;
    Ok(method)
}
