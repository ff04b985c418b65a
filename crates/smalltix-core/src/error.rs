// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The unified compilation error type.

use miette::Diagnostic;
use thiserror::Error;

use crate::codegen::CodeGenError;
use crate::parse::{LexError, ParseError};

/// Any failure a compilation can produce.
///
/// All three stages are fail-fast and terminal: a method either compiles
/// completely or produces no output at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Error {
    /// An unrecognized character in the source text.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    /// A structural mismatch in the token stream.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// An unsupported feature reached the code generator.
    #[error(transparent)]
    #[diagnostic(transparent)]
    CodeGen(#[from] CodeGenError),
}
