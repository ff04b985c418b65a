// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Smalltix compiler core.
//!
//! This crate contains the core compiler functionality:
//! - Lexical analysis (tokenization)
//! - Parsing (AST construction)
//! - Code generation (shell script output)
//!
//! The compiler translates one Smalltalk-style method into executable
//! scripts for a runtime where every object is a directory, every
//! instance variable is a file, and every method is a script invoked
//! through the `./send` dispatcher. Block literals are compiled into
//! sibling scripts with explicit captured-variable bindings, since the
//! target execution model has no shared call stack.
//!
//! # Example
//!
//! ```
//! let compiled = smalltix_core::compile("double ^ self + self .").unwrap();
//! assert_eq!(compiled.primary.name, "double");
//! assert!(compiled.primary.contents.ends_with("./send $self + $self"));
//! ```

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod codegen;
pub mod error;
pub mod parse;
pub mod unparse;

pub use error::Error;

use codegen::CompiledMethod;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Identifier, Literal, Method, MessageSelector};
    pub use crate::codegen::{CompiledMethod, Script};
    pub use crate::parse::Span;
}

/// Compiles one method from source text to its shell scripts.
///
/// Runs the full pipeline: lexing, parsing, code generation. Each stage
/// completes fully before the next begins, and the first failure in any
/// stage aborts the compilation with no output.
///
/// # Errors
///
/// Returns the first [`Error`] raised by any stage.
pub fn compile(source: &str) -> Result<CompiledMethod, Error> {
    let method = parse::parse_source(source)?;
    let compiled = codegen::generate(&method, source)?;
    Ok(compiled)
}
