// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shell script generation from a parsed [`Method`](crate::ast::Method).
//!
//! One compilation produces a primary script plus zero or more extracted
//! block scripts. See [`generate`] for the entry point and the `shell`
//! module for the emission rules.

#[cfg(test)]
mod property_tests;
mod shell;

pub use shell::generate;

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use crate::parse::Span;

/// One generated shell script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// The script's file name: the mangled method selector, or a
    /// `<selector>~block<N>` name for an extracted block.
    pub name: EcoString,
    /// The script source, newline-separated lines.
    pub contents: String,
}

impl Script {
    /// Creates a new script.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, contents: String) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }
}

/// The complete output of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMethod {
    /// The method's own script.
    pub primary: Script,
    /// Extracted block scripts, in extraction order.
    pub blocks: Vec<Script>,
}

impl CompiledMethod {
    /// Iterates over every generated script, primary first.
    pub fn scripts(&self) -> impl Iterator<Item = &Script> {
        std::iter::once(&self.primary).chain(self.blocks.iter())
    }
}

/// An unsupported-feature error raised during code generation.
///
/// Code generation is all-or-nothing: any of these aborts the
/// compilation with no partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CodeGenError {
    /// A string or symbol literal was used as a value.
    #[error("{kind} literals are not supported as values")]
    #[diagnostic(
        code(smalltix::codegen::unsupported_literal),
        help("only integer and float literals can be used as values")
    )]
    UnsupportedLiteral {
        /// The literal kind: "string" or "symbol".
        kind: &'static str,
        /// Location of the literal.
        #[label("unsupported literal")]
        span: Span,
    },

    /// Assignment to a name that is not a temporary, parameter, or
    /// instance variable.
    #[error("cannot assign to `{name}`")]
    #[diagnostic(
        code(smalltix::codegen::invalid_assignment),
        help("`self`, `true`/`false`/`nil`, and globals are not assignable")
    )]
    InvalidAssignment {
        /// The rejected assignment target.
        name: EcoString,
        /// Location of the assignment.
        #[label("assigned here")]
        span: Span,
    },

    /// An expression form appeared in a position the generator cannot
    /// translate. Unreachable for parser-produced ASTs.
    #[error("{construct} is not supported in this position")]
    #[diagnostic(code(smalltix::codegen::unsupported_expression))]
    UnsupportedExpression {
        /// Description of the offending construct.
        construct: &'static str,
        /// Location of the expression.
        #[label("here")]
        span: Span,
    },
}
