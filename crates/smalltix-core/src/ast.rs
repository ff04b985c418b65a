// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Smalltix method source.
//!
//! The AST represents one parsed method. Nodes are immutable once built
//! and carry a [`Span`] for error reporting.
//!
//! # Message Sending
//!
//! Smalltix follows Smalltalk's message precedence:
//!
//! 1. **Unary messages**: `object message` (highest precedence)
//! 2. **Binary messages**: `3 + 4` (left-to-right, no operator precedence)
//! 3. **Keyword messages**: `array at: 1 put: 2` (lowest precedence)
//!
//! # Example
//!
//! ```ignore
//! // Source: x := 3 + 4
//! Expression::Assignment {
//!     target: Identifier { name: "x".into(), span: ... },
//!     value: Box::new(Expression::MessageSend {
//!         receiver: Box::new(Expression::Literal(Literal::Integer("3".into()), ...)),
//!         selector: MessageSelector::Binary("+".into()),
//!         arguments: vec![Expression::Literal(Literal::Integer("4".into()), ...)],
//!         span: ...
//!     }),
//!     span: ...
//! }
//! ```

use ecow::EcoString;

use crate::parse::Span;

/// A literal value.
///
/// Literal text is kept verbatim from the source; the code generator
/// re-emits it with a numeric-kind tag and never needs the parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// An integer literal: `42`, `-17`
    Integer(EcoString),

    /// A floating-point literal: `3.14`, `-0.5`
    Float(EcoString),

    /// A string literal (single-quoted in source): `'hello'`
    ///
    /// Parsed but not supported as a value by the code generator.
    String(EcoString),

    /// A symbol literal: `#foo`, `#'with spaces'`
    ///
    /// Parsed but not supported as a value by the code generator.
    Symbol(EcoString),
}

impl Literal {
    /// The literal kind name used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
        }
    }
}

/// An identifier (variable name, parameter, or global).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The name of the identifier.
    pub name: EcoString,
    /// Source location.
    pub span: Span,
}

impl Identifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A message selector (method name).
///
/// The three selector forms correspond to the three precedence levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageSelector {
    /// A unary message (no arguments): `size`
    Unary(EcoString),

    /// A binary message (one argument, operator syntax): `+`
    Binary(EcoString),

    /// A keyword message (one argument per part): `at:put:`
    ///
    /// Invariant: non-empty, and every part ends with `:`.
    Keyword(Vec<EcoString>),
}

impl MessageSelector {
    /// Returns the full selector name.
    ///
    /// For keyword messages this concatenates all parts: `at:put:`.
    #[must_use]
    pub fn name(&self) -> EcoString {
        match self {
            Self::Unary(name) | Self::Binary(name) => name.clone(),
            Self::Keyword(parts) => {
                let mut result = String::new();
                for part in parts {
                    result.push_str(part);
                }
                result.into()
            }
        }
    }

    /// Returns the selector as a filesystem/command-safe token, with
    /// every `:` replaced by `-` (`at:put:` becomes `at-put-`).
    ///
    /// The dispatcher invokes this token as an executable name, so it
    /// must not contain colons.
    #[must_use]
    pub fn mangled(&self) -> EcoString {
        match self {
            Self::Unary(name) | Self::Binary(name) => name.clone(),
            Self::Keyword(parts) => {
                let mut result = String::new();
                for part in parts {
                    result.push_str(part.strip_suffix(':').unwrap_or(part));
                    result.push('-');
                }
                result.into()
            }
        }
    }

    /// Returns the number of arguments this selector expects.
    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 0,
            Self::Binary(_) => 1,
            Self::Keyword(parts) => parts.len(),
        }
    }
}

/// A Smalltix expression.
///
/// Statements are expressions; `^ expr` is the only statement-level
/// construct and is itself an expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(Literal, Span),

    /// A variable reference.
    Variable(Identifier),

    /// An assignment: `name := value`.
    Assignment {
        /// The variable being assigned to.
        target: Identifier,
        /// The value being assigned.
        value: Box<Expression>,
        /// Source location of the entire assignment.
        span: Span,
    },

    /// A message send.
    MessageSend {
        /// The receiver of the message.
        receiver: Box<Expression>,
        /// The message selector.
        selector: MessageSelector,
        /// Arguments, in source order.
        ///
        /// Invariant: `arguments.len() == selector.arity()`.
        arguments: Vec<Expression>,
        /// Source location of the entire send.
        span: Span,
    },

    /// A cascade: multiple messages to one receiver.
    ///
    /// The receiver is factored out of the first message, so the first
    /// cascaded message's receiver is never itself a send node.
    Cascade {
        /// The receiver (evaluated once).
        receiver: Box<Expression>,
        /// The messages, in source order. Invariant: non-empty.
        messages: Vec<CascadeMessage>,
        /// Source location of the entire cascade.
        span: Span,
    },

    /// An explicit return: `^ value`.
    Return {
        /// The value being returned.
        value: Box<Expression>,
        /// Source location of the return statement.
        span: Span,
    },

    /// A block literal: `[ :x | x + 1 ]`.
    Block(Block),
}

impl Expression {
    /// Returns the span of this expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Literal(_, span)
            | Self::Assignment { span, .. }
            | Self::MessageSend { span, .. }
            | Self::Cascade { span, .. }
            | Self::Return { span, .. } => *span,
            Self::Variable(id) => id.span,
            Self::Block(block) => block.span,
        }
    }

    /// Returns `true` if this expression is a message send.
    ///
    /// Only sends qualify as cascade receivers.
    #[must_use]
    pub const fn is_message_send(&self) -> bool {
        matches!(self, Self::MessageSend { .. })
    }
}

/// A message in a cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeMessage {
    /// The message selector.
    pub selector: MessageSelector,
    /// Arguments to the message.
    pub arguments: Vec<Expression>,
    /// Source location of this message in the cascade.
    pub span: Span,
}

impl CascadeMessage {
    /// Creates a new cascade message.
    #[must_use]
    pub fn new(selector: MessageSelector, arguments: Vec<Expression>, span: Span) -> Self {
        Self {
            selector,
            arguments,
            span,
        }
    }
}

/// A block literal (closure).
///
/// The raw source span of the body is retained so the code generator can
/// reproduce the block text verbatim when the block is compiled into its
/// own script.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block parameters, in declaration order.
    pub parameters: Vec<Identifier>,
    /// Block temporaries, in declaration order.
    pub temporaries: Vec<Identifier>,
    /// The statements in the block body.
    pub body: Vec<Expression>,
    /// Source span of the body: after parameters/temporaries, before `]`.
    pub body_span: Span,
    /// Source location of the entire block (including brackets).
    pub span: Span,
}

impl Block {
    /// Returns the number of parameters.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A parsed method: the top-level unit, exactly one per compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// The method selector, from the message pattern.
    pub selector: MessageSelector,
    /// Formal parameters, from the message pattern.
    ///
    /// Invariant: `parameters.len() == selector.arity()`.
    pub parameters: Vec<Identifier>,
    /// Declared temporaries: `| t1 t2 |`.
    pub temporaries: Vec<Identifier>,
    /// The statements in the method body.
    pub body: Vec<Expression>,
    /// Source location spanning the entire method.
    pub span: Span,
}
