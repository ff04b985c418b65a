// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Converts an AST back into canonical Smalltix source text.
//!
//! The generated shell scripts carry their originating source as a
//! comment header; extracted block scripts need the same header but have
//! no dedicated source file, so their headers are rebuilt from the AST.
//!
//! Unparsing is precedence-aware: parentheses are inserted exactly where
//! re-parsing would otherwise bind differently, so
//! `parse(unparse(parse(s)))` always equals `parse(s)` up to spans.

use std::fmt::Write;

use crate::ast::{Block, CascadeMessage, Expression, Literal, Method, MessageSelector};

/// Binding strength of an expression when re-parsed.
///
/// Higher binds tighter. Used to decide where parentheses are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    /// Assignment, cascade, keyword send.
    Statement,
    /// Binary send chain.
    Binary,
    /// Unary send chain.
    Unary,
    /// Literal, variable, block, parenthesized expression.
    Primary,
}

fn precedence(expr: &Expression) -> Precedence {
    match expr {
        Expression::Literal(..) | Expression::Variable(_) | Expression::Block(_) => {
            Precedence::Primary
        }
        Expression::MessageSend { selector, .. } => match selector {
            MessageSelector::Unary(_) => Precedence::Unary,
            MessageSelector::Binary(_) => Precedence::Binary,
            MessageSelector::Keyword(_) => Precedence::Statement,
        },
        Expression::Assignment { .. } | Expression::Cascade { .. } | Expression::Return { .. } => {
            Precedence::Statement
        }
    }
}

/// Renders a complete method as one line of canonical source.
#[must_use]
pub fn unparse_method(method: &Method) -> String {
    let mut out = String::new();
    write_pattern(&mut out, method);
    if !method.temporaries.is_empty() {
        out.push_str(" |");
        for temp in &method.temporaries {
            out.push(' ');
            out.push_str(&temp.name);
        }
        out.push_str(" |");
    }
    for statement in &method.body {
        out.push(' ');
        write_expression(&mut out, statement, Precedence::Statement);
        out.push_str(" .");
    }
    out
}

/// Renders a single expression as canonical source.
#[must_use]
pub fn unparse_expression(expr: &Expression) -> String {
    let mut out = String::new();
    write_expression(&mut out, expr, Precedence::Statement);
    out
}

/// Renders a block's statements (no brackets, parameters, or temporaries).
#[must_use]
pub fn unparse_block_body(block: &Block) -> String {
    let mut out = String::new();
    for (i, statement) in block.body.iter().enumerate() {
        if i > 0 {
            out.push_str(" . ");
        }
        write_expression(&mut out, statement, Precedence::Statement);
    }
    out
}

fn write_pattern(out: &mut String, method: &Method) {
    match &method.selector {
        MessageSelector::Unary(name) => out.push_str(name),
        MessageSelector::Binary(op) => {
            out.push_str(op);
            out.push(' ');
            out.push_str(&method.parameters[0].name);
        }
        MessageSelector::Keyword(parts) => {
            for (part, param) in parts.iter().zip(&method.parameters) {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(part);
                out.push(' ');
                out.push_str(&param.name);
            }
        }
    }
}

/// Writes `expr`, parenthesizing if it binds looser than `required`.
fn write_expression(out: &mut String, expr: &Expression, required: Precedence) {
    let needs_parens = precedence(expr) < required;
    if needs_parens {
        out.push('(');
    }
    match expr {
        Expression::Literal(literal, _) => write_literal(out, literal),
        Expression::Variable(id) => out.push_str(&id.name),
        Expression::Assignment { target, value, .. } => {
            out.push_str(&target.name);
            out.push_str(" := ");
            write_expression(out, value, Precedence::Statement);
        }
        Expression::MessageSend {
            receiver,
            selector,
            arguments,
            ..
        } => write_send(out, receiver, selector, arguments),
        Expression::Cascade {
            receiver, messages, ..
        } => write_cascade(out, receiver, messages),
        Expression::Return { value, .. } => {
            out.push_str("^ ");
            write_expression(out, value, Precedence::Statement);
        }
        Expression::Block(block) => write_block(out, block),
    }
    if needs_parens {
        out.push(')');
    }
}

fn write_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Integer(text) | Literal::Float(text) => out.push_str(text),
        Literal::String(text) => {
            out.push('\'');
            for ch in text.chars() {
                if ch == '\'' {
                    out.push('\'');
                }
                out.push(ch);
            }
            out.push('\'');
        }
        Literal::Symbol(text) => {
            let _ = write!(out, "#{text}");
        }
    }
}

fn write_send(
    out: &mut String,
    receiver: &Expression,
    selector: &MessageSelector,
    arguments: &[Expression],
) {
    match selector {
        MessageSelector::Unary(name) => {
            write_expression(out, receiver, Precedence::Unary);
            out.push(' ');
            out.push_str(name);
        }
        MessageSelector::Binary(op) => {
            write_expression(out, receiver, Precedence::Binary);
            out.push(' ');
            out.push_str(op);
            out.push(' ');
            write_expression(out, &arguments[0], Precedence::Unary);
        }
        MessageSelector::Keyword(parts) => {
            write_expression(out, receiver, Precedence::Binary);
            for (part, arg) in parts.iter().zip(arguments) {
                out.push(' ');
                out.push_str(part);
                out.push(' ');
                write_expression(out, arg, Precedence::Binary);
            }
        }
    }
}

fn write_cascade(out: &mut String, receiver: &Expression, messages: &[CascadeMessage]) {
    write_expression(out, receiver, Precedence::Binary);
    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        match &message.selector {
            MessageSelector::Unary(name) => {
                out.push(' ');
                out.push_str(name);
            }
            MessageSelector::Binary(op) => {
                out.push(' ');
                out.push_str(op);
                out.push(' ');
                write_expression(out, &message.arguments[0], Precedence::Unary);
            }
            MessageSelector::Keyword(parts) => {
                for (part, arg) in parts.iter().zip(&message.arguments) {
                    out.push(' ');
                    out.push_str(part);
                    out.push(' ');
                    write_expression(out, arg, Precedence::Binary);
                }
            }
        }
    }
}

fn write_block(out: &mut String, block: &Block) {
    out.push('[');
    for param in &block.parameters {
        let _ = write!(out, " :{}", param.name);
    }
    if !block.parameters.is_empty() {
        out.push_str(" |");
    }
    if !block.temporaries.is_empty() {
        out.push_str(" |");
        for temp in &block.temporaries {
            out.push(' ');
            out.push_str(&temp.name);
        }
        out.push_str(" |");
    }
    for (i, statement) in block.body.iter().enumerate() {
        out.push_str(if i > 0 { " . " } else { " " });
        write_expression(out, statement, Precedence::Statement);
    }
    out.push_str(" ]");
}
