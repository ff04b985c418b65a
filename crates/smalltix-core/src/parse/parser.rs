// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Smalltix method source.
//!
//! The parser consumes the token stream produced by [`super::lex`] and
//! builds exactly one [`Method`] AST. It uses one token of lookahead,
//! plus one extra token to detect assignment (`name := ...`).
//!
//! # Message Precedence
//!
//! Tightest-binding first:
//!
//! 1. **Primary**: literal, variable, `( expr )`, or block literal
//! 2. **Unary sends**: `obj size` (left-associative chain)
//! 3. **Binary sends**: `3 + 4` (left-associative, no operator ranking)
//! 4. **Keyword sends**: `a at: 1 put: 2` (never chains)
//! 5. **Cascade**: `recv m1; m2; m3`
//! 6. **Assignment**: `name := expr` (right-associative)
//!
//! # Failure Policy
//!
//! Any structural mismatch aborts immediately with a [`ParseError`]; no
//! partial AST is ever handed to the code generator.

use crate::ast::{
    Block, CascadeMessage, Expression, Identifier, Literal, Method, MessageSelector,
};

use super::error::ParseError;
use super::{Span, Token, TokenKind};

/// Parses a token stream into a [`Method`].
///
/// The stream must be terminated by an EOF token, as produced by
/// [`super::lex`].
///
/// # Errors
///
/// Returns a [`ParseError`] on the first structural mismatch.
///
/// # Examples
///
/// ```
/// use smalltix_core::parse::{lex, parse_method};
///
/// let tokens = lex("double ^ self + self .").unwrap();
/// let method = parse_method(tokens).unwrap();
/// assert_eq!(method.selector.name(), "double");
/// assert_eq!(method.body.len(), 1);
/// ```
pub fn parse_method(tokens: Vec<Token>) -> Result<Method, ParseError> {
    Parser::new(tokens).parse_method()
}

/// The parser state.
struct Parser {
    /// The tokens being parsed, EOF-terminated.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(tokens.last().is_some_and(|t| t.kind().is_eof()));
        Self { tokens, current: 0 }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Returns the current token, falling back to the trailing EOF token.
    fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is EOF-terminated"))
    }

    /// Returns the token `offset` positions ahead of the current one.
    fn peek(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.current + offset)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is EOF-terminated"))
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    /// Returns `true` if the current token matches the given kind exactly.
    fn check(&self, kind: &TokenKind) -> bool {
        self.current_token().kind() == kind
    }

    /// Consumes the current token if it matches, otherwise errors.
    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.current_token();
            Err(ParseError::unexpected(
                expected,
                token.kind().clone(),
                token.span(),
            ))
        }
    }

    /// Consumes an identifier token, otherwise errors.
    fn expect_identifier(&mut self, expected: &'static str) -> Result<Identifier, ParseError> {
        let token = self.current_token();
        if let TokenKind::Identifier(name) = token.kind() {
            let id = Identifier::new(name.clone(), token.span());
            self.advance();
            Ok(id)
        } else {
            Err(ParseError::unexpected(
                expected,
                token.kind().clone(),
                token.span(),
            ))
        }
    }

    // ========================================================================
    // Method structure
    // ========================================================================

    /// Parses a complete method: message pattern, temporaries, statements.
    ///
    /// The message pattern is required even when the selector duplicates
    /// the output file name, because it declares the parameter names.
    fn parse_method(&mut self) -> Result<Method, ParseError> {
        let start_span = self.current_token().span();
        let (selector, parameters) = self.parse_message_pattern()?;
        let temporaries = self.parse_temporaries()?;
        let body = self.parse_statements()?;

        let end = self.current_token().clone();
        if !end.kind().is_eof() {
            return Err(ParseError::unexpected(
                "'.' or end of input",
                end.kind().clone(),
                end.span(),
            ));
        }

        Ok(Method {
            selector,
            parameters,
            temporaries,
            body,
            span: start_span.merge(end.span()),
        })
    }

    /// Parses the message pattern: unary, binary, or keyword form.
    fn parse_message_pattern(&mut self) -> Result<(MessageSelector, Vec<Identifier>), ParseError> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((MessageSelector::Unary(name.clone()), Vec::new()))
            }
            TokenKind::BinarySelector(op) => {
                self.advance();
                let param = self.expect_identifier("a parameter name")?;
                Ok((MessageSelector::Binary(op.clone()), vec![param]))
            }
            TokenKind::Keyword(_) => {
                let mut parts = Vec::new();
                let mut parameters = Vec::new();
                while let TokenKind::Keyword(part) = self.current_token().kind() {
                    parts.push(part.clone());
                    self.advance();
                    parameters.push(self.expect_identifier("a parameter name")?);
                }
                Ok((MessageSelector::Keyword(parts), parameters))
            }
            kind => Err(ParseError::MissingMessagePattern {
                found: kind.clone(),
                span: token.span(),
            }),
        }
    }

    /// Parses `| temp1 temp2 |` declarations, if present.
    fn parse_temporaries(&mut self) -> Result<Vec<Identifier>, ParseError> {
        let mut temps = Vec::new();
        if self.check(&TokenKind::Pipe) {
            self.advance();
            while self.current_token().kind().is_identifier() {
                temps.push(self.expect_identifier("a temporary name")?);
            }
            self.expect(&TokenKind::Pipe, "'|' closing the temporaries")?;
        }
        Ok(temps)
    }

    /// Parses a dot-separated statement sequence.
    ///
    /// Stops (without consuming) at `]` or end of input. The trailing dot
    /// is optional.
    fn parse_statements(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.current_token().kind() {
                TokenKind::Eof | TokenKind::RightBracket => break,
                _ => {}
            }
            statements.push(self.parse_statement()?);
            if self.check(&TokenKind::Period) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(statements)
    }

    /// Parses a single statement: `^ expression` or a bare expression.
    fn parse_statement(&mut self) -> Result<Expression, ParseError> {
        if self.check(&TokenKind::Caret) {
            let caret = self.advance();
            let value = self.parse_expression()?;
            let span = caret.span().merge(value.span());
            Ok(Expression::Return {
                value: Box::new(value),
                span,
            })
        } else {
            self.parse_expression()
        }
    }

    // ========================================================================
    // Expressions, loosest binding first
    // ========================================================================

    /// Parses an expression, detecting `name := value` by lookahead.
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        if self.current_token().kind().is_identifier() && self.peek(1).kind() == &TokenKind::Assign
        {
            let target = self.expect_identifier("an assignment target")?;
            self.advance(); // :=
            let value = self.parse_expression()?;
            let span = target.span.merge(value.span());
            return Ok(Expression::Assignment {
                target,
                value: Box::new(value),
                span,
            });
        }
        self.parse_cascade()
    }

    /// Parses a possible cascade: `recv msg1; msg2; msg3`.
    fn parse_cascade(&mut self) -> Result<Expression, ParseError> {
        let expr = self.parse_keyword_send()?;

        if !self.check(&TokenKind::Semicolon) {
            return Ok(expr);
        }

        // Hoist the receiver out of the first message so every cascaded
        // message targets the same value.
        let Expression::MessageSend {
            receiver,
            selector,
            arguments,
            span: first_span,
        } = expr
        else {
            return Err(ParseError::CascadeWithoutSend {
                span: self.current_token().span(),
            });
        };

        let mut messages = vec![CascadeMessage::new(selector, arguments, first_span)];
        while self.check(&TokenKind::Semicolon) {
            self.advance();
            messages.push(self.parse_cascade_message()?);
        }

        let span = receiver
            .span()
            .merge(messages.last().expect("cascade is non-empty").span);
        Ok(Expression::Cascade {
            receiver,
            messages,
            span,
        })
    }

    /// Parses one receiverless message in a cascade.
    fn parse_cascade_message(&mut self) -> Result<CascadeMessage, ParseError> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(CascadeMessage::new(
                    MessageSelector::Unary(name.clone()),
                    Vec::new(),
                    token.span(),
                ))
            }
            TokenKind::BinarySelector(op) => {
                self.advance();
                let arg = self.parse_unary_send()?;
                let span = token.span().merge(arg.span());
                Ok(CascadeMessage::new(
                    MessageSelector::Binary(op.clone()),
                    vec![arg],
                    span,
                ))
            }
            TokenKind::Keyword(_) => {
                let mut parts = Vec::new();
                let mut arguments = Vec::new();
                while let TokenKind::Keyword(part) = self.current_token().kind() {
                    parts.push(part.clone());
                    self.advance();
                    arguments.push(self.parse_binary_send()?);
                }
                let span = token
                    .span()
                    .merge(arguments.last().expect("keyword send has arguments").span());
                Ok(CascadeMessage::new(
                    MessageSelector::Keyword(parts),
                    arguments,
                    span,
                ))
            }
            kind => Err(ParseError::unexpected(
                "a message selector after ';'",
                kind.clone(),
                token.span(),
            )),
        }
    }

    /// Parses a keyword send: `recv key1: arg1 key2: arg2`.
    ///
    /// Keyword sends never chain; a keyword send is always the outermost
    /// send in its sub-expression.
    fn parse_keyword_send(&mut self) -> Result<Expression, ParseError> {
        let receiver = self.parse_binary_send()?;

        if !matches!(self.current_token().kind(), TokenKind::Keyword(_)) {
            return Ok(receiver);
        }

        let mut parts = Vec::new();
        let mut arguments = Vec::new();
        while let TokenKind::Keyword(part) = self.current_token().kind() {
            parts.push(part.clone());
            self.advance();
            arguments.push(self.parse_binary_send()?);
        }

        let span = receiver
            .span()
            .merge(arguments.last().expect("keyword send has arguments").span());
        Ok(Expression::MessageSend {
            receiver: Box::new(receiver),
            selector: MessageSelector::Keyword(parts),
            arguments,
            span,
        })
    }

    /// Parses a left-associative binary send chain: `a + b - c`.
    fn parse_binary_send(&mut self) -> Result<Expression, ParseError> {
        let mut receiver = self.parse_unary_send()?;

        while let TokenKind::BinarySelector(op) = self.current_token().kind() {
            let selector = MessageSelector::Binary(op.clone());
            self.advance();
            let arg = self.parse_unary_send()?;
            let span = receiver.span().merge(arg.span());
            receiver = Expression::MessageSend {
                receiver: Box::new(receiver),
                selector,
                arguments: vec![arg],
                span,
            };
        }

        Ok(receiver)
    }

    /// Parses a left-associative unary send chain: `obj size printNl`.
    ///
    /// An identifier immediately followed by `:=` is the start of an
    /// assignment, not a unary message.
    fn parse_unary_send(&mut self) -> Result<Expression, ParseError> {
        let mut receiver = self.parse_primary()?;

        while let TokenKind::Identifier(name) = self.current_token().kind() {
            if self.peek(1).kind() == &TokenKind::Assign {
                break;
            }
            let selector = MessageSelector::Unary(name.clone());
            let token = self.advance();
            let span = receiver.span().merge(token.span());
            receiver = Expression::MessageSend {
                receiver: Box::new(receiver),
                selector,
                arguments: Vec::new(),
                span,
            };
        }

        Ok(receiver)
    }

    /// Parses a primary: literal, variable, `( expr )`, or block.
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.current_token().clone();
        match token.kind() {
            TokenKind::Integer(text) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Integer(text.clone()),
                    token.span(),
                ))
            }
            TokenKind::Float(text) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Float(text.clone()),
                    token.span(),
                ))
            }
            TokenKind::String(text) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::String(text.clone()),
                    token.span(),
                ))
            }
            TokenKind::Symbol(text) => {
                self.advance();
                Ok(Expression::Literal(
                    Literal::Symbol(text.clone()),
                    token.span(),
                ))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expression::Variable(Identifier::new(
                    name.clone(),
                    token.span(),
                )))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                if self.current_token().kind().is_eof() {
                    return Err(ParseError::Unterminated {
                        construct: "parenthesized expression",
                        span: token.span(),
                    });
                }
                self.expect(&TokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LeftBracket => self.parse_block(),
            kind => Err(ParseError::unexpected(
                "an expression",
                kind.clone(),
                token.span(),
            )),
        }
    }

    /// Parses a block literal: `[ :p1 :p2 | | temps | statements ]`.
    ///
    /// Records the exact source span of the body (after parameters and
    /// temporaries, before `]`) for later verbatim reuse.
    fn parse_block(&mut self) -> Result<Expression, ParseError> {
        let open = self.expect(&TokenKind::LeftBracket, "'['")?;

        let mut parameters = Vec::new();
        while let TokenKind::BlockParameter(name) = self.current_token().kind() {
            let token_span = self.current_token().span();
            parameters.push(Identifier::new(name.clone(), token_span));
            self.advance();
        }
        if !parameters.is_empty() {
            self.expect(&TokenKind::Pipe, "'|' after block parameters")?;
        }

        let temporaries = self.parse_temporaries()?;

        let body_start = self.current_token().span().start();
        let body = self.parse_statements()?;

        if self.current_token().kind().is_eof() {
            return Err(ParseError::Unterminated {
                construct: "block",
                span: open.span(),
            });
        }
        let close = self.expect(&TokenKind::RightBracket, "']'")?;

        Ok(Expression::Block(Block {
            parameters,
            temporaries,
            body,
            body_span: Span::new(body_start, close.span().start()),
            span: open.span().merge(close.span()),
        }))
    }
}
