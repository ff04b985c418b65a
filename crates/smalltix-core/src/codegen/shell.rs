// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The shell script emitter.
//!
//! A method script follows a fixed calling convention: the receiver's
//! directory path arrives as `$1` and each formal parameter as a
//! subsequent positional argument. Message sends become invocations of
//! the `./send` dispatcher; instance variables are files inside the
//! receiver's directory.
//!
//! # Value References
//!
//! Every generated expression yields a [`Value`]: either an *immediate*
//! (a tagged literal like `int/3`, a reserved word, a global name)
//! rendered bare, or a *binding* (a shell variable) rendered with a `$`
//! prefix. Keeping the distinction in the type means a temporary that
//! happens to be named `truthy` can never be mistaken for the reserved
//! word `true`.
//!
//! # Tail Position
//!
//! The last statement of a method body (when it is a return) and of a
//! block body (always) streams its result to stdout directly instead of
//! capturing it into a fresh binding and re-echoing it. The elision has
//! no observable effect on the result value.
//!
//! # Block Extraction
//!
//! The execution model has no shared call stack, so a block literal
//! cannot be inlined. Each block compiles into a sibling script named
//! from the method's mangled selector plus per-nesting-level counters
//! (`run~block1`, `run~block1~block1`, ...). The enclosing scope is
//! captured wholesale: `self` first, then every in-scope temporary,
//! then every in-scope parameter, each at most once. The use site
//! materializes those values into an ordered container and pairs it
//! with the script name in a closure value.

use ecow::EcoString;
use tracing::{debug, trace};

use crate::ast::{Block, CascadeMessage, Expression, Literal, Method, MessageSelector};
use crate::parse::Span;

use super::{CodeGenError, CompiledMethod, Script};

/// Generates the scripts for a parsed method.
///
/// `source` must be the text the method was parsed from; it is
/// reproduced verbatim in the primary script's comment header, and block
/// body spans index into it.
///
/// # Errors
///
/// Returns a [`CodeGenError`] for string/symbol literals used as values
/// and for assignments to non-assignable names. No partial output is
/// produced on error.
pub fn generate(method: &Method, source: &str) -> Result<CompiledMethod, CodeGenError> {
    Generator::new(source, method.selector.mangled()).generate_method(method)
}

/// A reference to a computed value in the emitted script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    /// Rendered bare: a tagged literal (`int/3`), a reserved word
    /// (`true`), or a global name (`Array`).
    Immediate(EcoString),
    /// Rendered with a `$` prefix: a shell variable holding a value.
    Binding(EcoString),
}

impl Value {
    fn render(&self) -> EcoString {
        match self {
            Self::Immediate(text) => text.clone(),
            Self::Binding(name) => {
                let mut text = EcoString::from("$");
                text.push_str(name);
                text
            }
        }
    }
}

/// How a variable name resolves, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarClass {
    /// `self`: the receiver path, bound from `$1`.
    Receiver,
    /// `true`, `false`, `nil`: passed through verbatim.
    Reserved,
    /// A declared temporary or parameter: a shell variable.
    Local,
    /// An uppercase-initial name: a global reference, passed through.
    Global,
    /// Anything else: a file inside the receiver's directory.
    Instance,
}

/// Per-compilation generator state.
///
/// Scope state (line buffer, temporary counter, scope sets) is saved and
/// restored around nested-block compilation, so generating an inner
/// script never disturbs the enclosing script in progress.
struct Generator<'src> {
    /// The original source text.
    source: &'src str,
    /// The mangled selector of the method being compiled; block script
    /// names are derived from it.
    method_name: EcoString,
    /// Line buffer for the script currently being emitted.
    lines: Vec<String>,
    /// In-scope temporaries, in declaration order.
    temps: Vec<EcoString>,
    /// In-scope parameters, in declaration order. Inside a block script
    /// this includes the captured names.
    params: Vec<EcoString>,
    /// Counter for fresh `tmpN` bindings, per script.
    tmp_counter: u32,
    /// Per-nesting-level block counters; the last entry counts blocks at
    /// the current depth.
    block_path: Vec<u32>,
    /// Extracted block scripts, in extraction order.
    blocks: Vec<Script>,
}

impl<'src> Generator<'src> {
    fn new(source: &'src str, method_name: EcoString) -> Self {
        Self {
            source,
            method_name,
            lines: Vec::new(),
            temps: Vec::new(),
            params: Vec::new(),
            tmp_counter: 0,
            block_path: vec![0],
            blocks: Vec::new(),
        }
    }

    fn generate_method(mut self, method: &Method) -> Result<CompiledMethod, CodeGenError> {
        debug!(selector = %method.selector.name(), "generating method script");

        self.temps = method.temporaries.iter().map(|t| t.name.clone()).collect();
        self.params = method.parameters.iter().map(|p| p.name.clone()).collect();

        let header = self.source;
        self.emit_source_header(header);
        self.lines.push("self=$1".to_owned());
        for (i, param) in method.parameters.iter().enumerate() {
            self.lines.push(format!("{}=${}", param.name, i + 2));
        }

        self.generate_body(&method.body, false)?;

        Ok(CompiledMethod {
            primary: Script::new(self.method_name.clone(), self.lines.join("\n")),
            blocks: self.blocks,
        })
    }

    /// Reproduces `text` as `#`-prefixed comment lines plus a bare `#`
    /// separator.
    fn emit_source_header(&mut self, text: &str) {
        for line in text.trim_end().lines() {
            self.lines.push(format!("# {line}"));
        }
        self.lines.push("#".to_owned());
    }

    /// Emits a statement sequence.
    ///
    /// The final statement of a block body is an implicit return and is
    /// always emitted in tail position; in a method body only an
    /// explicit `^` return gets the tail treatment.
    fn generate_body(
        &mut self,
        body: &[Expression],
        implicit_return: bool,
    ) -> Result<(), CodeGenError> {
        let count = body.len();
        for (i, statement) in body.iter().enumerate() {
            let last = i + 1 == count;
            match statement {
                Expression::Return { value, .. } if last => self.expr_tail(value)?,
                Expression::Return { value, .. } => {
                    let result = self.expr_value(value)?;
                    self.lines.push(format!("echo {}", result.render()));
                }
                _ if last && implicit_return => self.expr_tail(statement)?,
                _ => {
                    self.expr_value(statement)?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn fresh_tmp(&mut self) -> EcoString {
        self.tmp_counter += 1;
        let mut name = EcoString::from("tmp");
        name.push_str(&self.tmp_counter.to_string());
        name
    }

    fn classify(&self, name: &str) -> VarClass {
        if name == "self" {
            VarClass::Receiver
        } else if matches!(name, "true" | "false" | "nil") {
            VarClass::Reserved
        } else if self.temps.iter().any(|t| t == name) || self.params.iter().any(|p| p == name) {
            VarClass::Local
        } else if name.chars().next().is_some_and(char::is_uppercase) {
            VarClass::Global
        } else {
            VarClass::Instance
        }
    }

    // ========================================================================
    // Value-producing generation
    // ========================================================================

    /// Emits `expr` and returns a reference to its result.
    fn expr_value(&mut self, expr: &Expression) -> Result<Value, CodeGenError> {
        match expr {
            Expression::Literal(literal, span) => {
                Ok(Value::Immediate(tagged_literal(literal, *span)?))
            }
            Expression::Variable(id) => Ok(self.variable_value(&id.name)),
            Expression::Assignment {
                target,
                value,
                span,
            } => self.assignment_value(&target.name, value, *span),
            Expression::MessageSend {
                receiver,
                selector,
                arguments,
                ..
            } => {
                let command = self.send_command(receiver, selector, arguments)?;
                let tmp = self.fresh_tmp();
                self.lines.push(format!("{tmp}=$({command})"));
                Ok(Value::Binding(tmp))
            }
            Expression::Cascade {
                receiver, messages, ..
            } => {
                let recv = self.expr_value(receiver)?;
                let mut result = recv.clone();
                for message in messages {
                    let command = self.cascade_command(&recv, message)?;
                    let tmp = self.fresh_tmp();
                    self.lines.push(format!("{tmp}=$({command})"));
                    result = Value::Binding(tmp);
                }
                Ok(result)
            }
            Expression::Block(block) => {
                let (script_name, bindings) = self.extract_block(block)?;
                let tmp = self.fresh_tmp();
                self.lines.push(format!(
                    "{tmp}=$(./send BlockClosure script-bindings- {script_name} {})",
                    bindings.render()
                ));
                Ok(Value::Binding(tmp))
            }
            Expression::Return { span, .. } => Err(CodeGenError::UnsupportedExpression {
                construct: "a return expression",
                span: *span,
            }),
        }
    }

    fn variable_value(&mut self, name: &str) -> Value {
        match self.classify(name) {
            VarClass::Receiver => Value::Binding("self".into()),
            VarClass::Reserved | VarClass::Global => Value::Immediate(name.into()),
            VarClass::Local => Value::Binding(name.into()),
            VarClass::Instance => {
                let tmp = self.fresh_tmp();
                self.lines.push(format!("{tmp}=$(cat $self/{name})"));
                Value::Binding(tmp)
            }
        }
    }

    fn assignment_value(
        &mut self,
        target: &str,
        value: &Expression,
        span: Span,
    ) -> Result<Value, CodeGenError> {
        match self.classify(target) {
            VarClass::Local => {
                self.expr_into(value, target)?;
                Ok(Value::Binding(target.into()))
            }
            VarClass::Instance => {
                let result = self.expr_value(value)?;
                self.lines
                    .push(format!("echo {} > $self/{target}", result.render()));
                Ok(result)
            }
            VarClass::Receiver | VarClass::Reserved | VarClass::Global => {
                Err(CodeGenError::InvalidAssignment {
                    name: target.into(),
                    span,
                })
            }
        }
    }

    // ========================================================================
    // Tail-position generation
    // ========================================================================

    /// Emits `expr` streaming its result to stdout, with no intermediate
    /// capture.
    fn expr_tail(&mut self, expr: &Expression) -> Result<(), CodeGenError> {
        match expr {
            Expression::Literal(literal, span) => {
                let tagged = tagged_literal(literal, *span)?;
                self.lines.push(format!("echo {tagged}"));
                Ok(())
            }
            Expression::Variable(id) => {
                let line = match self.classify(&id.name) {
                    VarClass::Receiver => "echo $self".to_owned(),
                    VarClass::Reserved | VarClass::Global => format!("echo {}", id.name),
                    VarClass::Local => format!("echo ${}", id.name),
                    VarClass::Instance => format!("cat $self/{}", id.name),
                };
                self.lines.push(line);
                Ok(())
            }
            Expression::MessageSend {
                receiver,
                selector,
                arguments,
                ..
            } => {
                let command = self.send_command(receiver, selector, arguments)?;
                self.lines.push(command);
                Ok(())
            }
            Expression::Cascade {
                receiver, messages, ..
            } => {
                let recv = self.expr_value(receiver)?;
                let count = messages.len();
                for (i, message) in messages.iter().enumerate() {
                    let command = self.cascade_command(&recv, message)?;
                    if i + 1 == count {
                        self.lines.push(command);
                    } else {
                        let tmp = self.fresh_tmp();
                        self.lines.push(format!("{tmp}=$({command})"));
                    }
                }
                Ok(())
            }
            Expression::Return { value, .. } => self.expr_tail(value),
            Expression::Assignment { .. } | Expression::Block(_) => {
                let result = self.expr_value(expr)?;
                self.lines.push(format!("echo {}", result.render()));
                Ok(())
            }
        }
    }

    // ========================================================================
    // Assignment-target generation
    // ========================================================================

    /// Emits `expr` with its result stored directly into the local
    /// binding `target`, skipping the fresh-temporary indirection.
    fn expr_into(&mut self, expr: &Expression, target: &str) -> Result<(), CodeGenError> {
        match expr {
            Expression::Literal(literal, span) => {
                let tagged = tagged_literal(literal, *span)?;
                self.lines.push(format!("{target}={tagged}"));
                Ok(())
            }
            Expression::Variable(id) => {
                let line = match self.classify(&id.name) {
                    VarClass::Receiver => format!("{target}=$self"),
                    VarClass::Reserved | VarClass::Global => format!("{target}={}", id.name),
                    VarClass::Local => format!("{target}=${}", id.name),
                    VarClass::Instance => format!("{target}=$(cat $self/{})", id.name),
                };
                self.lines.push(line);
                Ok(())
            }
            Expression::MessageSend {
                receiver,
                selector,
                arguments,
                ..
            } => {
                let command = self.send_command(receiver, selector, arguments)?;
                self.lines.push(format!("{target}=$({command})"));
                Ok(())
            }
            Expression::Cascade {
                receiver, messages, ..
            } => {
                let recv = self.expr_value(receiver)?;
                let count = messages.len();
                for (i, message) in messages.iter().enumerate() {
                    let command = self.cascade_command(&recv, message)?;
                    if i + 1 == count {
                        self.lines.push(format!("{target}=$({command})"));
                    } else {
                        let tmp = self.fresh_tmp();
                        self.lines.push(format!("{tmp}=$({command})"));
                    }
                }
                Ok(())
            }
            Expression::Block(block) => {
                let (script_name, bindings) = self.extract_block(block)?;
                self.lines.push(format!(
                    "{target}=$(./send BlockClosure script-bindings- {script_name} {})",
                    bindings.render()
                ));
                Ok(())
            }
            Expression::Assignment { .. } => {
                let result = self.expr_value(expr)?;
                self.lines.push(format!("{target}={}", result.render()));
                Ok(())
            }
            Expression::Return { span, .. } => Err(CodeGenError::UnsupportedExpression {
                construct: "a return expression",
                span: *span,
            }),
        }
    }

    // ========================================================================
    // Message sends
    // ========================================================================

    /// Evaluates receiver and arguments left-to-right and builds the
    /// dispatcher command text (without any capture wrapper).
    fn send_command(
        &mut self,
        receiver: &Expression,
        selector: &MessageSelector,
        arguments: &[Expression],
    ) -> Result<String, CodeGenError> {
        let recv = self.expr_value(receiver)?;
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.expr_value(argument)?);
        }
        Ok(build_send(&recv, selector, &args))
    }

    /// Builds the command for one cascaded message against an
    /// already-evaluated receiver.
    fn cascade_command(
        &mut self,
        receiver: &Value,
        message: &CascadeMessage,
    ) -> Result<String, CodeGenError> {
        let mut args = Vec::with_capacity(message.arguments.len());
        for argument in &message.arguments {
            args.push(self.expr_value(argument)?);
        }
        Ok(build_send(receiver, &message.selector, &args))
    }

    // ========================================================================
    // Block extraction
    // ========================================================================

    /// Compiles a block into its own script and emits the
    /// captured-bindings container at the use site.
    ///
    /// Returns the script name and a reference to the container. The
    /// caller emits the closure-construction send.
    fn extract_block(&mut self, block: &Block) -> Result<(EcoString, Value), CodeGenError> {
        let captures = self.captured_names();
        let script_name = self.next_block_name();
        trace!(script = %script_name, captures = captures.len(), "extracting block");

        let saved_lines = std::mem::take(&mut self.lines);
        let saved_counter = std::mem::replace(&mut self.tmp_counter, 0);
        let saved_temps = std::mem::take(&mut self.temps);
        let saved_params = std::mem::take(&mut self.params);

        // The extracted script's scope: captured names (minus self,
        // which is bound from $1) then the block's own parameters.
        self.temps = block.temporaries.iter().map(|t| t.name.clone()).collect();
        self.params = captures[1..].to_vec();
        self.params
            .extend(block.parameters.iter().map(|p| p.name.clone()));

        let body_text = self.source[block.body_span.as_range()].trim().to_owned();
        self.emit_source_header(&body_text);
        self.lines.push("self=$1".to_owned());
        for (i, formal) in self.params.clone().iter().enumerate() {
            self.lines.push(format!("{formal}=${}", i + 2));
        }

        self.block_path.push(0);
        let generated = self.generate_body(&block.body, true);
        self.block_path.pop();

        let contents = self.lines.join("\n");

        self.lines = saved_lines;
        self.tmp_counter = saved_counter;
        self.temps = saved_temps;
        self.params = saved_params;

        generated?;
        self.blocks.push(Script::new(script_name.clone(), contents));

        let bindings = self.emit_bindings(&captures);
        Ok((script_name, bindings))
    }

    /// The whole enclosing scope, as an ordered capture list: `self`
    /// first, then temporaries, then parameters, each at most once.
    fn captured_names(&self) -> Vec<EcoString> {
        let mut captures = vec![EcoString::from("self")];
        for name in self.temps.iter().chain(self.params.iter()) {
            if !captures.contains(name) {
                captures.push(name.clone());
            }
        }
        captures
    }

    /// Produces the next block script name at the current nesting depth:
    /// `<selector>~block<N>` with one `~block` segment per level.
    fn next_block_name(&mut self) -> EcoString {
        if let Some(level) = self.block_path.last_mut() {
            *level += 1;
        }
        let mut name = EcoString::from(self.method_name.as_str());
        for counter in &self.block_path {
            name.push_str("~block");
            name.push_str(&counter.to_string());
        }
        name
    }

    /// Emits construction of the ordered captured-bindings container and
    /// returns a reference to it.
    ///
    /// Up to four captures use direct `with:`-family construction; more
    /// fall back to `new:` plus 1-based `at:put:` stores.
    fn emit_bindings(&mut self, captures: &[EcoString]) -> Value {
        let values: Vec<String> = captures.iter().map(|name| format!("${name}")).collect();
        let container = self.fresh_tmp();
        if captures.len() <= 4 {
            self.lines.push(format!(
                "{container}=$(./send Array {} {})",
                "with-".repeat(captures.len()),
                values.join(" ")
            ));
        } else {
            self.lines
                .push(format!("{container}=$(./send Array new- int/{})", captures.len()));
            for (i, value) in values.iter().enumerate() {
                let discard = self.fresh_tmp();
                self.lines.push(format!(
                    "{discard}=$(./send ${container} at-put- int/{} {value})",
                    i + 1
                ));
            }
        }
        Value::Binding(container)
    }
}

/// Tags a numeric literal with its kind prefix (`int/3`, `float/1.5`).
fn tagged_literal(literal: &Literal, span: Span) -> Result<EcoString, CodeGenError> {
    match literal {
        Literal::Integer(text) => {
            let mut tagged = EcoString::from("int/");
            tagged.push_str(text);
            Ok(tagged)
        }
        Literal::Float(text) => {
            let mut tagged = EcoString::from("float/");
            tagged.push_str(text);
            Ok(tagged)
        }
        Literal::String(_) | Literal::Symbol(_) => Err(CodeGenError::UnsupportedLiteral {
            kind: literal.kind_name(),
            span,
        }),
    }
}

/// Builds a dispatcher invocation: receiver, mangled selector, arguments.
fn build_send(receiver: &Value, selector: &MessageSelector, arguments: &[Value]) -> String {
    let mut command = format!("./send {} {}", receiver.render(), selector.mangled());
    for argument in arguments {
        command.push(' ');
        command.push_str(&argument.render());
    }
    command
}
