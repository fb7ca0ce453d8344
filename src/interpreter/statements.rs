//! Statement dispatch
//!
//! Adds `impl Interpreter` methods that execute one statement string. The
//! dispatch order is fixed, first match wins:
//!
//! 1. `System.out.print`/`println` calls
//! 2. `for` and `while` loops (see [`loops`](super::loops))
//! 3. variable declarations `Type name [= expr]`
//! 4. assignments `name = expr`, compound assignments and `name++`/`name--`
//! 5. collection mutation `name.add(expr)` / `name.put(key, value)`
//!
//! Everything else (conditionals, `switch`, `try`, `return`, nested type or
//! method declarations, arbitrary calls) is skipped without error.

use crate::interpreter::builtins::{self, simple_type_name};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::expressions::{evaluate, Evaluator};
use crate::interpreter::ops;
use crate::interpreter::splitter::{split_body, Statement};
use crate::parser::ast::{BinOp, ExprKind};
use crate::parser::scan::{code_mask, find_closing};
use crate::parser::Parser;
use crate::runtime::Value;
use tracing::{debug, trace};

/// Statements starting with these words are recognised and skipped
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "if", "else", "do", "switch", "case", "default", "try", "catch", "finally", "return", "break",
    "continue", "throw", "class", "interface", "enum", "record", "assert", "synchronized",
];

/// Words that can never start a declaration's type
const NOT_A_TYPE: &[&str] = &["return", "throw", "new", "yield", "case", "else"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrintKind {
    Line,
    Inline,
    Format,
}

impl Interpreter {
    pub(crate) fn execute_block(&mut self, statements: &[Statement]) -> Result<(), InterpreterError> {
        for statement in statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    pub(crate) fn execute_statement(&mut self, statement: &Statement) -> Result<(), InterpreterError> {
        self.check_deadline()?;
        let text = statement.text.as_str();
        trace!(line = statement.line, statement = text, "execute");

        if let Some((kind, argument)) = print_call(text) {
            return self.execute_print(kind, argument);
        }

        match statement.keyword() {
            "for" => return self.execute_for(statement),
            "while" => return self.execute_while(statement),
            keyword if UNSUPPORTED_KEYWORDS.contains(&keyword) => {
                debug!(line = statement.line, keyword, "skipping unsupported statement");
                return Ok(());
            }
            _ => {}
        }

        if text.starts_with('{') && text.ends_with('}') {
            let inner = split_body(text, statement.line);
            return self.execute_block(&inner);
        }

        if self.execute_simple(text).is_none() && !self.execute_mutation(text) {
            debug!(line = statement.line, statement = text, "ignoring statement");
        }
        Ok(())
    }

    fn execute_print(&mut self, kind: PrintKind, argument: &str) -> Result<(), InterpreterError> {
        match kind {
            PrintKind::Format => {
                debug!("printf is not interpreted");
                Ok(())
            }
            PrintKind::Line | PrintKind::Inline => {
                let text = if argument.trim().is_empty() {
                    String::new()
                } else {
                    evaluate(argument, &self.env).to_string()
                };
                self.terminal.print_line(&text)
            }
        }
    }

    /// Declarations, assignments and increments.
    ///
    /// Returns `Some(declared)` when the statement was one of those, where
    /// `declared` is the newly declared name, if any.
    pub(crate) fn execute_simple(&mut self, text: &str) -> Option<Option<String>> {
        if let Some(declaration) = parse_declaration(text) {
            self.execute_declaration(&declaration);
            return Some(Some(declaration.name.to_string()));
        }

        if let Some((target, delta)) = parse_increment(text) {
            self.apply_compound(target, BinOp::Add, Value::Int(delta));
            return Some(None);
        }

        let (target, op, rhs) = split_assignment(text)?;
        if !is_identifier(target) {
            return None;
        }
        let value = evaluate(rhs, &self.env);
        match op {
            None => {
                let value = match self.env.get(target) {
                    Some(current) => ops::assignment_conversion(current, value, false),
                    None => value,
                };
                self.env.set(target, value);
            }
            Some(op) => self.apply_compound(target, op, value),
        }
        Some(None)
    }

    fn execute_declaration(&mut self, declaration: &Declaration<'_>) {
        if let Some(kind) = builtins::collection_kind(declaration.type_name) {
            // The declaration only establishes the container; `.add`/`.put` fill it.
            self.env.set(declaration.name, kind.empty());
            return;
        }

        let Some(init) = declaration.init else {
            return;
        };
        let value = ops::declaration_conversion(
            simple_type_name(declaration.type_name),
            evaluate(init, &self.env),
        );
        self.env.set(declaration.name, value);
    }

    /// `target op= value`; unbound targets and undefined results leave the
    /// environment untouched
    fn apply_compound(&mut self, target: &str, op: BinOp, value: Value) {
        let Some(current) = self.env.get(target) else {
            debug!(variable = target, "compound assignment to unbound variable");
            return;
        };
        if let Some(updated) = ops::binary(op, current, &value) {
            let updated = ops::assignment_conversion(current, updated, true);
            self.env.set(target, updated);
        }
    }

    /// `name.add(expr)`, `name.add(index, expr)` and `name.put(key, value)`
    fn execute_mutation(&mut self, text: &str) -> bool {
        let Ok(expr) = Parser::new(text).and_then(|mut parser| parser.parse_standalone_expression()) else {
            return false;
        };
        let ExprKind::MethodCall {
            receiver: Some(receiver),
            name: method,
            args,
        } = &expr.kind
        else {
            return false;
        };
        let ExprKind::Ident(target) = &receiver.kind else {
            return false;
        };
        if method != "add" && method != "put" {
            return false;
        }

        let evaluator = Evaluator::new(text, &self.env);
        let values: Vec<Value> = args.iter().map(|arg| evaluator.value(arg)).collect();

        let Some(collection) = self.env.get_mut(target) else {
            debug!(variable = target.as_str(), "mutation of unbound collection");
            return true;
        };
        match (method.as_str(), values.as_slice(), collection) {
            ("add", [value], collection) => {
                collection.list_push(value.clone());
            }
            ("add", [Value::Int(index), value], Value::List(items)) => {
                if let Ok(index) = usize::try_from(*index) {
                    if index <= items.len() {
                        items.insert(index, value.clone());
                    }
                }
            }
            ("put", [key, value], collection) => {
                collection.map_put(key.clone(), value.clone());
            }
            _ => debug!(variable = target.as_str(), method = method.as_str(), "unsupported mutation"),
        }
        true
    }
}

/// `System.out.println(...)` at the start of `text`: its kind and argument text
fn print_call(text: &str) -> Option<(PrintKind, &str)> {
    let rest = text.strip_prefix("System.out.")?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let kind = match &rest[..name_len] {
        "println" => PrintKind::Line,
        "print" => PrintKind::Inline,
        "printf" | "format" => PrintKind::Format,
        _ => return None,
    };

    let after_name = text.len() - rest.len() + name_len;
    let gap = text[after_name..].len() - text[after_name..].trim_start().len();
    let open = after_name + gap;
    if !text[open..].starts_with('(') {
        return None;
    }
    let close = find_closing(text, open, '(', ')')?;
    Some((kind, &text[open + 1..close]))
}

#[derive(Debug, PartialEq, Eq)]
struct Declaration<'a> {
    type_name: &'a str,
    name: &'a str,
    init: Option<&'a str>,
}

fn parse_declaration(text: &str) -> Option<Declaration<'_>> {
    let (lhs, init) = match split_assignment(text) {
        Some((lhs, None, rhs)) => (lhs, Some(rhs)),
        Some((_, Some(_), _)) => return None,
        None => (text.trim(), None),
    };

    let name_start = lhs
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)?;
    let name = &lhs[name_start..];
    if !is_identifier(name) {
        return None;
    }

    let mut type_name = lhs[..name_start].trim();
    while let Some(rest) = type_name.strip_prefix("final ") {
        type_name = rest.trim_start();
    }
    let type_ok = type_name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && type_name
            .chars()
            .all(|c| is_identifier_char(c) || "<>,.[]? ".contains(c))
        && !type_name.ends_with('.')
        && !NOT_A_TYPE.contains(&type_name.split_whitespace().next().unwrap_or(""));
    if !type_ok {
        return None;
    }

    Some(Declaration {
        type_name,
        name,
        init,
    })
}

/// Split `lhs op= rhs` at the first top-level assignment operator.
/// `op` is `None` for plain `=`.
fn split_assignment(text: &str) -> Option<(&str, Option<BinOp>, &str)> {
    let mask = code_mask(text);
    let bytes = mask.as_bytes();
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => {
                let prev = i.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(i + 1).copied();
                if next == Some(b'=') || matches!(prev, Some(b'=' | b'!' | b'<' | b'>')) {
                    continue;
                }
                let op = match prev {
                    Some(b'+') => Some(BinOp::Add),
                    Some(b'-') => Some(BinOp::Sub),
                    Some(b'*') => Some(BinOp::Mul),
                    Some(b'/') => Some(BinOp::Div),
                    Some(b'%') => Some(BinOp::Mod),
                    _ => None,
                };
                let lhs_end = if op.is_some() { i - 1 } else { i };
                return Some((text[..lhs_end].trim(), op, text[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}

/// `i++`, `++i`, `i--`, `--i` → (name, delta)
fn parse_increment(text: &str) -> Option<(&str, i32)> {
    let text = text.trim();
    let (name, delta) = if let Some(name) = text.strip_suffix("++") {
        (name, 1)
    } else if let Some(name) = text.strip_suffix("--") {
        (name, -1)
    } else if let Some(name) = text.strip_prefix("++") {
        (name, 1)
    } else if let Some(name) = text.strip_prefix("--") {
        (name, -1)
    } else {
        return None;
    };
    let name = name.trim();
    is_identifier(name).then_some((name, delta))
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub(crate) fn is_identifier(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && text.chars().all(is_identifier_char)
}
