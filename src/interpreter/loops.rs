//! Loop statement execution (`for`, enhanced `for`, `while`).
//!
//! Adds `impl Interpreter` methods for the loop forms the interpreter
//! understands. A loop statement is one string holding the header and its
//! body; the body is split into statements once and re-run per iteration.
//!
//! Every loop counts its iterations against
//! [`InterpreterLimits::max_loop_iterations`](super::engine::InterpreterLimits)
//! and checks the run deadline, so `for (;;)` ends with an error instead of
//! hanging the run. `break` and `continue` are not modelled.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::expressions::evaluate;
use crate::interpreter::splitter::{split_body, Statement};
use crate::interpreter::statements::is_identifier;
use crate::parser::scan::{code_mask, find_closing, split_top_level};
use crate::runtime::Value;
use tracing::debug;

/// `keyword (header) body` split apart
struct LoopParts<'a> {
    header: &'a str,
    body: Vec<Statement>,
}

impl<'a> LoopParts<'a> {
    fn parse(statement: &'a Statement) -> Option<Self> {
        let text = statement.text.as_str();
        let open = code_mask(text).find('(')?;
        let close = find_closing(text, open, '(', ')')?;
        let body_line = statement.line + text[..=close].matches('\n').count();
        Some(Self {
            header: &text[open + 1..close],
            body: split_body(&text[close + 1..], body_line),
        })
    }
}

impl Interpreter {
    pub(crate) fn execute_for(&mut self, statement: &Statement) -> Result<(), InterpreterError> {
        let Some(parts) = LoopParts::parse(statement) else {
            debug!(line = statement.line, "malformed for header");
            return Ok(());
        };

        let clauses = split_top_level(parts.header, ';');
        if !clauses.is_empty() && parts.header.contains(';') {
            let mut clauses = clauses;
            clauses.resize(3, "");
            return self.execute_counted_for(statement.line, clauses[0], clauses[1], clauses[2], &parts.body);
        }

        match split_top_level(parts.header, ':').as_slice() {
            [binding, iterable] => self.execute_enhanced_for(statement.line, binding, iterable, &parts.body),
            _ => {
                debug!(line = statement.line, header = parts.header, "unsupported for header");
                Ok(())
            }
        }
    }

    /// `for (init; condition; update) body`
    fn execute_counted_for(
        &mut self,
        line: usize,
        init: &str,
        condition: &str,
        update: &str,
        body: &[Statement],
    ) -> Result<(), InterpreterError> {
        let declared = if init.is_empty() {
            None
        } else {
            self.execute_simple(init).flatten()
        };
        let updates = split_top_level(update, ',');

        let mut iterations = 0;
        while self.condition_holds(condition, line)? {
            self.count_iteration(&mut iterations, line)?;
            self.execute_block(body)?;
            for step in &updates {
                if self.execute_simple(step).is_none() {
                    debug!(line, update = *step, "unsupported loop update");
                }
            }
        }

        if let Some(name) = declared {
            self.env.remove(&name);
        }
        Ok(())
    }

    /// `for (Type item : iterable) body` over a list value
    fn execute_enhanced_for(
        &mut self,
        line: usize,
        binding: &str,
        iterable: &str,
        body: &[Statement],
    ) -> Result<(), InterpreterError> {
        let Some(name) = binding.split_whitespace().last().filter(|n| is_identifier(n)) else {
            debug!(line, binding, "unsupported loop binding");
            return Ok(());
        };

        let items = match evaluate(iterable, &self.env) {
            Value::List(items) => items,
            other => {
                debug!(line, iterable, kind = other.type_name(), "loop target is not a list");
                return Ok(());
            }
        };

        let mut iterations = 0;
        for item in items {
            self.check_deadline()?;
            self.count_iteration(&mut iterations, line)?;
            self.env.set(name, item);
            self.execute_block(body)?;
        }

        self.env.remove(name);
        Ok(())
    }

    pub(crate) fn execute_while(&mut self, statement: &Statement) -> Result<(), InterpreterError> {
        let Some(parts) = LoopParts::parse(statement) else {
            debug!(line = statement.line, "malformed while header");
            return Ok(());
        };
        if parts.body.is_empty() {
            // `} while (cond);` closing a do-while, or an empty spin loop
            debug!(line = statement.line, "skipping while without body");
            return Ok(());
        }

        let mut iterations = 0;
        while self.condition_holds(parts.header, statement.line)? {
            self.count_iteration(&mut iterations, statement.line)?;
            self.execute_block(&parts.body)?;
        }
        Ok(())
    }

    /// An empty condition always holds; one that does not reduce to a
    /// boolean ends the loop.
    fn condition_holds(&self, condition: &str, line: usize) -> Result<bool, InterpreterError> {
        self.check_deadline()?;
        if condition.trim().is_empty() {
            return Ok(true);
        }
        match evaluate(condition, &self.env) {
            Value::Bool(holds) => Ok(holds),
            other => {
                debug!(line, condition, value = %other, "loop condition is not boolean");
                Ok(false)
            }
        }
    }

    fn count_iteration(&self, iterations: &mut usize, line: usize) -> Result<(), InterpreterError> {
        if *iterations >= self.limits.max_loop_iterations {
            return Err(InterpreterError::LoopLimitExceeded {
                limit: self.limits.max_loop_iterations,
                line,
            });
        }
        *iterations += 1;
        Ok(())
    }
}
