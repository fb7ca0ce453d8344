//! Expression evaluation
//!
//! [`evaluate`] turns one expression string into a [`Value`]. The text is
//! parsed into an [`Expr`] tree (standard Java precedence, left
//! associative) and reduced bottom-up. Anything the evaluator cannot reduce
//! (an unbound name, a call outside the allow-list, division by zero, a
//! parse error) is not an error: that node evaluates to its own source text,
//! and reduction carries on around it. `"n:" + i` with `i` unbound therefore
//! yields `n:i`.

use crate::interpreter::{builtins, ops};
use crate::parser::ast::{BinOp, Expr, ExprKind, UnaryOp};
use crate::parser::Parser;
use crate::runtime::{Environment, Value};

/// Evaluate `expr` against `env`
pub fn evaluate(expr: &str, env: &Environment) -> Value {
    let expr = expr.trim();
    match Parser::new(expr).and_then(|mut parser| parser.parse_standalone_expression()) {
        Ok(tree) => Evaluator::new(expr, env).value(&tree),
        Err(_) => Value::text(expr),
    }
}

/// Decimal literals that overflow `int` are kept as `long`
fn int_literal(n: i64) -> Value {
    i32::try_from(n).map_or(Value::Long(n), Value::Int)
}

/// Reduces parsed expressions; `source` is the text the tree was parsed from.
pub(crate) struct Evaluator<'a> {
    source: &'a str,
    env: &'a Environment,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(source: &'a str, env: &'a Environment) -> Self {
        Self { source, env }
    }

    /// Value of `expr`, or its source text if it does not reduce
    pub(crate) fn value(&self, expr: &Expr) -> Value {
        self.reduce(expr)
            .unwrap_or_else(|| Value::text(expr.span.text(self.source)))
    }

    pub(crate) fn reduce(&self, expr: &Expr) -> Option<Value> {
        match &expr.kind {
            ExprKind::IntLiteral(n) => Some(int_literal(*n)),
            ExprKind::LongLiteral(n) => Some(Value::Long(*n)),
            ExprKind::DoubleLiteral(d) => Some(Value::Double(*d)),
            ExprKind::StringLiteral(s) => Some(Value::text(s.as_str())),
            ExprKind::CharLiteral(c) => Some(Value::Text(c.to_string())),
            ExprKind::BoolLiteral(b) => Some(Value::Bool(*b)),
            ExprKind::Null => None,
            ExprKind::Ident(name) => self.env.get(name).cloned(),

            ExprKind::Binary { op, left, right } => self.reduce_binary(*op, left, right),
            // `-2147483648` is the one int literal whose magnitude is not an int
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } if matches!(operand.kind, ExprKind::IntLiteral(n) if n == 1 << 31) => Some(Value::Int(i32::MIN)),
            ExprKind::Unary { op, operand } => ops::unary(*op, &self.reduce(operand)?),
            ExprKind::Cast { target, expr } => ops::cast(*target, &self.reduce(expr)?),
            ExprKind::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let branch = if self.reduce(condition)?.as_bool()? {
                    then_expr
                } else {
                    else_expr
                };
                Some(self.value(branch))
            }

            ExprKind::MethodCall {
                receiver: Some(receiver),
                name,
                args,
            } if args.is_empty() => builtins::call_method(&self.reduce(receiver)?, name),
            ExprKind::New { type_name, args } if args.is_empty() => builtins::construct(type_name),

            ExprKind::MethodCall { .. }
            | ExprKind::New { .. }
            | ExprKind::FieldAccess { .. }
            | ExprKind::ArrayIndex { .. } => None,
        }
    }

    fn reduce_binary(&self, op: BinOp, left: &Expr, right: &Expr) -> Option<Value> {
        match op {
            // Unreduced operands still take part in concatenation as text
            BinOp::Add => ops::binary(op, &self.value(left), &self.value(right)),
            BinOp::And => {
                if !self.reduce(left)?.as_bool()? {
                    return Some(Value::Bool(false));
                }
                Some(Value::Bool(self.reduce(right)?.as_bool()?))
            }
            BinOp::Or => {
                if self.reduce(left)?.as_bool()? {
                    return Some(Value::Bool(true));
                }
                Some(Value::Bool(self.reduce(right)?.as_bool()?))
            }
            _ => ops::binary(op, &self.reduce(left)?, &self.reduce(right)?),
        }
    }
}
