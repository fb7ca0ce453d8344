//! Expression parsing implementation
//!
//! This module handles parsing of Java expressions using precedence climbing
//! for binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: integers, decimals, characters, strings, `true`/`false`/`null`
//! - Identifiers and parenthesized groups
//! - Binary operators: arithmetic, comparison, logical
//! - Unary operators: `-`, `+`, `!`
//! - Primitive casts: `(int)`, `(long)`, `(double)`, ...
//! - Postfix: `.field`, `.method(args)`, `[index]`
//! - Ternary: `? :`
//! - Object creation: `new Type<...>(args)`
//!
//! # Precedence
//!
//! Lowest to highest: ternary, `||`, `&&`, equality, relational, additive,
//! multiplicative, unary, postfix. Every binary level is left associative,
//! so `"a" + 1 + 2` groups as `("a" + 1) + 2`.
//!
//! Every node records the span of its spelling, parentheses included, so the
//! evaluator can hand back the original text of anything it cannot reduce.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_ternary()
    }

    /// Parse ternary: condition ? then_expr : else_expr
    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_logical_or()?;

        if self.match_token(&Token::Question(Span::default())) {
            let then_expr = self.parse_expression()?;
            self.expect_token(
                &Token::Colon(Span::default()),
                "Expected ':' in ternary expression",
            )?;
            let else_expr = self.parse_ternary()?;
            let span = condition.span.to(else_expr.span);

            return Ok(Expr::new(
                ExprKind::Ternary {
                    condition: Box::new(condition),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
                span,
            ));
        }

        Ok(condition)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_token(&Token::OrOr(Span::default())) {
            let right = self.parse_logical_and()?;
            left = binary(BinOp::Or, left, right);
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::AndAnd(Span::default())) {
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right);
        }

        Ok(left)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// Parse prefix operators and primitive casts
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current_span();

        let op = match self.peek() {
            Token::Minus(_) => Some(UnaryOp::Neg),
            Token::Plus(_) => Some(UnaryOp::Plus),
            Token::Bang(_) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        if let Some(target) = self.peek_cast_target() {
            self.advance(); // (
            self.advance(); // type
            self.advance(); // )
            let expr = self.parse_unary()?;
            let span = start.to(expr.span);
            return Ok(Expr::new(
                ExprKind::Cast {
                    target,
                    expr: Box::new(expr),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// `(int)`, `(double)`, ... at the cursor
    fn peek_cast_target(&self) -> Option<CastTarget> {
        if !self.check(&Token::LParen(Span::default())) {
            return None;
        }
        let Some(Token::Ident(name, _)) = self.peek_ahead(1) else {
            return None;
        };
        if !matches!(self.peek_ahead(2), Some(Token::RParen(_))) {
            return None;
        }
        match name.as_str() {
            "int" | "short" | "byte" => Some(CastTarget::Int),
            "long" => Some(CastTarget::Long),
            "double" | "float" => Some(CastTarget::Floating),
            _ => None,
        }
    }

    /// Parse member access, calls and indexing chained after a primary
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(&Token::Dot(Span::default())) {
                let name = self.expect_identifier()?;
                if self.check(&Token::LParen(Span::default())) {
                    let args = self.parse_arguments()?;
                    let span = expr.span.to(self.previous_span());
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            receiver: Some(Box::new(expr)),
                            name,
                            args,
                        },
                        span,
                    );
                } else {
                    let span = expr.span.to(self.previous_span());
                    expr = Expr::new(
                        ExprKind::FieldAccess {
                            receiver: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
            } else if self.match_token(&Token::LBracket(Span::default())) {
                let index = self.parse_expression()?;
                let close = self.expect_token(
                    &Token::RBracket(Span::default()),
                    "Expected ']' after index",
                )?;
                let span = expr.span.to(close);
                expr = Expr::new(
                    ExprKind::ArrayIndex {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse primary expression (literals, identifiers, groups, `new`)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();

        let kind = match self.peek().clone() {
            Token::IntLiteral(n, _) => ExprKind::IntLiteral(n),
            Token::LongLiteral(n, _) => ExprKind::LongLiteral(n),
            Token::DoubleLiteral(n, _) => ExprKind::DoubleLiteral(n),
            Token::StringLiteral(s, _) => ExprKind::StringLiteral(s),
            Token::CharLiteral(c, _) => ExprKind::CharLiteral(c),
            Token::True(_) => ExprKind::BoolLiteral(true),
            Token::False(_) => ExprKind::BoolLiteral(false),
            Token::Null(_) => ExprKind::Null,
            Token::Ident(name, _) => {
                self.advance();
                if self.check(&Token::LParen(Span::default())) {
                    let args = self.parse_arguments()?;
                    return Ok(Expr::new(
                        ExprKind::MethodCall {
                            receiver: None,
                            name,
                            args,
                        },
                        span.to(self.previous_span()),
                    ));
                }
                return Ok(Expr::new(ExprKind::Ident(name), span));
            }
            Token::LParen(_) => {
                self.advance();
                let inner = self.parse_expression()?;
                let close = self.expect_rparen("after parenthesized expression")?;
                return Ok(Expr::new(inner.kind, span.to(close)));
            }
            Token::New(_) => {
                self.advance();
                return self.parse_new(span);
            }
            _ => return Err(self.error_here("Expected expression")),
        };

        self.advance();
        Ok(Expr::new(kind, span))
    }

    /// Parse the remainder of `new Type<...>(args)`
    fn parse_new(&mut self, start: Span) -> Result<Expr, ParseError> {
        let mut type_name = self.expect_identifier()?;
        while self.check(&Token::Dot(Span::default()))
            && matches!(self.peek_ahead(1), Some(Token::Ident(..)))
        {
            self.advance();
            type_name.push('.');
            type_name.push_str(&self.expect_identifier()?);
        }

        if self.check(&Token::Lt(Span::default())) {
            self.skip_balanced(&Token::Lt(Span::default()), &Token::Gt(Span::default()))?;
        }

        if !self.check(&Token::LParen(Span::default())) {
            return Err(self.error_here("Expected '(' after constructor type"));
        }
        let args = self.parse_arguments()?;

        Ok(Expr::new(
            ExprKind::New { type_name, args },
            start.to(self.previous_span()),
        ))
    }

    /// Parse `( expr, expr, ... )`
    pub(crate) fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_token(&Token::LParen(Span::default()), "Expected '('")?;
        let mut args = Vec::new();

        if self.match_token(&Token::RParen(Span::default())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(Span::default())) {
                break;
            }
        }
        self.expect_rparen("after arguments")?;

        Ok(args)
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.to(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expr {
        Parser::new(source)
            .unwrap()
            .parse_standalone_expression()
            .unwrap()
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = parse("1 + 2 * 3");
        match expr.kind {
            ExprKind::Binary {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. })),
            other => panic!("Expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_addition_is_left_associative() {
        let source = "\"a\" + 1 + 2";
        let expr = parse(source);
        match expr.kind {
            ExprKind::Binary { left, right, .. } => {
                assert_eq!(left.span.text(source), "\"a\" + 1");
                assert_eq!(right.span.text(source), "2");
            }
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_span_keeps_parentheses() {
        let source = "\"n=\" + (1 + 2)";
        let expr = parse(source);
        match expr.kind {
            ExprKind::Binary { right, .. } => assert_eq!(right.span.text(source), "(1 + 2)"),
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_method_chain() {
        let source = "name.trim().toUpperCase()";
        let expr = parse(source);
        match expr.kind {
            ExprKind::MethodCall {
                receiver: Some(receiver),
                name,
                args,
            } => {
                assert_eq!(name, "toUpperCase");
                assert!(args.is_empty());
                assert_eq!(receiver.span.text(source), "name.trim()");
            }
            other => panic!("Expected method call, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_constructor() {
        let expr = parse("new HashMap<String, List<Integer>>()");
        assert!(matches!(
            expr.kind,
            ExprKind::New { ref type_name, ref args } if type_name == "HashMap" && args.is_empty()
        ));
    }

    #[test]
    fn test_cast_and_grouping_are_distinguished() {
        assert!(matches!(parse("(int) 3.7").kind, ExprKind::Cast { .. }));
        assert!(matches!(parse("(x) + 1").kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn test_ternary() {
        assert!(matches!(parse("a > 1 ? \"big\" : \"small\"").kind, ExprKind::Ternary { .. }));
    }

    #[test]
    fn test_assignment_is_not_an_expression() {
        assert!(Parser::new("x = 1").unwrap().parse_standalone_expression().is_err());
    }
}
