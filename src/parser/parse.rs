//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the two entry points.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, token cursor helpers, entry points
//! - `declarations`: class/method skeletons used to locate `main`
//! - `expressions`: single expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, Error)]
#[error("Parse error at line {}, column {}: {message}", .span.line, .span.column)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            span: err.span,
        }
    }
}

/// Recursive descent parser for Java-like snippets
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the whole input as exactly one expression.
    pub fn parse_standalone_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if !self.is_at_end() {
            return Err(ParseError {
                message: format!("Unexpected {} after expression", self.peek().describe()),
                span: self.current_span(),
            });
        }
        Ok(expr)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof and the cursor
        // never moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous().span()
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span()
    }

    pub(crate) fn error_here(&self, message: &str) -> ParseError {
        ParseError {
            message: format!("{}, found {}", message, self.peek().describe()),
            span: self.current_span(),
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<Span, ParseError> {
        if self.check(token) {
            Ok(self.advance().span())
        } else {
            Err(self.error_here(message))
        }
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<Span, ParseError> {
        self.expect_token(&Token::RParen(Span::default()), &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here("Expected identifier"))
        }
    }

    /// Skip a balanced group starting at the current opening token and
    /// return the span strictly between the delimiters.
    pub(crate) fn skip_balanced(&mut self, open: &Token, close: &Token) -> Result<Span, ParseError> {
        let open_span = self.expect_token(open, "Expected opening delimiter")?;
        let mut depth = 1usize;

        while !self.is_at_end() {
            if self.check(open) {
                depth += 1;
            } else if self.check(close) {
                depth -= 1;
                if depth == 0 {
                    let close_span = self.advance().span();
                    return Ok(Span::new(
                        open_span.end,
                        close_span.start,
                        open_span.line,
                        open_span.column + 1,
                    ));
                }
            }
            self.advance();
        }

        Err(ParseError {
            message: "Unbalanced delimiter".to_string(),
            span: open_span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standalone_expression_rejects_trailing_tokens() {
        let mut parser = Parser::new("1 + 2 3").unwrap();
        let err = parser.parse_standalone_expression().unwrap_err();
        assert!(err.message.contains("after expression"));
        assert_eq!(err.span.column, 7);
    }

    #[test]
    fn test_lex_errors_become_parse_errors() {
        let err = Parser::new("x = #").err().unwrap();
        assert!(err.to_string().starts_with("Parse error at line 1, column 5"));
    }

    #[test]
    fn test_skip_balanced_returns_inner_span() {
        let source = "(a, (b), c) rest";
        let mut parser = Parser::new(source).unwrap();
        let inner = parser
            .skip_balanced(&Token::LParen(Span::default()), &Token::RParen(Span::default()))
            .unwrap();
        assert_eq!(inner.text(source), "a, (b), c");
        assert!(matches!(parser.peek(), Token::Ident(name, _) if name == "rest"));
    }
}
