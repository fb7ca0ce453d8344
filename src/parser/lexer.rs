//! Lexer (tokenizer) for Java-like source text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Comments are skipped. Shift operators are deliberately not recognised: `>`
//! and `<` always lex as single characters so nested generic arguments such as
//! `Map<String, List<Integer>>` close cleanly.

use super::ast::Span;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`Span`] so that parse errors can report an
/// accurate line and column, and so expressions can recover their original
/// spelling without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, Span),
    LongLiteral(i64, Span),
    DoubleLiteral(f64, Span),
    CharLiteral(char, Span),
    StringLiteral(String, Span),

    // Identifiers (includes primitive type names and contextual keywords)
    Ident(String, Span),

    // Keywords
    Class(Span),
    Interface(Span),
    Enum(Span),
    Static(Span),
    New(Span),
    True(Span),
    False(Span),
    Null(Span),
    Import(Span),
    Package(Span),

    // Arithmetic
    Plus(Span),    // +
    Minus(Span),   // -
    Star(Span),    // *
    Slash(Span),   // /
    Percent(Span), // %

    // Comparison
    EqEq(Span),  // ==
    NotEq(Span), // !=
    Lt(Span),    // <
    Le(Span),    // <=
    Gt(Span),    // >
    Ge(Span),    // >=

    // Logical and bitwise
    AndAnd(Span), // &&
    OrOr(Span),   // ||
    Bang(Span),   // !
    Amp(Span),    // &
    Pipe(Span),   // |
    Caret(Span),  // ^
    Tilde(Span),  // ~

    // Assignment
    Eq(Span),        // =
    PlusEq(Span),    // +=
    MinusEq(Span),   // -=
    StarEq(Span),    // *=
    SlashEq(Span),   // /=
    PercentEq(Span), // %=

    PlusPlus(Span),   // ++
    MinusMinus(Span), // --

    Dot(Span),        // .
    Ellipsis(Span),   // ...
    Arrow(Span),      // ->
    ColonColon(Span), // ::
    Question(Span),   // ?
    Colon(Span),      // :
    At(Span),         // @

    // Punctuation
    LParen(Span),    // (
    RParen(Span),    // )
    LBrace(Span),    // {
    RBrace(Span),    // }
    LBracket(Span),  // [
    RBracket(Span),  // ]
    Semicolon(Span), // ;
    Comma(Span),     // ,

    Eof(Span),
}

impl Token {
    /// Returns the source span of this token.
    pub fn span(&self) -> Span {
        match self {
            Token::IntLiteral(_, span)
            | Token::LongLiteral(_, span)
            | Token::DoubleLiteral(_, span)
            | Token::CharLiteral(_, span)
            | Token::StringLiteral(_, span)
            | Token::Ident(_, span) => *span,
            Token::Class(span)
            | Token::Interface(span)
            | Token::Enum(span)
            | Token::Static(span)
            | Token::New(span)
            | Token::True(span)
            | Token::False(span)
            | Token::Null(span)
            | Token::Import(span)
            | Token::Package(span)
            | Token::Plus(span)
            | Token::Minus(span)
            | Token::Star(span)
            | Token::Slash(span)
            | Token::Percent(span)
            | Token::EqEq(span)
            | Token::NotEq(span)
            | Token::Lt(span)
            | Token::Le(span)
            | Token::Gt(span)
            | Token::Ge(span)
            | Token::AndAnd(span)
            | Token::OrOr(span)
            | Token::Bang(span)
            | Token::Amp(span)
            | Token::Pipe(span)
            | Token::Caret(span)
            | Token::Tilde(span)
            | Token::Eq(span)
            | Token::PlusEq(span)
            | Token::MinusEq(span)
            | Token::StarEq(span)
            | Token::SlashEq(span)
            | Token::PercentEq(span)
            | Token::PlusPlus(span)
            | Token::MinusMinus(span)
            | Token::Dot(span)
            | Token::Ellipsis(span)
            | Token::Arrow(span)
            | Token::ColonColon(span)
            | Token::Question(span)
            | Token::Colon(span)
            | Token::At(span)
            | Token::LParen(span)
            | Token::RParen(span)
            | Token::LBrace(span)
            | Token::RBrace(span)
            | Token::LBracket(span)
            | Token::RBracket(span)
            | Token::Semicolon(span)
            | Token::Comma(span)
            | Token::Eof(span) => *span,
        }
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Token::IntLiteral(n, _) => format!("int literal {}", n),
            Token::LongLiteral(n, _) => format!("long literal {}", n),
            Token::DoubleLiteral(n, _) => format!("double literal {}", n),
            Token::CharLiteral(c, _) => format!("char literal {:?}", c),
            Token::StringLiteral(s, _) => format!("string literal {:?}", s),
            Token::Ident(s, _) => format!("identifier '{}'", s),
            Token::Eof(_) => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Token::Class(_) => "class",
            Token::Interface(_) => "interface",
            Token::Enum(_) => "enum",
            Token::Static(_) => "static",
            Token::New(_) => "new",
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::Null(_) => "null",
            Token::Import(_) => "import",
            Token::Package(_) => "package",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::Percent(_) => "%",
            Token::EqEq(_) => "==",
            Token::NotEq(_) => "!=",
            Token::Lt(_) => "<",
            Token::Le(_) => "<=",
            Token::Gt(_) => ">",
            Token::Ge(_) => ">=",
            Token::AndAnd(_) => "&&",
            Token::OrOr(_) => "||",
            Token::Bang(_) => "!",
            Token::Amp(_) => "&",
            Token::Pipe(_) => "|",
            Token::Caret(_) => "^",
            Token::Tilde(_) => "~",
            Token::Eq(_) => "=",
            Token::PlusEq(_) => "+=",
            Token::MinusEq(_) => "-=",
            Token::StarEq(_) => "*=",
            Token::SlashEq(_) => "/=",
            Token::PercentEq(_) => "%=",
            Token::PlusPlus(_) => "++",
            Token::MinusMinus(_) => "--",
            Token::Dot(_) => ".",
            Token::Ellipsis(_) => "...",
            Token::Arrow(_) => "->",
            Token::ColonColon(_) => "::",
            Token::Question(_) => "?",
            Token::Colon(_) => ":",
            Token::At(_) => "@",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::LBrace(_) => "{",
            Token::RBrace(_) => "}",
            Token::LBracket(_) => "[",
            Token::RBracket(_) => "]",
            Token::Semicolon(_) => ";",
            Token::Comma(_) => ",",
            Token::IntLiteral(..)
            | Token::LongLiteral(..)
            | Token::DoubleLiteral(..)
            | Token::CharLiteral(..)
            | Token::StringLiteral(..)
            | Token::Ident(..)
            | Token::Eof(_) => "",
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, Error)]
#[error("Lexer error at line {}, column {}: {message}", .span.line, .span.column)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Lexer for Java-like source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

/// Position snapshot taken at the first character of a token
#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                let mark = self.mark();
                tokens.push(Token::Eof(self.span_from(mark)));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let mark = self.mark();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            span: self.span_from(mark),
        })?;

        let token: fn(Span) -> Token = match ch {
            '"' => return self.string_literal(mark),
            '\'' => return self.char_literal(mark),
            '0'..='9' => return self.number_literal(mark, ch),
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                return Ok(self.identifier_or_keyword(mark, ch));
            }

            '+' => {
                if self.eat('+') {
                    Token::PlusPlus
                } else if self.eat('=') {
                    Token::PlusEq
                } else {
                    Token::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    Token::MinusMinus
                } else if self.eat('=') {
                    Token::MinusEq
                } else if self.eat('>') {
                    Token::Arrow
                } else {
                    Token::Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    Token::StarEq
                } else {
                    Token::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    Token::SlashEq
                } else {
                    Token::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    Token::PercentEq
                } else {
                    Token::Percent
                }
            }
            '=' => {
                if self.eat('=') {
                    Token::EqEq
                } else {
                    Token::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    Token::NotEq
                } else {
                    Token::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '&' => {
                if self.eat('&') {
                    Token::AndAnd
                } else {
                    Token::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    Token::OrOr
                } else {
                    Token::Pipe
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Token::Ellipsis
                } else {
                    Token::Dot
                }
            }
            ':' => {
                if self.eat(':') {
                    Token::ColonColon
                } else {
                    Token::Colon
                }
            }
            '^' => Token::Caret,
            '~' => Token::Tilde,
            '?' => Token::Question,
            '@' => Token::At,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ';' => Token::Semicolon,
            ',' => Token::Comma,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    span: self.span_from(mark),
                })
            }
        };

        Ok(token(self.span_from(mark)))
    }

    /// Parse a string literal, or a `"""` text block
    fn string_literal(&mut self, mark: Mark) -> Result<Token, LexError> {
        if self.peek() == Some('"') && self.peek_ahead(1) == Some('"') {
            self.advance();
            self.advance();
            return self.text_block(mark);
        }

        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(Token::StringLiteral(string, self.span_from(mark)));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    string.push(self.escape_sequence(mark)?);
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            span: self.span_from(mark),
        })
    }

    fn text_block(&mut self, mark: Mark) -> Result<Token, LexError> {
        // Content starts on the line after the opening delimiter.
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }

        let mut raw = String::new();
        while !self.is_at_end() {
            if self.peek() == Some('"')
                && self.peek_ahead(1) == Some('"')
                && self.peek_ahead(2) == Some('"')
            {
                self.advance();
                self.advance();
                self.advance();
                return Ok(Token::StringLiteral(
                    strip_text_block_indent(&raw),
                    self.span_from(mark),
                ));
            }
            if self.peek() == Some('\\') {
                self.advance();
                raw.push(self.escape_sequence(mark)?);
            } else if let Some(ch) = self.advance() {
                raw.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated text block".to_string(),
            span: self.span_from(mark),
        })
    }

    /// Parse character literal
    fn char_literal(&mut self, mark: Mark) -> Result<Token, LexError> {
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input in character literal".to_string(),
            span: self.span_from(mark),
        })?;

        let value = match ch {
            '\\' => self.escape_sequence(mark)?,
            '\'' | '\n' => {
                return Err(LexError {
                    message: "Empty character literal".to_string(),
                    span: self.span_from(mark),
                })
            }
            other => other,
        };

        if !self.eat('\'') {
            return Err(LexError {
                message: "Expected closing quote in character literal".to_string(),
                span: self.span_from(mark),
            });
        }

        Ok(Token::CharLiteral(value, self.span_from(mark)))
    }

    /// Decode the escape after a consumed backslash
    fn escape_sequence(&mut self, mark: Mark) -> Result<char, LexError> {
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input in escape sequence".to_string(),
            span: self.span_from(mark),
        })?;

        let value = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            's' => ' ',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'u' => {
                while self.peek() == Some('u') {
                    self.advance();
                }
                let mut hex = String::new();
                for _ in 0..4 {
                    match self.advance() {
                        Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => {
                            return Err(LexError {
                                message: "Incomplete unicode escape".to_string(),
                                span: self.span_from(mark),
                            })
                        }
                    }
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexError {
                        message: format!("Invalid unicode escape: \\u{}", hex),
                        span: self.span_from(mark),
                    })?
            }
            _ => {
                return Err(LexError {
                    message: format!("Unknown escape sequence: \\{}", escaped),
                    span: self.span_from(mark),
                });
            }
        };

        Ok(value)
    }

    /// Parse an integer or floating-point literal, with `_` separators and
    /// an optional type suffix.
    fn number_literal(&mut self, mark: Mark, first_digit: char) -> Result<Token, LexError> {
        if first_digit == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let mut hex = String::new();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_hexdigit() || ch == '_' {
                    if ch != '_' {
                        hex.push(ch);
                    }
                    self.advance();
                } else {
                    break;
                }
            }
            let is_long = self.eat_any(&['l', 'L']);
            let span = self.span_from(mark);
            let value = u64::from_str_radix(&hex, 16).map_err(|_| LexError {
                message: format!("Invalid hex literal: 0x{}", hex),
                span,
            })?;
            // Hex literals spell the bit pattern, so 0xFFFFFFFF is the int -1
            return Ok(if is_long {
                Token::LongLiteral(value as i64, span)
            } else {
                let bits = u32::try_from(value).map_err(|_| LexError {
                    message: format!("Hex literal does not fit in an int: 0x{}", hex),
                    span,
                })?;
                Token::IntLiteral(i64::from(bits as i32), span)
            });
        }

        let mut digits = String::new();
        digits.push(first_digit);
        self.take_digits(&mut digits);

        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            digits.push('.');
            self.advance();
            self.take_digits(&mut digits);
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let signed = matches!(self.peek_ahead(1), Some('+') | Some('-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_ahead(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                digits.push('e');
                self.advance();
                if signed {
                    if let Some(sign) = self.advance() {
                        digits.push(sign);
                    }
                }
                self.take_digits(&mut digits);
            }
        }

        let mut is_long = false;
        if self.eat_any(&['f', 'F', 'd', 'D']) {
            is_float = true;
        } else {
            is_long = self.eat_any(&['l', 'L']);
        }

        let span = self.span_from(mark);
        if is_float {
            let value = digits.parse::<f64>().map_err(|_| LexError {
                message: format!("Invalid floating-point literal: {}", digits),
                span,
            })?;
            Ok(Token::DoubleLiteral(value, span))
        } else {
            let value = digits.parse::<i64>().map_err(|_| LexError {
                message: format!("Invalid integer literal: {}", digits),
                span,
            })?;
            Ok(if is_long {
                Token::LongLiteral(value, span)
            } else {
                Token::IntLiteral(value, span)
            })
        }
    }

    fn take_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
            } else if ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn identifier_or_keyword(&mut self, mark: Mark, first_char: char) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let span = self.span_from(mark);
        match ident.as_str() {
            "class" => Token::Class(span),
            "interface" => Token::Interface(span),
            "enum" => Token::Enum(span),
            "static" => Token::Static(span),
            "new" => Token::New(span),
            "true" => Token::True(span),
            "false" => Token::False(span),
            "null" => Token::Null(span),
            "import" => Token::Import(span),
            "package" => Token::Package(span),
            _ => Token::Ident(ident, span),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let mark = self.mark();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            span: self.span_from(mark),
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_any(&mut self, expected: &[char]) -> bool {
        match self.peek() {
            Some(c) if expected.contains(&c) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;
        self.offset += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.offset, self.offset, mark.line, mark.column)
    }
}

/// Remove the common leading indentation of a text block's lines
fn strip_text_block_indent(raw: &str) -> String {
    let indent = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in raw.split_inclusive('\n') {
        let cut = line.len().min(indent);
        match (line.get(..cut), line.get(cut..)) {
            (Some(prefix), Some(rest)) if prefix.trim().is_empty() => out.push_str(rest),
            _ => out.push_str(line.trim_start()),
        }
    }
    // The closing delimiter sits on its own line; drop its indentation.
    if let Some(last_newline) = out.rfind('\n') {
        if out[last_newline + 1..].trim().is_empty() {
            out.truncate(last_newline + 1);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("public static void main(String[] args) { }");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "public"));
        assert!(matches!(tokens[1], Token::Static(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "void"));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[4], Token::LParen(_)));
        assert!(matches!(tokens[5], Token::Ident(ref s, _) if s == "String"));
        assert!(matches!(tokens[6], Token::LBracket(_)));
        assert!(matches!(tokens[7], Token::RBracket(_)));
        assert!(matches!(tokens[8], Token::Ident(ref s, _) if s == "args"));
        assert!(matches!(tokens[9], Token::RParen(_)));
        assert!(matches!(tokens[10], Token::LBrace(_)));
        assert!(matches!(tokens[11], Token::RBrace(_)));
        assert!(matches!(tokens[12], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("++ -- += -= == != && || -> :: ...");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::PlusPlus(_)));
        assert!(matches!(tokens[1], Token::MinusMinus(_)));
        assert!(matches!(tokens[2], Token::PlusEq(_)));
        assert!(matches!(tokens[3], Token::MinusEq(_)));
        assert!(matches!(tokens[4], Token::EqEq(_)));
        assert!(matches!(tokens[5], Token::NotEq(_)));
        assert!(matches!(tokens[6], Token::AndAnd(_)));
        assert!(matches!(tokens[7], Token::OrOr(_)));
        assert!(matches!(tokens[8], Token::Arrow(_)));
        assert!(matches!(tokens[9], Token::ColonColon(_)));
        assert!(matches!(tokens[10], Token::Ellipsis(_)));
    }

    #[test]
    fn test_nested_generics_close_with_single_gt() {
        let mut lexer = Lexer::new("Map<String, List<Integer>>");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[7], Token::Gt(_)));
        assert!(matches!(tokens[8], Token::Gt(_)));
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42 3.5 1_000 10L 2f 1e3 0xFF");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::IntLiteral(42, _)));
        assert!(matches!(tokens[1], Token::DoubleLiteral(v, _) if v == 3.5));
        assert!(matches!(tokens[2], Token::IntLiteral(1000, _)));
        assert!(matches!(tokens[3], Token::LongLiteral(10, _)));
        assert!(matches!(tokens[4], Token::DoubleLiteral(v, _) if v == 2.0));
        assert!(matches!(tokens[5], Token::DoubleLiteral(v, _) if v == 1000.0));
        assert!(matches!(tokens[6], Token::IntLiteral(255, _)));
    }

    #[test]
    fn test_hex_literals_are_bit_patterns() {
        let mut lexer = Lexer::new("0xFFFFFFFF 0xFFFFFFFFL");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[0], Token::IntLiteral(-1, _)));
        assert!(matches!(tokens[1], Token::LongLiteral(4_294_967_295, _)));
    }

    #[test]
    fn test_member_access_on_int_is_not_a_decimal() {
        let mut lexer = Lexer::new("1.toString");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[0], Token::IntLiteral(1, _)));
        assert!(matches!(tokens[1], Token::Dot(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("int x; // comment\nint y; /* block\ncomment */ int z;");
        let tokens = lexer.tokenize().unwrap();

        let idents: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Ident(s, _) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(idents, vec!["int", "x", "int", "y", "int", "z"]);
    }

    #[test]
    fn test_string_and_char_escapes() {
        let mut lexer = Lexer::new(r#""tab\there" '\n' 'A'"#);
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::StringLiteral(ref s, _) if s == "tab\there"));
        assert!(matches!(tokens[1], Token::CharLiteral('\n', _)));
        assert!(matches!(tokens[2], Token::CharLiteral('A', _)));
    }

    #[test]
    fn test_spans_slice_original_text() {
        let source = "x = \"héllo\" + 1;";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[2].span().text(source), "\"héllo\"");
        assert_eq!(tokens[4].span().text(source), "1");
        assert_eq!(tokens[4].span().column, 15);
    }

    #[test]
    fn test_unterminated_string_reports_line() {
        let mut lexer = Lexer::new("a\n\"open");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.span.line, 2);
        assert!(err.message.contains("Unterminated string"));
    }

    #[test]
    fn test_text_block() {
        let mut lexer = Lexer::new("\"\"\"\n    hi\n      there\n    \"\"\"");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[0], Token::StringLiteral(ref s, _) if s == "hi\n  there\n"));
    }
}
