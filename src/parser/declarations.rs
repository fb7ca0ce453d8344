//! Declaration parsing implementation
//!
//! Builds a [`CompilationUnit`] skeleton: package, imports, type declarations
//! and their method signatures. Method bodies, field initializers and
//! initializer blocks are skipped by brace matching and recorded only as
//! spans, which is all the interpreter needs to pull the body of `main` out
//! of a class.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`]
//! struct, except the public [`Parser::parse_compilation_unit`] entry point.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// Identifiers accepted as declaration modifiers (`static` has its own token)
const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
    "default",
    "sealed",
];

impl Parser {
    /// Parse a whole compilation unit into its declaration skeleton
    pub fn parse_compilation_unit(&mut self) -> Result<CompilationUnit, ParseError> {
        let mut unit = CompilationUnit::default();

        if self.match_token(&Token::Package(Span::default())) {
            unit.package = Some(self.parse_qualified_name()?);
            self.expect_semicolon("after package declaration")?;
        }

        while self.match_token(&Token::Import(Span::default())) {
            self.match_token(&Token::Static(Span::default()));
            let mut name = self.parse_qualified_name()?;
            if self.match_token(&Token::Dot(Span::default())) {
                self.expect_token(&Token::Star(Span::default()), "Expected '*' in import")?;
                name.push_str(".*");
            }
            self.expect_semicolon("after import")?;
            unit.imports.push(name);
        }

        while !self.is_at_end() {
            if self.match_token(&Token::Semicolon(Span::default())) {
                continue;
            }
            let start = self.current_span();
            let modifiers = self.parse_modifiers()?;
            unit.types.push(self.parse_type_declaration(modifiers, start)?);
        }

        Ok(unit)
    }

    fn expect_semicolon(&mut self, ctx: &str) -> Result<Span, ParseError> {
        self.expect_token(&Token::Semicolon(Span::default()), &format!("Expected ';' {ctx}"))
    }

    /// Parse `a.b.c`, stopping before a `.*` wildcard
    fn parse_qualified_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier()?;
        while self.check(&Token::Dot(Span::default()))
            && matches!(self.peek_ahead(1), Some(Token::Ident(..)))
        {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok(name)
    }

    /// Parse modifiers and annotations preceding a declaration
    fn parse_modifiers(&mut self) -> Result<Vec<String>, ParseError> {
        let mut modifiers = Vec::new();

        loop {
            if self.check(&Token::At(Span::default()))
                && !matches!(self.peek_ahead(1), Some(Token::Interface(_)))
            {
                self.advance();
                self.parse_qualified_name()?;
                if self.check(&Token::LParen(Span::default())) {
                    self.skip_balanced(&Token::LParen(Span::default()), &Token::RParen(Span::default()))?;
                }
            } else if self.match_token(&Token::Static(Span::default())) {
                modifiers.push("static".to_string());
            } else if let Token::Ident(name, _) = self.peek() {
                if !MODIFIERS.contains(&name.as_str()) {
                    break;
                }
                modifiers.push(name.clone());
                self.advance();
            } else {
                break;
            }
        }

        Ok(modifiers)
    }

    fn type_kind_at_cursor(&self) -> Option<TypeKind> {
        match self.peek() {
            Token::Class(_) => Some(TypeKind::Class),
            Token::Interface(_) => Some(TypeKind::Interface),
            Token::Enum(_) => Some(TypeKind::Enum),
            Token::At(_) if matches!(self.peek_ahead(1), Some(Token::Interface(_))) => {
                Some(TypeKind::Interface)
            }
            Token::Ident(name, _)
                if name == "record" && matches!(self.peek_ahead(1), Some(Token::Ident(..))) =>
            {
                Some(TypeKind::Record)
            }
            _ => None,
        }
    }

    /// Parse `class Name ... { members }` after its modifiers
    fn parse_type_declaration(&mut self, modifiers: Vec<String>, start: Span) -> Result<TypeDecl, ParseError> {
        let kind = self
            .type_kind_at_cursor()
            .ok_or_else(|| self.error_here("Expected class, interface, enum or record"))?;
        if self.check(&Token::At(Span::default())) {
            self.advance();
        }
        self.advance();
        let name = self.expect_identifier()?;

        // Type parameters, record header, extends/implements/permits clauses
        while !self.check(&Token::LBrace(Span::default())) {
            if self.is_at_end() {
                return Err(self.error_here(&format!("Expected '{{' to open type {}", name)));
            }
            self.advance();
        }

        let mut decl = TypeDecl {
            kind,
            name,
            modifiers,
            methods: Vec::new(),
            nested: Vec::new(),
            span: start,
        };
        self.parse_type_body(&mut decl)?;
        decl.span = start.to(self.previous_span());

        Ok(decl)
    }

    fn parse_type_body(&mut self, decl: &mut TypeDecl) -> Result<(), ParseError> {
        self.expect_token(&Token::LBrace(Span::default()), "Expected '{'")?;

        if decl.kind == TypeKind::Enum {
            self.skip_enum_constants()?;
        }

        loop {
            if self.match_token(&Token::RBrace(Span::default())) {
                return Ok(());
            }
            if self.is_at_end() {
                return Err(self.error_here(&format!("Expected '}}' to close type {}", decl.name)));
            }
            if self.match_token(&Token::Semicolon(Span::default())) {
                continue;
            }

            // Instance and static initializer blocks
            if self.check(&Token::LBrace(Span::default())) {
                self.skip_block()?;
                continue;
            }
            if self.check(&Token::Static(Span::default()))
                && matches!(self.peek_ahead(1), Some(Token::LBrace(_)))
            {
                self.advance();
                self.skip_block()?;
                continue;
            }

            let start = self.current_span();
            let modifiers = self.parse_modifiers()?;

            if self.type_kind_at_cursor().is_some() {
                let nested = self.parse_type_declaration(modifiers, start)?;
                decl.nested.push(nested);
                continue;
            }

            if let Some(method) = self.parse_member(modifiers, start)? {
                decl.methods.push(method);
            }
        }
    }

    /// Parse a field or method; fields yield `None`
    fn parse_member(&mut self, modifiers: Vec<String>, start: Span) -> Result<Option<MethodDecl>, ParseError> {
        loop {
            match self.peek() {
                Token::Ident(name, _) if matches!(self.peek_ahead(1), Some(Token::LParen(_))) => {
                    let name = name.clone();
                    self.advance();
                    return self.parse_method_rest(name, modifiers, start).map(Some);
                }
                Token::Lt(_) => {
                    self.skip_balanced(&Token::Lt(Span::default()), &Token::Gt(Span::default()))?;
                }
                Token::Semicolon(_) => {
                    self.advance();
                    return Ok(None);
                }
                Token::Eq(_) => {
                    self.skip_initializer()?;
                    return Ok(None);
                }
                Token::RBrace(_) | Token::LBrace(_) | Token::Eof(_) => {
                    return Err(self.error_here("Expected field or method declaration"));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn parse_method_rest(&mut self, name: String, modifiers: Vec<String>, start: Span) -> Result<MethodDecl, ParseError> {
        let params = self.skip_balanced(&Token::LParen(Span::default()), &Token::RParen(Span::default()))?;

        // throws clause, array dimensions, annotation defaults
        loop {
            match self.peek() {
                Token::LBrace(_) => {
                    let body = self.skip_block()?;
                    return Ok(MethodDecl {
                        name,
                        modifiers,
                        params,
                        body: Some(body),
                        span: start.to(self.previous_span()),
                    });
                }
                Token::Semicolon(_) => {
                    self.advance();
                    return Ok(MethodDecl {
                        name,
                        modifiers,
                        params,
                        body: None,
                        span: start.to(self.previous_span()),
                    });
                }
                Token::RBrace(_) | Token::Eof(_) => {
                    return Err(self.error_here(&format!("Expected body for method {}", name)));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_block(&mut self) -> Result<Span, ParseError> {
        self.skip_balanced(&Token::LBrace(Span::default()), &Token::RBrace(Span::default()))
    }

    /// Skip `= ...;`, allowing braces and parentheses inside the initializer
    fn skip_initializer(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::LBrace(_) | Token::LParen(_) | Token::LBracket(_) => depth += 1,
                Token::RBrace(_) | Token::RParen(_) | Token::RBracket(_) => {
                    if depth == 0 {
                        return Err(self.error_here("Unbalanced field initializer"));
                    }
                    depth -= 1;
                }
                Token::Semicolon(_) if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Token::Eof(_) => return Err(self.error_here("Expected ';' after field")),
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip enum constants up to the `;` that starts the member section, or
    /// up to (not including) the closing brace of the enum.
    fn skip_enum_constants(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::LBrace(_) | Token::LParen(_) => depth += 1,
                Token::RBrace(_) if depth == 0 => return Ok(()),
                Token::RBrace(_) | Token::RParen(_) => depth = depth.saturating_sub(1),
                Token::Semicolon(_) if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Token::Eof(_) => return Err(self.error_here("Unterminated enum body")),
                _ => {}
            }
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CompilationUnit {
        Parser::new(source).unwrap().parse_compilation_unit().unwrap()
    }

    #[test]
    fn test_main_body_span() {
        let source = r#"
import java.util.*;

public class Demo {
    private int count = 0;

    public static void main(String[] args) {
        System.out.println("hi");
    }
}
"#;
        let unit = parse(source);
        assert_eq!(unit.imports, vec!["java.util.*"]);
        assert_eq!(unit.types.len(), 1);
        assert!(unit.types[0].is_public());
        assert_eq!(unit.types[0].name, "Demo");

        let main = unit.find_static_main().expect("main should be found");
        let body = main.body.unwrap().text(source);
        assert_eq!(body.trim(), "System.out.println(\"hi\");");
    }

    #[test]
    fn test_instance_main_is_ignored() {
        let unit = parse("class A { void main(String[] a) { } }");
        assert!(unit.find_static_main().is_none());
    }

    #[test]
    fn test_nested_types_and_annotations() {
        let source = r#"
@SuppressWarnings("unchecked")
public class Outer<T> extends Base implements Runnable {
    static { init(); }
    int[] values = { 1, 2, 3 };
    enum Color { RED, GREEN; void paint() {} }
    @Override
    public void run() throws Exception { }
    static class Inner {
        public static void main(String... args) { work(); }
    }
}
"#;
        let unit = parse(source);
        let outer = &unit.types[0];
        assert_eq!(outer.methods.len(), 1);
        assert_eq!(outer.methods[0].name, "run");
        assert_eq!(outer.nested.len(), 2);
        assert_eq!(outer.nested[0].kind, TypeKind::Enum);
        assert_eq!(outer.nested[0].methods[0].name, "paint");

        let main = unit.find_static_main().unwrap();
        assert_eq!(main.body.unwrap().text(source).trim(), "work();");
    }

    #[test]
    fn test_unclosed_class_is_an_error() {
        let result = Parser::new("public class A { void f() { }")
            .unwrap()
            .parse_compilation_unit();
        assert!(result.is_err());
    }
}
