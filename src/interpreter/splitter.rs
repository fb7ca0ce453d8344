//! Method body → statement text
//!
//! The interpreter never builds a statement tree. Instead a body is cut into
//! top-level statement strings, each tagged with the line it starts on:
//!
//! - `;` outside parentheses and braces ends a statement
//! - a `}` that closes a top-level block ends the statement it belongs to,
//!   so `for (...) { ... }` is a single statement
//! - a newline outside any open construct ends a statement unless the line
//!   plainly continues (trailing binary operator, leading `.` or operator on
//!   the next line, or a control header still waiting for its body)
//!
//! Comments are dropped while splitting; literals are copied through intact.

use crate::parser::scan::{code_mask, find_closing, find_word_sequence, CharClass, ScanState};

/// One top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    /// 1-based line of the statement's first character
    pub line: usize,
}

impl Statement {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    /// Leading word, e.g. `for` in `for (int i = 0; ...)`
    pub fn keyword(&self) -> &str {
        let end = self
            .text
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(self.text.len());
        &self.text[..end]
    }
}

const CONTROL_KEYWORDS: &[&str] = &["for", "while", "if", "else", "do"];

struct Splitter {
    statements: Vec<Statement>,
    current: String,
    start_line: usize,
    line: usize,
    parens: usize,
    braces: usize,
}

impl Splitter {
    fn push_char(&mut self, ch: char) {
        if self.current.trim().is_empty() && !ch.is_whitespace() {
            self.current.clear();
            self.start_line = self.line;
        }
        self.current.push(ch);
    }

    fn finish(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() && !is_skipped(text) {
            self.statements.push(Statement::new(text, self.start_line));
        }
        self.current.clear();
    }
}

/// Split `body` into statements; `first_line` is the line `body` starts on.
pub fn split_statements(body: &str, first_line: usize) -> Vec<Statement> {
    let mut splitter = Splitter {
        statements: Vec::new(),
        current: String::new(),
        start_line: first_line,
        line: first_line,
        parens: 0,
        braces: 0,
    };
    let mut state = ScanState::new();
    let mut chars = body.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let class = state.step(ch, chars.peek().map(|(_, c)| *c));

        if ch == '\n' {
            if splitter.parens == 0
                && splitter.braces == 0
                && !continues_past_newline(&splitter.current, &body[index + 1..])
            {
                splitter.finish();
            } else {
                splitter.current.push('\n');
            }
            splitter.line += 1;
            continue;
        }

        match class {
            CharClass::Comment => continue,
            CharClass::Literal => {
                splitter.push_char(ch);
                continue;
            }
            CharClass::Code => {}
        }

        match ch {
            '(' | '[' => {
                splitter.parens += 1;
                splitter.push_char(ch);
            }
            ')' | ']' => {
                splitter.parens = splitter.parens.saturating_sub(1);
                splitter.push_char(ch);
            }
            '{' => {
                splitter.braces += 1;
                splitter.push_char(ch);
            }
            '}' => {
                splitter.braces = splitter.braces.saturating_sub(1);
                splitter.push_char(ch);
                if splitter.braces == 0 && splitter.parens == 0 && !closes_initializer(&splitter.current) {
                    splitter.finish();
                }
            }
            ';' if splitter.parens == 0 && splitter.braces == 0 => splitter.finish(),
            _ => splitter.push_char(ch),
        }
    }

    splitter.finish();
    splitter.statements
}

fn is_skipped(text: &str) -> bool {
    text.starts_with("import ") || text.starts_with("package ") || text.starts_with('@')
}

/// `int[] xs = {1, 2}` and lambdas assigned with `=` keep going until `;`
fn closes_initializer(text: &str) -> bool {
    let mask = code_mask(text);
    match mask.find('{') {
        Some(open) => mask[..open].trim_end().ends_with('=') || mask[..open].trim_end().ends_with("->"),
        None => false,
    }
}

fn continues_past_newline(current: &str, rest: &str) -> bool {
    let mask = code_mask(current);
    let text = mask.trim();
    if text.is_empty() {
        return false;
    }

    if awaits_body(text) {
        return true;
    }

    let ends_with_operator = !text.ends_with("++")
        && !text.ends_with("--")
        && text.ends_with(['+', '-', '*', '/', '%', '=', '&', '|', '<', '>', '?', ':', ',', '.']);
    if ends_with_operator {
        return true;
    }

    let next_line = rest
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("//"));
    match next_line {
        Some(line) => {
            line.starts_with('.')
                || (line.starts_with(['+', '*', '/', '%', '?', ':', '&', '|'])
                    && !line.starts_with("++"))
        }
        None => false,
    }
}

/// `for (...)`, `while (...)`, `if (...)`, `else`, `do` with no body yet
fn awaits_body(text: &str) -> bool {
    let keyword = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or("");
    if !CONTROL_KEYWORDS.contains(&keyword) {
        return false;
    }
    text.ends_with(')') || text == "else" || text == "do"
}

/// Body of the first `void main(...)` found in `text`, located by brace
/// matching rather than by parsing. Returns the byte offset the body starts
/// at together with the body, braces excluded.
pub fn extract_main_body(text: &str) -> Option<(usize, &str)> {
    let at = find_word_sequence(text, &["void", "main"])?;
    let mask = code_mask(text);
    let open = at + mask[at..].find('{')?;
    let close = find_closing(text, open, '{', '}')?;
    Some((open + 1, &text[open + 1..close]))
}

/// 1-based line number of byte `offset` in `text`
pub fn line_at(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(1, |prefix| prefix.matches('\n').count() + 1)
}

/// Split a braced or single-statement loop body into statements.
///
/// `offset_line` is the line `body` starts on.
pub fn split_body(body: &str, offset_line: usize) -> Vec<Statement> {
    let trimmed = body.trim_start();
    let lead = body.len() - trimmed.len();
    let line = offset_line + body[..lead].matches('\n').count();

    if trimmed.starts_with('{') {
        if let Some(close) = find_closing(trimmed, 0, '{', '}') {
            return split_statements(&trimmed[1..close], line);
        }
    }
    split_statements(trimmed, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(statements: &[Statement]) -> Vec<&str> {
        statements.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_semicolons_and_lines() {
        let body = "\n    int x = 1; int y = 2;\n    System.out.println(x + y);\n";
        let statements = split_statements(body, 3);
        assert_eq!(
            texts(&statements),
            vec!["int x = 1", "int y = 2", "System.out.println(x + y)"]
        );
        assert_eq!(statements[0].line, 4);
        assert_eq!(statements[1].line, 4);
        assert_eq!(statements[2].line, 5);
    }

    #[test]
    fn test_block_is_one_statement() {
        let body = "for (int i = 0; i < 3; i++) {\n  System.out.println(i);\n}\nint z = 0;";
        let statements = split_statements(body, 1);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].text.starts_with("for (int i = 0; i < 3; i++) {"));
        assert!(statements[0].text.ends_with('}'));
        assert_eq!(statements[1], Statement::new("int z = 0", 4));
    }

    #[test]
    fn test_missing_semicolon_ends_at_newline() {
        let statements = split_statements("int a = 1\nint b = 2", 1);
        assert_eq!(texts(&statements), vec!["int a = 1", "int b = 2"]);
    }

    #[test]
    fn test_continuation_lines() {
        let body = "String s = \"a\" +\n    \"b\";\nlist\n    .add(1);\nfor (int i = 0; i < 2; i++)\n    total += i;";
        let statements = split_statements(body, 1);
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].text, "String s = \"a\" +\n    \"b\"");
        assert_eq!(statements[1].text, "list\n    .add(1)");
        assert_eq!(statements[2].keyword(), "for");
        assert_eq!(statements[2].line, 5);
    }

    #[test]
    fn test_comments_and_imports_are_dropped() {
        let body = "import java.util.*;\n// just a note\nint a = 1; /* inline ; */ a++;\n@SuppressWarnings(\"x\")";
        let statements = split_statements(body, 1);
        assert_eq!(texts(&statements), vec!["int a = 1", "a++"]);
    }

    #[test]
    fn test_semicolon_in_string_does_not_split() {
        let statements = split_statements("System.out.println(\"a; b\");", 1);
        assert_eq!(texts(&statements), vec!["System.out.println(\"a; b\")"]);
    }

    #[test]
    fn test_array_initializer_runs_to_semicolon() {
        let statements = split_statements("int[] xs = {1, 2};\nx++;", 1);
        assert_eq!(texts(&statements), vec!["int[] xs = {1, 2}", "x++"]);
    }

    #[test]
    fn test_textual_main_extraction() {
        let text = "class A {\n  // void main() { nope }\n  static void main(String[] a) {\n    go();\n  }\n}";
        let (offset, body) = extract_main_body(text).unwrap();
        assert_eq!(body.trim(), "go();");
        assert_eq!(line_at(text, offset), 3);
    }

    #[test]
    fn test_split_body_braced_and_single() {
        let braced = split_body(" {\n a++;\n b++;\n}", 7);
        assert_eq!(texts(&braced), vec!["a++", "b++"]);
        assert_eq!(braced[0].line, 8);

        let single = split_body(" total += i;", 2);
        assert_eq!(single, vec![Statement::new("total += i", 2)]);
    }
}
