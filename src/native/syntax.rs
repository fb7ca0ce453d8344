//! Pre-compile balance check
//!
//! Counts braces and parentheses outside literals and comments and looks
//! for string or character literals that never close. Obviously broken input
//! is rejected here without starting the compiler.

use crate::native::NativeError;
use crate::parser::scan::{CharClass, ScanState};

pub fn check_balance(text: &str) -> Result<(), NativeError> {
    let mut state = ScanState::new();
    let (mut open_braces, mut close_braces) = (0usize, 0usize);
    let (mut open_parens, mut close_parens) = (0usize, 0usize);
    let mut line = 1;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let in_code = !state.in_string() && !state.in_char() && !state.in_comment();

        // Text blocks: skip to the closing delimiter in one step.
        if in_code && text[index..].starts_with("\"\"\"") {
            let body_start = index + 3;
            let Some(end) = text[body_start..].find("\"\"\"") else {
                return Err(unclosed("Unclosed string literal", line));
            };
            let close = body_start + end + 3;
            line += text[index..close].matches('\n').count();
            while chars.peek().is_some_and(|(i, _)| *i < close) {
                chars.next();
            }
            continue;
        }

        if ch == '\n' {
            if state.in_string() {
                return Err(unclosed("Unclosed string literal", line));
            }
            if state.in_char() {
                return Err(unclosed("Unclosed character literal", line));
            }
            line += 1;
        }

        if state.step(ch, chars.peek().map(|(_, c)| *c)) != CharClass::Code {
            continue;
        }
        match ch {
            '{' => open_braces += 1,
            '}' => close_braces += 1,
            '(' => open_parens += 1,
            ')' => close_parens += 1,
            _ => {}
        }
    }

    if state.in_string() {
        return Err(unclosed("Unclosed string literal", line));
    }
    if state.in_char() {
        return Err(unclosed("Unclosed character literal", line));
    }
    if open_braces != close_braces {
        return Err(NativeError::SyntaxImbalance {
            message: format!("Mismatched braces: {} open, {} close", open_braces, close_braces),
            line: None,
        });
    }
    if open_parens != close_parens {
        return Err(NativeError::SyntaxImbalance {
            message: format!("Mismatched parentheses: {} open, {} close", open_parens, close_parens),
            line: None,
        });
    }
    Ok(())
}

fn unclosed(message: &str, line: usize) -> NativeError {
    NativeError::SyntaxImbalance {
        message: message.to_string(),
        line: Some(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Option<String> {
        check_balance(text).err().map(|e| e.to_string())
    }

    #[test]
    fn test_balanced() {
        assert_eq!(message("class A { void f() { g(\"}\", ')'); } } // {"), None);
        assert_eq!(message("String s = \"\"\"\n  {(\n  \"\"\";"), None);
    }

    #[test]
    fn test_counts() {
        assert_eq!(
            message("class A { void f() {"),
            Some("Mismatched braces: 2 open, 0 close".to_string())
        );
        assert_eq!(
            message("f(g(1);"),
            Some("Mismatched parentheses: 2 open, 1 close".to_string())
        );
    }

    #[test]
    fn test_unclosed_literals() {
        let err = check_balance("int a;\nString s = \"abc;\nint b;").unwrap_err();
        assert!(matches!(err, NativeError::SyntaxImbalance { line: Some(2), .. }));
        assert_eq!(err.to_string(), "Unclosed string literal");
        assert_eq!(message("char c = 'a;"), Some("Unclosed character literal".to_string()));
        assert_eq!(message("x = \"\"\" never closed"), Some("Unclosed string literal".to_string()));
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(message("s = \"a\\\"b\";"), None);
        assert_eq!(message("c = '\\'';"), None);
    }
}
