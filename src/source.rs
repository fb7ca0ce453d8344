//! Snippet normalization
//!
//! A [`SourceUnit`] pairs the submitted text with a compilable form of it:
//!
//! - text that declares `public class X` is used as is, and `X` becomes the
//!   entry type name;
//! - text whose top-level (non-public) class declares `static main` is also
//!   used as is, with that class as the entry type;
//! - text that has a `static void main` but no public class is wrapped in a
//!   `public class TempClass { ... }` shell;
//! - bare statements are wrapped in both the class shell and a generated
//!   `public static void main(String[] args)`.
//!
//! `import` lines inside wrapped text are moved above the class shell, one
//! per line. The unit keeps a map from every normalized line to the raw line
//! it came from, so compiler diagnostics, including those on a moved import,
//! point back at the submitted text through [`SourceUnit::raw_line`].

use crate::parser::scan::{code_mask, find_word_sequence, identifier_at};
use crate::parser::Parser;
use std::path::PathBuf;

/// Entry type name used when the snippet does not declare a public class
pub const DEFAULT_ENTRY_TYPE: &str = "TempClass";

const BODY_INDENT: &str = "        ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    raw: String,
    entry_type_name: String,
    normalized: String,
    /// Raw line of each normalized line; empty when the text is used as is
    line_map: Vec<Option<usize>>,
    package: Option<String>,
}

impl SourceUnit {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();

        if let Some(name) = public_class_name(&raw).or_else(|| top_level_main_type(&raw)) {
            return Self {
                entry_type_name: name,
                package: package_name(&raw),
                normalized: raw.clone(),
                raw,
                line_map: Vec::new(),
            };
        }

        let mut lines = WrappedLines::default();
        let raw_lines: Vec<&str> = raw.lines().collect();
        for (index, line) in raw_lines.iter().enumerate() {
            if is_import(line) {
                lines.push(line.trim(), Some(index + 1));
            }
        }
        lines.push(format!("public class {DEFAULT_ENTRY_TYPE} {{"), None);

        let wrap_main = !has_main_method(&raw);
        if wrap_main {
            lines.push("    public static void main(String[] args) {", None);
        }
        for (index, line) in raw_lines.iter().enumerate() {
            if is_import(line) || line.trim().is_empty() {
                lines.push("", None);
            } else if wrap_main {
                lines.push(format!("{BODY_INDENT}{line}"), Some(index + 1));
            } else {
                lines.push(*line, Some(index + 1));
            }
        }
        if wrap_main {
            lines.push("    }", None);
        }
        lines.push("}", None);

        Self {
            raw,
            entry_type_name: DEFAULT_ENTRY_TYPE.to_string(),
            normalized: lines.text,
            line_map: lines.map,
            package: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn entry_type_name(&self) -> &str {
        &self.entry_type_name
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Map a 1-based line of the normalized form back to the raw snippet.
    /// `None` for lines that only exist in the generated wrapper.
    pub fn raw_line(&self, normalized_line: usize) -> Option<usize> {
        if self.line_map.is_empty() {
            let raw_lines = self.raw.lines().count().max(1);
            return (1..=raw_lines).contains(&normalized_line).then_some(normalized_line);
        }
        self.line_map.get(normalized_line.checked_sub(1)?).copied().flatten()
    }

    /// Entry type name qualified with the declared package, as the launcher expects it
    pub fn qualified_entry_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.entry_type_name),
            None => self.entry_type_name.clone(),
        }
    }

    /// Class file path relative to the class output directory
    pub fn class_file(&self) -> PathBuf {
        let mut path = PathBuf::new();
        if let Some(package) = &self.package {
            path.extend(package.split('.'));
        }
        path.push(format!("{}.class", self.entry_type_name));
        path
    }

    /// File name the entry type must be compiled from
    pub fn file_name(&self) -> String {
        format!("{}.java", self.entry_type_name)
    }
}

fn public_class_name(text: &str) -> Option<String> {
    let at = find_word_sequence(text, &["public", "class"])?;
    let mask = code_mask(text);
    let after = mask[at..].find("class")? + at + "class".len();
    identifier_at(text, after).map(str::to_string)
}

fn top_level_main_type(text: &str) -> Option<String> {
    find_word_sequence(text, &["class"])?;
    let unit = Parser::new(text).ok()?.parse_compilation_unit().ok()?;
    unit.types
        .iter()
        .find(|t| t.methods.iter().any(|m| m.name == "main" && m.is_static()))
        .map(|t| t.name.clone())
}

fn package_name(text: &str) -> Option<String> {
    let at = find_word_sequence(text, &["package"])?;
    let mask = code_mask(text);
    let start = at + "package".len();
    let end = start + mask[start..].find(';')?;
    let name: String = mask[start..end].chars().filter(|c| !c.is_whitespace()).collect();
    let valid = !name.is_empty()
        && name
            .split('.')
            .all(|part| identifier_at(part, 0).is_some_and(|ident| ident == part));
    valid.then_some(name)
}

fn has_main_method(text: &str) -> bool {
    find_word_sequence(text, &["static", "void", "main"]).is_some()
}

fn is_import(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("import ") && trimmed.ends_with(';')
}

/// Normalized text under construction, with the raw line of each line
#[derive(Default)]
struct WrappedLines {
    text: String,
    map: Vec<Option<usize>>,
}

impl WrappedLines {
    fn push(&mut self, line: impl AsRef<str>, raw_line: Option<usize>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
        self.map.push(raw_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bare_statements_get_class_and_main() {
        let unit = SourceUnit::new("System.out.println(\"Hello, World!\");");
        assert_eq!(unit.entry_type_name(), "TempClass");
        assert_eq!(
            unit.normalized(),
            "public class TempClass {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}\n"
        );
        assert_eq!(unit.raw_line(3), Some(1));
        assert_eq!(unit.raw_line(2), None);
    }

    #[test]
    fn test_existing_main_only_gets_class_shell() {
        let raw = "public static void main(String[] args) {\n    System.out.println(1);\n}";
        let unit = SourceUnit::new(raw);
        assert_eq!(unit.normalized(), format!("public class TempClass {{\n{raw}\n}}\n"));
        assert_eq!(unit.normalized().matches("void main").count(), 1);
        assert_eq!(unit.raw_line(3), Some(2));
    }

    #[test]
    fn test_public_class_is_kept_verbatim() {
        let raw = "import java.util.*;\npublic class Test {\n  public static void main(String[] a) {}\n}";
        let unit = SourceUnit::new(raw);
        assert_eq!(unit.entry_type_name(), "Test");
        assert_eq!(unit.normalized(), raw);
        assert_eq!(unit.raw_line(2), Some(2));
        assert_eq!(unit.file_name(), "Test.java");
    }

    #[test]
    fn test_package_qualifies_entry() {
        let raw = "package demo.app;\n\npublic class Main {\n  public static void main(String[] a) {}\n}";
        let unit = SourceUnit::new(raw);
        assert_eq!(unit.qualified_entry_name(), "demo.app.Main");
        assert_eq!(unit.class_file(), PathBuf::from("demo/app/Main.class"));
        assert_eq!(SourceUnit::new("int x = 1;").class_file(), PathBuf::from("TempClass.class"));
    }

    #[test]
    fn test_package_private_class_with_main_is_the_entry() {
        let raw = "class Runner {\n    static void main(String[] args) { }\n}";
        let unit = SourceUnit::new(raw);
        assert_eq!(unit.entry_type_name(), "Runner");
        assert_eq!(unit.normalized(), raw);
    }

    #[test]
    fn test_class_name_in_string_is_ignored() {
        let unit = SourceUnit::new("System.out.println(\"public class Fake\");");
        assert_eq!(unit.entry_type_name(), DEFAULT_ENTRY_TYPE);
    }

    #[test]
    fn test_imports_move_above_the_class_shell() {
        let unit = SourceUnit::new("int x = 1;\nimport java.util.List;\nimport com.example.Missing;\nSystem.out.println(x);");
        let lines: Vec<&str> = unit.normalized().lines().collect();
        assert_eq!(lines[0], "import java.util.List;");
        assert_eq!(lines[1], "import com.example.Missing;");
        assert_eq!(lines[2], "public class TempClass {");
        assert_eq!(unit.raw_line(1), Some(2));
        assert_eq!(unit.raw_line(2), Some(3));
        assert_eq!(unit.raw_line(3), None);

        let print_line = lines.iter().position(|l| l.contains("println")).unwrap() + 1;
        assert_eq!(unit.raw_line(print_line), Some(4));
        let declaration_line = lines.iter().position(|l| l.contains("int x")).unwrap() + 1;
        assert_eq!(unit.raw_line(declaration_line), Some(1));
    }
}
