//! Literal- and comment-aware character scanning
//!
//! Several passes work on raw text instead of tokens: the statement splitter,
//! the syntax balance check, and snippet normalization all need to know
//! whether a character is code or sits inside a string, character literal or
//! comment, even when the text does not lex cleanly. [`ScanState`] is the
//! shared state machine for that; [`code_mask`] and [`find_closing`] are the
//! common queries built on it.

/// Classification of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Code,
    /// Inside a string or char literal, delimiters included
    Literal,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Code,
    Str,
    Char,
    LineComment,
    BlockComment,
}

/// Incremental scanner; feed every character in order through [`ScanState::step`].
#[derive(Debug, Clone, Default)]
pub struct ScanState {
    mode: Mode,
    escaped: bool,
    /// The next character belongs to a two-character comment delimiter
    swallow_next: bool,
    /// Mode to enter after the swallowed character
    after_swallow: Mode,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_string(&self) -> bool {
        self.mode == Mode::Str
    }

    pub fn in_char(&self) -> bool {
        self.mode == Mode::Char
    }

    pub fn in_comment(&self) -> bool {
        matches!(self.mode, Mode::LineComment | Mode::BlockComment)
    }

    /// Classify `ch`, given the character that follows it.
    ///
    /// A newline always ends string and char literals, so one unterminated
    /// literal cannot swallow the rest of the text.
    pub fn step(&mut self, ch: char, next: Option<char>) -> CharClass {
        if self.swallow_next {
            self.swallow_next = false;
            self.mode = self.after_swallow;
            return CharClass::Comment;
        }

        match self.mode {
            Mode::Code => match ch {
                '/' if next == Some('/') => {
                    self.begin_swallow(Mode::LineComment);
                    CharClass::Comment
                }
                '/' if next == Some('*') => {
                    self.begin_swallow(Mode::BlockComment);
                    CharClass::Comment
                }
                '"' => {
                    self.mode = Mode::Str;
                    CharClass::Literal
                }
                '\'' => {
                    self.mode = Mode::Char;
                    CharClass::Literal
                }
                _ => CharClass::Code,
            },
            Mode::Str | Mode::Char => {
                let closing = if self.mode == Mode::Str { '"' } else { '\'' };
                if ch == '\n' {
                    self.mode = Mode::Code;
                    self.escaped = false;
                    return CharClass::Code;
                }
                if self.escaped {
                    self.escaped = false;
                } else if ch == '\\' {
                    self.escaped = true;
                } else if ch == closing {
                    self.mode = Mode::Code;
                }
                CharClass::Literal
            }
            Mode::LineComment => {
                if ch == '\n' {
                    self.mode = Mode::Code;
                    CharClass::Code
                } else {
                    CharClass::Comment
                }
            }
            Mode::BlockComment => {
                if ch == '*' && next == Some('/') {
                    self.begin_swallow(Mode::Code);
                }
                CharClass::Comment
            }
        }
    }

    fn begin_swallow(&mut self, then: Mode) {
        self.swallow_next = true;
        self.after_swallow = then;
    }
}

/// Copy of `text` with every literal and comment character replaced by
/// spaces. Byte offsets and newlines are preserved, so positions found in
/// the mask index straight into the original.
pub fn code_mask(text: &str) -> String {
    let mut state = ScanState::new();
    let mut masked = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        let class = state.step(ch, chars.peek().copied());
        if class == CharClass::Code || ch == '\n' {
            masked.push(ch);
        } else {
            masked.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    }

    masked
}

/// Byte index of the delimiter closing the one at `open_index`, skipping
/// delimiters inside literals and comments. `None` if it never closes.
pub fn find_closing(text: &str, open_index: usize, open: char, close: char) -> Option<usize> {
    let tail = text.get(open_index..)?;
    if !tail.starts_with(open) {
        return None;
    }

    let mut state = ScanState::new();
    let mut depth = 0usize;
    let mut chars = tail.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);
        if state.step(ch, next) != CharClass::Code {
            continue;
        }
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(open_index + offset);
            }
        }
    }

    None
}

/// Split on `separator` where it appears as code outside any parentheses,
/// brackets or braces. Pieces are trimmed; a trailing empty piece is dropped.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut state = ScanState::new();
    let mut depth = 0usize;
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        let next = chars.peek().map(|(_, c)| *c);
        if state.step(ch, next) != CharClass::Code {
            continue;
        }
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                pieces.push(text[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    let last = text[start..].trim();
    if !last.is_empty() || !pieces.is_empty() {
        pieces.push(last);
    }
    if pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}

/// Position of `words` appearing in order as whole words separated only by
/// whitespace, searched in code (not literals or comments).
pub fn find_word_sequence(text: &str, words: &[&str]) -> Option<usize> {
    let mask = code_mask(text);
    let first = *words.first()?;
    let mut search_from = 0;

    while let Some(found) = mask.get(search_from..)?.find(first) {
        let start = search_from + found;
        search_from = start + first.len();

        if !is_word_boundary(&mask, start, start + first.len()) {
            continue;
        }

        let mut cursor = start + first.len();
        let mut matched = true;
        for word in &words[1..] {
            let rest = &mask[cursor..];
            let trimmed = rest.trim_start();
            let gap = rest.len() - trimmed.len();
            if gap == 0 || !trimmed.starts_with(word) {
                matched = false;
                break;
            }
            let word_start = cursor + gap;
            if !is_word_boundary(&mask, word_start, word_start + word.len()) {
                matched = false;
                break;
            }
            cursor = word_start + word.len();
        }

        if matched {
            return Some(start);
        }
    }

    None
}

/// Identifier immediately after `index`, skipping leading whitespace
pub fn identifier_at(text: &str, index: usize) -> Option<&str> {
    let rest = text.get(index..)?.trim_start();
    let end = rest
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    let ident = &rest[..end];
    let starts_well = ident
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
    starts_well.then_some(ident)
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_ident(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_ident(c));
    before_ok && after_ok
}
