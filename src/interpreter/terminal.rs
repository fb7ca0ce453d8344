// Captured console output for interpreted programs

use crate::interpreter::errors::InterpreterError;

/// Mock terminal recording `System.out` output
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    text: String,
    limit: usize,
}

impl CapturedOutput {
    pub fn new(limit: usize) -> Self {
        CapturedOutput {
            text: String::new(),
            limit,
        }
    }

    /// Append `text` and a newline
    pub fn print_line(&mut self, text: &str) -> Result<(), InterpreterError> {
        if self.text.len() + text.len() + 1 > self.limit {
            // Keep what fits so the partial output still shows where it stopped.
            let room = self.limit.saturating_sub(self.text.len());
            let mut cut = room.min(text.len());
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            self.text.push_str(&text[..cut]);
            return Err(InterpreterError::OutputLimitExceeded { limit: self.limit });
        }
        self.text.push_str(text);
        self.text.push('\n');
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for CapturedOutput {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}
