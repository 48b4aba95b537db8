//! Tokenizer for stackvm program text.

/// A single token from a program line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token<'a> {
    /// A word that is not a numeric literal (mnemonic or variable name).
    Word(&'a str),
    /// A numeric literal together with its original spelling.
    Number { value: f64, text: &'a str },
}

impl<'a> Token<'a> {
    /// The token exactly as written.
    pub(crate) fn text(&self) -> &'a str {
        match self {
            Token::Word(text) | Token::Number { text, .. } => text,
        }
    }
}

/// Split program text into lines.
///
/// A trailing empty line left by a final line terminator is discarded, and
/// a `\r` before each `\n` is dropped.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Tokenize a single line of program text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line.
pub(crate) fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    line.split_whitespace()
        .map(|word| match word.parse::<f64>() {
            Ok(value) => Token::Number { value, text: word },
            Err(_) => Token::Word(word),
        })
        .collect()
}
