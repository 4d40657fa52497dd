//! Heuristic error detection
//!
//! Three independent passes over the same text:
//! - Bracket/quote matching (self-contained string/comment tracking)
//! - Indentation consistency
//! - Missing statement terminators (only when the text uses `;` somewhere)
//!
//! The detector never fails on malformed input: unterminated constructs are
//! reported as spans, not errors. Results are concatenated in pass order.

mod brackets;
mod indentation;
mod terminators;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::syntax::{tokenize_chars, ExcludedRanges, Token};

/// Kind of heuristic problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnmatchedOpenBracket,
    UnmatchedCloseBracket,
    MismatchedBracket,
    UnmatchedQuote,
    MixedIndentation,
    InconsistentIndentWidth,
    PossibleMissingTerminator,
}

/// Visual class of an error, used to pick a highlight tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Structural problems (brackets, quotes)
    Error,
    /// Likely but uncertain problems (terminators)
    Warning,
    /// Whitespace style problems
    Indentation,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::UnmatchedOpenBracket
            | ErrorKind::UnmatchedCloseBracket
            | ErrorKind::MismatchedBracket
            | ErrorKind::UnmatchedQuote => Severity::Error,
            ErrorKind::PossibleMissingTerminator => Severity::Warning,
            ErrorKind::MixedIndentation | ErrorKind::InconsistentIndentWidth => {
                Severity::Indentation
            }
        }
    }
}

/// A detected problem. `start`/`length` are char offsets, `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSpan {
    pub start: usize,
    pub length: usize,
    pub line: usize,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorSpan {
    pub fn new(start: usize, length: usize, line: usize, kind: ErrorKind, message: String) -> Self {
        Self {
            start,
            length,
            line,
            kind,
            message,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Expected indentation style for the indentation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndentStyle {
    /// No expectation; the first indented line sets the file's style
    #[default]
    Auto,
    Tabs,
    /// Spaces, in multiples of the given width
    Spaces(usize),
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::Auto => write!(f, "auto"),
            IndentStyle::Tabs => write!(f, "tabs"),
            IndentStyle::Spaces(n) => write!(f, "spaces:{}", n),
        }
    }
}

impl FromStr for IndentStyle {
    type Err = String;

    /// Parses `auto`, `tabs`, `spaces` (width 4) or `spaces:N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "auto" => Ok(IndentStyle::Auto),
            "tabs" | "tab" => Ok(IndentStyle::Tabs),
            "spaces" => Ok(IndentStyle::Spaces(4)),
            _ => {
                let width = s
                    .strip_prefix("spaces:")
                    .ok_or_else(|| format!("Invalid indent style: {}", s))?;
                match width.trim().parse::<usize>() {
                    Ok(n) if n > 0 => Ok(IndentStyle::Spaces(n)),
                    _ => Err(format!("Invalid indent width: {}", width)),
                }
            }
        }
    }
}

impl TryFrom<String> for IndentStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndentStyle> for String {
    fn from(style: IndentStyle) -> Self {
        style.to_string()
    }
}

/// Detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorOptions {
    pub indent_style: IndentStyle,
    /// Run the missing-terminator pass
    pub check_terminators: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Auto,
            check_terminators: true,
        }
    }
}

/// Detect problems with default options
pub fn detect(text: &str) -> Vec<ErrorSpan> {
    detect_with(text, &DetectorOptions::default())
}

pub fn detect_with(text: &str, options: &DetectorOptions) -> Vec<ErrorSpan> {
    let chars: Vec<char> = text.chars().collect();
    let tokens = tokenize_chars(&chars);
    detect_chars(&chars, &tokens, options)
}

/// Detect problems in a decoded buffer, reusing the tokenizer's output for
/// string/comment exclusion.
pub fn detect_chars(chars: &[char], tokens: &[Token], options: &DetectorOptions) -> Vec<ErrorSpan> {
    let mut errors = Vec::new();
    if chars.is_empty() {
        return errors;
    }

    brackets::check(chars, &mut errors);

    let lines = physical_lines(chars);
    indentation::check(chars, &lines, options.indent_style, &mut errors);

    if options.check_terminators {
        let excluded = ExcludedRanges::from_tokens(tokens);
        terminators::check(chars, &lines, &excluded, &mut errors);
    }

    errors
}

/// Sort spans by position for display. Detection order is pass order.
pub fn sort_for_presentation(errors: &mut [ErrorSpan]) {
    errors.sort_by_key(|e| (e.start, e.kind));
}

/// A physical line: `start..end` excludes the delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PhysicalLine {
    pub start: usize,
    pub end: usize,
    /// 1-based; `\r\n` counts as one break, a lone `\r` as one
    pub number: usize,
}

/// True if the char at `i` ends a line: `\n`, or a `\r` not followed by `\n`
pub fn is_line_break(chars: &[char], i: usize) -> bool {
    match chars.get(i) {
        Some('\n') => true,
        Some('\r') => chars.get(i + 1) != Some(&'\n'),
        _ => false,
    }
}

/// Offset where the line containing `offset` starts
pub fn line_start(chars: &[char], offset: usize) -> usize {
    let offset = offset.min(chars.len());
    (0..offset)
        .rev()
        .find(|&i| is_line_break(chars, i))
        .map_or(0, |i| i + 1)
}

/// 1-based line number of the char at `offset`
pub fn line_number_at(chars: &[char], offset: usize) -> usize {
    let offset = offset.min(chars.len());
    1 + (0..offset).filter(|&i| is_line_break(chars, i)).count()
}

/// Split on `\r` and `\n` as independent delimiters, keeping empty lines
pub(crate) fn physical_lines(chars: &[char]) -> Vec<PhysicalLine> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut number = 1;

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' || c == '\r' {
            lines.push(PhysicalLine {
                start,
                end: i,
                number,
            });
            start = i + 1;
            if is_line_break(chars, i) {
                number += 1;
            }
        }
    }
    lines.push(PhysicalLine {
        start,
        end: chars.len(),
        number,
    });

    lines
}

/// True if every char in the slice is whitespace
pub(crate) fn is_blank(chars: &[char]) -> bool {
    chars.iter().all(|c| c.is_whitespace())
}
