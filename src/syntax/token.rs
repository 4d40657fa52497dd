//! Token data structures
//!
//! Defines classified spans produced by the tokenizer and the excluded
//! (string/comment) ranges derived from them.

use serde::Serialize;

/// Classification of a token span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Default,
    Keyword,
    String,
    Comment,
    Number,
    Function,
    Type,
    Operator,
    Error,
}

impl TokenType {
    /// Whether spans of this type are opaque to bracket/terminator analysis
    pub fn is_excluded(self) -> bool {
        matches!(self, TokenType::String | TokenType::Comment)
    }

    /// Short lowercase name, used by the CLI token dump
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Default => "default",
            TokenType::Keyword => "keyword",
            TokenType::String => "string",
            TokenType::Comment => "comment",
            TokenType::Number => "number",
            TokenType::Function => "function",
            TokenType::Type => "type",
            TokenType::Operator => "operator",
            TokenType::Error => "error",
        }
    }
}

/// A classified, non-empty span of the text
///
/// `start` and `length` are in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub start: usize,
    pub length: usize,
    #[serde(rename = "type")]
    pub kind: TokenType,
}

impl Token {
    pub fn new(start: usize, length: usize, kind: TokenType) -> Self {
        Self {
            start,
            length,
            kind,
        }
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// A span inside a string or comment literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedRange {
    pub start: usize,
    pub length: usize,
    /// True for comments, false for strings
    pub is_comment: bool,
}

impl ExcludedRange {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// Sorted excluded ranges with offset lookup
#[derive(Debug, Clone, Default)]
pub struct ExcludedRanges {
    ranges: Vec<ExcludedRange>,
}

impl ExcludedRanges {
    /// Collect String/Comment spans from a token stream (tokens are already sorted)
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let ranges = tokens
            .iter()
            .filter(|t| t.kind.is_excluded())
            .map(|t| ExcludedRange {
                start: t.start,
                length: t.length,
                is_comment: t.kind == TokenType::Comment,
            })
            .collect();
        Self { ranges }
    }

    pub fn as_slice(&self) -> &[ExcludedRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The range covering `offset`, if any
    pub fn find(&self, offset: usize) -> Option<&ExcludedRange> {
        let idx = self.ranges.partition_point(|r| r.end() <= offset);
        self.ranges.get(idx).filter(|r| r.contains(offset))
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.find(offset).is_some()
    }

    /// True if `offset` is inside a comment
    pub fn in_comment(&self, offset: usize) -> bool {
        self.find(offset).is_some_and(|r| r.is_comment)
    }
}

/// Excluded ranges as plain spans, derived from String/Comment tokens
pub fn excluded_ranges(tokens: &[Token]) -> Vec<ExcludedRange> {
    ExcludedRanges::from_tokens(tokens).ranges
}
