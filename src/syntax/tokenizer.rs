//! Single-pass, language-agnostic tokenizer
//!
//! Classifies arbitrary text without knowing its language. Rules are tried in
//! a fixed priority order at each cursor position and the first match wins.
//! Every branch advances the cursor by at least one char, so the scan always
//! terminates and runs in O(n).

use super::tables::{
    is_builtin_function, is_keyword, is_number_suffix, is_operator_char, is_two_char_operator,
};
use super::token::{Token, TokenType};

/// Tokenize `text`. Offsets in the returned tokens are char offsets.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    tokenize_chars(&chars)
}

/// Tokenize an already-decoded char buffer
pub fn tokenize_chars(chars: &[char]) -> Vec<Token> {
    let mut tokenizer = Tokenizer {
        chars,
        pos: 0,
        tokens: Vec::new(),
    };
    tokenizer.run();
    tokenizer.tokens
}

struct Tokenizer<'a> {
    chars: &'a [char],
    pos: usize,
    tokens: Vec<Token>,
}

impl Tokenizer<'_> {
    fn run(&mut self) {
        while self.pos < self.chars.len() {
            let before = self.pos;
            self.step();
            debug_assert!(self.pos > before, "tokenizer failed to advance");
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    /// Emit a token for `start..end` (clipped to the text) and move the cursor to `end`
    fn emit(&mut self, start: usize, end: usize, kind: TokenType) {
        let end = end.min(self.chars.len());
        if end > start {
            self.tokens.push(Token::new(start, end - start, kind));
        }
        self.pos = end.max(start + 1);
    }

    fn step(&mut self) {
        let c = self.chars[self.pos];

        if c.is_whitespace() {
            self.pos += 1;
        } else if (c == '/' && self.peek(1) == Some('/')) || c == '#' {
            self.line_comment();
        } else if c == '/' && self.peek(1) == Some('*') {
            self.block_comment();
        } else if (c == '"' || c == '\'') && self.peek(1) == Some(c) && self.peek(2) == Some(c) {
            self.triple_quoted(c);
        } else if matches!(c, '"' | '\'' | '`') {
            self.quoted(c);
        } else if c.is_ascii_digit() || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
        {
            self.number();
        } else if c.is_alphabetic() || matches!(c, '_' | '@' | '$') {
            self.identifier();
        } else if is_operator_char(c) {
            let len = match self.peek(1) {
                Some(next) if is_two_char_operator(c, next) => 2,
                _ => 1,
            };
            self.emit(self.pos, self.pos + len, TokenType::Operator);
        } else {
            // Unclassified character: skipped, not an error
            self.pos += 1;
        }
    }

    /// `//` or `#` through end of line, excluding the line terminator
    fn line_comment(&mut self) {
        let start = self.pos;
        let end = self.chars[start..]
            .iter()
            .position(|&c| c == '\n' || c == '\r')
            .map_or(self.chars.len(), |i| start + i);
        self.emit(start, end, TokenType::Comment);
    }

    /// `/* ... */`, running to end of text when unterminated
    fn block_comment(&mut self) {
        let start = self.pos;
        let mut i = start + 2;
        let end = loop {
            match (self.chars.get(i), self.chars.get(i + 1)) {
                (Some('*'), Some('/')) => break i + 2,
                (Some(_), _) => i += 1,
                (None, _) => break self.chars.len(),
            }
        };
        self.emit(start, end, TokenType::Comment);
    }

    /// `"""..."""` or `'''...'''`, may span lines
    fn triple_quoted(&mut self, quote: char) {
        let start = self.pos;
        let mut i = start + 3;
        let end = loop {
            match self.chars.get(i) {
                None => break self.chars.len(),
                Some('\\') => i += 2,
                Some(&c)
                    if c == quote
                        && self.chars.get(i + 1) == Some(&quote)
                        && self.chars.get(i + 2) == Some(&quote) =>
                {
                    break i + 3
                }
                Some(_) => i += 1,
            }
        };
        self.emit(start, end, TokenType::String);
    }

    /// Single-line quoted string. Backslash escapes the next char; an
    /// unescaped newline ends the string without being consumed, except in
    /// backtick strings which may span lines.
    fn quoted(&mut self, quote: char) {
        let start = self.pos;
        let mut i = start + 1;
        let end = loop {
            match self.chars.get(i) {
                None => break self.chars.len(),
                Some('\\') => i += 2,
                Some(&c) if c == quote => break i + 1,
                Some('\n') | Some('\r') if quote != '`' => break i,
                Some(_) => i += 1,
            }
        };
        self.emit(start, end, TokenType::String);
    }

    fn number(&mut self) {
        let start = self.pos;
        let chars = self.chars;

        if chars[start] == '0' && matches!(self.peek(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O')) {
            let mut i = start + 2;
            while chars.get(i).is_some_and(|&c| c.is_alphanumeric() || c == '_') {
                i += 1;
            }
            self.emit(start, i, TokenType::Number);
            return;
        }

        let is_digit = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
        let mut i = start;
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(&c) = chars.get(i) {
            if c.is_ascii_digit() || c == '_' {
                i += 1;
            } else if c == '.' && !seen_dot && !seen_exp && is_digit(i + 1) {
                seen_dot = true;
                i += 1;
            } else if (c == 'e' || c == 'E') && !seen_exp && i > start {
                let mut j = i + 1;
                if matches!(chars.get(j), Some('+' | '-')) {
                    j += 1;
                }
                if !is_digit(j) {
                    break;
                }
                seen_exp = true;
                i = j;
            } else {
                break;
            }
        }

        let suffix_stands_alone = !chars
            .get(i + 1)
            .is_some_and(|&c| c.is_alphanumeric() || c == '_');
        if chars.get(i).is_some_and(|&c| is_number_suffix(c)) && suffix_stands_alone {
            i += 1;
        }

        self.emit(start, i, TokenType::Number);
    }

    fn identifier(&mut self) {
        let start = self.pos;
        let mut end = start + 1;
        while self
            .chars
            .get(end)
            .is_some_and(|&c| c.is_alphanumeric() || c == '_')
        {
            end += 1;
        }

        let word: String = self.chars[start..end].iter().collect();
        let kind = self.classify_word(&word, end);
        self.emit(start, end, kind);
    }

    fn classify_word(&self, word: &str, end: usize) -> TokenType {
        if is_keyword(word) {
            return TokenType::Keyword;
        }

        let next_non_ws = self.chars[end..].iter().find(|c| !c.is_whitespace());
        if is_builtin_function(word) || next_non_ws == Some(&'(') {
            return TokenType::Function;
        }

        let mut chars = word.chars();
        let starts_upper = chars.next().is_some_and(char::is_uppercase);
        if starts_upper && chars.next().is_some() {
            return TokenType::Type;
        }

        TokenType::Default
    }
}
