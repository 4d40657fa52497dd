//! Bracket and quote matching
//!
//! Left-to-right scan with its own string/comment tracking. Brackets are
//! matched with a growable stack; a mismatched closer is reported and left
//! unpopped so the real closer can still match.

use super::{is_line_break, line_number_at, ErrorKind, ErrorSpan};

/// Stack element for an open bracket, dropped when the scan ends
#[derive(Debug, Clone, Copy)]
struct BracketFrame {
    open: char,
    position: usize,
    line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Code,
    LineComment,
    BlockComment,
    /// Inside a string opened by `quote` on `line`
    Str { quote: char, line: usize },
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

pub(super) fn check(chars: &[char], errors: &mut Vec<ErrorSpan>) {
    let mut stack: Vec<BracketFrame> = Vec::new();
    let mut region = Region::Code;
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match region {
            Region::LineComment => {
                if is_line_break(chars, i) {
                    region = Region::Code;
                }
            }
            Region::BlockComment => {
                if c == '*' && next == Some('/') {
                    region = Region::Code;
                    i += 2;
                    continue;
                }
            }
            Region::Str { quote, .. } => {
                if c == '\\' {
                    if is_line_break(chars, i + 1) {
                        line += 1;
                    }
                    i += 2;
                    continue;
                }
                if c == quote {
                    region = Region::Code;
                }
            }
            Region::Code => match c {
                '/' if next == Some('/') => region = Region::LineComment,
                '#' => region = Region::LineComment,
                '/' if next == Some('*') => {
                    region = Region::BlockComment;
                    i += 2;
                    continue;
                }
                '"' | '\'' | '`' => region = Region::Str { quote: c, line },
                '(' | '[' | '{' => stack.push(BracketFrame {
                    open: c,
                    position: i,
                    line,
                }),
                ')' | ']' | '}' => match stack.last() {
                    None => errors.push(ErrorSpan::new(
                        i,
                        1,
                        line,
                        ErrorKind::UnmatchedCloseBracket,
                        format!("Unmatched closing '{}'", c),
                    )),
                    Some(top) if closer_for(top.open) != c => errors.push(ErrorSpan::new(
                        i,
                        1,
                        line,
                        ErrorKind::MismatchedBracket,
                        format!("Expected '{}' but found '{}'", closer_for(top.open), c),
                    )),
                    Some(_) => {
                        stack.pop();
                    }
                },
                _ => {}
            },
        }

        if is_line_break(chars, i) {
            line += 1;
        }
        i += 1;
    }

    // LIFO: the innermost unclosed bracket is reported first
    while let Some(frame) = stack.pop() {
        errors.push(ErrorSpan::new(
            frame.position,
            1,
            frame.line,
            ErrorKind::UnmatchedOpenBracket,
            format!(
                "Unclosed '{}' (expected '{}')",
                frame.open,
                closer_for(frame.open)
            ),
        ));
    }

    if let Region::Str { quote, line: opened } = region {
        let last = chars.len() - 1;
        errors.push(ErrorSpan::new(
            last,
            1,
            line_number_at(chars, last),
            ErrorKind::UnmatchedQuote,
            format!(
                "Unterminated string literal ({} opened on line {})",
                quote, opened
            ),
        ));
    }
}
