//! Missing statement terminator heuristic
//!
//! Only runs when the text uses `;` outside strings and comments somewhere;
//! in languages without terminators every line would be a false positive.
//! A line is flagged when it looks like a statement (assignment, `return`,
//! `break`/`continue`, or a call ending in `)`), does not end with a
//! continuation character, and is not followed by a control continuation
//! (`{`, `else`, `catch`, `finally`).

use crate::syntax::{is_no_terminator_starter, ExcludedRanges};

use super::{is_blank, ErrorKind, ErrorSpan, PhysicalLine};

/// Last characters after which no terminator is expected
const CONTINUATION_ENDINGS: &[char] = &[';', '{', '}', ':', ',', '\\', '(', '['];

/// How many following non-blank lines may be inspected for a continuation
const LOOKAHEAD_LINES: usize = 2;

/// The code portion of a line: first and last significant char offsets
#[derive(Debug, Clone, Copy)]
struct CodeSpan {
    first: usize,
    last: usize,
}

pub(super) fn check(
    chars: &[char],
    lines: &[PhysicalLine],
    excluded: &ExcludedRanges,
    errors: &mut Vec<ErrorSpan>,
) {
    let uses_semicolons = chars
        .iter()
        .enumerate()
        .any(|(i, &c)| c == ';' && !excluded.contains(i));
    if !uses_semicolons {
        return;
    }

    for (idx, line) in lines.iter().enumerate() {
        let Some(span) = code_span(chars, line, excluded) else {
            continue;
        };
        let code = &chars[span.first..=span.last];

        if code[0] == '{' || code[0] == '}' {
            continue;
        }
        let word = leading_word(code);
        if is_no_terminator_starter(&word) {
            continue;
        }
        if CONTINUATION_ENDINGS.contains(&code[code.len() - 1]) {
            continue;
        }
        if !looks_like_statement(code, &word, span.first, excluded) {
            continue;
        }
        if continues_on_next_line(chars, &lines[idx + 1..], excluded) {
            continue;
        }

        errors.push(ErrorSpan::new(
            span.last,
            1,
            line.number,
            ErrorKind::PossibleMissingTerminator,
            "Possible missing ';' at end of statement".to_string(),
        ));
    }
}

/// Locate the significant code on a line, ignoring trailing comments.
///
/// Returns `None` for blank lines, comment lines, and lines that start or
/// continue a multi-line string or comment.
fn code_span(chars: &[char], line: &PhysicalLine, excluded: &ExcludedRanges) -> Option<CodeSpan> {
    let first = (line.start..line.end).find(|&i| !chars[i].is_whitespace())?;

    if let Some(range) = excluded.find(first) {
        if range.is_comment || range.start < line.start {
            return None;
        }
    }
    if starts_with_comment_marker(&chars[first..line.end]) {
        return None;
    }

    let last = (first..line.end)
        .rev()
        .find(|&i| !chars[i].is_whitespace() && !excluded.in_comment(i))?;

    // A string that runs past the line end means the statement continues
    if excluded.find(last).is_some_and(|r| r.end() > line.end) {
        return None;
    }

    Some(CodeSpan { first, last })
}

fn starts_with_comment_marker(text: &[char]) -> bool {
    matches!(text, ['/', '/', ..] | ['/', '*', ..] | ['#', ..])
}

fn leading_word(code: &[char]) -> String {
    code.iter()
        .take_while(|c| c.is_alphanumeric() || **c == '_')
        .collect()
}

fn looks_like_statement(code: &[char], word: &str, offset: usize, excluded: &ExcludedRanges) -> bool {
    if has_assignment(code, offset, excluded) {
        return true;
    }
    if word == "return" {
        return true;
    }
    if word.len() == code.len() && matches!(word, "break" | "continue") {
        return true;
    }
    code.last() == Some(&')') && !matches!(word, "if" | "while" | "for" | "switch")
}

/// A `=` that is not part of `==`, `!=`, `>=`, `<=` or `=>`, outside strings
fn has_assignment(code: &[char], offset: usize, excluded: &ExcludedRanges) -> bool {
    (0..code.len()).any(|i| {
        if code[i] != '=' || excluded.contains(offset + i) {
            return false;
        }
        let prev = i.checked_sub(1).map(|p| code[p]);
        let next = code.get(i + 1).copied();
        !matches!(prev, Some('=' | '!' | '<' | '>')) && !matches!(next, Some('=' | '>'))
    })
}

/// True if one of the next non-blank lines opens a block or continues a
/// control statement, so the flagged line is a header rather than a statement.
fn continues_on_next_line(chars: &[char], rest: &[PhysicalLine], excluded: &ExcludedRanges) -> bool {
    let mut inspected = 0;
    for line in rest {
        let text = &chars[line.start..line.end];
        if is_blank(text) {
            continue;
        }
        inspected += 1;
        if inspected > LOOKAHEAD_LINES {
            return false;
        }

        let Some(first) = text.iter().position(|c| !c.is_whitespace()) else {
            continue;
        };
        if excluded.in_comment(line.start + first) {
            continue;
        }

        let trimmed = &text[first..];
        if trimmed[0] == '{' {
            return true;
        }
        let word = leading_word(trimmed);
        return matches!(word.as_str(), "else" | "catch" | "finally");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::super::physical_lines;
    use super::*;
    use crate::syntax::tokenize_chars;

    fn run(text: &str) -> Vec<ErrorSpan> {
        let chars: Vec<char> = text.chars().collect();
        let excluded = ExcludedRanges::from_tokens(&tokenize_chars(&chars));
        let lines = physical_lines(&chars);
        let mut errors = Vec::new();
        check(&chars, &lines, &excluded, &mut errors);
        errors
    }

    fn flagged_lines(text: &str) -> Vec<usize> {
        run(text).into_iter().map(|e| e.line).collect()
    }

    #[test]
    fn test_flags_missing_semicolon() {
        let errors = run("let x = 1\nlet y = 2;\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].start, 8);
        assert_eq!(errors[0].kind, ErrorKind::PossibleMissingTerminator);
    }

    #[test]
    fn test_no_semicolons_anywhere_disables_pass() {
        assert!(run("x = 1\ny = 2\nprint(x)\n").is_empty());
    }

    #[test]
    fn test_semicolons_in_strings_and_comments_do_not_count() {
        assert!(run("x = \";\"\n# a; b\ny = 2\n").is_empty());
    }

    #[test]
    fn test_statement_shapes() {
        let text = "a;\nreturn x\nbreak\ncontinue\nfoo(1)\nif (x)\n  y\nz == 1\nw => 2\n";
        assert_eq!(flagged_lines(text), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_continuation_endings_are_skipped() {
        let text = "a;\nx = [\ny = foo(\nz = {\nw = a,\nv = b \\\n";
        assert!(run(text).is_empty());
    }

    #[test]
    fn test_no_terminator_starters_are_skipped() {
        let text = "a;\nfunction f(x)\ndef g(y)\nelse x = 1\n}\n{ y = 2\n";
        assert!(run(text).is_empty());
    }

    #[test]
    fn test_followed_by_block_or_else_is_suppressed() {
        assert!(run("a;\nfoo(x)\n\n{\n}\n").is_empty());
        assert!(run("a;\nx = 1\n  else\n").is_empty());
        assert!(run("a;\ny = cond()\n// note\ncatch (e)\n").is_empty());
    }

    #[test]
    fn test_first_code_line_decides() {
        let text = "a;\nfoo(x)\nb;\n{\n";
        assert_eq!(flagged_lines(text), vec![2]);
    }

    #[test]
    fn test_lookahead_is_bounded() {
        let text = "a;\nfoo(x)\n// one\n// two\n{\n";
        assert_eq!(flagged_lines(text), vec![2]);
    }

    #[test]
    fn test_trailing_comment_is_ignored() {
        let errors = run("a;\nx = 1 // set x\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].start, 7);
    }

    #[test]
    fn test_lines_inside_block_comment_or_multiline_string_are_skipped() {
        assert!(run("a;\n/*\nx = 1\n*/\ns = \"\"\"\ny = 2\n\"\"\";\n").is_empty());
    }

    #[test]
    fn test_pointer_store_is_a_statement() {
        assert_eq!(flagged_lines("a;\n*ptr = value\n"), vec![2]);
        assert!(run("a;\n/**\n * x = 1\n */\n*ptr = value;\n").is_empty());
    }

    #[test]
    fn test_assignment_inside_string_does_not_count() {
        assert!(run("a;\nlog(\"x=1\");\nname \"y = 2\"\n").is_empty());
    }
}
