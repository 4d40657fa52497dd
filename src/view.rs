//! Terminal output for scan results
//!
//! Plain-text and JSON diagnostic listings, token dumps, and a 24-bit ANSI
//! rendering of a painted [`MemoryDocument`].

use std::fmt::Write;

use serde::Serialize;

use crate::diagnostics::{line_start, ErrorSpan, Severity};
use crate::host::MemoryDocument;
use crate::palette::{Color, ThemeKind};
use crate::syntax::Token;

const RESET: &str = "\x1b[0m";

/// Terminal background assumed when flattening translucent tints
pub fn backdrop(theme: ThemeKind) -> Color {
    match theme {
        ThemeKind::Dark => Color::rgb(0x1E, 0x1E, 0x1E),
        ThemeKind::Light => Color::rgb(0xFF, 0xFF, 0xFF),
    }
}

/// Composite a translucent color over an opaque backdrop
pub fn blend(tint: Color, backdrop: Color) -> Color {
    let a = tint.a as u32;
    let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a)) / 255) as u8;
    Color::rgb(
        mix(tint.r, backdrop.r),
        mix(tint.g, backdrop.g),
        mix(tint.b, backdrop.b),
    )
}

/// 1-based column of a char offset, counted from the last line break
pub fn column_of(chars: &[char], offset: usize) -> usize {
    let offset = offset.min(chars.len());
    offset - line_start(chars, offset) + 1
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Indentation => "indentation",
    }
}

/// `path:line:col: severity: message`
pub fn format_diagnostic(path: &str, chars: &[char], error: &ErrorSpan) -> String {
    format!(
        "{}:{}:{}: {}: {}",
        path,
        error.line,
        column_of(chars, error.start),
        severity_label(error.kind.severity()),
        error.message
    )
}

/// One line per token: position, kind and the covered text
pub fn format_token(chars: &[char], token: &Token) -> String {
    let end = token.end().min(chars.len());
    let text: String = chars[token.start.min(end)..end].iter().collect();
    format!(
        "{}\t{}\t{:?}",
        token.start,
        token.kind.name(),
        text
    )
}

/// JSON shape of one checked file
#[derive(Debug, Serialize)]
pub struct FileReport<'a> {
    pub path: &'a str,
    pub errors: &'a [ErrorSpan],
}

/// Render the document with its painted foreground colors and highlights
pub fn render_ansi(doc: &MemoryDocument, theme: ThemeKind) -> String {
    let backdrop = backdrop(theme);
    let mut out = String::with_capacity(doc.len_chars() * 2);
    let mut current: (Option<Color>, Option<Color>) = (None, None);

    for (i, ch) in doc.buffer().chars().enumerate() {
        if ch == '\n' || ch == '\r' {
            if current != (None, None) {
                out.push_str(RESET);
                current = (None, None);
            }
            out.push(ch);
            continue;
        }

        let style = (
            doc.foreground_at(i),
            doc.highlight_at(i).map(|h| blend(h.background, backdrop)),
        );
        if style != current {
            out.push_str(RESET);
            if let Some(fg) = style.0 {
                let _ = write!(out, "\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b);
            }
            if let Some(bg) = style.1 {
                let _ = write!(out, "\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b);
            }
            current = style;
        }
        out.push(ch);
    }

    if current != (None, None) {
        out.push_str(RESET);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::host::HostDocument;
    use crate::syntax::TokenType;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_column_counts_from_last_newline() {
        let text = chars("ab\ncde");
        assert_eq!(column_of(&text, 0), 1);
        assert_eq!(column_of(&text, 4), 2);
        assert_eq!(column_of(&text, 99), 4);
    }

    #[test]
    fn test_column_restarts_after_lone_cr() {
        let text = chars("ab\rcd\r\nef");
        assert_eq!(column_of(&text, 4), 2);
        assert_eq!(column_of(&text, 6), 4);
        assert_eq!(column_of(&text, 7), 1);
    }

    #[test]
    fn test_format_diagnostic_on_cr_only_text() {
        let text = chars("a;\r  b = 1");
        let errors = crate::diagnostics::detect(&text.iter().collect::<String>());
        let terminator = errors
            .iter()
            .find(|e| e.kind == ErrorKind::PossibleMissingTerminator)
            .unwrap();
        assert_eq!(
            format_diagnostic("a.c", &text, terminator),
            "a.c:2:7: warning: Possible missing ';' at end of statement"
        );
    }

    #[test]
    fn test_format_diagnostic() {
        let text = chars("x\n  )");
        let error = ErrorSpan::new(
            4,
            1,
            2,
            ErrorKind::UnmatchedCloseBracket,
            "Unmatched closing ')'".to_string(),
        );
        assert_eq!(
            format_diagnostic("a.js", &text, &error),
            "a.js:2:3: error: Unmatched closing ')'"
        );
    }

    #[test]
    fn test_format_token() {
        let text = chars("if x");
        let token = Token::new(0, 2, TokenType::Keyword);
        assert_eq!(format_token(&text, &token), "0\tkeyword\t\"if\"");
    }

    #[test]
    fn test_blend_extremes() {
        let back = Color::rgb(0, 0, 0);
        assert_eq!(blend(Color::rgba(200, 100, 50, 255), back), Color::rgb(200, 100, 50));
        assert_eq!(blend(Color::rgba(200, 100, 50, 0), back), back);
    }

    #[test]
    fn test_render_ansi_emits_colors_and_resets() {
        let mut doc = MemoryDocument::new("ab\nc");
        doc.set_foreground_color(0, 1, Color::rgb(1, 2, 3)).unwrap();
        doc.add_highlight_range(3, 1, Color::rgba(255, 0, 0, 255)).unwrap();
        let out = render_ansi(&doc, ThemeKind::Dark);
        assert!(out.starts_with("\x1b[0m\x1b[38;2;1;2;3ma\x1b[0mb\n"));
        assert!(out.contains("\x1b[48;2;255;0;0mc"));
        assert!(out.ends_with(RESET));
    }

    #[test]
    fn test_render_ansi_plain_document_is_unchanged() {
        let doc = MemoryDocument::new("plain\ntext");
        assert_eq!(render_ansi(&doc, ThemeKind::Light), "plain\ntext");
    }
}
