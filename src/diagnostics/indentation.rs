//! Indentation consistency
//!
//! Flags lines whose leading whitespace mixes tabs and spaces, and lines
//! that disagree with the expected (or, in auto mode, the established)
//! indentation style. Blank lines are skipped entirely.

use super::{is_blank, ErrorKind, ErrorSpan, IndentStyle, PhysicalLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentChar {
    Tab,
    Space,
}

impl IndentChar {
    fn plural(self) -> &'static str {
        match self {
            IndentChar::Tab => "tabs",
            IndentChar::Space => "spaces",
        }
    }
}

/// File-wide indentation usage, updated per non-blank line
#[derive(Debug, Default)]
struct IndentFlags {
    uses_tabs: bool,
    uses_spaces: bool,
    /// Style of the first indented line; auto mode measures against it
    established: Option<IndentChar>,
}

pub(super) fn check(
    chars: &[char],
    lines: &[PhysicalLine],
    style: IndentStyle,
    errors: &mut Vec<ErrorSpan>,
) {
    let mut flags = IndentFlags::default();

    for line in lines {
        let text = &chars[line.start..line.end];
        if is_blank(text) {
            continue;
        }

        let width = text.iter().take_while(|&&c| c == ' ' || c == '\t').count();
        if width == 0 {
            continue;
        }
        let indent = &text[..width];
        let spaces = indent.iter().filter(|&&c| c == ' ').count();
        let tabs = width - spaces;

        flags.uses_tabs |= tabs > 0;
        flags.uses_spaces |= spaces > 0;

        let mut report = |kind: ErrorKind, message: String| {
            errors.push(ErrorSpan::new(line.start, width, line.number, kind, message));
        };

        if spaces > 0 && tabs > 0 {
            report(
                ErrorKind::MixedIndentation,
                "Line mixes tabs and spaces in indentation".to_string(),
            );
            continue;
        }

        let this = if tabs > 0 {
            IndentChar::Tab
        } else {
            IndentChar::Space
        };

        let established = flags.established;
        match style {
            IndentStyle::Auto => match established {
                None => flags.established = Some(this),
                Some(first) if first != this => report(
                    ErrorKind::MixedIndentation,
                    format!(
                        "Indented with {}, but the file is indented with {}",
                        this.plural(),
                        first.plural()
                    ),
                ),
                Some(_) => {}
            },
            IndentStyle::Tabs => {
                if this == IndentChar::Space {
                    report(
                        ErrorKind::InconsistentIndentWidth,
                        "Expected tab indentation, found spaces".to_string(),
                    );
                }
            }
            IndentStyle::Spaces(unit) => {
                if this == IndentChar::Tab {
                    report(
                        ErrorKind::InconsistentIndentWidth,
                        format!("Expected {}-space indentation, found tabs", unit),
                    );
                } else if unit > 0 && spaces % unit != 0 {
                    report(
                        ErrorKind::InconsistentIndentWidth,
                        format!(
                            "Indentation width {} is not a multiple of {}",
                            spaces, unit
                        ),
                    );
                }
            }
        }
    }

    tracing::trace!(
        uses_tabs = flags.uses_tabs,
        uses_spaces = flags.uses_spaces,
        "indentation pass finished"
    );
}
