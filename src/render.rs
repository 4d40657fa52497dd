//! Paint scan results onto a host document
//!
//! Every pass runs inside one formatting batch and leaves the selection where
//! it was. The batch is closed by a guard, so a failing host call still ends
//! it before the error propagates.

use std::ops::{Deref, DerefMut};

use anyhow::Result;

use crate::host::HostDocument;
use crate::palette::PaletteSet;
use crate::scan::{ScanOutcome, TextSnapshot};
use crate::syntax::TokenType;

/// Open formatting batch, ended on drop
struct BatchScope<'a, D: HostDocument + ?Sized> {
    doc: &'a mut D,
}

impl<'a, D: HostDocument + ?Sized> BatchScope<'a, D> {
    fn begin(doc: &'a mut D) -> Self {
        doc.begin_batch_formatting();
        Self { doc }
    }
}

impl<D: HostDocument + ?Sized> Deref for BatchScope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.doc
    }
}

impl<D: HostDocument + ?Sized> DerefMut for BatchScope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.doc
    }
}

impl<D: HostDocument + ?Sized> Drop for BatchScope<'_, D> {
    fn drop(&mut self) {
        self.doc.end_batch_formatting();
    }
}

/// Run `paint` in a batch, restoring the selection afterwards
fn with_preserved_selection<D, F>(doc: &mut D, paint: F) -> Result<()>
where
    D: HostDocument + ?Sized,
    F: FnOnce(&mut D) -> Result<()>,
{
    let (sel_start, sel_end) = doc.selection();
    let result = {
        let mut batch = BatchScope::begin(doc);
        paint(&mut *batch)
    };
    doc.set_selection(sel_start, sel_end);
    result
}

/// Replace all scanner formatting with the outcome's tokens and errors.
///
/// The host theme is queried once, before the batch opens.
pub fn apply<D: HostDocument + ?Sized>(
    doc: &mut D,
    outcome: &ScanOutcome,
    palettes: &PaletteSet,
) -> Result<()> {
    let is_dark = doc.is_dark_theme();
    let base = palettes.for_theme(is_dark).base_foreground;
    let len = outcome.snapshot.len_chars();
    with_preserved_selection(doc, |doc| {
        doc.remove_all_added_highlights()?;
        doc.set_foreground_color(0, len, base)?;

        for token in &outcome.tokens {
            if token.kind == TokenType::Default {
                continue;
            }
            let color = palettes.color_for_token(token.kind, is_dark);
            doc.set_foreground_color(token.start, token.end(), color)?;
        }

        for error in &outcome.errors {
            let tint = palettes.color_for_error(error.kind, is_dark);
            doc.add_highlight_range(error.start, error.length, tint)?;
        }

        tracing::debug!(
            tokens = outcome.tokens.len(),
            errors = outcome.errors.len(),
            is_dark,
            "applied scan results"
        );
        Ok(())
    })
}

/// Remove scanner highlights and reset the text to the base foreground
pub fn clear<D: HostDocument + ?Sized>(doc: &mut D, palettes: &PaletteSet) -> Result<()> {
    let base = palettes.for_theme(doc.is_dark_theme()).base_foreground;
    let len = TextSnapshot::capture(doc).len_chars();
    with_preserved_selection(doc, |doc| {
        doc.remove_all_added_highlights()?;
        doc.set_foreground_color(0, len, base)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DetectorOptions;
    use crate::host::MemoryDocument;

    fn palettes() -> PaletteSet {
        PaletteSet::builtin()
    }

    fn scanned(text: &str) -> (MemoryDocument, ScanOutcome) {
        let doc = MemoryDocument::new(text);
        let outcome = ScanOutcome::scan(text, DetectorOptions::default());
        (doc, outcome)
    }

    #[test]
    fn test_apply_paints_tokens_and_errors() {
        let (mut doc, outcome) = scanned("if (x");
        let palettes = palettes();
        let palette = &palettes.dark;
        apply(&mut doc, &outcome, &palettes).unwrap();

        assert_eq!(doc.foreground_at(0), Some(palette.keyword));
        assert_eq!(doc.foreground_at(4), Some(palette.base_foreground));
        assert_eq!(doc.highlights().len(), 1);
        assert_eq!(doc.highlights()[0].start, 3);
        assert_eq!(doc.highlights()[0].background, palette.errors.syntax);
        assert_eq!(doc.completed_batches(), 1);
        assert_eq!(doc.unbatched_calls(), 0);
    }

    #[test]
    fn test_apply_replaces_previous_highlights() {
        let (mut doc, outcome) = scanned("(");
        apply(&mut doc, &outcome, &palettes()).unwrap();
        apply(&mut doc, &outcome, &palettes()).unwrap();
        assert_eq!(doc.highlights().len(), 1);
    }

    #[test]
    fn test_selection_is_preserved() {
        let (mut doc, outcome) = scanned("let x = 1;");
        doc.set_selection(2, 5);
        apply(&mut doc, &outcome, &palettes()).unwrap();
        assert_eq!(doc.selection(), (2, 5));
    }

    #[test]
    fn test_failure_still_ends_batch() {
        let (mut doc, outcome) = scanned("a)");
        doc.set_selection(1, 1);
        doc.fail_highlights(true);
        assert!(apply(&mut doc, &outcome, &palettes()).is_err());
        assert_eq!(doc.batch_depth(), 0);
        assert_eq!(doc.completed_batches(), 1);
        assert_eq!(doc.selection(), (1, 1));
    }

    #[test]
    fn test_clear_resets_to_base_foreground() {
        let (mut doc, outcome) = scanned("return (1");
        let palettes = palettes();
        apply(&mut doc, &outcome, &palettes).unwrap();
        doc.set_dark_theme(false);
        clear(&mut doc, &palettes).unwrap();
        assert!(doc.highlights().is_empty());
        for i in 0..doc.len_chars() {
            assert_eq!(doc.foreground_at(i), Some(palettes.light.base_foreground));
        }
    }

    #[test]
    fn test_apply_uses_palette_of_host_theme() {
        let (mut doc, outcome) = scanned("fn x) // c");
        doc.set_dark_theme(false);
        let palettes = palettes();
        apply(&mut doc, &outcome, &palettes).unwrap();

        let light = &palettes.light;
        assert_eq!(doc.foreground_at(0), Some(light.keyword));
        assert_eq!(doc.foreground_at(6), Some(light.comment));
        assert_eq!(doc.highlights()[0].background, light.errors.syntax);
    }

    #[test]
    fn test_clear_skips_trailing_paragraph_marker() {
        let mut doc = MemoryDocument::new("x\r");
        clear(&mut doc, &palettes()).unwrap();
        assert_eq!(doc.foreground_at(1), None);
    }
}
