//! Host document boundary
//!
//! [`HostDocument`] is the surface the scheduler paints through. Offsets are
//! char offsets, matching tokens and error spans. [`MemoryDocument`] is a
//! rope-backed implementation that records every formatting call, used by
//! the CLI and by tests.

use anyhow::{anyhow, bail, Result};
use ropey::Rope;

use crate::palette::Color;

/// Editor document operations needed to display scan results
pub trait HostDocument {
    /// Complete current content
    fn full_text(&self) -> String;

    /// Suspend repaint until the matching [`end_batch_formatting`](Self::end_batch_formatting)
    fn begin_batch_formatting(&mut self);
    fn end_batch_formatting(&mut self);

    /// Color the half-open char range `start..end`
    fn set_foreground_color(&mut self, start: usize, end: usize, color: Color) -> Result<()>;

    /// Add an overlay highlight owned by the scanner
    fn add_highlight_range(&mut self, start: usize, length: usize, background: Color)
        -> Result<()>;

    /// Remove every highlight previously added through this trait
    fn remove_all_added_highlights(&mut self) -> Result<()>;

    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);

    fn is_dark_theme(&self) -> bool;
}

/// Background highlight added by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub length: usize,
    pub background: Color,
}

impl Highlight {
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// In-memory document over a rope
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    buffer: Rope,
    /// Foreground color per char; `None` means host default
    foreground: Vec<Option<Color>>,
    highlights: Vec<Highlight>,
    selection: (usize, usize),
    dark: bool,
    batch_depth: usize,
    /// Number of completed outermost batches
    batches: usize,
    /// Number of foreground/highlight calls made outside any batch
    unbatched_calls: usize,
    fail_highlights: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryDocument {
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from_str(text);
        let len = buffer.len_chars();
        Self {
            buffer,
            foreground: vec![None; len],
            highlights: Vec::new(),
            selection: (0, 0),
            dark: true,
            batch_depth: 0,
            batches: 0,
            unbatched_calls: 0,
            fail_highlights: false,
        }
    }

    pub fn with_dark_theme(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    pub fn set_dark_theme(&mut self, dark: bool) {
        self.dark = dark;
    }

    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Replace the whole content. Formatting is reset and the selection
    /// clamped, like a reload from disk.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        self.foreground = vec![None; self.buffer.len_chars()];
        self.highlights.clear();
        self.clamp_selection();
    }

    /// Insert at a char offset; inserted text takes the default color
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.len_chars() {
            bail!(
                "insert offset {} past end of document ({})",
                char_idx,
                self.len_chars()
            );
        }
        let inserted = text.chars().count();
        self.buffer.insert(char_idx, text);
        self.foreground
            .splice(char_idx..char_idx, std::iter::repeat(None).take(inserted));
        for h in &mut self.highlights {
            if h.start >= char_idx {
                h.start += inserted;
            }
        }
        self.clamp_selection();
        Ok(())
    }

    /// Remove the char range `start..end`
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        let removed = end - start;
        self.buffer.remove(start..end);
        self.foreground.drain(start..end);
        self.highlights.retain(|h| h.end() <= start || h.start >= end);
        for h in &mut self.highlights {
            if h.start >= end {
                h.start -= removed;
            }
        }
        self.clamp_selection();
        Ok(())
    }

    /// Foreground color applied at a char offset
    pub fn foreground_at(&self, offset: usize) -> Option<Color> {
        self.foreground.get(offset).copied().flatten()
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// The first highlight covering a char offset
    pub fn highlight_at(&self, offset: usize) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.contains(offset))
    }

    pub fn batch_depth(&self) -> usize {
        self.batch_depth
    }

    pub fn completed_batches(&self) -> usize {
        self.batches
    }

    pub fn unbatched_calls(&self) -> usize {
        self.unbatched_calls
    }

    /// Make every following `add_highlight_range` fail until switched off
    pub fn fail_highlights(&mut self, fail: bool) {
        self.fail_highlights = fail;
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.len_chars() {
            return Err(anyhow!(
                "range {}..{} outside document of {} chars",
                start,
                end,
                self.len_chars()
            ));
        }
        Ok(())
    }

    fn clamp_selection(&mut self) {
        let len = self.len_chars();
        self.selection = (self.selection.0.min(len), self.selection.1.min(len));
    }

    fn note_call(&mut self) {
        if self.batch_depth == 0 {
            self.unbatched_calls += 1;
        }
    }
}

impl HostDocument for MemoryDocument {
    fn full_text(&self) -> String {
        self.buffer.to_string()
    }

    fn begin_batch_formatting(&mut self) {
        self.batch_depth += 1;
    }

    fn end_batch_formatting(&mut self) {
        match self.batch_depth {
            0 => tracing::warn!("end_batch_formatting without matching begin"),
            1 => {
                self.batch_depth = 0;
                self.batches += 1;
            }
            _ => self.batch_depth -= 1,
        }
    }

    fn set_foreground_color(&mut self, start: usize, end: usize, color: Color) -> Result<()> {
        self.check_range(start, end)?;
        self.note_call();
        self.foreground[start..end].fill(Some(color));
        Ok(())
    }

    fn add_highlight_range(
        &mut self,
        start: usize,
        length: usize,
        background: Color,
    ) -> Result<()> {
        if self.fail_highlights {
            bail!("document rejected highlight at {}", start);
        }
        self.check_range(start, start + length)?;
        self.note_call();
        self.highlights.push(Highlight {
            start,
            length,
            background,
        });
        Ok(())
    }

    fn remove_all_added_highlights(&mut self) -> Result<()> {
        self.note_call();
        self.highlights.clear();
        Ok(())
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        self.selection = (start.min(len), end.min(len));
    }

    fn is_dark_theme(&self) -> bool {
        self.dark
    }
}
