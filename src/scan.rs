//! Immutable text snapshots and the pure scan step
//!
//! A [`ScanJob`] owns everything it needs (a shared snapshot and the detector
//! options), so it can run inline or on a worker thread without touching the
//! document.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::diagnostics::{detect_chars, DetectorOptions, ErrorKind, ErrorSpan};
use crate::host::HostDocument;
use crate::syntax::{tokenize_chars, Token};

/// Read-only copy of a document's logical content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSnapshot {
    text: Arc<str>,
    chars: Arc<[char]>,
}

impl TextSnapshot {
    /// Build a snapshot, dropping a single trailing `\r` paragraph marker
    pub fn new(text: &str) -> Self {
        let text = text.strip_suffix('\r').unwrap_or(text);
        Self {
            text: Arc::from(text),
            chars: text.chars().collect(),
        }
    }

    /// Snapshot the host's current content
    pub fn capture<D: HostDocument + ?Sized>(doc: &D) -> Self {
        Self::new(&doc.full_text())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cheap shared handle to the text
    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len_chars(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// One unit of scanning work, tagged with the generation that requested it
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub generation: u64,
    pub snapshot: TextSnapshot,
    pub options: DetectorOptions,
}

impl ScanJob {
    pub fn new(generation: u64, snapshot: TextSnapshot, options: DetectorOptions) -> Self {
        Self {
            generation,
            snapshot,
            options,
        }
    }

    /// Tokenize and detect. Never fails.
    pub fn run(self) -> ScanOutcome {
        let tokens = tokenize_chars(self.snapshot.chars());
        let errors = detect_chars(self.snapshot.chars(), &tokens, &self.options);
        tracing::trace!(
            generation = self.generation,
            tokens = tokens.len(),
            errors = errors.len(),
            "scan finished"
        );
        ScanOutcome {
            snapshot: self.snapshot,
            tokens,
            errors,
        }
    }
}

/// Tokens and errors for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub snapshot: TextSnapshot,
    pub tokens: Vec<Token>,
    pub errors: Vec<ErrorSpan>,
}

impl ScanOutcome {
    /// Scan text directly with the given options
    pub fn scan(text: &str, options: DetectorOptions) -> Self {
        ScanJob::new(0, TextSnapshot::new(text), options).run()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors per kind, in kind order
    pub fn counts_by_kind(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Errors reported on a 1-based line
    pub fn errors_on_line(&self, line: usize) -> impl Iterator<Item = &ErrorSpan> + '_ {
        self.errors.iter().filter(move |e| e.line == line)
    }
}
