//! Debounced scan scheduling
//!
//! `ScanScheduler::update` is the single state transition function: it takes
//! a message, may paint the document, and returns the side effects the
//! runtime should perform. Debounce timers and scans are identified by
//! generation; anything that arrives with an old generation is ignored.
//!
//! At most one scan is in flight. Edits and refreshes that arrive while
//! scanning are dropped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use crate::commands::ScanCmd;
use crate::config::{ScanConfig, DEFAULT_DEBOUNCE_MS};
use crate::diagnostics::DetectorOptions;
use crate::host::HostDocument;
use crate::messages::ScanMsg;
use crate::palette::PaletteSet;
use crate::render;
use crate::scan::{ScanJob, ScanOutcome, TextSnapshot};

/// Whether a scan is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning {
        generation: u64,
    },
}

/// Per-document state, alive only while scanning is enabled
#[derive(Debug, Default)]
struct ScanState {
    phase: ScanPhase,
    /// Generation of the armed debounce timer
    pending: Option<u64>,
    last_scanned_text: Option<Arc<str>>,
    /// Last successfully applied outcome, re-rendered on theme change
    cached: Option<ScanOutcome>,
}

/// Counters for tests and status output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub scans_started: u64,
    pub renders: u64,
    pub render_failures: u64,
    pub skipped_unchanged: u64,
    pub stale_results: u64,
}

#[derive(Debug)]
pub struct ScanScheduler {
    /// `None` while disabled
    state: Option<ScanState>,
    generation: u64,
    options: DetectorOptions,
    debounce: Duration,
    /// Whether `DocumentOpened` switches scanning on
    enable_on_open: bool,
    palettes: PaletteSet,
    stats: ScanStats,
}

impl Default for ScanScheduler {
    fn default() -> Self {
        Self::new(DetectorOptions::default(), PaletteSet::builtin())
    }
}

impl ScanScheduler {
    pub fn new(options: DetectorOptions, palettes: PaletteSet) -> Self {
        Self {
            state: None,
            generation: 0,
            options,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            enable_on_open: true,
            palettes,
            stats: ScanStats::default(),
        }
    }

    pub fn from_config(config: &ScanConfig, palettes: PaletteSet) -> Self {
        let mut scheduler = Self::new(config.detector_options(), palettes);
        scheduler.debounce = config.debounce();
        scheduler.enable_on_open = config.enabled;
        scheduler
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    pub fn phase(&self) -> ScanPhase {
        self.state.as_ref().map(|s| s.phase).unwrap_or_default()
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.pending.is_some())
    }

    /// Nothing armed and nothing in flight
    pub fn is_settled(&self) -> bool {
        self.phase() == ScanPhase::Idle && !self.has_pending_debounce()
    }

    /// Outcome currently painted on the document
    pub fn last_outcome(&self) -> Option<&ScanOutcome> {
        self.state.as_ref().and_then(|s| s.cached.as_ref())
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Handle one message
    pub fn update<D: HostDocument + ?Sized>(&mut self, doc: &mut D, msg: ScanMsg) -> Option<ScanCmd> {
        tracing::trace!(msg = msg.name(), generation = self.generation, "scan update");

        match msg {
            ScanMsg::DocumentOpened => {
                if !self.enable_on_open {
                    tracing::debug!("Scanning disabled by config, leaving document unpainted");
                    return None;
                }
                self.update(doc, ScanMsg::Enable)
            }

            ScanMsg::Enable => {
                if self.state.is_some() {
                    tracing::debug!("Scanning already enabled");
                    return None;
                }
                tracing::debug!("Scanning enabled");
                self.state = Some(ScanState::default());
                self.start_scan(doc, true)
            }

            ScanMsg::Disable => {
                let state = self.state.take()?;
                // Invalidates the armed timer and any scan in flight
                self.generation += 1;
                tracing::debug!(generation = self.generation, "Scanning disabled");

                if let Err(e) = render::clear(doc, &self.palettes) {
                    self.stats.render_failures += 1;
                    tracing::warn!("Failed to clear scan formatting: {:#}", e);
                }
                state.pending.map(|_| ScanCmd::CancelDebounce)
            }

            ScanMsg::DocumentClosed => {
                let state = self.state.take()?;
                self.generation += 1;
                tracing::debug!("Document closed, dropping scan state");
                state.pending.map(|_| ScanCmd::CancelDebounce)
            }

            ScanMsg::TextEdited => {
                let state = self.state.as_mut()?;
                if let ScanPhase::Scanning { generation } = state.phase {
                    tracing::debug!("Edit ignored while scan {} is in flight", generation);
                    return None;
                }
                self.generation += 1;
                state.pending = Some(self.generation);
                Some(ScanCmd::ArmDebounce {
                    generation: self.generation,
                    delay: self.debounce,
                })
            }

            ScanMsg::Refresh => {
                if self.state.is_none() {
                    return None;
                }
                self.start_scan(doc, true)
            }

            ScanMsg::DebounceElapsed { generation } => {
                let state = self.state.as_mut()?;
                if state.pending != Some(generation) {
                    tracing::debug!(
                        "Skipping stale debounce: generation {} != pending {:?}",
                        generation,
                        state.pending
                    );
                    return None;
                }
                state.pending = None;
                self.start_scan(doc, false)
            }

            ScanMsg::ScanCompleted {
                generation,
                outcome,
            } => self.complete_scan(doc, generation, *outcome),

            ScanMsg::ThemeChanged => {
                let state = self.state.as_mut()?;
                if let ScanPhase::Scanning { generation } = state.phase {
                    tracing::debug!("Theme changed during scan {}, painting on completion", generation);
                    return None;
                }
                let current = TextSnapshot::capture(doc);
                let Some(outcome) = state
                    .cached
                    .as_ref()
                    .filter(|o| o.snapshot.text() == current.text())
                else {
                    return self.start_scan(doc, true);
                };

                match render::apply(doc, outcome, &self.palettes) {
                    Ok(()) => self.stats.renders += 1,
                    Err(e) => {
                        self.stats.render_failures += 1;
                        tracing::warn!("Failed to repaint after theme change: {:#}", e);
                    }
                }
                None
            }
        }
    }

    /// Handle a message, running any scan it starts on the calling thread.
    ///
    /// Returns the remaining timer commands (`ArmDebounce`/`CancelDebounce`)
    /// for the caller to schedule.
    pub fn update_inline<D: HostDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        msg: ScanMsg,
    ) -> Vec<ScanCmd> {
        let mut timers = Vec::new();
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let Some(cmd) = self.update(doc, msg) else {
                continue;
            };
            for cmd in cmd.into_vec() {
                match cmd {
                    ScanCmd::RunScan(job) => {
                        let generation = job.generation;
                        queue.push(ScanMsg::completed(generation, job.run()));
                    }
                    timer => timers.push(timer),
                }
            }
        }
        timers
    }

    /// Snapshot the document and hand a job to the runtime.
    ///
    /// Unless `force` is set, an unchanged text is not scanned again.
    fn start_scan<D: HostDocument + ?Sized>(&mut self, doc: &D, force: bool) -> Option<ScanCmd> {
        let state = self.state.as_mut()?;
        if let ScanPhase::Scanning { generation } = state.phase {
            tracing::debug!("Scan {} already in flight", generation);
            return None;
        }

        let snapshot = TextSnapshot::capture(doc);
        if !force && state.last_scanned_text.as_deref() == Some(snapshot.text()) {
            self.stats.skipped_unchanged += 1;
            tracing::debug!("Text unchanged since last scan, skipping");
            return None;
        }

        self.generation += 1;
        let generation = self.generation;
        let had_pending = state.pending.take().is_some();
        state.phase = ScanPhase::Scanning { generation };
        self.stats.scans_started += 1;
        tracing::debug!(
            generation,
            chars = snapshot.len_chars(),
            force,
            "Starting scan"
        );

        let run = ScanCmd::RunScan(ScanJob::new(generation, snapshot, self.options));
        if had_pending {
            ScanCmd::batch(vec![ScanCmd::CancelDebounce, run])
        } else {
            Some(run)
        }
    }

    fn complete_scan<D: HostDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        generation: u64,
        outcome: ScanOutcome,
    ) -> Option<ScanCmd> {
        let Some(state) = self.state.as_mut() else {
            self.stats.stale_results += 1;
            tracing::debug!("Discarding scan {} results, scanning is disabled", generation);
            return None;
        };
        if state.phase != (ScanPhase::Scanning { generation }) {
            self.stats.stale_results += 1;
            tracing::debug!(
                "Discarding stale scan results: generation {} != {:?}",
                generation,
                state.phase
            );
            return None;
        }

        // Cleared before touching the document so a host failure can't wedge us
        state.phase = ScanPhase::Idle;

        if TextSnapshot::capture(doc).text() != outcome.snapshot.text() {
            // Edits made during the scan were dropped; pick them up after a quiet period
            self.stats.stale_results += 1;
            self.generation += 1;
            state.pending = Some(self.generation);
            tracing::debug!("Document changed during scan {}, rescheduling", generation);
            return Some(ScanCmd::ArmDebounce {
                generation: self.generation,
                delay: self.debounce,
            });
        }

        match render::apply(doc, &outcome, &self.palettes) {
            Ok(()) => {
                self.stats.renders += 1;
                tracing::debug!(
                    generation,
                    errors = outcome.errors.len(),
                    "Applied scan results"
                );
                state.last_scanned_text = Some(outcome.snapshot.shared_text());
                state.cached = Some(outcome);
            }
            Err(e) => {
                self.stats.render_failures += 1;
                tracing::warn!("Failed to apply scan {} results: {:#}", generation, e);
            }
        }
        None
    }
}
