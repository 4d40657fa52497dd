//! Message types for the scan scheduler
//!
//! All scheduler state changes flow through [`ScanMsg`].

use crate::scan::ScanOutcome;

/// Input to [`ScanScheduler::update`](crate::scheduler::ScanScheduler::update)
#[derive(Debug, Clone)]
pub enum ScanMsg {
    /// A document was opened; enables scanning unless the config turned it off
    DocumentOpened,
    /// Switch scanning on; scans immediately
    Enable,
    /// Switch scanning off and remove all scanner formatting
    Disable,
    /// The document content changed; (re)starts the debounce
    TextEdited,
    /// Scan now, skipping the debounce and the unchanged-text check
    Refresh,
    /// The debounce armed for `generation` ran out
    DebounceElapsed { generation: u64 },
    /// A scan job finished
    ScanCompleted {
        generation: u64,
        outcome: Box<ScanOutcome>,
    },
    /// The host switched between dark and light
    ThemeChanged,
    /// The document is going away; drop all state without painting
    DocumentClosed,
}

impl ScanMsg {
    pub fn completed(generation: u64, outcome: ScanOutcome) -> Self {
        ScanMsg::ScanCompleted {
            generation,
            outcome: Box::new(outcome),
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ScanMsg::DocumentOpened => "DocumentOpened",
            ScanMsg::Enable => "Enable",
            ScanMsg::Disable => "Disable",
            ScanMsg::TextEdited => "TextEdited",
            ScanMsg::Refresh => "Refresh",
            ScanMsg::DebounceElapsed { .. } => "DebounceElapsed",
            ScanMsg::ScanCompleted { .. } => "ScanCompleted",
            ScanMsg::ThemeChanged => "ThemeChanged",
            ScanMsg::DocumentClosed => "DocumentClosed",
        }
    }
}
