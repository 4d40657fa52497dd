//! loupe - good-enough code awareness for any language
//!
//! A language-agnostic tokenizer, a heuristic error detector and a debounced
//! scan scheduler that paints results onto a host document.
//!
//! The scheduler follows the Elm Architecture: `ScanScheduler::update` turns
//! a [`ScanMsg`] into an optional [`ScanCmd`], and a runtime (inline or the
//! threaded [`Runtime`]) performs the command.

pub mod commands;
pub mod config;
pub mod config_paths;
pub mod diagnostics;
pub mod fs_watcher;
pub mod host;
pub mod logging;
pub mod messages;
pub mod palette;
pub mod render;
pub mod runtime;
pub mod scan;
pub mod scheduler;
pub mod syntax;
pub mod view;

// Re-export commonly used types
pub use commands::ScanCmd;
pub use config::ScanConfig;
pub use diagnostics::{detect, detect_with, DetectorOptions, ErrorKind, ErrorSpan, IndentStyle};
pub use host::{HostDocument, MemoryDocument};
pub use messages::ScanMsg;
pub use palette::{Color, Palette, PaletteSet, ThemeKind};
pub use runtime::Runtime;
pub use scan::{ScanJob, ScanOutcome, TextSnapshot};
pub use scheduler::{ScanPhase, ScanScheduler, ScanStats};
pub use syntax::{tokenize, Token, TokenType};
