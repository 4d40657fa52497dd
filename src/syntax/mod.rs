//! Token classification
//!
//! Language-agnostic tokenizer that turns a text snapshot into ordered,
//! non-overlapping classified spans:
//! - Fixed cross-language keyword, built-in and operator tables
//! - String/comment spans double as excluded ranges for the error detector
//!
//! ## Pipeline
//!
//! ```text
//! TextSnapshot → tokenize() → Vec<Token> → ExcludedRanges → diagnostics::detect
//! ```

mod tables;
mod token;
mod tokenizer;

pub use tables::{is_builtin_function, is_keyword, is_no_terminator_starter};
pub use token::{excluded_ranges, ExcludedRange, ExcludedRanges, Token, TokenType};
pub use tokenizer::{tokenize, tokenize_chars};
