//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use loupe::commands::ScanCmd;
use loupe::host::MemoryDocument;
use loupe::messages::ScanMsg;
use loupe::scheduler::ScanScheduler;

/// Snippets in a handful of languages, all free of detectable problems
pub const CLEAN_SOURCES: &[&str] = &[
    "function add(a, b) {\n    return a + b;\n}\n",
    "let v = [1, 2, (3)];\nconsole.log(v);\n",
    "def greet(name):\n    print(\"hi\", name)\n",
    "SELECT id, name FROM users WHERE id = 1;\n",
    "fn main() {\n    let s = \"(\";\n    println!(\"{}\", s);\n}\n",
    "# only a comment\n",
    "",
];

/// Inputs that exercise unterminated and odd constructs
pub const MESSY_SOURCES: &[&str] = &[
    "foo(bar[1)",
    "{ ( } )",
    "s = \"unterminated\nx = 1",
    "/* never closed",
    "'''doc\nstring",
    "a\\",
    "0x 1e 2.e5 .5f 3L",
    "\t  mixed\n    spaces\n\ttabs",
    "@decorator $var `tpl\nline` ===>= !",
    "\r\r\n\n\r",
    "é = \"ünï\" // çømment",
];

/// Handle a message with scans run inline; returns armed debounce generations
pub fn drive(scheduler: &mut ScanScheduler, doc: &mut MemoryDocument, msg: ScanMsg) -> Vec<u64> {
    scheduler
        .update_inline(doc, msg)
        .into_iter()
        .filter_map(|cmd| match cmd {
            ScanCmd::ArmDebounce { generation, .. } => Some(generation),
            _ => None,
        })
        .collect()
}

/// Edit the document and let the debounce run out immediately
pub fn edit_and_settle(
    scheduler: &mut ScanScheduler,
    doc: &mut MemoryDocument,
    edit: impl FnOnce(&mut MemoryDocument),
) {
    edit(doc);
    for generation in drive(scheduler, doc, ScanMsg::TextEdited) {
        drive(scheduler, doc, ScanMsg::DebounceElapsed { generation });
    }
}

/// Foreground colors of every char, for comparing two paint passes
pub fn foreground_map(doc: &MemoryDocument) -> Vec<Option<loupe::palette::Color>> {
    (0..doc.len_chars()).map(|i| doc.foreground_at(i)).collect()
}
