//! Benchmarks for the tokenizer, detector and full scan path
//!
//! Run with: cargo bench --bench scan

use loupe::diagnostics::{detect, DetectorOptions};
use loupe::host::MemoryDocument;
use loupe::messages::ScanMsg;
use loupe::scan::{ScanJob, TextSnapshot};
use loupe::scheduler::ScanScheduler;
use loupe::syntax::tokenize;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

// ============================================================================
// Sample source
// ============================================================================

const JS_SAMPLE: &str = include_str!("../samples/sample.js");

/// Repeat a mixed-language block; every fifth block has an unclosed bracket
fn generate_source(lines: usize) -> String {
    let mut out = String::with_capacity(lines * 32);
    let mut i = 0;
    while out.lines().count() < lines {
        out.push_str(&format!(
            "function item_{i}(a, b) {{\n    let total = a + b * {i};\n    // running sum\n    return \"done\";\n}}\n"
        ));
        if i % 5 == 4 {
            out.push_str("call(oops[1);\n");
        }
        i += 1;
    }
    out
}

// ============================================================================
// Tokenizer and detector
// ============================================================================

#[divan::bench]
fn tokenize_sample() {
    divan::black_box(tokenize(divan::black_box(JS_SAMPLE)));
}

#[divan::bench(args = [100, 1000, 5000])]
fn tokenize_generated(bencher: divan::Bencher, lines: usize) {
    let source = generate_source(lines);
    bencher.bench(|| divan::black_box(tokenize(divan::black_box(&source))));
}

#[divan::bench(args = [100, 1000, 5000])]
fn detect_generated(bencher: divan::Bencher, lines: usize) {
    let source = generate_source(lines);
    bencher.bench(|| divan::black_box(detect(divan::black_box(&source))));
}

// ============================================================================
// Full scan
// ============================================================================

#[divan::bench(args = [100, 1000, 5000])]
fn scan_job(bencher: divan::Bencher, lines: usize) {
    let snapshot = TextSnapshot::new(&generate_source(lines));
    bencher
        .with_inputs(|| ScanJob::new(1, snapshot.clone(), DetectorOptions::default()))
        .bench_values(|job| divan::black_box(job.run()));
}

#[divan::bench(args = [100, 1000])]
fn scan_and_paint(bencher: divan::Bencher, lines: usize) {
    let source = generate_source(lines);
    bencher
        .with_inputs(|| (ScanScheduler::default(), MemoryDocument::new(&source)))
        .bench_values(|(mut scheduler, mut doc)| {
            scheduler.update_inline(&mut doc, ScanMsg::Enable);
            divan::black_box(doc.highlights().len())
        });
}
