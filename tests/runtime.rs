//! Threaded runtime tests
//!
//! Scans run on worker threads and debounce timers fire on their own thread,
//! so every test waits with a generous timeout.

use std::thread;
use std::time::Duration;

use loupe::host::MemoryDocument;
use loupe::messages::ScanMsg;
use loupe::runtime::Runtime;
use loupe::scheduler::{ScanPhase, ScanScheduler};

const SETTLE: Duration = Duration::from_secs(5);

fn runtime(text: &str) -> Runtime<MemoryDocument> {
    Runtime::new(MemoryDocument::new(text), ScanScheduler::default())
        .expect("Failed to start runtime")
}

#[test]
fn test_enable_scans_on_worker_thread() {
    let mut rt = runtime("call(1, [2)");
    rt.dispatch(ScanMsg::Enable);
    assert!(matches!(rt.scheduler().phase(), ScanPhase::Scanning { .. }));

    assert!(rt.run_until_settled(SETTLE));
    assert_eq!(rt.scheduler().stats().renders, 1);
    assert!(!rt.document().highlights().is_empty());
}

#[test]
fn test_edit_is_scanned_after_debounce() {
    let mut rt = runtime("x = 1;");
    rt.dispatch(ScanMsg::Enable);
    assert!(rt.run_until_settled(SETTLE));
    assert!(rt.document().highlights().is_empty());

    rt.document_mut().insert(4, "(").unwrap();
    rt.dispatch(ScanMsg::TextEdited);
    assert!(rt.scheduler().has_pending_debounce());

    assert!(rt.run_until_settled(SETTLE));
    assert_eq!(rt.scheduler().stats().renders, 2);
    assert_eq!(rt.document().highlights().len(), 1);
}

#[test]
fn test_rapid_edits_coalesce_into_one_scan() {
    let mut rt = runtime("a");
    rt.dispatch(ScanMsg::Enable);
    assert!(rt.run_until_settled(SETTLE));

    for i in 0..5 {
        let end = rt.document().len_chars();
        rt.document_mut().insert(end, &i.to_string()).unwrap();
        rt.dispatch(ScanMsg::TextEdited);
    }
    assert!(rt.run_until_settled(SETTLE));

    let stats = rt.scheduler().stats();
    assert_eq!(stats.scans_started, 2);
    assert_eq!(stats.renders, 2);
    assert_eq!(
        rt.scheduler().last_outcome().unwrap().snapshot.text(),
        "a01234"
    );
}

#[test]
fn test_disable_cancels_armed_timer() {
    let mut rt = runtime("a");
    rt.dispatch(ScanMsg::Enable);
    assert!(rt.run_until_settled(SETTLE));

    rt.document_mut().insert(1, "(").unwrap();
    rt.dispatch(ScanMsg::TextEdited);
    rt.dispatch(ScanMsg::Disable);

    thread::sleep(rt.scheduler().debounce() * 2);
    rt.pump();
    assert_eq!(rt.scheduler().stats().scans_started, 1);
    assert!(rt.document().highlights().is_empty());
}

#[test]
fn test_messages_from_other_threads() {
    let mut rt = runtime("(");
    let tx = rt.sender();
    thread::spawn(move || {
        let _ = tx.send(ScanMsg::Enable);
    })
    .join()
    .unwrap();

    assert!(rt.pump_timeout(SETTLE) >= 1);
    assert!(rt.run_until_settled(SETTLE));
    assert_eq!(rt.document().highlights().len(), 1);
}

#[test]
fn test_settled_immediately_when_disabled() {
    let mut rt = runtime("x");
    assert!(rt.run_until_settled(Duration::from_millis(10)));
    assert_eq!(rt.pump(), 0);
}
