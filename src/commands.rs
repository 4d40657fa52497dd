//! Command types for the scan scheduler
//!
//! Commands represent side effects the runtime performs after an update.

use std::time::Duration;

use crate::scan::ScanJob;

#[derive(Debug, Clone)]
pub enum ScanCmd {
    /// Start (or restart) the debounce timer.
    /// After `delay`, sends `ScanMsg::DebounceElapsed { generation }`
    ArmDebounce { generation: u64, delay: Duration },
    /// Stop the debounce timer without firing
    CancelDebounce,
    /// Run a scan job, inline or on a worker.
    /// Sends `ScanMsg::ScanCompleted` when done
    RunScan(ScanJob),
    /// Execute multiple commands
    Batch(Vec<ScanCmd>),
}

impl ScanCmd {
    /// Combine commands, collapsing the trivial cases
    pub fn batch(mut cmds: Vec<ScanCmd>) -> Option<Self> {
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(ScanCmd::Batch(cmds)),
        }
    }

    /// Flatten nested batches into execution order
    pub fn into_vec(self) -> Vec<ScanCmd> {
        match self {
            ScanCmd::Batch(cmds) => cmds.into_iter().flat_map(ScanCmd::into_vec).collect(),
            cmd => vec![cmd],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_collapses() {
        assert!(ScanCmd::batch(vec![]).is_none());
        assert!(matches!(
            ScanCmd::batch(vec![ScanCmd::CancelDebounce]),
            Some(ScanCmd::CancelDebounce)
        ));
    }

    #[test]
    fn test_into_vec_flattens_nested_batches() {
        let cmd = ScanCmd::Batch(vec![
            ScanCmd::CancelDebounce,
            ScanCmd::Batch(vec![ScanCmd::ArmDebounce {
                generation: 3,
                delay: Duration::from_millis(130),
            }]),
        ]);
        let flat = cmd.into_vec();
        assert_eq!(flat.len(), 2);
        assert!(matches!(flat[1], ScanCmd::ArmDebounce { generation: 3, .. }));
    }
}
