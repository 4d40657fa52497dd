//! Threaded driver for the scan scheduler
//!
//! The document and the scheduler live on the thread that calls
//! [`Runtime::pump`]. Debounce timing happens on a dedicated timer thread and
//! scans run on short-lived worker threads; both report back through the
//! message channel, so the document is only ever touched by the owner.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::commands::ScanCmd;
use crate::host::HostDocument;
use crate::messages::ScanMsg;
use crate::scan::ScanJob;
use crate::scheduler::ScanScheduler;

#[derive(Debug)]
enum TimerCmd {
    Arm { generation: u64, delay: Duration },
    Cancel,
    Shutdown,
}

/// Single restartable debounce timer on its own thread
pub struct Debouncer {
    control_tx: Sender<TimerCmd>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Spawn the timer thread; fired timers are sent to `out`
    pub fn spawn(out: Sender<ScanMsg>) -> Result<Self> {
        let (control_tx, control_rx) = mpsc::channel();
        let thread_handle = thread::Builder::new()
            .name("loupe-debounce".to_string())
            .spawn(move || run_timer_loop(control_rx, out))
            .context("Failed to spawn debounce thread")?;

        Ok(Self {
            control_tx,
            thread_handle: Some(thread_handle),
        })
    }

    /// Restart the timer; a previously armed generation never fires
    pub fn arm(&self, generation: u64, delay: Duration) {
        if self
            .control_tx
            .send(TimerCmd::Arm { generation, delay })
            .is_err()
        {
            tracing::warn!("Debounce thread is gone, dropping timer {}", generation);
        }
    }

    pub fn cancel(&self) {
        let _ = self.control_tx.send(TimerCmd::Cancel);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let _ = self.control_tx.send(TimerCmd::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                tracing::error!("Debounce thread panicked");
            }
        }
    }
}

fn run_timer_loop(control_rx: Receiver<TimerCmd>, out: Sender<ScanMsg>) {
    let mut armed: Option<(u64, Instant)> = None;

    loop {
        let cmd = match armed {
            Some((generation, deadline)) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match control_rx.recv_timeout(remaining) {
                    Ok(cmd) => cmd,
                    Err(RecvTimeoutError::Timeout) => {
                        armed = None;
                        if out.send(ScanMsg::DebounceElapsed { generation }).is_err() {
                            break;
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match control_rx.recv() {
                Ok(cmd) => cmd,
                Err(_) => break,
            },
        };

        match cmd {
            TimerCmd::Arm { generation, delay } => {
                armed = Some((generation, Instant::now() + delay));
            }
            TimerCmd::Cancel => armed = None,
            TimerCmd::Shutdown => break,
        }
    }
    tracing::trace!("Debounce thread exiting");
}

/// Owns a document and drives its scheduler from channel messages
pub struct Runtime<D: HostDocument> {
    document: D,
    scheduler: ScanScheduler,
    msg_tx: Sender<ScanMsg>,
    msg_rx: Receiver<ScanMsg>,
    debouncer: Debouncer,
}

impl<D: HostDocument> Runtime<D> {
    pub fn new(document: D, scheduler: ScanScheduler) -> Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let debouncer = Debouncer::spawn(msg_tx.clone())?;
        Ok(Self {
            document,
            scheduler,
            msg_tx,
            msg_rx,
            debouncer,
        })
    }

    /// Handle for other threads to post messages
    pub fn sender(&self) -> Sender<ScanMsg> {
        self.msg_tx.clone()
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutate the document directly; follow with `ScanMsg::TextEdited`
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn scheduler(&self) -> &ScanScheduler {
        &self.scheduler
    }

    /// Apply a message now and start its side effects
    pub fn dispatch(&mut self, msg: ScanMsg) {
        if let Some(cmd) = self.scheduler.update(&mut self.document, msg) {
            self.process_cmd(cmd);
        }
    }

    fn process_cmd(&self, cmd: ScanCmd) {
        match cmd {
            ScanCmd::ArmDebounce { generation, delay } => self.debouncer.arm(generation, delay),
            ScanCmd::CancelDebounce => self.debouncer.cancel(),
            ScanCmd::RunScan(job) => self.spawn_scan(job),
            ScanCmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn spawn_scan(&self, job: ScanJob) {
        let generation = job.generation;
        let tx = self.msg_tx.clone();
        let worker_job = job.clone();
        let spawned = thread::Builder::new()
            .name(format!("loupe-scan-{}", generation))
            .spawn(move || {
                let _ = tx.send(ScanMsg::completed(generation, worker_job.run()));
            });

        // The scheduler stays Scanning until a result arrives
        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn scan thread, scanning inline: {}", e);
            let _ = self.msg_tx.send(ScanMsg::completed(generation, job.run()));
        }
    }

    /// Handle every queued message without blocking. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for a message, then drain the queue
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
                1 + self.pump()
            }
            Err(_) => 0,
        }
    }

    /// Pump until nothing is armed or in flight. Returns false on timeout.
    pub fn run_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.scheduler.is_settled() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            self.pump_timeout(remaining);
        }
    }
}
