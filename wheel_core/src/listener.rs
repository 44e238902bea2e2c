//! Background pulse listening.
//!
//! Spawns a thread that owns the `PulseSource` and forwards every edge to the
//! triggered level as one pulse over an unbounded channel, so no pulse is lost
//! while the controller is busy. Non-triggered edges, timeouts and read errors
//! are dropped here.
//!
//! Each `PulseListener` spawns exactly one thread that is shut down and joined
//! when the listener is dropped.
use crossbeam_channel as xch;
use eyre::WrapErr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use wheel_traits::{Level, PulseSource};

use crate::error::Result;

pub struct PulseListener {
    rx: xch::Receiver<()>,
    forwarded: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl PulseListener {
    /// `poll` bounds each blocking read so the thread notices shutdown promptly.
    pub fn spawn<P: PulseSource + Send + 'static>(
        mut source: P,
        trigger: Level,
        poll: Duration,
    ) -> Result<Self> {
        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let forwarded = Arc::new(AtomicU64::new(0));
        let forwarded_clone = forwarded.clone();

        let join_handle = std::thread::Builder::new()
            .name("pulse-listener".into())
            .spawn(move || {
                loop {
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("pulse listener received shutdown signal");
                        break;
                    }
                    match source.next_edge(poll) {
                        Ok(Some(level)) if level == trigger => {
                            if tx.send(()).is_err() {
                                tracing::debug!("pulse consumer disconnected, exiting thread");
                                break;
                            }
                            forwarded_clone.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::trace!(error = %e, "sensor read failed");
                        }
                    }
                }
                tracing::trace!("pulse listener thread exiting cleanly");
            })
            .wrap_err("spawn pulse listener thread")?;

        Ok(Self {
            rx,
            forwarded,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// Wait up to `timeout` for the next pulse.
    pub fn recv_timeout(&self, timeout: Duration) -> std::result::Result<(), xch::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Pulses handed to the channel so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }
}

impl Drop for PulseListener {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits after its current read returns (at most `poll`).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("pulse listener thread joined");
                }
                Err(e) => {
                    tracing::warn!(?e, "pulse listener thread panicked during shutdown");
                }
            }
        }
    }
}
