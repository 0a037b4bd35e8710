//! Background sweeper thread.
//!
//! The sweeper runs in a dedicated OS thread driving a single-threaded
//! Tokio runtime, so a map can be built from plain synchronous code.

use std::hash::Hash;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};
use ttlmap_core::MAX_TTL;

use crate::error::{Result, TtlMapError};
use crate::table::Table;

/// Handle to a running sweeper thread.
///
/// Running until [`Sweeper::stop`] is called or the handle is dropped;
/// stopped is terminal.
pub(crate) struct Sweeper {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Spawn the sweeper thread for `table`.
    ///
    /// This is an I/O operation that spawns an OS thread.
    pub(crate) fn spawn<K, V>(table: Arc<Table<K, V>>) -> Result<Self>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        let interval = table.config().sweep_interval;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| TtlMapError::SweeperSpawn(e.to_string()))?;

        let handle = std::thread::Builder::new()
            .name("ttlmap-sweeper".to_string())
            .spawn(move || runtime.block_on(run(table, interval, stop_rx)))
            .map_err(|e| TtlMapError::SweeperSpawn(e.to_string()))?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it to exit.
    ///
    /// Only the first call does anything.
    pub(crate) fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // Receiver already gone means the loop has exited on its own
            let _ = stop_tx.send(());
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("TTL sweeper thread panicked");
            }
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<K, V>(
    table: Arc<Table<K, V>>,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) where
    K: Eq + Hash,
{
    let period = interval.min(MAX_TTL);
    // First sweep happens one full interval after start
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_ms = period.as_millis() as u64, "TTL sweeper started");

    loop {
        tokio::select! {
            // Fires on an explicit stop and when the map side is dropped
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {
                table.sweep(std::time::Instant::now());
            }
        }
    }

    tracing::info!("TTL sweeper stopped");
}
