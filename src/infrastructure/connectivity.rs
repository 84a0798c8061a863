//! Connectivity monitor.
//!
//! Holds the current network status in an atomic so that any number of
//! retrievals can read it without locking. The status is flipped either by
//! the composition root or by an optional background probe that opens a TCP
//! connection to a known host on an interval.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, timeout};
use tracing::{debug, info};

use crate::domain::ConnectivityStatus;
use crate::domain::ports::ConnectivityPort;

/// Shared, externally maintained connectivity status.
pub struct ConnectivityMonitor {
    connected: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl ConnectivityMonitor {
    /// Creates a monitor reporting the given status.
    #[must_use]
    pub fn new(initial: ConnectivityStatus) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(initial.is_connected())),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Overrides the current status.
    pub fn set_status(&self, status: ConnectivityStatus) {
        store_status(&self.connected, status);
    }

    /// Opens one TCP connection to `host` (`host:port`) and reports whether
    /// it succeeded within `limit`.
    pub async fn probe(host: &str, limit: Duration) -> ConnectivityStatus {
        let reachable = matches!(timeout(limit, TcpStream::connect(host)).await, Ok(Ok(_)));
        debug!(host, reachable, "Connectivity probe");
        ConnectivityStatus::from(reachable)
    }

    /// Starts probing `host` every `every`, updating the status each time.
    ///
    /// The first probe runs after one full interval, so callers seed the
    /// status with [`probe`] beforehand. The task ends after [`stop`] or
    /// when the monitor is dropped.
    ///
    /// [`probe`]: Self::probe
    ///
    /// [`stop`]: Self::stop
    pub fn start_probe(&self, host: String, every: Duration, limit: Duration) -> JoinHandle<()> {
        let connected = self.connected.clone();
        let running = self.running.clone();

        running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);

            while running.load(Ordering::SeqCst) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let status = Self::probe(&host, limit).await;
                store_status(&connected, status);
            }

            debug!("Connectivity probe stopped");
        })
    }

    /// Stops the background probe, if any.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

fn store_status(connected: &AtomicBool, status: ConnectivityStatus) {
    let previous = connected.swap(status.is_connected(), Ordering::SeqCst);
    if previous != status.is_connected() {
        info!(status = %status, "Connectivity changed");
    }
}

impl ConnectivityPort for ConnectivityMonitor {
    fn current_status(&self) -> ConnectivityStatus {
        ConnectivityStatus::from(self.connected.load(Ordering::SeqCst))
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
