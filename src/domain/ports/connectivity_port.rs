//! Connectivity port definition.

use crate::domain::connection::ConnectivityStatus;

/// Port exposing the current, externally maintained network status.
///
/// The value may change at any moment; readers get no transactional
/// guarantee.
pub trait ConnectivityPort: Send + Sync {
    /// Returns the current status.
    fn current_status(&self) -> ConnectivityStatus;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Mock connectivity source with a settable status.
    pub struct FixedConnectivity {
        status: Mutex<ConnectivityStatus>,
    }

    impl FixedConnectivity {
        /// Creates mock reporting the given status.
        pub fn new(status: ConnectivityStatus) -> Self {
            Self {
                status: Mutex::new(status),
            }
        }

        /// Changes the reported status.
        pub fn set(&self, status: ConnectivityStatus) {
            *self.status.lock() = status;
        }
    }

    impl ConnectivityPort for FixedConnectivity {
        fn current_status(&self) -> ConnectivityStatus {
            *self.status.lock()
        }
    }
}
