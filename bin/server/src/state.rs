//! Server application state management

use filestore::FileStore;
use otp::OtpAuthority;

use crate::notify::Notifier;
use crate::session::SessionGate;

/// Shared state handed to every handler.
pub struct AppState {
    pub otp: OtpAuthority,
    pub gate: SessionGate,
    pub store: FileStore,
    /// `None` when no mail transport is configured.
    pub notifier: Option<Notifier>,
}

impl AppState {
    pub fn new(
        otp: OtpAuthority,
        gate: SessionGate,
        store: FileStore,
        notifier: Option<Notifier>,
    ) -> Self {
        Self {
            otp,
            gate,
            store,
            notifier,
        }
    }
}
