//! Error taxonomy for hook setup and pump control.
//!
//! Setup failures are surfaced synchronously with the host error code preserved. Failures
//! inside a running pump are not reported anywhere; the pump simply exits.

use thiserror::Error;

/// Every error the library can produce.
#[derive(Debug, Error)]
pub enum HookError {
    /// The host refused to register the sink's window class (name collision, exhaustion, ...).
    #[error("RegisterClassExW failed for class {class:?}: {message} (error {code})")]
    Registration {
        class: String,
        code: u32,
        message: String,
    },

    /// The class was registered but the sink window could not be created.
    #[error("CreateWindowExW failed: {message} (error {code})")]
    Creation { code: u32, message: String },

    /// A class name or title cannot be passed to the host as a nul-terminated wide string.
    #[error("invalid sink name {name:?}: contains an interior nul")]
    InvalidName { name: String },

    #[error("failed to spawn the notification pump thread")]
    Spawn(#[source] std::io::Error),

    /// The pump thread went away without reporting whether setup succeeded.
    #[error("notification pump exited before reporting setup")]
    PumpVanished,

    #[error("posting WM_QUIT to pump thread {thread_id} failed: {message} (error {code})")]
    Quit {
        thread_id: u32,
        code: u32,
        message: String,
    },

    /// A notification could not be delivered, typically because the sink was already destroyed.
    #[error("delivering notification {notification:#06x} to the sink failed: {message} (error {code})")]
    Delivery {
        notification: u32,
        code: u32,
        message: String,
    },

    #[error("notification pump thread panicked")]
    PumpPanicked,

    /// The host has no window/message notification model.
    #[error("session-end notifications are not available on this platform")]
    Unsupported,
}

impl HookError {
    /// Underlying host error code, when the failure came from an OS call.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Registration { code, .. }
            | Self::Creation { code, .. }
            | Self::Delivery { code, .. }
            | Self::Quit { code, .. } => Some(*code),
            Self::Spawn(e) => e.raw_os_error().map(|c| c as u32),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HookError>;
