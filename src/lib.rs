//! Run a callback exactly once when Windows signals logoff, shutdown or session end.
//!
//! Processes without a visible window never see WM_QUERYENDSESSION / WM_ENDSESSION. This crate
//! creates a hidden top-level sink window on a dedicated thread, pumps its messages there, and
//! fires the registered hook the first time either notification arrives. All other messages
//! get the default window procedure.
//!
//! ```no_run
//! shutdownhook::register_shutdown_hook(|| {
//!     // flush state, close files, ...
//! })
//! .expect("session-end notifications unavailable");
//! ```
//!
//! On hosts without a window message model setup fails with [`HookError::Unsupported`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod notification;
pub mod once;
mod registrar;

#[cfg(windows)]
mod winhost;
#[cfg(windows)]
use winhost as host;

#[cfg(not(windows))]
mod nohost;
#[cfg(not(windows))]
use nohost as host;

pub use config::SinkConfig;
pub use error::{HookError, Result};
pub use notification::{EndSessionReason, Notification, NotificationKind, PROCEED};
pub use registrar::{PUMP_THREAD_NAME, PumpHandle, PumpStopper, install, register_shutdown_hook};
