//! Window-procedure policy for the sink.
//!
//! The raw `extern "system"` procedure in `winhost` forwards every message here. Session-end
//! notifications fire the hook through the once-guard and are acknowledged; everything else is
//! handed to the host's default procedure and its result returned untouched.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};

use crate::notification::{Notification, PROCEED};
use crate::once::OnceGuard;

/// User callback run when the session ends. Consumed by its single invocation.
pub type Hook = Box<dyn FnOnce() + Send + 'static>;

/// Default handling for notifications the dispatcher does not claim.
pub trait DefaultHandler {
    fn default_result(&self, notification: &Notification) -> isize;
}

impl<F> DefaultHandler for F
where
    F: Fn(&Notification) -> isize,
{
    fn default_result(&self, notification: &Notification) -> isize {
        self(notification)
    }
}

/// Hook plus its once-guard, shared between the pump thread and the pump handle.
pub struct Dispatcher {
    guard: OnceGuard,
    hook: Mutex<Option<Hook>>,
}

impl Dispatcher {
    pub fn new<F>(hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            guard: OnceGuard::new(),
            hook: Mutex::new(Some(Box::new(hook))),
        }
    }

    fn take_hook(&self) -> Option<Hook> {
        self.hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Handle one notification addressed to the sink.
    pub fn handle<D: DefaultHandler + ?Sized>(
        &self,
        notification: &Notification,
        default: &D,
    ) -> isize {
        let kind = notification.kind();
        if !kind.is_qualifying() {
            return default.default_result(notification);
        }
        let reason = notification.reason();
        let fired = self.guard.fire_once(|| {
            info!(
                code = notification.code,
                ?kind,
                logoff = reason.logoff,
                critical = reason.critical,
                close_app = reason.close_app,
                "session ending; running shutdown hook"
            );
            // Lock is released before the hook runs; unwinding must not cross the window procedure.
            if let Some(hook) = self.take_hook()
                && catch_unwind(AssertUnwindSafe(hook)).is_err()
            {
                error!("shutdown hook panicked");
            }
        });
        if !fired {
            debug!(code = notification.code, ?kind, "shutdown hook already fired");
        }
        PROCEED
    }

    pub fn has_fired(&self) -> bool {
        self.guard.has_fired()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("fired", &self.has_fired())
            .finish_non_exhaustive()
    }
}
