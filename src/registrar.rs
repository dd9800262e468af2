//! Hook setup and the handle to the running pump.
//!
//! Setup spawns one named native thread that registers the class, creates the sink and then
//! becomes the pump. The caller waits on a one-shot channel for the setup outcome only; it
//! never waits on the pump itself.

use std::sync::Arc;
use std::sync::mpsc::{self, SyncSender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use crate::config::SinkConfig;
use crate::dispatch::Dispatcher;
use crate::error::{HookError, Result};
use crate::host::{self, SinkHandle};
use crate::notification::Notification;

pub const PUMP_THREAD_NAME: &str = "shutdownhook-pump";

type SetupOutcome = Result<(SinkHandle, u32)>;

/// Register `hook` to run once when the session ends, for the remaining life of the process.
///
/// Returns as soon as the sink exists and its pump is running. The hook runs on the pump
/// thread, not on the caller's.
pub fn register_shutdown_hook<F>(hook: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    install(SinkConfig::default(), hook).map(PumpHandle::detach)
}

/// Configurable form of [`register_shutdown_hook`] that keeps a handle to the pump.
pub fn install<F>(config: SinkConfig, hook: F) -> Result<PumpHandle>
where
    F: FnOnce() + Send + 'static,
{
    // Reject unencodable names before a thread exists.
    config.wide_names()?;
    let dispatcher = Arc::new(Dispatcher::new(hook));
    let (ready_tx, ready_rx) = mpsc::sync_channel::<SetupOutcome>(1);
    let pump_dispatcher = Arc::clone(&dispatcher);
    let thread = thread::Builder::new()
        .name(PUMP_THREAD_NAME.to_string())
        .spawn(move || pump_thread(config, pump_dispatcher, ready_tx))
        .map_err(HookError::Spawn)?;

    match ready_rx.recv() {
        Ok(Ok((sink, thread_id))) => {
            info!(thread_id, "shutdown hook installed");
            Ok(PumpHandle {
                sink,
                thread_id,
                dispatcher,
                thread,
            })
        }
        Ok(Err(e)) => {
            error!(error = %e, code = ?e.code(), "shutdown hook setup failed");
            let _ = thread.join();
            Err(e)
        }
        Err(_) => {
            let _ = thread.join();
            Err(HookError::PumpVanished)
        }
    }
}

fn pump_thread(config: SinkConfig, dispatcher: Arc<Dispatcher>, ready: SyncSender<SetupOutcome>) {
    let sink = match host::create_sink(&config, dispatcher) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok((sink, host::current_thread_id())));
    drop(ready);
    host::run_pump();
    host::destroy_sink(sink, &config.class_name);
    debug!(class = %config.class_name, "sink destroyed");
}

/// Handle to a running pump.
///
/// Dropping it (or calling [`PumpHandle::detach`]) leaves the pump running for the life of the
/// process. The sink itself is only ever touched on the pump thread.
#[derive(Debug)]
pub struct PumpHandle {
    sink: SinkHandle,
    thread_id: u32,
    dispatcher: Arc<Dispatcher>,
    thread: JoinHandle<()>,
}

impl PumpHandle {
    /// Native id of the pump thread.
    pub fn thread_id(&self) -> u32 {
        self.thread_id
    }

    /// Whether a qualifying notification has already claimed the hook.
    pub fn has_fired(&self) -> bool {
        self.dispatcher.has_fired()
    }

    /// Deliver a notification to the sink as the host would and return the dispatcher's
    /// result. Blocks until the pump thread has processed it. Fails with
    /// [`HookError::Delivery`] once the sink has been destroyed.
    pub fn notify(&self, notification: Notification) -> Result<isize> {
        host::send(self.sink, &notification)
    }

    /// A token that can stop the pump from any thread.
    pub fn stopper(&self) -> PumpStopper {
        PumpStopper {
            thread_id: self.thread_id,
        }
    }

    /// Ask the pump to exit. The sink is destroyed and its class unregistered afterwards.
    pub fn stop(&self) -> Result<()> {
        self.stopper().stop()
    }

    /// Whether the pump thread has exited; the sink is gone once this is true.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the pump thread to exit.
    pub fn join(self) -> Result<()> {
        self.thread.join().map_err(|_| HookError::PumpPanicked)
    }

    /// Let the pump run unobserved for the rest of the process.
    pub fn detach(self) {}
}

/// Stops a pump by posting the quit notification to its thread.
#[derive(Copy, Clone, Debug)]
pub struct PumpStopper {
    thread_id: u32,
}

impl PumpStopper {
    pub fn stop(&self) -> Result<()> {
        debug!(thread_id = self.thread_id, "posting quit to notification pump");
        host::post_quit(self.thread_id)
    }
}
