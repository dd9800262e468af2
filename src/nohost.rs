//! Host stand-in for platforms without a window message model.
//!
//! Setup reports `Unsupported`; no sink can ever exist, so the remaining entry points are
//! unreachable by construction.

use std::sync::Arc;

use crate::config::SinkConfig;
use crate::dispatch::Dispatcher;
use crate::error::{HookError, Result};
use crate::notification::Notification;

#[derive(Copy, Clone, Debug)]
pub enum SinkHandle {}

pub fn create_sink(_config: &SinkConfig, _dispatcher: Arc<Dispatcher>) -> Result<SinkHandle> {
    Err(HookError::Unsupported)
}

pub fn run_pump() {}

pub fn destroy_sink(sink: SinkHandle, _class_name: &str) {
    match sink {}
}

pub fn post_quit(_thread_id: u32) -> Result<()> {
    Err(HookError::Unsupported)
}

pub fn send(sink: SinkHandle, _notification: &Notification) -> Result<isize> {
    match sink {}
}

pub fn current_thread_id() -> u32 {
    0
}
