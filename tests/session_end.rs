//! End-to-end tests against a real sink window and pump.
#![cfg(windows)]

use shutdownhook::config::DEFAULT_CLASS_NAME;
use shutdownhook::{
    HookError, Notification, PROCEED, PumpHandle, SinkConfig, install, register_shutdown_hook,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const WM_NULL: u32 = 0x0000;
const WM_GETTEXTLENGTH: u32 = 0x000E;
const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;
const ERROR_CLASS_ALREADY_EXISTS: u32 = 1410;

fn install_counting(class: &str) -> (PumpHandle, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let handle = install(SinkConfig::default().with_class_name(class), move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    (handle, count)
}

fn shut_down(handle: PumpHandle) {
    handle.stop().unwrap();
    handle.join().unwrap();
}

#[test]
fn query_then_end_session_fires_hook_once() {
    let (handle, count) = install_counting("shutdownhook-test-once");
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(!handle.has_fired());

    assert_eq!(handle.notify(Notification::query_end_session()).unwrap(), PROCEED);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(handle.has_fired());

    assert_eq!(handle.notify(Notification::end_session()).unwrap(), PROCEED);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    shut_down(handle);
}

#[test]
fn other_traffic_does_not_fire() {
    let (handle, count) = install_counting("shutdownhook-test-traffic");
    for _ in 0..3 {
        handle.notify(Notification::new(WM_NULL, 0, 0)).unwrap();
    }
    assert_eq!(count.load(Ordering::SeqCst), 0);
    handle.notify(Notification::end_session()).unwrap();
    handle.notify(Notification::end_session()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    shut_down(handle);
}

#[test]
fn other_codes_get_default_window_procedure() {
    let title = "sink-title";
    let handle = install(
        SinkConfig::default()
            .with_class_name("shutdownhook-test-default")
            .with_title(title),
        || {},
    )
    .unwrap();
    // DefWindowProcW answers WM_GETTEXTLENGTH with the window text length.
    let len = handle
        .notify(Notification::new(WM_GETTEXTLENGTH, 0, 0))
        .unwrap();
    assert_eq!(len, title.len() as isize);
    assert!(!handle.has_fired());
    shut_down(handle);
}

#[test]
fn duplicate_class_name_is_a_registration_error() {
    let (first, _count) = install_counting("shutdownhook-test-duplicate");
    let err = install(
        SinkConfig::default().with_class_name("shutdownhook-test-duplicate"),
        || {},
    )
    .unwrap_err();
    match err {
        HookError::Registration { class, code, .. } => {
            assert_eq!(class, "shutdownhook-test-duplicate");
            assert_eq!(code, ERROR_CLASS_ALREADY_EXISTS);
        }
        other => panic!("expected registration error, got {other:?}"),
    }
    // The original sink keeps working.
    assert_eq!(first.notify(Notification::query_end_session()).unwrap(), PROCEED);
    shut_down(first);
}

#[test]
fn stop_releases_the_class_name() {
    let (handle, _count) = install_counting("shutdownhook-test-restart");
    shut_down(handle);
    let (again, count) = install_counting("shutdownhook-test-restart");
    again.notify(Notification::query_end_session()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    shut_down(again);
}

#[test]
fn hook_runs_on_pump_thread() {
    let name = Arc::new(std::sync::Mutex::new(None));
    let n = name.clone();
    let handle = install(
        SinkConfig::default().with_class_name("shutdownhook-test-thread"),
        move || {
            *n.lock().unwrap() = std::thread::current().name().map(str::to_string);
        },
    )
    .unwrap();
    handle.notify(Notification::end_session()).unwrap();
    assert_eq!(
        name.lock().unwrap().as_deref(),
        Some(shutdownhook::PUMP_THREAD_NAME)
    );
    shut_down(handle);
}

#[test]
fn hook_may_consume_captured_state() {
    struct Journal(Arc<AtomicUsize>);
    impl Drop for Journal {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
    let closed = Arc::new(AtomicUsize::new(0));
    let journal = Journal(closed.clone());
    let handle = install(
        SinkConfig::default().with_class_name("shutdownhook-test-fnonce"),
        move || drop(journal),
    )
    .unwrap();
    assert_eq!(closed.load(Ordering::SeqCst), 0);
    handle.notify(Notification::query_end_session()).unwrap();
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    handle.notify(Notification::end_session()).unwrap();
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    shut_down(handle);
}

#[test]
fn notify_after_stop_reports_dead_sink() {
    let (handle, count) = install_counting("shutdownhook-test-stopped");
    handle.stop().unwrap();
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_millis(5));
    }
    let err = handle
        .notify(Notification::query_end_session())
        .unwrap_err();
    assert!(matches!(
        err,
        HookError::Delivery {
            notification: 0x0011,
            code: ERROR_INVALID_WINDOW_HANDLE,
            ..
        }
    ));
    assert_eq!(count.load(Ordering::SeqCst), 0);
    handle.join().unwrap();
}

#[test]
fn register_shutdown_hook_claims_the_default_class() {
    register_shutdown_hook(|| {}).unwrap();
    let err = register_shutdown_hook(|| {}).unwrap_err();
    match err {
        HookError::Registration { class, code, .. } => {
            assert_eq!(class, DEFAULT_CLASS_NAME);
            assert_eq!(code, ERROR_CLASS_ALREADY_EXISTS);
        }
        other => panic!("expected registration error, got {other:?}"),
    }
}
