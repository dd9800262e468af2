//! Hidden top-level sink window and the message pump that feeds it.
//!
//! Win32 queues a window's messages on the thread that created it, so class registration,
//! window creation and the GetMessage/Dispatch loop all run on the pump thread. The window is
//! a regular (never shown) top-level window rather than a message-only one: HWND_MESSAGE
//! windows do not receive the WM_QUERYENDSESSION/WM_ENDSESSION broadcast.
//!
//! Functions here are thin shims; policy lives in `dispatch`.

use once_cell::unsync::OnceCell;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};
use widestring::U16CString;
use windows::Win32::Foundation::{
    GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, SetLastError, WIN32_ERROR, WPARAM,
};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CW_USEDEFAULT, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    MSG, PostThreadMessageW, RegisterClassExW, SendMessageW, TranslateMessage, UnregisterClassW,
    WM_QUIT, WNDCLASSEXW, WS_EX_APPWINDOW, WS_EX_WINDOWEDGE, WS_OVERLAPPEDWINDOW,
};
use windows::core::{HRESULT, PCWSTR};

use crate::config::SinkConfig;
use crate::dispatch::Dispatcher;
use crate::error::{HookError, Result};
use crate::notification::Notification;

thread_local! {
    // Set on the pump thread before the sink exists; read by the window procedure.
    static DISPATCHER: OnceCell<Arc<Dispatcher>> = const { OnceCell::new() };
}

/// Sink window handle that may be carried off the pump thread.
///
/// Only used from other threads with SendMessageW, which the OS marshals onto the pump thread.
#[derive(Copy, Clone, Debug)]
pub struct SinkHandle(HWND);
unsafe impl Send for SinkHandle {}
unsafe impl Sync for SinkHandle {}

/// Register the sink class, create the hidden window and bind `dispatcher` to this thread.
pub fn create_sink(config: &SinkConfig, dispatcher: Arc<Dispatcher>) -> Result<SinkHandle> {
    let (class, title) = config.wide_names()?;
    let instance = module_instance();
    DISPATCHER.with(|cell| {
        if cell.set(dispatcher).is_err() {
            warn!("pump thread already carries a dispatcher");
        }
    });

    let hwnd = register_and_create(config, &class, &title, instance, |class, title| {
        create_window(class, title, config, instance)
    })?;
    // Never shown, but some shells expect the first paint pass before they treat the window as
    // initialised.
    unsafe {
        let _ = UpdateWindow(hwnd);
    }
    info!(?hwnd, "sink window created");
    Ok(SinkHandle(hwnd))
}

/// Register the class, then run `create`. A failed creation unregisters the class again so the
/// sink stays unset and the name can be reused.
fn register_and_create<F>(
    config: &SinkConfig,
    class: &U16CString,
    title: &U16CString,
    instance: HINSTANCE,
    create: F,
) -> Result<HWND>
where
    F: FnOnce(&U16CString, &U16CString) -> Result<HWND>,
{
    let atom = register_class(class, instance).map_err(|(code, message)| {
        HookError::Registration {
            class: config.class_name.clone(),
            code,
            message,
        }
    })?;
    info!(class = %config.class_name, atom, "sink class registered");
    create(class, title).inspect_err(|e| {
        error!(error = %e, class = %config.class_name, "sink creation failed");
        unregister_class(class, instance);
    })
}

fn create_window(
    class: &U16CString,
    title: &U16CString,
    config: &SinkConfig,
    instance: HINSTANCE,
) -> Result<HWND> {
    unsafe {
        CreateWindowExW(
            WS_EX_APPWINDOW | WS_EX_WINDOWEDGE,
            PCWSTR(class.as_ptr()),
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            config.width,
            config.height,
            None,
            None,
            Some(instance),
            None,
        )
    }
    .map_err(|e| HookError::Creation {
        code: win32_code(e.code()),
        message: e.message(),
    })
}

/// GetMessage/Translate/Dispatch loop. Ends on WM_QUIT (0) or a retrieval failure (-1).
pub fn run_pump() {
    let thread_id = current_thread_id();
    debug!(thread_id, "notification pump starting");
    let mut msg = MSG::default();
    loop {
        let r = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if r.0 <= 0 {
            debug!(thread_id, result = r.0, "notification pump exiting");
            return;
        }
        trace!(
            code = msg.message,
            time = msg.time,
            x = msg.pt.x,
            y = msg.pt.y,
            "pending notification"
        );
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Tear down the sink after the pump stopped. Must run on the pump thread.
pub fn destroy_sink(sink: SinkHandle, class_name: &str) {
    unsafe {
        let _ = DestroyWindow(sink.0);
    }
    if let Ok(class) = U16CString::from_str(class_name) {
        unregister_class(&class, module_instance());
    }
}

/// Post WM_QUIT to the pump thread's queue.
pub fn post_quit(thread_id: u32) -> Result<()> {
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.map_err(|e| {
        HookError::Quit {
            thread_id,
            code: win32_code(e.code()),
            message: e.message(),
        }
    })
}

/// Deliver `notification` to the sink and wait for the window procedure's result.
///
/// SendMessageW returns 0 both as a legitimate result and when the sink is gone; the thread's
/// last-error value tells them apart. Callers are off the pump thread, where the procedure runs,
/// so the hook cannot disturb the caller's last error.
pub fn send(sink: SinkHandle, notification: &Notification) -> Result<isize> {
    let r = unsafe {
        SetLastError(WIN32_ERROR(0));
        SendMessageW(
            sink.0,
            notification.code,
            Some(WPARAM(notification.wparam)),
            Some(LPARAM(notification.lparam)),
        )
    };
    let (code, message) = last_error();
    if code != 0 {
        return Err(HookError::Delivery {
            notification: notification.code,
            code,
            message,
        });
    }
    Ok(r.0)
}

pub fn current_thread_id() -> u32 {
    unsafe { GetCurrentThreadId() }
}

unsafe extern "system" fn sink_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let notification = Notification::new(msg, wparam.0, lparam.0);
    let default = |n: &Notification| unsafe {
        DefWindowProcW(hwnd, n.code, WPARAM(n.wparam), LPARAM(n.lparam)).0
    };
    // try_with: the window may still receive messages while thread-locals are torn down.
    let dispatcher = DISPATCHER
        .try_with(|cell| cell.get().cloned())
        .ok()
        .flatten();
    let result = match dispatcher {
        Some(d) => d.handle(&notification, &default),
        None => default(&notification),
    };
    LRESULT(result)
}

fn register_class(class: &U16CString, instance: HINSTANCE) -> std::result::Result<u16, (u32, String)> {
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        lpfnWndProc: Some(sink_wnd_proc),
        hInstance: instance,
        lpszClassName: PCWSTR(class.as_ptr()),
        ..Default::default()
    };
    let atom = unsafe { RegisterClassExW(&wc) };
    if atom == 0 {
        return Err(last_error());
    }
    Ok(atom)
}

fn unregister_class(class: &U16CString, instance: HINSTANCE) {
    if let Err(e) = unsafe { UnregisterClassW(PCWSTR(class.as_ptr()), Some(instance)) } {
        debug!(?e, "UnregisterClassW failed");
    }
}

fn module_instance() -> HINSTANCE {
    // A null module name yields the running executable, valid for the process lifetime.
    unsafe { GetModuleHandleW(PCWSTR::null()) }
        .map(|m| HINSTANCE(m.0))
        .unwrap_or_default()
}

fn last_error() -> (u32, String) {
    let code = unsafe { GetLastError() }.0;
    (code, HRESULT::from_win32(code).message())
}

/// Recover the Win32 error code from a FACILITY_WIN32 HRESULT; other values pass through.
fn win32_code(hr: HRESULT) -> u32 {
    let v = hr.0 as u32;
    if v & 0xFFFF_0000 == 0x8007_0000 {
        v & 0xFFFF
    } else {
        v
    }
}
