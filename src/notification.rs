//! Notification records delivered to the sink and their classification.
//!
//! The numeric codes match the Win32 message identifiers so that the policy code can be
//! exercised without a live window station.

/// "May the session end?" query, sent before logoff/shutdown.
pub const WM_QUERYENDSESSION: u32 = 0x0011;
/// "The session is ending" confirmation.
pub const WM_ENDSESSION: u32 = 0x0016;
/// Value returned for qualifying notifications: the application agrees to proceed.
pub const PROCEED: isize = 1;

// lParam flags carried by both qualifying notifications.
pub const ENDSESSION_CLOSEAPP: isize = 0x0000_0001;
pub const ENDSESSION_CRITICAL: isize = 0x4000_0000;
pub const ENDSESSION_LOGOFF: isize = 0x8000_0000_u32 as i32 as isize;

/// One message addressed to the sink: code plus the two opaque parameter words.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub code: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl Notification {
    pub fn new(code: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            code,
            wparam,
            lparam,
        }
    }

    /// A session-end query with no reason flags (plain shutdown).
    pub fn query_end_session() -> Self {
        Self::new(WM_QUERYENDSESSION, 0, 0)
    }

    /// A confirmed session end (`wParam` TRUE) with no reason flags.
    pub fn end_session() -> Self {
        Self::new(WM_ENDSESSION, 1, 0)
    }

    pub fn kind(&self) -> NotificationKind {
        NotificationKind::from_code(self.code)
    }

    /// Reason flags decoded from `lParam`; meaningful only for qualifying notifications.
    pub fn reason(&self) -> EndSessionReason {
        EndSessionReason::from_lparam(self.lparam)
    }
}

/// Classification used by the dispatcher. Only two codes are special-cased.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    QueryEndSession,
    EndSession,
    Other,
}

impl NotificationKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            WM_QUERYENDSESSION => Self::QueryEndSession,
            WM_ENDSESSION => Self::EndSession,
            _ => Self::Other,
        }
    }

    pub fn is_qualifying(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Why the session is ending, as reported in the `lParam` bit flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EndSessionReason {
    pub close_app: bool,
    pub critical: bool,
    pub logoff: bool,
}

impl EndSessionReason {
    pub fn from_lparam(lparam: isize) -> Self {
        Self {
            close_app: lparam & ENDSESSION_CLOSEAPP != 0,
            critical: lparam & ENDSESSION_CRITICAL != 0,
            logoff: lparam & ENDSESSION_LOGOFF != 0,
        }
    }

    /// No flag set means a system shutdown or restart.
    pub fn is_shutdown(&self) -> bool {
        !(self.close_app || self.critical || self.logoff)
    }
}
