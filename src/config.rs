//! Sink window configuration.

use widestring::U16CString;

use crate::error::{HookError, Result};

/// Class name and title used when the caller does not pick one.
pub const DEFAULT_CLASS_NAME: &str = "ShutDownHook";
pub const DEFAULT_WIDTH: i32 = 800;
pub const DEFAULT_HEIGHT: i32 = 600;

/// Identity and nominal geometry of the hidden sink window.
///
/// The window is never shown, so size only matters to the host's bookkeeping. The class name
/// must be unique within the process; a second registration under the same name fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub class_name: String,
    pub window_title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            window_title: DEFAULT_CLASS_NAME.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl SinkConfig {
    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Encode class name and title for the wide-string Win32 entry points.
    pub(crate) fn wide_names(&self) -> Result<(U16CString, U16CString)> {
        Ok((wide(&self.class_name)?, wide(&self.window_title)?))
    }
}

fn wide(s: &str) -> Result<U16CString> {
    U16CString::from_str(s).map_err(|_| HookError::InvalidName {
        name: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_class_and_title_alike() {
        let cfg = SinkConfig::default();
        assert_eq!(cfg.class_name, "ShutDownHook");
        assert_eq!(cfg.window_title, "ShutDownHook");
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = SinkConfig::default()
            .with_class_name("MyAppSessionSink")
            .with_title("sink")
            .with_size(1, 1);
        assert_eq!(cfg.class_name, "MyAppSessionSink");
        assert_eq!(cfg.window_title, "sink");
        assert_eq!((cfg.width, cfg.height), (1, 1));
    }

    #[test]
    fn wide_names_are_nul_terminated() {
        let (class, title) = SinkConfig::default().with_title("t").wide_names().unwrap();
        assert_eq!(class.as_slice_with_nul().last(), Some(&0));
        assert_eq!(class.len(), "ShutDownHook".len());
        assert_eq!(title.to_string_lossy(), "t");
    }

    #[test]
    fn interior_nul_is_rejected() {
        let err = SinkConfig::default()
            .with_class_name("bad\0name")
            .wide_names()
            .unwrap_err();
        assert!(matches!(err, HookError::InvalidName { name } if name == "bad\0name"));
    }
}
