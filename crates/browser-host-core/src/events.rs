//! Event payload types carried through the dispatcher.
//!
//! These are pure data. The dispatcher never inspects them; it only routes
//! them to whichever delegate is registered for the event's category.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Kind of keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventKind {
    /// Key pressed, before translation
    RawKeyDown,
    /// Key pressed
    KeyDown,
    /// Key released
    KeyUp,
    /// Translated character input
    Char,
}

/// A keyboard event delivered by the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Event kind
    pub kind: KeyEventKind,
    /// Platform key code
    pub key_code: i32,
    /// Modifier key bitmask
    pub modifiers: u32,
    /// Translated character, for `Char` events
    pub character: Option<char>,
}

impl KeyEvent {
    /// Create a key-down event for a key code.
    pub fn key_down(key_code: i32) -> Self {
        Self {
            kind: KeyEventKind::KeyDown,
            key_code,
            modifiers: 0,
            character: None,
        }
    }
}

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleSeverity {
    /// Verbose/debug output
    Verbose,
    /// Informational output
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

/// Navigation transition type reported with load-start events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Explicit navigation (typed URL, bookmark)
    Explicit,
    /// Automatic subframe navigation
    AutoSubframe,
    /// User-initiated subframe navigation
    ManualSubframe,
    /// Form submission
    FormSubmit,
    /// History traversal
    BackForward,
    /// Reload
    Reload,
}

/// Parameters describing where a context menu was invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuParams {
    /// Invocation point in view coordinates
    pub coords: Point,
    /// Link under the cursor, if any
    pub link_url: Option<String>,
    /// Selected text, if any
    pub selection_text: Option<String>,
}

/// An entry in a context menu model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Command identifier reported back on selection
    pub command_id: i32,
    /// Display label
    pub label: String,
}

/// The menu model a context-menu delegate may rewrite before display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuModel {
    /// Menu entries, in display order
    pub items: Vec<MenuItem>,
}

/// Mode of a file chooser dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileDialogMode {
    /// Open a single file
    Open,
    /// Open multiple files
    OpenMultiple,
    /// Save a file
    Save,
}

/// A download tracked by the session engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    /// Download identifier
    pub id: u32,
    /// Source URL
    pub url: String,
    /// Suggested file name
    pub suggested_name: String,
    /// Total size in bytes, -1 if unknown
    pub total_bytes: i64,
    /// Bytes received so far
    pub received_bytes: i64,
    /// Whether the download completed
    pub is_complete: bool,
    /// Whether the download was canceled
    pub is_canceled: bool,
}

/// Data being dragged into or out of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragData {
    /// Plain-text fragment, if any
    pub text: Option<String>,
    /// URLs carried by the drag
    pub urls: Vec<String>,
}

/// Bitmask of drag operations permitted by the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragOperations(pub u32);

impl DragOperations {
    /// No operation permitted.
    pub const NONE: Self = Self(0);
    /// Copy operation.
    pub const COPY: Self = Self(1);
    /// Link operation.
    pub const LINK: Self = Self(1 << 1);
    /// Move operation.
    pub const MOVE: Self = Self(1 << 4);

    /// Whether this mask permits the given operation.
    pub fn allows(&self, op: Self) -> bool {
        self.0 & op.0 != 0
    }
}

/// Bitmask of requested media-access permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaPermissions(pub u32);

impl MediaPermissions {
    /// No permission requested.
    pub const NONE: Self = Self(0);
    /// Device audio capture.
    pub const AUDIO_CAPTURE: Self = Self(1);
    /// Device video capture.
    pub const VIDEO_CAPTURE: Self = Self(1 << 1);
    /// Desktop audio capture.
    pub const DESKTOP_AUDIO_CAPTURE: Self = Self(1 << 2);
    /// Desktop video capture.
    pub const DESKTOP_VIDEO_CAPTURE: Self = Self(1 << 3);

    /// Whether this mask includes the given permission.
    pub fn includes(&self, perm: Self) -> bool {
        self.0 & perm.0 == perm.0
    }
}

/// Kind of script-initiated dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptDialogKind {
    /// alert()
    Alert,
    /// confirm()
    Confirm,
    /// prompt()
    Prompt,
}

/// Origin of a focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusSource {
    /// Focus resulting from navigation
    Navigation,
    /// Focus requested by the system
    System,
}

/// How a render process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationStatus {
    /// Abnormal exit without a crash signature
    AbnormalTermination,
    /// Killed by the OS or the user
    ProcessKilled,
    /// Crashed
    ProcessCrashed,
    /// Out of memory
    OutOfMemory,
}

/// Print settings negotiated with a print delegate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Target device name
    pub device_name: String,
    /// Device DPI
    pub dpi: i32,
    /// Number of copies
    pub copies: i32,
    /// Whether to print in landscape orientation
    pub landscape: bool,
}

/// A low-level mouse event forwarded to a windowed session's delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Platform event code
    pub event: i32,
    /// Position in screen coordinates
    pub screen: Point,
    /// Modifier key bitmask
    pub modifiers: u32,
    /// Button involved, if any
    pub button: i32,
}

/// A network request observed by the request category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: String,
}

impl Request {
    /// Create a GET request for a URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
        }
    }
}
