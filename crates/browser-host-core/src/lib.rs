//! # browser-host-core
//!
//! Core types for the browser-host workspace.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other browser-host crates. It provides:
//!
//! - Geometry types (Point, Size, Rect, ScreenInfo)
//! - Session types (SessionId, SessionDescriptor, FrameId)
//! - Event payload types carried through the dispatcher
//! - UI component handles for focus containment and traversal
//! - Platform collaborator traits (UI-thread marshal, focus traversal,
//!   focus-change observation)
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other browser-host crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all modules
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod platform;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use config::HostConfig;
pub use error::{Error, Result};
pub use events::{
    ConsoleSeverity, ContextMenuParams, DownloadItem, DragData, DragOperations, FileDialogMode,
    FocusSource, KeyEvent, KeyEventKind, MediaPermissions, MenuItem, MenuModel, MouseEvent,
    PrintSettings, Request, ScriptDialogKind, TerminationStatus, Transition,
};
pub use geometry::{Point, Rect, ScreenInfo, Size};
pub use platform::{
    DirectMarshal, FocusChangeBus, FocusTraversal, ObserverId, UiFocusObserver, UiFocusSource,
    UiThreadMarshal,
};
pub use session::{FrameId, SessionDescriptor, SessionId};
pub use ui::UiComponent;
