//! The session collaborator surface consumed by the dispatch core.

use std::sync::Arc;

use browser_host_core::{Result, SessionDescriptor, SessionId, UiComponent};

use crate::handlers::{RenderDelegate, WindowDelegate};

/// A live rendering session tracked by the registry.
///
/// Sessions are constructed and owned externally; the dispatch core only
/// tracks them by identifier and routes events concerning them. Every method
/// here may be called from any thread.
pub trait Session: Send + Sync {
    /// Stable identifier assigned at creation.
    fn id(&self) -> SessionId;

    /// Ask the session to begin its close protocol.
    ///
    /// `force` skips the unload confirmation the content would otherwise be
    /// allowed to run. Closure completes asynchronously: the engine delivers
    /// a before-close event once the session has actually shut down.
    fn request_close(&self, force: bool);

    /// Final notification that the session is about to be destroyed.
    ///
    /// Called by the dispatcher during before-close fan-out, after every
    /// lifecycle subscriber has observed the event.
    fn notify_before_close(&self);

    /// The session's own answer to the do-close query.
    fn confirm_close(&self) -> bool;

    /// Set the session's internal focus flag.
    fn set_focus_flag(&self, focused: bool);

    /// The UI component this session renders into, if currently attached.
    fn ui_component(&self) -> Option<UiComponent>;

    /// The per-session delegate for off-screen rendering events, if any.
    fn render_delegate(&self) -> Option<Arc<dyn RenderDelegate>>;

    /// The per-session delegate for windowed rendering events, if any.
    fn window_delegate(&self) -> Option<Arc<dyn WindowDelegate>>;
}

/// Constructs sessions on behalf of the host application.
///
/// The factory allocates native resources and wires the new session to the
/// engine; the dispatcher only reacts to the lifecycle events the engine
/// subsequently delivers (tracking begins at after-created, not here).
pub trait SessionFactory: Send + Sync {
    /// Create a session from a descriptor.
    fn create(&self, descriptor: &SessionDescriptor) -> Result<Arc<dyn Session>>;
}
