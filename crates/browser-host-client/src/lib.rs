//! # browser-host-client
//!
//! Session registry and event dispatch for the browser-host workspace.
//!
//! This crate provides:
//! - The [`Session`] collaborator surface and [`SessionFactory`]
//! - Per-category handler capability traits
//! - Single-owner handler slots and the lifecycle subscriber list
//! - The concurrency-safe [`SessionRegistry`]
//! - The [`FocusArbiter`] enforcing the single-focused-session invariant
//! - [`SessionHost`], the dispatch facade tying it all together, including
//!   the multi-phase disposal sequence
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends only on
//! browser-host-core. The host application sits above it, registering
//! handlers and creating sessions; the session engine sits below it,
//! delivering events from its own threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod focus;
pub mod handlers;
pub mod host;
pub mod registry;
pub mod session;
pub mod slots;
pub mod testing;

// Re-export commonly used types
pub use focus::FocusArbiter;
pub use handlers::{
    ContextMenuHandler, DialogHandler, DisplayHandler, DownloadHandler, DragHandler, FocusHandler,
    KeyboardHandler, LifecycleHandler, LoadHandler, MediaAccessHandler, PrintHandler,
    RenderDelegate, RequestHandler, ScriptDialogHandler, WindowDelegate,
};
pub use host::{DisposalObserver, SessionHost};
pub use registry::SessionRegistry;
pub use session::{Session, SessionFactory};
pub use slots::{HandlerSlot, SubscriberList};
