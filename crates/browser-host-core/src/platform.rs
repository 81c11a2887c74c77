//! Platform collaborator traits for the dispatch core.
//!
//! The core never talks to a UI toolkit directly. Three collaborator
//! surfaces cover everything it needs from the platform:
//!
//! - [`UiThreadMarshal`]: run a callback on the UI-owning thread and block
//!   until it completes (the synchronous focus hand-off primitive).
//! - [`FocusTraversal`]: the toolkit's focus-traversal order, consumed when
//!   a session hands focus back to the surrounding application.
//! - [`UiFocusSource`] / [`UiFocusObserver`]: notification of global focus
//!   owner changes, consumed by the focus arbiter to drop a focused session
//!   whose UI attachment went away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::ui::UiComponent;

/// Runs callbacks on the UI-owning thread, blocking the caller.
pub trait UiThreadMarshal: Send + Sync {
    /// Execute `job` on the UI-owning thread and wait for its result.
    ///
    /// `context` identifies the UI component the call concerns; `fallback`
    /// is returned if the job cannot be delivered (for example, the UI
    /// thread is gone). There is no timeout: the caller blocks for as long
    /// as the UI thread takes to service the job.
    fn run_and_wait<'a>(
        &self,
        context: &UiComponent,
        fallback: bool,
        job: Box<dyn FnOnce() -> bool + Send + 'a>,
    ) -> bool;
}

/// A marshal that runs jobs inline on the calling thread.
///
/// Suitable for hosts without a dedicated UI thread and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectMarshal;

impl UiThreadMarshal for DirectMarshal {
    fn run_and_wait<'a>(
        &self,
        _context: &UiComponent,
        _fallback: bool,
        job: Box<dyn FnOnce() -> bool + Send + 'a>,
    ) -> bool {
        job()
    }
}

/// The platform toolkit's focus-traversal order.
pub trait FocusTraversal: Send + Sync {
    /// The component after `current` within `container`'s cycle.
    fn component_after(&self, container: &UiComponent, current: &UiComponent)
        -> Option<UiComponent>;

    /// The component before `current` within `container`'s cycle.
    fn component_before(
        &self,
        container: &UiComponent,
        current: &UiComponent,
    ) -> Option<UiComponent>;

    /// The default focus target within `container`'s cycle.
    fn default_component(&self, container: &UiComponent) -> Option<UiComponent>;

    /// Ask the toolkit to move focus to `component`.
    fn request_focus(&self, component: &UiComponent);
}

/// Observer of global focus owner changes.
pub trait UiFocusObserver: Send + Sync {
    /// The platform's focused component changed.
    ///
    /// `lost` is the component that held focus before the change, `gained`
    /// the one that holds it now; either may be absent.
    fn focus_owner_changed(&self, lost: Option<&UiComponent>, gained: Option<&UiComponent>);
}

/// Handle identifying one subscription on a [`UiFocusSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A source of global focus-change notifications.
pub trait UiFocusSource: Send + Sync {
    /// Register an observer. Notifications arrive until unsubscribed.
    fn subscribe(&self, observer: Arc<dyn UiFocusObserver>) -> ObserverId;

    /// Remove a previously registered observer. Unknown ids are ignored.
    fn unsubscribe(&self, id: ObserverId);
}

/// In-process focus-change notification bus.
///
/// One bus instance stands in for the platform's global focus manager; each
/// dispatch host subscribes on construction and unsubscribes when its
/// disposal completes.
pub struct FocusChangeBus {
    observers: Mutex<Vec<(ObserverId, Arc<dyn UiFocusObserver>)>>,
    next_id: AtomicU64,
}

impl FocusChangeBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Announce a focus owner change to every subscribed observer, in
    /// subscription order.
    pub fn announce(&self, lost: Option<&UiComponent>, gained: Option<&UiComponent>) {
        let observers: Vec<Arc<dyn UiFocusObserver>> = {
            let guard = self.observers.lock().unwrap();
            guard.iter().map(|(_, obs)| Arc::clone(obs)).collect()
        };
        for observer in observers {
            observer.focus_owner_changed(lost, gained);
        }
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }
}

impl Default for FocusChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl UiFocusSource for FocusChangeBus {
    fn subscribe(&self, observer: Arc<dyn UiFocusObserver>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers.lock().unwrap().push((id, observer));
        id
    }

    fn unsubscribe(&self, id: ObserverId) {
        self.observers.lock().unwrap().retain(|(oid, _)| *oid != id);
    }
}
