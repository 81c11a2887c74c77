//! The focus arbiter: at most one session holds input focus.

use std::sync::{Arc, RwLock};

use tracing::debug;

use browser_host_core::{FocusSource, FocusTraversal, UiComponent, UiThreadMarshal};

use crate::handlers::FocusHandler;
use crate::session::Session;

/// Enforces the single-focused-session invariant.
///
/// The arbiter owns the process-wide focused-session reference. It reacts
/// to three inputs: got-focus events from the engine, take-focus requests
/// handing focus back to the surrounding application, and focus-owner
/// changes announced by the platform (which may invalidate the focused
/// session's UI attachment at any time).
pub struct FocusArbiter {
    focused: RwLock<Option<Arc<dyn Session>>>,
    marshal: Arc<dyn UiThreadMarshal>,
    traversal: Option<Arc<dyn FocusTraversal>>,
}

impl FocusArbiter {
    /// Create an arbiter with no focused session.
    pub fn new(
        marshal: Arc<dyn UiThreadMarshal>,
        traversal: Option<Arc<dyn FocusTraversal>>,
    ) -> Self {
        Self {
            focused: RwLock::new(None),
            marshal,
            traversal,
        }
    }

    /// The currently focused session, if any.
    pub fn focused(&self) -> Option<Arc<dyn Session>> {
        self.focused.read().unwrap().clone()
    }

    /// Drop the focused reference without touching the session.
    ///
    /// Used during host disposal; normal unfocus paths also clear the
    /// session's focus flag.
    pub fn clear(&self) {
        *self.focused.write().unwrap() = None;
    }

    /// React to a platform focus-owner change.
    ///
    /// If the component that lost platform focus lies within the focused
    /// session's UI region, that session no longer holds focus: its flag is
    /// cleared and the focused reference dropped.
    pub fn handle_focus_owner_change(&self, lost: Option<&UiComponent>) {
        let focused = self.focused();
        let Some(session) = focused else { return };
        let Some(region) = session.ui_component() else {
            return;
        };
        let Some(lost) = lost else { return };

        if Self::is_part_of(lost, &region) {
            debug!("focus owner left session UI region: id={}", session.id());
            session.set_focus_flag(false);
            self.clear();
        }
    }

    /// Containment test between a component and a session's UI region.
    ///
    /// Descends through the *first* child at each level only, matching the
    /// behavior embedders have historically relied on. A full-subtree
    /// search would accept components this walk rejects; widening it is a
    /// behavior change and is deliberately not done here.
    fn is_part_of(candidate: &UiComponent, region: &UiComponent) -> bool {
        let mut current = candidate.clone();
        loop {
            if current.same(region) {
                return true;
            }
            match current.first_child() {
                Some(child) => current = child,
                None => return false,
            }
        }
    }

    /// Hand focus from a session to the surrounding application.
    ///
    /// Clears the session's focus flag, asks the traversal provider for the
    /// next (or previous) component outside the session and focuses it,
    /// drops the focused reference, then notifies the focus handler.
    pub fn take_focus(
        &self,
        session: &Arc<dyn Session>,
        next: bool,
        handler: Option<Arc<dyn FocusHandler>>,
    ) {
        session.set_focus_flag(false);

        if let (Some(traversal), Some(ui)) = (&self.traversal, session.ui_component()) {
            if let Some(container) = Self::nearest_traversal_root(&ui) {
                let target = if next {
                    traversal.component_after(&container, &ui)
                } else {
                    traversal.component_before(&container, &ui)
                };
                match target {
                    Some(component) => traversal.request_focus(&component),
                    None => {
                        if let Some(fallback) = traversal.default_component(&container) {
                            traversal.request_focus(&fallback);
                        }
                    }
                }
            }
        }

        self.clear();
        if let Some(handler) = handler {
            handler.on_take_focus(session, next);
        }
    }

    fn nearest_traversal_root(ui: &UiComponent) -> Option<UiComponent> {
        let mut current = ui.parent();
        while let Some(component) = current {
            if component.is_traversal_root() {
                return Some(component);
            }
            current = component.parent();
        }
        None
    }

    /// A session requests focus.
    ///
    /// With a focus handler registered, the request is marshaled onto the
    /// UI-owning thread and the caller blocks until the handler answers.
    /// Returns true if the handler already fully handled the request, in
    /// which case the caller must not additionally assert focus. With no
    /// handler, returns false so the caller proceeds directly. A session
    /// with no UI attachment swallows the request (returns true).
    pub fn set_focus(
        &self,
        session: &Arc<dyn Session>,
        source: FocusSource,
        handler: Option<Arc<dyn FocusHandler>>,
    ) -> bool {
        let Some(handler) = handler else { return false };
        let Some(ui) = session.ui_component() else {
            return true;
        };

        let session = Arc::clone(session);
        self.marshal.run_and_wait(
            &ui,
            true, // undeliverable request counts as handled: do not assert focus
            Box::new(move || handler.on_set_focus(&session, source)),
        )
    }

    /// The engine reports that a session received focus.
    ///
    /// A repeat notification for the already-focused session is ignored:
    /// off-screen rendering feeds focus back through the engine and would
    /// otherwise loop. Otherwise the session becomes the focused one, its
    /// flag is set, and the focus handler is notified on the UI-owning
    /// thread, blocking the caller until delivery completes.
    pub fn got_focus(&self, session: &Arc<dyn Session>, handler: Option<Arc<dyn FocusHandler>>) {
        {
            let focused = self.focused.read().unwrap();
            if let Some(current) = focused.as_ref() {
                if Arc::ptr_eq(current, session) {
                    return;
                }
            }
        }

        debug!("session got focus: id={}", session.id());
        *self.focused.write().unwrap() = Some(Arc::clone(session));
        session.set_focus_flag(true);

        if let Some(handler) = handler {
            let Some(ui) = session.ui_component() else {
                return;
            };
            let session = Arc::clone(session);
            self.marshal.run_and_wait(
                &ui,
                true,
                Box::new(move || {
                    handler.on_got_focus(&session);
                    true
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockSession, RecordingFocusHandler};
    use browser_host_core::{DirectMarshal, SessionId};

    fn arbiter() -> FocusArbiter {
        FocusArbiter::new(Arc::new(DirectMarshal), None)
    }

    #[test]
    fn test_starts_unfocused() {
        assert!(arbiter().focused().is_none());
    }

    #[test]
    fn test_got_focus_sets_focused_and_flag() {
        let arbiter = arbiter();
        let mock = MockSession::with_ui(SessionId::new(1));
        let session: Arc<dyn Session> = mock.clone();

        arbiter.got_focus(&session, None);

        assert_eq!(arbiter.focused().unwrap().id(), SessionId::new(1));
        assert!(mock.focus_flag());
    }

    #[test]
    fn test_got_focus_same_session_is_noop() {
        let arbiter = arbiter();
        let mock = MockSession::with_ui(SessionId::new(1));
        let session: Arc<dyn Session> = mock.clone();
        let handler = RecordingFocusHandler::new();

        arbiter.got_focus(&session, Some(handler.clone()));
        arbiter.got_focus(&session, Some(handler.clone()));

        // the repeat notification never reaches the handler
        assert_eq!(handler.got_focus_count(), 1);
    }

    #[test]
    fn test_got_focus_replaces_previous() {
        let arbiter = arbiter();
        let first: Arc<dyn Session> = MockSession::with_ui(SessionId::new(1));
        let second: Arc<dyn Session> = MockSession::with_ui(SessionId::new(2));

        arbiter.got_focus(&first, None);
        arbiter.got_focus(&second, None);

        assert_eq!(arbiter.focused().unwrap().id(), SessionId::new(2));
    }

    #[test]
    fn test_got_focus_handoff_leaves_previous_flag_set() {
        let arbiter = arbiter();
        let first = MockSession::with_ui(SessionId::new(1));
        let second = MockSession::with_ui(SessionId::new(2));

        arbiter.got_focus(&(first.clone() as Arc<dyn Session>), None);
        arbiter.got_focus(&(second.clone() as Arc<dyn Session>), None);

        // the focused reference is the authoritative single-focus state; the
        // displaced session's own flag stays set until the platform reports
        // its component losing focus (or it hands focus away itself)
        assert_eq!(arbiter.focused().unwrap().id(), SessionId::new(2));
        assert!(first.focus_flag());
        assert!(second.focus_flag());

        // the platform reporting against the *displaced* session's region is
        // ignored: only the focused session's region is consulted
        let stale_region = first.ui_component().unwrap();
        arbiter.handle_focus_owner_change(Some(&stale_region));
        assert!(arbiter.focused().is_some());
        assert!(first.focus_flag());
    }

    #[test]
    fn test_set_focus_without_handler_proceeds() {
        let arbiter = arbiter();
        let session: Arc<dyn Session> = MockSession::with_ui(SessionId::new(1));
        assert!(!arbiter.set_focus(&session, FocusSource::System, None));
    }

    #[test]
    fn test_set_focus_with_handler_marshals_and_returns_answer() {
        let arbiter = arbiter();
        let session: Arc<dyn Session> = MockSession::with_ui(SessionId::new(1));

        let declining = RecordingFocusHandler::new();
        assert!(!arbiter.set_focus(&session, FocusSource::Navigation, Some(declining.clone())));
        assert_eq!(declining.set_focus_count(), 1);

        let consuming = RecordingFocusHandler::handling_set_focus();
        assert!(arbiter.set_focus(&session, FocusSource::Navigation, Some(consuming)));
    }

    #[test]
    fn test_set_focus_detached_session_swallows() {
        let arbiter = arbiter();
        let session: Arc<dyn Session> = MockSession::new(SessionId::new(1));
        let handler = RecordingFocusHandler::new();

        // no UI attachment: handled without consulting the handler
        assert!(arbiter.set_focus(&session, FocusSource::System, Some(handler.clone())));
        assert_eq!(handler.set_focus_count(), 0);
    }

    #[test]
    fn test_take_focus_clears_focus_and_notifies() {
        let arbiter = arbiter();
        let mock = MockSession::with_ui(SessionId::new(1));
        let session: Arc<dyn Session> = mock.clone();
        let handler = RecordingFocusHandler::new();

        arbiter.got_focus(&session, None);
        arbiter.take_focus(&session, true, Some(handler.clone()));

        assert!(arbiter.focused().is_none());
        assert!(!mock.focus_flag());
        assert_eq!(handler.take_focus_count(), 1);
    }

    #[test]
    fn test_focus_owner_change_unfocuses_contained_component() {
        let arbiter = arbiter();
        let mock = MockSession::with_ui(SessionId::new(1));
        let session: Arc<dyn Session> = mock.clone();
        arbiter.got_focus(&session, None);

        // the session's own UI component lost platform focus
        let region = mock.ui_component().unwrap();
        arbiter.handle_focus_owner_change(Some(&region));

        assert!(arbiter.focused().is_none());
        assert!(!mock.focus_flag());
    }

    #[test]
    fn test_focus_owner_change_ignores_unrelated_component() {
        let arbiter = arbiter();
        let session: Arc<dyn Session> = MockSession::with_ui(SessionId::new(1));
        arbiter.got_focus(&session, None);

        let unrelated = UiComponent::new();
        arbiter.handle_focus_owner_change(Some(&unrelated));

        assert!(arbiter.focused().is_some());
    }

    #[test]
    fn test_focus_owner_change_follows_first_child_chain_only() {
        let arbiter = arbiter();
        let mock = MockSession::with_ui(SessionId::new(1));
        let session: Arc<dyn Session> = mock.clone();
        arbiter.got_focus(&session, None);

        let region = mock.ui_component().unwrap();

        // ancestor whose first-child chain reaches the region: unfocuses
        let ancestor = UiComponent::new();
        ancestor.add_child(&region);
        arbiter.handle_focus_owner_change(Some(&ancestor));
        assert!(arbiter.focused().is_none());

        // refocus, then an ancestor holding the region as a *second* child:
        // the walk misses it and focus is kept
        arbiter.got_focus(&session, None);
        let sibling_first = UiComponent::new();
        let other_ancestor = UiComponent::new();
        other_ancestor.add_child(&sibling_first);
        other_ancestor.add_child(&mock.ui_component().unwrap());
        arbiter.handle_focus_owner_change(Some(&other_ancestor));
        assert!(arbiter.focused().is_some());
    }

    #[test]
    fn test_focus_owner_change_with_no_lost_component() {
        let arbiter = arbiter();
        let session: Arc<dyn Session> = MockSession::with_ui(SessionId::new(1));
        arbiter.got_focus(&session, None);

        arbiter.handle_focus_owner_change(None);
        assert!(arbiter.focused().is_some());
    }
}
