//! The dispatch facade: handler registration, session tracking, event
//! routing, and the multi-phase disposal sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info, warn};

use browser_host_core::{
    ConsoleSeverity, ContextMenuParams, DownloadItem, DragData, DragOperations, Error,
    FileDialogMode, FocusSource, FocusTraversal, FrameId, HostConfig, KeyEvent, MediaPermissions,
    MenuModel, MouseEvent, ObserverId, Point, PrintSettings, Rect, Request, Result, ScreenInfo,
    ScriptDialogKind, SessionDescriptor, SessionId, Size, TerminationStatus, Transition,
    UiComponent, UiFocusObserver, UiFocusSource, UiThreadMarshal,
};

use crate::focus::FocusArbiter;
use crate::handlers::{
    ContextMenuHandler, DialogHandler, DisplayHandler, DownloadHandler, DragHandler, FocusHandler,
    KeyboardHandler, LifecycleHandler, LoadHandler, MediaAccessHandler, PrintHandler,
    RenderDelegate, RequestHandler, ScriptDialogHandler, WindowDelegate,
};
use crate::registry::SessionRegistry;
use crate::session::{Session, SessionFactory};
use crate::slots::{HandlerSlot, SubscriberList};

/// Notified exactly once when the host finishes its disposal sequence.
pub trait DisposalObserver: Send + Sync {
    /// The host released its last session and cleared every registration.
    fn on_host_disposed(&self);
}

/// The single point of contact between a session engine and the host
/// application.
///
/// The engine delivers events here from its own threads; the host
/// application registers handlers and creates sessions. All dispatch
/// methods take the affected session as an `Option`: events can outlive
/// the session they concern, and an absent session resolves to the
/// category's neutral default answer rather than a panic.
///
/// Disposal is a multi-phase convergence, not a single call: [`dispose`]
/// latches the disposed flag and force-closes every tracked session, each
/// close eventually arrives back as a before-close event, and the final
/// release (clearing registrations and notifying the
/// [`DisposalObserver`]) runs exactly once, when the registry drains while
/// the flag is set.
///
/// [`dispose`]: SessionHost::dispose
pub struct SessionHost {
    config: HostConfig,
    registry: SessionRegistry,
    disposed: AtomicBool,
    teardown_complete: AtomicBool,

    focus: FocusArbiter,
    focus_source: Arc<dyn UiFocusSource>,
    focus_subscription: Mutex<Option<ObserverId>>,

    context_menu: HandlerSlot<dyn ContextMenuHandler>,
    dialog: HandlerSlot<dyn DialogHandler>,
    display: HandlerSlot<dyn DisplayHandler>,
    download: HandlerSlot<dyn DownloadHandler>,
    drag: HandlerSlot<dyn DragHandler>,
    focus_handler: HandlerSlot<dyn FocusHandler>,
    keyboard: HandlerSlot<dyn KeyboardHandler>,
    load: HandlerSlot<dyn LoadHandler>,
    media_access: HandlerSlot<dyn MediaAccessHandler>,
    print: HandlerSlot<dyn PrintHandler>,
    request: HandlerSlot<dyn RequestHandler>,
    script_dialog: HandlerSlot<dyn ScriptDialogHandler>,
    lifecycle: SubscriberList<dyn LifecycleHandler>,

    disposal_observer: HandlerSlot<dyn DisposalObserver>,
}

/// Adapter feeding platform focus-owner changes into the arbiter.
struct HostFocusObserver {
    host: Weak<SessionHost>,
}

impl UiFocusObserver for HostFocusObserver {
    fn focus_owner_changed(&self, lost: Option<&UiComponent>, _gained: Option<&UiComponent>) {
        if let Some(host) = self.host.upgrade() {
            host.focus.handle_focus_owner_change(lost);
        }
    }
}

impl SessionHost {
    /// Create a host and subscribe it to the platform focus source.
    ///
    /// The subscription is held until the disposal sequence completes.
    pub fn new(
        config: HostConfig,
        marshal: Arc<dyn UiThreadMarshal>,
        traversal: Option<Arc<dyn FocusTraversal>>,
        focus_source: Arc<dyn UiFocusSource>,
    ) -> Arc<Self> {
        let host = Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            disposed: AtomicBool::new(false),
            teardown_complete: AtomicBool::new(false),
            focus: FocusArbiter::new(marshal, traversal),
            focus_source,
            focus_subscription: Mutex::new(None),
            context_menu: HandlerSlot::new(),
            dialog: HandlerSlot::new(),
            display: HandlerSlot::new(),
            download: HandlerSlot::new(),
            drag: HandlerSlot::new(),
            focus_handler: HandlerSlot::new(),
            keyboard: HandlerSlot::new(),
            load: HandlerSlot::new(),
            media_access: HandlerSlot::new(),
            print: HandlerSlot::new(),
            request: HandlerSlot::new(),
            script_dialog: HandlerSlot::new(),
            lifecycle: SubscriberList::new(),
            disposal_observer: HandlerSlot::new(),
        });

        let observer: Arc<dyn UiFocusObserver> = Arc::new(HostFocusObserver {
            host: Arc::downgrade(&host),
        });
        let subscription = host.focus_source.subscribe(observer);
        *host.focus_subscription.lock().unwrap() = Some(subscription);
        info!("session host created");
        host
    }

    // ------------------------------------------------------------------
    // Handler registration
    // ------------------------------------------------------------------

    /// Register the context menu handler. First writer wins.
    pub fn add_context_menu_handler(&self, handler: Arc<dyn ContextMenuHandler>) -> bool {
        self.context_menu.register(handler)
    }

    /// Remove the context menu handler.
    pub fn remove_context_menu_handler(&self) {
        self.context_menu.clear();
    }

    /// Register the file dialog handler. First writer wins.
    pub fn add_dialog_handler(&self, handler: Arc<dyn DialogHandler>) -> bool {
        self.dialog.register(handler)
    }

    /// Remove the file dialog handler.
    pub fn remove_dialog_handler(&self) {
        self.dialog.clear();
    }

    /// Register the display handler. First writer wins.
    pub fn add_display_handler(&self, handler: Arc<dyn DisplayHandler>) -> bool {
        self.display.register(handler)
    }

    /// Remove the display handler.
    pub fn remove_display_handler(&self) {
        self.display.clear();
    }

    /// Register the download handler. First writer wins.
    pub fn add_download_handler(&self, handler: Arc<dyn DownloadHandler>) -> bool {
        self.download.register(handler)
    }

    /// Remove the download handler.
    pub fn remove_download_handler(&self) {
        self.download.clear();
    }

    /// Register the drag handler. First writer wins.
    pub fn add_drag_handler(&self, handler: Arc<dyn DragHandler>) -> bool {
        self.drag.register(handler)
    }

    /// Remove the drag handler.
    pub fn remove_drag_handler(&self) {
        self.drag.clear();
    }

    /// Register the focus handler. First writer wins.
    pub fn add_focus_handler(&self, handler: Arc<dyn FocusHandler>) -> bool {
        self.focus_handler.register(handler)
    }

    /// Remove the focus handler.
    pub fn remove_focus_handler(&self) {
        self.focus_handler.clear();
    }

    /// Register the keyboard handler. First writer wins.
    pub fn add_keyboard_handler(&self, handler: Arc<dyn KeyboardHandler>) -> bool {
        self.keyboard.register(handler)
    }

    /// Remove the keyboard handler.
    pub fn remove_keyboard_handler(&self) {
        self.keyboard.clear();
    }

    /// Register the load handler. First writer wins.
    pub fn add_load_handler(&self, handler: Arc<dyn LoadHandler>) -> bool {
        self.load.register(handler)
    }

    /// Remove the load handler.
    pub fn remove_load_handler(&self) {
        self.load.clear();
    }

    /// Register the media access handler. First writer wins.
    pub fn add_media_access_handler(&self, handler: Arc<dyn MediaAccessHandler>) -> bool {
        self.media_access.register(handler)
    }

    /// Remove the media access handler.
    pub fn remove_media_access_handler(&self) {
        self.media_access.clear();
    }

    /// Register the print handler. First writer wins.
    pub fn add_print_handler(&self, handler: Arc<dyn PrintHandler>) -> bool {
        self.print.register(handler)
    }

    /// Remove the print handler.
    pub fn remove_print_handler(&self) {
        self.print.clear();
    }

    /// Register the request handler. First writer wins.
    pub fn add_request_handler(&self, handler: Arc<dyn RequestHandler>) -> bool {
        self.request.register(handler)
    }

    /// Remove the request handler.
    pub fn remove_request_handler(&self) {
        self.request.clear();
    }

    /// Register the script dialog handler. First writer wins.
    pub fn add_script_dialog_handler(&self, handler: Arc<dyn ScriptDialogHandler>) -> bool {
        self.script_dialog.register(handler)
    }

    /// Remove the script dialog handler.
    pub fn remove_script_dialog_handler(&self) {
        self.script_dialog.clear();
    }

    /// Append a lifecycle subscriber. Any number may register; events fan
    /// out in registration order.
    pub fn add_lifecycle_handler(&self, handler: Arc<dyn LifecycleHandler>) {
        self.lifecycle.add(handler);
    }

    /// Remove every lifecycle subscriber.
    pub fn clear_lifecycle_handlers(&self) {
        self.lifecycle.clear();
    }

    /// Register the disposal observer. First writer wins.
    pub fn set_disposal_observer(&self, observer: Arc<dyn DisposalObserver>) -> bool {
        self.disposal_observer.register(observer)
    }

    // ------------------------------------------------------------------
    // Session creation and lookup
    // ------------------------------------------------------------------

    /// Create a session through the given factory.
    ///
    /// Fails once the host is disposed, or when the configured session cap
    /// is reached. The new session is not tracked yet; tracking begins when
    /// the engine delivers its after-created event.
    pub fn create_session(
        &self,
        factory: &dyn SessionFactory,
        descriptor: &SessionDescriptor,
    ) -> Result<Arc<dyn Session>> {
        if self.is_disposed() {
            return Err(Error::HostDisposed);
        }
        if self.config.max_sessions > 0 && self.registry.len() >= self.config.max_sessions {
            return Err(Error::SessionLimitReached(self.config.max_sessions));
        }
        factory.create(descriptor)
    }

    /// Look up a tracked session by identifier.
    pub fn session(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.registry.get(id)
    }

    /// Point-in-time copy of every tracked session.
    pub fn sessions(&self) -> Vec<Arc<dyn Session>> {
        self.registry.all()
    }

    /// Number of tracked sessions.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether the disposed flag is latched.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// The session currently holding input focus, if any.
    pub fn focused_session(&self) -> Option<Arc<dyn Session>> {
        self.focus.focused()
    }

    // ------------------------------------------------------------------
    // Lifecycle dispatch and disposal
    // ------------------------------------------------------------------

    /// A popup is about to open. Returns true to veto it.
    ///
    /// A disposed host vetoes every popup without consulting subscribers.
    /// Otherwise subscriber answers are OR-ed: any one veto cancels the
    /// popup, and every subscriber is still consulted.
    pub fn on_before_popup(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        target_url: &str,
        target_frame_name: &str,
    ) -> bool {
        if self.is_disposed() {
            return true;
        }
        let Some(session) = session else { return false };
        let mut vetoed = false;
        for handler in self.lifecycle.snapshot() {
            vetoed |= handler.on_before_popup(session, frame, target_url, target_frame_name);
        }
        vetoed
    }

    /// A session finished creation.
    ///
    /// The session is tracked *before* subscribers hear about it, so a
    /// subscriber reacting to the event already observes it in the
    /// registry. On a disposed host the session is never tracked; it is
    /// force-closed after the fan-out instead.
    pub fn on_after_created(&self, session: Option<&Arc<dyn Session>>) {
        let Some(session) = session else { return };
        let id = session.id();
        if self.config.trace_lifecycle {
            debug!("after-created: id={}", id);
        }

        let disposed = self.is_disposed();
        if disposed {
            warn!("session {} finished creation on a disposed host", id);
        } else {
            self.registry.track(id, Arc::clone(session));
            info!("session tracked: id={}", id);
        }

        for handler in self.lifecycle.snapshot() {
            handler.on_after_created(session);
        }

        if disposed {
            // never tracked, so disposal convergence will not reap it
            session.request_close(true);
        }
    }

    /// A session was reparented to a different UI container.
    pub fn on_after_reparented(&self, session: Option<&Arc<dyn Session>>) {
        let Some(session) = session else { return };
        for handler in self.lifecycle.snapshot() {
            handler.on_after_reparented(session);
        }
    }

    /// The session asks whether closure should be deferred.
    ///
    /// Subscribers observe the query; the session's own answer is returned.
    pub fn do_close(&self, session: Option<&Arc<dyn Session>>) -> bool {
        let Some(session) = session else { return false };
        for handler in self.lifecycle.snapshot() {
            handler.do_close(session);
        }
        session.confirm_close()
    }

    /// A session is about to be destroyed.
    ///
    /// Ordering here is load-bearing: subscribers are notified first (the
    /// session is still tracked and fully usable), then the session
    /// receives its final notification, then the identifier leaves the
    /// registry. If this was the last session of a disposed host, the final
    /// release runs before this method returns.
    pub fn on_before_close(&self, session: Option<&Arc<dyn Session>>) {
        let Some(session) = session else { return };
        let id = session.id();
        if self.config.trace_lifecycle {
            debug!("before-close: id={}", id);
        }

        for handler in self.lifecycle.snapshot() {
            handler.on_before_close(session);
        }
        session.notify_before_close();
        info!("session closed: id={}", id);
        self.cleanup_session(Some(id));
    }

    /// Begin host disposal.
    ///
    /// Latches the disposed flag, then force-closes every tracked session.
    /// Each close arrives back as a before-close event; the final release
    /// happens when the last one drains the registry. Calling this again
    /// re-drains whatever is still open and is otherwise harmless.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            debug!("dispose re-requested; re-draining open sessions");
        } else {
            info!(
                "host disposal requested with {} open session(s)",
                self.registry.len()
            );
        }
        self.cleanup_session(None);
    }

    /// Converge toward teardown.
    ///
    /// `Some(id)` untracks one closed session; `None` force-closes every
    /// tracked session (and defers teardown to the closes that follow).
    /// Teardown itself runs at most once, and only when the host is
    /// disposed and the registry is empty.
    fn cleanup_session(&self, id: Option<SessionId>) {
        match id {
            Some(id) => self.registry.untrack(id),
            None => {
                let open = self.registry.all();
                if !open.is_empty() {
                    // each close re-enters through on_before_close
                    for session in open {
                        session.request_close(true);
                    }
                    return;
                }
            }
        }

        if !self.is_disposed() || !self.registry.is_empty() {
            return;
        }
        if self.teardown_complete.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("host teardown: releasing all handler registrations");
        if let Some(subscription) = self.focus_subscription.lock().unwrap().take() {
            self.focus_source.unsubscribe(subscription);
        }
        self.focus.clear();

        self.context_menu.clear();
        self.dialog.clear();
        self.display.clear();
        self.download.clear();
        self.drag.clear();
        self.focus_handler.clear();
        self.keyboard.clear();
        self.load.clear();
        self.media_access.clear();
        self.print.clear();
        self.request.clear();
        self.script_dialog.clear();
        self.lifecycle.clear();

        if let Some(observer) = self.disposal_observer.get() {
            observer.on_host_disposed();
        }
    }

    // ------------------------------------------------------------------
    // Focus dispatch
    // ------------------------------------------------------------------

    /// The session is releasing focus in the given traversal direction.
    pub fn on_take_focus(&self, session: Option<&Arc<dyn Session>>, next: bool) {
        let Some(session) = session else { return };
        self.focus
            .take_focus(session, next, self.focus_handler.get());
    }

    /// The session requests focus. Returns true if the request was fully
    /// handled and focus must not additionally be asserted.
    pub fn on_set_focus(&self, session: Option<&Arc<dyn Session>>, source: FocusSource) -> bool {
        let Some(session) = session else { return false };
        self.focus
            .set_focus(session, source, self.focus_handler.get())
    }

    /// The engine reports that a session received focus.
    pub fn on_got_focus(&self, session: Option<&Arc<dyn Session>>) {
        let Some(session) = session else { return };
        self.focus.got_focus(session, self.focus_handler.get());
    }

    // ------------------------------------------------------------------
    // Context menu dispatch
    // ------------------------------------------------------------------

    /// A context menu is about to be shown.
    pub fn on_before_context_menu(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        params: &ContextMenuParams,
        model: &mut MenuModel,
    ) {
        if let (Some(handler), Some(session)) = (self.context_menu.get(), session) {
            handler.on_before_context_menu(session, frame, params, model);
        }
    }

    /// A context menu command was selected. Returns true if handled.
    pub fn on_context_menu_command(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        params: &ContextMenuParams,
        command_id: i32,
    ) -> bool {
        match (self.context_menu.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_context_menu_command(session, frame, params, command_id)
            }
            _ => false,
        }
    }

    /// The context menu was dismissed.
    pub fn on_context_menu_dismissed(&self, session: Option<&Arc<dyn Session>>, frame: FrameId) {
        if let (Some(handler), Some(session)) = (self.context_menu.get(), session) {
            handler.on_context_menu_dismissed(session, frame);
        }
    }

    // ------------------------------------------------------------------
    // Dialog dispatch
    // ------------------------------------------------------------------

    /// A file dialog was requested. Returns true if presentation was taken
    /// over.
    pub fn on_file_dialog(
        &self,
        session: Option<&Arc<dyn Session>>,
        mode: FileDialogMode,
        title: &str,
        default_path: &str,
        accept_filters: &[String],
    ) -> bool {
        match (self.dialog.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_file_dialog(session, mode, title, default_path, accept_filters)
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Display dispatch
    // ------------------------------------------------------------------

    /// The address of a frame changed.
    pub fn on_address_change(&self, session: Option<&Arc<dyn Session>>, frame: FrameId, url: &str) {
        if let (Some(handler), Some(session)) = (self.display.get(), session) {
            handler.on_address_change(session, frame, url);
        }
    }

    /// The page title changed.
    pub fn on_title_change(&self, session: Option<&Arc<dyn Session>>, title: &str) {
        if let (Some(handler), Some(session)) = (self.display.get(), session) {
            handler.on_title_change(session, title);
        }
    }

    /// A tooltip is about to be shown. Returns true to suppress it.
    pub fn on_tooltip(&self, session: Option<&Arc<dyn Session>>, text: &str) -> bool {
        match (self.display.get(), session) {
            (Some(handler), Some(session)) => handler.on_tooltip(session, text),
            _ => false,
        }
    }

    /// The status message changed.
    pub fn on_status_message(&self, session: Option<&Arc<dyn Session>>, value: &str) {
        if let (Some(handler), Some(session)) = (self.display.get(), session) {
            handler.on_status_message(session, value);
        }
    }

    /// A console message was logged. Returns true to suppress default
    /// output.
    pub fn on_console_message(
        &self,
        session: Option<&Arc<dyn Session>>,
        severity: ConsoleSeverity,
        message: &str,
        source: &str,
        line: i32,
    ) -> bool {
        match (self.display.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_console_message(session, severity, message, source, line)
            }
            _ => false,
        }
    }

    /// The cursor changed. Returns true to suppress the default cursor.
    ///
    /// The display handler sees the event first; if it declines (or none is
    /// registered), the event falls through to the session's render
    /// delegate.
    pub fn on_cursor_change(&self, session: Option<&Arc<dyn Session>>, cursor_type: i32) -> bool {
        let Some(session) = session else { return false };
        if let Some(handler) = self.display.get() {
            if handler.on_cursor_change(session, cursor_type) {
                return true;
            }
        }
        match session.render_delegate() {
            Some(delegate) => delegate.on_cursor_change(session, cursor_type),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Download dispatch
    // ------------------------------------------------------------------

    /// A download is about to begin.
    pub fn on_before_download(
        &self,
        session: Option<&Arc<dyn Session>>,
        item: &DownloadItem,
        suggested_name: &str,
    ) {
        if let (Some(handler), Some(session)) = (self.download.get(), session) {
            handler.on_before_download(session, item, suggested_name);
        }
    }

    /// A download's state was updated.
    pub fn on_download_updated(&self, session: Option<&Arc<dyn Session>>, item: &DownloadItem) {
        if let (Some(handler), Some(session)) = (self.download.get(), session) {
            handler.on_download_updated(session, item);
        }
    }

    // ------------------------------------------------------------------
    // Drag dispatch
    // ------------------------------------------------------------------

    /// Dragged data entered the session. Returns true to cancel the drag.
    pub fn on_drag_enter(
        &self,
        session: Option<&Arc<dyn Session>>,
        data: &DragData,
        mask: DragOperations,
    ) -> bool {
        match (self.drag.get(), session) {
            (Some(handler), Some(session)) => handler.on_drag_enter(session, data, mask),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Keyboard dispatch
    // ------------------------------------------------------------------

    /// A key event is about to reach the renderer. Returns true to consume.
    pub fn on_pre_key_event(
        &self,
        session: Option<&Arc<dyn Session>>,
        event: &KeyEvent,
        is_shortcut: &mut bool,
    ) -> bool {
        match (self.keyboard.get(), session) {
            (Some(handler), Some(session)) => handler.on_pre_key_event(session, event, is_shortcut),
            _ => false,
        }
    }

    /// A key event was not consumed by the renderer. Returns true to
    /// consume.
    pub fn on_key_event(&self, session: Option<&Arc<dyn Session>>, event: &KeyEvent) -> bool {
        match (self.keyboard.get(), session) {
            (Some(handler), Some(session)) => handler.on_key_event(session, event),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Load dispatch
    // ------------------------------------------------------------------

    /// Loading started or stopped.
    pub fn on_loading_state_change(
        &self,
        session: Option<&Arc<dyn Session>>,
        is_loading: bool,
        can_go_back: bool,
        can_go_forward: bool,
    ) {
        if let (Some(handler), Some(session)) = (self.load.get(), session) {
            handler.on_loading_state_change(session, is_loading, can_go_back, can_go_forward);
        }
    }

    /// A frame began loading.
    pub fn on_load_start(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        transition: Transition,
    ) {
        if let (Some(handler), Some(session)) = (self.load.get(), session) {
            handler.on_load_start(session, frame, transition);
        }
    }

    /// A frame finished loading.
    pub fn on_load_end(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        http_status: i32,
    ) {
        if let (Some(handler), Some(session)) = (self.load.get(), session) {
            handler.on_load_end(session, frame, http_status);
        }
    }

    /// A frame failed to load.
    pub fn on_load_error(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        error_code: i32,
        error_text: &str,
        failed_url: &str,
    ) {
        if let (Some(handler), Some(session)) = (self.load.get(), session) {
            handler.on_load_error(session, frame, error_code, error_text, failed_url);
        }
    }

    // ------------------------------------------------------------------
    // Media access dispatch
    // ------------------------------------------------------------------

    /// A page requests media capture permissions. Returns true if the
    /// request is being handled.
    pub fn on_media_access_request(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        requesting_url: &str,
        permissions: MediaPermissions,
    ) -> bool {
        match (self.media_access.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_media_access_request(session, frame, requesting_url, permissions)
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Script dialog dispatch
    // ------------------------------------------------------------------

    /// A script dialog was requested. Returns true if presentation was
    /// taken over.
    #[allow(clippy::too_many_arguments)]
    pub fn on_script_dialog(
        &self,
        session: Option<&Arc<dyn Session>>,
        origin_url: &str,
        kind: ScriptDialogKind,
        message: &str,
        default_prompt: &str,
        suppress: &mut bool,
    ) -> bool {
        match (self.script_dialog.get(), session) {
            (Some(handler), Some(session)) => handler.on_script_dialog(
                session,
                origin_url,
                kind,
                message,
                default_prompt,
                suppress,
            ),
            _ => false,
        }
    }

    /// A before-unload confirmation was requested. Returns true if taken
    /// over.
    pub fn on_before_unload_dialog(
        &self,
        session: Option<&Arc<dyn Session>>,
        message: &str,
        is_reload: bool,
    ) -> bool {
        match (self.script_dialog.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_before_unload_dialog(session, message, is_reload)
            }
            _ => false,
        }
    }

    /// Pending dialog state should be reset.
    pub fn on_reset_dialog_state(&self, session: Option<&Arc<dyn Session>>) {
        if let (Some(handler), Some(session)) = (self.script_dialog.get(), session) {
            handler.on_reset_dialog_state(session);
        }
    }

    /// The dialog was closed.
    pub fn on_dialog_closed(&self, session: Option<&Arc<dyn Session>>) {
        if let (Some(handler), Some(session)) = (self.script_dialog.get(), session) {
            handler.on_dialog_closed(session);
        }
    }

    // ------------------------------------------------------------------
    // Print dispatch
    // ------------------------------------------------------------------

    /// Printing was initiated for the session.
    pub fn on_print_start(&self, session: Option<&Arc<dyn Session>>) {
        if let (Some(handler), Some(session)) = (self.print.get(), session) {
            handler.on_print_start(session);
        }
    }

    /// Settings are being negotiated.
    pub fn on_print_settings(
        &self,
        session: Option<&Arc<dyn Session>>,
        settings: &mut PrintSettings,
        get_defaults: bool,
    ) {
        if let (Some(handler), Some(session)) = (self.print.get(), session) {
            handler.on_print_settings(session, settings, get_defaults);
        }
    }

    /// A print dialog was requested. Returns true if taken over.
    pub fn on_print_dialog(&self, session: Option<&Arc<dyn Session>>, has_selection: bool) -> bool {
        match (self.print.get(), session) {
            (Some(handler), Some(session)) => handler.on_print_dialog(session, has_selection),
            _ => false,
        }
    }

    /// A print job was submitted. Returns true if the job is being handled.
    pub fn on_print_job(
        &self,
        session: Option<&Arc<dyn Session>>,
        document_name: &str,
        pdf_path: &str,
    ) -> bool {
        match (self.print.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_print_job(session, document_name, pdf_path)
            }
            _ => false,
        }
    }

    /// Pending print state should be reset.
    pub fn on_print_reset(&self, session: Option<&Arc<dyn Session>>) {
        if let (Some(handler), Some(session)) = (self.print.get(), session) {
            handler.on_print_reset(session);
        }
    }

    /// Paper size for PDF printing, if the handler overrides the default.
    pub fn pdf_paper_size(
        &self,
        session: Option<&Arc<dyn Session>>,
        device_units_per_inch: i32,
    ) -> Option<Size> {
        match (self.print.get(), session) {
            (Some(handler), Some(session)) => {
                handler.pdf_paper_size(session, device_units_per_inch)
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Request dispatch
    // ------------------------------------------------------------------

    /// Navigation is about to occur. Returns true to cancel it.
    pub fn on_before_browse(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        request: &Request,
        user_gesture: bool,
        is_redirect: bool,
    ) -> bool {
        match (self.request.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_before_browse(session, frame, request, user_gesture, is_redirect)
            }
            _ => false,
        }
    }

    /// A URL is about to open in a new tab. Returns true to cancel.
    ///
    /// A disposed host cancels unconditionally.
    pub fn on_open_url_from_tab(
        &self,
        session: Option<&Arc<dyn Session>>,
        frame: FrameId,
        target_url: &str,
        user_gesture: bool,
    ) -> bool {
        if self.is_disposed() {
            return true;
        }
        match (self.request.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_open_url_from_tab(session, frame, target_url, user_gesture)
            }
            _ => false,
        }
    }

    /// Authentication credentials are required. Returns true if the request
    /// is being handled.
    #[allow(clippy::too_many_arguments)]
    pub fn auth_credentials(
        &self,
        session: Option<&Arc<dyn Session>>,
        origin_url: &str,
        is_proxy: bool,
        host: &str,
        port: i32,
        realm: &str,
        scheme: &str,
    ) -> bool {
        match (self.request.get(), session) {
            (Some(handler), Some(session)) => {
                handler.auth_credentials(session, origin_url, is_proxy, host, port, realm, scheme)
            }
            _ => false,
        }
    }

    /// A page requests a larger storage quota. Returns true if the request
    /// is being handled.
    pub fn on_quota_request(
        &self,
        session: Option<&Arc<dyn Session>>,
        origin_url: &str,
        new_size: i64,
    ) -> bool {
        match (self.request.get(), session) {
            (Some(handler), Some(session)) => {
                handler.on_quota_request(session, origin_url, new_size)
            }
            _ => false,
        }
    }

    /// A certificate error occurred. Returns true if handled.
    ///
    /// Reaches the handler even without a session: certificate errors can
    /// surface for requests that no longer map to one.
    pub fn on_certificate_error(
        &self,
        session: Option<&Arc<dyn Session>>,
        cert_error: i32,
        request_url: &str,
    ) -> bool {
        match self.request.get() {
            Some(handler) => handler.on_certificate_error(session, cert_error, request_url),
            None => false,
        }
    }

    /// A plugin in a session's render process crashed.
    ///
    /// Reaches the handler even without a session, like
    /// [`on_certificate_error`](SessionHost::on_certificate_error).
    pub fn on_plugin_crashed(&self, session: Option<&Arc<dyn Session>>, plugin_path: &str) {
        if let Some(handler) = self.request.get() {
            handler.on_plugin_crashed(session, plugin_path);
        }
    }

    /// A render process terminated abnormally.
    ///
    /// Reaches the handler even without a session, like
    /// [`on_certificate_error`](SessionHost::on_certificate_error).
    pub fn on_render_process_terminated(
        &self,
        session: Option<&Arc<dyn Session>>,
        status: TerminationStatus,
    ) {
        if let Some(handler) = self.request.get() {
            handler.on_render_process_terminated(session, status);
        }
    }

    // ------------------------------------------------------------------
    // Render passthrough
    // ------------------------------------------------------------------

    /// The rectangle the view occupies.
    ///
    /// Never degenerate: with no session or no render delegate the answer
    /// is a 1x1 rectangle at the origin, and a delegate-provided rectangle
    /// with a non-positive dimension has that dimension clamped to 1.
    pub fn view_rect(&self, session: Option<&Arc<dyn Session>>) -> Rect {
        let Some(session) = session else {
            return Rect::minimal();
        };
        match session.render_delegate() {
            Some(delegate) => delegate.view_rect(session).non_empty(),
            None => Rect::minimal(),
        }
    }

    /// Translate a view coordinate to a screen coordinate. Defaults to the
    /// origin when no delegate answers.
    pub fn screen_point(&self, session: Option<&Arc<dyn Session>>, view_point: Point) -> Point {
        let Some(session) = session else {
            return Point::new(0, 0);
        };
        match session.render_delegate() {
            Some(delegate) => delegate.screen_point(session, view_point),
            None => Point::new(0, 0),
        }
    }

    /// The device scale factor for the session's view.
    ///
    /// Falls back to the configured default scale when no delegate answers.
    pub fn device_scale_factor(&self, session: Option<&Arc<dyn Session>>) -> f64 {
        let Some(session) = session else {
            return self.config.default_scale_factor;
        };
        match session.render_delegate() {
            Some(delegate) => delegate.device_scale_factor(session),
            None => self.config.default_scale_factor,
        }
    }

    /// Information about the screen the view is on, if known.
    pub fn screen_info(&self, session: Option<&Arc<dyn Session>>) -> Option<ScreenInfo> {
        let session = session?;
        session.render_delegate()?.screen_info(session)
    }

    /// A popup widget was shown or hidden.
    pub fn on_popup_show(&self, session: Option<&Arc<dyn Session>>, show: bool) {
        let Some(session) = session else { return };
        if let Some(delegate) = session.render_delegate() {
            delegate.on_popup_show(session, show);
        }
    }

    /// A popup widget was resized.
    pub fn on_popup_size(&self, session: Option<&Arc<dyn Session>>, rect: Rect) {
        let Some(session) = session else { return };
        if let Some(delegate) = session.render_delegate() {
            delegate.on_popup_size(session, rect);
        }
    }

    /// A frame of pixels is ready.
    pub fn on_paint(
        &self,
        session: Option<&Arc<dyn Session>>,
        popup: bool,
        dirty_rects: &[Rect],
        buffer: &[u8],
        size: Size,
    ) {
        let Some(session) = session else { return };
        if let Some(delegate) = session.render_delegate() {
            delegate.on_paint(session, popup, dirty_rects, buffer, size);
        }
    }

    /// The user started dragging content out of the view. Returns true if
    /// the drag is being handled.
    pub fn start_dragging(
        &self,
        session: Option<&Arc<dyn Session>>,
        data: &DragData,
        allowed: DragOperations,
        start: Point,
    ) -> bool {
        let Some(session) = session else { return false };
        match session.render_delegate() {
            Some(delegate) => delegate.start_dragging(session, data, allowed, start),
            None => false,
        }
    }

    /// The drag cursor changed during an in-view drag.
    pub fn update_drag_cursor(&self, session: Option<&Arc<dyn Session>>, operation: DragOperations) {
        let Some(session) = session else { return };
        if let Some(delegate) = session.render_delegate() {
            delegate.update_drag_cursor(session, operation);
        }
    }

    // ------------------------------------------------------------------
    // Window passthrough
    // ------------------------------------------------------------------

    /// The rectangle the session's window occupies.
    pub fn window_rect(&self, session: Option<&Arc<dyn Session>>) -> Rect {
        let Some(session) = session else {
            return Rect::zero();
        };
        match session.window_delegate() {
            Some(delegate) => delegate.window_rect(session),
            None => Rect::zero(),
        }
    }

    /// A low-level mouse event targeting the session's window.
    pub fn on_mouse_event(&self, session: Option<&Arc<dyn Session>>, event: &MouseEvent) {
        let Some(session) = session else { return };
        if let Some(delegate) = session.window_delegate() {
            delegate.on_mouse_event(session, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        CountingDisposalObserver, EventLog, MockSession, RecordingLifecycleHandler,
        StubRenderDelegate,
    };
    use browser_host_core::{DirectMarshal, FocusChangeBus};

    fn host() -> Arc<SessionHost> {
        SessionHost::new(
            HostConfig::default(),
            Arc::new(DirectMarshal),
            None,
            Arc::new(FocusChangeBus::new()),
        )
    }

    fn host_with_config(config: HostConfig) -> Arc<SessionHost> {
        SessionHost::new(
            config,
            Arc::new(DirectMarshal),
            None,
            Arc::new(FocusChangeBus::new()),
        )
    }

    #[test]
    fn test_new_host_is_live_and_empty() {
        let host = host();
        assert!(!host.is_disposed());
        assert_eq!(host.session_count(), 0);
        assert!(host.focused_session().is_none());
    }

    #[test]
    fn test_dispatch_without_handlers_uses_neutral_defaults() {
        let host = host();
        let session = MockSession::new(SessionId::new(1)).as_session();

        assert!(!host.on_tooltip(Some(&session), "tip"));
        assert!(!host.on_context_menu_command(
            Some(&session),
            FrameId::new(0),
            &ContextMenuParams::default(),
            1
        ));
        assert!(!host.on_key_event(Some(&session), &KeyEvent::key_down(65)));
        assert!(host
            .pdf_paper_size(Some(&session), 96)
            .is_none());
        host.on_title_change(Some(&session), "title");
    }

    #[test]
    fn test_dispatch_without_session_uses_neutral_defaults() {
        let host = host();
        assert!(!host.on_tooltip(None, "tip"));
        assert!(!host.on_set_focus(None, FocusSource::System));
        assert_eq!(host.view_rect(None), Rect::minimal());
        host.on_title_change(None, "title");
        host.on_after_created(None);
        host.on_before_close(None);
    }

    #[test]
    fn test_after_created_tracks_before_fanout() {
        let host = host();
        let log = EventLog::new();

        struct CountChecker {
            host: Weak<SessionHost>,
            log: EventLog,
        }
        impl LifecycleHandler for CountChecker {
            fn on_after_created(&self, session: &Arc<dyn Session>) {
                let host = self.host.upgrade().unwrap();
                // the session is already visible in the registry
                assert!(host.session(session.id()).is_some());
                self.log.record(format!("seen:{}", session.id()));
            }
        }

        host.add_lifecycle_handler(Arc::new(CountChecker {
            host: Arc::downgrade(&host),
            log: log.clone(),
        }));

        let session = MockSession::new(SessionId::new(7)).as_session();
        host.on_after_created(Some(&session));

        assert_eq!(log.entries(), vec!["seen:7"]);
        assert_eq!(host.session_count(), 1);
    }

    #[test]
    fn test_after_created_on_disposed_host_forces_close() {
        let host = host();
        host.dispose();

        let mock = MockSession::new(SessionId::new(1));
        host.on_after_created(Some(&mock.as_session()));

        assert_eq!(host.session_count(), 0);
        assert_eq!(mock.close_requests(), vec![true]);
    }

    #[test]
    fn test_before_close_order_and_untrack() {
        let host = host();
        let log = EventLog::new();
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "a"));
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "b"));

        let mock = MockSession::new(SessionId::new(3));
        let session = mock.as_session();
        host.on_after_created(Some(&session));
        host.on_before_close(Some(&session));

        assert_eq!(
            log.entries(),
            vec![
                "a:after-created:3",
                "b:after-created:3",
                "a:before-close:3",
                "b:before-close:3"
            ]
        );
        assert!(mock.before_close_notified());
        assert_eq!(host.session_count(), 0);
    }

    #[test]
    fn test_before_popup_ors_subscriber_answers() {
        let host = host();
        let log = EventLog::new();
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "a"));
        host.add_lifecycle_handler(RecordingLifecycleHandler::vetoing_popups(&log, "b"));
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "c"));

        let session = MockSession::new(SessionId::new(1)).as_session();
        let vetoed = host.on_before_popup(Some(&session), FrameId::new(0), "https://x/", "");

        assert!(vetoed);
        // every subscriber was still consulted
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn test_before_popup_on_disposed_host_vetoes() {
        let host = host();
        host.dispose();
        let session = MockSession::new(SessionId::new(1)).as_session();
        assert!(host.on_before_popup(Some(&session), FrameId::new(0), "https://x/", ""));
        assert!(host.on_open_url_from_tab(Some(&session), FrameId::new(0), "https://x/", true));
    }

    #[test]
    fn test_do_close_returns_session_answer() {
        let host = host();
        let log = EventLog::new();
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "a"));

        let session = MockSession::new(SessionId::new(1)).as_session();
        assert!(host.do_close(Some(&session)));
        assert_eq!(log.entries(), vec!["a:do-close:1"]);
    }

    #[test]
    fn test_create_session_rejected_after_dispose() {
        let host = host();
        let factory = crate::testing::MockFactory::new();
        host.dispose();

        let result = host.create_session(&factory, &SessionDescriptor::default());
        assert!(matches!(result, Err(Error::HostDisposed)));
        assert!(factory.created().is_empty());
    }

    #[test]
    fn test_create_session_respects_cap() {
        let config = HostConfig {
            max_sessions: 1,
            ..HostConfig::default()
        };
        let host = host_with_config(config);
        let factory = crate::testing::MockFactory::new();

        let first = host
            .create_session(&factory, &SessionDescriptor::default())
            .unwrap();
        host.on_after_created(Some(&first));

        let second = host.create_session(&factory, &SessionDescriptor::default());
        assert!(matches!(second, Err(Error::SessionLimitReached(1))));
    }

    #[test]
    fn test_dispose_drains_and_notifies_once() {
        let host = host();
        let observer = CountingDisposalObserver::new();
        host.set_disposal_observer(observer.clone());

        let mock = MockSession::new(SessionId::new(1));
        mock.wire_close_to(&host);
        host.on_after_created(Some(&mock.as_session()));

        host.dispose();

        assert!(host.is_disposed());
        assert_eq!(host.session_count(), 0);
        assert_eq!(mock.close_requests(), vec![true]);
        assert!(mock.before_close_notified());
        assert_eq!(observer.count(), 1);

        // repeated dispose does not re-notify
        host.dispose();
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn test_dispose_with_no_sessions_tears_down_immediately() {
        let host = host();
        let observer = CountingDisposalObserver::new();
        host.set_disposal_observer(observer.clone());

        host.dispose();
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn test_teardown_clears_handler_registrations() {
        let host = host();
        let log = EventLog::new();
        host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "a"));
        host.dispose();

        // fan-out after teardown reaches nobody
        let session = MockSession::new(SessionId::new(9)).as_session();
        host.on_after_reparented(Some(&session));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_cursor_change_falls_through_to_render_delegate() {
        let host = host();
        let mock = MockSession::new(SessionId::new(1));

        struct SuppressingDelegate;
        impl crate::handlers::RenderDelegate for SuppressingDelegate {
            fn view_rect(&self, _session: &Arc<dyn Session>) -> Rect {
                Rect::minimal()
            }
            fn on_cursor_change(&self, _session: &Arc<dyn Session>, _cursor_type: i32) -> bool {
                true
            }
        }
        mock.set_render_delegate(Arc::new(SuppressingDelegate));

        // no display handler registered: the delegate decides
        assert!(host.on_cursor_change(Some(&mock.as_session()), 4));
    }

    #[test]
    fn test_view_rect_clamps_degenerate_delegate_answer() {
        let host = host();
        let mock = MockSession::new(SessionId::new(1));
        mock.set_render_delegate(StubRenderDelegate::with_rect(Rect::new(10, 20, 0, -5)));

        let rect = host.view_rect(Some(&mock.as_session()));
        assert_eq!(rect, Rect::new(10, 20, 1, 1));
    }

    #[test]
    fn test_device_scale_factor_falls_back_to_config() {
        let config = HostConfig {
            default_scale_factor: 2.0,
            ..HostConfig::default()
        };
        let host = host_with_config(config);

        let plain = MockSession::new(SessionId::new(1));
        assert_eq!(host.device_scale_factor(Some(&plain.as_session())), 2.0);
        assert_eq!(host.device_scale_factor(None), 2.0);

        let scaled = MockSession::new(SessionId::new(2));
        scaled.set_render_delegate(StubRenderDelegate::with_rect_and_scale(
            Rect::new(0, 0, 100, 100),
            1.5,
        ));
        assert_eq!(host.device_scale_factor(Some(&scaled.as_session())), 1.5);
    }

    #[test]
    fn test_certificate_error_dispatches_without_session() {
        let host = host();

        struct Handling;
        impl RequestHandler for Handling {
            fn on_certificate_error(
                &self,
                session: Option<&Arc<dyn Session>>,
                _cert_error: i32,
                _request_url: &str,
            ) -> bool {
                assert!(session.is_none());
                true
            }
        }
        host.add_request_handler(Arc::new(Handling));

        assert!(host.on_certificate_error(None, -202, "https://bad.example/"));
        host.on_render_process_terminated(None, TerminationStatus::ProcessCrashed);
    }

    #[test]
    fn test_quota_request_requires_session_and_handler() {
        let host = host();
        let session = MockSession::new(SessionId::new(1)).as_session();

        // no handler registered
        assert!(!host.on_quota_request(Some(&session), "https://a.example/", 1 << 20));

        struct Granting;
        impl RequestHandler for Granting {
            fn on_quota_request(
                &self,
                _session: &Arc<dyn Session>,
                _origin_url: &str,
                _new_size: i64,
            ) -> bool {
                true
            }
        }
        host.add_request_handler(Arc::new(Granting));

        assert!(host.on_quota_request(Some(&session), "https://a.example/", 1 << 20));
        // unlike certificate errors, quota requests need a session
        assert!(!host.on_quota_request(None, "https://a.example/", 1 << 20));
    }

    #[test]
    fn test_plugin_crashed_dispatches_without_session() {
        use std::sync::atomic::AtomicUsize;

        let host = host();
        struct Counting(AtomicUsize);
        impl RequestHandler for Counting {
            fn on_plugin_crashed(&self, session: Option<&Arc<dyn Session>>, plugin_path: &str) {
                assert!(session.is_none());
                assert_eq!(plugin_path, "/usr/lib/plugin.so");
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        let handler = Arc::new(Counting(AtomicUsize::new(0)));
        host.add_request_handler(handler.clone());

        host.on_plugin_crashed(None, "/usr/lib/plugin.so");
        assert_eq!(handler.0.load(Ordering::SeqCst), 1);

        // without a handler the event is dropped silently
        let bare = host_with_config(HostConfig::default());
        bare.on_plugin_crashed(None, "/usr/lib/plugin.so");
    }

    #[test]
    fn test_create_session_propagates_factory_failure() {
        let host = host();
        let factory = crate::testing::MockFactory::new();
        factory.fail_creations();

        let result = host.create_session(&factory, &SessionDescriptor::default());
        assert!(matches!(result, Err(Error::Factory(_))));
        assert!(factory.created().is_empty());
    }

    #[test]
    fn test_paint_passes_through_to_render_delegate() {
        let host = host();
        let mock = MockSession::new(SessionId::new(1));
        let delegate = StubRenderDelegate::with_rect(Rect::new(0, 0, 4, 4));
        mock.set_render_delegate(delegate.clone());

        let buffer = vec![0u8; 4 * 4 * 4];
        host.on_paint(
            Some(&mock.as_session()),
            false,
            &[Rect::new(0, 0, 4, 4)],
            &buffer,
            Size::new(4, 4),
        );
        // an absent session never reaches the delegate
        host.on_paint(None, false, &[], &buffer, Size::new(4, 4));

        assert_eq!(delegate.paint_count(), 1);
    }

    #[test]
    fn test_window_rect_defaults_to_zero() {
        let host = host();
        let mock = MockSession::new(SessionId::new(1));
        assert_eq!(host.window_rect(Some(&mock.as_session())), Rect::zero());
        assert_eq!(host.window_rect(None), Rect::zero());
    }
}
