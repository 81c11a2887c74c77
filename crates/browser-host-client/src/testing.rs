//! Test doubles for the dispatch core.
//!
//! Shared by this crate's unit tests and the integration suites. The mock
//! session completes its close protocol synchronously when wired to a host,
//! which lets lifecycle tests drive the full disposal sequence without a
//! real session engine.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use browser_host_core::{
    Error, FocusSource, FocusTraversal, Point, Rect, Result, SessionDescriptor, SessionId,
    UiComponent,
};

use crate::handlers::{FocusHandler, LifecycleHandler, RenderDelegate, WindowDelegate};
use crate::host::{DisposalObserver, SessionHost};
use crate::session::{Session, SessionFactory};

/// A controllable [`Session`] implementation.
pub struct MockSession {
    id: SessionId,
    ui: Mutex<Option<UiComponent>>,
    focus_flag: AtomicBool,
    close_requests: Mutex<Vec<bool>>,
    before_close_notified: AtomicBool,
    confirm_close_answer: AtomicBool,
    render: Mutex<Option<Arc<dyn RenderDelegate>>>,
    window: Mutex<Option<Arc<dyn WindowDelegate>>>,
    host: Mutex<Weak<SessionHost>>,
    self_ref: Weak<MockSession>,
}

impl MockSession {
    /// Create a mock session with no UI attachment.
    pub fn new(id: SessionId) -> Arc<Self> {
        Self::build(id, None)
    }

    /// Create a mock session attached to a fresh UI component.
    pub fn with_ui(id: SessionId) -> Arc<Self> {
        Self::build(id, Some(UiComponent::new()))
    }

    fn build(id: SessionId, ui: Option<UiComponent>) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            id,
            ui: Mutex::new(ui),
            focus_flag: AtomicBool::new(false),
            close_requests: Mutex::new(Vec::new()),
            before_close_notified: AtomicBool::new(false),
            confirm_close_answer: AtomicBool::new(true),
            render: Mutex::new(None),
            window: Mutex::new(None),
            host: Mutex::new(Weak::new()),
            self_ref: self_ref.clone(),
        })
    }

    /// This session as a trait object.
    pub fn as_session(self: &Arc<Self>) -> Arc<dyn Session> {
        Arc::clone(self) as Arc<dyn Session>
    }

    /// Wire close requests to a host: `request_close` will immediately
    /// deliver the before-close event, as if the engine closed the session
    /// synchronously.
    pub fn wire_close_to(&self, host: &Arc<SessionHost>) {
        *self.host.lock().unwrap() = Arc::downgrade(host);
    }

    /// Replace the UI attachment.
    pub fn set_ui(&self, ui: Option<UiComponent>) {
        *self.ui.lock().unwrap() = ui;
    }

    /// Install a render delegate.
    pub fn set_render_delegate(&self, delegate: Arc<dyn RenderDelegate>) {
        *self.render.lock().unwrap() = Some(delegate);
    }

    /// Install a window delegate.
    pub fn set_window_delegate(&self, delegate: Arc<dyn WindowDelegate>) {
        *self.window.lock().unwrap() = Some(delegate);
    }

    /// Current value of the focus flag.
    pub fn focus_flag(&self) -> bool {
        self.focus_flag.load(Ordering::SeqCst)
    }

    /// The `force` argument of every close request received so far.
    pub fn close_requests(&self) -> Vec<bool> {
        self.close_requests.lock().unwrap().clone()
    }

    /// Whether the final before-close notification arrived.
    pub fn before_close_notified(&self) -> bool {
        self.before_close_notified.load(Ordering::SeqCst)
    }
}

impl Session for MockSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn request_close(&self, force: bool) {
        self.close_requests.lock().unwrap().push(force);
        let host = self.host.lock().unwrap().upgrade();
        if let Some(host) = host {
            let this = self
                .self_ref
                .upgrade()
                .expect("mock session dropped during close");
            host.on_before_close(Some(&(this as Arc<dyn Session>)));
        }
    }

    fn notify_before_close(&self) {
        self.before_close_notified.store(true, Ordering::SeqCst);
    }

    fn confirm_close(&self) -> bool {
        self.confirm_close_answer.load(Ordering::SeqCst)
    }

    fn set_focus_flag(&self, focused: bool) {
        self.focus_flag.store(focused, Ordering::SeqCst);
    }

    fn ui_component(&self) -> Option<UiComponent> {
        self.ui.lock().unwrap().clone()
    }

    fn render_delegate(&self) -> Option<Arc<dyn RenderDelegate>> {
        self.render.lock().unwrap().clone()
    }

    fn window_delegate(&self) -> Option<Arc<dyn WindowDelegate>> {
        self.window.lock().unwrap().clone()
    }
}

/// Factory producing [`MockSession`]s with sequential identifiers.
pub struct MockFactory {
    next_id: AtomicI32,
    created: Mutex<Vec<Arc<MockSession>>>,
    fail: AtomicBool,
}

impl MockFactory {
    /// Create a factory starting at identifier 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            created: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make subsequent creations fail.
    pub fn fail_creations(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Every session this factory produced.
    pub fn created(&self) -> Vec<Arc<MockSession>> {
        self.created.lock().unwrap().clone()
    }
}

impl Default for MockFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactory for MockFactory {
    fn create(&self, _descriptor: &SessionDescriptor) -> Result<Arc<dyn Session>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Factory("mock factory set to fail".to_string()));
        }
        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let session = MockSession::with_ui(id);
        self.created.lock().unwrap().push(Arc::clone(&session));
        Ok(session as Arc<dyn Session>)
    }
}

/// Shared append-only log for asserting cross-handler ordering.
#[derive(Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.inner.lock().unwrap().push(entry.into());
    }

    /// Copy of all entries, in record order.
    pub fn entries(&self) -> Vec<String> {
        self.inner.lock().unwrap().clone()
    }
}

/// Lifecycle subscriber that records every event it observes.
pub struct RecordingLifecycleHandler {
    log: EventLog,
    tag: String,
    popup_answer: bool,
}

impl RecordingLifecycleHandler {
    /// Create a recording subscriber writing `tag`-prefixed entries.
    pub fn new(log: &EventLog, tag: &str) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            tag: tag.to_string(),
            popup_answer: false,
        })
    }

    /// Variant that vetoes every popup.
    pub fn vetoing_popups(log: &EventLog, tag: &str) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            tag: tag.to_string(),
            popup_answer: true,
        })
    }
}

impl LifecycleHandler for RecordingLifecycleHandler {
    fn on_before_popup(
        &self,
        session: &Arc<dyn Session>,
        _frame: browser_host_core::FrameId,
        target_url: &str,
        _target_frame_name: &str,
    ) -> bool {
        self.log.record(format!(
            "{}:before-popup:{}:{}",
            self.tag,
            session.id(),
            target_url
        ));
        self.popup_answer
    }

    fn on_after_created(&self, session: &Arc<dyn Session>) {
        self.log
            .record(format!("{}:after-created:{}", self.tag, session.id()));
    }

    fn on_after_reparented(&self, session: &Arc<dyn Session>) {
        self.log
            .record(format!("{}:after-reparented:{}", self.tag, session.id()));
    }

    fn do_close(&self, session: &Arc<dyn Session>) -> bool {
        self.log
            .record(format!("{}:do-close:{}", self.tag, session.id()));
        false
    }

    fn on_before_close(&self, session: &Arc<dyn Session>) {
        self.log
            .record(format!("{}:before-close:{}", self.tag, session.id()));
    }
}

/// Focus handler counting deliveries.
pub struct RecordingFocusHandler {
    take_focus: AtomicUsize,
    set_focus: AtomicUsize,
    got_focus: AtomicUsize,
    set_focus_answer: bool,
}

impl RecordingFocusHandler {
    /// Handler that declines set-focus requests.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            take_focus: AtomicUsize::new(0),
            set_focus: AtomicUsize::new(0),
            got_focus: AtomicUsize::new(0),
            set_focus_answer: false,
        })
    }

    /// Handler that reports set-focus requests as fully handled.
    pub fn handling_set_focus() -> Arc<Self> {
        Arc::new(Self {
            take_focus: AtomicUsize::new(0),
            set_focus: AtomicUsize::new(0),
            got_focus: AtomicUsize::new(0),
            set_focus_answer: true,
        })
    }

    /// Number of take-focus notifications.
    pub fn take_focus_count(&self) -> usize {
        self.take_focus.load(Ordering::SeqCst)
    }

    /// Number of set-focus requests.
    pub fn set_focus_count(&self) -> usize {
        self.set_focus.load(Ordering::SeqCst)
    }

    /// Number of got-focus notifications.
    pub fn got_focus_count(&self) -> usize {
        self.got_focus.load(Ordering::SeqCst)
    }
}

impl FocusHandler for RecordingFocusHandler {
    fn on_take_focus(&self, _session: &Arc<dyn Session>, _next: bool) {
        self.take_focus.fetch_add(1, Ordering::SeqCst);
    }

    fn on_set_focus(&self, _session: &Arc<dyn Session>, _source: FocusSource) -> bool {
        self.set_focus.fetch_add(1, Ordering::SeqCst);
        self.set_focus_answer
    }

    fn on_got_focus(&self, _session: &Arc<dyn Session>) {
        self.got_focus.fetch_add(1, Ordering::SeqCst);
    }
}

/// Disposal observer counting notifications.
pub struct CountingDisposalObserver {
    count: AtomicUsize,
}

impl CountingDisposalObserver {
    /// Create an observer with a zero count.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            count: AtomicUsize::new(0),
        })
    }

    /// Number of disposed notifications received.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl DisposalObserver for CountingDisposalObserver {
    fn on_host_disposed(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Render delegate answering with a fixed rectangle and scale.
pub struct StubRenderDelegate {
    rect: Rect,
    scale: f64,
    paint_count: AtomicUsize,
}

impl StubRenderDelegate {
    /// Delegate reporting the given view rectangle at scale 1.0.
    pub fn with_rect(rect: Rect) -> Arc<Self> {
        Arc::new(Self {
            rect,
            scale: 1.0,
            paint_count: AtomicUsize::new(0),
        })
    }

    /// Delegate reporting the given view rectangle and scale factor.
    pub fn with_rect_and_scale(rect: Rect, scale: f64) -> Arc<Self> {
        Arc::new(Self {
            rect,
            scale,
            paint_count: AtomicUsize::new(0),
        })
    }

    /// Number of paint deliveries.
    pub fn paint_count(&self) -> usize {
        self.paint_count.load(Ordering::SeqCst)
    }
}

impl RenderDelegate for StubRenderDelegate {
    fn view_rect(&self, _session: &Arc<dyn Session>) -> Rect {
        self.rect
    }

    fn screen_point(&self, _session: &Arc<dyn Session>, view_point: Point) -> Point {
        Point::new(view_point.x + self.rect.x, view_point.y + self.rect.y)
    }

    fn device_scale_factor(&self, _session: &Arc<dyn Session>) -> f64 {
        self.scale
    }

    fn on_paint(
        &self,
        _session: &Arc<dyn Session>,
        _popup: bool,
        _dirty_rects: &[Rect],
        _buffer: &[u8],
        _size: browser_host_core::Size,
    ) {
        self.paint_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Focus-traversal provider with scriptable answers.
pub struct ScriptedTraversal {
    after: Mutex<Option<UiComponent>>,
    before: Mutex<Option<UiComponent>>,
    default: Mutex<Option<UiComponent>>,
    focus_requests: Mutex<Vec<UiComponent>>,
}

impl ScriptedTraversal {
    /// Provider that answers `None` to every query.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            after: Mutex::new(None),
            before: Mutex::new(None),
            default: Mutex::new(None),
            focus_requests: Mutex::new(Vec::new()),
        })
    }

    /// Set the component returned for forward traversal.
    pub fn set_after(&self, component: UiComponent) {
        *self.after.lock().unwrap() = Some(component);
    }

    /// Set the component returned for backward traversal.
    pub fn set_before(&self, component: UiComponent) {
        *self.before.lock().unwrap() = Some(component);
    }

    /// Set the fallback default component.
    pub fn set_default(&self, component: UiComponent) {
        *self.default.lock().unwrap() = Some(component);
    }

    /// Components focus was requested for, in order.
    pub fn focus_requests(&self) -> Vec<UiComponent> {
        self.focus_requests.lock().unwrap().clone()
    }
}

impl FocusTraversal for ScriptedTraversal {
    fn component_after(
        &self,
        _container: &UiComponent,
        _current: &UiComponent,
    ) -> Option<UiComponent> {
        self.after.lock().unwrap().clone()
    }

    fn component_before(
        &self,
        _container: &UiComponent,
        _current: &UiComponent,
    ) -> Option<UiComponent> {
        self.before.lock().unwrap().clone()
    }

    fn default_component(&self, _container: &UiComponent) -> Option<UiComponent> {
        self.default.lock().unwrap().clone()
    }

    fn request_focus(&self, component: &UiComponent) {
        self.focus_requests.lock().unwrap().push(component.clone());
    }
}
