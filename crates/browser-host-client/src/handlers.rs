//! Handler capability traits, one per event category.
//!
//! Each category is an independent capability: the host application
//! registers only the handlers it cares about, and every method carries a
//! neutral default body so an implementation overrides only the events it
//! consumes. Boolean returns follow the engine convention: `true` means the
//! handler consumed or handled the event, `false` defers to default
//! behavior.

use std::sync::Arc;

use browser_host_core::{
    ConsoleSeverity, ContextMenuParams, DownloadItem, DragData, DragOperations, FileDialogMode,
    FocusSource, FrameId, KeyEvent, MediaPermissions, MenuModel, MouseEvent, Point, PrintSettings,
    Rect, Request, ScreenInfo, ScriptDialogKind, Size, TerminationStatus, Transition,
};

use crate::session::Session;

/// Delegate for context menu events.
pub trait ContextMenuHandler: Send + Sync {
    /// A context menu is about to be shown; the model may be rewritten.
    fn on_before_context_menu(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _params: &ContextMenuParams,
        _model: &mut MenuModel,
    ) {
    }

    /// A menu command was selected. Return true if handled.
    fn on_context_menu_command(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _params: &ContextMenuParams,
        _command_id: i32,
    ) -> bool {
        false
    }

    /// The context menu was dismissed without a selection.
    fn on_context_menu_dismissed(&self, _session: &Arc<dyn Session>, _frame: FrameId) {}
}

/// Delegate for file chooser dialogs.
pub trait DialogHandler: Send + Sync {
    /// A file dialog was requested. Return true to take over presentation.
    fn on_file_dialog(
        &self,
        _session: &Arc<dyn Session>,
        _mode: FileDialogMode,
        _title: &str,
        _default_path: &str,
        _accept_filters: &[String],
    ) -> bool {
        false
    }
}

/// Delegate for display state changes.
pub trait DisplayHandler: Send + Sync {
    /// The address of a frame changed.
    fn on_address_change(&self, _session: &Arc<dyn Session>, _frame: FrameId, _url: &str) {}

    /// The page title changed.
    fn on_title_change(&self, _session: &Arc<dyn Session>, _title: &str) {}

    /// A tooltip is about to be shown. Return true to suppress the default.
    fn on_tooltip(&self, _session: &Arc<dyn Session>, _text: &str) -> bool {
        false
    }

    /// The status message changed.
    fn on_status_message(&self, _session: &Arc<dyn Session>, _value: &str) {}

    /// A console message was logged. Return true to suppress default output.
    fn on_console_message(
        &self,
        _session: &Arc<dyn Session>,
        _severity: ConsoleSeverity,
        _message: &str,
        _source: &str,
        _line: i32,
    ) -> bool {
        false
    }

    /// The cursor changed. Return true to suppress the default cursor.
    fn on_cursor_change(&self, _session: &Arc<dyn Session>, _cursor_type: i32) -> bool {
        false
    }
}

/// Delegate for download events.
pub trait DownloadHandler: Send + Sync {
    /// A download is about to begin.
    fn on_before_download(
        &self,
        _session: &Arc<dyn Session>,
        _item: &DownloadItem,
        _suggested_name: &str,
    ) {
    }

    /// A download's state was updated.
    fn on_download_updated(&self, _session: &Arc<dyn Session>, _item: &DownloadItem) {}
}

/// Delegate for drag events entering a session.
pub trait DragHandler: Send + Sync {
    /// Dragged data entered the session. Return true to cancel the drag.
    fn on_drag_enter(
        &self,
        _session: &Arc<dyn Session>,
        _data: &DragData,
        _mask: DragOperations,
    ) -> bool {
        false
    }
}

/// Delegate for focus hand-off events.
pub trait FocusHandler: Send + Sync {
    /// The session is releasing focus in the given traversal direction.
    fn on_take_focus(&self, _session: &Arc<dyn Session>, _next: bool) {}

    /// The session requests focus. Return true if fully handled, in which
    /// case the arbiter will not additionally assert focus.
    fn on_set_focus(&self, _session: &Arc<dyn Session>, _source: FocusSource) -> bool {
        false
    }

    /// The session received focus.
    fn on_got_focus(&self, _session: &Arc<dyn Session>) {}
}

/// Delegate for media access permission requests.
pub trait MediaAccessHandler: Send + Sync {
    /// A page requests media capture permissions. Return true if the
    /// request is being handled (granted or denied asynchronously).
    fn on_media_access_request(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _requesting_url: &str,
        _permissions: MediaPermissions,
    ) -> bool {
        false
    }
}

/// Delegate for script-initiated dialogs.
pub trait ScriptDialogHandler: Send + Sync {
    /// A script dialog was requested. Set `suppress` to drop it silently;
    /// return true to take over presentation.
    fn on_script_dialog(
        &self,
        _session: &Arc<dyn Session>,
        _origin_url: &str,
        _kind: ScriptDialogKind,
        _message: &str,
        _default_prompt: &str,
        _suppress: &mut bool,
    ) -> bool {
        false
    }

    /// A before-unload confirmation was requested. Return true to take over.
    fn on_before_unload_dialog(
        &self,
        _session: &Arc<dyn Session>,
        _message: &str,
        _is_reload: bool,
    ) -> bool {
        false
    }

    /// Pending dialog state should be reset (navigation occurred).
    fn on_reset_dialog_state(&self, _session: &Arc<dyn Session>) {}

    /// The dialog was closed.
    fn on_dialog_closed(&self, _session: &Arc<dyn Session>) {}
}

/// Delegate for keyboard events.
pub trait KeyboardHandler: Send + Sync {
    /// A key event is about to be sent to the renderer. Set
    /// `is_shortcut` to reserve it as a shortcut; return true to consume.
    fn on_pre_key_event(
        &self,
        _session: &Arc<dyn Session>,
        _event: &KeyEvent,
        _is_shortcut: &mut bool,
    ) -> bool {
        false
    }

    /// A key event was not consumed by the renderer. Return true to consume.
    fn on_key_event(&self, _session: &Arc<dyn Session>, _event: &KeyEvent) -> bool {
        false
    }
}

/// Subscriber for session lifecycle events.
///
/// Unlike the single-owner categories, any number of lifecycle subscribers
/// may register; every event fans out to all of them in registration order.
pub trait LifecycleHandler: Send + Sync {
    /// A popup is about to open from `session`. Return true to veto it.
    /// Answers from all subscribers are OR-ed together.
    fn on_before_popup(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _target_url: &str,
        _target_frame_name: &str,
    ) -> bool {
        false
    }

    /// A session finished creation and is now tracked.
    fn on_after_created(&self, _session: &Arc<dyn Session>) {}

    /// A session was reparented to a different UI container.
    fn on_after_reparented(&self, _session: &Arc<dyn Session>) {}

    /// The session asks whether closure should be deferred. Subscriber
    /// answers are advisory; the dispatcher returns the session's own
    /// answer.
    fn do_close(&self, _session: &Arc<dyn Session>) -> bool {
        false
    }

    /// The session is about to be destroyed.
    fn on_before_close(&self, _session: &Arc<dyn Session>) {}
}

/// Delegate for page load progress events.
pub trait LoadHandler: Send + Sync {
    /// Loading started or stopped.
    fn on_loading_state_change(
        &self,
        _session: &Arc<dyn Session>,
        _is_loading: bool,
        _can_go_back: bool,
        _can_go_forward: bool,
    ) {
    }

    /// A frame began loading.
    fn on_load_start(&self, _session: &Arc<dyn Session>, _frame: FrameId, _transition: Transition) {
    }

    /// A frame finished loading.
    fn on_load_end(&self, _session: &Arc<dyn Session>, _frame: FrameId, _http_status: i32) {}

    /// A frame failed to load.
    fn on_load_error(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _error_code: i32,
        _error_text: &str,
        _failed_url: &str,
    ) {
    }
}

/// Delegate for print events.
pub trait PrintHandler: Send + Sync {
    /// Printing was initiated for the session.
    fn on_print_start(&self, _session: &Arc<dyn Session>) {}

    /// Settings are being negotiated; the handler may rewrite them.
    fn on_print_settings(
        &self,
        _session: &Arc<dyn Session>,
        _settings: &mut PrintSettings,
        _get_defaults: bool,
    ) {
    }

    /// A print dialog was requested. Return true to take over presentation.
    fn on_print_dialog(&self, _session: &Arc<dyn Session>, _has_selection: bool) -> bool {
        false
    }

    /// A print job was submitted. Return true if the job is being handled.
    fn on_print_job(
        &self,
        _session: &Arc<dyn Session>,
        _document_name: &str,
        _pdf_path: &str,
    ) -> bool {
        false
    }

    /// Pending print state should be reset.
    fn on_print_reset(&self, _session: &Arc<dyn Session>) {}

    /// Paper size for PDF printing at the given density, if the handler
    /// wants to override the engine default.
    fn pdf_paper_size(&self, _session: &Arc<dyn Session>, _device_units_per_inch: i32) -> Option<Size> {
        None
    }
}

/// Delegate for navigation and network request events.
pub trait RequestHandler: Send + Sync {
    /// Navigation is about to occur. Return true to cancel it.
    fn on_before_browse(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _request: &Request,
        _user_gesture: bool,
        _is_redirect: bool,
    ) -> bool {
        false
    }

    /// A URL is about to open in a new tab. Return true to cancel.
    fn on_open_url_from_tab(
        &self,
        _session: &Arc<dyn Session>,
        _frame: FrameId,
        _target_url: &str,
        _user_gesture: bool,
    ) -> bool {
        false
    }

    /// Authentication credentials are required. Return true if the request
    /// is being handled.
    #[allow(clippy::too_many_arguments)]
    fn auth_credentials(
        &self,
        _session: &Arc<dyn Session>,
        _origin_url: &str,
        _is_proxy: bool,
        _host: &str,
        _port: i32,
        _realm: &str,
        _scheme: &str,
    ) -> bool {
        false
    }

    /// A page requests a larger storage quota. Return true if the request
    /// is being handled (granted or denied asynchronously).
    fn on_quota_request(
        &self,
        _session: &Arc<dyn Session>,
        _origin_url: &str,
        _new_size: i64,
    ) -> bool {
        false
    }

    /// A certificate error occurred. Return true if handled.
    fn on_certificate_error(
        &self,
        _session: Option<&Arc<dyn Session>>,
        _cert_error: i32,
        _request_url: &str,
    ) -> bool {
        false
    }

    /// A plugin in the session's render process crashed.
    fn on_plugin_crashed(&self, _session: Option<&Arc<dyn Session>>, _plugin_path: &str) {}

    /// The render process for the session terminated abnormally.
    fn on_render_process_terminated(
        &self,
        _session: Option<&Arc<dyn Session>>,
        _status: TerminationStatus,
    ) {
    }
}

/// Per-session delegate for off-screen rendering events.
///
/// Obtained from the session itself, not from a host-level slot: each
/// off-screen session carries its own rendering surface.
pub trait RenderDelegate: Send + Sync {
    /// The rectangle the view occupies, in screen coordinates.
    fn view_rect(&self, session: &Arc<dyn Session>) -> Rect;

    /// Translate a view coordinate to a screen coordinate.
    fn screen_point(&self, _session: &Arc<dyn Session>, view_point: Point) -> Point {
        view_point
    }

    /// The device scale factor of the screen the view is on.
    fn device_scale_factor(&self, _session: &Arc<dyn Session>) -> f64 {
        1.0
    }

    /// A popup widget was shown or hidden.
    fn on_popup_show(&self, _session: &Arc<dyn Session>, _show: bool) {}

    /// A popup widget was resized.
    fn on_popup_size(&self, _session: &Arc<dyn Session>, _rect: Rect) {}

    /// A frame of pixels is ready.
    fn on_paint(
        &self,
        _session: &Arc<dyn Session>,
        _popup: bool,
        _dirty_rects: &[Rect],
        _buffer: &[u8],
        _size: Size,
    ) {
    }

    /// The user started dragging content out of the view. Return true if
    /// the drag is being handled.
    fn start_dragging(
        &self,
        _session: &Arc<dyn Session>,
        _data: &DragData,
        _allowed: DragOperations,
        _start: Point,
    ) -> bool {
        false
    }

    /// The drag cursor changed during an in-view drag.
    fn update_drag_cursor(&self, _session: &Arc<dyn Session>, _operation: DragOperations) {}

    /// Information about the screen the view is on, if known.
    fn screen_info(&self, _session: &Arc<dyn Session>) -> Option<ScreenInfo> {
        None
    }

    /// A cursor change that the display handler declined. Return true to
    /// suppress the default cursor.
    fn on_cursor_change(&self, _session: &Arc<dyn Session>, _cursor_type: i32) -> bool {
        false
    }
}

/// Per-session delegate for windowed rendering events.
pub trait WindowDelegate: Send + Sync {
    /// The rectangle the window occupies.
    fn window_rect(&self, _session: &Arc<dyn Session>) -> Rect {
        Rect::zero()
    }

    /// A low-level mouse event targeting the window.
    fn on_mouse_event(&self, _session: &Arc<dyn Session>, _event: &MouseEvent) {}
}
