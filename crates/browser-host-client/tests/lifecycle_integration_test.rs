//! Integration tests for session lifecycle tracking and host disposal.

use std::sync::Arc;

use browser_host_client::testing::{
    CountingDisposalObserver, EventLog, MockFactory, MockSession, RecordingLifecycleHandler,
};
use browser_host_client::{Session, SessionHost};
use browser_host_core::{
    DirectMarshal, Error, FocusChangeBus, FrameId, HostConfig, SessionDescriptor, SessionId,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

fn new_host() -> Arc<SessionHost> {
    SessionHost::new(
        HostConfig::default(),
        Arc::new(DirectMarshal),
        None,
        Arc::new(FocusChangeBus::new()),
    )
}

#[test]
fn test_full_lifecycle_with_two_subscribers() {
    init_tracing();
    let host = new_host();
    let log = EventLog::new();
    host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "first"));
    host.add_lifecycle_handler(RecordingLifecycleHandler::new(&log, "second"));

    let observer = CountingDisposalObserver::new();
    host.set_disposal_observer(observer.clone());

    // three sessions finish creation
    let sessions: Vec<Arc<MockSession>> = (1..=3)
        .map(|raw| {
            let mock = MockSession::with_ui(SessionId::new(raw));
            mock.wire_close_to(&host);
            host.on_after_created(Some(&mock.as_session()));
            mock
        })
        .collect();
    assert_eq!(host.session_count(), 3);

    // one closes normally before disposal
    host.on_before_close(Some(&sessions[1].as_session()));
    assert_eq!(host.session_count(), 2);
    assert!(sessions[1].before_close_notified());
    assert_eq!(observer.count(), 0);

    // disposal drains the remaining two and tears down exactly once
    host.dispose();
    assert!(host.is_disposed());
    assert_eq!(host.session_count(), 0);
    assert!(sessions[0].before_close_notified());
    assert!(sessions[2].before_close_notified());
    assert_eq!(observer.count(), 1);

    // every event reached both subscribers, in registration order
    let entries = log.entries();
    assert_eq!(
        &entries[..2],
        &["first:after-created:1", "second:after-created:1"]
    );
    let close_events: Vec<&String> = entries
        .iter()
        .filter(|e| e.contains("before-close"))
        .collect();
    assert_eq!(close_events.len(), 6); // 3 sessions x 2 subscribers

    host.dispose();
    assert_eq!(observer.count(), 1);
}

#[test]
fn test_creation_rejected_after_dispose() {
    let host = new_host();
    let factory = MockFactory::new();
    host.dispose();

    let result = host.create_session(&factory, &SessionDescriptor::windowed("https://example.com"));
    assert!(matches!(result, Err(Error::HostDisposed)));
    assert!(factory.created().is_empty());
}

#[test]
fn test_disposal_converges_on_late_close() {
    // a session that ignores the force-close request keeps the host alive
    // until its close event finally arrives
    let host = new_host();
    let observer = CountingDisposalObserver::new();
    host.set_disposal_observer(observer.clone());

    let straggler = MockSession::new(SessionId::new(1));
    host.on_after_created(Some(&straggler.as_session()));

    host.dispose();
    assert!(host.is_disposed());
    assert_eq!(straggler.close_requests(), vec![true]);
    // the close has not arrived back yet: no teardown
    assert_eq!(host.session_count(), 1);
    assert_eq!(observer.count(), 0);

    // the engine finally delivers the close
    host.on_before_close(Some(&straggler.as_session()));
    assert_eq!(host.session_count(), 0);
    assert_eq!(observer.count(), 1);
}

#[test]
fn test_session_created_after_dispose_is_reaped() {
    let host = new_host();
    let observer = CountingDisposalObserver::new();
    host.set_disposal_observer(observer.clone());
    host.dispose();
    assert_eq!(observer.count(), 1);

    // a creation that was already in flight completes on the disposed host
    let late = MockSession::new(SessionId::new(9));
    late.wire_close_to(&host);
    host.on_after_created(Some(&late.as_session()));

    assert_eq!(host.session_count(), 0);
    assert_eq!(late.close_requests(), vec![true]);
    // teardown already happened; it does not repeat
    assert_eq!(observer.count(), 1);
}

#[test]
fn test_popup_and_tab_navigation_vetoed_after_dispose() {
    let host = new_host();
    let session = MockSession::new(SessionId::new(1)).as_session();

    assert!(!host.on_before_popup(Some(&session), FrameId::new(0), "https://a/", ""));
    assert!(!host.on_open_url_from_tab(Some(&session), FrameId::new(0), "https://a/", true));

    host.dispose();

    assert!(host.on_before_popup(Some(&session), FrameId::new(0), "https://a/", ""));
    assert!(host.on_open_url_from_tab(Some(&session), FrameId::new(0), "https://a/", true));
}

#[test]
fn test_concurrent_lifecycle_events() {
    use std::thread;

    let host = new_host();
    let observer = CountingDisposalObserver::new();
    host.set_disposal_observer(observer.clone());

    let mut handles = Vec::new();
    for t in 0..4 {
        let host = Arc::clone(&host);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                let id = SessionId::new(t * 50 + i);
                let mock = MockSession::new(id);
                let session = mock.as_session();
                host.on_after_created(Some(&session));
                host.on_before_close(Some(&session));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(host.session_count(), 0);
    assert_eq!(observer.count(), 0);

    host.dispose();
    assert_eq!(observer.count(), 1);
}

#[test]
fn test_factory_sessions_flow_through_host() {
    let host = new_host();
    let factory = MockFactory::new();

    let session = host
        .create_session(&factory, &SessionDescriptor::offscreen("https://example.com"))
        .unwrap();
    // not tracked until the engine reports creation finished
    assert_eq!(host.session_count(), 0);

    host.on_after_created(Some(&session));
    assert_eq!(host.session_count(), 1);
    assert!(host.session(session.id()).is_some());

    host.on_before_close(Some(&session));
    assert_eq!(host.session_count(), 0);
}
