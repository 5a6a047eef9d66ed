use roomcast_core::{Operation, SessionEvent};

use crate::integration::{config_for, init_tracing, start_test_session};
use crate::utils::{EVENT_TIMEOUT_MS, count_method, ping_frame, wait_until};

#[tokio::test]
async fn test_unknown_method_does_not_stop_dispatch() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push(r#"{"method":"unknown","args":{}}"#);
    channel.push(ping_frame());

    assert!(wait_until(|| count_method(&channel.sent_frames(), "pong") == 1, EVENT_TIMEOUT_MS).await);

    let errors = t.events.errors(Operation::DecodeFrame);
    assert_eq!(errors.len(), 1);
    let SessionEvent::Error {
        session_key,
        message,
        ..
    } = &errors[0]
    else {
        unreachable!();
    };
    assert!(session_key.is_none());
    assert!(message.contains("unknown"), "unexpected message: {message}");

    assert!(!channel.is_closed());
    assert_eq!(
        t.events.count(|e| matches!(e, SessionEvent::ChannelClose { .. })),
        0
    );

    t.shutdown().await;
}

#[tokio::test]
async fn test_malformed_frames_are_reported() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push("{not json");
    channel.push("[1, 2, 3]");
    channel.push(r#"{"method":"sdp","args":{"dst":"me"}}"#);
    channel.push(ping_frame());

    assert!(wait_until(|| count_method(&channel.sent_frames(), "pong") == 1, EVENT_TIMEOUT_MS).await);
    assert_eq!(t.events.errors(Operation::DecodeFrame).len(), 3);
    assert_eq!(t.factory.created_count(), 0);

    t.shutdown().await;
}

#[tokio::test]
async fn test_undecodable_frame_is_reported() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push_undecodable("binary frame is not valid UTF-8");
    channel.push(ping_frame());

    assert!(wait_until(|| count_method(&channel.sent_frames(), "pong") == 1, EVENT_TIMEOUT_MS).await);
    let errors = t.events.errors(Operation::DecodeFrame);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].session_key().is_none());
    assert!(!channel.is_closed());

    t.shutdown().await;
}
