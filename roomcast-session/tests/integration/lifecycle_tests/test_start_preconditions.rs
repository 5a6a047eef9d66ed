use std::sync::Arc;

use roomcast_session::{Session, SessionConfig, SessionError};

use crate::integration::{config_for, create_test_session, init_tracing};
use crate::utils::{MockConnector, MockEngineFactory};

#[tokio::test]
async fn test_start_without_handler_fails() {
    init_tracing();

    let connector = MockConnector::new();
    let mut session = Session::new(
        config_for("me"),
        Arc::new(connector.clone()),
        MockEngineFactory::new(),
    )
    .unwrap();

    assert_eq!(session.start(), Err(SessionError::MissingEventHandler));
    assert!(!session.is_started());
    assert_eq!(connector.open_count(), 0);

    // Still startable once a handler is registered.
    session.set_event_handler(|_| {});
    assert_eq!(session.start(), Ok(()));
    session.stop();
    session.join().await;
}

#[tokio::test]
async fn test_start_twice_fails() {
    init_tracing();

    let mut t = create_test_session(config_for("me"));

    assert_eq!(t.session.start(), Ok(()));
    assert_eq!(t.session.start(), Err(SessionError::AlreadyStarted));

    t.shutdown().await;
}

#[tokio::test]
async fn test_invalid_auth_token_is_rejected() {
    let result = Session::new(
        SessionConfig::with_auth_token("signal.test/ws", "not-a-token"),
        Arc::new(MockConnector::new()),
        MockEngineFactory::new(),
    );

    assert!(matches!(result, Err(SessionError::InvalidAuthToken(_))));
}

#[tokio::test]
async fn test_endpoint_carries_credential() {
    init_tracing();

    let t = crate::integration::start_test_session(config_for("alice")).await;

    assert_eq!(t.session.session_key().as_str(), "alice");
    assert_eq!(t.connector.latest().url, "wss://signal.test/ws?sessionKey=alice");

    t.shutdown().await;
}
