use std::time::Duration;

use crate::integration::{config_for, create_test_session, init_tracing};
use crate::utils::{ConnectMode, wait_until};

#[tokio::test(start_paused = true)]
async fn test_reconnect_delays_cycle() {
    init_tracing();

    let mut t = create_test_session(config_for("me"));
    t.connector.set_mode(ConnectMode::Refuse);
    t.session.start().unwrap();

    let connector = t.connector.clone();
    assert!(wait_until(|| connector.open_count() >= 8, 60_000).await);

    let opened: Vec<_> = connector.channels().iter().map(|c| c.opened_at).collect();
    let delays: Vec<u64> = opened
        .windows(2)
        .map(|w| (w[1] - w[0]).as_millis() as u64)
        .collect();

    assert_eq!(&delays[..7], &[500, 1000, 1500, 2000, 2500, 500, 1000]);

    t.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_uses_configured_step() {
    init_tracing();

    let mut config = config_for("me");
    config.reconnect.step_ms = 100;
    config.reconnect.max_ms = 300;

    let mut t = create_test_session(config);
    t.connector.set_mode(ConnectMode::Refuse);
    t.session.start().unwrap();

    let connector = t.connector.clone();
    assert!(wait_until(|| connector.open_count() >= 6, 10_000).await);

    let channels = connector.channels();
    let delays: Vec<Duration> = channels
        .windows(2)
        .map(|w| w[1].opened_at - w[0].opened_at)
        .take(5)
        .collect();

    assert_eq!(
        delays,
        [100, 200, 300, 100, 200].map(Duration::from_millis).to_vec()
    );

    t.shutdown().await;
}
