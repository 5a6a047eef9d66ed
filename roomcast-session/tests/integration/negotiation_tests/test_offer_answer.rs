use roomcast_core::{Operation, SdpType, SessionEvent};

use crate::integration::{config_for, init_tracing, start_test_session};
use crate::utils::{
    EVENT_TIMEOUT_MS, EngineCall, answer_frame, candidate_frame, count_method, members_frame,
    offer_frame, ping_frame, sdp_frames_to, wait_until,
};

#[tokio::test]
async fn test_members_offer_sequence() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push(members_frame(&["a"]));
    assert!(wait_until(|| count_method(&channel.sent_frames(), "sdp") == 1, EVENT_TIMEOUT_MS).await);

    let peer = t.factory.peer("a").unwrap();
    assert_eq!(
        peer.calls(),
        vec![EngineCall::CreateOffer, EngineCall::SetLocal(SdpType::Offer)]
    );

    let offer = &sdp_frames_to(&channel.sent_frames(), "a", "offer")[0];
    assert_eq!(offer["args"]["sdp"]["sdp"], "offer-to-a");

    t.shutdown().await;
}

#[tokio::test]
async fn test_remote_offer_is_answered() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push(offer_frame("bob"));
    assert!(wait_until(|| count_method(&channel.sent_frames(), "sdp") == 1, EVENT_TIMEOUT_MS).await);

    let peer = t.factory.peer("bob").unwrap();
    assert_eq!(
        peer.calls(),
        vec![
            EngineCall::SetRemote(SdpType::Offer),
            EngineCall::CreateAnswer,
            EngineCall::SetLocal(SdpType::Answer),
        ]
    );

    let answers = sdp_frames_to(&channel.sent_frames(), "bob", "answer");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["args"]["sdp"]["sdp"], "answer-to-bob");
    assert!(t.events.contains(&SessionEvent::PeerEnterRoom {
        session_key: "bob".into()
    }));

    t.shutdown().await;
}

#[tokio::test]
async fn test_remote_answer_completes_negotiation() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push(members_frame(&["a"]));
    channel.push(answer_frame("a"));
    channel.push(ping_frame());
    assert!(wait_until(|| count_method(&channel.sent_frames(), "pong") == 1, EVENT_TIMEOUT_MS).await);

    let peer = t.factory.peer("a").unwrap();
    assert_eq!(peer.calls().last(), Some(&EngineCall::SetRemote(SdpType::Answer)));
    assert_eq!(count_method(&channel.sent_frames(), "sdp"), 1);

    t.shutdown().await;
}

#[tokio::test]
async fn test_remote_candidate_is_added() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();

    channel.push(candidate_frame("a", "candidate:1 1 UDP 5 10.0.0.1 9 typ host"));
    assert!(wait_until(|| t.factory.peer("a").is_some_and(|p| !p.calls().is_empty()), EVENT_TIMEOUT_MS).await);

    assert_eq!(
        t.factory.peer("a").unwrap().calls(),
        vec![EngineCall::AddCandidate(
            "candidate:1 1 UDP 5 10.0.0.1 9 typ host".to_owned()
        )]
    );

    t.shutdown().await;
}

#[tokio::test]
async fn test_negotiation_failures_are_reported_and_peer_kept() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    t.factory.fail_on("create_answer");
    t.factory.fail_on("add_ice_candidate");
    let channel = t.connector.latest();

    channel.push(offer_frame("bob"));
    channel.push(candidate_frame("bob", "candidate:2"));
    channel.push(ping_frame());
    assert!(wait_until(|| count_method(&channel.sent_frames(), "pong") == 1, EVENT_TIMEOUT_MS).await);

    let answer_errors = t.events.errors(Operation::CreateAnswer);
    assert_eq!(answer_errors.len(), 1);
    assert_eq!(answer_errors[0].session_key().map(|k| k.as_str()), Some("bob"));
    assert_eq!(t.events.errors(Operation::AddIceCandidate).len(), 1);

    assert_eq!(count_method(&channel.sent_frames(), "sdp"), 0);
    assert_eq!(t.factory.created_count(), 1);
    assert_eq!(
        t.events
            .count(|e| matches!(e, SessionEvent::PeerLeaveRoom { .. })),
        0
    );

    t.shutdown().await;
}

#[tokio::test]
async fn test_offer_failure_is_reported() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    t.factory.fail_on("set_local_description");
    let channel = t.connector.latest();

    channel.push(members_frame(&["a"]));
    assert!(
        t.events
            .wait_for(1, |e| matches!(e, SessionEvent::Error { .. }), EVENT_TIMEOUT_MS)
            .await
    );

    assert_eq!(t.events.errors(Operation::SetLocalDescription).len(), 1);
    assert!(channel.sent_frames().is_empty());

    t.shutdown().await;
}

#[tokio::test]
async fn test_announced_source_on_descriptions() {
    init_tracing();

    let mut config = config_for("me");
    config.announce_source = true;
    let t = start_test_session(config).await;
    let channel = t.connector.latest();

    channel.push(members_frame(&["a"]));
    assert!(wait_until(|| count_method(&channel.sent_frames(), "sdp") == 1, EVENT_TIMEOUT_MS).await);

    let offer = &sdp_frames_to(&channel.sent_frames(), "a", "offer")[0];
    assert_eq!(offer["args"]["src"], "me");

    t.shutdown().await;
}

#[tokio::test]
async fn test_send_failures_are_reported() {
    init_tracing();

    let t = start_test_session(config_for("me")).await;
    let channel = t.connector.latest();
    channel.reject_sends();

    channel.push(ping_frame());
    channel.push(members_frame(&["a"]));
    assert!(
        t.events
            .wait_for(2, |e| matches!(e, SessionEvent::Error { .. }), EVENT_TIMEOUT_MS)
            .await
    );

    let errors = t.events.errors(Operation::SendFrame);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].session_key(), None);
    assert_eq!(errors[1].session_key().map(|k| k.as_str()), Some("a"));

    // The channel itself is still up.
    assert_eq!(
        t.events.count(|e| matches!(e, SessionEvent::ChannelClose { .. })),
        0
    );

    t.shutdown().await;
}
