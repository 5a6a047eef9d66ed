use crate::integration::{config_for, create_test_session, init_tracing};
use crate::utils::{
    EVENT_TIMEOUT_MS, EngineCall, count_method, members_frame, offer_frame, stream, wait_until,
};
use roomcast_core::SessionEvent;

#[tokio::test]
async fn test_staged_media_is_attached_to_new_peers() {
    init_tracing();

    let mut t = create_test_session(config_for("me"));
    t.session.add_media(stream("cam", &["v1", "a1"])).await.unwrap();
    t.session.add_media(stream("mic", &["a2"])).await.unwrap();
    t.session.remove_media(&stream("mic", &[])).await.unwrap();
    t.session.start().unwrap();

    assert!(
        t.events
            .wait_for(1, |e| *e == SessionEvent::ChannelOpen, EVENT_TIMEOUT_MS)
            .await
    );
    let channel = t.connector.latest();
    channel.push(members_frame(&["a"]));
    channel.push(offer_frame("b"));
    assert!(wait_until(|| count_method(&channel.sent_frames(), "sdp") == 2, EVENT_TIMEOUT_MS).await);

    let a = t.factory.peer("a").unwrap();
    assert_eq!(
        a.calls(),
        vec![
            EngineCall::AddTrack {
                track_id: "v1".to_owned(),
                stream_id: "cam".to_owned()
            },
            EngineCall::AddTrack {
                track_id: "a1".to_owned(),
                stream_id: "cam".to_owned()
            },
            EngineCall::CreateOffer,
            EngineCall::SetLocal(roomcast_core::SdpType::Offer),
        ]
    );

    // Peers created by an inbound offer get the same tracks.
    assert_eq!(t.factory.peer("b").unwrap().sender_tracks(), vec!["v1", "a1"]);

    t.shutdown().await;
}
