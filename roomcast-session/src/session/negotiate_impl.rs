use crate::engine::EngineFactory;
use crate::peer::{NegotiationFailure, RemoteOutcome};
use crate::session::SessionLoop;
use roomcast_core::{
    IceCandidateInit, Operation, OutboundSignal, SessionDescription, SessionKey,
};
use tracing::{debug, info};

impl<F: EngineFactory> SessionLoop<F> {
    /// Sends a fresh offer to `key`. Also used for renegotiation.
    pub(super) async fn initiate_offer(&mut self, key: &SessionKey) {
        let Some(entry) = self.peers.get_mut(key) else {
            return;
        };

        match entry.create_local_offer().await {
            Ok(offer) => {
                info!("Sending offer to {}", key);
                self.send_description(key.clone(), offer);
            }
            Err(failure) => self.report_failure(key, failure),
        }
    }

    pub(super) async fn handle_members(&mut self, members: Vec<SessionKey>) {
        info!("Room members: {:?}", members);
        for key in members {
            if key == self.session_key {
                continue;
            }
            if self.get_or_create(&key).await {
                self.initiate_offer(&key).await;
            }
        }
    }

    pub(super) async fn handle_sdp(&mut self, src: SessionKey, sdp: SessionDescription) {
        debug!("Received {} from {}", sdp.sdp_type, src);
        if !self.get_or_create(&src).await {
            return;
        }

        let own_key = self.session_key.clone();
        let Some(entry) = self.peers.get_mut(&src) else {
            return;
        };

        match entry.accept_remote_description(&own_key, sdp).await {
            Ok(RemoteOutcome::Answer(answer)) => {
                info!("Sending answer to {}", src);
                self.send_description(src.clone(), answer);
                let reoffer = self
                    .peers
                    .get_mut(&src)
                    .is_some_and(|entry| entry.answer_delivered());
                if reoffer {
                    info!("Resending offer to {} after collision", src);
                    self.initiate_offer(&src).await;
                }
            }
            Ok(RemoteOutcome::Applied) | Ok(RemoteOutcome::Ignored) => {}
            Err(failure) => self.report_failure(&src, failure),
        }
    }

    pub(super) async fn handle_candidate(&mut self, src: SessionKey, candidate: IceCandidateInit) {
        if !self.get_or_create(&src).await {
            return;
        }
        let Some(entry) = self.peers.get(&src) else {
            return;
        };

        let result = entry.add_remote_candidate(candidate).await;
        if let Err(failure) = result {
            self.report_failure(&src, failure);
        }
    }

    fn send_description(&mut self, dst: SessionKey, sdp: SessionDescription) {
        let src = self.announced_source();
        self.send(OutboundSignal::Sdp { src, dst, sdp });
    }

    /// Own key when outbound frames are configured to carry it.
    pub(super) fn announced_source(&self) -> Option<SessionKey> {
        self.config
            .announce_source
            .then(|| self.session_key.clone())
    }

    pub(super) fn send(&mut self, signal: OutboundSignal) {
        let dst = signal.dst().cloned();

        let result = match &self.channel {
            Some(channel) => signal
                .encode()
                .map_err(|e| e.to_string())
                .and_then(|frame| channel.send(frame).map_err(|e| e.to_string())),
            None => Err("signaling channel is not connected".to_owned()),
        };

        match result {
            Ok(()) => debug!("Sent {} frame", signal.method()),
            Err(message) => self.report(Operation::SendFrame, dst.as_ref(), message),
        }
    }

    fn report_failure(&mut self, key: &SessionKey, failure: NegotiationFailure) {
        self.report(failure.operation, Some(key), failure.error);
    }
}
