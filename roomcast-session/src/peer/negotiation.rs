use crate::engine::NegotiationEngine;
use crate::error::EngineError;
use crate::peer::PeerEntry;
use roomcast_core::{IceCandidateInit, Operation, SessionDescription, SessionKey};
use tracing::{debug, info};

/// Offer/answer progress with one peer.
///
/// ```text
/// Idle -> OfferSent -> Stable      (local offer, remote answer)
/// Idle -> AnswerSent -> Stable     (remote offer, local answer)
/// ```
///
/// Renegotiation re-enters `OfferSent` from any state. A failed answer
/// drops `OfferSent` back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    OfferSent,
    AnswerSent,
    Stable,
}

/// Engine failure tagged with the negotiation step that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationFailure {
    pub operation: Operation,
    pub error: EngineError,
}

impl NegotiationFailure {
    fn at(operation: Operation) -> impl FnOnce(EngineError) -> Self {
        move |error| Self { operation, error }
    }
}

/// Result of applying a remote description.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// An answer (or provisional answer) was applied.
    Applied,
    /// A remote offer was applied; the local answer must be sent back.
    Answer(SessionDescription),
    /// A colliding offer lost the tie-break and was dropped.
    Ignored,
}

impl<E: NegotiationEngine> PeerEntry<E> {
    /// Creates an offer and applies it locally. The caller sends it.
    pub async fn create_local_offer(&mut self) -> Result<SessionDescription, NegotiationFailure> {
        let offer = self
            .engine()
            .create_offer()
            .await
            .map_err(NegotiationFailure::at(Operation::CreateOffer))?;

        self.engine()
            .set_local_description(offer.clone())
            .await
            .map_err(NegotiationFailure::at(Operation::SetLocalDescription))?;

        self.state = NegotiationState::OfferSent;
        self.renegotiate_pending = false;
        Ok(offer)
    }

    /// Applies a description received from this peer.
    ///
    /// When both sides have an offer in flight, the side with the smaller
    /// session key keeps its own offer; the other side rolls back, answers,
    /// and offers again once the answer is out.
    pub async fn accept_remote_description(
        &mut self,
        own_key: &SessionKey,
        desc: SessionDescription,
    ) -> Result<RemoteOutcome, NegotiationFailure> {
        let is_offer = desc.is_offer();

        if is_offer && self.state == NegotiationState::OfferSent {
            if own_key < self.session_key() {
                info!("Offer collision with {}: keeping local offer", self.session_key());
                return Ok(RemoteOutcome::Ignored);
            }

            info!("Offer collision with {}: rolling back local offer", self.session_key());
            self.engine()
                .set_local_description(SessionDescription::rollback())
                .await
                .map_err(NegotiationFailure::at(Operation::SetLocalDescription))?;
            self.state = NegotiationState::Idle;
            self.renegotiate_pending = true;
        }

        let is_answer = desc.is_answer();
        if let Err(e) = self.engine().set_remote_description(desc).await {
            if self.state == NegotiationState::OfferSent {
                self.state = NegotiationState::Idle;
            }
            return Err(NegotiationFailure::at(Operation::SetRemoteDescription)(e));
        }

        if !is_offer {
            if is_answer {
                debug!("Negotiation with {} complete", self.session_key());
                self.state = NegotiationState::Stable;
            }
            return Ok(RemoteOutcome::Applied);
        }

        let answer = self
            .engine()
            .create_answer()
            .await
            .map_err(NegotiationFailure::at(Operation::CreateAnswer))?;

        self.engine()
            .set_local_description(answer.clone())
            .await
            .map_err(NegotiationFailure::at(Operation::SetLocalDescription))?;

        self.state = NegotiationState::AnswerSent;
        Ok(RemoteOutcome::Answer(answer))
    }

    /// Marks a sent answer as settling the exchange. Returns `true` when a
    /// rolled-back local offer has to be sent now.
    pub fn answer_delivered(&mut self) -> bool {
        if self.state == NegotiationState::AnswerSent {
            self.state = NegotiationState::Stable;
        }
        std::mem::take(&mut self.renegotiate_pending)
    }

    pub async fn add_remote_candidate(
        &self,
        candidate: IceCandidateInit,
    ) -> Result<(), NegotiationFailure> {
        self.engine()
            .add_ice_candidate(candidate)
            .await
            .map_err(NegotiationFailure::at(Operation::AddIceCandidate))
    }
}
