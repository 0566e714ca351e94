use std::fmt;

/// NegotiationState tracks where a session is in its offer/answer cycle.
///
/// `Active` re-enters `OfferPending` on renegotiation. `Ended` is terminal.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum NegotiationState {
    #[default]
    Unspecified = 0,

    /// Idle indicates no offer was produced yet.
    Idle,

    /// OfferPending indicates an offer is being prepared: capture, stream
    /// attachment and description generation.
    OfferPending,

    /// GatheringCandidates indicates the local offer was applied and the
    /// session waits, bounded, for candidate gathering to finish.
    GatheringCandidates,

    /// Offered indicates an offer was handed out and an answer is awaited.
    Offered,

    /// Answered indicates the remote answer was applied.
    Answered,

    /// Active indicates the answer was processed and observers notified.
    Active,

    Ended,
}

const NEGOTIATION_STATE_IDLE_STR: &str = "idle";
const NEGOTIATION_STATE_OFFER_PENDING_STR: &str = "offer-pending";
const NEGOTIATION_STATE_GATHERING_CANDIDATES_STR: &str = "gathering-candidates";
const NEGOTIATION_STATE_OFFERED_STR: &str = "offered";
const NEGOTIATION_STATE_ANSWERED_STR: &str = "answered";
const NEGOTIATION_STATE_ACTIVE_STR: &str = "active";
const NEGOTIATION_STATE_ENDED_STR: &str = "ended";

impl From<&str> for NegotiationState {
    fn from(raw: &str) -> Self {
        match raw {
            NEGOTIATION_STATE_IDLE_STR => NegotiationState::Idle,
            NEGOTIATION_STATE_OFFER_PENDING_STR => NegotiationState::OfferPending,
            NEGOTIATION_STATE_GATHERING_CANDIDATES_STR => NegotiationState::GatheringCandidates,
            NEGOTIATION_STATE_OFFERED_STR => NegotiationState::Offered,
            NEGOTIATION_STATE_ANSWERED_STR => NegotiationState::Answered,
            NEGOTIATION_STATE_ACTIVE_STR => NegotiationState::Active,
            NEGOTIATION_STATE_ENDED_STR => NegotiationState::Ended,
            _ => NegotiationState::Unspecified,
        }
    }
}

impl From<u8> for NegotiationState {
    fn from(v: u8) -> Self {
        match v {
            1 => NegotiationState::Idle,
            2 => NegotiationState::OfferPending,
            3 => NegotiationState::GatheringCandidates,
            4 => NegotiationState::Offered,
            5 => NegotiationState::Answered,
            6 => NegotiationState::Active,
            7 => NegotiationState::Ended,
            _ => NegotiationState::Unspecified,
        }
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            NegotiationState::Idle => NEGOTIATION_STATE_IDLE_STR,
            NegotiationState::OfferPending => NEGOTIATION_STATE_OFFER_PENDING_STR,
            NegotiationState::GatheringCandidates => NEGOTIATION_STATE_GATHERING_CANDIDATES_STR,
            NegotiationState::Offered => NEGOTIATION_STATE_OFFERED_STR,
            NegotiationState::Answered => NEGOTIATION_STATE_ANSWERED_STR,
            NegotiationState::Active => NEGOTIATION_STATE_ACTIVE_STR,
            NegotiationState::Ended => NEGOTIATION_STATE_ENDED_STR,
            NegotiationState::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}
