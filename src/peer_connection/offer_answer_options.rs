/// OfferOptions structure describes the options used to control the offer
/// creation process
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
pub struct RTCOfferOptions {
    /// offer_to_receive_audio asks for an audio section the remote side may
    /// send on, even when nothing local is sent.
    pub offer_to_receive_audio: bool,

    /// offer_to_receive_video asks for a receivable video section.
    pub offer_to_receive_video: bool,
}
