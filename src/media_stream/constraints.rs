pub use webrtc_constraints::{
    BoolOrMediaTrackConstraints, MediaStreamConstraints, MediaTrackConstraints,
};

/// MediaIntent is a desired-state write for the audio or video attribute:
/// either a plain flag or a constraint, which implies the kind is wanted.
pub type MediaIntent = BoolOrMediaTrackConstraints;

/// TrackConstraint is the stored capture constraint of one media kind.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum TrackConstraint {
    /// Any device of the kind is acceptable.
    #[default]
    Any,
    Constrained(MediaTrackConstraints),
}

/// normalize_intent folds a write into the stored `(desired, constraint)`
/// pair. A plain flag keeps the current constraint; a constraint forces the
/// flag on and replaces the stored constraint.
pub fn normalize_intent(intent: MediaIntent, current: &TrackConstraint) -> (bool, TrackConstraint) {
    match intent {
        MediaIntent::Bool(enabled) => (enabled, current.clone()),
        MediaIntent::Constraints(c) => (true, TrackConstraint::Constrained(c)),
    }
}

/// intent_from_state renders a stored pair back into the capture request shape.
pub fn intent_from_state(desired: bool, constraint: &TrackConstraint) -> MediaIntent {
    match (desired, constraint) {
        (false, _) => MediaIntent::Bool(false),
        (true, TrackConstraint::Any) => MediaIntent::Bool(true),
        (true, TrackConstraint::Constrained(c)) => MediaIntent::Constraints(c.clone()),
    }
}

pub fn intent_enabled(intent: &MediaIntent) -> bool {
    !matches!(intent, MediaIntent::Bool(false))
}

/// wants_any reports whether a capture request asks for any kind at all.
pub fn wants_any(constraints: &MediaStreamConstraints) -> bool {
    intent_enabled(&constraints.audio) || intent_enabled(&constraints.video)
}
