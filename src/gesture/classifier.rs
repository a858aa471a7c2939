use super::landmarks::{
    HAND_LANDMARK_COUNT, INDEX_PIP, INDEX_TIP, Landmark, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP,
};
use crate::command::Command;

/// Extended (true) or curled (false) state of the four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    /// Derive finger states from one hand observation.
    ///
    /// Returns `None` when the observation is missing landmarks.
    pub fn from_landmarks(hand: &[Landmark]) -> Option<Self> {
        if hand.len() < HAND_LANDMARK_COUNT {
            return None;
        }

        let extended = |tip: usize, pip: usize| -> Option<bool> {
            Some(hand.get(tip)?.y < hand.get(pip)?.y)
        };

        Some(Self {
            index: extended(INDEX_TIP, INDEX_PIP)?,
            middle: extended(MIDDLE_TIP, MIDDLE_PIP)?,
            ring: extended(RING_TIP, RING_PIP)?,
            pinky: extended(PINKY_TIP, PINKY_PIP)?,
        })
    }

    /// Map the finger pattern to a command.
    ///
    /// Patterns are checked in priority order: fist, index only, pinky only.
    /// Anything else is STOP.
    pub fn command(&self, speed: f64) -> Command {
        match (self.index, self.middle, self.ring, self.pinky) {
            (false, false, false, false) => Command::Stop,
            (true, false, false, false) => Command::advance(speed),
            (false, false, false, true) => Command::reverse(speed),
            _ => Command::Stop,
        }
    }
}

/// Classify a single hand. `None` means the hand could not be classified.
pub fn classify_hand(hand: &[Landmark], speed: f64) -> Option<Command> {
    FingerState::from_landmarks(hand).map(|fingers| fingers.command(speed))
}

/// Classify every hand the detector returned for one frame.
///
/// Only the first hand drives the robot. No hand, or a hand that cannot be
/// classified, yields STOP.
pub fn classify_frame(hands: &[Vec<Landmark>], speed: f64) -> Command {
    let Some(hand) = hands.first() else {
        return Command::Stop;
    };

    classify_hand(hand, speed).unwrap_or(Command::Stop)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::command::DEFAULT_SPEED;

    const TIP_UP: f32 = 0.2;
    const KNUCKLE: f32 = 0.5;
    const TIP_DOWN: f32 = 0.7;

    /// Build a 21-point hand with the given fingers extended
    pub(crate) fn hand(index: bool, middle: bool, ring: bool, pinky: bool) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, KNUCKLE); HAND_LANDMARK_COUNT];
        for (tip, extended) in [
            (INDEX_TIP, index),
            (MIDDLE_TIP, middle),
            (RING_TIP, ring),
            (PINKY_TIP, pinky),
        ] {
            points[tip].y = if extended { TIP_UP } else { TIP_DOWN };
        }
        points
    }

    fn classify_frame_default(hands: &[Vec<Landmark>]) -> Command {
        classify_frame(hands, DEFAULT_SPEED)
    }

    fn states() -> impl Iterator<Item = FingerState> {
        (0u8..16).map(|bits| FingerState {
            index: bits & 1 != 0,
            middle: bits & 2 != 0,
            ring: bits & 4 != 0,
            pinky: bits & 8 != 0,
        })
    }

    #[test]
    fn test_fist_is_stop() {
        assert_eq!(classify_frame_default(&[hand(false, false, false, false)]), Command::Stop);
    }

    #[test]
    fn test_index_up_is_advance() {
        assert_eq!(
            classify_frame_default(&[hand(true, false, false, false)]),
            Command::Advance { speed: DEFAULT_SPEED }
        );
    }

    #[test]
    fn test_pinky_up_is_reverse() {
        assert_eq!(
            classify_frame_default(&[hand(false, false, false, true)]),
            Command::Reverse { speed: DEFAULT_SPEED }
        );
    }

    #[test]
    fn test_two_or_more_fingers_is_stop() {
        for state in states() {
            let extended = [state.index, state.middle, state.ring, state.pinky]
                .iter()
                .filter(|f| **f)
                .count();
            if extended >= 2 {
                assert_eq!(state.command(DEFAULT_SPEED), Command::Stop, "{:?}", state);
            }
        }
    }

    #[test]
    fn test_single_middle_or_ring_is_stop() {
        assert_eq!(classify_frame_default(&[hand(false, true, false, false)]), Command::Stop);
        assert_eq!(classify_frame_default(&[hand(false, false, true, false)]), Command::Stop);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for state in states() {
            let first = state.command(DEFAULT_SPEED);
            for _ in 0..3 {
                assert_eq!(state.command(DEFAULT_SPEED), first);
            }
        }
    }

    #[test]
    fn test_finger_state_round_trips_through_landmarks() {
        for state in states() {
            let points = hand(state.index, state.middle, state.ring, state.pinky);
            assert_eq!(FingerState::from_landmarks(&points), Some(state));
        }
    }

    #[test]
    fn test_tip_level_with_knuckle_is_curled() {
        let mut points = hand(false, false, false, false);
        points[INDEX_TIP].y = KNUCKLE;
        let state = FingerState::from_landmarks(&points).unwrap();
        assert!(!state.index);
    }

    #[test]
    fn test_no_hand_is_stop() {
        assert_eq!(classify_frame_default(&[]), Command::Stop);
    }

    #[test]
    fn test_missing_landmarks_is_unclassified() {
        let mut points = hand(true, false, false, false);
        points.truncate(HAND_LANDMARK_COUNT - 1);
        assert_eq!(classify_hand(&points, DEFAULT_SPEED), None);
        assert_eq!(classify_frame_default(&[points]), Command::Stop);
    }

    #[test]
    fn test_only_first_hand_is_used() {
        let hands = vec![hand(false, false, false, true), hand(true, false, false, false)];
        assert_eq!(
            classify_frame_default(&hands),
            Command::Reverse { speed: DEFAULT_SPEED }
        );

        let hands = vec![hand(true, true, true, true), hand(true, false, false, false)];
        assert_eq!(classify_frame_default(&hands), Command::Stop);
    }

    #[test]
    fn test_speed_is_forwarded() {
        assert_eq!(
            classify_frame(&[hand(true, false, false, false)], 0.6),
            Command::Advance { speed: 0.6 }
        );
    }
}
