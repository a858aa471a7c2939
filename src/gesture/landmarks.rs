use serde::{Deserialize, Serialize};

/// Number of points the hand-pose detector reports per hand
pub const HAND_LANDMARK_COUNT: usize = 21;

// Detector landmark indices: fingertip and middle knuckle (PIP) per finger.
pub const INDEX_TIP: usize = 8;
pub const INDEX_PIP: usize = 6;
pub const MIDDLE_TIP: usize = 12;
pub const MIDDLE_PIP: usize = 10;
pub const RING_TIP: usize = 16;
pub const RING_PIP: usize = 14;
pub const PINKY_TIP: usize = 20;
pub const PINKY_PIP: usize = 18;

/// A tracked point on a hand in normalized image coordinates.
///
/// `y` grows downward, so a smaller `y` is higher in the frame.
/// `z` is carried through but never used for classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}
