//! What the external QR decoder hands over for one captured frame.

/// Pixel coordinate in the captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// A decoded visual code. Corners are only used by overlay drawing; the receiver ignores them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedFrame {
    pub payload: Vec<u8>,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: Option<[Point; 4]>,
}

impl DecodedFrame {
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            corners: None,
        }
    }

    pub fn with_corners(payload: Vec<u8>, corners: [Point; 4]) -> Self {
        Self {
            payload,
            corners: Some(corners),
        }
    }
}
