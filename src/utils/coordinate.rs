use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate2D {
    pub x: f32,
    pub y: f32,
}

impl Coordinate2D {
    pub fn new(x: f32, y: f32) -> Self {
        Coordinate2D { x, y }
    }
}

/// An image-space pixel that passed the marker color threshold.
/// Produced and consumed within a single extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCandidate {
    pub x: u32,
    pub y: u32,
}

impl PixelCandidate {
    pub fn as_coordinate(&self) -> Coordinate2D {
        Coordinate2D::new(self.x as f32, self.y as f32)
    }
}
