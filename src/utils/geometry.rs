use nalgebra::Vector2;

use crate::utils::coordinate::Coordinate2D;

pub fn distance(a: &Coordinate2D, b: &Coordinate2D) -> f32 {
    (Vector2::new(a.x, a.y) - Vector2::new(b.x, b.y)).norm()
}

/// tilt_angle_deg returns the signed tilt of the segment between two
/// bilateral landmarks, in degrees. The horizontal component is taken as an
/// absolute value so the sign of the result only reflects which side sits
/// higher.
pub fn tilt_angle_deg(left: &Coordinate2D, right: &Coordinate2D) -> f32 {
    let dy = left.y - right.y;
    let dx = (left.x - right.x).abs();
    dy.atan2(dx).to_degrees()
}

/// segment_angle_deg returns the full atan2 angle of the segment from `from`
/// to `to`, in degrees.
pub fn segment_angle_deg(from: &Coordinate2D, to: &Coordinate2D) -> f32 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}
