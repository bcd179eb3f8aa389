use nalgebra::{Point2, Rotation2};

/// A minimum-area rotated rectangle fitted around a detected contour.
#[derive(Debug, Clone)]
pub struct RotatedBox {
    /// The 4 corner points of the rectangle
    pub corners: [Point2<f64>; 4],
    /// Rectangle orientation in degrees, folded into (-90, 0]
    pub angle: f64,
    /// Pixel area of the rectangle
    pub area: f64,
}

impl RotatedBox {
    pub fn new(corners: [Point2<f64>; 4]) -> Self {
        let edge = corners[1] - corners[0];
        let angle = fold_angle(edge.y.atan2(edge.x).to_degrees());
        let area = polygon_area(&corners);
        Self { corners, angle, area }
    }

    /// Rotation to apply when deskewing this box.
    /// Angles below -45° are shifted by +90° so the box is straightened along
    /// its perpendicular edge instead of taking a near-90° turn.
    pub fn normalized_angle(&self) -> f64 {
        if self.angle < -45.0 {
            self.angle + 90.0
        } else {
            self.angle
        }
    }
}

/// Rotate `point` around `center` by `-angle_degrees`.
///
/// The sign flip is deliberate: rotating the image content by `+angle` and the
/// box corners through this function lands both in the same deskewed frame,
/// so the rotated corners can be used to crop the rotated image directly.
pub fn rotate_point(point: Point2<f64>, angle_degrees: f64, center: Point2<f64>) -> Point2<f64> {
    let rotation = Rotation2::new((-angle_degrees).to_radians());
    center + rotation * (point - center)
}

/// Midpoint of the axis-aligned bounding box of the 4 corners.
///
/// Note this is not the centroid of the corner points; for a near-rectangular
/// box the two coincide up to noise, and the bounding-box midpoint is what the
/// crop bounds are computed against.
pub fn box_center(corners: &[Point2<f64>; 4]) -> Point2<f64> {
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Point2::new((max_x + min_x) / 2.0, (max_y + min_y) / 2.0)
}

/// Reduce an edge direction in degrees into the (-90, 0] range that a
/// minimum-area rectangle fit reports. All four edges of a rectangle fold to
/// the same value, so any edge can be used to derive the box orientation.
pub fn fold_angle(theta_degrees: f64) -> f64 {
    let folded = theta_degrees % 90.0;
    if folded > 0.0 {
        folded - 90.0
    } else {
        folded
    }
}

/// Area of a quadrilateral via the shoelace formula.
pub fn polygon_area(corners: &[Point2<f64>; 4]) -> f64 {
    let mut twice_area = 0.0;
    for i in 0..corners.len() {
        let j = (i + 1) % corners.len();
        twice_area += corners[i].x * corners[j].y - corners[j].x * corners[i].y;
    }
    twice_area.abs() / 2.0
}
