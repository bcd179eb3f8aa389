use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate, Interpolation};
use thiserror::Error;

use crate::geometry::{box_center, rotate_point, RotatedBox};

/// Recoverable per-candidate failures during deskew and crop.
#[derive(Debug, Error)]
pub enum RectifyError {
    /// The deskewed box extends past the edge of the rotated scan.
    #[error(
        "crop bounds x:{x0}..{x1} y:{y0}..{y1} fall outside the rotated image ({width}x{height}); \
         try straightening the picture and moving it away from the scanner's edge"
    )]
    OutOfBounds {
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        width: u32,
        height: u32,
    },
    /// The deskewed box collapsed to zero pixels.
    #[error("rectified crop has zero pixel area")]
    EmptyCrop,
}

/// Deskew one candidate box and crop it out of the scan.
///
/// The whole scan is rotated about the box center by the candidate's
/// normalized angle, the box corners are rotated into the same frame, and the
/// axis-aligned bounds of the rotated corners are cropped from the rotated
/// image.
pub fn rectify(
    img: &RgbImage,
    candidate: &RotatedBox,
    verbose: bool,
) -> Result<RgbImage, RectifyError> {
    let angle = candidate.normalized_angle();
    let center = box_center(&candidate.corners);

    // The image warp must apply the same map as rotate_point, which negates
    // the angle internally, so the negated angle is passed here as well.
    let theta = (-angle).to_radians() as f32;
    let rotated = rotate(
        img,
        (center.x as f32, center.y as f32),
        theta,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
    );

    let corners = candidate
        .corners
        .map(|corner| rotate_point(corner, angle, center));

    let x0 = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).round() as i64;
    let x1 = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).round() as i64;
    let y0 = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).round() as i64;
    let y1 = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).round() as i64;

    let (width, height) = rotated.dimensions();
    if x0 < 0 || y0 < 0 || x1 > i64::from(width) || y1 > i64::from(height) {
        return Err(RectifyError::OutOfBounds {
            x0,
            y0,
            x1,
            y1,
            width,
            height,
        });
    }

    let crop_width = (x1 - x0) as u32;
    let crop_height = (y1 - y0) as u32;
    if crop_width == 0 || crop_height == 0 {
        return Err(RectifyError::EmptyCrop);
    }

    if verbose {
        eprintln!(
            "Deskewed by {:.2}°, cropping {}x{} at ({}, {})",
            angle, crop_width, crop_height, x0, y0
        );
    }

    Ok(imageops::crop_imm(&rotated, x0 as u32, y0 as u32, crop_width, crop_height).to_image())
}
