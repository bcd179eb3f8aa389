use image::{imageops, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::median_filter;
use imageproc::geometry::min_area_rect;
use nalgebra::Point2;

use crate::geometry::RotatedBox;

/// Fraction of the scan's pixel area a candidate must exceed to be kept.
/// Rejects scanner dust and noise speckles while retaining real photographs.
pub const MIN_AREA_FRACTION: f64 = 0.05;

/// Locate candidate photograph regions in a scanned image.
///
/// The scan is median-blurred to suppress dust, converted to greyscale and
/// inverse-binary-thresholded: photos are darker than the scanner bed, so
/// anything at or below the cutoff becomes foreground. Each external contour
/// of the foreground gets a minimum-area rotated rectangle fitted around it.
/// Candidates come back sorted by area, largest first, with everything at or
/// below [`MIN_AREA_FRACTION`] of the scan discarded.
pub fn find_candidates(
    img: &RgbImage,
    blur_kernel: u8,
    thresh: u8,
    verbose: bool,
) -> Vec<RotatedBox> {
    // Odd kernel size k maps to a filter radius of (k - 1) / 2
    let radius = u32::from(blur_kernel) / 2;
    let blurred = median_filter(img, radius, radius);
    let grey = imageops::grayscale(&blurred);
    let binary = threshold(&grey, thresh, ThresholdType::BinaryInverted);

    let contours = find_contours::<i32>(&binary);

    if verbose {
        eprintln!("Found {} contours", contours.len());
    }

    let mut boxes: Vec<RotatedBox> = contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter(|contour| contour.points.len() > 2)
        .map(|contour| {
            let rect = min_area_rect(&contour.points);
            let corners = rect.map(|p| Point2::new(f64::from(p.x), f64::from(p.y)));
            RotatedBox::new(corners)
        })
        .collect();

    boxes.sort_by(|a, b| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let image_area = f64::from(img.width()) * f64::from(img.height());
    let candidates: Vec<RotatedBox> = boxes
        .into_iter()
        .filter(|b| b.area / image_area > MIN_AREA_FRACTION)
        .collect();

    if verbose {
        for candidate in &candidates {
            eprintln!(
                "Candidate: area={:.0} ({:.1}% of scan), angle={:.2}°",
                candidate.area,
                100.0 * candidate.area / image_area,
                candidate.angle
            );
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    const BED: Rgb<u8> = Rgb([250, 250, 250]);
    const PHOTO: Rgb<u8> = Rgb([40, 40, 40]);

    fn scan_with_rects(width: u32, height: u32, rects: &[Rect]) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, BED);
        for rect in rects {
            draw_filled_rect_mut(&mut img, *rect, PHOTO);
        }
        img
    }

    #[test]
    fn test_blank_scan_has_no_candidates() {
        let img = scan_with_rects(200, 200, &[]);
        assert!(find_candidates(&img, 9, 230, false).is_empty());
    }

    #[test]
    fn test_single_square_detected() {
        let img = scan_with_rects(1000, 1000, &[Rect::at(300, 300).of_size(400, 400)]);
        let candidates = find_candidates(&img, 9, 230, false);

        assert_eq!(candidates.len(), 1);
        let square = &candidates[0];
        assert!((square.area - 160_000.0).abs() < 2_000.0);
        assert!(square.area / 1_000_000.0 > MIN_AREA_FRACTION);
        // Axis-aligned square needs no deskew
        assert!(square.normalized_angle().abs() < 1.0);
    }

    #[test]
    fn test_small_square_rejected() {
        // 50x50 is 0.25% of the scan, far below the 5% cutoff
        let img = scan_with_rects(1000, 1000, &[Rect::at(300, 300).of_size(50, 50)]);
        assert!(find_candidates(&img, 9, 230, false).is_empty());
    }

    #[test]
    fn test_two_rects_sorted_by_area() {
        let img = scan_with_rects(
            1000,
            1000,
            &[
                Rect::at(560, 560).of_size(400, 300),
                Rect::at(50, 50).of_size(500, 400),
            ],
        );
        let candidates = find_candidates(&img, 9, 230, false);

        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].area >= candidates[1].area);
        assert!((candidates[0].area - 200_000.0).abs() < 3_000.0);
        assert!((candidates[1].area - 120_000.0).abs() < 3_000.0);
    }

    #[test]
    fn test_threshold_cutoff_controls_foreground() {
        // A mid-grey region is foreground at the default cutoff but not below it
        let mut img = RgbImage::from_pixel(500, 500, BED);
        draw_filled_rect_mut(
            &mut img,
            Rect::at(100, 100).of_size(300, 300),
            Rgb([200, 200, 200]),
        );

        assert_eq!(find_candidates(&img, 9, 230, false).len(), 1);
        assert!(find_candidates(&img, 9, 150, false).is_empty());
    }
}
