use image::{GrayImage, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::cmp::Ordering;

/// Minimum enclosed area for a contour to count as a garment. The comparison
/// is strict: a contour of exactly this area is rejected.
const MIN_CONTOUR_AREA: f64 = 1000.0;

/// Saturation/value floor of the garment-color mask. Hue is unbounded
/// (0-180 covers the full OpenCV-style hue circle), so in practice the mask
/// keeps every pixel that is reasonably saturated and reasonably bright.
const GARMENT_SAT_MIN: u8 = 50;
const GARMENT_VAL_MIN: u8 = 50;

/// Aspect-ratio band classified as a t-shirt, bounds inclusive.
const TSHIRT_RATIO_MIN: f64 = 0.8;
const TSHIRT_RATIO_MAX: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarmentLabel {
    TShirt,
    PullShirt,
    OtherGarment,
    NoGarment,
}

impl GarmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentLabel::TShirt => "t-shirt detected",
            GarmentLabel::PullShirt => "pull/shirt detected",
            GarmentLabel::OtherGarment => "other garment detected",
            GarmentLabel::NoGarment => "no garment detected",
        }
    }
}

impl std::fmt::Display for GarmentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The largest garment-colored region of a frame.
#[derive(Debug, Clone, Copy)]
pub struct GarmentRegion {
    pub area: f64,
    pub bounds: Rect,
}

impl GarmentRegion {
    /// Width over height of the axis-aligned bounding box.
    pub fn aspect_ratio(&self) -> f64 {
        self.bounds.width() as f64 / self.bounds.height() as f64
    }
}

/// Classify the garment visible in a frame. Pure function: same frame in,
/// same label out, no state carried between calls.
pub fn classify(frame: &RgbImage) -> GarmentLabel {
    let mask = garment_mask(frame);

    match largest_garment_region(&mask) {
        Some(region) => label_for_ratio(region.aspect_ratio()),
        None => GarmentLabel::NoGarment,
    }
}

/// Binary mask of garment-colored pixels (255 foreground, 0 background).
pub fn garment_mask(frame: &RgbImage) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let (_h, s, v) = rgb_to_hsv(frame.get_pixel(x, y));
        if s >= GARMENT_SAT_MIN && v >= GARMENT_VAL_MIN {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    })
}

/// Find the external contour with the largest enclosed area, ignoring
/// contours at or below the minimum area.
pub fn largest_garment_region(mask: &GrayImage) -> Option<GarmentRegion> {
    let contours: Vec<Contour<i32>> = find_contours(mask);

    contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| (contour_area(&c.points), &c.points))
        .filter(|(area, _)| *area > MIN_CONTOUR_AREA)
        .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .map(|(area, points)| GarmentRegion {
            area,
            bounds: bounding_box(points),
        })
}

/// Bucket a bounding-box aspect ratio into a garment label. The t-shirt band
/// includes both endpoints.
pub fn label_for_ratio(ratio: f64) -> GarmentLabel {
    if (TSHIRT_RATIO_MIN..=TSHIRT_RATIO_MAX).contains(&ratio) {
        GarmentLabel::TShirt
    } else if ratio > TSHIRT_RATIO_MAX {
        GarmentLabel::PullShirt
    } else {
        GarmentLabel::OtherGarment
    }
}

/// Enclosed area of a closed contour via the shoelace formula.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut doubled: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }

    (doubled.abs() as f64) / 2.0
}

fn bounding_box(points: &[Point<i32>]) -> Rect {
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;

    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Rect::at(min_x, min_y).of_size((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32)
}

/// RGB to HSV in OpenCV-style ranges: hue 0-180, saturation and value 0-255.
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> (u8, u8, u8) {
    let r = pixel[0] as f32 / 255.0;
    let g = pixel[1] as f32 / 255.0;
    let b = pixel[2] as f32 / 255.0;

    let max = r.max(g.max(b));
    let min = r.min(g.min(b));
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    if h < 0.0 {
        h += 360.0;
    }

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let v = max;

    (
        (h / 2.0).round().min(180.0) as u8,
        (s * 255.0).round() as u8,
        (v * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    /// A garment-colored fill: saturated and bright enough for the mask.
    const GARMENT_COLOR: Rgb<u8> = Rgb([200, 30, 30]);

    /// Black frame with one solid colored rectangle, inset from the border.
    fn frame_with_rect(rect_width: u32, rect_height: u32) -> RgbImage {
        let (offset_x, offset_y) = (10, 10);
        ImageBuffer::from_fn(rect_width + 40, rect_height + 40, |x, y| {
            let inside = x >= offset_x
                && x < offset_x + rect_width
                && y >= offset_y
                && y < offset_y + rect_height;
            if inside {
                GARMENT_COLOR
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(&Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 255])), (120, 255, 255));
        // Grays have zero saturation regardless of brightness
        assert_eq!(rgb_to_hsv(&Rgb([0, 0, 0])), (0, 0, 0));
        assert_eq!(rgb_to_hsv(&Rgb([255, 255, 255])).1, 0);
    }

    #[test]
    fn test_black_frame_has_no_garment() {
        let frame: RgbImage = ImageBuffer::from_pixel(640, 480, Rgb([0, 0, 0]));
        assert_eq!(classify(&frame), GarmentLabel::NoGarment);
    }

    #[test]
    fn test_square_region_is_tshirt() {
        // 200x200 square: area well above the floor, ratio 1.0
        let frame = frame_with_rect(200, 200);
        assert_eq!(classify(&frame), GarmentLabel::TShirt);
    }

    #[test]
    fn test_wide_region_is_pull_shirt() {
        // 300x100: ratio 3.0
        let frame = frame_with_rect(300, 100);
        assert_eq!(classify(&frame), GarmentLabel::PullShirt);
    }

    #[test]
    fn test_tall_region_is_other_garment() {
        // 100x300: ratio well below 0.8
        let frame = frame_with_rect(100, 300);
        assert_eq!(classify(&frame), GarmentLabel::OtherGarment);
    }

    #[test]
    fn test_ratio_band_boundaries_inclusive() {
        assert_eq!(label_for_ratio(0.8), GarmentLabel::TShirt);
        assert_eq!(label_for_ratio(1.2), GarmentLabel::TShirt);
        assert_eq!(label_for_ratio(1.0), GarmentLabel::TShirt);
        assert_eq!(label_for_ratio(1.2000001), GarmentLabel::PullShirt);
        assert_eq!(label_for_ratio(0.7999999), GarmentLabel::OtherGarment);
        assert_eq!(label_for_ratio(3.0), GarmentLabel::PullShirt);
    }

    #[test]
    fn test_ratio_boundaries_from_frames() {
        // Bounding boxes of 120x100 and 80x100 pixels land exactly on the
        // inclusive band edges.
        assert_eq!(classify(&frame_with_rect(120, 100)), GarmentLabel::TShirt);
        assert_eq!(classify(&frame_with_rect(80, 100)), GarmentLabel::TShirt);
        assert_eq!(
            classify(&frame_with_rect(121, 100)),
            GarmentLabel::PullShirt
        );
        assert_eq!(
            classify(&frame_with_rect(79, 100)),
            GarmentLabel::OtherGarment
        );
    }

    #[test]
    fn test_contour_area_shoelace() {
        let square = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(contour_area(&square), 100.0);

        // Winding direction does not matter
        let reversed: Vec<_> = square.iter().rev().copied().collect();
        assert_eq!(contour_area(&reversed), 100.0);

        assert_eq!(contour_area(&[Point::new(0, 0), Point::new(5, 5)]), 0.0);
    }

    #[test]
    fn test_area_threshold_is_strict() {
        // The traced border of a w x h pixel rectangle encloses
        // (w-1) * (h-1) square pixels.

        // 41x26 -> 40 * 25 = 1000 exactly: rejected
        let frame = frame_with_rect(41, 26);
        let mask = garment_mask(&frame);
        assert!(largest_garment_region(&mask).is_none());
        assert_eq!(classify(&frame), GarmentLabel::NoGarment);

        // 12x92 -> 11 * 91 = 1001: selected
        let frame = frame_with_rect(12, 92);
        let mask = garment_mask(&frame);
        let region = largest_garment_region(&mask).expect("region above threshold");
        assert_eq!(region.area, 1001.0);
        assert_eq!(classify(&frame), GarmentLabel::OtherGarment);
    }

    #[test]
    fn test_small_contours_never_selected() {
        // Two blobs: both below the area floor, the larger one is still
        // not picked.
        let frame: RgbImage = ImageBuffer::from_fn(200, 200, |x, y| {
            let in_first = (20..30).contains(&x) && (20..30).contains(&y);
            let in_second = (100..120).contains(&x) && (100..120).contains(&y);
            if in_first || in_second {
                GARMENT_COLOR
            } else {
                Rgb([0, 0, 0])
            }
        });
        assert_eq!(classify(&frame), GarmentLabel::NoGarment);
    }

    #[test]
    fn test_largest_region_wins() {
        // A qualifying square and a qualifying wide rectangle; the larger
        // wide rectangle decides the label.
        let frame: RgbImage = ImageBuffer::from_fn(640, 480, |x, y| {
            let square = (10..70).contains(&x) && (10..70).contains(&y);
            let wide = (200..500).contains(&x) && (200..300).contains(&y);
            if square || wide {
                GARMENT_COLOR
            } else {
                Rgb([0, 0, 0])
            }
        });
        assert_eq!(classify(&frame), GarmentLabel::PullShirt);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let frame = frame_with_rect(200, 200);
        let first = classify(&frame);
        let second = classify(&frame);
        assert_eq!(first, second);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(GarmentLabel::TShirt.as_str(), "t-shirt detected");
        assert_eq!(GarmentLabel::PullShirt.as_str(), "pull/shirt detected");
        assert_eq!(GarmentLabel::OtherGarment.as_str(), "other garment detected");
        assert_eq!(GarmentLabel::NoGarment.as_str(), "no garment detected");
    }
}
