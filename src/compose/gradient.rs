//! Linear alpha-ramp overlays.

use image::RgbaImage;

use crate::color::HexColor;
use crate::template::GradientDirection;

/// Alpha at step `i` of a ramp over `extent` pixels that is opaque at `extent`.
fn ramp_alpha(i: u32, extent: u32, opacity: f32) -> u8 {
    let v = (255.0 * opacity as f64 * i as f64 / extent as f64).round();
    v.clamp(0.0, 255.0) as u8
}

/// Per-row (top/bottom) or per-column (left/right) alpha values.
///
/// Alpha is 0 at the far edge and `255 × opacity` toward the named edge.
pub fn ramp(direction: GradientDirection, extent: u32, opacity: f32) -> Vec<u8> {
    if extent == 0 {
        return Vec::new();
    }
    (0..extent)
        .map(|i| match direction {
            GradientDirection::Bottom | GradientDirection::Right => ramp_alpha(i, extent, opacity),
            GradientDirection::Top | GradientDirection::Left => {
                ramp_alpha(extent - i, extent, opacity)
            }
        })
        .collect()
}

/// Full-size overlay image holding the ramp in `color`.
pub fn gradient_image(
    width: u32,
    height: u32,
    direction: GradientDirection,
    color: &HexColor,
    opacity: f32,
) -> RgbaImage {
    let mut overlay = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return overlay;
    }

    let [r, g, b, _] = color.rgba().0;
    let row_len = width as usize * 4;

    match direction {
        GradientDirection::Top | GradientDirection::Bottom => {
            let alphas = ramp(direction, height, opacity);
            for (row, &a) in overlay.chunks_exact_mut(row_len).zip(&alphas) {
                for px in row.chunks_exact_mut(4) {
                    px.copy_from_slice(&[r, g, b, a]);
                }
            }
        }
        GradientDirection::Left | GradientDirection::Right => {
            // One row template, copied down the image
            let template: Vec<u8> = ramp(direction, width, opacity)
                .into_iter()
                .flat_map(|a| [r, g, b, a])
                .collect();
            for row in overlay.chunks_exact_mut(row_len) {
                row.copy_from_slice(&template);
            }
        }
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> HexColor {
        HexColor::parse("#000000").unwrap()
    }

    #[test]
    fn test_bottom_ramp_monotonic() {
        let img = gradient_image(64, 720, GradientDirection::Bottom, &black(), 0.6);
        let mut last = 0u8;
        for y in 0..720 {
            let a = img.get_pixel(10, y)[3];
            assert!(a >= last, "row {} alpha {} < {}", y, a, last);
            last = a;
        }
        assert_eq!(img.get_pixel(10, 0)[3], 0);
        let bottom = img.get_pixel(10, 719)[3] as f32;
        assert!((bottom - 255.0 * 0.6).abs() <= 1.0);
    }

    #[test]
    fn test_ramp_matches_round_formula() {
        let opacity = 0.6f32;
        let alphas = ramp(GradientDirection::Bottom, 720, opacity);
        assert_eq!(alphas.len(), 720);
        for (i, &a) in alphas.iter().enumerate() {
            let expected = (255.0 * opacity as f64 * i as f64 / 720.0).round() as u8;
            assert_eq!(a, expected, "row {}", i);
        }
        assert_eq!((alphas[0], alphas[1], alphas[360], alphas[719]), (0, 0, 77, 153));

        let top = ramp(GradientDirection::Top, 720, opacity);
        assert_eq!((top[0], top[1], top[360], top[719]), (153, 153, 77, 0));

        let left = ramp(GradientDirection::Left, 1280, 1.0);
        assert_eq!((left[0], left[1], left[640], left[1279]), (255, 255, 128, 0));
    }

    #[test]
    fn test_top_ramp_mirrors() {
        let img = gradient_image(8, 100, GradientDirection::Top, &black(), 1.0);
        assert_eq!(img.get_pixel(0, 0)[3], 255);
        assert!(img.get_pixel(0, 99)[3] <= 3);
        assert!(img.get_pixel(0, 10)[3] > img.get_pixel(0, 90)[3]);
    }

    #[test]
    fn test_horizontal_ramps() {
        let right = gradient_image(200, 4, GradientDirection::Right, &black(), 0.5);
        let left = gradient_image(200, 4, GradientDirection::Left, &black(), 0.5);
        assert_eq!(right.get_pixel(0, 2)[3], 0);
        assert!(right.get_pixel(199, 2)[3] > right.get_pixel(100, 2)[3]);
        assert!(left.get_pixel(0, 2)[3] > left.get_pixel(100, 2)[3]);
        // Constant down each column
        assert_eq!(right.get_pixel(150, 0), right.get_pixel(150, 3));
    }

    #[test]
    fn test_zero_opacity_is_transparent() {
        let img = gradient_image(16, 16, GradientDirection::Bottom, &black(), 0.0);
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_color_is_carried() {
        let red = HexColor::parse("#FF0000").unwrap();
        let img = gradient_image(4, 4, GradientDirection::Bottom, &red, 1.0);
        let p = img.get_pixel(0, 3);
        assert_eq!((p[0], p[1], p[2]), (255, 0, 0));
    }
}
