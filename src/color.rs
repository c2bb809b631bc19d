//! Color helpers shared by the palette table and the card pipeline
//!
//! Colors are stored as `image::Rgb<u8>` in tables and promoted to
//! `image::Rgba<u8>` when they are painted onto the compositing canvas.

use image::{Rgb, Rgba};

/// Build an RGB color from a packed `0xRRGGBB` value.
///
/// # Examples
///
/// ```
/// use cardsmith::color::rgb;
///
/// assert_eq!(rgb(0xFFD700), image::Rgb([255, 215, 0]));
/// ```
pub const fn rgb(packed: u32) -> Rgb<u8> {
    Rgb([(packed >> 16) as u8, (packed >> 8) as u8, packed as u8])
}

/// Promote an RGB color to RGBA with the given alpha.
pub fn with_alpha(color: Rgb<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], alpha])
}

/// Interpolate one channel at fraction `t` (0.0 = `from`, 1.0 = `to`).
///
/// `round(from * (1 - t) + to * t)`
pub fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    let value = from as f32 * (1.0 - t) + to as f32 * t;
    value.round().clamp(0.0, 255.0) as u8
}

/// Color of row `y` in a vertical gradient of `height` rows.
///
/// Each channel is interpolated independently with `t = y / height`, so row 0
/// is exactly `top` and the bottom row approaches `bottom`.
pub fn gradient_row(top: Rgb<u8>, bottom: Rgb<u8>, y: u32, height: u32) -> Rgb<u8> {
    if height == 0 {
        return top;
    }
    let t = y as f32 / height as f32;
    Rgb([
        lerp_channel(top[0], bottom[0], t),
        lerp_channel(top[1], bottom[1], t),
        lerp_channel(top[2], bottom[2], t),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_unpacks_channels() {
        assert_eq!(rgb(0x123456), Rgb([0x12, 0x34, 0x56]));
        assert_eq!(rgb(0xFFFFFF), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha(Rgb([1, 2, 3]), 100), Rgba([1, 2, 3, 100]));
    }

    #[test]
    fn test_lerp_channel_endpoints() {
        assert_eq!(lerp_channel(10, 200, 0.0), 10);
        assert_eq!(lerp_channel(10, 200, 1.0), 200);
        assert_eq!(lerp_channel(0, 255, 0.5), 128);
    }

    #[test]
    fn test_gradient_row_top_is_primary() {
        let top = Rgb([240, 128, 48]);
        let bottom = Rgb([255, 229, 229]);
        assert_eq!(gradient_row(top, bottom, 0, 1050), top);
    }

    #[test]
    fn test_gradient_row_matches_formula() {
        let top = Rgb([0, 100, 200]);
        let bottom = Rgb([200, 100, 0]);
        let height = 1050;
        for y in [1, 263, 525, 900, 1049] {
            let t = y as f32 / height as f32;
            let expected = Rgb([
                (0.0 * (1.0 - t) + 200.0 * t).round() as u8,
                100,
                (200.0 * (1.0 - t) + 0.0 * t).round() as u8,
            ]);
            assert_eq!(gradient_row(top, bottom, y, height), expected, "row {}", y);
        }
    }

    #[test]
    fn test_gradient_row_zero_height() {
        let top = Rgb([1, 1, 1]);
        assert_eq!(gradient_row(top, Rgb([9, 9, 9]), 0, 0), top);
    }
}
