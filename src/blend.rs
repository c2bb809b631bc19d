//! Alpha compositing for card layers

use image::{Rgba, RgbaImage};
use std::collections::HashSet;

/// Blend modes for card layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha compositing (source over destination)
    #[default]
    Normal,
    /// Lightens underlying colors: result = 1 - (1 - base) * (1 - blend)
    Screen,
    /// Additive blending: result = min(1, base + blend)
    Add,
}

impl BlendMode {
    /// Apply blend mode to a single color channel (values are 0.0-1.0)
    pub(crate) fn blend_channel(&self, base: f32, blend: f32) -> f32 {
        match self {
            BlendMode::Normal => blend,
            BlendMode::Screen => 1.0 - (1.0 - base) * (1.0 - blend),
            BlendMode::Add => (base + blend).min(1.0),
        }
    }
}

/// Blend source pixel over destination using the specified blend mode and opacity.
pub fn blend_pixels(src: &Rgba<u8>, dst: &Rgba<u8>, mode: BlendMode, src_alpha: f32) -> Rgba<u8> {
    let dst_alpha = dst[3] as f32 / 255.0;

    let src_c = [src[0] as f32 / 255.0, src[1] as f32 / 255.0, src[2] as f32 / 255.0];
    let dst_c = [dst[0] as f32 / 255.0, dst[1] as f32 / 255.0, dst[2] as f32 / 255.0];

    // Porter-Duff "source over": out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let composite = |i: usize| -> u8 {
        let blended = mode.blend_channel(dst_c[i], src_c[i]);
        let result = (blended * src_alpha + dst_c[i] * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([composite(0), composite(1), composite(2), (out_alpha * 255.0).round() as u8])
}

/// Paint a set of pixels with a color, clipping to the canvas.
///
/// The color's own alpha is the source alpha for every pixel.
pub fn fill_pixels(
    canvas: &mut RgbaImage,
    pixels: &HashSet<(i32, i32)>,
    color: Rgba<u8>,
    mode: BlendMode,
) {
    let (width, height) = canvas.dimensions();
    let src_alpha = color[3] as f32 / 255.0;
    if src_alpha == 0.0 {
        return;
    }

    for &(x, y) in pixels {
        if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        let blended = blend_pixels(&color, canvas.get_pixel(x, y), mode, src_alpha);
        canvas.put_pixel(x, y, blended);
    }
}

/// Blit a layer onto the canvas at the given position.
///
/// Uses the layer's alpha channel as the mask, scaled by `opacity`.
pub fn blit(canvas: &mut RgbaImage, layer: &RgbaImage, x: i32, y: i32, mode: BlendMode, opacity: f32) {
    let canvas_width = canvas.width() as i32;
    let canvas_height = canvas.height() as i32;
    let opacity = opacity.clamp(0.0, 1.0);

    for (sy, row) in layer.rows().enumerate() {
        let dest_y = y + sy as i32;
        if dest_y < 0 {
            continue;
        }
        if dest_y >= canvas_height {
            break;
        }

        for (sx, src) in row.enumerate() {
            let dest_x = x + sx as i32;
            if dest_x < 0 {
                continue;
            }
            if dest_x >= canvas_width {
                break;
            }

            // Fully transparent source, skip
            if src[3] == 0 {
                continue;
            }

            let src_alpha = (src[3] as f32 / 255.0) * opacity;
            if src_alpha == 0.0 {
                continue;
            }

            let (dx, dy) = (dest_x as u32, dest_y as u32);
            let blended = blend_pixels(src, canvas.get_pixel(dx, dy), mode, src_alpha);
            canvas.put_pixel(dx, dy, blended);
        }
    }
}

/// Mix two same-sized images: `base * (1 - amount) + other * amount` per channel.
pub fn mix(base: &mut RgbaImage, other: &RgbaImage, amount: f32) {
    let amount = amount.clamp(0.0, 1.0);
    for (dst, src) in base.pixels_mut().zip(other.pixels()) {
        for c in 0..4 {
            let value = dst[c] as f32 * (1.0 - amount) + src[c] as f32 * amount;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}
