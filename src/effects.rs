//! Randomized and post-processing passes of the card pipeline.
//!
//! Random passes are split in two: a planning function that draws positions
//! from a caller-supplied [`Rng`] and returns plain geometry, and a painting
//! function that applies that geometry to the canvas. Exact positions are not
//! reproducible across RNGs; the geometry stays within documented bounds.

use crate::blend::{blit, fill_pixels, mix, BlendMode};
use crate::color::with_alpha;
use crate::layout::{GOLD, GOLD_SHADES};
use crate::shapes::{rasterize_ellipse, rasterize_line, rasterize_thick_line};
use image::{imageops, Rgb, Rgba, RgbaImage};
use rand::seq::SliceRandom;
use rand::Rng;

/// Alpha of every gold accent ellipse.
pub const ACCENT_ALPHA: u8 = 100;
/// Inclusive range of accent counts.
pub const ACCENT_COUNT: (usize, usize) = (15, 20);
/// Inclusive range of accent radii.
pub const ACCENT_RADIUS: (i32, i32) = (1, 4);

/// Grid spacing of the texture overlay.
pub const TEXTURE_SPACING: u32 = 4;
/// Probability that a grid point receives a dot.
pub const TEXTURE_PROBABILITY: f64 = 0.5;
/// Alpha of each texture dot.
pub const TEXTURE_ALPHA: u8 = 10;

/// Length of each border shine dash.
pub const DASH_LENGTH: u32 = 5;

/// Inclusive range of sparkle counts in the gold finish.
pub const SPARKLE_COUNT: (usize, usize) = (25, 35);
/// Inclusive range of sparkle arm lengths.
pub const SPARKLE_ARM: (i32, i32) = (3, 8);
/// Inclusive range of sparkle alphas.
pub const SPARKLE_ALPHA: (u8, u8) = (150, 255);

/// Gaussian sigma of the glow pass.
pub const GLOW_SIGMA: f32 = 6.0;
/// Blend amount of the glow pass.
pub const GLOW_AMOUNT: f32 = 0.10;

/// A small filled gold ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accent {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
    pub alpha: u8,
}

/// One colored segment of the border shine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dash {
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub color: Rgb<u8>,
}

/// A four-armed sparkle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sparkle {
    pub cx: i32,
    pub cy: i32,
    pub arm: i32,
    pub alpha: u8,
}

/// Place 15-20 accents fully inside a `width` x `height` canvas.
pub fn plan_accents<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Vec<Accent> {
    let count = rng.gen_range(ACCENT_COUNT.0..=ACCENT_COUNT.1);
    (0..count)
        .map(|_| {
            let radius = rng.gen_range(ACCENT_RADIUS.0..=ACCENT_RADIUS.1);
            Accent {
                cx: rng.gen_range(radius..width as i32 - radius),
                cy: rng.gen_range(radius..height as i32 - radius),
                radius,
                alpha: ACCENT_ALPHA,
            }
        })
        .collect()
}

/// Draw the accents on a transparent layer and composite it onto the canvas.
pub fn paint_accents(canvas: &mut RgbaImage, accents: &[Accent]) {
    let mut layer = RgbaImage::new(canvas.width(), canvas.height());
    for accent in accents {
        let pixels = rasterize_ellipse(accent.cx, accent.cy, accent.radius, accent.radius);
        fill_pixels(&mut layer, &pixels, with_alpha(GOLD, accent.alpha), BlendMode::Normal);
    }
    blit(canvas, &layer, 0, 0, BlendMode::Normal, 1.0);
}

/// Choose grid points for the texture overlay.
pub fn plan_texture<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut dots = Vec::new();
    for y in (0..height).step_by(TEXTURE_SPACING as usize) {
        for x in (0..width).step_by(TEXTURE_SPACING as usize) {
            if rng.gen_bool(TEXTURE_PROBABILITY) {
                dots.push((x, y));
            }
        }
    }
    dots
}

/// Composite near-invisible white dots.
pub fn paint_texture(canvas: &mut RgbaImage, dots: &[(u32, u32)]) {
    let white = Rgba([255, 255, 255, TEXTURE_ALPHA]);
    let alpha = TEXTURE_ALPHA as f32 / 255.0;
    for &(x, y) in dots {
        if x < canvas.width() && y < canvas.height() {
            let blended = crate::blend::blend_pixels(&white, canvas.get_pixel(x, y), BlendMode::Normal, alpha);
            canvas.put_pixel(x, y, blended);
        }
    }
}

/// Split the four card edges into 5px dashes of random gold shades.
pub fn plan_border_shine<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Vec<Dash> {
    let mut dashes = Vec::new();
    let (w, h) = (width as i32, height as i32);
    let shade = |rng: &mut R| *GOLD_SHADES.choose(rng).unwrap_or(&GOLD);

    for x in (0..w).step_by(DASH_LENGTH as usize) {
        let end = (x + DASH_LENGTH as i32).min(w - 1);
        let color = shade(rng);
        dashes.push(Dash { start: (x, 0), end: (end, 0), color });
        dashes.push(Dash { start: (x, h - 1), end: (end, h - 1), color });
    }
    for y in (0..h).step_by(DASH_LENGTH as usize) {
        let end = (y + DASH_LENGTH as i32).min(h - 1);
        let color = shade(rng);
        dashes.push(Dash { start: (0, y), end: (0, end), color });
        dashes.push(Dash { start: (w - 1, y), end: (w - 1, end), color });
    }
    dashes
}

/// Draw the border shine as 2px lines.
pub fn paint_border_shine(canvas: &mut RgbaImage, dashes: &[Dash]) {
    for dash in dashes {
        let pixels = rasterize_thick_line(dash.start, dash.end, 2);
        fill_pixels(canvas, &pixels, with_alpha(dash.color, 255), BlendMode::Normal);
    }
}

/// Place sparkles fully inside the canvas.
pub fn plan_sparkles<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32) -> Vec<Sparkle> {
    let count = rng.gen_range(SPARKLE_COUNT.0..=SPARKLE_COUNT.1);
    (0..count)
        .map(|_| {
            let arm = rng.gen_range(SPARKLE_ARM.0..=SPARKLE_ARM.1);
            Sparkle {
                cx: rng.gen_range(arm..width as i32 - arm),
                cy: rng.gen_range(arm..height as i32 - arm),
                arm,
                alpha: rng.gen_range(SPARKLE_ALPHA.0..=SPARKLE_ALPHA.1),
            }
        })
        .collect()
}

/// Draw sparkles as additive white crosses.
pub fn paint_sparkles(canvas: &mut RgbaImage, sparkles: &[Sparkle]) {
    for s in sparkles {
        let mut pixels = rasterize_line((s.cx - s.arm, s.cy), (s.cx + s.arm, s.cy));
        pixels.extend(rasterize_line((s.cx, s.cy - s.arm), (s.cx, s.cy + s.arm)));
        fill_pixels(canvas, &pixels, Rgba([255, 255, 255, s.alpha]), BlendMode::Add);
    }
}

/// Screen a vertical gold gradient over the canvas, transparent at the top.
pub fn paint_gold_gradient(canvas: &mut RgbaImage, max_alpha: u8) {
    let height = canvas.height().max(1);
    let mut layer = RgbaImage::new(canvas.width(), canvas.height());
    for (_, y, pixel) in layer.enumerate_pixels_mut() {
        let alpha = (max_alpha as f32 * y as f32 / height as f32).round() as u8;
        *pixel = with_alpha(GOLD, alpha);
    }
    blit(canvas, &layer, 0, 0, BlendMode::Screen, 1.0);
}

/// Blend a Gaussian-blurred copy of the canvas back in.
pub fn apply_glow(canvas: &mut RgbaImage, sigma: f32, amount: f32) {
    let blurred = imageops::blur(canvas, sigma);
    mix(canvas, &blurred, amount);
}
