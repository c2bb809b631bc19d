//! Shape rasterization primitives for the card canvas.
//!
//! Each function converts a geometric shape into a set of integer pixel
//! coordinates. Painting (and clipping to the canvas) happens in
//! [`crate::blend::fill_pixels`], so the rasterizers may return coordinates
//! outside the canvas.

use std::collections::HashSet;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Rasterize a line using Bresenham's line algorithm.
///
/// # Examples
///
/// ```
/// use cardsmith::shapes::rasterize_line;
///
/// let pixels = rasterize_line((0, 0), (3, 3));
/// assert_eq!(pixels.len(), 4);
/// assert!(pixels.contains(&(0, 0)));
/// assert!(pixels.contains(&(3, 3)));
/// ```
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        pixels.insert((x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    pixels
}

/// Rasterize a line with a square pen of the given width.
pub fn rasterize_thick_line(p0: (i32, i32), p1: (i32, i32), width: i32) -> HashSet<(i32, i32)> {
    let spine = rasterize_line(p0, p1);
    if width <= 1 {
        return spine;
    }
    let lo = -(width - 1) / 2;
    let hi = lo + width;
    let mut pixels = HashSet::with_capacity(spine.len() * (width * width) as usize);
    for (x, y) in spine {
        for dy in lo..hi {
            for dx in lo..hi {
                pixels.insert((x + dx, y + dy));
            }
        }
    }
    pixels
}

/// Rasterize a filled rectangle.
///
/// ```
/// use cardsmith::shapes::{rasterize_rect, Rect};
///
/// let pixels = rasterize_rect(Rect::new(0, 0, 3, 2));
/// assert_eq!(pixels.len(), 6);
/// ```
pub fn rasterize_rect(rect: Rect) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    if rect.width <= 0 || rect.height <= 0 {
        return pixels;
    }

    for dy in 0..rect.height {
        for dx in 0..rect.width {
            pixels.insert((rect.x + dx, rect.y + dy));
        }
    }

    pixels
}

/// Rasterize a filled ellipse using the midpoint algorithm.
///
/// Returns all pixels within an ellipse centered at (cx, cy) with radii (rx, ry).
///
/// ```
/// use cardsmith::shapes::rasterize_ellipse;
///
/// let pixels = rasterize_ellipse(5, 5, 3, 2);
/// assert!(pixels.contains(&(5, 5)));
/// ```
pub fn rasterize_ellipse(cx: i32, cy: i32, rx: i32, ry: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();

    if rx <= 0 || ry <= 0 {
        return pixels;
    }

    // i64 to avoid overflow in the decision parameters
    let rx = rx as i64;
    let ry = ry as i64;
    let cx = cx as i64;
    let cy = cy as i64;

    let mut x = 0i64;
    let mut y = ry;

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;

    let mut p1 = ry_sq - (rx_sq * ry) + (rx_sq / 4);
    let mut dx = 2 * ry_sq * x;
    let mut dy = 2 * rx_sq * y;

    while dx < dy {
        fill_ellipse_span(cx, cy, x, y, &mut pixels);

        if p1 < 0 {
            x += 1;
            dx += 2 * ry_sq;
            p1 += dx + ry_sq;
        } else {
            x += 1;
            y -= 1;
            dx += 2 * ry_sq;
            dy -= 2 * rx_sq;
            p1 += dx - dy + ry_sq;
        }
    }

    let mut p2 = ry_sq * (x + 1) * (x + 1) / 4 + rx_sq * (y - 1) * (y - 1) - rx_sq * ry_sq;

    while y >= 0 {
        fill_ellipse_span(cx, cy, x, y, &mut pixels);

        if p2 > 0 {
            y -= 1;
            dy -= 2 * rx_sq;
            p2 += rx_sq - dy;
        } else {
            x += 1;
            y -= 1;
            dx += 2 * ry_sq;
            dy -= 2 * rx_sq;
            p2 += dx - dy + rx_sq;
        }
    }

    pixels
}

/// Fill the two horizontal spans mirrored around the ellipse center.
fn fill_ellipse_span(cx: i64, cy: i64, x: i64, y: i64, pixels: &mut HashSet<(i32, i32)>) {
    for scan_x in -x..=x {
        pixels.insert(((cx + scan_x) as i32, (cy + y) as i32));
        pixels.insert(((cx + scan_x) as i32, (cy - y) as i32));
    }
}

/// Rasterize a filled circle.
pub fn rasterize_circle(cx: i32, cy: i32, radius: i32) -> HashSet<(i32, i32)> {
    rasterize_ellipse(cx, cy, radius, radius)
}

/// Corner squares of a rounded rectangle with the center each arc is drawn around.
///
/// Returns `(square, (center_x, center_y))` for top-left, top-right,
/// bottom-left and bottom-right.
fn corner_squares(rect: Rect, radius: i32) -> [(Rect, (f32, f32)); 4] {
    let r = radius;
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    [
        (Rect::new(x, y, r, r), ((x + r) as f32, (y + r) as f32)),
        (Rect::new(right - r, y, r, r), ((right - r) as f32, (y + r) as f32)),
        (Rect::new(x, bottom - r, r, r), ((x + r) as f32, (bottom - r) as f32)),
        (Rect::new(right - r, bottom - r, r, r), ((right - r) as f32, (bottom - r) as f32)),
    ]
}

/// Distance from a pixel's center to a point.
fn center_distance(px: i32, py: i32, center: (f32, f32)) -> f32 {
    let dx = px as f32 + 0.5 - center.0;
    let dy = py as f32 + 0.5 - center.1;
    (dx * dx + dy * dy).sqrt()
}

fn clamp_radius(rect: Rect, radius: i32) -> i32 {
    radius.max(0).min(rect.width / 2).min(rect.height / 2)
}

/// Rasterize a filled rectangle with rounded corners.
pub fn rasterize_rounded_rect(rect: Rect, radius: i32) -> HashSet<(i32, i32)> {
    let radius = clamp_radius(rect, radius);
    let mut pixels = rasterize_rect(rect);
    if radius == 0 {
        return pixels;
    }

    for (square, center) in corner_squares(rect, radius) {
        for py in square.y..square.bottom() {
            for px in square.x..square.right() {
                if center_distance(px, py, center) > radius as f32 {
                    pixels.remove(&(px, py));
                }
            }
        }
    }

    pixels
}

/// Rasterize the outline of a rounded rectangle.
///
/// The outline is built from four straight edges of `thickness` pixels joined
/// by four quarter arcs of the given outer `radius`. The outline lies entirely
/// inside `rect`.
///
/// ```
/// use cardsmith::shapes::{rasterize_rounded_border, Rect};
///
/// let pixels = rasterize_rounded_border(Rect::new(0, 0, 100, 60), 20, 8);
/// assert!(pixels.contains(&(50, 0)));
/// assert!(!pixels.contains(&(0, 0))); // corner is cut by the arc
/// assert!(!pixels.contains(&(50, 30))); // interior stays empty
/// ```
pub fn rasterize_rounded_border(rect: Rect, radius: i32, thickness: i32) -> HashSet<(i32, i32)> {
    let mut pixels = HashSet::new();
    if rect.width <= 0 || rect.height <= 0 || thickness <= 0 {
        return pixels;
    }
    let r = clamp_radius(rect, radius);
    let t = thickness.min(rect.width / 2).min(rect.height / 2).max(1);

    // Straight edges between the corner squares
    let edges = [
        Rect::new(rect.x + r, rect.y, rect.width - 2 * r, t),
        Rect::new(rect.x + r, rect.bottom() - t, rect.width - 2 * r, t),
        Rect::new(rect.x, rect.y + r, t, rect.height - 2 * r),
        Rect::new(rect.right() - t, rect.y + r, t, rect.height - 2 * r),
    ];
    for edge in edges {
        pixels.extend(rasterize_rect(edge));
    }

    // Quarter arcs
    let inner = (r - t) as f32;
    for (square, center) in corner_squares(rect, r) {
        for py in square.y..square.bottom() {
            for px in square.x..square.right() {
                let d = center_distance(px, py, center);
                if d <= r as f32 && d > inner {
                    pixels.insert((px, py));
                }
            }
        }
    }

    pixels
}
