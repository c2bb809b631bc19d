//! Card styles, their fixed geometry and their color themes

use crate::color::{rgb, with_alpha};
use crate::fonts::FontSizes;
use crate::shapes::Rect;
use image::{Rgb, Rgba};

/// Border color of every card frame.
pub const GOLD: Rgb<u8> = rgb(0xFFD700);

/// Gold shades used for the randomized border shine.
pub const GOLD_SHADES: [Rgb<u8>; 5] =
    [rgb(0xFFD700), rgb(0xFDB931), rgb(0xFFDF00), rgb(0xDAA520), rgb(0xFFE5B4)];

/// HP at which the HP bar is full.
pub const HP_BAR_MAX: u32 = 200;

/// Visual variant of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardStyle {
    /// 750x1050 card on a type gradient
    Standard,
    /// 750x1050 dark card with silver and gold accents
    Shining,
    /// 300x450 card on a flat light type color
    Legacy,
}

/// Fixed geometry of a card style, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    /// Outer rectangle of the frame
    pub frame: Rect,
    pub frame_radius: i32,
    pub frame_width: i32,
    /// Top-left of the creature name
    pub name: (i32, i32),
    /// Type marker center and radius
    pub marker: (i32, i32, i32),
    /// Gap between the type label and the marker
    pub marker_label_gap: i32,
    /// Square the artwork is scaled into
    pub sprite: Rect,
    /// Horizontal and vertical radius of the sprite shadow
    pub shadow_radii: (i32, i32),
    pub hp_bar: Rect,
    /// Gap between the HP label and the top of the bar
    pub hp_label_gap: i32,
    /// Top-left of the attack and defense lines
    pub stat_lines: [(i32, i32); 2],
    pub panel_x: i32,
    pub panel_width: i32,
    pub panel_height: i32,
    pub panel_gap: i32,
    pub panels_top: i32,
    pub panel_radius: i32,
    pub panel_outline: i32,
    /// Inset of the attack name and damage from the panel edges
    pub panel_margin: i32,
    /// Top of the first description line, `None` when the card has no room
    pub description_top: Option<i32>,
    pub description_spacing: i32,
    pub font_sizes: FontSizes,
}

const STANDARD_LAYOUT: CardLayout = CardLayout {
    width: 750,
    height: 1050,
    frame: Rect::new(10, 10, 730, 1030),
    frame_radius: 20,
    frame_width: 8,
    name: (50, 36),
    marker: (680, 78, 28),
    marker_label_gap: 14,
    sprite: Rect::new(175, 140, 400, 400),
    shadow_radii: (150, 22),
    hp_bar: Rect::new(440, 590, 250, 24),
    hp_label_gap: 4,
    stat_lines: [(60, 552), (60, 590)],
    panel_x: 50,
    panel_width: 650,
    panel_height: 100,
    panel_gap: 10,
    panels_top: 630,
    panel_radius: 15,
    panel_outline: 3,
    panel_margin: 25,
    description_top: Some(958),
    description_spacing: 4,
    font_sizes: FontSizes::STANDARD,
};

const SHINING_LAYOUT: CardLayout = CardLayout {
    // Centered, wider bar directly above the attack panels
    hp_bar: Rect::new(125, 596, 500, 24),
    stat_lines: [(60, 552), (470, 552)],
    ..STANDARD_LAYOUT
};

const LEGACY_LAYOUT: CardLayout = CardLayout {
    width: 300,
    height: 450,
    frame: Rect::new(4, 4, 292, 442),
    frame_radius: 20,
    frame_width: 8,
    name: (20, 18),
    marker: (268, 30, 10),
    marker_label_gap: 6,
    sprite: Rect::new(75, 50, 150, 150),
    shadow_radii: (55, 8),
    hp_bar: Rect::new(160, 236, 120, 10),
    hp_label_gap: 3,
    stat_lines: [(20, 212), (20, 234)],
    panel_x: 15,
    panel_width: 270,
    panel_height: 30,
    panel_gap: 6,
    panels_top: 300,
    panel_radius: 8,
    panel_outline: 2,
    panel_margin: 10,
    description_top: None,
    description_spacing: 0,
    font_sizes: FontSizes::LEGACY,
};

impl CardLayout {
    /// Rectangle of the attack panel at `index`.
    pub fn panel(&self, index: usize) -> Rect {
        let y = self.panels_top + index as i32 * (self.panel_height + self.panel_gap);
        Rect::new(self.panel_x, y, self.panel_width, self.panel_height)
    }

    /// Filled width of the HP bar for a given HP value.
    ///
    /// The fill fraction is `min(hp / 200, 1)`.
    pub fn hp_fill_width(&self, hp: u32) -> i32 {
        let fraction = (hp as f32 / HP_BAR_MAX as f32).min(1.0);
        (self.hp_bar.width as f32 * fraction).round() as i32
    }
}

/// Optional passes of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    /// Gold accent ellipses over the background
    pub accents: bool,
    /// Randomized gold dashes along the card edge
    pub border_shine: bool,
    /// Sparse white dot texture
    pub texture: bool,
    /// Blurred copy blended back in
    pub glow: bool,
    /// Gold gradient and sparkles layered last
    pub gold_finish: bool,
}

impl Effects {
    /// No optional passes at all.
    pub const NONE: Effects =
        Effects { accents: false, border_shine: false, texture: false, glow: false, gold_finish: false };
}

/// Colors used by the pipeline for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background_top: Rgb<u8>,
    pub background_bottom: Rgb<u8>,
    pub frame: Rgb<u8>,
    pub marker: Rgb<u8>,
    pub text: Rgba<u8>,
    pub panel_fill: Rgba<u8>,
    pub panel_outline: Rgba<u8>,
    pub hp_track: Rgba<u8>,
    pub hp_fill: Rgba<u8>,
    pub shadow: Rgba<u8>,
}

const SILVER: Rgb<u8> = rgb(0xC0C0C0);
const HP_RED: Rgb<u8> = rgb(0xE3350D);
const LIGHT_TRACK: Rgb<u8> = rgb(0xE0E0E0);

impl CardStyle {
    pub fn layout(&self) -> &'static CardLayout {
        match self {
            CardStyle::Standard => &STANDARD_LAYOUT,
            CardStyle::Shining => &SHINING_LAYOUT,
            CardStyle::Legacy => &LEGACY_LAYOUT,
        }
    }

    /// Optional passes enabled by default for this style.
    pub fn default_effects(&self) -> Effects {
        match self {
            CardStyle::Standard => Effects {
                accents: true,
                border_shine: false,
                texture: true,
                glow: true,
                gold_finish: false,
            },
            CardStyle::Shining => Effects {
                accents: true,
                border_shine: true,
                texture: false,
                glow: true,
                gold_finish: true,
            },
            CardStyle::Legacy => Effects { border_shine: true, ..Effects::NONE },
        }
    }

    /// Whether the style asks the artwork source for the shiny variant.
    pub fn wants_shiny_artwork(&self) -> bool {
        matches!(self, CardStyle::Shining)
    }

    /// Colors for a card given the type's palette entry.
    ///
    /// `legacy` is the single background color used by the legacy style.
    pub fn theme(&self, primary: Rgb<u8>, secondary: Rgb<u8>, legacy: Rgb<u8>) -> Theme {
        match self {
            CardStyle::Standard => Theme {
                background_top: primary,
                background_bottom: secondary,
                frame: GOLD,
                marker: primary,
                text: Rgba([0, 0, 0, 255]),
                panel_fill: with_alpha(secondary, 230),
                panel_outline: with_alpha(primary, 255),
                hp_track: with_alpha(LIGHT_TRACK, 255),
                hp_fill: with_alpha(HP_RED, 255),
                shadow: Rgba([0, 0, 0, 80]),
            },
            CardStyle::Shining => Theme {
                background_top: rgb(0x000000),
                background_bottom: rgb(0x1E1E1E),
                frame: GOLD,
                marker: SILVER,
                text: Rgba([255, 255, 255, 255]),
                panel_fill: Rgba([255, 255, 255, 36]),
                panel_outline: with_alpha(SILVER, 255),
                hp_track: with_alpha(rgb(0x3C3C3C), 255),
                hp_fill: with_alpha(rgb(0xF0F0F0), 255),
                shadow: Rgba([255, 255, 255, 60]),
            },
            CardStyle::Legacy => Theme {
                background_top: legacy,
                background_bottom: legacy,
                frame: GOLD,
                marker: primary,
                text: Rgba([0, 0, 0, 255]),
                panel_fill: Rgba([255, 255, 255, 140]),
                panel_outline: with_alpha(primary, 255),
                hp_track: with_alpha(LIGHT_TRACK, 255),
                hp_fill: with_alpha(HP_RED, 255),
                shadow: Rgba([0, 0, 0, 70]),
            },
        }
    }
}
