//! Card rendering pipeline.
//!
//! A card is composited on an RGBA canvas in a fixed order of layers and
//! flattened to opaque RGB at the end:
//!
//! background, frame (and border shine), accents, sprite, header, HP bar,
//! stat lines, attack panels, texture, glow, description, gold finish.
//!
//! Only artwork can fail, and a failed fetch only skips the sprite layer.
//! Everything recoverable is reported as a [`Warning`].

use crate::artwork::{ArtworkSource, FetchError};
use crate::blend::{blit, fill_pixels, BlendMode};
use crate::color::{gradient_row, with_alpha};
use crate::effects;
use crate::fonts::{FontRole, FontSet};
use crate::layout::{CardLayout, CardStyle, Effects, Theme};
use crate::models::CreatureRecord;
use crate::palette::PaletteTable;
use crate::shapes::{
    rasterize_circle, rasterize_ellipse, rasterize_rect, rasterize_rounded_border, rasterize_rounded_rect,
    Rect,
};
use crate::text::{capitalize, description_lines};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, Rgba, RgbaImage};
use rand::Rng;
use std::fmt;

/// Peak alpha of the gold gradient in the shining finish.
const GOLD_FINISH_ALPHA: u8 = 48;

/// A non-fatal condition encountered while producing a card
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Where the HP bar and its label ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct HpBarReport {
    pub bar: Rect,
    /// Width of the saturated part of the bar
    pub filled_width: i32,
    pub label: String,
    pub label_x: i32,
    pub label_width: u32,
}

/// Where one attack panel and its text ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelReport {
    pub rect: Rect,
    pub name_x: i32,
    pub damage_x: i32,
    pub damage_width: u32,
}

/// Geometry and content measured while rendering a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardReport {
    pub style: CardStyle,
    pub sprite_drawn: bool,
    pub hp_bar: HpBarReport,
    pub stat_lines: [String; 2],
    pub panels: Vec<PanelReport>,
    pub description: Option<[String; 2]>,
    pub accents: usize,
    pub texture_dots: usize,
    pub shine_dashes: usize,
    pub sparkles: usize,
}

/// A finished card.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    /// Flattened, fully opaque pixels
    pub image: RgbImage,
    pub report: CardReport,
    pub warnings: Vec<Warning>,
}

/// Renders creature records into card images of one style.
///
/// The renderer only borrows its fonts, so one [`FontSet`] is loaded per
/// process and shared by every card.
#[derive(Debug, Clone)]
pub struct CardRenderer<'a> {
    style: CardStyle,
    palette: PaletteTable,
    fonts: &'a FontSet,
    effects: Effects,
}

impl<'a> CardRenderer<'a> {
    /// Create a renderer with the style's default effects.
    pub fn new(style: CardStyle, fonts: &'a FontSet) -> Self {
        Self { style, palette: PaletteTable::new(), fonts, effects: style.default_effects() }
    }

    /// Replace the optional passes.
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    pub fn style(&self) -> CardStyle {
        self.style
    }

    pub fn effects(&self) -> Effects {
        self.effects
    }

    /// Render one card.
    ///
    /// Random accents are drawn from `rng`; two renders with identically
    /// seeded generators and the same artwork produce identical pixels.
    pub fn render<R: Rng + ?Sized>(
        &self,
        record: &CreatureRecord,
        artwork: &dyn ArtworkSource,
        rng: &mut R,
    ) -> RenderedCard {
        let layout = self.style.layout();
        let (primary, secondary) = self.palette.lookup(&record.kind);
        let theme = self.style.theme(primary, secondary, self.palette.legacy_lookup(&record.kind));
        let mut warnings = Vec::new();

        let mut canvas = background(layout, &theme);

        let frame = rasterize_rounded_border(layout.frame, layout.frame_radius, layout.frame_width);
        fill_pixels(&mut canvas, &frame, with_alpha(theme.frame, 255), BlendMode::Normal);

        let mut shine_dashes = 0;
        if self.effects.border_shine {
            let dashes = effects::plan_border_shine(rng, layout.width, layout.height);
            effects::paint_border_shine(&mut canvas, &dashes);
            shine_dashes = dashes.len();
        }

        let mut accents = 0;
        if self.effects.accents {
            let planned = effects::plan_accents(rng, layout.width, layout.height);
            effects::paint_accents(&mut canvas, &planned);
            accents = planned.len();
        }

        let sprite_drawn = match artwork.fetch(&record.name, self.style.wants_shiny_artwork()) {
            Ok(sprite) => {
                draw_sprite(&mut canvas, layout, &theme, &sprite);
                true
            }
            // Artwork switched off on purpose, nothing to report
            Err(FetchError::Disabled) => false,
            Err(e) => {
                warnings.push(Warning::new(format!("No artwork for '{}': {}", record.name, e)));
                false
            }
        };

        self.draw_header(&mut canvas, layout, &theme, record);
        let hp_bar = self.draw_hp_bar(&mut canvas, layout, &theme, record.hp);

        let stat_lines = [format!("Attack: {}", record.attack), format!("Defense: {}", record.defense)];
        let stats_font = self.fonts.resolve(FontRole::Stats);
        for (line, &(x, y)) in stat_lines.iter().zip(layout.stat_lines.iter()) {
            stats_font.draw(&mut canvas, x, y, line, theme.text);
        }

        let panels = self.draw_attacks(&mut canvas, layout, &theme, record, &mut warnings);

        let mut texture_dots = 0;
        if self.effects.texture {
            let dots = effects::plan_texture(rng, layout.width, layout.height);
            effects::paint_texture(&mut canvas, &dots);
            texture_dots = dots.len();
        }

        if self.effects.glow {
            effects::apply_glow(&mut canvas, effects::GLOW_SIGMA, effects::GLOW_AMOUNT);
        }

        let description = match layout.description_top {
            Some(top) => {
                let lines = description_lines(&record.flavor_text);
                if let Some(lines) = &lines {
                    self.draw_description(&mut canvas, layout, &theme, top, lines);
                }
                lines
            }
            None => None,
        };

        let mut sparkles = 0;
        if self.effects.gold_finish {
            effects::paint_gold_gradient(&mut canvas, GOLD_FINISH_ALPHA);
            let planned = effects::plan_sparkles(rng, layout.width, layout.height);
            effects::paint_sparkles(&mut canvas, &planned);
            sparkles = planned.len();
        }

        let report = CardReport {
            style: self.style,
            sprite_drawn,
            hp_bar,
            stat_lines,
            panels,
            description,
            accents,
            texture_dots,
            shine_dashes,
            sparkles,
        };

        RenderedCard { image: flatten(canvas), report, warnings }
    }

    fn draw_header(&self, canvas: &mut RgbaImage, layout: &CardLayout, theme: &Theme, record: &CreatureRecord) {
        let (nx, ny) = layout.name;
        self.fonts.resolve(FontRole::Name).draw(canvas, nx, ny, &record.name, theme.text);

        let (cx, cy, radius) = layout.marker;
        let marker = rasterize_circle(cx, cy, radius);
        fill_pixels(canvas, &marker, with_alpha(theme.marker, 255), BlendMode::Normal);

        // Type label sits to the left of the marker, vertically centered on it
        let title = self.fonts.resolve(FontRole::Title);
        let label = capitalize(&record.kind);
        let (width, height) = title.measure(&label);
        let x = cx - radius - layout.marker_label_gap - width as i32;
        let y = cy - height as i32 / 2;
        title.draw(canvas, x, y, &label, theme.text);
    }

    fn draw_hp_bar(&self, canvas: &mut RgbaImage, layout: &CardLayout, theme: &Theme, hp: u32) -> HpBarReport {
        let bar = layout.hp_bar;
        fill_pixels(canvas, &rasterize_rect(bar), theme.hp_track, BlendMode::Normal);

        let filled_width = layout.hp_fill_width(hp);
        if filled_width > 0 {
            let fill = Rect::new(bar.x, bar.y, filled_width, bar.height);
            fill_pixels(canvas, &rasterize_rect(fill), theme.hp_fill, BlendMode::Normal);
        }

        let font = self.fonts.resolve(FontRole::Stats);
        let label = format!("HP {}", hp);
        let (label_width, label_height) = font.measure(&label);
        let label_x = bar.x + (bar.width - label_width as i32) / 2;
        let label_y = bar.y - layout.hp_label_gap - label_height as i32;
        font.draw(canvas, label_x, label_y, &label, theme.text);

        HpBarReport { bar, filled_width, label, label_x, label_width }
    }

    fn draw_attacks(
        &self,
        canvas: &mut RgbaImage,
        layout: &CardLayout,
        theme: &Theme,
        record: &CreatureRecord,
        warnings: &mut Vec<Warning>,
    ) -> Vec<PanelReport> {
        let name_font = self.fonts.resolve(FontRole::AttackName);
        let damage_font = self.fonts.resolve(FontRole::AttackDamage);
        let inner_bottom = layout.frame.bottom() - layout.frame_width;
        let mut panels = Vec::with_capacity(record.attacks.len());

        for (index, attack) in record.attacks.iter().enumerate() {
            let rect = layout.panel(index);
            if rect.bottom() > inner_bottom {
                warnings.push(Warning::new(format!(
                    "Attack '{}' of '{}' does not fit on the card and was left out",
                    attack.name, record.name
                )));
                continue;
            }

            let body = rasterize_rounded_rect(rect, layout.panel_radius);
            fill_pixels(canvas, &body, theme.panel_fill, BlendMode::Normal);
            let outline = rasterize_rounded_border(rect, layout.panel_radius, layout.panel_outline);
            fill_pixels(canvas, &outline, theme.panel_outline, BlendMode::Normal);

            let name_x = rect.x + layout.panel_margin;
            let name_y = rect.y + (rect.height - name_font.line_height() as i32) / 2;
            name_font.draw(canvas, name_x, name_y, &attack.name, theme.text);

            let damage = attack.damage.to_string();
            let (damage_width, damage_height) = damage_font.measure(&damage);
            let damage_x = rect.right() - layout.panel_margin - damage_width as i32;
            let damage_y = rect.y + (rect.height - damage_height as i32) / 2;
            damage_font.draw(canvas, damage_x, damage_y, &damage, theme.text);

            panels.push(PanelReport { rect, name_x, damage_x, damage_width });
        }
        panels
    }

    fn draw_description(
        &self,
        canvas: &mut RgbaImage,
        layout: &CardLayout,
        theme: &Theme,
        top: i32,
        lines: &[String; 2],
    ) {
        let font = self.fonts.resolve(FontRole::Stats);
        let step = font.line_height() as i32 + layout.description_spacing;
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (width, _) = font.measure(line);
            let x = (layout.width as i32 - width as i32) / 2;
            font.draw(canvas, x, top + i as i32 * step, line, theme.text);
        }
    }
}

/// Opaque canvas filled with the theme's vertical gradient.
fn background(layout: &CardLayout, theme: &Theme) -> RgbaImage {
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for y in 0..layout.height {
        let color = gradient_row(theme.background_top, theme.background_bottom, y, layout.height);
        let pixel = with_alpha(color, 255);
        for x in 0..layout.width {
            canvas.put_pixel(x, y, pixel);
        }
    }
    canvas
}

/// Scale the artwork into the sprite box and paste it over a soft shadow.
fn draw_sprite(canvas: &mut RgbaImage, layout: &CardLayout, theme: &Theme, sprite: &RgbaImage) {
    let area = layout.sprite;
    let (rx, ry) = layout.shadow_radii;
    let shadow = rasterize_ellipse(area.x + area.width / 2, area.bottom() - ry, rx, ry);
    fill_pixels(canvas, &shadow, theme.shadow, BlendMode::Normal);

    let scaled = imageops::resize(sprite, area.width as u32, area.height as u32, FilterType::Lanczos3);
    blit(canvas, &scaled, area.x, area.y, BlendMode::Normal, 1.0);
}

/// Drop the alpha channel of a composited canvas.
///
/// Every layer is composited over the opaque background, so alpha is already
/// 255 everywhere.
fn flatten(canvas: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}
