//! Font roles and the font fallback chain.
//!
//! Every piece of card text is drawn with one of five roles. Each role
//! resolves, in order, to:
//!
//! 1. its bundled font file inside the fonts directory
//! 2. a generic system font found by file name
//! 3. the built-in bitmap font (fixed size)
//!
//! Each step down the chain records a [`Warning`]; resolution never fails.

pub mod builtin;

use crate::blend::{blend_pixels, BlendMode};
use crate::card::Warning;
use ab_glyph::{point, Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// File names tried, in order, when a bundled font is missing.
const SYSTEM_FONT_NAMES: &[&str] = &[
    "DejaVuSans-Bold.ttf",
    "DejaVuSans.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Regular.ttf",
    "Arial Bold.ttf",
    "Arial.ttf",
    "arial.ttf",
];

/// Directories searched (recursively) for system fonts.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:/Windows/Fonts",
];

/// What a piece of card text is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Type label next to the type marker
    Title,
    /// Creature name
    Name,
    /// Stat lines, HP label and description
    Stats,
    /// Attack name inside an attack panel
    AttackName,
    /// Attack damage inside an attack panel
    AttackDamage,
}

impl FontRole {
    pub const ALL: [FontRole; 5] = [
        FontRole::Title,
        FontRole::Name,
        FontRole::Stats,
        FontRole::AttackName,
        FontRole::AttackDamage,
    ];

    /// Bundled font file for this role, relative to the fonts directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            FontRole::Title | FontRole::Name => "card-title.ttf",
            FontRole::Stats => "card-body.ttf",
            FontRole::AttackName | FontRole::AttackDamage => "card-bold.ttf",
        }
    }
}

impl fmt::Display for FontRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontRole::Title => "title",
            FontRole::Name => "name",
            FontRole::Stats => "stats",
            FontRole::AttackName => "attack-name",
            FontRole::AttackDamage => "attack-damage",
        };
        f.write_str(name)
    }
}

/// Pixel size bound to each role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub name: f32,
    pub stats: f32,
    pub attack_name: f32,
    pub attack_damage: f32,
}

impl FontSizes {
    /// Sizes for the 750x1050 cards.
    pub const STANDARD: FontSizes =
        FontSizes { title: 40.0, name: 70.0, stats: 30.0, attack_name: 50.0, attack_damage: 50.0 };

    /// Sizes for the 300x450 legacy card.
    pub const LEGACY: FontSizes =
        FontSizes { title: 14.0, name: 22.0, stats: 14.0, attack_name: 14.0, attack_damage: 14.0 };

    pub fn size(&self, role: FontRole) -> f32 {
        match role {
            FontRole::Title => self.title,
            FontRole::Name => self.name,
            FontRole::Stats => self.stats,
            FontRole::AttackName => self.attack_name,
            FontRole::AttackDamage => self.attack_damage,
        }
    }
}

/// Where a resolved font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Bundled(PathBuf),
    System(PathBuf),
    Builtin,
}

/// A renderable font at a fixed size.
#[derive(Clone)]
pub enum FontHandle {
    /// TrueType/OpenType outlines rasterized by `ab_glyph`
    Outline { font: FontArc, scale: PxScale, source: FontSource },
    /// Built-in bitmap font, fixed size
    Builtin,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontHandle::Outline { scale, source, .. } => f
                .debug_struct("Outline")
                .field("scale", &scale.y)
                .field("source", source)
                .finish(),
            FontHandle::Builtin => f.write_str("Builtin"),
        }
    }
}

impl FontHandle {
    /// Where this handle was resolved from.
    pub fn source(&self) -> FontSource {
        match self {
            FontHandle::Outline { source, .. } => source.clone(),
            FontHandle::Builtin => FontSource::Builtin,
        }
    }

    /// Height of one line of text.
    pub fn line_height(&self) -> u32 {
        match self {
            FontHandle::Outline { font, scale, .. } => {
                let scaled = font.as_scaled(*scale);
                (scaled.ascent() - scaled.descent()).ceil().max(0.0) as u32
            }
            FontHandle::Builtin => builtin::HEIGHT,
        }
    }

    /// Width and height of a single line of text.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            FontHandle::Outline { font, scale, .. } => {
                let scaled = font.as_scaled(*scale);
                let mut width = 0.0f32;
                let mut previous = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                (width.ceil().max(0.0) as u32, self.line_height())
            }
            FontHandle::Builtin => builtin::measure(text),
        }
    }

    /// Draw a single line of text with the top of the line box at `y`.
    pub fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>) {
        match self {
            FontHandle::Outline { font, scale, .. } => draw_outline(canvas, font, *scale, x, y, text, color),
            FontHandle::Builtin => builtin::draw(canvas, x, y, text, color),
        }
    }
}

fn draw_outline(
    canvas: &mut RgbaImage,
    font: &FontArc,
    scale: PxScale,
    x: i32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(scale);
    let baseline = y as f32 + scaled.ascent();
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let color_alpha = color[3] as f32 / 255.0;

    let mut caret = x as f32;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }
            let alpha = coverage.clamp(0.0, 1.0) * color_alpha;
            if alpha <= 0.0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            let blended = blend_pixels(&color, canvas.get_pixel(px, py), BlendMode::Normal, alpha);
            canvas.put_pixel(px, py, blended);
        });
    }
}

/// Fonts for every role, resolved once and shared read-only across renders.
#[derive(Debug, Clone)]
pub struct FontSet {
    handles: HashMap<FontRole, FontHandle>,
}

impl FontSet {
    /// A font set that uses the built-in bitmap font for every role.
    pub fn builtin() -> Self {
        let handles = FontRole::ALL.iter().map(|&role| (role, FontHandle::Builtin)).collect();
        Self { handles }
    }

    /// Resolve every role through the fallback chain.
    ///
    /// Returns the font set and one warning per fallback step taken.
    pub fn load(fonts_dir: &Path, sizes: &FontSizes) -> (Self, Vec<Warning>) {
        Self::load_with_system_dirs(fonts_dir, sizes, SYSTEM_FONT_DIRS)
    }

    /// Like [`FontSet::load`] but searching the given system font directories.
    pub fn load_with_system_dirs(
        fonts_dir: &Path,
        sizes: &FontSizes,
        system_dirs: &[&str],
    ) -> (Self, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut loaded: HashMap<PathBuf, Option<FontArc>> = HashMap::new();
        let mut system: Option<Option<(PathBuf, FontArc)>> = None;
        let mut handles = HashMap::new();

        for role in FontRole::ALL {
            let scale = PxScale::from(sizes.size(role));
            let bundled_path = fonts_dir.join(role.file_name());

            let bundled = loaded
                .entry(bundled_path.clone())
                .or_insert_with(|| match load_font_file(&bundled_path) {
                    Ok(font) => Some(font),
                    Err(reason) => {
                        warnings.push(Warning::new(format!(
                            "Font '{}' unavailable ({}), trying a system font",
                            bundled_path.display(),
                            reason
                        )));
                        None
                    }
                })
                .clone();

            if let Some(font) = bundled {
                let source = FontSource::Bundled(bundled_path);
                handles.insert(role, FontHandle::Outline { font, scale, source });
                continue;
            }

            let system_font = system.get_or_insert_with(|| find_system_font(system_dirs)).clone();
            match system_font {
                Some((path, font)) => {
                    handles.insert(role, FontHandle::Outline { font, scale, source: FontSource::System(path) });
                }
                None => {
                    warnings.push(Warning::new(format!(
                        "No system font found for {} text, using the built-in bitmap font",
                        role
                    )));
                    handles.insert(role, FontHandle::Builtin);
                }
            }
        }

        (Self { handles }, warnings)
    }

    /// Font for a role.
    pub fn resolve(&self, role: FontRole) -> &FontHandle {
        // Every constructor fills all roles
        self.handles.get(&role).unwrap_or(&FontHandle::Builtin)
    }
}

fn load_font_file(path: &Path) -> Result<FontArc, String> {
    let data = std::fs::read(path).map_err(|e| e.to_string())?;
    FontArc::try_from_vec(data).map_err(|e| e.to_string())
}

/// First loadable font among `SYSTEM_FONT_NAMES` in the given directories.
fn find_system_font(dirs: &[&str]) -> Option<(PathBuf, FontArc)> {
    for name in SYSTEM_FONT_NAMES {
        for dir in dirs {
            if !Path::new(dir).is_dir() {
                continue;
            }
            let pattern = format!("{}/**/{}", dir, name);
            let Ok(paths) = glob::glob(&pattern) else {
                continue;
            };
            for path in paths.filter_map(Result::ok) {
                if let Ok(font) = load_font_file(&path) {
                    return Some((path, font));
                }
            }
        }
    }
    None
}
