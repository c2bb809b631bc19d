//! Built-in type palette table.
//!
//! Maps a creature type name to the primary/secondary color pair used for the
//! card background, type marker and attack panels. The legacy small card uses a
//! single light color per type instead.

use crate::color::rgb;
use image::Rgb;

/// Primary/secondary pair returned for unrecognized types.
pub const FALLBACK_PAIR: (Rgb<u8>, Rgb<u8>) = (rgb(0xFFFFFF), rgb(0xEEEEEE));

/// Legacy background returned for unrecognized types.
pub const LEGACY_FALLBACK: Rgb<u8> = rgb(0xFFFFFF);

/// One row of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Lowercase type name
    pub kind: &'static str,
    /// Saturated type color (gradient top, marker, outlines)
    pub primary: Rgb<u8>,
    /// Light type color (gradient bottom, panel fill)
    pub secondary: Rgb<u8>,
}

const fn entry(kind: &'static str, primary: u32, secondary: u32) -> PaletteEntry {
    PaletteEntry { kind, primary: rgb(primary), secondary: rgb(secondary) }
}

/// Type table. Secondary colors double as the legacy single-color backgrounds.
const ENTRIES: &[PaletteEntry] = &[
    entry("fire", 0xF08030, 0xFFE5E5),
    entry("water", 0x6890F0, 0xE5F6FF),
    entry("grass", 0x78C850, 0xE8FFE5),
    entry("electric", 0xF8D030, 0xFFFDE5),
    entry("ice", 0x98D8D8, 0xF0FFFF),
    entry("fighting", 0xC03028, 0xFFE5E5),
    entry("poison", 0xA040A0, 0xF8E5FF),
    entry("ground", 0xE0C068, 0xF5E6D3),
    entry("flying", 0xA890F0, 0xF0F8FF),
    entry("psychic", 0xF85888, 0xFFE5F7),
    entry("bug", 0xA8B820, 0xF0FFE5),
    entry("rock", 0xB8A038, 0xF5F5DC),
    entry("ghost", 0x705898, 0xF2E5FF),
    entry("dragon", 0x7038F8, 0xE5EEFF),
    entry("dark", 0x705848, 0xE5E5E5),
    entry("steel", 0xB8B8D0, 0xF5F5F5),
    entry("fairy", 0xEE99AC, 0xFFE5F5),
];

/// Immutable type → color table.
///
/// The table is process-wide constant data; `PaletteTable` is a zero-sized
/// handle so it can be passed around and shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteTable;

impl PaletteTable {
    /// Create a handle to the built-in table.
    pub fn new() -> Self {
        Self
    }

    /// Find the entry for a type name (case-insensitive).
    pub fn entry(&self, kind: &str) -> Option<&'static PaletteEntry> {
        let kind = kind.to_lowercase();
        ENTRIES.iter().find(|e| e.kind == kind)
    }

    /// Look up the primary/secondary pair for a type.
    ///
    /// Unknown types (including the empty string) yield `(#FFFFFF, #EEEEEE)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsmith::palette::{PaletteTable, FALLBACK_PAIR};
    ///
    /// let table = PaletteTable::new();
    /// assert_eq!(table.lookup("void"), FALLBACK_PAIR);
    /// assert_eq!(table.lookup("Fire"), table.lookup("fire"));
    /// ```
    pub fn lookup(&self, kind: &str) -> (Rgb<u8>, Rgb<u8>) {
        self.entry(kind).map(|e| (e.primary, e.secondary)).unwrap_or(FALLBACK_PAIR)
    }

    /// Single background color used by the legacy small card.
    pub fn legacy_lookup(&self, kind: &str) -> Rgb<u8> {
        self.entry(kind).map(|e| e.secondary).unwrap_or(LEGACY_FALLBACK)
    }

    /// Whether the type name is in the table.
    pub fn is_known(&self, kind: &str) -> bool {
        self.entry(kind).is_some()
    }

    /// All type names in table order.
    pub fn type_names(&self) -> Vec<&'static str> {
        ENTRIES.iter().map(|e| e.kind).collect()
    }
}
