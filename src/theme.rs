//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use blockfall::Kind;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece colours and UI colours, optionally loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours indexed by `Kind::index() - 1` (I, O, T, S, Z, J, L).
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Empty-cell dots and secondary text.
    pub inactive_fg: Color,
    /// Line-clear flash.
    pub flash: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Theme file keys for each piece, in `Kind::ALL` order.
const PIECE_KEYS: [&str; 7] = [
    "piece_i", "piece_o", "piece_t", "piece_s", "piece_z", "piece_j", "piece_l",
];

/// Classic piece colours: cyan, yellow, purple, green, red, blue, orange.
const CLASSIC: [u32; 7] = [
    0x00F0F0, 0xF0F000, 0xA000F0, 0x00F000, 0xF00000, 0x0000F0, 0xF0A000,
];
const HIGH_CONTRAST: [u32; 7] = [
    0x00FFFF, 0xFFFF00, 0xFF00FF, 0x00FF00, 0xFF0000, 0x0088FF, 0xFF8800,
];
/// Okabe-Ito inspired; no red/green pair carries meaning alone.
const COLORBLIND: [u32; 7] = [
    0x56B4E9, 0xF0E442, 0xCC79A7, 0x009E73, 0xD55E00, 0x0072B2, 0xE69F00,
];

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// One Dark UI colours around the classic piece palette.
    pub fn onedark_default() -> Self {
        Self {
            pieces: CLASSIC.map(Color::from_u32),
            bg: Color::from_u32(0x31353F),
            div_line: Color::from_u32(0x3F444F),
            main_fg: Color::from_u32(0xABB2BF),
            title: Color::from_u32(0xE5C07B),
            inactive_fg: Color::from_u32(0x5C6370),
            flash: Color::from_u32(0xFFFFFF),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to defaults if path is None or the file is missing.
    /// `palette` then overrides the piece colours for high-contrast or colorblind play.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => self.pieces = HIGH_CONTRAST.map(Color::from_u32),
            Palette::Colorblind => self.pieces = COLORBLIND.map(Color::from_u32),
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let base = Self::onedark_default();
        let mut pieces = base.pieces;
        for (slot, key) in pieces.iter_mut().zip(PIECE_KEYS) {
            if let Some(c) = get(key) {
                *slot = c;
            }
        }
        // UI keys match btop themes so existing theme files work unchanged
        Self {
            pieces,
            bg: get("meter_bg").or_else(|| get("main_bg")).unwrap_or(base.bg),
            div_line: get("div_line").unwrap_or(base.div_line),
            main_fg: get("main_fg").unwrap_or(base.main_fg),
            title: get("title").unwrap_or(base.title),
            inactive_fg: get("inactive_fg").unwrap_or(base.inactive_fg),
            flash: get("hi_fg").unwrap_or(base.flash),
        }
    }

    #[inline]
    pub fn piece_color(&self, kind: Kind) -> Color {
        self.pieces[(kind.index() - 1) as usize]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>, scale: u8| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .map(|v| v * scale)
            .ok_or_else(bad)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2, 1)?, channel(2..4, 1)?, channel(4..6, 1)?),
        3 => (channel(0..1, 17)?, channel(1..2, 17)?, channel(2..3, 17)?),
        _ => return Err(bad()),
    };
    Ok(Color::Rgb(r, g, b))
}
