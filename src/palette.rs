//! Color palettes for token classes and error tints
//!
//! Two palettes (dark and light) embedded as YAML at compile time, with
//! optional user overrides from the config directory.
//!
//! Palette loading priority:
//! 1. User config: `~/.config/loupe/palettes/{dark,light}.yaml`
//! 2. Embedded: Built-in palettes compiled into binary

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_paths::ConfigPaths;
use crate::diagnostics::{ErrorKind, Severity};
use crate::syntax::TokenType;

// Embed palette YAML files at compile time
pub const DARK_PALETTE_YAML: &str = include_str!("../palettes/dark.yaml");
pub const LIGHT_PALETTE_YAML: &str = include_str!("../palettes/light.yaml");

/// Alpha applied to error tints given without one (or fully opaque)
const DEFAULT_TINT_ALPHA: u8 = 0x40;

/// Which palette to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark {
            ThemeKind::Dark
        } else {
            ThemeKind::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeKind::Dark
    }

    /// Stable id, also the override file stem
    pub fn id(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    fn builtin_yaml(self) -> &'static str {
        match self {
            ThemeKind::Dark => DARK_PALETTE_YAML,
            ThemeKind::Light => LIGHT_PALETTE_YAML,
        }
    }
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB" or "#RRGGBBAA" when translucent
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Raw palette data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tokens: TokenColorsData,
    #[serde(default)]
    pub base_foreground: Option<String>,
    pub errors: ErrorTintsData,
}

/// Token colors (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenColorsData {
    pub keyword: String,
    pub string: String,
    pub comment: String,
    pub number: String,
    pub function: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default: String,
}

/// Error tints (raw strings from YAML)
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorTintsData {
    pub syntax: String,
    pub warning: String,
    pub indentation: String,
}

/// Background tints for error spans, always translucent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTints {
    pub syntax: Color,
    pub warning: Color,
    pub indentation: Color,
}

/// Resolved palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub number: Color,
    /// Function names; doubles as the inline error indicator color
    pub function: Color,
    pub type_name: Color,
    pub default: Color,
    /// Text color used when classification is reset
    pub base_foreground: Color,
    pub errors: ErrorTints,
}

impl Palette {
    /// Load palette from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: PaletteData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Convert raw palette data to resolved palette
    pub fn from_data(data: PaletteData) -> Result<Self, String> {
        let default = Color::from_hex(&data.tokens.default)?;
        let tint = |hex: &str| -> Result<Color, String> {
            let color = Color::from_hex(hex)?;
            Ok(if color.is_opaque() {
                color.with_alpha(DEFAULT_TINT_ALPHA)
            } else {
                color
            })
        };

        Ok(Palette {
            name: data.name,
            keyword: Color::from_hex(&data.tokens.keyword)?,
            string: Color::from_hex(&data.tokens.string)?,
            comment: Color::from_hex(&data.tokens.comment)?,
            number: Color::from_hex(&data.tokens.number)?,
            function: Color::from_hex(&data.tokens.function)?,
            type_name: Color::from_hex(&data.tokens.type_name)?,
            default,
            base_foreground: data
                .base_foreground
                .as_ref()
                .map(|s| Color::from_hex(s))
                .transpose()?
                .unwrap_or(default),
            errors: ErrorTints {
                syntax: tint(&data.errors.syntax)?,
                warning: tint(&data.errors.warning)?,
                indentation: tint(&data.errors.indentation)?,
            },
        })
    }

    /// Built-in palette (YAML-backed with Rust fallback)
    pub fn builtin(kind: ThemeKind) -> Self {
        match Palette::from_yaml(kind.builtin_yaml()) {
            Ok(palette) => palette,
            Err(e) => {
                tracing::warn!("Built-in {} palette failed to parse: {}", kind.id(), e);
                Self::fallback(kind)
            }
        }
    }

    /// Hardcoded palette used if the embedded YAML cannot be parsed
    fn fallback(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Palette {
                name: "Loupe Dark".to_string(),
                keyword: Color::rgb(0x56, 0x9C, 0xD6),
                string: Color::rgb(0xCE, 0x91, 0x78),
                comment: Color::rgb(0x6A, 0x99, 0x55),
                number: Color::rgb(0xB5, 0xCE, 0xA8),
                function: Color::rgb(0xDC, 0xDC, 0xAA),
                type_name: Color::rgb(0x4E, 0xC9, 0xB0),
                default: Color::rgb(0xD4, 0xD4, 0xD4),
                base_foreground: Color::rgb(0xD4, 0xD4, 0xD4),
                errors: ErrorTints {
                    syntax: Color::rgba(0xF4, 0x47, 0x47, 0x50),
                    warning: Color::rgba(0xCC, 0xA7, 0x00, 0x40),
                    indentation: Color::rgba(0x37, 0x94, 0xFF, 0x30),
                },
            },
            ThemeKind::Light => Palette {
                name: "Loupe Light".to_string(),
                keyword: Color::rgb(0x00, 0x00, 0xFF),
                string: Color::rgb(0xA3, 0x15, 0x15),
                comment: Color::rgb(0x00, 0x80, 0x00),
                number: Color::rgb(0x09, 0x86, 0x58),
                function: Color::rgb(0x79, 0x5E, 0x26),
                type_name: Color::rgb(0x26, 0x7F, 0x99),
                default: Color::rgb(0x1F, 0x1F, 0x1F),
                base_foreground: Color::rgb(0x00, 0x00, 0x00),
                errors: ErrorTints {
                    syntax: Color::rgba(0xE5, 0x14, 0x00, 0x40),
                    warning: Color::rgba(0xBF, 0x88, 0x00, 0x30),
                    indentation: Color::rgba(0x00, 0x5F, 0xB8, 0x20),
                },
            },
        }
    }

    /// Foreground color for a token class
    pub fn token_color(&self, kind: TokenType) -> Color {
        match kind {
            TokenType::Keyword => self.keyword,
            TokenType::String => self.string,
            TokenType::Comment => self.comment,
            TokenType::Number => self.number,
            TokenType::Function | TokenType::Error => self.function,
            TokenType::Type => self.type_name,
            TokenType::Default | TokenType::Operator => self.default,
        }
    }

    /// Background tint for an error span
    pub fn error_color(&self, kind: ErrorKind) -> Color {
        match kind.severity() {
            Severity::Error => self.errors.syntax,
            Severity::Warning => self.errors.warning,
            Severity::Indentation => self.errors.indentation,
        }
    }
}

/// Load a palette from a YAML file
pub fn from_file(path: &Path) -> Result<Palette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read palette file {}: {}", path.display(), e))?;
    Palette::from_yaml(&content)
}

/// Load a palette with priority: user override → builtin
///
/// A user file that fails to load is logged and the builtin is used instead.
pub fn load_palette(paths: Option<&ConfigPaths>, kind: ThemeKind) -> Palette {
    if let Some(user_path) = paths.map(|p| p.palette_file(kind)) {
        if user_path.exists() {
            match from_file(&user_path) {
                Ok(palette) => {
                    tracing::info!("Loaded user palette from {}", user_path.display());
                    return palette;
                }
                Err(e) => tracing::warn!("Ignoring user palette: {}", e),
            }
        }
    }

    tracing::debug!("Using builtin {} palette", kind.id());
    Palette::builtin(kind)
}

/// Both palettes, keyed by the host's dark/light flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSet {
    pub dark: Palette,
    pub light: Palette,
}

impl PaletteSet {
    /// Built-in palettes only
    pub fn builtin() -> Self {
        Self {
            dark: Palette::builtin(ThemeKind::Dark),
            light: Palette::builtin(ThemeKind::Light),
        }
    }

    /// Built-in palettes with the user's overrides applied
    pub fn load() -> Self {
        Self::load_in(ConfigPaths::discover().as_ref())
    }

    /// Built-in palettes with overrides from `paths`, if any
    pub fn load_in(paths: Option<&ConfigPaths>) -> Self {
        Self {
            dark: load_palette(paths, ThemeKind::Dark),
            light: load_palette(paths, ThemeKind::Light),
        }
    }

    pub fn for_theme(&self, is_dark: bool) -> &Palette {
        if is_dark {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn color_for_token(&self, kind: TokenType, is_dark: bool) -> Color {
        self.for_theme(is_dark).token_color(kind)
    }

    pub fn color_for_error(&self, kind: ErrorKind, is_dark: bool) -> Color {
        self.for_theme(is_dark).error_color(kind)
    }
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_palettes_parse() {
        for kind in [ThemeKind::Dark, ThemeKind::Light] {
            let parsed = Palette::from_yaml(kind.builtin_yaml());
            assert!(parsed.is_ok(), "{}: {:?}", kind.id(), parsed.err());
        }
    }

    #[test]
    fn test_embedded_palettes_match_fallback() {
        for kind in [ThemeKind::Dark, ThemeKind::Light] {
            assert_eq!(Palette::builtin(kind), Palette::fallback(kind));
        }
    }

    #[test]
    fn test_opaque_tint_gets_default_alpha() {
        let yaml = DARK_PALETTE_YAML.replace("#F4474750", "#F44747");
        let palette = Palette::from_yaml(&yaml).unwrap();
        assert_eq!(palette.errors.syntax, Color::rgba(0xF4, 0x47, 0x47, DEFAULT_TINT_ALPHA));
    }

    #[test]
    fn test_missing_base_foreground_uses_default() {
        let yaml = DARK_PALETTE_YAML.replace("base_foreground: \"#D4D4D4\"", "");
        let palette = Palette::from_yaml(&yaml).unwrap();
        assert_eq!(palette.base_foreground, palette.default);
    }

    const TOKEN_TYPES: [TokenType; 9] = [
        TokenType::Default,
        TokenType::Keyword,
        TokenType::String,
        TokenType::Comment,
        TokenType::Number,
        TokenType::Function,
        TokenType::Type,
        TokenType::Operator,
        TokenType::Error,
    ];

    const ERROR_KINDS: [ErrorKind; 7] = [
        ErrorKind::UnmatchedOpenBracket,
        ErrorKind::UnmatchedCloseBracket,
        ErrorKind::MismatchedBracket,
        ErrorKind::UnmatchedQuote,
        ErrorKind::MixedIndentation,
        ErrorKind::InconsistentIndentWidth,
        ErrorKind::PossibleMissingTerminator,
    ];

    #[test]
    fn test_color_lookup_follows_theme_flag() {
        let set = PaletteSet::builtin();
        for is_dark in [true, false] {
            let palette = if is_dark { &set.dark } else { &set.light };
            for kind in TOKEN_TYPES {
                assert_eq!(set.color_for_token(kind, is_dark), palette.token_color(kind));
                assert_eq!(set.color_for_token(kind, is_dark).a, 255, "{:?}", kind);
            }
            for kind in ERROR_KINDS {
                let tint = set.color_for_error(kind, is_dark);
                assert_eq!(tint, palette.error_color(kind));
                assert!(tint.a < 255, "{:?} tint is opaque", kind);
            }
        }
    }

    #[test]
    fn test_token_colors_per_class() {
        let set = PaletteSet::builtin();
        for is_dark in [true, false] {
            let p = set.for_theme(is_dark);
            assert_eq!(set.color_for_token(TokenType::Keyword, is_dark), p.keyword);
            assert_eq!(set.color_for_token(TokenType::String, is_dark), p.string);
            assert_eq!(set.color_for_token(TokenType::Comment, is_dark), p.comment);
            assert_eq!(set.color_for_token(TokenType::Number, is_dark), p.number);
            assert_eq!(set.color_for_token(TokenType::Function, is_dark), p.function);
            assert_eq!(set.color_for_token(TokenType::Type, is_dark), p.type_name);
            assert_eq!(set.color_for_token(TokenType::Operator, is_dark), p.default);
        }
        assert_ne!(
            set.color_for_token(TokenType::Keyword, true),
            set.color_for_token(TokenType::Keyword, false)
        );
    }

    #[test]
    fn test_error_tints_per_severity() {
        let set = PaletteSet::builtin();
        for is_dark in [true, false] {
            let errors = &set.for_theme(is_dark).errors;
            assert_eq!(set.color_for_error(ErrorKind::MismatchedBracket, is_dark), errors.syntax);
            assert_eq!(set.color_for_error(ErrorKind::UnmatchedQuote, is_dark), errors.syntax);
            assert_eq!(
                set.color_for_error(ErrorKind::PossibleMissingTerminator, is_dark),
                errors.warning
            );
            assert_eq!(
                set.color_for_error(ErrorKind::MixedIndentation, is_dark),
                errors.indentation
            );
        }
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Color::rgb(0x0A, 0xBC, 0xDE).to_hex(), "#0ABCDE");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }
}
