use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{Alphabet, EMOJI_DEFAULT, GLYPHS_DEFAULT};
use crate::color::Rgb;
use crate::error::CoreError;

/// Limite de la source et de la résolution (côté max en pixels).
pub const MAX_IMAGE_SIDE: u32 = 2000;

/// Brightness/contrast correction, both conventionally in [-100, 100].
///
/// The transform does not clamp these; [`Settings::clamp_all`] does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tone {
    /// Additive shift, `brightness * 255 / 100` per channel.
    pub brightness: i32,
    /// Scale around 128, `(contrast + 100) / 100`.
    pub contrast: i32,
}

impl Tone {
    #[must_use]
    pub const fn new(brightness: i32, contrast: i32) -> Self {
        Self {
            brightness,
            contrast,
        }
    }

    /// `true` when the adjustment is an exact identity.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.brightness == 0 && self.contrast == 0
    }
}

/// Color of symbols in Ascii and Emoji modes.
///
/// # Example
/// ```
/// use ga_core::config::ColorMode;
/// let mode = ColorMode::default();
/// assert!(matches!(mode, ColorMode::Original));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// RGB du pixel (après correction de ton).
    #[default]
    Original,
    /// Gris (L, L, L) avec L la luminance arrondie.
    Grayscale,
    /// Blanc si luminance > 150, noir sinon.
    BlackWhite,
    /// Même couleur pour tous les symboles.
    Custom(Rgb),
}

/// Symbol and color emitted on one side of the binary threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryPair {
    symbol: String,
    color: Rgb,
}

impl BinaryPair {
    /// # Errors
    /// Returns [`CoreError::EmptySymbol`] if `symbol` is empty.
    pub fn new(
        symbol: impl Into<String>,
        color: Rgb,
        which: &'static str,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(CoreError::EmptySymbol { which });
        }
        Ok(Self { symbol, color })
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Render mode with its mode-specific fields.
///
/// Un mode ne porte que ce qu'il lit : pas de seuil en Ascii, pas d'alphabet
/// en Binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Glyph alphabet indexed by luminance.
    Ascii { glyphs: Alphabet, color: ColorMode },
    /// Two symbols split by a luminance threshold.
    Binary {
        threshold: u8,
        /// `char0` / `color0`, below the threshold.
        dark: BinaryPair,
        /// `char1` / `color1`, at or above the threshold.
        light: BinaryPair,
    },
    /// Emoji alphabet indexed by luminance.
    Emoji { emojis: Alphabet, color: ColorMode },
}

impl RenderMode {
    /// Lowercase mode name, as used in settings files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascii { .. } => "ascii",
            Self::Binary { .. } => "binary",
            Self::Emoji { .. } => "emoji",
        }
    }

    /// Alphabet read by the mode, if any.
    #[must_use]
    pub fn alphabet(&self) -> Option<&Alphabet> {
        match self {
            Self::Ascii { glyphs, .. } => Some(glyphs),
            Self::Emoji { emojis, .. } => Some(emojis),
            Self::Binary { .. } => None,
        }
    }
}

/// One rendering request: tone correction plus mode.
///
/// Immuable une fois construit ; toutes les combinaisons représentables sont valides.
///
/// # Example
/// ```
/// use ga_core::config::{RenderConfig, RenderMode};
/// let config = RenderConfig::default();
/// assert!(matches!(config.mode, RenderMode::Ascii { .. }));
/// assert!(config.tone.is_neutral());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub tone: Tone,
    pub mode: RenderMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            mode: RenderMode::Ascii {
                glyphs: Alphabet::default_glyphs(),
                color: ColorMode::Original,
            },
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn ascii(glyphs: Alphabet, color: ColorMode) -> Self {
        Self {
            tone: Tone::default(),
            mode: RenderMode::Ascii { glyphs, color },
        }
    }

    #[must_use]
    pub fn emoji(emojis: Alphabet, color: ColorMode) -> Self {
        Self {
            tone: Tone::default(),
            mode: RenderMode::Emoji { emojis, color },
        }
    }

    #[must_use]
    pub fn binary(threshold: u8, dark: BinaryPair, light: BinaryPair) -> Self {
        Self {
            tone: Tone::default(),
            mode: RenderMode::Binary {
                threshold,
                dark,
                light,
            },
        }
    }

    #[must_use]
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// Mode name as stored in settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    #[default]
    Ascii,
    Binary,
    Emoji,
}

impl FromStr for ModeName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "binary" => Ok(Self::Binary),
            "emoji" => Ok(Self::Emoji),
            other => Err(CoreError::Config(format!("mode inconnu '{other}'"))),
        }
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascii => "ascii",
            Self::Binary => "binary",
            Self::Emoji => "emoji",
        })
    }
}

/// Color mode name as stored in settings; the custom color lives beside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModeName {
    #[default]
    Original,
    Grayscale,
    #[serde(alias = "bw")]
    BlackWhite,
    Custom,
}

impl FromStr for ColorModeName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "grayscale" | "greyscale" => Ok(Self::Grayscale),
            "blackwhite" | "bw" => Ok(Self::BlackWhite),
            "custom" => Ok(Self::Custom),
            other => Err(CoreError::Config(format!("mode couleur inconnu '{other}'"))),
        }
    }
}

/// Réglages utilisateur persistés, à plat, tels que l'interface les manipule.
///
/// Every field has a sane default. [`Settings::to_render_config`] turns them
/// into a validated [`RenderConfig`]; sampling fields (`resolution`,
/// `rotation`) and `zoom` are read by the caller.
///
/// # Example
/// ```
/// use ga_core::config::Settings;
/// let s = Settings::default();
/// assert_eq!(s.resolution, 100);
/// assert_eq!(s.threshold, 128);
/// assert!(s.to_render_config().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub mode: ModeName,
    /// Columns of the sampling grid.
    pub resolution: u32,
    /// Clockwise rotation in degrees, multiple of 90.
    pub rotation: u16,
    pub threshold: u8,
    pub brightness: i32,
    pub contrast: i32,
    pub char0: String,
    pub char1: String,
    pub color0: Rgb,
    pub color1: Rgb,
    pub color_mode: ColorModeName,
    pub custom_color: Rgb,
    pub glyphs: Vec<String>,
    pub emojis: Vec<String>,
    /// Font size (px) of the HTML export.
    pub zoom: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ModeName::Ascii,
            resolution: 100,
            rotation: 0,
            threshold: 128,
            brightness: 0,
            contrast: 0,
            char0: "0".into(),
            char1: "1".into(),
            color0: Rgb::BLACK,
            color1: Rgb::WHITE,
            color_mode: ColorModeName::Original,
            custom_color: Rgb::new(0, 255, 0),
            glyphs: GLYPHS_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
            emojis: EMOJI_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
            zoom: 6,
        }
    }
}

impl Settings {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.brightness = self.brightness.clamp(-100, 100);
        self.contrast = self.contrast.clamp(-100, 100);
        self.resolution = self.resolution.clamp(1, MAX_IMAGE_SIDE);
        self.rotation = normalize_rotation(self.rotation);
        self.zoom = self.zoom.clamp(1, 64);
    }

    /// Tone part of the settings.
    #[must_use]
    pub fn tone(&self) -> Tone {
        Tone::new(self.brightness, self.contrast)
    }

    /// Color mode, resolving `custom` against `custom_color`.
    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        match self.color_mode {
            ColorModeName::Original => ColorMode::Original,
            ColorModeName::Grayscale => ColorMode::Grayscale,
            ColorModeName::BlackWhite => ColorMode::BlackWhite,
            ColorModeName::Custom => ColorMode::Custom(self.custom_color),
        }
    }

    /// Validate into a render request. Only the selected mode's fields are checked.
    ///
    /// An empty `char0`/`char1` falls back to `"0"`/`"1"`.
    ///
    /// # Errors
    /// [`CoreError::EmptyAlphabet`] if the selected mode's alphabet is empty,
    /// [`CoreError::Config`] if one of its symbols is empty.
    pub fn to_render_config(&self) -> Result<RenderConfig, CoreError> {
        let mode = match self.mode {
            ModeName::Ascii => RenderMode::Ascii {
                glyphs: alphabet_for("ascii", &self.glyphs)?,
                color: self.color_mode(),
            },
            ModeName::Emoji => RenderMode::Emoji {
                emojis: alphabet_for("emoji", &self.emojis)?,
                color: self.color_mode(),
            },
            ModeName::Binary => RenderMode::Binary {
                threshold: self.threshold,
                dark: BinaryPair::new(
                    or_default(&self.char0, "0", "char0"),
                    self.color0,
                    "char0",
                )?,
                light: BinaryPair::new(
                    or_default(&self.char1, "1", "char1"),
                    self.color1,
                    "char1",
                )?,
            },
        };
        Ok(RenderConfig {
            tone: self.tone(),
            mode,
        })
    }
}

fn alphabet_for(mode: &'static str, symbols: &[String]) -> Result<Alphabet, CoreError> {
    Alphabet::new(symbols.iter().cloned()).map_err(|e| match e {
        CoreError::EmptyAlphabet { .. } => CoreError::EmptyAlphabet { mode },
        other => other,
    })
}

fn or_default<'a>(symbol: &'a str, fallback: &'a str, which: &str) -> &'a str {
    if symbol.is_empty() {
        log::warn!("{which} vide, utilisation de '{fallback}'");
        fallback
    } else {
        symbol
    }
}

/// Round to the nearest quarter turn, in [0, 360).
///
/// # Example
/// ```
/// use ga_core::config::normalize_rotation;
/// assert_eq!(normalize_rotation(450), 90);
/// assert_eq!(normalize_rotation(100), 90);
/// assert_eq!(normalize_rotation(359), 0);
/// ```
#[must_use]
pub fn normalize_rotation(degrees: u16) -> u16 {
    (((u32::from(degrees) + 45) / 90 % 4) * 90) as u16
}

/// Liste de symboles en TOML : chaîne (un symbole par char) ou tableau.
#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum SymbolList {
    Chars(String),
    List(Vec<String>),
}

impl SymbolList {
    fn into_symbols(self) -> Vec<String> {
        match self {
            Self::Chars(s) => s.chars().map(String::from).collect(),
            Self::List(v) => v,
        }
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Default, Deserialize, Serialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render: Option<RenderSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    binary: Option<BinarySection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sampling: Option<SamplingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export: Option<ExportSection>,
}

/// Render section of the TOML file, all fields optional for partial override.
#[derive(Default, Deserialize, Serialize)]
struct RenderSection {
    mode: Option<ModeName>,
    brightness: Option<i64>,
    contrast: Option<i64>,
    color_mode: Option<ColorModeName>,
    custom_color: Option<Rgb>,
    glyphs: Option<SymbolList>,
    emojis: Option<SymbolList>,
}

/// Binary section: threshold and the two symbol/color pairs.
#[derive(Default, Deserialize, Serialize)]
struct BinarySection {
    threshold: Option<i64>,
    char0: Option<String>,
    char1: Option<String>,
    color0: Option<Rgb>,
    color1: Option<Rgb>,
}

#[derive(Default, Deserialize, Serialize)]
struct SamplingSection {
    resolution: Option<u32>,
    rotation: Option<u16>,
}

#[derive(Default, Deserialize, Serialize)]
struct ExportSection {
    zoom: Option<u32>,
}

/// Parse settings from TOML text, merging over the defaults, then clamp.
///
/// # Errors
/// Returns an error if the text is not valid settings TOML.
///
/// # Example
/// ```
/// use ga_core::config::{parse_settings, ModeName};
/// let s = parse_settings("[render]\nmode = \"binary\"\n[binary]\nthreshold = 300\n").unwrap();
/// assert_eq!(s.mode, ModeName::Binary);
/// assert_eq!(s.threshold, 255);
/// assert_eq!(s.resolution, 100);
/// ```
pub fn parse_settings(content: &str) -> Result<Settings> {
    let file: SettingsFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut s = Settings::default();

    if let Some(r) = file.render {
        if let Some(v) = r.mode {
            s.mode = v;
        }
        if let Some(v) = r.brightness {
            s.brightness = clamp_i64(v, -100, 100);
        }
        if let Some(v) = r.contrast {
            s.contrast = clamp_i64(v, -100, 100);
        }
        if let Some(v) = r.color_mode {
            s.color_mode = v;
        }
        if let Some(v) = r.custom_color {
            s.custom_color = v;
        }
        if let Some(v) = r.glyphs {
            s.glyphs = v.into_symbols();
        }
        if let Some(v) = r.emojis {
            s.emojis = v.into_symbols();
        }
    }

    if let Some(b) = file.binary {
        if let Some(v) = b.threshold {
            s.threshold = clamp_i64(v, 0, 255) as u8;
        }
        if let Some(v) = b.char0 {
            s.char0 = v;
        }
        if let Some(v) = b.char1 {
            s.char1 = v;
        }
        if let Some(v) = b.color0 {
            s.color0 = v;
        }
        if let Some(v) = b.color1 {
            s.color1 = v;
        }
    }

    if let Some(sm) = file.sampling {
        if let Some(v) = sm.resolution {
            s.resolution = v;
        }
        if let Some(v) = sm.rotation {
            s.rotation = v;
        }
    }

    if let Some(e) = file.export {
        if let Some(v) = e.zoom {
            s.zoom = v;
        }
    }

    s.clamp_all();
    Ok(s)
}

fn clamp_i64(v: i64, lo: i32, hi: i32) -> i32 {
    v.clamp(i64::from(lo), i64::from(hi)) as i32
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ga_core::config::load_settings;
/// use std::path::Path;
/// let settings = load_settings(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_settings(&content).with_context(|| format!("Réglages invalides dans {}", path.display()))
}

/// Serialize settings to TOML, every field written.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn settings_to_toml(s: &Settings) -> Result<String> {
    let file = SettingsFile {
        render: Some(RenderSection {
            mode: Some(s.mode),
            brightness: Some(i64::from(s.brightness)),
            contrast: Some(i64::from(s.contrast)),
            color_mode: Some(s.color_mode),
            custom_color: Some(s.custom_color),
            glyphs: Some(SymbolList::List(s.glyphs.clone())),
            emojis: Some(SymbolList::List(s.emojis.clone())),
        }),
        binary: Some(BinarySection {
            threshold: Some(i64::from(s.threshold)),
            char0: Some(s.char0.clone()),
            char1: Some(s.char1.clone()),
            color0: Some(s.color0),
            color1: Some(s.color1),
        }),
        sampling: Some(SamplingSection {
            resolution: Some(s.resolution),
            rotation: Some(s.rotation),
        }),
        export: Some(ExportSection { zoom: Some(s.zoom) }),
    };
    toml::to_string_pretty(&file).context("Erreur de sérialisation TOML")
}

/// Write settings to `path` as TOML, creating parent directories.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save_settings(path: &Path, s: &Settings) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    let content = settings_to_toml(s)?;
    std::fs::write(path, content)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Réglages sauvegardés dans {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let s = parse_settings(
            r##"
            [render]
            mode = "emoji"
            color_mode = "bw"
            contrast = 250

            [sampling]
            resolution = 0
            rotation = 270
            "##,
        )
        .unwrap();
        assert_eq!(s.mode, ModeName::Emoji);
        assert_eq!(s.color_mode, ColorModeName::BlackWhite);
        assert_eq!(s.contrast, 100);
        assert_eq!(s.resolution, 1);
        assert_eq!(s.rotation, 270);
        assert_eq!(s.threshold, 128);
        assert_eq!(s.char1, "1");
    }

    #[test]
    fn glyphs_accept_string_or_list() {
        let s = parse_settings("[render]\nglyphs = \" .:#\"\nemojis = [\"❤️\", \"💙\"]\n").unwrap();
        assert_eq!(s.glyphs, vec![" ", ".", ":", "#"]);
        assert_eq!(s.emojis, vec!["❤️", "💙"]);
    }

    #[test]
    fn invalid_color_is_a_parse_error() {
        assert!(parse_settings("[binary]\ncolor0 = \"#zz0000\"\n").is_err());
    }

    #[test]
    fn empty_alphabet_of_selected_mode_is_rejected() {
        let mut s = Settings {
            glyphs: Vec::new(),
            ..Settings::default()
        };
        assert_eq!(
            s.to_render_config(),
            Err(CoreError::EmptyAlphabet { mode: "ascii" })
        );
        // Alphabet hors mode : ignoré.
        s.mode = ModeName::Binary;
        assert!(s.to_render_config().is_ok());
        s.mode = ModeName::Emoji;
        s.emojis.clear();
        assert_eq!(
            s.to_render_config(),
            Err(CoreError::EmptyAlphabet { mode: "emoji" })
        );
    }

    #[test]
    fn empty_binary_chars_fall_back() {
        let s = Settings {
            mode: ModeName::Binary,
            char0: String::new(),
            ..Settings::default()
        };
        let config = s.to_render_config().unwrap();
        let RenderMode::Binary { dark, light, .. } = config.mode else {
            panic!("mode binaire attendu");
        };
        assert_eq!(dark.symbol(), "0");
        assert_eq!(light.symbol(), "1");
    }

    #[test]
    fn custom_color_travels_with_mode() {
        let s = Settings {
            color_mode: ColorModeName::Custom,
            custom_color: Rgb::new(1, 2, 3),
            ..Settings::default()
        };
        assert_eq!(s.color_mode(), ColorMode::Custom(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let s = Settings {
            mode: ModeName::Binary,
            resolution: 64,
            rotation: 180,
            threshold: 90,
            brightness: -20,
            contrast: 35,
            char0: "·".into(),
            color1: Rgb::new(255, 200, 0),
            color_mode: ColorModeName::Custom,
            ..Settings::default()
        };
        save_settings(&path, &s).unwrap();
        assert_eq!(load_settings(&path).unwrap(), s);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!("Binary".parse::<ModeName>().unwrap(), ModeName::Binary);
        assert!("braille".parse::<ModeName>().is_err());
        assert_eq!(
            "bw".parse::<ColorModeName>().unwrap(),
            ColorModeName::BlackWhite
        );
    }
}
