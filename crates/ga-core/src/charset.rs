use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 11 glyphes, alphabet par défaut du mode ASCII, du plus sombre au plus clair.
pub const GLYPHS_DEFAULT: &[&str] = &["@", "#", "S", "%", "?", "*", "+", ";", ":", ",", "."];

/// 10 emoji, alphabet par défaut du mode Emoji, de la nuit au soleil.
pub const EMOJI_DEFAULT: &[&str] = &["🌑", "🌘", "🌗", "🌖", "🌕", "🌞", "⭐", "✨", "🌟", "💫"];

/// 10 caractères, compact, pour fond sombre (espace = noir).
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères, Paul Bourke extended, pour fond sombre.
pub const CHARSET_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode : pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Names accepted by [`Alphabet::preset`].
pub const PRESET_NAMES: &[&str] = &["default", "compact", "standard", "blocks", "emoji"];

/// Ordered, non-empty sequence of symbols, darkest first.
///
/// Each symbol is a non-empty string so multi-codepoint emoji survive intact.
///
/// # Example
/// ```
/// use ga_core::charset::Alphabet;
/// let a = Alphabet::from_chars(" .:#@").unwrap();
/// assert_eq!(a.len(), 5);
/// assert_eq!(a.get(0), " ");
/// assert_eq!(a.last(), "@");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Alphabet {
    symbols: Vec<String>,
}

impl Alphabet {
    /// Build an alphabet from explicit symbols.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyAlphabet`] if `symbols` is empty, and
    /// [`CoreError::Config`] if one of the symbols is the empty string.
    pub fn new<I, S>(symbols: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(CoreError::EmptyAlphabet { mode: "any" });
        }
        if let Some(pos) = symbols.iter().position(String::is_empty) {
            return Err(CoreError::Config(format!(
                "symbole vide à l'index {pos} de l'alphabet"
            )));
        }
        Ok(Self { symbols })
    }

    /// One symbol per `char` of `chars`.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyAlphabet`] if `chars` is empty.
    pub fn from_chars(chars: &str) -> Result<Self, CoreError> {
        Self::new(chars.chars().map(String::from))
    }

    /// Built-in alphabet by name, see [`PRESET_NAMES`].
    ///
    /// # Example
    /// ```
    /// use ga_core::charset::Alphabet;
    /// assert_eq!(Alphabet::preset("default").unwrap().get(0), "@");
    /// assert!(Alphabet::preset("nope").is_none());
    /// ```
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        let symbols: Vec<String> = match name {
            "default" => GLYPHS_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
            "emoji" => EMOJI_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
            "compact" => CHARSET_COMPACT.chars().map(String::from).collect(),
            "standard" => CHARSET_STANDARD.chars().map(String::from).collect(),
            "blocks" => CHARSET_BLOCKS.chars().map(String::from).collect(),
            _ => return None,
        };
        Some(Self { symbols })
    }

    /// Default glyph alphabet of the Ascii mode.
    #[must_use]
    pub fn default_glyphs() -> Self {
        Self {
            symbols: GLYPHS_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Default emoji alphabet of the Emoji mode.
    #[must_use]
    pub fn default_emojis() -> Self {
        Self {
            symbols: EMOJI_DEFAULT.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Number of symbols, always >= 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`, clamped to the last symbol.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.symbols[index.min(self.symbols.len() - 1)]
    }

    /// Brightest symbol.
    #[must_use]
    pub fn last(&self) -> &str {
        self.get(self.symbols.len() - 1)
    }

    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl TryFrom<Vec<String>> for Alphabet {
    type Error = CoreError;

    fn try_from(symbols: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(symbols)
    }
}

impl From<Alphabet> for Vec<String> {
    fn from(a: Alphabet) -> Self {
        a.symbols
    }
}

/// Index of the symbol for `luminance` in an alphabet of `len` symbols.
///
/// `floor(luminance / 255 * (len - 1))`, clamped into `[0, len - 1]`.
/// Luminance 0 maps to the first symbol, 255 to the last.
///
/// # Example
/// ```
/// use ga_core::charset::symbol_index;
/// assert_eq!(symbol_index(0.0, 11), 0);
/// assert_eq!(symbol_index(255.0, 11), 10);
/// assert_eq!(symbol_index(127.5, 11), 5);
/// ```
#[inline(always)]
#[must_use]
pub fn symbol_index(luminance: f64, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let max = len - 1;
    let idx = ((luminance / 255.0) * max as f64).floor();
    if idx <= 0.0 { 0 } else { (idx as usize).min(max) }
}
