use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque sRGB color, 8 bits per channel.
///
/// Sérialisé en TOML sous forme `"#rrggbb"`.
///
/// # Example
/// ```
/// use ga_core::color::Rgb;
/// let c: Rgb = "#00ff00".parse().unwrap();
/// assert_eq!(c, Rgb::new(0, 255, 0));
/// assert_eq!(c.to_string(), "#00ff00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Gray with R = G = B = `level`.
    ///
    /// # Example
    /// ```
    /// use ga_core::color::Rgb;
    /// assert_eq!(Rgb::gray(85), Rgb::new(85, 85, 85));
    /// ```
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Parse `#rrggbb` or the short form `#rgb`. The leading `#` is optional.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidColor`] if the string is not a hex color.
    ///
    /// # Example
    /// ```
    /// use ga_core::color::Rgb;
    /// assert_eq!(Rgb::from_hex("#FFF").unwrap(), Rgb::WHITE);
    /// assert!(Rgb::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc → #aabbcc
                let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(Rgb::from_hex("#000000").unwrap(), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#FFFFFF").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("1a2b3c").unwrap(), Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(Rgb::from_hex("#0f8").unwrap(), Rgb::new(0x00, 0xff, 0x88));
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "#", "#12", "#1234567", "#gg0000", "#ééé", "red"] {
            assert!(Rgb::from_hex(s).is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn signs_are_not_hex_digits() {
        // from_str_radix accepte un '+' en tête de chaque paire.
        for s in ["#+f+f+f", "+f+f+f", "#+ff", "#-1-1-1", "# ff ff"] {
            assert!(Rgb::from_hex(s).is_err(), "accepted {s:?}");
        }
        assert_eq!(Rgb::from_hex("  #Ab0  ").unwrap(), Rgb::new(0xaa, 0xbb, 0x00));
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(255, 0, 171).to_string(), "#ff00ab");
    }

    #[test]
    fn serde_uses_hex_strings() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            color: Rgb,
        }
        let w: Wrapper = toml::from_str("color = \"#00FF00\"").unwrap();
        assert_eq!(w.color, Rgb::new(0, 255, 0));
        let out = toml::to_string(&w).unwrap();
        assert!(out.contains("\"#00ff00\""), "{out}");
        assert!(toml::from_str::<Wrapper>("color = \"nope\"").is_err());
    }
}
