use thiserror::Error;

/// Errors originating from the core module.
///
/// Toutes ces erreurs sont détectées à la frontière, avant qu'un seul pixel
/// ne soit touché.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Alphabet required by the selected mode has no symbols.
    #[error("Alphabet vide pour le mode {mode}")]
    EmptyAlphabet {
        /// Mode whose alphabet is empty.
        mode: &'static str,
    },

    /// A binary-mode symbol is the empty string.
    #[error("Symbole vide : {which}")]
    EmptySymbol {
        /// Which setting held the empty symbol (`char0`, `char1`, ...).
        which: &'static str,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel buffer length does not match `width * height * 4`.
    #[error("Taille de buffer invalide : {actual} octets, {expected} attendus")]
    BufferSize {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// Color string is not `#rgb` or `#rrggbb`.
    #[error("Couleur invalide : {0}")]
    InvalidColor(String),

    /// Source image exceeds the accepted sampling size.
    #[error("Image trop grande : {width}×{height} (max {max}×{max})")]
    ImageTooLarge {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
        /// Maximum accepted side length.
        max: u32,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
