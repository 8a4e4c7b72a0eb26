use ga_core::color::Rgb;
use ga_core::config::ColorMode;

/// Seuil fixe du mode noir/blanc, indépendant du seuil binaire.
pub const BLACK_WHITE_CUTOFF: f64 = 150.0;

/// Map a pixel color according to the selected color mode.
///
/// `luminance` is the unweighted channel mean of the same pixel.
///
/// # Example
/// ```
/// use ga_ascii::color_map::color_for;
/// use ga_core::color::Rgb;
/// use ga_core::config::ColorMode;
/// let c = color_for((200, 50, 50), 100.0, &ColorMode::Original);
/// assert_eq!(c, Rgb::new(200, 50, 50));
/// ```
#[inline]
#[must_use]
pub fn color_for(rgb: (u8, u8, u8), luminance: f64, mode: &ColorMode) -> Rgb {
    match mode {
        ColorMode::Original => Rgb::from(rgb),
        ColorMode::Custom(c) => *c,
        ColorMode::BlackWhite => {
            if luminance > BLACK_WHITE_CUTOFF {
                Rgb::WHITE
            } else {
                Rgb::BLACK
            }
        }
        ColorMode::Grayscale => Rgb::gray(luminance.round().clamp(0.0, 255.0) as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_ignores_hue() {
        // Même luminance (85), teintes différentes.
        for rgb in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (85, 85, 85)] {
            assert_eq!(color_for(rgb, 85.0, &ColorMode::Grayscale), Rgb::gray(85));
        }
    }

    #[test]
    fn grayscale_rounds_thirds() {
        assert_eq!(color_for((1, 1, 0), 2.0 / 3.0, &ColorMode::Grayscale), Rgb::gray(1));
        assert_eq!(color_for((1, 0, 0), 1.0 / 3.0, &ColorMode::Grayscale), Rgb::gray(0));
    }

    #[test]
    fn black_white_cutoff_is_strict() {
        assert_eq!(color_for((150, 150, 150), 150.0, &ColorMode::BlackWhite), Rgb::BLACK);
        assert_eq!(
            color_for((151, 150, 150), 451.0 / 3.0, &ColorMode::BlackWhite),
            Rgb::WHITE
        );
    }

    #[test]
    fn custom_overrides_pixel() {
        let c = Rgb::new(0, 255, 0);
        assert_eq!(color_for((12, 34, 56), 34.0, &ColorMode::Custom(c)), c);
    }
}
