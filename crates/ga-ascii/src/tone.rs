//! Correction de luminosité et de contraste, canal par canal.
//!
//! `v' = (v + brightness * 2.55 - 128) * (contrast + 100) / 100 + 128`, puis
//! clamp [0, 255]. La luminosité est ajoutée AVANT la mise à l'échelle autour
//! de 128 ; l'ordre inverse ne donne pas le même résultat.

use ga_core::config::Tone;
use ga_core::frame::PixelGrid;
use rayon::prelude::*;

/// Table de 256 entrées : valeur de canal → valeur corrigée.
///
/// # Example
/// ```
/// use ga_ascii::tone::ToneCurve;
/// use ga_core::config::Tone;
/// let curve = ToneCurve::new(Tone::new(0, 100));
/// assert_eq!(curve.map(128), 128);
/// assert_eq!(curve.map(200), 255);
/// assert_eq!(curve.map(0), 0);
/// ```
pub struct ToneCurve {
    lut: [u8; 256],
}

impl ToneCurve {
    #[must_use]
    pub fn new(tone: Tone) -> Self {
        let scale = (f64::from(tone.contrast) + 100.0) / 100.0;
        let offset = f64::from(tone.brightness) * (255.0 / 100.0);
        let mut lut = [0u8; 256];
        for (v, slot) in lut.iter_mut().enumerate() {
            *slot = adjust_channel(v as u8, offset, scale);
        }
        Self { lut }
    }

    #[inline(always)]
    #[must_use]
    pub fn map(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}

/// Corrige un canal. Arrondi au pair le plus proche sur les demis, comme un
/// stockage dans un tableau d'octets clampé.
#[inline(always)]
#[must_use]
pub fn adjust_channel(value: u8, offset: f64, scale: f64) -> u8 {
    let v = (f64::from(value) + offset - 128.0) * scale + 128.0;
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Apply `tone` in place to R, G and B of every pixel. Alpha is untouched.
///
/// A neutral tone returns immediately: the formula is an exact identity there.
///
/// # Example
/// ```
/// use ga_ascii::tone::adjust;
/// use ga_core::config::Tone;
/// use ga_core::frame::PixelGrid;
///
/// let mut grid = PixelGrid::from_rgb_pixels(1, 1, &[(100, 100, 100)]).unwrap();
/// adjust(&mut grid, Tone::new(20, 0));
/// assert_eq!(grid.rgb(0, 0), (151, 151, 151));
/// ```
pub fn adjust(grid: &mut PixelGrid, tone: Tone) {
    if tone.is_neutral() {
        return;
    }
    let curve = ToneCurve::new(tone);
    let stride = grid.width() as usize * 4;

    grid.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            px[0] = curve.map(px[0]);
            px[1] = curve.map(px[1]);
            px[2] = curve.map(px[2]);
        }
    });
}

/// Copy of `grid` with `tone` applied.
#[must_use]
pub fn adjusted(grid: &PixelGrid, tone: Tone) -> PixelGrid {
    let mut out = grid.clone();
    adjust(&mut out, tone);
    out
}
