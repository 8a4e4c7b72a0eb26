use std::collections::HashMap;
use std::io::Cursor;

use ab_glyph::{Font, FontRef, PxScale, point};
use anyhow::{Context, Result};
use ga_core::color::Rgb;
use ga_core::frame::ArtResult;
use image::{ImageFormat, RgbaImage};
use rayon::prelude::*;

/// Default file name of the PNG export.
pub const DEFAULT_PNG_FILE: &str = "ascii-art.png";

/// Taille du glyphe PNG en multiples du zoom (capture ×4 de la vue HTML).
pub const PNG_SCALE: u32 = 4;

/// Masques de couverture des symboles d'un rendu, une cellule par symbole.
///
/// Only the symbols present in the art are rasterized; a symbol the font
/// lacks gets an empty mask and shows as background.
pub struct GlyphAtlas {
    cell_width: u32,
    cell_height: u32,
    /// Symbol → alpha mask of `cell_width * cell_height` bytes.
    coverage: HashMap<String, Vec<u8>>,
    empty: Vec<u8>,
}

impl GlyphAtlas {
    /// Rasterize every distinct symbol of `art` with the given font.
    ///
    /// La cellule est calée sur l'avance du 'M' et la hauteur de ligne.
    ///
    /// # Errors
    /// Returns an error if `font_data` is not a valid TrueType/OpenType font.
    pub fn from_font(font_data: &[u8], scale_px: f32, art: &ArtResult) -> Result<Self> {
        let font = FontRef::try_from_slice(font_data).context("Police invalide")?;
        let scale = PxScale::from(scale_px);
        let units = font.height_unscaled();

        let v_advance =
            font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
        let cell_height = ((v_advance * scale.y / units).ceil() as u32).max(1);
        let m_advance = font.h_advance_unscaled(font.glyph_id('M'));
        let cell_width = ((m_advance * scale.x / units).ceil() as u32).max(1);
        let ascent_px = font.ascent_unscaled() * scale.y / units;

        let mut coverage = HashMap::new();
        for cell in art.rows.iter().flatten() {
            if coverage.contains_key(&cell.symbol) {
                continue;
            }
            let mask = rasterize(&font, scale, ascent_px, &cell.symbol, cell_width, cell_height);
            coverage.insert(cell.symbol.clone(), mask);
        }
        log::debug!(
            "Atlas PNG : {} symboles, cellule {cell_width}×{cell_height}",
            coverage.len()
        );
        Self::from_coverage(cell_width, cell_height, coverage)
    }

    /// Build an atlas from precomputed masks.
    ///
    /// # Errors
    /// Returns an error if a cell dimension is zero or a mask has the wrong size.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    /// use ga_export::png::GlyphAtlas;
    /// let masks = HashMap::from([("#".to_string(), vec![255; 4])]);
    /// let atlas = GlyphAtlas::from_coverage(2, 2, masks).unwrap();
    /// assert_eq!(atlas.cell_size(), (2, 2));
    /// ```
    pub fn from_coverage(
        cell_width: u32,
        cell_height: u32,
        coverage: HashMap<String, Vec<u8>>,
    ) -> Result<Self> {
        if cell_width == 0 || cell_height == 0 {
            anyhow::bail!("Cellule vide : {cell_width}×{cell_height}");
        }
        let len = cell_width as usize * cell_height as usize;
        if let Some((symbol, mask)) = coverage.iter().find(|(_, m)| m.len() != len) {
            anyhow::bail!(
                "Masque de '{symbol}' : {} octets, {len} attendus",
                mask.len()
            );
        }
        Ok(Self {
            cell_width,
            cell_height,
            coverage,
            empty: vec![0; len],
        })
    }

    #[must_use]
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_width, self.cell_height)
    }

    /// Pixel size of the image for `art`.
    #[must_use]
    pub fn image_size(&self, art: &ArtResult) -> (u32, u32) {
        (
            (art.width() as u32 * self.cell_width).max(1),
            (art.height() as u32 * self.cell_height).max(1),
        )
    }

    /// Draw `art` onto a `background` image, each glyph in its own color.
    ///
    /// One band of `cell_height` pixel rows per art row, bands in parallel.
    #[must_use]
    pub fn render(&self, art: &ArtResult, background: Rgb) -> RgbaImage {
        let (width, height) = self.image_size(art);
        let mut image = RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([background.r, background.g, background.b, 255]),
        );

        let (cw, ch) = (self.cell_width as usize, self.cell_height as usize);
        let stride = width as usize * 4;
        let band_size = stride * ch;

        image
            .par_chunks_exact_mut(band_size)
            .zip(art.rows.par_iter())
            .for_each(|(band, row)| {
                for (gx, cell) in row.iter().enumerate() {
                    let mask = self.coverage.get(&cell.symbol).unwrap_or(&self.empty);
                    for cy in 0..ch {
                        for cx in 0..cw {
                            let alpha = mask[cy * cw + cx];
                            if alpha == 0 {
                                continue;
                            }
                            let idx = cy * stride + (gx * cw + cx) * 4;
                            band[idx] = blend(cell.color.r, background.r, alpha);
                            band[idx + 1] = blend(cell.color.g, background.g, alpha);
                            band[idx + 2] = blend(cell.color.b, background.b, alpha);
                        }
                    }
                }
            });
        image
    }
}

#[inline(always)]
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = f32::from(alpha) / 255.0;
    (f32::from(fg) * a + f32::from(bg) * (1.0 - a)).round() as u8
}

/// Masque d'un symbole : son premier caractère, ou vide si la police ne l'a pas.
fn rasterize(
    font: &FontRef<'_>,
    scale: PxScale,
    ascent_px: f32,
    symbol: &str,
    cell_width: u32,
    cell_height: u32,
) -> Vec<u8> {
    let mut mask = vec![0u8; cell_width as usize * cell_height as usize];
    let Some(ch) = symbol.chars().next() else {
        return mask;
    };
    let gid = font.glyph_id(ch);
    if gid.0 == 0 {
        log::debug!("Glyphe absent de la police : {symbol}");
        return mask;
    }

    let glyph = gid.with_scale_and_position(scale, point(0.0, ascent_px));
    if let Some(outline) = font.outline_glyph(glyph) {
        let bounds = outline.px_bounds();
        #[allow(clippy::cast_possible_wrap)]
        outline.draw(|x, y, v| {
            let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
            let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
            if px < cell_width && py < cell_height {
                let idx = (py * cell_width + px) as usize;
                mask[idx] = mask[idx].max((v * 255.0).round() as u8);
            }
        });
    }
    mask
}

/// Encode an image as PNG bytes.
///
/// # Errors
/// Returns an error if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Encodage PNG impossible")?;
    Ok(bytes)
}

/// Rasterize `art` with `font_data` at `font_px` and encode it as PNG.
///
/// # Errors
/// Returns an error if the font is invalid or encoding fails.
pub fn to_png(
    art: &ArtResult,
    font_data: &[u8],
    font_px: u32,
    background: Rgb,
) -> Result<Vec<u8>> {
    let atlas = GlyphAtlas::from_font(font_data, (font_px * PNG_SCALE) as f32, art)?;
    encode_png(&atlas.render(art, background))
}
