use std::borrow::Cow;

use ga_core::config::{RenderConfig, RenderMode};
use ga_core::error::CoreError;
use ga_core::frame::{ArtResult, PixelGrid};

use crate::mapper::SymbolMapper;
use crate::tone;

/// Compositor enchaîne la correction de ton et le mapping pixel→symbole.
///
/// Keeps the mapper (and its LUT) between calls; it is rebuilt only when
/// the render mode changes.
///
/// # Example
/// ```
/// use ga_ascii::compositor::Compositor;
/// use ga_core::config::RenderConfig;
/// use ga_core::frame::PixelGrid;
///
/// let mut compositor = Compositor::new();
/// let art = compositor.process(&PixelGrid::new(3, 2), &RenderConfig::default());
/// assert_eq!(art.height(), 2);
/// ```
#[derive(Default)]
pub struct Compositor {
    current_mode: Option<RenderMode>,
    mapper: Option<SymbolMapper>,
}

impl Compositor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the mapper if `mode` differs from the cached one.
    pub fn update_if_needed(&mut self, mode: &RenderMode) -> &SymbolMapper {
        if self.current_mode.as_ref() != Some(mode) || self.mapper.is_none() {
            log::debug!("Construction du mapper pour le mode {}", mode.name());
            self.current_mode = Some(mode.clone());
            self.mapper = None;
        }
        self.mapper.get_or_insert_with(|| SymbolMapper::new(mode))
    }

    /// Tone-correct a copy of `grid`, then map it. `grid` is left untouched.
    pub fn process(&mut self, grid: &PixelGrid, config: &RenderConfig) -> ArtResult {
        let adjusted: Cow<'_, PixelGrid> = if config.tone.is_neutral() {
            Cow::Borrowed(grid)
        } else {
            Cow::Owned(tone::adjusted(grid, config.tone))
        };

        let art = self.update_if_needed(&config.mode).render(&adjusted);
        log::debug!(
            "Conversion {}×{} en mode {} terminée",
            grid.width(),
            grid.height(),
            config.mode.name()
        );
        art
    }
}

/// One-shot conversion: tone, then symbols.
///
/// # Example
/// ```
/// use ga_ascii::compositor::convert;
/// use ga_core::config::{RenderConfig, Tone};
/// use ga_core::frame::PixelGrid;
///
/// let grid = PixelGrid::from_rgb_pixels(1, 1, &[(0, 0, 0)]).unwrap();
/// let config = RenderConfig::default().with_tone(Tone::new(100, 0));
/// assert_eq!(convert(&grid, &config).text, ".\n");
/// ```
#[must_use]
pub fn convert(grid: &PixelGrid, config: &RenderConfig) -> ArtResult {
    Compositor::new().process(grid, config)
}

/// Conversion depuis un buffer RGBA brut, validé avant tout traitement.
///
/// # Errors
/// [`CoreError::InvalidDimensions`] or [`CoreError::BufferSize`] when the
/// buffer does not describe a `width × height` RGBA grid. No pixel is read
/// in that case.
pub fn convert_rgba(
    width: u32,
    height: u32,
    data: Vec<u8>,
    config: &RenderConfig,
) -> Result<ArtResult, CoreError> {
    let grid = PixelGrid::from_rgba(width, height, data)?;
    Ok(convert(&grid, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::charset::Alphabet;
    use ga_core::color::Rgb;
    use ga_core::config::{BinaryPair, ColorMode, Tone};

    fn binary() -> RenderConfig {
        RenderConfig::binary(
            128,
            BinaryPair::new("0", Rgb::BLACK, "char0").unwrap(),
            BinaryPair::new("1", Rgb::WHITE, "char1").unwrap(),
        )
    }

    #[test]
    fn neutral_tone_renders_as_is() {
        let grid = PixelGrid::from_rgb_pixels(2, 1, &[(0, 0, 0), (255, 255, 255)]).unwrap();
        let art = convert(&grid, &binary());
        assert_eq!(art.text, "01\n");
    }

    #[test]
    fn tone_runs_before_mapping() {
        // brightness 20 : 100 + 51 = 151, au-dessus du seuil.
        let grid = PixelGrid::from_rgb_pixels(1, 1, &[(100, 100, 100)]).unwrap();
        assert_eq!(convert(&grid, &binary()).text, "0\n");
        let config = binary().with_tone(Tone::new(20, 0));
        assert_eq!(convert(&grid, &config).text, "1\n");
    }

    #[test]
    fn original_color_is_post_tone() {
        let grid = PixelGrid::from_rgb_pixels(1, 1, &[(100, 100, 100)]).unwrap();
        let config = RenderConfig::ascii(Alphabet::default_glyphs(), ColorMode::Original)
            .with_tone(Tone::new(20, 0));
        let art = convert(&grid, &config);
        assert_eq!(art.rows[0][0].color, Rgb::gray(151));
    }

    #[test]
    fn input_grid_is_not_mutated() {
        let grid = PixelGrid::from_rgb_pixels(1, 1, &[(10, 20, 30)]).unwrap();
        let before = grid.clone();
        let _ = convert(&grid, &RenderConfig::default().with_tone(Tone::new(50, 50)));
        assert_eq!(grid, before);
    }

    #[test]
    fn mapper_is_cached_until_mode_changes() {
        let mut compositor = Compositor::new();
        let grid = PixelGrid::new(2, 2);
        let a = compositor.process(&grid, &RenderConfig::default());
        let b = compositor.process(&grid, &RenderConfig::default());
        assert_eq!(a, b);
        let c = compositor.process(&grid, &binary());
        assert_eq!(c.text, "00\n00\n");
        let emoji = RenderConfig::emoji(Alphabet::default_emojis(), ColorMode::Original);
        assert_eq!(compositor.process(&grid, &emoji).rows[0][0].symbol, "🌑");
    }

    #[test]
    fn convert_rgba_rejects_bad_buffers_before_work() {
        let config = RenderConfig::default();
        assert_eq!(
            convert_rgba(0, 1, Vec::new(), &config),
            Err(CoreError::InvalidDimensions {
                width: 0,
                height: 1
            })
        );
        assert_eq!(
            convert_rgba(2, 1, vec![0; 7], &config),
            Err(CoreError::BufferSize {
                expected: 8,
                actual: 7
            })
        );
        assert_eq!(convert_rgba(1, 1, vec![0, 0, 0, 0], &config).unwrap().text, "@\n");
    }
}
