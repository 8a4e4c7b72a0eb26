use ga_core::color::Rgb;
use ga_core::config::{BinaryPair, ColorMode, RenderConfig, RenderMode};
use ga_core::frame::{ArtResult, PixelGrid, StyledSymbol};
use rayon::prelude::*;

use crate::color_map::color_for;
use crate::lut::SymbolLut;

/// Résolution d'un mode de rendu, prête pour la boucle pixel.
#[derive(Clone, Debug)]
enum Mapping {
    Binary {
        threshold: f64,
        dark: BinaryPair,
        light: BinaryPair,
    },
    Indexed {
        lut: SymbolLut,
        color: ColorMode,
    },
}

/// Maps every pixel of a grid to a symbol and a color.
///
/// Built once per mode; the alphabet LUT is reused across renders.
///
/// # Example
/// ```
/// use ga_ascii::mapper::SymbolMapper;
/// use ga_core::config::RenderConfig;
/// use ga_core::frame::PixelGrid;
///
/// let mapper = SymbolMapper::new(&RenderConfig::default().mode);
/// let art = mapper.render(&PixelGrid::new(4, 2));
/// assert_eq!(art.text, "@@@@\n@@@@\n");
/// ```
#[derive(Clone, Debug)]
pub struct SymbolMapper {
    mapping: Mapping,
}

/// Sortie d'une ligne, possédée par un seul worker jusqu'à la fusion.
struct RowOutput {
    text: String,
    cells: Vec<StyledSymbol>,
}

impl SymbolMapper {
    #[must_use]
    pub fn new(mode: &RenderMode) -> Self {
        let mapping = match mode {
            RenderMode::Binary {
                threshold,
                dark,
                light,
            } => Mapping::Binary {
                threshold: f64::from(*threshold),
                dark: dark.clone(),
                light: light.clone(),
            },
            RenderMode::Ascii { glyphs, color } => Mapping::Indexed {
                lut: SymbolLut::new(glyphs.clone()),
                color: *color,
            },
            RenderMode::Emoji { emojis, color } => Mapping::Indexed {
                lut: SymbolLut::new(emojis.clone()),
                color: *color,
            },
        };
        Self { mapping }
    }

    /// Symbol and color for one pixel.
    #[inline(always)]
    #[must_use]
    pub fn map_pixel(&self, r: u8, g: u8, b: u8) -> (&str, Rgb) {
        let sum = u16::from(r) + u16::from(g) + u16::from(b);
        let luminance = f64::from(sum) / 3.0;

        match &self.mapping {
            Mapping::Binary {
                threshold,
                dark,
                light,
            } => {
                if luminance >= *threshold {
                    (light.symbol(), light.color())
                } else {
                    (dark.symbol(), dark.color())
                }
            }
            Mapping::Indexed { lut, color } => {
                (lut.map_sum(sum), color_for((r, g, b), luminance, color))
            }
        }
    }

    fn render_row(&self, row: &[u8]) -> RowOutput {
        let width = row.len() / 4;
        let mut out = RowOutput {
            text: String::with_capacity(width + 1),
            cells: Vec::with_capacity(width),
        };
        for px in row.chunks_exact(4) {
            let (symbol, color) = self.map_pixel(px[0], px[1], px[2]);
            out.text.push_str(symbol);
            out.cells.push(StyledSymbol {
                symbol: symbol.to_string(),
                color,
            });
        }
        out.text.push('\n');
        out
    }

    /// Render the whole grid, row-major.
    ///
    /// Rows are computed in parallel and merged in order: the result is
    /// identical to a single top-to-bottom pass.
    #[must_use]
    pub fn render(&self, grid: &PixelGrid) -> ArtResult {
        let stride = grid.width() as usize * 4;
        let rows: Vec<RowOutput> = grid
            .data()
            .par_chunks(stride)
            .map(|row| self.render_row(row))
            .collect();

        let text_len = rows.iter().map(|r| r.text.len()).sum();
        let mut art = ArtResult {
            text: String::with_capacity(text_len),
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            art.text.push_str(&row.text);
            art.rows.push(row.cells);
        }
        art
    }
}

/// Render an already tone-adjusted grid with `config.mode`.
///
/// `config.tone` is NOT applied here; see [`crate::compositor::convert`].
///
/// # Example
/// ```
/// use ga_ascii::mapper::render;
/// use ga_core::color::Rgb;
/// use ga_core::config::{BinaryPair, RenderConfig};
/// use ga_core::frame::PixelGrid;
///
/// let grid = PixelGrid::from_rgb_pixels(2, 1, &[(0, 0, 0), (255, 255, 255)]).unwrap();
/// let config = RenderConfig::binary(
///     128,
///     BinaryPair::new("0", Rgb::BLACK, "char0").unwrap(),
///     BinaryPair::new("1", Rgb::WHITE, "char1").unwrap(),
/// );
/// let art = render(&grid, &config);
/// assert_eq!(art.text, "01\n");
/// ```
#[must_use]
pub fn render(grid: &PixelGrid, config: &RenderConfig) -> ArtResult {
    SymbolMapper::new(&config.mode).render(grid)
}
