use crate::color::Rgb;
use crate::error::CoreError;

/// Grille de pixels échantillonnés. Dimensions fixes, contenu mutable.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel. L'alpha est
/// transporté mais jamais lu par la conversion.
///
/// # Example
/// ```
/// use ga_core::frame::PixelGrid;
/// let grid = PixelGrid::new(10, 10);
/// assert_eq!(grid.data().len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelGrid {
    /// Crée une grille noire opaque aux dimensions données.
    ///
    /// Zero dimensions are bumped to 1 so the invariant `width, height >= 1`
    /// holds; use [`PixelGrid::from_rgba`] to reject them instead.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::PixelGrid;
    /// let grid = PixelGrid::new(100, 50);
    /// assert_eq!(grid.width(), 100);
    /// assert_eq!(grid.height(), 50);
    /// assert_eq!(grid.pixel(0, 0), (0, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap an RGBA buffer, checking the size invariant.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] if a dimension is zero,
    /// [`CoreError::BufferSize`] if `data.len() != width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::PixelGrid;
    /// let grid = PixelGrid::from_rgba(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
    /// assert_eq!(grid.rgb(1, 0), (255, 255, 255));
    /// assert!(PixelGrid::from_rgba(2, 2, vec![0; 8]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a grid from opaque RGB triples, row-major.
    ///
    /// # Errors
    /// Same conditions as [`PixelGrid::from_rgba`].
    pub fn from_rgb_pixels(
        width: u32,
        height: u32,
        pixels: &[(u8, u8, u8)],
    ) -> Result<Self, CoreError> {
        let data = pixels
            .iter()
            .flat_map(|&(r, g, b)| [r, g, b, 255])
            .collect();
        Self::from_rgba(width, height, data)
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable RGBA bytes. The length cannot change through a slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the grid, returning the RGBA buffer.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y` (`width * 4` long).
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Accès au pixel (x, y) sans alpha.
    #[inline(always)]
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let (r, g, b, _) = self.pixel(x, y);
        (r, g, b)
    }

    /// Luminance non pondérée : moyenne simple de R, G et B.
    ///
    /// Volontairement pas BT.709 : les seuils et les index d'alphabet en dépendent.
    ///
    /// # Example
    /// ```
    /// use ga_core::frame::PixelGrid;
    /// let grid = PixelGrid::from_rgb_pixels(1, 1, &[(255, 0, 0)]).unwrap();
    /// assert_eq!(grid.luminance(0, 0), 85.0);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        let (r, g, b) = self.rgb(x, y);
        mean_luminance(r, g, b)
    }
}

/// `(r + g + b) / 3` as a float.
#[inline(always)]
#[must_use]
pub fn mean_luminance(r: u8, g: u8, b: u8) -> f64 {
    f64::from(u16::from(r) + u16::from(g) + u16::from(b)) / 3.0
}

/// One emitted symbol with its render color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledSymbol {
    pub symbol: String,
    pub color: Rgb,
}

/// Résultat d'une conversion : texte brut et séquence stylée, ligne par ligne.
///
/// `text` contains every row followed by `'\n'`. `rows` holds the same
/// symbols grouped by row, each paired with its color; the row boundary is
/// the row-break marker of the styled output.
///
/// # Example
/// ```
/// use ga_core::frame::{ArtResult, StyledSymbol};
/// use ga_core::color::Rgb;
/// let art = ArtResult::from_rows(vec![vec![
///     StyledSymbol { symbol: "0".into(), color: Rgb::BLACK },
///     StyledSymbol { symbol: "1".into(), color: Rgb::WHITE },
/// ]]);
/// assert_eq!(art.text, "01\n");
/// assert_eq!(art.width(), 2);
/// assert_eq!(art.height(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtResult {
    /// Plain text, rows separated (and terminated) by `'\n'`.
    pub text: String,
    /// Styled symbols grouped by row.
    pub rows: Vec<Vec<StyledSymbol>>,
}

impl ArtResult {
    /// Assemble the result from styled rows, deriving the plain text.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<StyledSymbol>>) -> Self {
        let mut text = String::new();
        for row in &rows {
            for cell in row {
                text.push_str(&cell.symbol);
            }
            text.push('\n');
        }
        Self { text, rows }
    }

    /// Symbols per row (0 for an empty result).
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Plain-text rows without their separators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}
