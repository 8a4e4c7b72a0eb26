use anyhow::{Context, Result};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use ga_core::frame::PixelGrid;

/// Redimensionnement de la source sur la grille d'échantillonnage.
///
/// Bilinéaire, proche du lissage d'un canvas de navigateur. The inner
/// fast_image_resize state is kept between calls; hold one per render loop.
///
/// # Example
/// ```
/// use ga_source::resize::Resizer;
/// use ga_core::frame::PixelGrid;
/// let mut resizer = Resizer::new();
/// let grid = resizer.resize(&PixelGrid::new(100, 100), 50, 25).unwrap();
/// assert_eq!((grid.width(), grid.height()), (50, 25));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
}

impl Resizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        }
    }

    /// Resample `src` to `width × height`.
    ///
    /// # Errors
    /// Returns an error if fast_image_resize rejects the buffers.
    pub fn resize(&mut self, src: &PixelGrid, width: u32, height: u32) -> Result<PixelGrid> {
        let mut dst = PixelGrid::new(width, height);
        self.resize_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Resample `src` into `dst`; the size of `dst` is the target size.
    ///
    /// # Errors
    /// Returns an error if fast_image_resize rejects the buffers.
    pub fn resize_into(&mut self, src: &PixelGrid, dst: &mut PixelGrid) -> Result<()> {
        if (src.width(), src.height()) == (dst.width(), dst.height()) {
            dst.data_mut().copy_from_slice(src.data());
            return Ok(());
        }

        // Source en lecture seule : pas de copie de travail.
        let src_view = ImageRef::new(src.width(), src.height(), src.data(), PixelType::U8x4)
            .context("Dimensions source invalides")?;
        let (width, height) = (dst.width(), dst.height());
        let mut dst_view = Image::from_slice_u8(width, height, dst.data_mut(), PixelType::U8x4)
            .context("Dimensions cible invalides")?;

        self.inner
            .resize(&src_view, &mut dst_view, Some(&self.options))
            .context("Redimensionnement impossible")
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}
