use anyhow::Result;
use ga_core::config::{MAX_IMAGE_SIDE, Settings};
use ga_core::error::CoreError;
use ga_core::frame::PixelGrid;

use crate::resize::Resizer;
use crate::rotate::{Rotation, rotate};

/// How a source image is laid onto the sampling grid.
///
/// # Example
/// ```
/// use ga_source::sampling::SamplingSpec;
/// use ga_source::rotate::Rotation;
/// let spec = SamplingSpec::new(80, Rotation::Deg90);
/// assert_eq!(spec.columns, 80);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingSpec {
    /// Symbols per row before rotation.
    pub columns: u32,
    pub rotation: Rotation,
}

impl SamplingSpec {
    #[must_use]
    pub fn new(columns: u32, rotation: Rotation) -> Self {
        Self {
            columns: columns.clamp(1, MAX_IMAGE_SIDE),
            rotation,
        }
    }

    /// Sampling part of the user settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.resolution, Rotation::from_degrees(settings.rotation))
    }
}

/// Reject sources larger than [`MAX_IMAGE_SIDE`] on either side.
///
/// # Errors
/// Returns [`CoreError::ImageTooLarge`].
pub fn check_source_size(width: u32, height: u32) -> Result<(), CoreError> {
    if width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
        return Err(CoreError::ImageTooLarge {
            width,
            height,
            max: MAX_IMAGE_SIDE,
        });
    }
    Ok(())
}

/// Grid size for `columns` symbols per row, keeping the source aspect ratio.
///
/// `height = round(columns * src_height / src_width)`, at least 1. When that
/// exceeds [`MAX_IMAGE_SIDE`] the grid is scaled down to `MAX_IMAGE_SIDE` rows,
/// columns shrinking in proportion.
///
/// # Example
/// ```
/// use ga_source::sampling::target_size;
/// assert_eq!(target_size(640, 480, 100), (100, 75));
/// assert_eq!(target_size(3, 1, 1), (1, 1));
/// assert_eq!(target_size(100, 2000, 200), (100, 2000));
/// ```
#[must_use]
pub fn target_size(src_width: u32, src_height: u32, columns: u32) -> (u32, u32) {
    let columns = columns.max(1);
    let aspect = f64::from(src_height) / f64::from(src_width.max(1));
    let height = round_half_up(f64::from(columns) * aspect);
    if height <= f64::from(MAX_IMAGE_SIDE) {
        return (columns, (height as u32).max(1));
    }
    let width = round_half_up(f64::from(MAX_IMAGE_SIDE) / aspect);
    ((width as u32).clamp(1, columns), MAX_IMAGE_SIDE)
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Lay `src` onto the sampling grid: size check, resize, then rotation.
///
/// `resizer` is reused across calls.
///
/// # Errors
/// Returns an error if the source is too large or the resize fails.
///
/// # Example
/// ```
/// use ga_source::resize::Resizer;
/// use ga_source::sampling::{SamplingSpec, prepare};
/// use ga_source::rotate::Rotation;
/// use ga_core::frame::PixelGrid;
/// let src = PixelGrid::new(200, 100);
/// let mut resizer = Resizer::new();
/// let grid = prepare(&src, SamplingSpec::new(40, Rotation::Deg90), &mut resizer).unwrap();
/// assert_eq!((grid.width(), grid.height()), (20, 40));
/// ```
pub fn prepare(
    src: &PixelGrid,
    spec: SamplingSpec,
    resizer: &mut Resizer,
) -> Result<PixelGrid> {
    check_source_size(src.width(), src.height())?;

    let (width, height) = target_size(src.width(), src.height(), spec.columns);
    if width < spec.columns {
        log::warn!(
            "Source trop haute : {} colonnes au lieu de {} (max {MAX_IMAGE_SIDE} lignes)",
            width,
            spec.columns
        );
    }
    let resized = resizer.resize(src, width, height)?;

    log::debug!(
        "Grille d'échantillonnage {}×{} → {width}×{height}, rotation {}°",
        src.width(),
        src.height(),
        spec.rotation.degrees()
    );

    Ok(if spec.rotation == Rotation::Deg0 {
        resized
    } else {
        rotate(&resized, spec.rotation)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up() {
        // 5 * 1/2 = 2.5 → 3
        assert_eq!(target_size(2, 1, 5), (5, 3));
        assert_eq!(target_size(100, 33, 10), (10, 3));
    }

    #[test]
    fn too_large_source_is_rejected() {
        let src = PixelGrid::new(2001, 10);
        let err = prepare(&src, SamplingSpec::new(10, Rotation::Deg0), &mut Resizer::new())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CoreError>(),
            Some(&CoreError::ImageTooLarge {
                width: 2001,
                height: 10,
                max: 2000
            })
        );
    }

    #[test]
    fn rows_never_exceed_the_side_limit() {
        for (w, h, columns) in [(1, 2000, 2000), (1, 2000, 100), (3, 2000, 2000), (10, 1999, 50)] {
            let (tw, th) = target_size(w, h, columns);
            assert!(th <= MAX_IMAGE_SIDE, "{w}×{h} @ {columns} → {tw}×{th}");
            assert!((1..=columns).contains(&tw));
        }
        assert_eq!(target_size(1, 2000, 2000), (1, 2000));
        // 4:1 en hauteur, 600 colonnes → 2400 lignes, ramené à 500×2000.
        assert_eq!(target_size(100, 400, 600), (500, 2000));
    }

    #[test]
    fn tall_source_yields_bounded_grid() {
        let src = PixelGrid::new(1, 2000);
        let spec = SamplingSpec::new(100, Rotation::Deg0);
        let grid = prepare(&src, spec, &mut Resizer::new()).unwrap();
        assert_eq!((grid.width(), grid.height()), (1, 2000));
    }

    #[test]
    fn settings_drive_sampling() {
        let settings = Settings {
            resolution: 5000,
            rotation: 180,
            ..Settings::default()
        };
        let spec = SamplingSpec::from_settings(&settings);
        assert_eq!(spec.columns, 2000);
        assert_eq!(spec.rotation, Rotation::Deg180);
    }

    #[test]
    fn prepare_keeps_aspect() {
        let src = PixelGrid::new(300, 150);
        let mut resizer = Resizer::new();
        let grid = prepare(&src, SamplingSpec::new(30, Rotation::Deg0), &mut resizer).unwrap();
        assert_eq!((grid.width(), grid.height()), (30, 15));
        let grid = prepare(&src, SamplingSpec::new(30, Rotation::Deg270), &mut resizer).unwrap();
        assert_eq!((grid.width(), grid.height()), (15, 30));
    }
}
