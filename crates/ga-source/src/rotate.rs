use ga_core::frame::PixelGrid;
use rayon::prelude::*;

/// Quarter-turn clockwise rotation of the sampling grid.
///
/// # Example
/// ```
/// use ga_source::rotate::Rotation;
/// assert_eq!(Rotation::from_degrees(270), Rotation::Deg270);
/// assert_eq!(Rotation::Deg90.next(), Rotation::Deg180);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Nearest quarter turn; any angle is accepted.
    #[must_use]
    pub fn from_degrees(degrees: u16) -> Self {
        match ga_core::config::normalize_rotation(degrees) {
            90 => Self::Deg90,
            180 => Self::Deg180,
            270 => Self::Deg270,
            _ => Self::Deg0,
        }
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation after one more clockwise quarter turn.
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_degrees((self.degrees() + 90) % 360)
    }

    /// `true` when width and height are swapped.
    #[must_use]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Rotate `src` clockwise by `rotation`.
///
/// # Example
/// ```
/// use ga_source::rotate::{Rotation, rotate};
/// use ga_core::frame::PixelGrid;
/// let src = PixelGrid::from_rgb_pixels(2, 1, &[(1, 1, 1), (2, 2, 2)]).unwrap();
/// let dst = rotate(&src, Rotation::Deg90);
/// assert_eq!((dst.width(), dst.height()), (1, 2));
/// assert_eq!(dst.rgb(0, 0), (1, 1, 1));
/// assert_eq!(dst.rgb(0, 1), (2, 2, 2));
/// ```
#[must_use]
pub fn rotate(src: &PixelGrid, rotation: Rotation) -> PixelGrid {
    if rotation == Rotation::Deg0 {
        return src.clone();
    }
    let (w, h) = (src.width(), src.height());
    let (dw, dh) = if rotation.swaps_axes() { (h, w) } else { (w, h) };

    let mut dst = PixelGrid::new(dw, dh);
    let stride = dw as usize * 4;
    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(yd, row)| {
            let yd = yd as u32;
            for (xd, px) in row.chunks_exact_mut(4).enumerate() {
                let xd = xd as u32;
                let (sx, sy) = match rotation {
                    Rotation::Deg90 => (yd, h - 1 - xd),
                    Rotation::Deg180 => (w - 1 - xd, h - 1 - yd),
                    Rotation::Deg270 => (w - 1 - yd, xd),
                    Rotation::Deg0 => (xd, yd),
                };
                let (r, g, b, a) = src.pixel(sx, sy);
                px.copy_from_slice(&[r, g, b, a]);
            }
        });
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_three() -> PixelGrid {
        // 1 2
        // 3 4
        // 5 6
        let px: Vec<(u8, u8, u8)> = (1..=6).map(|v| (v, v, v)).collect();
        PixelGrid::from_rgb_pixels(2, 3, &px).unwrap()
    }

    fn values(grid: &PixelGrid) -> Vec<u8> {
        grid.data().chunks_exact(4).map(|p| p[0]).collect()
    }

    #[test]
    fn quarter_turns() {
        let g = two_by_three();
        assert_eq!(values(&rotate(&g, Rotation::Deg90)), vec![5, 3, 1, 6, 4, 2]);
        assert_eq!(values(&rotate(&g, Rotation::Deg180)), vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(values(&rotate(&g, Rotation::Deg270)), vec![2, 4, 6, 1, 3, 5]);
        let r = rotate(&g, Rotation::Deg270);
        assert_eq!((r.width(), r.height()), (3, 2));
    }

    #[test]
    fn four_turns_is_identity() {
        let g = two_by_three();
        let mut r = g.clone();
        for _ in 0..4 {
            r = rotate(&r, Rotation::Deg90);
        }
        assert_eq!(r, g);
    }

    #[test]
    fn next_cycles() {
        assert_eq!(Rotation::Deg270.next(), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(360), Rotation::Deg0);
    }
}
