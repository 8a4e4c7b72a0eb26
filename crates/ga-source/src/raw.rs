use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use ga_core::frame::PixelGrid;

/// Read a raw RGBA dump (`width * height * 4` bytes, row-major).
///
/// Produit par exemple avec `ffmpeg -i photo.jpg -f rawvideo -pix_fmt rgba photo.rgba`.
///
/// # Errors
/// Returns an error if reading fails or the byte count does not match.
///
/// # Example
/// ```
/// use ga_source::raw::read_rgba;
/// let bytes: &[u8] = &[0, 0, 0, 255, 255, 255, 255, 255];
/// let grid = read_rgba(bytes, 2, 1).unwrap();
/// assert_eq!(grid.rgb(1, 0), (255, 255, 255));
/// ```
pub fn read_rgba<R: Read>(mut reader: R, width: u32, height: u32) -> Result<PixelGrid> {
    let expected = width as usize * height as usize * 4;
    let mut data = Vec::with_capacity(expected);
    reader
        .read_to_end(&mut data)
        .context("Lecture du flux RGBA impossible")?;
    let grid = PixelGrid::from_rgba(width, height, data)
        .with_context(|| format!("Flux RGBA incompatible avec {width}×{height}"))?;
    Ok(grid)
}

/// Load a raw RGBA file; `-` reads standard input.
///
/// # Errors
/// Returns an error if the file cannot be read or has the wrong size.
///
/// # Example
/// ```no_run
/// use ga_source::raw::load_rgba;
/// use std::path::Path;
/// let grid = load_rgba(Path::new("photo.rgba"), 640, 480).unwrap();
/// ```
pub fn load_rgba(path: &Path, width: u32, height: u32) -> Result<PixelGrid> {
    if path.as_os_str() == "-" {
        log::info!("Lecture RGBA {width}×{height} depuis stdin");
        return read_rgba(std::io::stdin().lock(), width, height);
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {}", path.display()))?;
    log::info!("Lecture RGBA {width}×{height} depuis {}", path.display());
    read_rgba(std::io::BufReader::new(file), width, height)
        .with_context(|| format!("Source invalide : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_stream_is_rejected() {
        let bytes: &[u8] = &[1, 2, 3, 4, 5];
        assert!(read_rgba(bytes, 1, 1).is_err());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let bytes: &[u8] = &[];
        assert!(read_rgba(bytes, 0, 0).is_err());
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.rgba");
        std::fs::write(&path, [9, 8, 7, 255, 1, 2, 3, 255]).unwrap();
        let grid = load_rgba(&path, 1, 2).unwrap();
        assert_eq!(grid.rgb(0, 1), (1, 2, 3));
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = load_rgba(Path::new("/nonexistent/glypha.rgba"), 1, 1).unwrap_err();
        assert!(format!("{err:#}").contains("glypha.rgba"));
    }
}
