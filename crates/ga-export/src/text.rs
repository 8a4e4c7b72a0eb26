use std::path::Path;

use anyhow::{Context, Result};
use ga_core::frame::ArtResult;

/// Default file name of the plain-text export.
pub const DEFAULT_TEXT_FILE: &str = "ascii-art.txt";

/// Write the plain text exactly as produced, `'\n'` between rows.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_text(path: &Path, art: &ArtResult) -> Result<()> {
    std::fs::write(path, art.text.as_bytes())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Texte exporté : {} ({}×{})",
        path.display(),
        art.width(),
        art.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::color::Rgb;
    use ga_core::frame::StyledSymbol;

    #[test]
    fn file_content_is_the_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_TEXT_FILE);
        let cell = |s: &str| StyledSymbol {
            symbol: s.into(),
            color: Rgb::BLACK,
        };
        let art = ArtResult::from_rows(vec![
            vec![cell("🌑"), cell("✨")],
            vec![cell("@"), cell(".")],
        ]);
        write_text(&path, &art).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "🌑✨\n@.\n");
    }
}
