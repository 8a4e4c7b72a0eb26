use std::io::Write;

use anyhow::{Context, Result};
use crossterm::QueueableCommand;
use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use ga_core::color::Rgb;
use ga_core::frame::ArtResult;

/// Default file name of the ANSI export.
pub const DEFAULT_ANSI_FILE: &str = "ascii-art.ans";

fn to_crossterm(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Write the art with 24-bit foreground colors.
///
/// La couleur n'est réémise que lorsqu'elle change ; reset en fin de ligne.
///
/// # Errors
/// Returns an error if the writer fails.
///
/// # Example
/// ```
/// use ga_export::ansi::write_ansi;
/// use ga_core::color::Rgb;
/// use ga_core::frame::{ArtResult, StyledSymbol};
/// let cell = StyledSymbol { symbol: "@".into(), color: Rgb::WHITE };
/// let art = ArtResult::from_rows(vec![vec![cell]]);
/// let mut out = Vec::new();
/// write_ansi(&mut out, &art).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains('@'));
/// ```
pub fn write_ansi<W: Write>(writer: &mut W, art: &ArtResult) -> Result<()> {
    for row in &art.rows {
        let mut current: Option<Rgb> = None;
        for cell in row {
            if current != Some(cell.color) {
                writer.queue(SetForegroundColor(to_crossterm(cell.color)))?;
                current = Some(cell.color);
            }
            writer.queue(Print(&cell.symbol))?;
        }
        writer.queue(ResetColor)?.queue(Print('\n'))?;
    }
    writer.flush().context("Écriture ANSI impossible")?;
    Ok(())
}

/// Efface l'écran et replace le curseur avant d'écrire, pour le rafraîchissement en place.
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_ansi_frame<W: Write>(writer: &mut W, art: &ArtResult) -> Result<()> {
    writer.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    write_ansi(writer, art)
}

/// ANSI rendering into a `String`.
///
/// # Errors
/// Returns an error if a command cannot be encoded.
pub fn to_ansi_string(art: &ArtResult) -> Result<String> {
    let mut buf = Vec::with_capacity(art.text.len() * 4);
    write_ansi(&mut buf, art)?;
    String::from_utf8(buf).context("Sortie ANSI non UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::frame::StyledSymbol;

    fn cell(symbol: &str, color: Rgb) -> StyledSymbol {
        StyledSymbol {
            symbol: symbol.into(),
            color,
        }
    }

    #[test]
    fn emits_truecolor_sequences() {
        let art = ArtResult::from_rows(vec![vec![
            cell("a", Rgb::new(1, 2, 3)),
            cell("b", Rgb::new(1, 2, 3)),
            cell("c", Rgb::WHITE),
        ]]);
        let s = to_ansi_string(&art).unwrap();
        assert_eq!(s.matches("\x1b[38;2;1;2;3m").count(), 1);
        assert_eq!(s.matches("\x1b[38;2;255;255;255m").count(), 1);
        assert!(s.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn frame_starts_with_clear_and_home() {
        let art = ArtResult::from_rows(vec![vec![cell("z", Rgb::BLACK)]]);
        let mut buf = Vec::new();
        write_ansi_frame(&mut buf, &art).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("\x1b[2J\x1b[1;1H"));
        assert!(s.contains('z'));
    }

    #[test]
    fn plain_symbols_survive() {
        let art = ArtResult::from_rows(vec![
            vec![cell("🌑", Rgb::BLACK), cell("🌕", Rgb::BLACK)],
            vec![cell("x", Rgb::BLACK), cell("y", Rgb::BLACK)],
        ]);
        let s = to_ansi_string(&art).unwrap();
        assert_eq!(s.lines().count(), 2);
        assert!(s.contains("🌑🌕"));
        assert!(s.contains("xy"));
    }
}
