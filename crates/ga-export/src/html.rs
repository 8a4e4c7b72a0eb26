use std::fmt::Write as _;

use ga_core::color::Rgb;
use ga_core::frame::ArtResult;

/// Default file name of the HTML export.
pub const DEFAULT_HTML_FILE: &str = "ascii-art.html";

/// Escape the five HTML-significant characters.
///
/// # Example
/// ```
/// use ga_export::html::escape;
/// assert_eq!(escape("<&>"), "&lt;&amp;&gt;");
/// ```
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Inline markup: one colored `<span>` per symbol, `<br>` after each row.
///
/// # Example
/// ```
/// use ga_export::html::to_html;
/// use ga_core::color::Rgb;
/// use ga_core::frame::{ArtResult, StyledSymbol};
/// let cell = StyledSymbol { symbol: "#".into(), color: Rgb::WHITE };
/// let art = ArtResult::from_rows(vec![vec![cell]]);
/// assert_eq!(to_html(&art), "<span style=\"color:#ffffff\">#</span><br>");
/// ```
#[must_use]
pub fn to_html(art: &ArtResult) -> String {
    let mut out = String::with_capacity(art.text.len() * 32);
    for row in &art.rows {
        for cell in row {
            // write! sur une String ne peut pas échouer.
            let _ = write!(
                out,
                "<span style=\"color:{}\">{}</span>",
                cell.color,
                escape(&cell.symbol)
            );
        }
        out.push_str("<br>");
    }
    out
}

/// Standalone HTML page around [`to_html`].
///
/// `font_px` sets both font size and line height, like the zoom slider.
#[must_use]
pub fn to_document(art: &ArtResult, font_px: u32, background: Rgb) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>glypha</title>\n\
         <style>\nbody {{ background: {background}; margin: 0; }}\n\
         pre {{ font-family: \"SFMono-Regular\", Menlo, Consolas, \"Liberation Mono\", monospace; \
         font-size: {font_px}px; line-height: {font_px}px; margin: 0; }}\n</style>\n\
         </head>\n<body>\n<pre>{}</pre>\n</body>\n</html>\n",
        to_html(art)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ga_core::frame::StyledSymbol;

    fn art() -> ArtResult {
        ArtResult::from_rows(vec![
            vec![
                StyledSymbol {
                    symbol: "<".into(),
                    color: Rgb::new(255, 0, 0),
                },
                StyledSymbol {
                    symbol: "&".into(),
                    color: Rgb::new(0, 255, 0),
                },
            ],
            vec![
                StyledSymbol {
                    symbol: "🌕".into(),
                    color: Rgb::BLACK,
                },
                StyledSymbol {
                    symbol: "\"".into(),
                    color: Rgb::WHITE,
                },
            ],
        ])
    }

    #[test]
    fn symbols_are_escaped_and_rows_broken() {
        let html = to_html(&art());
        assert_eq!(
            html,
            "<span style=\"color:#ff0000\">&lt;</span>\
             <span style=\"color:#00ff00\">&amp;</span><br>\
             <span style=\"color:#000000\">🌕</span>\
             <span style=\"color:#ffffff\">&quot;</span><br>"
        );
    }

    #[test]
    fn document_carries_zoom() {
        let doc = to_document(&art(), 6, Rgb::BLACK);
        assert!(doc.contains("font-size: 6px; line-height: 6px;"));
        assert!(doc.contains("background: #000000;"));
        assert_eq!(doc.matches("<br>").count(), 2);
    }
}
