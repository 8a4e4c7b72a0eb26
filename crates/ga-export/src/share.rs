use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ga_core::frame::ArtResult;

/// Default file name of the share-link export.
pub const DEFAULT_SHARE_FILE: &str = "ascii-art.url";

/// Paramètre de requête portant le texte encodé.
const ART_PARAM: &str = "art=";

/// Base64 (standard alphabet, padded) of the UTF-8 text, query-escaped.
///
/// # Example
/// ```
/// use ga_export::share::encode;
/// assert_eq!(encode("01\n"), "MDEK");
/// assert_eq!(encode("@#"), "QCM%3D");
/// ```
#[must_use]
pub fn encode(text: &str) -> String {
    let raw = STANDARD.encode(text.as_bytes());
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '+' => out.push_str("%2B"),
            '/' => out.push_str("%2F"),
            '=' => out.push_str("%3D"),
            c => out.push(c),
        }
    }
    out
}

/// Shareable link: `base` followed by `?art=<encoded plain text>`.
///
/// # Example
/// ```
/// use ga_export::share::share_url;
/// use ga_core::color::Rgb;
/// use ga_core::frame::{ArtResult, StyledSymbol};
/// let cell = StyledSymbol { symbol: "0".into(), color: Rgb::BLACK };
/// let art = ArtResult::from_rows(vec![vec![cell]]);
/// assert_eq!(share_url("https://example.org/", &art), "https://example.org/?art=MAo%3D");
/// ```
#[must_use]
pub fn share_url(base: &str, art: &ArtResult) -> String {
    format!("{base}?{ART_PARAM}{}", encode(&art.text))
}

/// Retrouve le texte d'un lien de partage (ou de sa seule valeur `art`).
///
/// Accepts escaped and unescaped payloads; a space stands for `+` as a
/// form-decoded query would produce.
///
/// # Errors
/// Returns an error if no payload is found, or it is not base64 of UTF-8 text.
pub fn decode(link: &str) -> Result<String> {
    let payload = match link.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .find_map(|pair| pair.strip_prefix(ART_PARAM))
            .context("Paramètre 'art' absent du lien")?,
        None => link.strip_prefix(ART_PARAM).unwrap_or(link),
    };
    let raw = payload
        .trim_matches(|c: char| c == '\n' || c == '\r')
        .replace("%2B", "+")
        .replace("%2b", "+")
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3D", "=")
        .replace("%3d", "=")
        .replace(' ', "+");
    let bytes = STANDARD
        .decode(raw.as_bytes())
        .context("Lien de partage : base64 invalide")?;
    String::from_utf8(bytes).context("Lien de partage : texte non UTF-8")
}
