/// Mise en forme externe du résultat : texte brut, HTML, ANSI truecolor, PNG
/// et lien de partage.
///
/// The core only yields (symbol, color) pairs; every markup concern lives here.

pub mod ansi;
pub mod html;
pub mod png;
pub mod share;
pub mod text;
