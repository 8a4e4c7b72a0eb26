/// Configuration, types, and shared structures for glypha.
///
/// This crate contains the pixel grid, the art result, colors, alphabets and
/// the render configuration shared across the glypha workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use charset::Alphabet;
pub use color::Rgb;
pub use config::{RenderConfig, Settings};
pub use error::CoreError;
pub use frame::{ArtResult, PixelGrid, StyledSymbol};

