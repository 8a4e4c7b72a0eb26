/// Pixel-to-symbol conversion engine for glypha.
///
/// Tone correction, then one symbol and one color per pixel.

pub mod color_map;
pub mod compositor;
pub mod lut;
pub mod mapper;
pub mod tone;

pub use compositor::{Compositor, convert, convert_rgba};
pub use mapper::{SymbolMapper, render};
pub use tone::{adjust, adjusted};
