/// Sampling-grid preparation for glypha: raw RGBA input, resize, rotation.
///
/// Aucun décodage d'image ici : l'entrée est déjà un buffer RGBA.

pub mod raw;
pub mod resize;
pub mod rotate;
pub mod sampling;

pub use resize::Resizer;
pub use rotate::Rotation;
pub use sampling::{SamplingSpec, prepare};
