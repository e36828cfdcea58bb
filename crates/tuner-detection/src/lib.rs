pub mod color;
pub mod error;
pub mod mask;
pub mod mask_file;
pub mod range;

pub use color::{rgb_to_hsv, HsvRange};
pub use error::MaskError;
pub use mask::build_mask;
pub use range::{compute_range, Channel, SampledColor, Tolerance};
