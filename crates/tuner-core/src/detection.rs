use crate::frame::Frame;
use ndarray::Array2;
use tuner_detection::mask::MASK_ON;
use tuner_detection::{build_mask, HsvRange, MaskError};

pub fn run_color_mask(frame: &Frame, range: &HsvRange) -> Result<Array2<u8>, MaskError> {
    let rgb = frame.to_rgb_array();
    let mask = build_mask(rgb.view(), range)?;

    tracing::debug!(
        lower = ?range.lower,
        upper = ?range.upper,
        matched = mask.iter().filter(|&&p| p == MASK_ON).count(),
        total = mask.len(),
        "Built color mask"
    );
    Ok(mask)
}
