use image::{GrayImage, ImageBuffer};
use ndarray::ArrayView2;
use std::path::Path;

// Convert a mask array into an 8-bit grayscale image
pub fn mask_to_image(mask: ArrayView2<u8>) -> GrayImage {
    let (height, width) = mask.dim();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        image::Luma([mask[[y as usize, x as usize]]])
    })
}

// Writes the mask to disk; the encoder is picked from the file extension.
pub fn save_mask_image<P: AsRef<Path>>(mask: ArrayView2<u8>, path: P) -> image::ImageResult<()> {
    mask_to_image(mask).save(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "Saved mask image");
    Ok(())
}
