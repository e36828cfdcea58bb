use ndarray::{Array2, ArrayView2, Zip};

use crate::color::{rgb_to_hsv, HsvRange};
use crate::error::MaskError;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// Thresholds an RGB image against `range`, producing a `MASK_ON`/`MASK_OFF` mask
/// of the same `(height, width)` shape.
///
/// Pixels are evaluated independently across the rayon pool; the output does not
/// depend on evaluation order.
pub fn build_mask(image: ArrayView2<[u8; 3]>, range: &HsvRange) -> Result<Array2<u8>, MaskError> {
    let (height, width) = image.dim();
    if width == 0 || height == 0 {
        return Err(MaskError::InvalidImage { width, height });
    }

    let mask = Zip::from(image).par_map_collect(|&[r, g, b]| {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        if range.in_range(h, s, v) {
            MASK_ON
        } else {
            MASK_OFF
        }
    });
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{compute_range, SampledColor, Tolerance};
    use ndarray::Array2;

    fn sample_of(rgb: [u8; 3]) -> SampledColor {
        rgb_to_hsv(rgb[0], rgb[1], rgb[2]).into()
    }

    #[test]
    fn zero_area_image_is_rejected() {
        let empty: Array2<[u8; 3]> = Array2::from_elem((0, 4), [0; 3]);
        let range = HsvRange::new([0; 3], [180, 255, 255]);
        assert_eq!(
            build_mask(empty.view(), &range),
            Err(MaskError::InvalidImage { width: 4, height: 0 })
        );

        let empty: Array2<[u8; 3]> = Array2::from_elem((3, 0), [0; 3]);
        assert!(matches!(
            build_mask(empty.view(), &range),
            Err(MaskError::InvalidImage { .. })
        ));
    }

    #[test]
    fn sampled_pixel_is_on_with_zero_tolerance() {
        let mut image = Array2::from_elem((2, 3), [0u8, 0, 255]);
        image[(1, 2)] = [200, 40, 90];

        let range = compute_range(sample_of([200, 40, 90]), Tolerance::new(0, 0, 0));
        let mask = build_mask(image.view(), &range).unwrap();

        assert_eq!(mask.dim(), (2, 3));
        assert_eq!(mask[(1, 2)], MASK_ON);
        assert_eq!(mask.iter().filter(|&&p| p == MASK_ON).count(), 1);
    }

    #[test]
    fn pixels_outside_every_bound_are_off() {
        // pure red sits at H=0, far from a green range
        let image = Array2::from_elem((4, 4), [255u8, 0, 0]);
        let range = HsvRange::new([50, 100, 100], [70, 255, 255]);
        let mask = build_mask(image.view(), &range).unwrap();
        assert!(mask.iter().all(|&p| p == MASK_OFF));
    }

    #[test]
    fn full_range_selects_everything() {
        let image = Array2::from_shape_fn((5, 7), |(y, x)| [(x * 30) as u8, (y * 50) as u8, 17]);
        let range = HsvRange::new([0, 0, 0], [180, 255, 255]);
        let mask = build_mask(image.view(), &range).unwrap();
        assert!(mask.iter().all(|&p| p == MASK_ON));
    }

    #[test]
    fn parallel_result_matches_sequential_evaluation() {
        let image = Array2::from_shape_fn((64, 48), |(y, x)| {
            [(x * 5) as u8, (y * 3) as u8, ((x + y) * 2) as u8]
        });
        let range = HsvRange::new([10, 30, 40], [100, 200, 220]);
        let mask = build_mask(image.view(), &range).unwrap();

        let expected = image.map(|&[r, g, b]| {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            if range.in_range(h, s, v) {
                MASK_ON
            } else {
                MASK_OFF
            }
        });
        assert_eq!(mask, expected);
    }
}
