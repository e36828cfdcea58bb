/// Upper bound of each HSV channel: hue is stored in half-degrees.
pub const CHANNEL_MAX: [u8; 3] = [180, 255, 255];

/// Inclusive HSV bounds, one `[h, s, v]` triple per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn in_range(&self, h: u8, s: u8, v: u8) -> bool {
        h >= self.lower[0]
            && h <= self.upper[0]
            && s >= self.lower[1]
            && s <= self.upper[1]
            && v >= self.lower[2]
            && v <= self.upper[2]
    }

    // Checks lower <= upper on every channel and that no bound leaves its channel domain.
    // Ranges read back from disk are not guaranteed to satisfy this.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|c| self.lower[c] <= self.upper[c] && self.upper[c] <= CHANNEL_MAX[c])
    }
}

/// Converts an RGB triple to 8-bit HSV with hue in `0..180`.
///
/// Hue is the angle in degrees halved and rounded; a result that rounds to 180
/// wraps back to 0. Saturation is `255 * (max - min) / max` and value is `max`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h_half = (h / 2.0).round() as u16;
    let h_byte = if h_half >= 180 { 0 } else { h_half as u8 };

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let s_byte = (s * 255.0).round() as u8;
    let v_byte = (max * 255.0).round() as u8;

    (h_byte, s_byte, v_byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_land_on_half_degree_hues() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(255, 255, 0), (30, 255, 255));
    }

    #[test]
    fn greys_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
        assert_eq!(rgb_to_hsv(255, 255, 255), (0, 0, 255));
    }

    #[test]
    fn hue_near_full_circle_wraps_to_zero() {
        // 255,0,1 sits just below 360 degrees
        let (h, _, _) = rgb_to_hsv(255, 0, 1);
        assert_eq!(h, 0);
    }

    #[test]
    fn hue_never_exceeds_channel_max() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(17) {
                    let (h, _, _) = rgb_to_hsv(r as u8, g as u8, b as u8);
                    assert!(h < 180);
                }
            }
        }
    }

    #[test]
    fn in_range_is_inclusive() {
        let range = HsvRange::new([10, 20, 30], [40, 50, 60]);
        assert!(range.in_range(10, 20, 30));
        assert!(range.in_range(40, 50, 60));
        assert!(!range.in_range(9, 20, 30));
        assert!(!range.in_range(40, 51, 60));
    }

    #[test]
    fn validity_rejects_inverted_or_out_of_domain_bounds() {
        assert!(HsvRange::new([0, 0, 0], [180, 255, 255]).is_valid());
        assert!(!HsvRange::new([100, 0, 0], [50, 255, 255]).is_valid());
        assert!(!HsvRange::new([0, 0, 0], [200, 255, 255]).is_valid());
    }
}
