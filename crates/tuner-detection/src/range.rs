use crate::color::{HsvRange, CHANNEL_MAX};

/// One of the three HSV channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    H,
    S,
    V,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::H, Channel::S, Channel::V];

    pub const fn index(self) -> usize {
        match self {
            Channel::H => 0,
            Channel::S => 1,
            Channel::V => 2,
        }
    }

    pub const fn max(self) -> u8 {
        CHANNEL_MAX[self.index()]
    }

    // Clamps an arbitrary integer into this channel's domain.
    pub fn clamp(self, value: i64) -> u8 {
        value.clamp(0, self.max() as i64) as u8
    }
}

fn clamp_triple(h: i64, s: i64, v: i64) -> [u8; 3] {
    [Channel::H.clamp(h), Channel::S.clamp(s), Channel::V.clamp(v)]
}

/// HSV reading taken from a pixel or typed in by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampledColor {
    hsv: [u8; 3],
}

impl SampledColor {
    pub fn new(h: i64, s: i64, v: i64) -> Self {
        Self {
            hsv: clamp_triple(h, s, v),
        }
    }

    pub fn h(&self) -> u8 {
        self.hsv[0]
    }

    pub fn s(&self) -> u8 {
        self.hsv[1]
    }

    pub fn v(&self) -> u8 {
        self.hsv[2]
    }

    pub fn get(&self, channel: Channel) -> u8 {
        self.hsv[channel.index()]
    }

    pub fn as_array(&self) -> [u8; 3] {
        self.hsv
    }
}

impl From<(u8, u8, u8)> for SampledColor {
    fn from((h, s, v): (u8, u8, u8)) -> Self {
        Self::new(h.into(), s.into(), v.into())
    }
}

impl std::fmt::Display for SampledColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H: {}, S: {}, V: {}", self.h(), self.s(), self.v())
    }
}

/// Per-channel half-width of an [`HsvRange`]. Out-of-domain input is clamped, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tolerance {
    widths: [u8; 3],
}

impl Tolerance {
    pub fn new(h: i64, s: i64, v: i64) -> Self {
        Self {
            widths: clamp_triple(h, s, v),
        }
    }

    pub fn get(&self, channel: Channel) -> u8 {
        self.widths[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, value: i64) {
        self.widths[channel.index()] = channel.clamp(value);
    }

    // Moves a channel by `delta`, saturating at the channel bounds.
    pub fn adjust(&mut self, channel: Channel, delta: i64) {
        let current = self.get(channel) as i64;
        self.set(channel, current.saturating_add(delta));
    }

    pub fn as_array(&self) -> [u8; 3] {
        self.widths
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(50, 40, 30)
    }
}

/// Inclusive range around `sample`, clamped to `[0, CHANNEL_MAX]` on every channel.
pub fn compute_range(sample: SampledColor, tolerance: Tolerance) -> HsvRange {
    let mut lower = [0u8; 3];
    let mut upper = [0u8; 3];
    for channel in Channel::ALL {
        let centre = sample.get(channel) as i64;
        let width = tolerance.get(channel) as i64;
        lower[channel.index()] = channel.clamp(centre - width);
        upper[channel.index()] = channel.clamp(centre + width);
    }

    tracing::debug!(sample = %sample, lower = ?lower, upper = ?upper, "computed hsv range");
    HsvRange::new(lower, upper)
}

/// Centre and half-width that regenerate `range` as closely as [`compute_range`] allows.
///
/// Exact when each channel's width is even or the range touches either end of its
/// channel; otherwise the regenerated range is one step wider on the lower side.
pub fn approximate_inputs(range: &HsvRange) -> (SampledColor, Tolerance) {
    let mut centre = [0i64; 3];
    let mut width = [0i64; 3];
    for channel in Channel::ALL {
        let c = channel.index();
        let lo = range.lower[c] as i64;
        let hi = (range.upper[c] as i64).max(lo);
        if hi >= channel.max() as i64 {
            // round up so the lower side stays exact; the upper side clamps
            centre[c] = (lo + hi + 1) / 2;
            width[c] = centre[c] - lo;
        } else {
            centre[c] = (lo + hi) / 2;
            width[c] = hi - centre[c];
        }
    }
    (
        SampledColor::new(centre[0], centre[1], centre[2]),
        Tolerance::new(width[0], width[1], width[2]),
    )
}
