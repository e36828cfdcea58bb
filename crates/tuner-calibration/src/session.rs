use ndarray::Array2;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tuner_core::detection::run_color_mask;
use tuner_core::frame::{Frame, FrameError};
use tuner_core::image::save_mask_image;
use tuner_detection::mask_file::{decode, encode};
use tuner_detection::range::approximate_inputs;
use tuner_detection::{compute_range, Channel, HsvRange, MaskError, SampledColor, Tolerance};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No image loaded")]
    NoImage,

    #[error("No color selected yet")]
    NoColorSelected,

    #[error(transparent)]
    Mask(#[from] MaskError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Could not write mask image: {0}")]
    Export(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive calibration state: an image, the colour picked from it and the
/// tolerance around that colour.
///
/// A range read from disk stays authoritative until the next sample or
/// tolerance edit; after that the range is recomputed from sample and tolerance.
#[derive(Debug, Default)]
pub struct CalibrationSession {
    frame: Option<Frame>,
    sample: Option<SampledColor>,
    tolerance: Tolerance,
    loaded_range: Option<HsvRange>,
}

impl CalibrationSession {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn sample(&self) -> Option<SampledColor> {
        self.sample
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        self.frame = Some(Frame::open(path)?);
        Ok(())
    }

    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = Some(frame);
    }

    /// Samples the pixel at image coordinates. Clicks outside the image are ignored.
    pub fn pick_color(&mut self, x: u32, y: u32) -> Option<SampledColor> {
        let picked = self.frame.as_ref()?.pixel_hsv(x, y)?;
        tracing::info!(x, y, sample = %picked, "Picked color");
        self.set_sample(picked);
        Some(picked)
    }

    pub fn set_manual_hsv(&mut self, h: i64, s: i64, v: i64) -> SampledColor {
        let sample = SampledColor::new(h, s, v);
        self.set_sample(sample);
        sample
    }

    pub fn set_tolerance(&mut self, channel: Channel, value: i64) {
        self.tolerance.set(channel, value);
        self.loaded_range = None;
    }

    pub fn adjust_tolerance(&mut self, channel: Channel, delta: i64) {
        self.tolerance.adjust(channel, delta);
        self.loaded_range = None;
    }

    pub fn active_range(&self) -> Option<HsvRange> {
        self.loaded_range
            .or_else(|| self.sample.map(|sample| compute_range(sample, self.tolerance)))
    }

    pub fn render_mask(&self) -> Result<Array2<u8>, SessionError> {
        let frame = self.frame.as_ref().ok_or(SessionError::NoImage)?;
        let range = self.active_range().ok_or(SessionError::NoColorSelected)?;
        Ok(run_color_mask(frame, &range)?)
    }

    /// Writes the computed lower/upper bounds, not the raw sample and tolerance.
    pub fn save_range<P: AsRef<Path>>(&self, path: P) -> Result<HsvRange, SessionError> {
        let range = self.active_range().ok_or(SessionError::NoColorSelected)?;
        fs::write(path.as_ref(), encode(&range))?;
        tracing::info!(path = %path.as_ref().display(), lower = ?range.lower, upper = ?range.upper, "Saved range");
        Ok(range)
    }

    /// Reads a range file. On any error the session is left untouched.
    pub fn load_range<P: AsRef<Path>>(&mut self, path: P) -> Result<HsvRange, SessionError> {
        let text = fs::read_to_string(path.as_ref())?;
        let range = decode(&text)?;
        if !range.is_valid() {
            tracing::warn!(lower = ?range.lower, upper = ?range.upper, "Loaded range is outside the HSV domain");
        }

        let (sample, tolerance) = approximate_inputs(&range);
        self.sample = Some(sample);
        self.tolerance = tolerance;
        self.loaded_range = Some(range);
        tracing::info!(path = %path.as_ref().display(), lower = ?range.lower, upper = ?range.upper, "Loaded range");
        Ok(range)
    }

    pub fn export_mask<P: AsRef<Path>>(&self, path: P) -> Result<(), SessionError> {
        let mask = self.render_mask()?;
        save_mask_image(mask.view(), path)?;
        Ok(())
    }

    fn set_sample(&mut self, sample: SampledColor) {
        self.sample = Some(sample);
        self.loaded_range = None;
    }
}
