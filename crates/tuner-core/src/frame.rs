use ndarray::Array2;
use std::path::Path;
use thiserror::Error;
use tuner_detection::{rgb_to_hsv, SampledColor};

#[derive(Clone, Debug)]
// An image held in memory with raw pixel data and dimensions.
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
// Describes how pixels are laid out and how many bytes each uses.
pub enum PixelFormat {
    RGB8,  // 3 bytes per pixel (R, G, B)
    RGBA8, // 4 bytes per pixel (R, G, B, A)
    BGR8,  // 3 bytes per pixel (B, G, R)
    GRAY8, // 1 byte per pixel (grayscale)
}

impl PixelFormat {
    pub const fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::GRAY8 => 1,
            PixelFormat::RGB8 | PixelFormat::BGR8 => 3,
            PixelFormat::RGBA8 => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Buffer size doesn't match (expected {expected} bytes, got {actual})")]
    InvalidDimensions { expected: usize, actual: usize },

    #[error("Provided dimensions are zero")]
    ZeroDimensions,

    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub struct FrameConfig {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Frame {
    // Validates buffer size against dimensions and constructs a frame.
    pub fn new(config: FrameConfig) -> Result<Self, FrameError> {
        if config.width == 0 || config.height == 0 {
            return Err(FrameError::ZeroDimensions);
        }

        let expected = config.width as usize
            * config.height as usize
            * config.format.bytes_per_pixel() as usize;
        if config.data.len() != expected {
            return Err(FrameError::InvalidDimensions {
                expected,
                actual: config.data.len(),
            });
        }

        Ok(Self {
            data: config.data,
            width: config.width,
            height: config.height,
            format: config.format,
        })
    }

    /// Decodes any image file the `image` crate understands.
    ///
    /// Greyscale files stay single channel, files with alpha keep it, everything
    /// else is expanded to 8-bit RGB.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let decoded = image::open(path.as_ref())?;
        let color = decoded.color();

        let (width, height) = (decoded.width(), decoded.height());
        let (data, format) = if !color.has_color() && !color.has_alpha() {
            (decoded.into_luma8().into_raw(), PixelFormat::GRAY8)
        } else if color.has_alpha() {
            (decoded.into_rgba8().into_raw(), PixelFormat::RGBA8)
        } else {
            (decoded.into_rgb8().into_raw(), PixelFormat::RGB8)
        };

        let frame = Frame::new(FrameConfig {
            data,
            width,
            height,
            format,
        })?;
        tracing::info!(path = %path.as_ref().display(), width, height, format = ?format, "Loaded image");
        Ok(frame)
    }

    // Returns the pixel bytes at (x, y) if inside bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        let index = (y as usize * self.width as usize + x as usize) * bytes_per_pixel;
        self.data.get(index..index + bytes_per_pixel)
    }

    // HSV reading of the pixel at (x, y), `None` outside the image.
    pub fn pixel_hsv(&self, x: u32, y: u32) -> Option<SampledColor> {
        let (r, g, b) = self.extract_rgb(self.get_pixel(x, y)?);
        Some(rgb_to_hsv(r, g, b).into())
    }

    /// Copies the frame into a `(height, width)` array of RGB triples.
    pub fn to_rgb_array(&self) -> Array2<[u8; 3]> {
        let width = self.width as usize;
        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        Array2::from_shape_fn((self.height as usize, width), |(y, x)| {
            let index = (y * width + x) * bytes_per_pixel;
            let (r, g, b) = self.extract_rgb(&self.data[index..index + bytes_per_pixel]);
            [r, g, b]
        })
    }

    // Normalizes a pixel into (r, g, b) ordering regardless of source format.
    fn extract_rgb(&self, pixel: &[u8]) -> (u8, u8, u8) {
        match self.format {
            PixelFormat::RGB8 | PixelFormat::RGBA8 => (pixel[0], pixel[1], pixel[2]),
            PixelFormat::BGR8 => (pixel[2], pixel[1], pixel[0]),
            PixelFormat::GRAY8 => (pixel[0], pixel[0], pixel[0]),
        }
    }
}
