pub mod config;
pub mod detection;
pub mod frame;
pub mod image;

pub use config::Config;
pub use frame::{Frame, FrameConfig, FrameError, PixelFormat};
