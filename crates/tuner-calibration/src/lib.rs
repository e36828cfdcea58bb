pub mod session;

pub use session::{CalibrationSession, SessionError};
