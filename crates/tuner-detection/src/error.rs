use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("Image has zero area ({width}x{height})")]
    InvalidImage { width: usize, height: usize },

    #[error("Malformed mask file: {reason}")]
    MalformedMaskFile { reason: String },
}

impl MaskError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MaskError::MalformedMaskFile {
            reason: reason.into(),
        }
    }
}
