use thiserror::Error;

/// Errors raised by the packet computations.
#[derive(Debug, Error)]
pub enum PacketError {
    /// Wave parameters that make the repetition period undefined or meaningless.
    #[error("invalid wave sum spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("plot window needs {requested} samples (max {max})")]
    TooManySamples { requested: usize, max: usize },

    #[error("FFT failed: {0}")]
    Fft(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("failed to parse presets: {0}")]
    PresetFormat(#[from] serde_yaml::Error),
}

impl PacketError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PacketError::InvalidSpec { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, PacketError>;
