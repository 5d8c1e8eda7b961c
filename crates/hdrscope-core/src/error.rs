use thiserror::Error;

/// Marker substring the engine embeds in rejections caused by a cooperative
/// cancel.
pub const CANCELLED_MARKER: &str = "cancelled";

#[derive(Error, Debug)]
pub enum HdrscopeError {
    #[error("engine bridge unavailable")]
    BridgeUnavailable,

    #[error("operation was cancelled")]
    Cancelled,

    #[error("engine error: {0}")]
    Engine(String),

    #[error("unexpected engine response to {command}")]
    UnexpectedResponse { command: &'static str },

    #[error("raster decode error: {0}")]
    RasterDecode(#[from] image::ImageError),

    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid scope statistics: {0}")]
    InvalidStats(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HdrscopeError {
    /// Classify an engine rejection string, folding the cancel marker into
    /// [`HdrscopeError::Cancelled`].
    pub fn from_engine(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(CANCELLED_MARKER) {
            HdrscopeError::Cancelled
        } else {
            HdrscopeError::Engine(message)
        }
    }

    /// True for the expected, user-initiated cancel outcome. Never surfaced
    /// as an error to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HdrscopeError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, HdrscopeError>;
