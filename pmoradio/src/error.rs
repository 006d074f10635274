//! Error types for playback control

/// Result type alias for playback control operations
pub type Result<T> = std::result::Result<T, RadioError>;

#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    /// The control loop is no longer running
    #[error("Radio control loop is not running")]
    LoopClosed,
}
