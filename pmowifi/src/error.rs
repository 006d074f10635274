//! Error types for network bring-up

use pmoutils::AddressError;

/// Result type alias for network operations
pub type Result<T> = std::result::Result<T, WifiError>;

#[derive(Debug, thiserror::Error)]
pub enum WifiError {
    /// The stored static address cannot be used; the join is aborted
    #[error("Invalid static IP '{value}': {source}")]
    InvalidStaticIp {
        value: String,
        #[source]
        source: AddressError,
    },

    /// The network interface refused the join request
    #[error("Join failed: {0}")]
    JoinFailed(String),
}
