//! Error types for solen

use thiserror::Error;

/// Result type alias for solen
pub type Result<T> = std::result::Result<T, SolenError>;

/// Main error type for solen
#[derive(Error, Debug)]
pub enum SolenError {
    /// Bad file extension, missing file, malformed CSV row or request field.
    /// Always raised before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A bulk operation was invoked before `init` created its ledger file
    #[error("Missing ledger: {0}")]
    MissingLedger(String),

    /// The remote endpoint reported a condition that clears up on its own
    /// (node lagging behind, rate limited, unavailable)
    #[error("Remote transient error: {0}")]
    RemoteTransient(String),

    /// The remote endpoint permanently refused a request or transaction
    #[error("Remote rejected: {0}")]
    RemoteRejected(String),

    /// The durable ledger file could not be read or written
    #[error("Ledger I/O error: {0}")]
    LedgerIo(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Keypair loading or signing errors
    #[error("Keypair error: {0}")]
    Keypair(String),

    /// Decoding of remote or on-chain data failed
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
