//! Helper functions for creating and classifying errors

use super::types::SolenError;

impl SolenError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn missing_ledger<S: Into<String>>(message: S) -> Self {
        Self::MissingLedger(message.into())
    }

    pub fn remote_transient<S: Into<String>>(message: S) -> Self {
        Self::RemoteTransient(message.into())
    }

    pub fn remote_rejected<S: Into<String>>(message: S) -> Self {
        Self::RemoteRejected(message.into())
    }

    pub fn ledger_io<S: Into<String>>(message: S) -> Self {
        Self::LedgerIo(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn keypair<S: Into<String>>(message: S) -> Self {
        Self::Keypair(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RemoteTransient(_) | Self::Timeout(_))
    }

    /// Short category name used in logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::MissingLedger(_) => "missing_ledger",
            Self::RemoteTransient(_) => "remote_transient",
            Self::RemoteRejected(_) => "remote_rejected",
            Self::LedgerIo(_) => "ledger_io",
            Self::Config(_) => "config",
            Self::Keypair(_) => "keypair",
            Self::Parsing(_) | Self::Serialization(_) => "parsing",
            Self::Timeout(_) => "timeout",
            Self::Io(_) => "io",
        }
    }
}
