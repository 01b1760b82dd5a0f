//! Type conversions for SolenError

use super::types::SolenError;
use crate::rpc::RpcError;

impl From<RpcError> for SolenError {
    fn from(err: RpcError) -> Self {
        if err.is_transient() {
            SolenError::RemoteTransient(err.to_string())
        } else {
            SolenError::RemoteRejected(err.to_string())
        }
    }
}

impl From<config::ConfigError> for SolenError {
    fn from(err: config::ConfigError) -> Self {
        SolenError::Config(err.to_string())
    }
}

impl From<csv::Error> for SolenError {
    fn from(err: csv::Error) -> Self {
        SolenError::InvalidInput(format!("CSV error: {}", err))
    }
}

impl From<base64::DecodeError> for SolenError {
    fn from(err: base64::DecodeError) -> Self {
        SolenError::Parsing(format!("Invalid base64 data: {}", err))
    }
}
