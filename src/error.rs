//! Error types for the toolkit.

use std::fmt;

/// Toolkit error type.
///
/// Every fallible operation in the crate returns this. [`Error::is_retryable`]
/// separates transient failures (worth re-submitting) from permanent ones
/// (the caller must fix its input or give up).
#[derive(Debug)]
pub enum Error {
    /// Key material is absent or zero-length. Fatal for the session.
    KeyMaterialMissing(String),
    /// Producing a signature failed. Fatal for that message.
    Signing(String),
    /// Contract simulation rejected the call before broadcast.
    ContractValidation(String),
    /// The transaction did not confirm within the bounded wait.
    ContractTimeout(String),
    /// The signed key request deadline has already passed.
    DeadlineExpired(String),
    /// Network or timeout failure talking to the hub.
    HubTransport(String),
    /// The hub rejected the message as invalid.
    HubValidation(String),
    /// Chain RPC communication error.
    Rpc(String),
    /// Configuration error.
    Config(String),
    /// Message timestamp outside the allowed window.
    InvalidTimestamp(String),
}

impl Error {
    /// Whether the failure is worth retrying.
    ///
    /// Timeouts and transport faults may succeed on a second attempt;
    /// everything else requires the caller to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ContractTimeout(_) | Error::HubTransport(_) | Error::Rpc(_)
        )
    }

    /// Whether the failure ends the session (no signer can be built).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::KeyMaterialMissing(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyMaterialMissing(msg) => write!(f, "key material missing: {msg}"),
            Error::Signing(msg) => write!(f, "signing failed: {msg}"),
            Error::ContractValidation(msg) => write!(f, "contract validation failed: {msg}"),
            Error::ContractTimeout(msg) => write!(f, "contract confirmation timed out: {msg}"),
            Error::DeadlineExpired(msg) => write!(f, "key request deadline expired: {msg}"),
            Error::HubTransport(msg) => write!(f, "hub transport error: {msg}"),
            Error::HubValidation(msg) => write!(f, "hub rejected message: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::InvalidTimestamp(msg) => write!(f, "invalid timestamp: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::ContractTimeout("no confirmation".into()).is_retryable());
        assert!(Error::HubTransport("connect refused".into()).is_retryable());
        assert!(Error::Rpc("502".into()).is_retryable());

        assert!(!Error::DeadlineExpired("past".into()).is_retryable());
        assert!(!Error::HubValidation("bad signature".into()).is_retryable());
        assert!(!Error::ContractValidation("revert".into()).is_retryable());
        assert!(!Error::KeyMaterialMissing("empty".into()).is_retryable());
    }

    #[test]
    fn only_missing_key_material_is_fatal() {
        assert!(Error::KeyMaterialMissing("empty mnemonic".into()).is_fatal());
        assert!(!Error::Signing("bad digest".into()).is_fatal());
        assert!(!Error::HubTransport("timeout".into()).is_fatal());
    }
}
