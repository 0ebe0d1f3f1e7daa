//! Error types for the protocol crate

use thiserror::Error;

use crate::kind::MessageKind;

/// Contract violations at the handler boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("{kind} message carries a {found} payload, expected {expected}")]
    PayloadMismatch {
        kind: MessageKind,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
