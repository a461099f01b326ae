//! use certchain::error::CertChainError;

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, CertChainError>;

/// Represents errors that can occur while building certificate chains.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertChainError {
    /// The key is not one of the supported RSA, ECDSA or Ed25519 kinds.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The requested signature algorithm does not match the signing key, or
    /// the unresolved default was used where a concrete algorithm is needed.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Error during DER encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// The signing primitive failed.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// The credential store could not persist a chain or key.
    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl From<der::Error> for CertChainError {
    /// Converts a `der::Error` into a `CertChainError`.
    fn from(err: der::Error) -> Self {
        CertChainError::EncodingError(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for CertChainError {
    fn from(err: x509_cert::spki::Error) -> Self {
        CertChainError::EncodingError(err.to_string())
    }
}

impl From<pkcs8::Error> for CertChainError {
    fn from(err: pkcs8::Error) -> Self {
        CertChainError::EncodingError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertChainError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertChainError::EncodingError(err.to_string())
    }
}

impl From<std::io::Error> for CertChainError {
    fn from(err: std::io::Error) -> Self {
        CertChainError::PersistenceError(err.to_string())
    }
}
