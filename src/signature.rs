use der::{Any, Encode, asn1::Null};
use p256::ecdsa::signature::hazmat::PrehashSigner;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::error::{CertChainError, Result};
use crate::key::{KeyKind, KeyPair};

/// Represents the supported certificate signature algorithms.
///
/// `Default` is a placeholder resolved against the issuer's key before any
/// bytes are produced; it never appears in an encoded certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureAlgorithm {
    /// Pick the algorithm from the signing key's kind.
    #[default]
    Default,
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    RsaSha256,
    /// ECDSA over a SHA-256 digest.
    EcdsaSha256,
    /// Pure Ed25519.
    Ed25519,
}

impl SignatureAlgorithm {
    /// Returns the one algorithm used for keys of this kind.
    pub fn default_for(key: &KeyPair) -> Self {
        match key.kind() {
            KeyKind::Rsa => SignatureAlgorithm::RsaSha256,
            KeyKind::Ecdsa => SignatureAlgorithm::EcdsaSha256,
            KeyKind::Ed25519 => SignatureAlgorithm::Ed25519,
        }
    }

    /// Keeps an explicit choice and replaces `Default` with the key's algorithm.
    pub fn resolve(self, key: &KeyPair) -> Self {
        match self {
            SignatureAlgorithm::Default => Self::default_for(key),
            explicit => explicit,
        }
    }

    /// Builds the AlgorithmIdentifier written to both the TBS and the outer
    /// certificate.
    ///
    /// # Errors
    /// [`CertChainError::UnknownAlgorithm`] for the unresolved `Default`.
    pub fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned> {
        match self {
            SignatureAlgorithm::RsaSha256 => Ok(AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(Any::encode_from(&Null)?),
            }),
            SignatureAlgorithm::EcdsaSha256 => Ok(AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            }),
            SignatureAlgorithm::Ed25519 => Ok(AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc8410::ID_ED_25519,
                parameters: None,
            }),
            SignatureAlgorithm::Default => Err(CertChainError::UnknownAlgorithm(
                "the default algorithm must be resolved before encoding".to_string(),
            )),
        }
    }

    /// DER encoding of [`algorithm_identifier`](Self::algorithm_identifier).
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.algorithm_identifier()?.to_der()?)
    }
}

/// Signs `message` with `key` under `algorithm`.
///
/// RSA keys sign a SHA-256 digest with PKCS#1 v1.5, ECDSA keys sign a SHA-256
/// digest and return a DER `Ecdsa-Sig-Value`, and Ed25519 keys sign the
/// message itself.
///
/// # Errors
/// [`CertChainError::UnknownAlgorithm`] when `algorithm` is not the one the
/// key can produce, including the unresolved `Default`.
pub fn sign(key: &KeyPair, algorithm: SignatureAlgorithm, message: &[u8]) -> Result<Vec<u8>> {
    match (key, algorithm) {
        (KeyPair::Rsa { private, .. }, SignatureAlgorithm::RsaSha256) => {
            let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new((**private).clone());
            let signature = signing_key
                .try_sign(message)
                .map_err(|e| CertChainError::SigningError(e.to_string()))?;
            Ok(signature.to_vec())
        }
        (KeyPair::EcdsaP256 { signing_key, .. }, SignatureAlgorithm::EcdsaSha256) => {
            let digest = Sha256::digest(message);
            let signature: p256::ecdsa::Signature = signing_key
                .sign_prehash(&digest)
                .map_err(|e| CertChainError::SigningError(e.to_string()))?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
        (KeyPair::EcdsaP384 { signing_key, .. }, SignatureAlgorithm::EcdsaSha256) => {
            let digest = Sha256::digest(message);
            let signature: p384::ecdsa::Signature = signing_key
                .sign_prehash(&digest)
                .map_err(|e| CertChainError::SigningError(e.to_string()))?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
        (KeyPair::Ed25519 { signing_key }, SignatureAlgorithm::Ed25519) => {
            let signature = signing_key
                .try_sign(message)
                .map_err(|e| CertChainError::SigningError(e.to_string()))?;
            Ok(signature.to_bytes().to_vec())
        }
        (key, algorithm) => Err(CertChainError::UnknownAlgorithm(format!(
            "{algorithm:?} cannot be produced by a {:?} key",
            key.kind()
        ))),
    }
}
