use const_oid::ObjectIdentifier;
use ed25519_dalek::SigningKey as Ed25519SigningKey;
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use p384::ecdsa::{SigningKey as P384SigningKey, VerifyingKey as P384VerifyingKey};
use pkcs8::{DecodePrivateKey, EncodePrivateKey, PrivateKeyInfo};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::error::{CertChainError, Result};

const OID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// The family a signing key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Rsa,
    Ecdsa,
    Ed25519,
}

/// Supported signing keys.
///
/// The set is closed: every algorithm decision in the crate matches on it
/// exhaustively.
#[derive(Debug, Clone)]
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        signing_key: P256SigningKey,
        verifying_key: P256VerifyingKey,
    },
    EcdsaP384 {
        signing_key: P384SigningKey,
        verifying_key: P384VerifyingKey,
    },
    Ed25519 {
        signing_key: Ed25519SigningKey,
    },
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertChainError::KeyGenerationError(e.to_string()))?;
        Ok(Self::from_rsa(private))
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = P256SigningKey::random(&mut rng);
        let verifying_key = *signing_key.verifying_key();
        KeyPair::EcdsaP256 {
            signing_key,
            verifying_key,
        }
    }

    /// Generate an ECDSA P-384 key pair.
    pub fn generate_ecdsa_p384() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = P384SigningKey::random(&mut rng);
        let verifying_key = *signing_key.verifying_key();
        KeyPair::EcdsaP384 {
            signing_key,
            verifying_key,
        }
    }

    /// Generate an Ed25519 key pair.
    pub fn generate_ed25519() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = Ed25519SigningKey::generate(&mut rng);
        KeyPair::Ed25519 { signing_key }
    }

    fn from_rsa(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair::Rsa {
            private: Box::new(private),
            public,
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            KeyPair::Rsa { .. } => KeyKind::Rsa,
            KeyPair::EcdsaP256 { .. } | KeyPair::EcdsaP384 { .. } => KeyKind::Ecdsa,
            KeyPair::Ed25519 { .. } => KeyKind::Ed25519,
        }
    }

    /// Returns the RSA public key, if this is an RSA key pair.
    pub fn rsa_public_key(&self) -> Option<&RsaPublicKey> {
        match self {
            KeyPair::Rsa { public, .. } => Some(public),
            _ => None,
        }
    }

    /// Encodes the public half as a standard PKIX SubjectPublicKeyInfo.
    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        let spki = match self {
            KeyPair::Rsa { public, .. } => SubjectPublicKeyInfoOwned::from_key(public.clone())?,
            KeyPair::EcdsaP256 { verifying_key, .. } => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)?
            }
            KeyPair::EcdsaP384 { verifying_key, .. } => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)?
            }
            KeyPair::Ed25519 { signing_key } => {
                let pk_bytes = signing_key.verifying_key().to_bytes();
                SubjectPublicKeyInfoOwned {
                    algorithm: AlgorithmIdentifierOwned {
                        oid: const_oid::db::rfc8410::ID_ED_25519,
                        parameters: None,
                    },
                    subject_public_key: der::asn1::BitString::from_bytes(&pk_bytes)?,
                }
            }
        };
        Ok(spki)
    }

    /// Derives a key identifier as the SHA-1 hash of the subjectPublicKey
    /// bits (RFC 5280, section 4.2.1.2, method 1).
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let spki = self.subject_public_key_info()?;
        let id = Sha1::digest(spki.subject_public_key.raw_bytes());
        Ok(id.to_vec())
    }

    /// Encodes the private key as an unencrypted PKCS#8 document.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        let document = match self {
            KeyPair::Rsa { private, .. } => private.to_pkcs8_der()?,
            KeyPair::EcdsaP256 { signing_key, .. } => signing_key.to_pkcs8_der()?,
            KeyPair::EcdsaP384 { signing_key, .. } => signing_key.to_pkcs8_der()?,
            KeyPair::Ed25519 { signing_key } => signing_key.to_pkcs8_der()?,
        };
        Ok(document.as_bytes().to_vec())
    }

    /// Imports a key pair from an unencrypted PKCS#8 document.
    ///
    /// Keys outside RSA, ECDSA P-256/P-384 and Ed25519 are rejected with
    /// [`CertChainError::UnsupportedKeyType`].
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let info = PrivateKeyInfo::try_from(der)?;
        let oid = info.algorithm.oid;

        if oid == OID_RSA_ENCRYPTION {
            return Ok(Self::from_rsa(RsaPrivateKey::from_pkcs8_der(der)?));
        }
        if oid == const_oid::db::rfc8410::ID_ED_25519 {
            let signing_key = Ed25519SigningKey::from_pkcs8_der(der)?;
            return Ok(KeyPair::Ed25519 { signing_key });
        }
        if oid == OID_EC_PUBLIC_KEY {
            let curve = info.algorithm.parameters_oid()?;
            if curve == OID_SECP256R1 {
                let signing_key = P256SigningKey::from_pkcs8_der(der)?;
                let verifying_key = *signing_key.verifying_key();
                return Ok(KeyPair::EcdsaP256 {
                    signing_key,
                    verifying_key,
                });
            }
            if curve == OID_SECP384R1 {
                let signing_key = P384SigningKey::from_pkcs8_der(der)?;
                let verifying_key = *signing_key.verifying_key();
                return Ok(KeyPair::EcdsaP384 {
                    signing_key,
                    verifying_key,
                });
            }
            return Err(CertChainError::UnsupportedKeyType(format!(
                "elliptic curve {curve}"
            )));
        }

        Err(CertChainError::UnsupportedKeyType(format!(
            "key algorithm {oid}"
        )))
    }
}
