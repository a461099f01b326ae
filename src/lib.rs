//! # certchain - A Minimal X.509 Certificate Authority for Protocol Tests
//!
//! certchain builds byte-exact X.509 v3 certificates with the RustCrypto libraries and issues
//! them link by link, from a self-signed root through intermediates down to a leaf. The output
//! is meant to drive TLS test scenarios such as key-usage enforcement, not to run a real PKI.
//!
//! ## Supported Key Types
//!
//! - **RSA**: any size `rsa` can generate, signed with PKCS#1 v1.5 over SHA-256
//! - **ECDSA**: P-256 and P-384, signed over a SHA-256 digest
//! - **Ed25519**: signed over the raw message
//!
//! An RSA subject key can also be declared as `id-RSASSA-PSS` in its certificate.
//!
//! ## Extensions
//!
//! Each issued certificate carries, in this order and only when asked for: Authority Key
//! Identifier, Key Usage (critical), Subject Alternative Name with DNS names, Basic
//! Constraints `cA = TRUE` (critical) and Subject Key Identifier.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use certchain::{
//!     cert::params::{DistinguishedName, SubjectSpec},
//!     chain::ChainBuilder,
//!     credential::TempFileStore,
//!     key::KeyPair,
//! };
//! use x509_cert::ext::pkix::KeyUsages;
//!
//! # fn main() -> Result<(), certchain::error::CertChainError> {
//! let store = TempFileStore::from_env();
//!
//! let root = ChainBuilder::new_root(
//!     &SubjectSpec::builder()
//!         .key(KeyPair::generate_rsa(2048)?)
//!         .name(DistinguishedName::from_common_name("Test Root"))
//!         .is_ca(true)
//!         .subject_key_id(vec![1, 2, 3, 4])
//!         .build(),
//!     &store,
//! )?;
//!
//! let leaf = root.issue(
//!     &SubjectSpec::builder()
//!         .key(KeyPair::generate_ecdsa_p256())
//!         .name(DistinguishedName::from_common_name("test.example"))
//!         .dns_names(vec!["test.example".to_string()])
//!         .key_usage(KeyUsages::KeyAgreement.into())
//!         .build(),
//! )?;
//!
//! let credential = leaf.to_credential(&store)?;
//! println!("chain: {}", credential.chain_ref.as_path().display());
//! println!("key:   {}", credential.key_ref.as_path().display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Nothing in the library panics on bad input; every failure is a [`error::CertChainError`]:
//!
//! ```rust
//! use certchain::{error::CertChainError, key::KeyPair};
//!
//! match KeyPair::from_pkcs8_der(&[0x30, 0x00]) {
//!     Ok(_) => println!("Key imported successfully"),
//!     Err(CertChainError::UnsupportedKeyType(msg)) => println!("Unsupported key: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: Key generation, PKCS#8 import/export and key identifiers
//! - [`signature`]: Signature algorithms and signing
//! - [`encoding`]: DER building blocks
//! - [`cert`]: Certificate parameters, extensions and the encoded certificate
//! - [`tbs_certificate`]: The to-be-signed certificate body
//! - [`issuer`]: Certificate issuance
//! - [`chain`]: Root creation and link-by-link issuance
//! - [`credential`]: Persisting chains and keys as PEM files
//! - [`serial`]: Serial number allocation
//! - [`error`]: Error types

pub mod cert;
pub mod chain;
pub mod credential;
pub mod encoding;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod serial;
pub mod signature;
pub mod tbs_certificate;
