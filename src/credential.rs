//! Materializing certificate chains and keys for consumers that want files.

use std::io::Write;
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::debug;

use crate::error::{CertChainError, Result};
use crate::key::KeyPair;
use crate::pem_utils::{PRIVATE_KEY_LABEL, certs_to_pem, der_to_pem};

/// Environment variable naming the directory [`TempFileStore::from_env`] writes into.
pub const TMPDIR_ENV: &str = "CERTCHAIN_TMPDIR";

/// Handle to something a [`CredentialStore`] persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialRef {
    path: PathBuf,
}

impl CredentialRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Where certificate chains and private keys end up.
pub trait CredentialStore {
    /// Persists a DER chain, leaf last, as one unit.
    fn persist_chain(&self, chain: &[Vec<u8>]) -> Result<CredentialRef>;

    /// Persists a private key.
    fn persist_key(&self, key: &KeyPair) -> Result<CredentialRef>;
}

/// Writes PEM files with unique names into a directory.
///
/// Files are kept after the store is dropped; cleaning them up is the
/// caller's business.
#[derive(Debug, Clone, Builder)]
pub struct TempFileStore {
    #[builder(into, default = std::env::temp_dir())]
    dir: PathBuf,
    #[builder(into, default = "test-cert".to_string())]
    cert_prefix: String,
    #[builder(into, default = "test-key".to_string())]
    key_prefix: String,
}

impl Default for TempFileStore {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TempFileStore {
    /// A store rooted at `$CERTCHAIN_TMPDIR`, or the system temp dir when unset.
    pub fn from_env() -> Self {
        match std::env::var_os(TMPDIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::builder().dir(dir).build(),
            _ => Self::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, prefix: &str, contents: &str) -> Result<CredentialRef> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(&self.dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        let (_, path) = file
            .keep()
            .map_err(|e| CertChainError::PersistenceError(e.to_string()))?;
        debug!(path = %path.display(), "wrote credential file");
        Ok(CredentialRef::new(path))
    }
}

impl CredentialStore for TempFileStore {
    fn persist_chain(&self, chain: &[Vec<u8>]) -> Result<CredentialRef> {
        self.write(&self.cert_prefix, &certs_to_pem(chain))
    }

    fn persist_key(&self, key: &KeyPair) -> Result<CredentialRef> {
        let der = key.to_pkcs8_der()?;
        self.write(&self.key_prefix, &der_to_pem(&der, PRIVATE_KEY_LABEL))
    }
}

/// A materialized chain: certificates, their signing key, and the root they
/// chain to, each with the reference its store returned.
#[derive(Debug, Clone)]
pub struct Credential {
    pub certificate_chain: Vec<Vec<u8>>,
    pub chain_ref: CredentialRef,
    pub private_key: KeyPair,
    pub key_ref: CredentialRef,
    pub root_certificate: Vec<u8>,
    pub root_ref: CredentialRef,
}

impl Credential {
    /// The end-entity certificate, if the chain has one.
    pub fn leaf(&self) -> Option<&[u8]> {
        self.certificate_chain.last().map(Vec::as_slice)
    }

    pub fn chain_pem(&self) -> String {
        certs_to_pem(&self.certificate_chain)
    }
}
