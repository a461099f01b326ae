//! Growing a certificate chain one link at a time from a self-signed root.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::cert::params::{DistinguishedName, SubjectSpec};
use crate::credential::{Credential, CredentialRef, CredentialStore};
use crate::error::Result;
use crate::issuer::{Issuer, SelfIssuer};
use crate::key::KeyPair;
use crate::serial::SerialAllocator;

/// The identity of the most recently issued subject, plus the chain that
/// leads to it.
///
/// Issuing never changes `self`; it returns a new builder for the subject
/// just issued, one certificate longer. Builders are cheap to share across
/// threads.
///
/// # Example
/// ```rust,no_run
/// use certchain::cert::params::{DistinguishedName, SubjectSpec};
/// use certchain::chain::ChainBuilder;
/// use certchain::credential::TempFileStore;
/// use certchain::key::KeyPair;
///
/// # fn main() -> certchain::error::Result<()> {
/// let store = TempFileStore::default();
/// let root = ChainBuilder::new_root(
///     &SubjectSpec::builder()
///         .key(KeyPair::generate_ecdsa_p256())
///         .name(DistinguishedName::from_common_name("Root"))
///         .is_ca(true)
///         .build(),
///     &store,
/// )?;
/// let leaf = root.issue(
///     &SubjectSpec::builder()
///         .key(KeyPair::generate_ecdsa_p256())
///         .name(DistinguishedName::from_common_name("leaf"))
///         .build(),
/// )?;
/// let credential = leaf.to_credential(&store)?;
/// println!("{}", credential.chain_ref.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChainBuilder {
    key: KeyPair,
    name: DistinguishedName,
    subject_key_id: Vec<u8>,
    root_cert: Vec<u8>,
    root_ref: CredentialRef,
    chain: Vec<Vec<u8>>,
    serials: Arc<SerialAllocator>,
}

impl ChainBuilder {
    /// Self-signs `root`, persists the root certificate through `store` and
    /// returns a builder with an empty chain.
    pub fn new_root(root: &SubjectSpec, store: &impl CredentialStore) -> Result<Self> {
        Self::new_root_with_serials(root, store, SerialAllocator::global())
    }

    /// Like [`new_root`](Self::new_root), drawing serials from `serials` for
    /// the whole chain.
    pub fn new_root_with_serials(
        root: &SubjectSpec,
        store: &impl CredentialStore,
        serials: Arc<SerialAllocator>,
    ) -> Result<Self> {
        let serial = serials.allocate();
        let cert = SelfIssuer::new(root).issue_certificate(root, serial, OffsetDateTime::now_utc())?;
        let root_cert = cert.to_der()?;
        let root_ref = store.persist_chain(std::slice::from_ref(&root_cert))?;
        info!(
            subject = %root.name,
            serial,
            path = %root_ref.as_path().display(),
            "created root certificate"
        );

        Ok(Self {
            key: root.key.clone(),
            name: root.name.clone(),
            subject_key_id: root.subject_key_id.clone(),
            root_cert,
            root_ref,
            chain: Vec::new(),
            serials,
        })
    }

    /// Issues a certificate for `subject` signed by this builder's key.
    pub fn issue(&self, subject: &SubjectSpec) -> Result<Self> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    /// Like [`issue`](Self::issue) with an explicit issuance instant.
    pub fn issue_at(&self, subject: &SubjectSpec, now: OffsetDateTime) -> Result<Self> {
        let serial = self.serials.allocate();
        let cert = self.issue_certificate(subject, serial, now)?;
        let der = cert.to_der()?;
        debug!(
            serial,
            issuer = %self.name,
            subject = %subject.name,
            algorithm = ?subject.signature_algorithm.resolve(&self.key),
            "issued certificate"
        );

        let mut chain = Vec::with_capacity(self.chain.len() + 1);
        chain.extend(self.chain.iter().cloned());
        chain.push(der);

        Ok(Self {
            key: subject.key.clone(),
            name: subject.name.clone(),
            subject_key_id: subject.subject_key_id.clone(),
            root_cert: self.root_cert.clone(),
            root_ref: self.root_ref.clone(),
            chain,
            serials: Arc::clone(&self.serials),
        })
    }

    /// Persists the chain and key through `store`, one call each.
    pub fn to_credential(&self, store: &impl CredentialStore) -> Result<Credential> {
        let chain_ref = store.persist_chain(&self.chain)?;
        let key_ref = store.persist_key(&self.key)?;
        Ok(Credential {
            certificate_chain: self.chain.clone(),
            chain_ref,
            private_key: self.key.clone(),
            key_ref,
            root_certificate: self.root_cert.clone(),
            root_ref: self.root_ref.clone(),
        })
    }

    pub fn key(&self) -> &KeyPair {
        &self.key
    }

    pub fn name(&self) -> &DistinguishedName {
        &self.name
    }

    /// DER certificates from the one issued by the root down to this subject's.
    pub fn chain(&self) -> &[Vec<u8>] {
        &self.chain
    }

    pub fn root_certificate(&self) -> &[u8] {
        &self.root_cert
    }

    pub fn root_ref(&self) -> &CredentialRef {
        &self.root_ref
    }

    pub fn serials(&self) -> &Arc<SerialAllocator> {
        &self.serials
    }
}

impl Issuer for ChainBuilder {
    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn issuer_name(&self) -> &DistinguishedName {
        &self.name
    }

    fn subject_key_id(&self) -> &[u8] {
        &self.subject_key_id
    }
}
