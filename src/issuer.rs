use der::Encode;
use time::{Duration, OffsetDateTime};

use crate::cert::Certificate;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, CaBasicConstraints, ExtensionsBuilder, KeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::{DistinguishedName, SubjectSpec, Validity};
use crate::error::Result;
use crate::key::KeyPair;
use crate::signature::sign;
use crate::tbs_certificate::TbsCertificate;

/// How far on either side of the issuance instant a certificate is valid.
pub const VALIDITY_MARGIN: Duration = Duration::hours(1);

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the key that signs issued certificates.
    fn signing_key(&self) -> &KeyPair;

    /// Returns the distinguished name written as the issuer of issued certificates.
    fn issuer_name(&self) -> &DistinguishedName;

    /// Returns the issuer's subject key identifier; empty when it has none.
    fn subject_key_id(&self) -> &[u8];

    /// Issues a certificate for `subject`.
    ///
    /// # Arguments
    /// * `subject` - What the certificate says about its subject.
    /// * `serial` - The serial number, unique per allocator.
    /// * `now` - The issuance instant; the certificate is valid for one hour
    ///   on either side of it.
    ///
    /// # Errors
    /// `UnknownAlgorithm` when the subject asks for an algorithm the issuer key
    /// cannot produce, `UnsupportedKeyType` for an RSA-PSS SPKI on a non-RSA
    /// key, and `EncodingError` or `SigningError` from the encoder and signer.
    fn issue_certificate(
        &self,
        subject: &SubjectSpec,
        serial: u64,
        now: OffsetDateTime,
    ) -> Result<Certificate> {
        let signing_key = self.signing_key();
        let algorithm = subject.signature_algorithm.resolve(signing_key);

        let issuer_key_id = self.subject_key_id();
        let extensions = ExtensionsBuilder::new()
            .add_if(!issuer_key_id.is_empty(), || AuthorityKeyIdentifier {
                key_identifier: issuer_key_id.to_vec(),
            })
            .add_if(!subject.key_usage.is_empty(), || KeyUsage(subject.key_usage))
            .add_if(!subject.dns_names.is_empty(), || SubjectAltName {
                names: subject.dns_names.clone(),
            })
            .add_if(subject.is_ca, || CaBasicConstraints)
            .add_if(!subject.subject_key_id.is_empty(), || {
                SubjectKeyIdentifier(subject.subject_key_id.clone())
            })
            .build()?;

        let tbs = TbsCertificate {
            serial_number: serial,
            signature_algorithm: algorithm,
            issuer: self.issuer_name().clone(),
            validity: Validity::around(now, VALIDITY_MARGIN)?,
            subject: subject.name.clone(),
            subject_public_key_info: subject.subject_public_key_info()?,
            extensions,
        };
        let tbs_inner = tbs.to_tbs_certificate_inner()?;
        let signature = sign(signing_key, algorithm, &tbs_inner.to_der()?)?;

        Certificate::assemble(tbs_inner, algorithm.algorithm_identifier()?, &signature)
    }
}

/// Issuer for a self-signed certificate: the subject signs itself.
pub struct SelfIssuer<'a> {
    subject: &'a SubjectSpec,
}

impl<'a> SelfIssuer<'a> {
    pub fn new(subject: &'a SubjectSpec) -> Self {
        Self { subject }
    }
}

impl Issuer for SelfIssuer<'_> {
    fn signing_key(&self) -> &KeyPair {
        &self.subject.key
    }

    fn issuer_name(&self) -> &DistinguishedName {
        &self.subject.name
    }

    fn subject_key_id(&self) -> &[u8] {
        &self.subject.subject_key_id
    }
}
