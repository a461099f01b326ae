use std::fmt;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::asn1::{Any, SetOfVec};
use der::flagset::FlagSet;
use time::{Duration, OffsetDateTime};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::ext::pkix::KeyUsages;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::encoding::rsa_pss_subject_public_key_info;
use crate::error::{CertChainError, Result};
use crate::key::KeyPair;
use crate::signature::SignatureAlgorithm;

const OID_COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const OID_STATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const OID_LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const OID_ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const OID_ORGANIZATION_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");
const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Everything needed to issue one certificate for a subject.
///
/// # Fields
/// * `key` - The subject's key pair. Its public half goes into the
///   certificate; the private half signs whatever this subject issues next.
/// * `name` - The subject distinguished name.
/// * `dns_names` - dNSName entries for the Subject Alternative Name extension.
/// * `is_ca` - Adds a critical Basic Constraints extension with `cA = TRUE`.
/// * `subject_key_id` - Subject Key Identifier bytes; also becomes the
///   Authority Key Identifier of certificates this subject issues.
/// * `key_usage` - Key Usage flags, marked critical when non-empty.
/// * `signature_algorithm` - Algorithm used by the issuer to sign this
///   certificate.
/// * `encode_spki_as_rsa_pss` - Declare the RSA key as id-RSASSA-PSS.
#[derive(Clone, Debug, Builder)]
pub struct SubjectSpec {
    pub key: KeyPair,
    #[builder(default)]
    pub name: DistinguishedName,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub subject_key_id: Vec<u8>,
    #[builder(default)]
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub signature_algorithm: SignatureAlgorithm,
    #[builder(default)]
    pub encode_spki_as_rsa_pss: bool,
}

impl SubjectSpec {
    /// The subjectPublicKeyInfo written into the subject's certificate.
    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        if !self.encode_spki_as_rsa_pss {
            return self.key.subject_public_key_info();
        }
        match self.key.rsa_public_key() {
            Some(public) => rsa_pss_subject_public_key_info(public),
            None => Err(CertChainError::UnsupportedKeyType(format!(
                "RSA-PSS subjectPublicKeyInfo requires an RSA key, got {:?}",
                self.key.kind()
            ))),
        }
    }
}

/// Distinguished name of a certificate subject or issuer.
///
/// Present attributes are encoded one per RDN in the order C, ST, L, O, OU,
/// CN. A name with no attributes encodes as an empty RDNSequence.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Shorthand for a name holding only a common name.
    pub fn from_common_name(common_name: impl Into<String>) -> Self {
        Self {
            common_name: Some(common_name.into()),
            ..Self::default()
        }
    }

    fn attributes(&self) -> impl Iterator<Item = (ObjectIdentifier, &str)> {
        [
            (OID_COUNTRY, &self.country),
            (OID_STATE, &self.state),
            (OID_LOCALITY, &self.locality),
            (OID_ORGANIZATION, &self.organization),
            (OID_ORGANIZATION_UNIT, &self.organization_unit),
            (OID_COMMON_NAME, &self.common_name),
        ]
        .into_iter()
        .filter_map(|(oid, value)| value.as_deref().map(|v| (oid, v)))
    }

    /// Converts the distinguished name to an X.509 RDNSequence.
    ///
    /// Values are PrintableString when every character allows it and
    /// UTF8String otherwise.
    pub fn as_x509_name(&self) -> der::Result<RdnSequence> {
        let mut rdns = Vec::new();
        for (oid, value) in self.attributes() {
            let tag = if is_printable_string(value) {
                Tag::PrintableString
            } else {
                Tag::Utf8String
            };
            let attribute = AttributeTypeAndValue {
                oid,
                value: Any::new(tag, value.as_bytes())?,
            };
            let set = SetOfVec::try_from(vec![attribute])?;
            rdns.push(RelativeDistinguishedName::from(set));
        }
        Ok(RdnSequence(rdns))
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = ["C", "ST", "L", "O", "OU", "CN"];
        let values = [
            &self.country,
            &self.state,
            &self.locality,
            &self.organization,
            &self.organization_unit,
            &self.common_name,
        ];
        let mut first = true;
        for (label, value) in labels.iter().zip(values) {
            if let Some(value) = value {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{label}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

fn is_printable_string(value: &str) -> bool {
    value.bytes().all(|b| {
        b.is_ascii_alphanumeric()
            || matches!(
                b,
                b' ' | b'\'' | b'(' | b')' | b'+' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?'
            )
    })
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A window of `margin` on either side of `now`, at whole-second precision.
    ///
    /// # Errors
    /// [`CertChainError::EncodingError`] when either bound falls outside the
    /// range `time` can represent.
    pub fn around(now: OffsetDateTime, margin: Duration) -> Result<Self> {
        let now = now.replace_nanosecond(0).unwrap_or(now);
        match (now.checked_sub(margin), now.checked_add(margin)) {
            (Some(not_before), Some(not_after)) => Ok(Self {
                not_before,
                not_after,
            }),
            _ => Err(CertChainError::EncodingError(format!(
                "validity of {margin} around {now} is out of range"
            ))),
        }
    }
}
