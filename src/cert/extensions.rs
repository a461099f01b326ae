use const_oid::AssociatedOid;
use der::{
    Encode,
    asn1::OctetString,
    flagset::FlagSet,
    oid::ObjectIdentifier,
};
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::KeyUsages;

use crate::encoding::{SequenceBuilder, implicit_bytes, key_usage_bit_string};
use crate::error::{CertChainError, Result};

/// Trait for encoding X.509 extensions.
///
/// # Example
/// ```
/// use certchain::cert::extensions::{SubjectAltName, ToX509Extension};
/// let san = SubjectAltName { names: vec!["example.com".to_string()] };
/// let ext = san.to_x509_extension().unwrap();
/// assert!(!ext.critical);
/// ```
pub trait ToX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Whether the extension is marked critical.
    const CRITICAL: bool = false;

    /// Encodes the extension value (the contents of `extnValue`).
    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>>;

    /// Wraps the value in an `Extension` with this type's OID and criticality.
    fn to_x509_extension(&self) -> der::Result<Extension> {
        Ok(Extension {
            extn_id: Self::OID,
            critical: Self::CRITICAL,
            extn_value: OctetString::new(self.to_x509_extension_value()?)?,
        })
    }
}

/// Authority Key Identifier carrying only the keyIdentifier field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>> {
        SequenceBuilder::new()
            .push_result(implicit_bytes(0, &self.key_identifier))
            .to_der()
    }
}

/// Key Usage extension; always critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl ToX509Extension for KeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::KeyUsage::OID;
    const CRITICAL: bool = true;

    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>> {
        key_usage_bit_string(self.0.bits())?.to_der()
    }
}

/// Subject Alternative Name made of dNSName entries, in order.
///
/// Names are written as-is; no IA5String validation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<String>,
}

impl ToX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>> {
        self.names
            .iter()
            .fold(SequenceBuilder::new(), |names, dns| {
                names.push_result(implicit_bytes(2, dns.as_bytes()))
            })
            .to_der()
    }
}

/// Basic Constraints with `cA = TRUE` and no path length; always critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaBasicConstraints;

impl ToX509Extension for CaBasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;
    const CRITICAL: bool = true;

    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>> {
        SequenceBuilder::new().push(&true).to_der()
    }
}

/// Subject Key Identifier holding caller-supplied bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl ToX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> der::Result<Vec<u8>> {
        OctetString::new(self.0.as_slice())?.to_der()
    }
}

/// Collects extensions in insertion order.
///
/// Encoding failures are held until [`build`](ExtensionsBuilder::build),
/// which reports the first one.
#[derive(Debug, Default)]
pub struct ExtensionsBuilder {
    extensions: Vec<Extension>,
    error: Option<der::Error>,
}

impl ExtensionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<E: ToX509Extension>(mut self, extension: &E) -> Self {
        if self.error.is_some() {
            return self;
        }
        match extension.to_x509_extension() {
            Ok(ext) => self.extensions.push(ext),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Adds `extension` only when `condition` holds.
    pub fn add_if<E: ToX509Extension>(self, condition: bool, extension: impl FnOnce() -> E) -> Self {
        if condition { self.add(&extension()) } else { self }
    }

    pub fn build(self) -> Result<Vec<Extension>> {
        match self.error {
            Some(err) => Err(CertChainError::EncodingError(err.to_string())),
            None => Ok(self.extensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::Decode;

    #[test]
    fn test_authority_key_identifier_encoding() {
        let aki = AuthorityKeyIdentifier {
            key_identifier: vec![1, 2, 3, 4, 5],
        };
        let value = aki.to_x509_extension_value().unwrap();
        assert_eq!(value, [0x30, 0x07, 0x80, 0x05, 1, 2, 3, 4, 5]);

        let decoded = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(&value).unwrap();
        assert_eq!(decoded.key_identifier.unwrap().as_bytes(), [1, 2, 3, 4, 5]);
        assert!(decoded.authority_cert_issuer.is_none());
    }

    #[test]
    fn test_key_usage_is_critical_and_decodes() {
        let ku = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment);
        let ext = ku.to_x509_extension().unwrap();
        assert!(ext.critical);
        assert_eq!(ext.extn_value.as_bytes(), [0x03, 0x02, 0x05, 0xa0]);

        let decoded = x509_cert::ext::pkix::KeyUsage::from_der(ext.extn_value.as_bytes()).unwrap();
        assert_eq!(decoded.0, ku.0);
    }

    #[test]
    fn test_subject_alt_name_preserves_order() {
        let san = SubjectAltName {
            names: vec!["b.test".to_string(), "a.test".to_string()],
        };
        let value = san.to_x509_extension_value().unwrap();
        let decoded = x509_cert::ext::pkix::SubjectAltName::from_der(&value).unwrap();
        let names: Vec<String> = decoded
            .0
            .iter()
            .map(|name| match name {
                x509_cert::ext::pkix::name::GeneralName::DnsName(dns) => dns.to_string(),
                other => panic!("unexpected general name {other:?}"),
            })
            .collect();
        assert_eq!(names, ["b.test", "a.test"]);
    }

    #[test]
    fn test_basic_constraints_encoding() {
        let ext = CaBasicConstraints.to_x509_extension().unwrap();
        assert!(ext.critical);
        assert_eq!(ext.extn_value.as_bytes(), [0x30, 0x03, 0x01, 0x01, 0xff]);
        // Critical flag is encoded as an explicit BOOLEAN TRUE.
        assert_eq!(
            ext.to_der().unwrap(),
            [
                0x30, 0x0f, 0x06, 0x03, 0x55, 0x1d, 0x13, 0x01, 0x01, 0xff, 0x04, 0x05, 0x30,
                0x03, 0x01, 0x01, 0xff
            ]
        );
    }

    #[test]
    fn test_subject_key_identifier_encoding() {
        let ski = SubjectKeyIdentifier(vec![0xaa, 0xbb]);
        let ext = ski.to_x509_extension().unwrap();
        assert!(!ext.critical);
        assert_eq!(ext.extn_value.as_bytes(), [0x04, 0x02, 0xaa, 0xbb]);
    }

    #[test]
    fn test_builder_keeps_order_and_skips_absent() {
        let extensions = ExtensionsBuilder::new()
            .add_if(false, || AuthorityKeyIdentifier {
                key_identifier: vec![1],
            })
            .add(&KeyUsage(KeyUsages::KeyAgreement.into()))
            .add_if(true, || CaBasicConstraints)
            .add(&SubjectKeyIdentifier(vec![2]))
            .build()
            .unwrap();
        let oids: Vec<_> = extensions.iter().map(|ext| ext.extn_id).collect();
        assert_eq!(
            oids,
            [
                x509_cert::ext::pkix::KeyUsage::OID,
                x509_cert::ext::pkix::BasicConstraints::OID,
                x509_cert::ext::pkix::SubjectKeyIdentifier::OID,
            ]
        );
    }
}
