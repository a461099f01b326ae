use der::Encode;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::ext::Extension;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::params::{DistinguishedName, Validity};
use crate::encoding::x509_time;
use crate::error::Result;
use crate::signature::SignatureAlgorithm;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The unique identifier for the certificate.
/// * `signature_algorithm` - The resolved algorithm the issuer signs with.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key_info` - The encoded public key of the subject.
/// * `extensions` - Extensions, in the order they will be written.
#[derive(Debug, Clone)]
pub struct TbsCertificate {
    pub serial_number: u64,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    pub extensions: Vec<Extension>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    ///
    /// The `[3]` extensions field is always emitted, even with no extensions.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let validity = x509_cert::time::Validity {
            not_before: x509_time(self.validity.not_before)?,
            not_after: x509_time(self.validity.not_after)?,
        };

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(&self.serial_number.to_be_bytes())?,
            signature: self.signature_algorithm.algorithm_identifier()?,
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key_info.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(self.extensions.clone()),
        })
    }

    /// Encodes the `TbsCertificate` into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.to_tbs_certificate_inner()?.to_der()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use der::Decode;
    use time::Duration;
    use time::macros::datetime;

    fn sample(extensions: Vec<Extension>) -> TbsCertificate {
        let key = KeyPair::generate_ed25519();
        TbsCertificate {
            serial_number: 7,
            signature_algorithm: SignatureAlgorithm::Ed25519,
            issuer: DistinguishedName::from_common_name("issuer"),
            validity: Validity::around(datetime!(2030-01-01 00:00:00 UTC), Duration::hours(1))
                .unwrap(),
            subject: DistinguishedName::from_common_name("subject"),
            subject_public_key_info: key.subject_public_key_info().unwrap(),
            extensions,
        }
    }

    #[test]
    fn test_empty_extensions_still_emit_wrapper() {
        let der = sample(Vec::new()).to_der().unwrap();
        // [3] EXPLICIT { SEQUENCE {} } closes the structure.
        assert!(der.ends_with(&[0xa3, 0x02, 0x30, 0x00]));

        let decoded = x509_cert::TbsCertificate::from_der(&der).unwrap();
        assert_eq!(decoded.version, Version::V3);
        assert_eq!(decoded.extensions, Some(Vec::new()));
    }

    #[test]
    fn test_serial_and_names_round_trip() {
        let der = sample(Vec::new()).to_der().unwrap();
        let decoded = x509_cert::TbsCertificate::from_der(&der).unwrap();
        assert_eq!(decoded.serial_number.as_bytes(), [7]);
        assert_eq!(decoded.issuer.to_string(), "CN=issuer");
        assert_eq!(decoded.subject.to_string(), "CN=subject");
    }

    #[test]
    fn test_unresolved_algorithm_is_rejected() {
        let mut tbs = sample(Vec::new());
        tbs.signature_algorithm = SignatureAlgorithm::Default;
        assert!(matches!(
            tbs.to_der(),
            Err(crate::error::CertChainError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn test_pre_1970_validity_is_an_encoding_error() {
        let mut tbs = sample(Vec::new());
        tbs.validity =
            Validity::around(datetime!(1960-06-01 00:00:00 UTC), Duration::hours(1)).unwrap();
        assert!(matches!(
            tbs.to_der(),
            Err(crate::error::CertChainError::EncodingError(_))
        ));
    }
}
