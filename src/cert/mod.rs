pub mod extensions;
pub mod params;

use der::asn1::BitString;
use der::{Encode, EncodePem};
use x509_cert::certificate::{CertificateInner, TbsCertificateInner};
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::error::{CertChainError, Result};

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Wraps a signed TBSCertificate into the outer
    /// `SEQUENCE { tbs, signatureAlgorithm, BIT STRING signature }`.
    pub fn assemble(
        tbs_certificate: TbsCertificateInner,
        signature_algorithm: AlgorithmIdentifierOwned,
        signature: &[u8],
    ) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner {
                tbs_certificate,
                signature_algorithm,
                signature: BitString::from_bytes(signature)?,
            },
        })
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.to_der()?)
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block with LF line endings.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertChainError::EncodingError(e.to_string()))
    }

    /// The serial number as an unsigned integer.
    ///
    /// Serials issued by this crate always fit in a `u64`.
    pub fn serial(&self) -> Option<u64> {
        let bytes = self.inner.tbs_certificate.serial_number.as_bytes();
        let bytes = match bytes.iter().position(|b| *b != 0) {
            Some(start) => &bytes[start..],
            None => return Some(0),
        };
        if bytes.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[8 - bytes.len()..].copy_from_slice(bytes);
        Some(u64::from_be_bytes(buf))
    }
}
