//! DER building blocks shared by the certificate issuer.
//!
//! Everything here produces typed `der` nodes; bytes only exist once a
//! caller finalizes the enclosing structure.

use const_oid::ObjectIdentifier;
use der::asn1::{BitString, ContextSpecific, GeneralizedTime, Null, OctetString, UtcTime};
use der::{Any, DateTime, Encode, Tag, TagMode, TagNumber};
use rsa::RsaPublicKey;
use rsa::pkcs1::EncodeRsaPublicKey;
use time::{OffsetDateTime, UtcOffset};
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Time;

use crate::error::Result;

pub const OID_RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
pub const OID_MGF1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.8");
pub const OID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");

/// Salt length declared in the RSA-PSS subjectPublicKeyInfo parameters.
pub const PSS_SALT_LENGTH: u8 = 32;

/// Encodes an X.509 `Time`, switching from UTCTime to GeneralizedTime
/// outside 1950..=2049 as RFC 5280 requires.
///
/// The instant is converted to UTC and truncated to whole seconds.
///
/// # Errors
/// `der::DateTime` starts at 1970, so instants in 1950..=1969 are rejected
/// even though they fall in the UTCTime range, as is anything before 1950
/// or after 9999.
pub fn x509_time(at: OffsetDateTime) -> der::Result<Time> {
    let at = at.to_offset(UtcOffset::UTC);
    let year = u16::try_from(at.year()).map_err(|_| Tag::GeneralizedTime.value_error())?;
    let date_time = DateTime::new(
        year,
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
    )?;
    if (1950..=2049).contains(&year) {
        Ok(Time::UtcTime(UtcTime::from_date_time(date_time)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_date_time(date_time)))
    }
}

/// Places `value`'s contents directly under `[tag] IMPLICIT`.
pub fn implicit<T>(tag: u8, value: T) -> ContextSpecific<T> {
    ContextSpecific {
        tag_number: TagNumber::new(tag),
        tag_mode: TagMode::Implicit,
        value,
    }
}

/// `[tag] IMPLICIT` over raw string bytes, e.g. a dNSName or keyIdentifier.
pub fn implicit_bytes(tag: u8, bytes: &[u8]) -> der::Result<ContextSpecific<OctetString>> {
    Ok(implicit(tag, OctetString::new(bytes)?))
}

/// Wraps `value`'s complete encoding in a constructed `[tag] EXPLICIT`.
pub fn explicit<T>(tag: u8, value: T) -> ContextSpecific<T> {
    ContextSpecific {
        tag_number: TagNumber::new(tag),
        tag_mode: TagMode::Explicit,
        value,
    }
}

/// Assembles a SEQUENCE from heterogeneous elements.
///
/// The first encoding failure is kept and reported by [`finish`], so a chain
/// of `push` calls needs a single error check.
///
/// [`finish`]: SequenceBuilder::finish
#[derive(Debug, Default)]
pub struct SequenceBuilder {
    body: Vec<u8>,
    error: Option<der::Error>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the DER encoding of `value`.
    pub fn push(mut self, value: &impl Encode) -> Self {
        if self.error.is_none() {
            if let Err(err) = value.encode_to_vec(&mut self.body) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Appends the result of a fallible node constructor.
    pub fn push_result<T: Encode>(self, value: der::Result<T>) -> Self {
        match value {
            Ok(value) => self.push(&value),
            Err(err) => self.fail(err),
        }
    }

    fn fail(mut self, err: der::Error) -> Self {
        self.error.get_or_insert(err);
        self
    }

    /// Returns the SEQUENCE as a single node.
    pub fn finish(self) -> der::Result<Any> {
        match self.error {
            Some(err) => Err(err),
            None => Any::new(Tag::Sequence, self.body),
        }
    }

    pub fn to_der(self) -> der::Result<Vec<u8>> {
        self.finish()?.to_der()
    }
}

/// Encodes key usage flags as a DER BIT STRING.
///
/// Bit 0 of `bits` is the first (most significant) bit on the wire. A zero
/// high byte is dropped and the bit length ends at the highest set bit.
pub fn key_usage_bit_string(bits: u16) -> der::Result<BitString> {
    if bits == 0 {
        return BitString::new(0, Vec::new());
    }
    let bytes = [(bits as u8).reverse_bits(), ((bits >> 8) as u8).reverse_bits()];
    let len = if bytes[1] == 0 { 1 } else { 2 };
    let bit_length = (u16::BITS - bits.leading_zeros()) as usize;
    let unused_bits = (len * 8 - bit_length) as u8;
    BitString::new(unused_bits, &bytes[..len])
}

fn sha256_identifier() -> der::Result<AlgorithmIdentifierOwned> {
    Ok(AlgorithmIdentifierOwned {
        oid: OID_SHA256,
        parameters: Some(Any::encode_from(&Null)?),
    })
}

fn mgf1_sha256_identifier() -> der::Result<AlgorithmIdentifierOwned> {
    Ok(AlgorithmIdentifierOwned {
        oid: OID_MGF1,
        parameters: Some(Any::encode_from(&sha256_identifier()?)?),
    })
}

/// RSASSA-PSS-params fixed to SHA-256, MGF1 with SHA-256 and a 32 byte salt.
pub fn rsa_pss_sha256_params() -> der::Result<Any> {
    SequenceBuilder::new()
        .push_result(sha256_identifier().map(|hash| explicit(0, hash)))
        .push_result(mgf1_sha256_identifier().map(|mgf| explicit(1, mgf)))
        .push(&explicit(2, PSS_SALT_LENGTH))
        .finish()
}

/// Encodes `key` under id-RSASSA-PSS instead of rsaEncryption.
///
/// Only the declared algorithm changes; the payload is the ordinary PKCS#1
/// RSAPublicKey, and certificates are still signed with PKCS#1 v1.5.
pub fn rsa_pss_subject_public_key_info(key: &RsaPublicKey) -> Result<SubjectPublicKeyInfoOwned> {
    let public_key = key.to_pkcs1_der()?;
    Ok(SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: OID_RSASSA_PSS,
            parameters: Some(rsa_pss_sha256_params()?),
        },
        subject_public_key: BitString::from_bytes(public_key.as_bytes())?,
    })
}
