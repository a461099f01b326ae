#![allow(dead_code)]

use std::sync::Arc;

use certchain::cert::params::{DistinguishedName, SubjectSpec};
use certchain::chain::ChainBuilder;
use certchain::credential::{CredentialRef, CredentialStore};
use certchain::error::Result;
use certchain::key::KeyPair;
use certchain::serial::SerialAllocator;
use der::{Decode, Encode};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use rsa::signature::Verifier;
use sha2::{Digest, Sha256};
use x509_cert::Certificate;
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::KeyUsages;

/// A store that hands out references without writing anything.
pub struct NullStore;

impl CredentialStore for NullStore {
    fn persist_chain(&self, _chain: &[Vec<u8>]) -> Result<CredentialRef> {
        Ok(CredentialRef::new("chain"))
    }

    fn persist_key(&self, _key: &KeyPair) -> Result<CredentialRef> {
        Ok(CredentialRef::new("key"))
    }
}

pub fn parse(der: &[u8]) -> Certificate {
    Certificate::from_der(der).expect("certificate should parse")
}

pub fn extension(cert: &Certificate, oid: der::oid::ObjectIdentifier) -> Option<&Extension> {
    cert.tbs_certificate
        .extensions
        .as_ref()?
        .iter()
        .find(|ext| ext.extn_id == oid)
}

/// Checks `cert`'s signature against `issuer_key` with the RustCrypto verifiers.
pub fn verify(cert: &Certificate, issuer_key: &KeyPair) -> bool {
    let tbs = cert.tbs_certificate.to_der().unwrap();
    let signature = cert.signature.raw_bytes();
    match issuer_key {
        KeyPair::Rsa { public, .. } => {
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(public.clone());
            rsa::pkcs1v15::Signature::try_from(signature)
                .map(|sig| verifying_key.verify(&tbs, &sig).is_ok())
                .unwrap_or(false)
        }
        KeyPair::EcdsaP256 { verifying_key, .. } => p256::ecdsa::Signature::from_der(signature)
            .map(|sig| verifying_key.verify_prehash(&Sha256::digest(&tbs), &sig).is_ok())
            .unwrap_or(false),
        KeyPair::EcdsaP384 { verifying_key, .. } => p384::ecdsa::Signature::from_der(signature)
            .map(|sig| verifying_key.verify_prehash(&Sha256::digest(&tbs), &sig).is_ok())
            .unwrap_or(false),
        KeyPair::Ed25519 { signing_key } => ed25519_dalek::Signature::from_slice(signature)
            .map(|sig| signing_key.verifying_key().verify(&tbs, &sig).is_ok())
            .unwrap_or(false),
    }
}

pub fn ca_spec(common_name: &str, key: KeyPair, subject_key_id: Vec<u8>) -> SubjectSpec {
    SubjectSpec::builder()
        .key(key)
        .name(DistinguishedName::from_common_name(common_name))
        .is_ca(true)
        .subject_key_id(subject_key_id)
        .key_usage(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
        .build()
}

pub fn leaf_spec(common_name: &str, key: KeyPair) -> SubjectSpec {
    SubjectSpec::builder()
        .key(key)
        .name(DistinguishedName::from_common_name(common_name))
        .dns_names(vec![common_name.to_string()])
        .key_usage(KeyUsages::DigitalSignature.into())
        .build()
}

/// Root (ECDSA P-256) -> intermediate (Ed25519) with a private serial counter.
pub fn root_and_intermediate(serials: Arc<SerialAllocator>) -> (ChainBuilder, ChainBuilder) {
    let root = ChainBuilder::new_root_with_serials(
        &ca_spec("Test Root", KeyPair::generate_ecdsa_p256(), vec![0x01; 20]),
        &NullStore,
        serials,
    )
    .unwrap();
    let intermediate = root
        .issue(&ca_spec(
            "Test Intermediate",
            KeyPair::generate_ed25519(),
            vec![0x02; 20],
        ))
        .unwrap();
    (root, intermediate)
}
