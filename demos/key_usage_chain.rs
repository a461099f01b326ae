//! Issues the certificates a TLS key-usage test needs: an ECDSA leaf that may
//! only be used for key agreement, and two RSA leaves restricted to signing
//! and to key encipherment respectively.
//!
//! ```sh
//! RUST_LOG=debug CERTCHAIN_TMPDIR=/tmp/certs cargo run --example key_usage_chain
//! ```

use certchain::cert::params::{DistinguishedName, SubjectSpec};
use certchain::chain::ChainBuilder;
use certchain::credential::TempFileStore;
use certchain::error::Result;
use certchain::key::KeyPair;
use der::flagset::FlagSet;
use tracing_subscriber::EnvFilter;
use x509_cert::ext::pkix::KeyUsages;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = TempFileStore::from_env();
    let root_key = KeyPair::generate_ecdsa_p256();
    let root = ChainBuilder::new_root(
        &SubjectSpec::builder()
            .name(DistinguishedName::from_common_name("Key Usage Test Root"))
            .is_ca(true)
            .subject_key_id(root_key.key_identifier()?)
            .key_usage(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
            .key(root_key)
            .build(),
        &store,
    )?;

    let fixtures: [(&str, KeyPair, FlagSet<KeyUsages>); 3] = [
        (
            "ecdsa-key-agreement",
            KeyPair::generate_ecdsa_p256(),
            KeyUsages::KeyAgreement.into(),
        ),
        (
            "rsa-digital-signature",
            KeyPair::generate_rsa(2048)?,
            KeyUsages::DigitalSignature.into(),
        ),
        (
            "rsa-key-encipherment",
            KeyPair::generate_rsa(2048)?,
            KeyUsages::KeyEncipherment.into(),
        ),
    ];

    println!("root: {}", root.root_ref().as_path().display());
    for (label, key, usage) in fixtures {
        let leaf = root.issue(
            &SubjectSpec::builder()
                .name(DistinguishedName::from_common_name("Test Cert"))
                .dns_names(vec!["test".to_string()])
                .key_usage(usage)
                .key(key)
                .build(),
        )?;
        let credential = leaf.to_credential(&store)?;
        println!(
            "{label}: cert={} key={}",
            credential.chain_ref.as_path().display(),
            credential.key_ref.as_path().display()
        );
    }

    Ok(())
}
