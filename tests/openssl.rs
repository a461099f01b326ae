mod util;

use std::process::Command;
use std::sync::Arc;

use certchain::chain::ChainBuilder;
use certchain::credential::TempFileStore;
use certchain::key::KeyPair;
use certchain::serial::SerialAllocator;
use openssl::nid::Nid;
use openssl::x509::X509;
use regex::Regex;

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

#[test]
fn test_openssl_crate_validate_chain() {
    let serials = Arc::new(SerialAllocator::with_last(41));
    let root = ChainBuilder::new_root_with_serials(
        &util::ca_spec("myca.local", KeyPair::generate_ecdsa_p256(), vec![0x11; 20]),
        &util::NullStore,
        serials,
    )
    .unwrap();
    let intermediate = root
        .issue(&util::ca_spec(
            "intermediate.myca.local",
            KeyPair::generate_rsa(2048).unwrap(),
            vec![0x22; 20],
        ))
        .unwrap();
    let leaf = intermediate
        .issue(&util::leaf_spec("server.myca.local", KeyPair::generate_ed25519()))
        .unwrap();

    let root_x509 = X509::from_der(root.root_certificate()).expect("Failed to parse root");
    let intermediate_x509 = X509::from_der(&leaf.chain()[0]).expect("Failed to parse intermediate");
    let leaf_x509 = X509::from_der(&leaf.chain()[1]).expect("Failed to parse leaf");

    assert!(root_x509.verify(&root_x509.public_key().unwrap()).unwrap());
    assert!(
        intermediate_x509
            .verify(&root_x509.public_key().unwrap())
            .unwrap()
    );
    assert!(
        leaf_x509
            .verify(&intermediate_x509.public_key().unwrap())
            .unwrap()
    );

    assert_eq!(common_name(leaf_x509.subject_name()), "server.myca.local");
    assert_eq!(common_name(leaf_x509.issuer_name()), "intermediate.myca.local");
    assert_eq!(leaf_x509.version(), 2, "X509 version should be 3 (0-based index)");

    let serial = leaf_x509.serial_number().to_bn().unwrap().to_dec_str().unwrap();
    assert_eq!(serial.to_string(), "44");

    assert_eq!(
        intermediate_x509.signature_algorithm().object().nid(),
        Nid::ECDSA_WITH_SHA256
    );
    assert_eq!(
        leaf_x509.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );

    let san = leaf_x509.subject_alt_names().expect("missing SAN");
    let dns: Vec<_> = san.iter().filter_map(|name| name.dnsname()).collect();
    assert_eq!(dns, ["server.myca.local"]);
}

#[test]
fn test_openssl_parses_rsa_pss_subject_key() {
    let (_, intermediate) = util::root_and_intermediate(Arc::new(SerialAllocator::new()));
    let subject = certchain::cert::params::SubjectSpec::builder()
        .key(KeyPair::generate_rsa(2048).unwrap())
        .name(certchain::cert::params::DistinguishedName::from_common_name(
            "pss.myca.local",
        ))
        .encode_spki_as_rsa_pss(true)
        .build();
    let leaf = intermediate.issue(&subject).unwrap();

    let x509 = X509::from_der(&leaf.chain()[1]).expect("Failed to parse PSS leaf");
    let key = x509.public_key().expect("PSS key should load");
    assert_eq!(key.id(), openssl::pkey::Id::RSA_PSS);
    assert_eq!(key.bits(), 2048);
}

#[test]
fn test_openssl_cli_reads_credential_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = TempFileStore::builder().dir(dir.path()).build();
    let root = ChainBuilder::new_root(
        &util::ca_spec("myca.local", KeyPair::generate_ecdsa_p256(), vec![0x11; 20]),
        &store,
    )
    .unwrap();
    let leaf = root
        .issue(&util::leaf_spec("server.myca.local", KeyPair::generate_ecdsa_p256()))
        .unwrap();
    let credential = leaf.to_credential(&store).unwrap();

    let output = Command::new("openssl")
        .arg("x509")
        .arg("-in")
        .arg(credential.chain_ref.as_path())
        .arg("-noout")
        .arg("-text")
        .output()
        .expect("Failed to execute OpenSSL command");
    assert!(
        output.status.success(),
        "OpenSSL command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output_text = String::from_utf8_lossy(&output.stdout);
    assert!(output_text.contains("Version: 3 (0x2)"));
    assert!(output_text.contains("Signature Algorithm: ecdsa-with-SHA256"));
    assert!(output_text.contains("DNS:server.myca.local"));
    assert!(Regex::new(r"Issuer: ?CN ?= ?myca\.local").unwrap().is_match(&output_text));
    assert!(
        Regex::new(r"Subject: ?CN ?= ?server\.myca\.local")
            .unwrap()
            .is_match(&output_text)
    );
    assert!(
        Regex::new(r"X509v3 Key Usage: critical\s+Digital Signature")
            .unwrap()
            .is_match(&output_text)
    );

    let output = Command::new("openssl")
        .arg("pkey")
        .arg("-in")
        .arg(credential.key_ref.as_path())
        .arg("-noout")
        .output()
        .expect("Failed to execute OpenSSL command");
    assert!(
        output.status.success(),
        "OpenSSL could not read the key: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
