use pem::{EncodeConfig, LineEnding, Pem};

use crate::error::{CertChainError, Result};

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

fn encode_config() -> EncodeConfig {
    EncodeConfig::new().set_line_ending(LineEnding::LF)
}

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    pem::encode_config(&Pem::new(label, der), encode_config())
}

/// Concatenated `CERTIFICATE` blocks, one per DER certificate, in order.
pub fn certs_to_pem(certs: &[Vec<u8>]) -> String {
    let blocks: Vec<Pem> = certs
        .iter()
        .map(|der| Pem::new(CERTIFICATE_LABEL, der.as_slice()))
        .collect();
    pem::encode_many_config(&blocks, encode_config())
}

/// Convert a PEM‑encoded string to DER‑encoded bytes.
pub fn pem_to_der(pem_str: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str).map_err(|e| CertChainError::EncodingError(e.to_string()))?;
    Ok(pem.into_contents())
}

/// Every `CERTIFICATE` block in `pem_str`, in file order.
pub fn certs_from_pem(pem_str: &str) -> Result<Vec<Vec<u8>>> {
    let blocks =
        pem::parse_many(pem_str).map_err(|e| CertChainError::EncodingError(e.to_string()))?;
    Ok(blocks
        .into_iter()
        .filter(|block| block.tag() == CERTIFICATE_LABEL)
        .map(Pem::into_contents)
        .collect())
}
