//! Certificate inputs for the Point-to-Site configuration.
//!
//! The gateway wants the root certificate's public data as bare base64 and the
//! revoked client certificate as a SHA-1 thumbprint.

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::error::Error;
use std::path::Path;
use std::sync::OnceLock;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

static THUMBPRINT_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_thumbprint_regex() -> &'static Regex {
    THUMBPRINT_REGEX.get_or_init(|| Regex::new(r"^[0-9A-F]{40}$").expect("Invalid Regex"))
}

/// Read a root certificate (.cer) and return its public data as base64.
///
/// Accepts Base-64 (PEM) or DER encoded exports.
pub fn load_root_certificate(path: &Path) -> Result<String, Box<dyn Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Error reading certificate {}: {e}", path.display()))?;
    let data = root_certificate_data(&bytes)
        .map_err(|e| format!("Invalid certificate {}: {e}", path.display()))?;
    log::info!(
        "Loaded root certificate {} ({} base64 chars)",
        path.display(),
        data.len()
    );
    Ok(data)
}

/// Convert raw .cer file content to the base64 body Azure expects.
pub fn root_certificate_data(bytes: &[u8]) -> Result<String, Box<dyn Error>> {
    if bytes.is_empty() {
        return Err("certificate file is empty".into());
    }
    // DER starts with an ASN.1 SEQUENCE tag.
    if bytes[0] == 0x30 {
        return Ok(general_purpose::STANDARD.encode(bytes));
    }

    let text = std::str::from_utf8(bytes).map_err(|_| "neither PEM text nor DER")?;
    let text = text.trim_start_matches('\u{feff}');
    let body = match text.find(PEM_BEGIN) {
        Some(begin) => {
            let rest = &text[begin + PEM_BEGIN.len()..];
            let end = rest
                .find(PEM_END)
                .ok_or("BEGIN CERTIFICATE without a following END CERTIFICATE")?;
            &rest[..end]
        }
        None if text.contains(PEM_END) => {
            return Err("END CERTIFICATE without BEGIN CERTIFICATE".into())
        }
        None => text,
    };
    let data: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if data.is_empty() {
        return Err("no certificate data".into());
    }
    general_purpose::STANDARD
        .decode(&data)
        .map_err(|e| format!("certificate body is not base64: {e}"))?;
    Ok(data)
}

/// Normalize a certificate thumbprint as copied from a certificate viewer.
///
/// Drops separators and invisible marks, upper-cases, and requires 40 hex digits.
pub fn normalize_thumbprint(raw: &str) -> Result<String, Box<dyn Error>> {
    let thumbprint: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '\u{200e}' && *c != '\u{feff}')
        .collect::<String>()
        .to_ascii_uppercase();
    if !get_thumbprint_regex().is_match(&thumbprint) {
        return Err(format!(
            "Invalid certificate thumbprint '{raw}': expected 40 hex characters"
        )
        .into());
    }
    Ok(thumbprint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_pem_fixture() {
        let data = load_root_certificate(Path::new("src/tests/test_data/root_cert.cer"))
            .expect("Error reading certificate fixture");
        assert!(data.starts_with("MIIC5zCCAc+gAwIBAgIQ"));
        assert!(!data.contains('\n'));
        assert!(!data.contains("BEGIN"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_root_certificate(Path::new("src/tests/test_data/missing.cer"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing.cer"), "{err}");
    }

    #[test]
    fn test_der_is_encoded() {
        let der = [0x30u8, 0x82, 0x01, 0x0a, 0x02, 0x01];
        assert_eq!(root_certificate_data(&der).unwrap(), "MIIBCgIB");
    }

    #[test]
    fn test_bare_base64_is_accepted() {
        assert_eq!(
            root_certificate_data(b"MIIB\r\nCgIB\r\n").unwrap(),
            "MIIBCgIB"
        );
    }

    #[test]
    fn test_bad_certificates() {
        assert!(root_certificate_data(b"").is_err());
        assert!(root_certificate_data(b"-----BEGIN CERTIFICATE-----\nMIIB").is_err());
        assert!(root_certificate_data(b"MIIB\n-----END CERTIFICATE-----").is_err());
        // END text overlaps the BEGIN marker
        assert!(root_certificate_data(b"-----BEGIN CERTIFICATE-----END CERTIFICATE-----").is_err());
        assert!(root_certificate_data(
            b"-----END CERTIFICATE-----\n-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----"
        )
        .is_ok());
        assert!(root_certificate_data(b"not base64 !!").is_err());
        assert!(root_certificate_data(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_normalize_thumbprint() {
        assert_eq!(
            normalize_thumbprint("\u{200e}01 23 45 67 89 ab cd ef 01 23 45 67 89 ab cd ef 01 23 45 67")
                .unwrap(),
            "0123456789ABCDEF0123456789ABCDEF01234567"
        );
        assert_eq!(
            normalize_thumbprint("01:23:45:67:89:AB:CD:EF:01:23:45:67:89:AB:CD:EF:01:23:45:67")
                .unwrap(),
            "0123456789ABCDEF0123456789ABCDEF01234567"
        );
        assert!(normalize_thumbprint("0123").is_err());
        assert!(normalize_thumbprint("Z123456789ABCDEF0123456789ABCDEF01234567").is_err());
    }
}
