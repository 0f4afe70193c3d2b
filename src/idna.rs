//! IDNA boundary.
//!
//! Rule text and hostnames may carry Unicode labels, while the rule tree only
//! stores ASCII (punycode) labels. Conversion goes through the [`Idna`] trait so
//! that pure-ASCII workloads never depend on a converter being present.
//!
//! With the `idna` feature enabled (the default) [`default_idna`] returns
//! [`Uts46Idna`], backed by the `idna` crate's UTS-46 processing. Without it,
//! [`UnavailableIdna`] is selected and every conversion fails with
//! [`PslError::UnsupportedEncoding`].

use std::sync::Arc;

use crate::error::{PslError, Result};

/// ASCII <-> Unicode domain conversion capability
pub trait Idna: Send + Sync {
    /// Convert a Unicode domain (or single label) to its ASCII form
    fn encode_ascii(&self, domain: &str) -> Result<String>;

    /// Convert an ASCII domain (or single label) to its Unicode form
    fn decode_unicode(&self, domain: &str) -> Result<String>;

    /// Whether conversions can succeed at all
    fn is_available(&self) -> bool;
}

/// Placeholder used when no IDNA implementation is compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableIdna;

impl Idna for UnavailableIdna {
    fn encode_ascii(&self, domain: &str) -> Result<String> {
        Err(PslError::UnsupportedEncoding(format!(
            "cannot encode '{}': no IDNA support available",
            domain
        )))
    }

    fn decode_unicode(&self, domain: &str) -> Result<String> {
        Err(PslError::UnsupportedEncoding(format!(
            "cannot decode '{}': no IDNA support available",
            domain
        )))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// UTS-46 conversion via the `idna` crate
///
/// Works on whole domains: ideographic and fullwidth full stops (`。`, `．`,
/// `｡`) are mapped to `.` along with the rest of the UTS-46 mapping.
#[cfg(feature = "idna")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Uts46Idna;

#[cfg(feature = "idna")]
impl Idna for Uts46Idna {
    fn encode_ascii(&self, domain: &str) -> Result<String> {
        ::idna::domain_to_ascii(domain).map_err(|e| {
            PslError::IdnaError(format!(
                "invalid internationalized domain '{}': {}",
                domain, e
            ))
        })
    }

    fn decode_unicode(&self, domain: &str) -> Result<String> {
        let (unicode, result) = ::idna::domain_to_unicode(domain);
        result.map_err(|e| {
            PslError::IdnaError(format!(
                "invalid ASCII-compatible domain '{}': {}",
                domain, e
            ))
        })?;
        Ok(unicode)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Select the IDNA implementation compiled into this build
pub fn default_idna() -> Arc<dyn Idna> {
    #[cfg(feature = "idna")]
    let idna = Uts46Idna;
    #[cfg(not(feature = "idna"))]
    let idna = UnavailableIdna;
    Arc::new(idna)
}

/// Encode a domain, leaving pure-ASCII text (including `*` labels) untouched.
///
/// Non-ASCII text is converted as a whole so that Unicode label separators
/// split labels the same way `.` does.
pub(crate) fn domain_to_ascii(idna: &dyn Idna, domain: &str) -> Result<String> {
    if domain.is_ascii() {
        Ok(domain.to_string())
    } else {
        idna.encode_ascii(domain)
    }
}

/// Decode a single label, leaving labels without an ACE prefix untouched
pub(crate) fn label_to_unicode(idna: &dyn Idna, label: &str) -> Result<String> {
    if label.starts_with("xn--") {
        idna.decode_unicode(label)
    } else {
        Ok(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_fails_with_unsupported_encoding() {
        let idna = UnavailableIdna;
        assert!(!idna.is_available());
        assert!(matches!(
            idna.encode_ascii("食狮"),
            Err(PslError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            idna.decode_unicode("xn--85x722f"),
            Err(PslError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_ascii_text_skips_converter() {
        let idna = UnavailableIdna;
        assert_eq!(domain_to_ascii(&idna, "example.com").unwrap(), "example.com");
        assert_eq!(domain_to_ascii(&idna, "*.ck").unwrap(), "*.ck");
        assert_eq!(label_to_unicode(&idna, "com").unwrap(), "com");
    }

    #[test]
    fn test_non_ascii_text_requires_converter() {
        let idna = UnavailableIdna;
        assert!(domain_to_ascii(&idna, "bücher").is_err());
        assert!(label_to_unicode(&idna, "xn--bcher-kva").is_err());
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_uts46_round_trip() {
        let idna = Uts46Idna;
        assert!(idna.is_available());
        assert_eq!(idna.encode_ascii("bücher").unwrap(), "xn--bcher-kva");
        assert_eq!(idna.decode_unicode("xn--bcher-kva").unwrap(), "bücher");
        assert_eq!(domain_to_ascii(&idna, "食狮").unwrap(), "xn--85x722f");
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_uts46_maps_unicode_full_stops() {
        let idna = Uts46Idna;
        assert_eq!(
            domain_to_ascii(&idna, "bücher。com").unwrap(),
            "xn--bcher-kva.com"
        );
        assert_eq!(domain_to_ascii(&idna, "a．bücher｡de").unwrap(), "a.xn--bcher-kva.de");
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_uts46_digit_label_is_not_an_address() {
        let idna = Uts46Idna;
        assert_eq!(
            domain_to_ascii(&idna, "１.bücher.com").unwrap(),
            "1.xn--bcher-kva.com"
        );
        assert_eq!(idna.encode_ascii("１").unwrap(), "1");
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_default_idna_is_available() {
        assert!(default_idna().is_available());
    }
}
