//! Domain Validation (§4.7): input domains are checked before any
//! network call, and the "base domain" (used for filesystem layout)
//! strips a leading wildcard label.
use crate::error::{AcmeError, Result};

/// Validates a domain string per §4.7:
/// - non-empty after the validation walk
/// - the first character is not `.`
/// - `*` appears only as a leading wildcard label (`*.` at position 0)
/// - every remaining character is an ASCII letter, digit, `.`, `-`, or `_`
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(AcmeError::input("domain must not be empty"));
    }
    if domain.starts_with('.') {
        return Err(AcmeError::input("domain must not start with '.'"));
    }

    let rest = if let Some(stripped) = domain.strip_prefix("*.") {
        stripped
    } else {
        domain
    };

    if rest.is_empty() {
        return Err(AcmeError::input("domain must not be empty"));
    }

    for c in rest.chars() {
        if c == '*' {
            return Err(AcmeError::input(format!(
                "'*' may only appear as a leading wildcard label in '{domain}'"
            )));
        }
        if !(c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_') {
            return Err(AcmeError::input(format!(
                "invalid character '{c}' in domain '{domain}'"
            )));
        }
    }

    Ok(())
}

/// The "base domain" used for directory layout: strips a leading `*.`
/// wildcard label, if present.
pub fn base_domain(domain: &str) -> &str {
    domain.strip_prefix("*.").unwrap_or(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// P5: validator acceptance/rejection set.
    #[test]
    fn p5_accepts_valid_domains() {
        assert!(validate_domain("example.com").is_ok());
        assert!(validate_domain("*.example.com").is_ok());
        assert!(validate_domain("a.b-c_d.example").is_ok());
    }

    #[test]
    fn p5_rejects_invalid_domains() {
        assert!(validate_domain(".example.com").is_err());
        assert!(validate_domain("foo.*.com").is_err());
        assert!(validate_domain("a*b.com").is_err());
        assert!(validate_domain("fo o.com").is_err());
        assert!(validate_domain("").is_err());
    }

    #[test]
    fn base_domain_strips_leading_wildcard_only() {
        assert_eq!(base_domain("*.example.com"), "example.com");
        assert_eq!(base_domain("example.com"), "example.com");
    }

    #[test]
    fn bare_wildcard_label_is_rejected_as_empty() {
        assert!(validate_domain("*.").is_err());
    }
}
