//! Input validation for module records.

use crate::error::{Error, Result};

/// Validates that a module identity is a path the resolver can work with.
///
/// A bad identity means the extractor handed over something that is not a
/// file path at all, so the build stops instead of resolving against it.
pub fn validate_identity(identity: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(Error::InvalidIdentity {
            identity: identity.to_string(),
            reason: reason.to_string(),
        })
    };

    if identity.is_empty() {
        return reject("identity is empty");
    }

    if identity.contains('\0') {
        return reject("identity contains a NUL byte");
    }

    if identity.trim() != identity {
        return reject("identity has leading or trailing whitespace");
    }

    if identity.ends_with('/') {
        return reject("identity names a directory, not a file");
    }

    match identity.rsplit('/').next() {
        Some(".") | Some("..") | Some("") | None => reject("identity has no file name"),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identities() {
        assert!(validate_identity("/live/prod/vpc/terragrunt.hcl").is_ok());
        assert!(validate_identity("live/vpc/terragrunt.hcl").is_ok());
        assert!(validate_identity("X").is_ok());
    }

    #[test]
    fn test_empty_identity_rejected() {
        let result = validate_identity("");
        assert!(matches!(result, Err(Error::InvalidIdentity { .. })));
    }

    #[test]
    fn test_directory_identity_rejected() {
        assert!(validate_identity("/live/vpc/").is_err());
        assert!(validate_identity("/live/..").is_err());
        assert!(validate_identity(".").is_err());
        assert!(validate_identity("/").is_err());
    }

    #[test]
    fn test_whitespace_and_nul_rejected() {
        assert!(validate_identity(" /live/vpc/terragrunt.hcl").is_err());
        assert!(validate_identity("/live/vpc/terragrunt.hcl\n").is_err());
        assert!(validate_identity("/live/\0/terragrunt.hcl").is_err());
    }

    #[test]
    fn test_error_mentions_identity() {
        let err = validate_identity("/live/vpc/").unwrap_err();
        assert!(err.to_string().contains("/live/vpc/"));
    }
}
