//! Shared-secret persistence for the TOTP authority.
//!
//! The secret lives in a plain text file as a bare base32 string so that
//! authenticator apps enrolled against a previous run keep working across
//! restarts. A file that exists but does not decode is a fatal startup
//! condition: regenerating would silently invalidate every enrolled device.

use std::fs;
use std::path::Path;

use totp_rs::Secret;
use tracing::info;

use crate::authority::OtpError;

/// Load the base32 secret from `path`, or generate and persist a new one if
/// the file does not exist yet.
///
/// Returns `OtpError::CorruptSecret` if the file exists but its content is
/// not valid base32. Callers must treat that as fatal and abort startup.
pub fn load_or_create_secret(path: &Path) -> Result<String, OtpError> {
    if path.exists() {
        let raw = fs::read_to_string(path).map_err(|e| OtpError::SecretIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        let encoded = raw.trim().to_string();
        Secret::Encoded(encoded.clone())
            .to_bytes()
            .map_err(|e| OtpError::CorruptSecret {
                path: path.to_path_buf(),
                reason: format!("{:?}", e),
            })?;
        info!("Loaded OTP secret from {:?}", path);
        return Ok(encoded);
    }

    let encoded = match Secret::generate_secret().to_encoded() {
        Secret::Encoded(s) => s,
        // to_encoded always yields the Encoded variant
        Secret::Raw(_) => unreachable!(),
    };
    fs::write(path, &encoded).map_err(|e| OtpError::SecretIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("Generated new OTP secret and persisted it to {:?}", path);
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generates_and_persists_secret() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("otp_secret.txt");

        let secret = load_or_create_secret(&path).expect("Failed to create secret");
        assert!(path.exists(), "Secret file should be created");
        assert!(!secret.is_empty());

        // Content on disk is the bare base32 string
        let on_disk = fs::read_to_string(&path).expect("Failed to read secret file");
        assert_eq!(on_disk.trim(), secret);
    }

    #[test]
    fn test_reload_returns_same_secret() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("otp_secret.txt");

        let first = load_or_create_secret(&path).expect("Failed to create secret");
        let second = load_or_create_secret(&path).expect("Failed to reload secret");
        assert_eq!(first, second, "Reload must keep enrolled devices valid");
    }

    #[test]
    fn test_corrupt_secret_is_fatal() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("otp_secret.txt");
        fs::write(&path, "not valid base32 !!!").expect("Failed to write file");

        let err = load_or_create_secret(&path).expect_err("Corrupt secret must not be accepted");
        assert!(matches!(err, OtpError::CorruptSecret { .. }));
        // The corrupt file is left untouched for the operator to inspect
        assert_eq!(
            fs::read_to_string(&path).expect("Failed to read file"),
            "not valid base32 !!!"
        );
    }
}
