use std::path::Path;

use thiserror::Error;

/// Rejection reasons for client-supplied filenames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("Filename cannot contain null bytes")]
    NullByte,
    #[error("Filename cannot contain path separators")]
    PathSeparator,
    #[error("Filename cannot be '.' or '..'")]
    SpecialDirectory,
    #[error("Invalid filename")]
    Invalid,
}

/// Validate that a client-supplied name is a single, plain path segment.
///
/// Names come verbatim from upload forms and URL paths, so anything that
/// could escape the upload directory is rejected before it reaches a
/// filesystem call.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains('\0') {
        return Err(NameError::NullByte);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(NameError::PathSeparator);
    }
    if name == "." || name == ".." {
        return Err(NameError::SpecialDirectory);
    }

    // Path::file_name must see the whole name unchanged; anything the OS
    // would normalize away is not a plain file name
    match Path::new(name).file_name().and_then(|n| n.to_str()) {
        Some(file_name) if file_name == name => Ok(()),
        _ => Err(NameError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("file.txt").is_ok());
        assert!(validate_name("my-report_2024.pdf").is_ok());
        assert!(validate_name("no_extension").is_ok());
        assert!(validate_name(".hidden").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_name(""), Err(NameError::Empty));
    }

    #[test]
    fn test_path_separators() {
        assert_eq!(
            validate_name("path/to/file.txt"),
            Err(NameError::PathSeparator)
        );
        assert_eq!(
            validate_name("path\\to\\file.txt"),
            Err(NameError::PathSeparator)
        );
        assert_eq!(validate_name("/file.txt"), Err(NameError::PathSeparator));
        assert_eq!(validate_name("file.txt/"), Err(NameError::PathSeparator));
    }

    #[test]
    fn test_traversal_attempts() {
        assert_eq!(validate_name(".."), Err(NameError::SpecialDirectory));
        assert_eq!(validate_name("."), Err(NameError::SpecialDirectory));
        assert_eq!(
            validate_name("../../etc/passwd"),
            Err(NameError::PathSeparator)
        );
        assert_eq!(
            validate_name("..\\secret.txt"),
            Err(NameError::PathSeparator)
        );
    }

    #[test]
    fn test_null_byte() {
        assert_eq!(validate_name("file\0.txt"), Err(NameError::NullByte));
    }
}
