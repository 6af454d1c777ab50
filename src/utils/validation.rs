//! Centralized validation and helper functions.

use crate::core::types::ParticipantId;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MAX_PARTICIPANT_ID_LENGTH: usize = 128;

/// Compute a fingerprint of a pairing run's inputs.
///
/// The fingerprint is the MD5 of the ordered participant ids followed by
/// every matrix entry in row-major order. Two runs on identical snapshots
/// produce the same fingerprint, which makes reproducibility checkable
/// without diffing tables.
#[must_use]
pub fn compute_fingerprint(ids: &[ParticipantId], entries: &[i64]) -> String {
    let ids: Vec<&str> = ids.iter().map(ParticipantId::as_str).collect();
    let entries: Vec<String> = entries.iter().map(i64::to_string).collect();
    let concatenated = format!("{}|{}", ids.join(","), entries.join(","));
    let digest = md5::compute(concatenated.as_bytes());
    format!("{digest:x}")
}

/// Check that a participant id is usable as a directory key.
///
/// Returns an error message describing the problem, None if the id is fine.
#[must_use]
pub fn check_participant_id(id: &str) -> Option<String> {
    if id.trim().is_empty() {
        Some("participant id is empty".to_string())
    } else if id.len() > MAX_PARTICIPANT_ID_LENGTH {
        Some(format!(
            "participant id exceeds {MAX_PARTICIPANT_ID_LENGTH} characters"
        ))
    } else if id.chars().any(|c| c.is_whitespace() || c == ',') {
        Some(format!("participant id '{id}' contains whitespace or a comma"))
    } else {
        None
    }
}

/// Filename validation error types
#[derive(Debug, thiserror::Error)]
pub enum FilenameError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Filename validation for archive names built from date keys
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `FilenameError::EmptyFilename` if the filename is empty,
/// `FilenameError::FilenameTooLong` if it exceeds the limit, or
/// `FilenameError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, FilenameError> {
    if filename.trim().is_empty() {
        return Err(FilenameError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(FilenameError::InvalidFilename);
    }

    // Check for null bytes and other dangerous characters
    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(FilenameError::InvalidFilename);
    }

    // Sanitize filename by keeping only safe characters
    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_')
        .collect::<String>();

    if sanitized.trim().is_empty() || sanitized.starts_with('.') {
        return Err(FilenameError::InvalidFilename);
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_fingerprint() {
        let ids = vec![ParticipantId::new("U1"), ParticipantId::new("U2")];
        let fp = compute_fingerprint(&ids, &[-10000, 3, 3, -10000]);
        assert_eq!(fp.len(), 32);

        // Same input should give same output
        assert_eq!(fp, compute_fingerprint(&ids, &[-10000, 3, 3, -10000]));

        // Order matters
        let reversed = vec![ParticipantId::new("U2"), ParticipantId::new("U1")];
        assert_ne!(fp, compute_fingerprint(&reversed, &[-10000, 3, 3, -10000]));
        assert_ne!(fp, compute_fingerprint(&ids, &[-10000, 4, 4, -10000]));
    }

    #[test]
    fn test_check_participant_id() {
        assert!(check_participant_id("U03UFPNSDT6").is_none());
        assert!(check_participant_id("").is_some());
        assert!(check_participant_id("   ").is_some());
        assert!(check_participant_id("a b").is_some());
        assert!(check_participant_id("a,b").is_some());
        assert!(check_participant_id(&"x".repeat(200)).is_some());
    }

    #[test]
    fn test_validate_filename_safe() {
        assert!(validate_filename("pairings_full05-01-23.json").is_ok());
        assert!(validate_filename("userdata.json").is_ok());
    }

    #[test]
    fn test_validate_filename_dangerous() {
        // Directory traversal attempts
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("..\\windows\\system32").is_err());
        assert!(validate_filename("pairings_full05/01/23.json").is_err());

        // Null bytes and control characters
        assert!(validate_filename("test\0.json").is_err());
        assert!(validate_filename("test\x01.json").is_err());

        let long_name = "a".repeat(300);
        assert!(validate_filename(&long_name).is_err());

        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
        assert!(validate_filename(".hidden").is_err());
    }

    #[test]
    fn test_validate_filename_sanitization() {
        let result = validate_filename("pairings full@2024.json").unwrap();
        assert_eq!(result, "pairingsfull2024.json");
    }
}
