//! Checksums for cleaned record sets.

use sha2::{Digest, Sha256};

use crate::core::domain::CleanRecord;

/// Calculate SHA-256 checksum of string content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint a cleaned record set.
///
/// Hashes the compact JSON encoding of the records in order. Two runs that
/// produce the same records produce the same fingerprint.
pub fn fingerprint_records(records: &[CleanRecord]) -> Result<String, serde_json::Error> {
    let encoded = serde_json::to_string(records)?;
    Ok(calculate_checksum(&encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::RawRecord;
    use crate::preprocessing::clean_records;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"test": "data"}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_different_content_different_checksum() {
        assert_ne!(calculate_checksum("data1"), calculate_checksum("data2"));
    }

    #[test]
    fn test_fingerprint_tracks_record_content() {
        let first = clean_records(&[RawRecord::new(Some("u1"), Some(1), Some("a@x.com"), None)]).unwrap();
        let same = clean_records(&[RawRecord::new(Some("u1"), Some(1), Some("a@x.com"), None)]).unwrap();
        let other = clean_records(&[RawRecord::new(Some("u1"), Some(1), Some("b@x.com"), None)]).unwrap();

        assert_eq!(fingerprint_records(&first).unwrap(), fingerprint_records(&same).unwrap());
        assert_ne!(fingerprint_records(&first).unwrap(), fingerprint_records(&other).unwrap());
    }
}
