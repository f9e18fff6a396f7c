//! Blob name generation.
//!
//! Every upload is stored under `{YYYYMMDD}_{HHMMSS}_{8 hex}{.ext}`. The
//! timestamp has second granularity, so uniqueness within a second rests on
//! the random suffix.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Number of hex characters taken from a v4 UUID for the random suffix
pub const SHORT_ID_LEN: usize = 8;

/// Timestamp layout used as the blob name prefix
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Strategy for generating blob keys
pub trait BlobKeyStrategy: Send + Sync {
    /// Generate the storage key for an uploaded file
    fn object_key(&self, now: DateTime<Utc>, original_filename: &str) -> String;
}

/// Default key strategy: `timestamp_shortid.ext`
#[derive(Debug, Clone, Default)]
pub struct TimestampKeyStrategy;

impl BlobKeyStrategy for TimestampKeyStrategy {
    fn object_key(&self, now: DateTime<Utc>, original_filename: &str) -> String {
        let short_id = short_id();
        let extension = extension_of(original_filename).unwrap_or_default();

        format!("{}_{}{}", now.format(TIMESTAMP_FORMAT), short_id, extension)
    }
}

/// First [`SHORT_ID_LEN`] hex characters of a fresh v4 UUID
pub fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Extension of `filename`, from the last `.` onward, including the dot.
///
/// Only the final path component is inspected, so `C:\fakepath\scan.png`
/// yields `.png`. Dotfiles (`.env`) and names ending in a dot have none.
pub fn extension_of(filename: &str) -> Option<&str> {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    match base.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 == base.len() => None,
        Some(idx) => Some(&base[idx..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 22).unwrap()
    }

    fn is_short_id(s: &str) -> bool {
        s.len() == SHORT_ID_LEN && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn key_has_timestamp_id_and_extension() {
        let key = TimestampKeyStrategy.object_key(fixed_now(), "report.pdf");

        assert!(key.starts_with("20240115_143022_"), "{key}");
        assert!(key.ends_with(".pdf"), "{key}");

        let id = &key["20240115_143022_".len()..key.len() - ".pdf".len()];
        assert!(is_short_id(id), "{id}");
    }

    #[test]
    fn key_without_extension_has_no_suffix() {
        let key = TimestampKeyStrategy.object_key(fixed_now(), "README");

        assert_eq!(key.len(), "20240115_143022_".len() + SHORT_ID_LEN);
        assert!(!key.contains('.'));
    }

    #[test]
    fn keys_in_the_same_second_differ() {
        let now = fixed_now();
        let a = TimestampKeyStrategy.object_key(now, "scan.png");
        let b = TimestampKeyStrategy.object_key(now, "scan.png");
        assert_ne!(a, b);
    }

    #[test]
    fn extension_takes_last_dot() {
        assert_eq!(extension_of("archive.tar.gz"), Some(".gz"));
        assert_eq!(extension_of("report.PDF"), Some(".PDF"));
        assert_eq!(extension_of("x.y"), Some(".y"));
    }

    #[test]
    fn extension_ignores_directories() {
        assert_eq!(extension_of("C:\\fakepath\\scan.png"), Some(".png"));
        assert_eq!(extension_of("some.dir/notes"), None);
    }

    #[test]
    fn extension_absent_cases() {
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of(".env"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of(""), None);
    }

    #[test]
    fn short_id_is_lowercase_hex() {
        assert!(is_short_id(&short_id()));
    }
}
