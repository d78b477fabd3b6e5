//! Local TOTP manager.
//!
//! Enrollments live in a JSON array on disk ([`Store`]); codes are computed on
//! demand from an enrollment and a unix timestamp ([`generate`]).

pub mod enrollment;
pub mod error;
pub mod generator;
pub mod render;
pub mod store;

pub use enrollment::{DEFAULT_ALGORITHM, DEFAULT_DIGITS, DEFAULT_PERIOD, Enrollment};
pub use error::{Error, Result};
pub use generator::{GeneratedResult, generate, hotp, now_unix};
pub use store::{Store, default_store_path};

use std::io::Write;

pub fn add_enrollment(store: &Store, enrollment: Enrollment) -> Result<()> {
    store.add(enrollment)
}

/// Returns the removed enrollment.
pub fn delete_enrollment(store: &Store, index: i64) -> Result<Enrollment> {
    store.delete(index)
}

/// Codes for every enrollment at `now`, in store order.
///
/// Any read, decode or generation error aborts the whole listing.
pub fn list_and_generate(store: &Store, now: u64) -> Result<Vec<GeneratedResult>> {
    store
        .list()?
        .iter()
        .map(|enrollment| generate(enrollment, now))
        .collect()
}

/// [`list_and_generate`] rendered as a table. Nothing is written on error.
pub fn print_listing<W: Write>(store: &Store, now: u64, out: &mut W) -> Result<()> {
    let results = list_and_generate(store, now)?;
    render::render_table(out, &results).map_err(|e| Error::io("<output>", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn list_and_generate_in_store_order() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("config.json"));
        add_enrollment(&store, Enrollment::new("A", "a", RFC_SECRET)).unwrap();
        add_enrollment(&store, Enrollment::new("B", "b", "GEZDGNBVGY3TQOJQ")).unwrap();

        let results = list_and_generate(&store, 59).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].issuer, "A");
        assert_eq!(results[0].code, "287082");
        assert_eq!(results[0].remaining, 1);
        assert_eq!(results[1].issuer, "B");
        assert_eq!(results[1].code.len(), 6);
    }

    #[test]
    fn one_bad_record_aborts_listing() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("config.json"));
        let good = Enrollment::new("A", "a", RFC_SECRET);
        let mut bad = Enrollment::new("B", "b", RFC_SECRET);
        bad.secret = "not-base32!".to_string();
        store.save(&[good, bad]).unwrap();

        assert!(matches!(
            list_and_generate(&store, 0),
            Err(Error::InvalidSecret)
        ));

        let mut out = Vec::new();
        assert!(print_listing(&store, 0, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn listing_missing_store_propagates_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("config.json"));
        assert!(matches!(
            list_and_generate(&store, 0),
            Err(Error::StoreNotFound(_))
        ));
    }

    #[test]
    fn delete_then_list() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("config.json"));
        for name in ["A", "B", "C"] {
            add_enrollment(&store, Enrollment::new(name, "", RFC_SECRET)).unwrap();
        }
        let removed = delete_enrollment(&store, 1).unwrap();
        assert_eq!(removed.issuer, "B");

        let mut out = Vec::new();
        print_listing(&store, 59, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0 ") && lines[1].contains('A'));
        assert!(lines[2].starts_with("1 ") && lines[2].contains('C'));
    }
}
