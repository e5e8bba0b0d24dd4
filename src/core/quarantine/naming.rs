//! Quarantine file naming.
//!
//! Every quarantined file is named `<tag>_<MARKER>_<original name>`:
//! - `tag` is five hex digits of an xxh3 digest of the two paths involved
//! - `MARKER` is `KEPT` for the copy of the surviving file and `GONE` for
//!   the file that was moved out of the way
//! - the original base name follows unchanged
//!
//! The name alone is enough to undo the move; no other record is kept.

use regex::bytes::Regex;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::OnceLock;
use xxhash_rust::xxh3::xxh3_64;

/// Default quarantine directory name, created under the run root
pub const DEFAULT_QUARANTINE_DIR: &str = "duplicates";

/// Number of hex digits in a pair tag
pub const PAIR_TAG_LEN: usize = 5;

/// Which side of a resolved pair a quarantined file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    Kept,
    Discarded,
}

impl Disposition {
    pub fn marker(&self) -> &'static str {
        match self {
            Disposition::Kept => "KEPT",
            Disposition::Discarded => "GONE",
        }
    }

    fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "KEPT" => Some(Disposition::Kept),
            "GONE" => Some(Disposition::Discarded),
            _ => None,
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Kept => write!(f, "kept"),
            Disposition::Discarded => write!(f, "discarded"),
        }
    }
}

/// Short digest identifying a resolved pair.
///
/// `incoming` is the newly observed file and `existing` the indexed file it
/// matched. Collisions only matter between pairs resolved in the same run.
pub fn pair_tag(incoming: &Path, existing: &Path) -> String {
    let mut joined = incoming.as_os_str().as_encoded_bytes().to_vec();
    joined.extend_from_slice(existing.as_os_str().as_encoded_bytes());

    let digest = xxh3_64(&joined);
    format!("{:05x}", digest >> (64 - 4 * PAIR_TAG_LEN))
}

/// Build the quarantine file name for a file
pub fn quarantine_file_name(tag: &str, disposition: Disposition, original: &Path) -> Option<OsString> {
    let base = original.file_name()?;
    let mut name = OsString::from(format!("{}_{}_", tag, disposition.marker()));
    name.push(base);
    Some(name)
}

/// A parsed quarantine entry name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantineName {
    pub tag: String,
    pub disposition: Disposition,
    /// Base name the file is restored under, byte-for-byte
    pub original: OsString,
}

impl QuarantineName {
    /// Parse an entry name; `None` if it does not follow the naming scheme.
    ///
    /// Matching works on the raw name, so originals that are not valid
    /// UTF-8 come back unchanged.
    pub fn parse(name: &OsStr) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"(?s-u)^([0-9a-f]{5})_(KEPT|GONE)_(.+)$")
                .expect("quarantine name pattern is valid")
        });

        let captures = pattern.captures(name.as_encoded_bytes())?;
        let marker = std::str::from_utf8(&captures[2]).ok()?;
        Some(Self {
            tag: String::from_utf8_lossy(&captures[1]).into_owned(),
            disposition: Disposition::from_marker(marker)?,
            original: os_string_from_bytes(&captures[3])?,
        })
    }
}

#[cfg(unix)]
fn os_string_from_bytes(bytes: &[u8]) -> Option<OsString> {
    use std::os::unix::ffi::OsStrExt;
    Some(OsStr::from_bytes(bytes).to_os_string())
}

#[cfg(not(unix))]
fn os_string_from_bytes(bytes: &[u8]) -> Option<OsString> {
    std::str::from_utf8(bytes).ok().map(OsString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_tag_is_stable_and_short() {
        let a = Path::new("/photos/a.jpg");
        let b = Path::new("/photos/b.jpg");

        let tag = pair_tag(a, b);
        assert_eq!(tag.len(), PAIR_TAG_LEN);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(tag, pair_tag(a, b));
    }

    #[test]
    fn pair_tag_differs_between_pairs() {
        let a = Path::new("/photos/a.jpg");
        let b = Path::new("/photos/b.jpg");
        let c = Path::new("/photos/c.jpg");

        assert_ne!(pair_tag(a, b), pair_tag(a, c));
    }

    #[test]
    fn builds_name_from_base_name() {
        let name =
            quarantine_file_name("0a1b2", Disposition::Discarded, Path::new("/photos/IMG_1.jpg"))
                .unwrap();
        assert_eq!(name, OsString::from("0a1b2_GONE_IMG_1.jpg"));
    }

    #[test]
    fn name_without_base_is_rejected() {
        assert!(quarantine_file_name("0a1b2", Disposition::Kept, Path::new("/")).is_none());
    }

    #[test]
    fn parse_recovers_parts() {
        let parsed = QuarantineName::parse(OsStr::new("0a1b2_KEPT_IMG_1.jpg")).unwrap();
        assert_eq!(parsed.tag, "0a1b2");
        assert_eq!(parsed.disposition, Disposition::Kept);
        assert_eq!(parsed.original, OsString::from("IMG_1.jpg"));
    }

    #[test]
    fn parse_rejects_foreign_names() {
        assert!(QuarantineName::parse(OsStr::new("holiday.jpg")).is_none());
        assert!(QuarantineName::parse(OsStr::new("0a1b2_LOST_a.jpg")).is_none());
        assert!(QuarantineName::parse(OsStr::new("0a1b2_GONE_")).is_none());
        assert!(QuarantineName::parse(OsStr::new("XYZ12_GONE_a.jpg")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn parse_keeps_non_utf8_original() {
        use std::os::unix::ffi::OsStrExt;

        let original = OsStr::from_bytes(b"caf\xe9.jpg");
        let name = quarantine_file_name("0a1b2", Disposition::Discarded, Path::new(original))
            .unwrap();

        let parsed = QuarantineName::parse(&name).unwrap();
        assert_eq!(parsed.disposition, Disposition::Discarded);
        assert_eq!(parsed.original.as_os_str(), original);
    }
}
