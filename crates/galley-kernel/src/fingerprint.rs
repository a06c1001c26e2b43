//! Compact identity keys for arbitrary-length text.
//!
//! A fingerprint is the pair (normalized length, FNV-1a 32-bit hash),
//! rendered as `"{len}:{hash:08x}"`. The length acts as a cheap second
//! discriminant: unrelated short strings that collide on the hash almost
//! never collide on length too. This is an integrity check against
//! pipeline bugs, not an adversarial setting, so 32 bits are enough.
//!
//! The placement step computes the same fingerprint over the text it
//! commits; the wire format below is the shared contract between the two
//! sides.

use crate::normalize::normalize;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Rendering of the [`Fingerprint::Empty`] value.
const EMPTY_RENDERING: &str = "empty";

/// FNV-1a over a byte slice, 32-bit variant.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Identity key of one unit of text, derived from its normalized form.
///
/// `Empty` is the distinguished value for text that normalizes to
/// nothing: an intentionally blanked paragraph is a legitimate state,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fingerprint {
    Empty,
    Text { len: usize, hash: u32 },
}

impl Fingerprint {
    pub fn is_empty(self) -> bool {
        self == Fingerprint::Empty
    }
}

/// Fingerprint raw text: normalize, then hash.
pub fn fingerprint(raw: &str) -> Fingerprint {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        Fingerprint::Empty
    } else {
        Fingerprint::Text {
            len: normalized.chars().count(),
            hash: fnv1a_32(normalized.as_bytes()),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Empty => f.write_str(EMPTY_RENDERING),
            Fingerprint::Text { len, hash } => write!(f, "{len}:{hash:08x}"),
        }
    }
}

/// A fingerprint string that does not follow the wire format.
///
/// Raised while loading the placement log, so this is an input-contract
/// failure, never a verification finding.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("malformed fingerprint `{input}`: {reason}")]
pub struct FingerprintParseError {
    pub input: String,
    pub reason: String,
}

impl FingerprintParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == EMPTY_RENDERING {
            return Ok(Fingerprint::Empty);
        }
        let (len_part, hash_part) = s
            .split_once(':')
            .ok_or_else(|| FingerprintParseError::new(s, "expected `{len}:{hash}` or `empty`"))?;
        let len: usize = len_part
            .parse()
            .map_err(|_| FingerprintParseError::new(s, "length is not a decimal integer"))?;
        if len == 0 {
            return Err(FingerprintParseError::new(
                s,
                "zero length is reserved for `empty`",
            ));
        }
        let hash = u32::from_str_radix(hash_part, 16)
            .map_err(|_| FingerprintParseError::new(s, "hash is not 32-bit hex"))?;
        Ok(Fingerprint::Text { len, hash })
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_reference_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn deterministic() {
        assert_eq!(fingerprint("Hello world."), fingerprint("Hello world."));
    }

    #[test]
    fn normalization_feeds_identity() {
        assert_eq!(fingerprint("Hello, WORLD"), fingerprint("hello world"));
        assert_eq!(fingerprint("<b>Hello</b> world"), fingerprint("Hello world"));
        assert_eq!(fingerprint("Äußerst"), fingerprint("ausserst"));
    }

    #[test]
    fn empty_after_normalization_is_empty_value() {
        assert_eq!(fingerprint(""), Fingerprint::Empty);
        assert_eq!(fingerprint("  ?! \n"), Fingerprint::Empty);
        assert!(fingerprint("---").is_empty());
    }

    #[test]
    fn rendering_format() {
        // normalize("Hello world.") == "hello world", 11 chars
        let fp = fingerprint("Hello world.");
        let rendered = fp.to_string();
        let (len, hash) = rendered.split_once(':').expect("len:hash form");
        assert_eq!(len, "11");
        assert_eq!(hash.len(), 8);
        assert_eq!(hash, format!("{:08x}", fnv1a_32(b"hello world")));
    }

    #[test]
    fn display_parse_round_trip() {
        for raw in ["Hello world.", "a; b; c;", ""] {
            let fp = fingerprint(raw);
            let parsed: Fingerprint = fp.to_string().parse().expect("round trip");
            assert_eq!(parsed, fp);
        }
    }

    #[test]
    fn parse_rejects_malformed_inputs() {
        assert!("".parse::<Fingerprint>().is_err());
        assert!("11".parse::<Fingerprint>().is_err());
        assert!("x:abcd1234".parse::<Fingerprint>().is_err());
        assert!("11:zzzz".parse::<Fingerprint>().is_err());
        assert!("0:00000000".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn serde_round_trip_as_string() {
        let fp = fingerprint("Hello world.");
        let json = serde_json::to_string(&fp).expect("serialize");
        assert_eq!(json, format!("\"{fp}\""));
        let back: Fingerprint = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, fp);
    }
}
