//! Dotted key resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::OverlayError;

/// Separator between key path segments.
pub const SEGMENT_DELIMITER: char = '.';

/// A non-empty sequence of non-empty segments addressing a location in a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Split a dotted key (`"a.b.c"`) into its segments.
    pub fn resolve(key: &str) -> Result<Self, OverlayError> {
        if key.is_empty() {
            return Err(OverlayError::MalformedKey {
                key: key.to_string(),
                reason: "key is empty",
            });
        }

        let segments: Vec<String> = key.split(SEGMENT_DELIMITER).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(OverlayError::MalformedKey {
                key: key.to_string(),
                reason: "key contains an empty segment",
            });
        }

        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// All segments but the last one.
    pub fn parents(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// The final segment; always present.
    pub fn leaf(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: construction rejects empty keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEGMENT_DELIMITER)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

/// Shorthand for [`KeyPath::resolve`].
pub fn resolve(key: &str) -> Result<KeyPath, OverlayError> {
    KeyPath::resolve(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_segments() {
        let path = resolve("a.b.c").unwrap();
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(path.parents(), ["a", "b"]);
        assert_eq!(path.leaf(), "c");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_resolve_single_segment() {
        let path = resolve("nats").unwrap();
        assert_eq!(path.segments(), ["nats"]);
        assert!(path.parents().is_empty());
    }

    #[test]
    fn test_malformed_keys_rejected() {
        for key in ["", "a..b", ".a", "a.", "."] {
            let err = resolve(key).unwrap_err();
            assert!(
                matches!(err, OverlayError::MalformedKey { .. }),
                "expected MalformedKey for {:?}, got {:?}",
                key,
                err
            );
            assert_eq!(err.path(), key);
        }
    }

    #[test]
    fn test_display_round_trips() {
        let path: KeyPath = "cc.db.max_connections".parse().unwrap();
        assert_eq!(path.to_string(), "cc.db.max_connections");
    }
}
