//! # Entity Keys
//!
//! A key identifies a stored document: entity kind plus an id that is either
//! a store-allocated integer or a caller-chosen name, with an optional parent
//! key forming an ancestor chain. Keys travel over the wire in an opaque
//! URL-safe ("websafe") encoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::errors::{DatastoreError, DatastoreResult};

/// Identifier part of a key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyId {
    /// Store-allocated integer id
    Int(i64),
    /// Caller-chosen name id
    Name(String),
}

/// A fully qualified entity key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    kind: String,
    id: KeyId,
    parent: Option<Box<Key>>,
}

impl Key {
    /// Key with an integer id and no parent
    pub fn with_id(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id: KeyId::Int(id),
            parent: None,
        }
    }

    /// Key with a name id and no parent
    pub fn with_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: KeyId::Name(name.into()),
            parent: None,
        }
    }

    /// Attaches a parent, fixing this key into the parent's ancestor chain
    pub fn under(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Entity kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Identifier part
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    /// Integer id, if this key has one
    pub fn int_id(&self) -> Option<i64> {
        match self.id {
            KeyId::Int(id) => Some(id),
            KeyId::Name(_) => None,
        }
    }

    /// Name id, if this key has one
    pub fn name(&self) -> Option<&str> {
        match &self.id {
            KeyId::Int(_) => None,
            KeyId::Name(name) => Some(name),
        }
    }

    /// Parent key, if any
    pub fn parent(&self) -> Option<&Key> {
        self.parent.as_deref()
    }

    /// True when `ancestor` appears anywhere in this key's parent chain
    pub fn has_ancestor(&self, ancestor: &Key) -> bool {
        let mut current = self.parent();
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = key.parent();
        }
        false
    }

    /// Opaque URL-safe encoding of the full key path
    pub fn websafe(&self) -> String {
        let mut segments = Vec::new();
        self.collect_segments(&mut segments);
        URL_SAFE_NO_PAD.encode(segments.join("\n"))
    }

    fn collect_segments(&self, segments: &mut Vec<String>) {
        if let Some(parent) = self.parent() {
            parent.collect_segments(segments);
        }
        let id = match &self.id {
            KeyId::Int(id) => format!("i{}", id),
            KeyId::Name(name) => format!("n{}", name),
        };
        segments.push(format!("{}\t{}", self.kind, id));
    }

    /// Decodes a websafe key string
    pub fn from_websafe(encoded: &str) -> DatastoreResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| DatastoreError::InvalidKey(encoded.to_string()))?;
        let path = String::from_utf8(bytes)
            .map_err(|_| DatastoreError::InvalidKey(encoded.to_string()))?;

        let mut key: Option<Key> = None;
        for segment in path.split('\n') {
            let (kind, id_part) = segment
                .split_once('\t')
                .ok_or_else(|| DatastoreError::InvalidKey(encoded.to_string()))?;
            let id = if let Some(digits) = id_part.strip_prefix('i') {
                KeyId::Int(
                    digits
                        .parse()
                        .map_err(|_| DatastoreError::InvalidKey(encoded.to_string()))?,
                )
            } else if let Some(name) = id_part.strip_prefix('n').filter(|n| !n.is_empty()) {
                KeyId::Name(name.to_string())
            } else {
                return Err(DatastoreError::InvalidKey(encoded.to_string()));
            };
            key = Some(Key {
                kind: kind.to_string(),
                id,
                parent: key.map(Box::new),
            });
        }
        key.ok_or_else(|| DatastoreError::InvalidKey(encoded.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websafe_round_trip() {
        let profile = Key::with_name("Profile", "alice@example.com");
        let conference = Key::with_id("Conference", 42).under(profile.clone());

        let decoded = Key::from_websafe(&conference.websafe()).unwrap();
        assert_eq!(decoded, conference);
        assert_eq!(decoded.parent(), Some(&profile));
        assert_eq!(decoded.int_id(), Some(42));
    }

    #[test]
    fn test_websafe_is_url_safe() {
        let key = Key::with_name("Profile", "user+tag@example.com");
        let encoded = key.websafe();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_invalid_websafe_rejected() {
        assert!(Key::from_websafe("not base64 at all!").is_err());
        assert!(Key::from_websafe("").is_err());
        // Valid base64 that decodes to a malformed path
        let garbage = URL_SAFE_NO_PAD.encode("no-separator");
        assert!(Key::from_websafe(&garbage).is_err());
    }

    #[test]
    fn test_has_ancestor() {
        let profile = Key::with_name("Profile", "bob@example.com");
        let conference = Key::with_id("Conference", 1).under(profile.clone());
        let session = Key::with_id("Session", 7).under(conference.clone());

        assert!(session.has_ancestor(&conference));
        assert!(session.has_ancestor(&profile));
        assert!(conference.has_ancestor(&profile));
        assert!(!profile.has_ancestor(&conference));
        assert!(!conference.has_ancestor(&session));
    }

    #[test]
    fn test_parent_fixed_at_creation() {
        let parent = Key::with_name("Profile", "a@b.c");
        let child = Key::with_id("Conference", 9).under(parent.clone());
        assert_eq!(child.parent(), Some(&parent));
        assert_eq!(child.kind(), "Conference");
    }
}
