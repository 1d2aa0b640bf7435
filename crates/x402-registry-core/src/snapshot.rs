//! Snapshot: the reduced, ordered view of a directory topic.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::entry::DirectoryEntry;

/// Current directory entries, at most one per id, in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Vec<DirectoryEntry>,
}

impl Snapshot {
    /// Build a snapshot from reduced entries.
    ///
    /// Entries are ordered by byte-wise comparison of `id`. Ids are expected
    /// to be unique already; the sort is stable either way.
    pub fn from_entries(mut entries: Vec<DirectoryEntry>) -> Self {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Self { entries }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DirectoryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&DirectoryEntry> {
        self.entries
            .binary_search_by(|e| e.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Deterministic digest of the snapshot contents.
    ///
    /// Two snapshots have equal digests iff their canonical JSON encodings
    /// are identical.
    pub fn digest(&self) -> SnapshotDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"x402-snapshot-v0:");
        for entry in &self.entries {
            // Serializing plain data to JSON cannot fail.
            let bytes = serde_json::to_vec(entry).unwrap_or_default();
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(&bytes);
        }
        SnapshotDigest(*hasher.finalize().as_bytes())
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DirectoryEntry>::deserialize(deserializer).map(Self::from_entries)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a DirectoryEntry;
    type IntoIter = std::slice::Iter<'a, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A 32-byte Blake3 digest of a [`Snapshot`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotDigest(pub [u8; 32]);

impl SnapshotDigest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SnapshotDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnapshotDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for SnapshotDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::HttpMethod;
    use crate::types::TopicId;
    use crate::UsdcAmount;

    fn entry(id: &str) -> DirectoryEntry {
        DirectoryEntry {
            id: id.into(),
            url: format!("https://{}.example.com", id),
            method: HttpMethod::Get,
            description: String::new(),
            pointer_topic_id: TopicId::parse("0.0.1").unwrap(),
            initial_price_usdc: UsdcAmount::from_micros(1),
        }
    }

    #[test]
    fn test_sorted_by_id() {
        let snapshot = Snapshot::from_entries(vec![entry("bbb"), entry("aaa"), entry("ccc")]);
        let ids: Vec<_> = snapshot.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["aaa", "bbb", "ccc"]);
        assert_eq!(snapshot.get("bbb").unwrap().id, "bbb");
        assert!(snapshot.get("zzz").is_none());
    }

    #[test]
    fn test_digest_deterministic() {
        let a = Snapshot::from_entries(vec![entry("bbb"), entry("aaa")]);
        let b = Snapshot::from_entries(vec![entry("aaa"), entry("bbb")]);
        assert_eq!(a.digest(), b.digest());

        let c = Snapshot::from_entries(vec![entry("aaa")]);
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().to_hex().len(), 64);
    }

    #[test]
    fn test_serializes_as_array() {
        let snapshot = Snapshot::from_entries(vec![entry("aaa")]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.is_array());
    }

    #[test]
    fn test_deserialize_restores_order() {
        let json = serde_json::to_value(vec![entry("ccc"), entry("bbb"), entry("aaa")]).unwrap();
        let snapshot: Snapshot = serde_json::from_value(json).unwrap();

        let ids: Vec<_> = snapshot.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["aaa", "bbb", "ccc"]);
        assert_eq!(snapshot.get("aaa").unwrap().id, "aaa");
        assert_eq!(snapshot, Snapshot::from_entries(vec![entry("aaa"), entry("bbb"), entry("ccc")]));
    }
}
