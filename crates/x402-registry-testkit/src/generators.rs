//! Proptest generators for property-based testing.

use proptest::prelude::*;

use x402_registry_core::{DirectoryEntry, HttpMethod, TopicId, UsdcAmount};

/// Generate an entry id of valid length.
pub fn entry_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9_-]{2,20}".prop_map(String::from)
}

/// Generate a topic id.
pub fn topic_id() -> impl Strategy<Value = TopicId> {
    (0u32..3, 0u32..3, 1u64..10_000_000).prop_map(|(shard, realm, num)| {
        TopicId::parse(&format!("{}.{}.{}", shard, realm, num)).unwrap_or_else(|e| panic!("{}", e))
    })
}

/// Generate a price up to 1000 USDC.
pub fn usdc_amount() -> impl Strategy<Value = UsdcAmount> {
    (0u64..=1_000_000_000).prop_map(UsdcAmount::from_micros)
}

/// Generate an HTTP method.
pub fn http_method() -> impl Strategy<Value = HttpMethod> {
    prop::sample::select(HttpMethod::ALL.to_vec())
}

/// Generate a valid directory entry with the given id.
pub fn entry_for(id: String) -> impl Strategy<Value = DirectoryEntry> {
    (http_method(), "[ -~]{0,80}", topic_id(), usdc_amount()).prop_map(
        move |(method, description, pointer_topic_id, initial_price_usdc)| DirectoryEntry {
            url: format!("https://api.example.com/{}", id),
            id: id.clone(),
            method,
            description,
            pointer_topic_id,
            initial_price_usdc,
        },
    )
}

/// Generate a valid directory entry.
pub fn directory_entry() -> impl Strategy<Value = DirectoryEntry> {
    entry_id().prop_flat_map(entry_for)
}

/// Generate a directory log: entries drawn from a small id pool so ids
/// repeat, in append order.
pub fn directory_log(max_len: usize) -> impl Strategy<Value = Vec<DirectoryEntry>> {
    prop::collection::vec(entry_id(), 1..6).prop_flat_map(move |ids| {
        let pool = prop::sample::select(ids);
        prop::collection::vec(pool.prop_flat_map(entry_for), 0..=max_len)
    })
}
