//! Reducer and presenter: decoded entries to an ordered snapshot.
//!
//! For each id the entry with the greatest sequence number wins, wherever
//! it appears in the input. Presentation orders the survivors by id.

use std::collections::HashMap;

use x402_registry_core::{DirectoryEntry, Snapshot};

/// Last-writer-wins accumulator keyed by entry id.
#[derive(Debug, Default)]
pub struct Reducer {
    latest: HashMap<String, (u64, DirectoryEntry)>,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entry in. Returns true if it is now the current entry for its id.
    pub fn apply(&mut self, sequence_number: u64, entry: DirectoryEntry) -> bool {
        match self.latest.get(&entry.id) {
            Some((seq, _)) if *seq >= sequence_number => false,
            _ => {
                self.latest.insert(entry.id.clone(), (sequence_number, entry));
                true
            }
        }
    }

    /// Distinct ids seen so far.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Present the current entries as an id-ordered snapshot.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::from_entries(self.latest.into_values().map(|(_, entry)| entry).collect())
    }
}

/// Reduce `(sequence_number, entry)` pairs and present the result.
pub fn reduce<I>(entries: I) -> Snapshot
where
    I: IntoIterator<Item = (u64, DirectoryEntry)>,
{
    let mut reducer = Reducer::new();
    for (seq, entry) in entries {
        reducer.apply(seq, entry);
    }
    reducer.into_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use x402_registry_core::{HttpMethod, TopicId, UsdcAmount};

    fn entry(id: &str, micros: u64) -> DirectoryEntry {
        DirectoryEntry {
            id: id.into(),
            url: format!("https://example.com/{}", id),
            method: HttpMethod::Get,
            description: String::new(),
            pointer_topic_id: TopicId::parse("0.0.100").unwrap(),
            initial_price_usdc: UsdcAmount::from_micros(micros),
        }
    }

    #[test]
    fn test_latest_sequence_wins() {
        let snapshot = reduce(vec![
            (1, entry("aaa", 1)),
            (2, entry("bbb", 1)),
            (3, entry("aaa", 2)),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("aaa").unwrap().initial_price_usdc.micros(), 2);
    }

    #[test]
    fn test_out_of_order_delivery() {
        let snapshot = reduce(vec![(3, entry("aaa", 2)), (1, entry("aaa", 1))]);
        assert_eq!(snapshot.get("aaa").unwrap().initial_price_usdc.micros(), 2);
    }

    #[test]
    fn test_byte_wise_order() {
        let snapshot = reduce(vec![
            (1, entry("beta", 1)),
            (2, entry("Zeta", 1)),
            (3, entry("alpha", 1)),
        ]);
        let ids: Vec<_> = snapshot.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["Zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_apply_reports_retention() {
        let mut reducer = Reducer::new();
        assert!(reducer.apply(5, entry("aaa", 1)));
        assert!(!reducer.apply(4, entry("aaa", 2)));
        assert!(reducer.apply(6, entry("aaa", 3)));
        assert_eq!(reducer.len(), 1);
    }

    fn arb_stream() -> impl Strategy<Value = Vec<(u64, DirectoryEntry)>> {
        prop::collection::vec((0usize..5, 0u64..1_000), 0..40).prop_map(|picks| {
            picks
                .into_iter()
                .enumerate()
                .map(|(i, (id, micros))| ((i + 1) as u64, entry(&format!("id-{}", id), micros)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_permutation_invariant(stream in arb_stream(), seed in any::<u64>()) {
            let mut shuffled = stream.clone();
            // Deterministic shuffle from the seed.
            let n = shuffled.len();
            for i in (1..n).rev() {
                let j = (seed.wrapping_mul(i as u64 + 7) % (i as u64 + 1)) as usize;
                shuffled.swap(i, j);
            }
            prop_assert_eq!(reduce(stream), reduce(shuffled));
        }

        #[test]
        fn prop_one_entry_per_id_sorted(stream in arb_stream()) {
            let snapshot = reduce(stream.clone());
            let ids: Vec<_> = snapshot.iter().map(|e| e.id.clone()).collect();
            let mut expected = ids.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(&ids, &expected);

            for current in &snapshot {
                let max = stream
                    .iter()
                    .filter(|(_, e)| e.id == current.id)
                    .max_by_key(|(seq, _)| *seq)
                    .map(|(_, e)| e);
                prop_assert_eq!(Some(current), max);
            }
        }

        #[test]
        fn prop_duplicate_delivery_is_idempotent(stream in arb_stream()) {
            let mut doubled = stream.clone();
            doubled.extend(stream.iter().cloned());
            prop_assert_eq!(reduce(stream), reduce(doubled));
        }
    }
}
