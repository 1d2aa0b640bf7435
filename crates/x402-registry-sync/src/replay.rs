//! Directory replay: read, decode, reduce and present one directory topic.

use x402_registry_core::{DirectoryEntry, Snapshot, TopicId, Validator};

use crate::config::SyncConfig;
use crate::decoder::decode_entry;
use crate::error::Result;
use crate::reader::PageReader;
use crate::reducer::Reducer;
use crate::transport::LogSource;

/// Counters from one replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Pages fetched.
    pub pages: usize,
    /// Messages read across all pages.
    pub messages: usize,
    /// Messages decoded into valid entries.
    pub decoded: usize,
    /// Messages skipped as undecodable or invalid.
    pub skipped: usize,
    /// Entries in the resulting snapshot.
    pub entries: usize,
}

/// Replay a directory topic from its first message.
///
/// Pages are consumed as they arrive. Invalid messages are skipped with a
/// warning; a transport failure on any page fails the whole replay.
pub async fn replay_directory<L, V>(
    source: &L,
    validator: &V,
    topic: &TopicId,
    config: &SyncConfig,
) -> Result<(Snapshot, ReplayReport)>
where
    L: LogSource + ?Sized,
    V: Validator<Record = DirectoryEntry> + ?Sized,
{
    let mut reader = PageReader::new(source, topic.clone(), config);
    let mut reducer = Reducer::new();
    let mut report = ReplayReport::default();

    while let Some(messages) = reader.next_page().await? {
        report.messages += messages.len();
        for message in &messages {
            match decode_entry(validator, message) {
                Ok(entry) => {
                    report.decoded += 1;
                    reducer.apply(message.sequence_number, entry);
                }
                Err(skip) => {
                    report.skipped += 1;
                    tracing::warn!(topic = %topic, "skipping directory message: {}", skip);
                }
            }
        }
    }

    report.pages = reader.pages();
    let snapshot = reducer.into_snapshot();
    report.entries = snapshot.len();

    tracing::info!(
        topic = %topic,
        pages = report.pages,
        messages = report.messages,
        skipped = report.skipped,
        entries = report.entries,
        "replayed directory topic"
    );

    Ok((snapshot, report))
}
