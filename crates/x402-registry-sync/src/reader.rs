//! Page reader: walks a topic from the first message to the last.

use x402_registry_core::{LogMessage, TopicId};

use crate::config::{with_deadline, SyncConfig};
use crate::error::{Result, SyncError};
use crate::messages::{Order, PageCursor, PageRequest};
use crate::transport::LogSource;

enum Position {
    Start,
    Next(PageCursor),
    Done,
}

/// Lazy, ascending reader over every message of one topic.
///
/// Each page is fetched under the configured request deadline. A failed
/// page ends the read; nothing read so far should be treated as complete.
pub struct PageReader<'a, L: LogSource + ?Sized> {
    source: &'a L,
    topic: TopicId,
    config: &'a SyncConfig,
    position: Position,
    pages: usize,
}

impl<'a, L: LogSource + ?Sized> PageReader<'a, L> {
    pub fn new(source: &'a L, topic: TopicId, config: &'a SyncConfig) -> Self {
        Self {
            source,
            topic,
            config,
            position: Position::Start,
            pages: 0,
        }
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page, or `None` once the topic is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<LogMessage>>> {
        let request = match &self.position {
            Position::Start => PageRequest::first(self.topic.clone(), Order::Asc, self.config.page_limit),
            Position::Next(cursor) => PageRequest::Next(cursor.clone()),
            Position::Done => return Ok(None),
        };

        let page = with_deadline(
            "fetch directory page",
            self.config.request_timeout,
            self.source.fetch_page(&request),
        )
        .await?;
        self.pages += 1;

        self.position = match page.next {
            Some(next) => {
                if matches!(&request, PageRequest::Next(prev) if *prev == next) {
                    return Err(SyncError::MalformedResponse(format!(
                        "page cursor did not advance: {}",
                        next.as_str()
                    )));
                }
                Position::Next(next)
            }
            None => Position::Done,
        };

        tracing::trace!(
            topic = %self.topic,
            page = self.pages,
            messages = page.messages.len(),
            "read page"
        );
        Ok(Some(page.messages))
    }

    /// Read every remaining message.
    pub async fn read_all(mut self) -> Result<Vec<LogMessage>> {
        let mut all = Vec::new();
        while let Some(messages) = self.next_page().await? {
            all.extend(messages);
        }
        Ok(all)
    }
}
