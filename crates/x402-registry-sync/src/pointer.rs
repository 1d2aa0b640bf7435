//! Pointer topics: reading the authoritative pricing record and appending
//! the next version of it.
//!
//! ## Versioning Protocol
//!
//! ```text
//! read latest (desc, limit 1) -> next version = current + 1
//!   -> merge caller price/schemas -> validate -> append
//! ```
//!
//! Nothing is appended unless every earlier step succeeded. The protocol
//! is read-then-append with no compare-and-set on the log; callers that
//! need in-process exclusion hold a per-topic lease around
//! [`publish_price_update`].

use bytes::Bytes;
use serde_json::{Map, Value};
use x402_registry_core::{ObjectSchema, PointerMessage, TopicId, UsdcAmount, Validator};

use crate::config::{with_deadline, SyncConfig};
use crate::error::{Result, SyncError};
use crate::messages::{Order, PageRequest};
use crate::transport::{LogSource, Submitter};

/// Fetch the newest pricing record of a pointer topic.
///
/// An empty topic yields `None`. A latest message that is not a valid
/// pricing record is an error; there is no fallback to older messages.
pub async fn fetch_latest_pointer<L, V>(
    source: &L,
    validator: &V,
    topic: &TopicId,
    config: &SyncConfig,
) -> Result<Option<PointerMessage>>
where
    L: LogSource + ?Sized,
    V: Validator<Record = PointerMessage> + ?Sized,
{
    let request = PageRequest::first(topic.clone(), Order::Desc, 1);
    let page = with_deadline(
        "fetch latest pointer message",
        config.request_timeout,
        source.fetch_page(&request),
    )
    .await?;

    let Some(message) = page.messages.into_iter().next() else {
        tracing::debug!(topic = %topic, "pointer topic is empty");
        return Ok(None);
    };

    let malformed = |reason: String| SyncError::MalformedPointer {
        topic: topic.clone(),
        sequence_number: message.sequence_number,
        reason,
    };
    let raw = message.json().map_err(|e| malformed(e.to_string()))?;
    let record = validator
        .validate_strict(&raw)
        .map_err(|e| malformed(e.to_string()))?;

    Ok(Some(record))
}

/// A caller's request to change an endpoint's pricing record.
///
/// The price always replaces the current one. Schemas left `None` carry
/// over from the current record.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub price: UsdcAmount,
    pub request_schema: Option<ObjectSchema>,
    pub response_schema: Option<ObjectSchema>,
}

impl PriceUpdate {
    pub fn new(price: UsdcAmount) -> Self {
        Self {
            price,
            request_schema: None,
            response_schema: None,
        }
    }

    pub fn with_request_schema(mut self, schema: ObjectSchema) -> Self {
        self.request_schema = Some(schema);
        self
    }

    pub fn with_response_schema(mut self, schema: ObjectSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Take the schemas from a complete pricing record document.
    ///
    /// The document must itself be a valid record; its price and version
    /// are ignored.
    pub fn from_document<V>(price: UsdcAmount, validator: &V, raw: &Value) -> Result<Self>
    where
        V: Validator<Record = PointerMessage> + ?Sized,
    {
        let record = validator.validate_strict(raw)?;
        Ok(Self {
            price,
            request_schema: record.request_schema,
            response_schema: Some(record.response_schema),
        })
    }
}

/// Build and validate the record that must follow `current`.
pub fn next_record<V>(
    current: Option<&PointerMessage>,
    update: &PriceUpdate,
    validator: &V,
) -> Result<PointerMessage>
where
    V: Validator<Record = PointerMessage> + ?Sized,
{
    if update.price.is_zero() {
        return Err(SyncError::InvalidUpdate("price must be a positive number".into()));
    }
    let version = PointerMessage::next_version(current)
        .ok_or_else(|| SyncError::InvalidUpdate("version overflow".into()))?;

    let request_schema = update
        .request_schema
        .clone()
        .or_else(|| current.and_then(|c| c.request_schema.clone()));
    let response_schema = update
        .response_schema
        .clone()
        .or_else(|| current.map(|c| c.response_schema.clone()));

    // Validated as a document so a missing response schema is reported the
    // same way as in any other record.
    let mut doc = Map::new();
    doc.insert("price_usdc".into(), serde_json::to_value(update.price)?);
    doc.insert("version".into(), Value::from(version));
    if let Some(schema) = request_schema {
        doc.insert("request_schema".into(), serde_json::to_value(schema)?);
    }
    if let Some(schema) = response_schema {
        doc.insert("response_schema".into(), serde_json::to_value(schema)?);
    }

    Ok(validator.validate_strict(&Value::Object(doc))?)
}

/// Run the versioning protocol against a pointer topic.
///
/// Returns the record that was appended.
pub async fn publish_price_update<L, S, V>(
    source: &L,
    submitter: &S,
    validator: &V,
    topic: &TopicId,
    update: &PriceUpdate,
    config: &SyncConfig,
) -> Result<PointerMessage>
where
    L: LogSource + ?Sized,
    S: Submitter + ?Sized,
    V: Validator<Record = PointerMessage> + ?Sized,
{
    let current = fetch_latest_pointer(source, validator, topic, config).await?;
    let record = next_record(current.as_ref(), update, validator)?;
    let payload = Bytes::from(serde_json::to_vec(&record)?);

    with_deadline(
        "submit pointer message",
        config.request_timeout,
        submitter.submit(topic, payload),
    )
    .await?;

    tracing::info!(
        topic = %topic,
        version = record.version,
        price_usdc = %record.price_usdc,
        "appended pricing record"
    );
    Ok(record)
}
