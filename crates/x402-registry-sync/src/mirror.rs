//! Mirror-node REST client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, SyncError};
use crate::messages::{MessagePage, MirrorPage, PageRequest};
use crate::transport::LogSource;

/// The ledger network whose mirror node is queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    /// `mainnet` selects mainnet; any other name selects testnet.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("mainnet") {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }

    pub fn mirror_base_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
            Network::Testnet => "https://testnet.mirrornode.hedera.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}

/// [`LogSource`] backed by the mirror node's topic messages API.
pub struct MirrorNodeClient {
    client: Client,
    base_url: String,
}

impl MirrorNodeClient {
    /// Client for a network's public mirror node.
    pub fn new(network: Network, request_timeout: Duration) -> Result<Self> {
        Self::with_base_url(network.mirror_base_url(), request_timeout)
    }

    /// Client for a mirror node at an arbitrary base URL.
    pub fn with_base_url(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| SyncError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &PageRequest) -> String {
        match request {
            PageRequest::First { topic, order, limit } => format!(
                "{}/api/v1/topics/{}/messages?order={}&limit={}",
                self.base_url, topic, order, limit
            ),
            // `links.next` is a path relative to the mirror node root.
            PageRequest::Next(cursor) => format!("{}{}", self.base_url, cursor.as_str()),
        }
    }
}

#[async_trait]
impl LogSource for MirrorNodeClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<MessagePage> {
        let url = self.url_for(request);
        tracing::trace!(url = %url, "fetching topic messages");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                SyncError::Request(format!("cannot connect to {}", self.base_url))
            } else {
                SyncError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let page: MirrorPage = response
            .json()
            .await
            .map_err(|e| SyncError::MalformedResponse(e.to_string()))?;

        Ok(page.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Order, PageCursor};
    use x402_registry_core::TopicId;

    #[test]
    fn test_network_selection() {
        assert_eq!(Network::from_name("mainnet"), Network::Mainnet);
        assert_eq!(Network::from_name("MAINNET"), Network::Mainnet);
        assert_eq!(Network::from_name("testnet"), Network::Testnet);
        assert_eq!(Network::from_name("previewnet"), Network::Testnet);
        assert_eq!(Network::from_name(""), Network::Testnet);
    }

    #[test]
    fn test_page_urls() {
        let client =
            MirrorNodeClient::with_base_url("https://mirror.example.com/", Duration::from_secs(5)).unwrap();
        let topic = TopicId::parse("0.0.42").unwrap();

        assert_eq!(
            client.url_for(&PageRequest::first(topic, Order::Desc, 1)),
            "https://mirror.example.com/api/v1/topics/0.0.42/messages?order=desc&limit=1"
        );
        assert_eq!(
            client.url_for(&PageRequest::Next(PageCursor::new(
                "/api/v1/topics/0.0.42/messages?limit=100&sequencenumber=gt:100"
            ))),
            "https://mirror.example.com/api/v1/topics/0.0.42/messages?limit=100&sequencenumber=gt:100"
        );
    }
}
