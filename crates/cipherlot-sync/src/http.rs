use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use cipherlot_protocol::{endpoints, AppendRequest, ErrorBody};
use cipherlot_types::{Cid, FeedEntry, Timestamp};

use crate::error::{SyncError, SyncResult};
use crate::transport::NodeTransport;

/// Talks to a node's HTTP gateway.
///
/// Path segments are percent-encoded, so any valid author id round-trips.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Transport for the node at `base`, e.g. `http://127.0.0.1:8080`.
    pub fn new(base: &str) -> SyncResult<Self> {
        Self::with_client(Client::new(), base)
    }

    /// Like [`HttpTransport::new`] with a per-request timeout.
    pub fn with_timeout(base: &str, timeout: Duration) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to create HTTP client: {e}")))?;
        Self::with_client(client, base)
    }

    pub fn with_client(client: Client, base: &str) -> SyncResult<Self> {
        let base = Url::parse(base).map_err(|e| SyncError::InvalidEndpoint(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(SyncError::InvalidEndpoint(base.to_string()));
        }
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, collection: &str, key: &str) -> SyncResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .push(collection.trim_start_matches('/'))
            .push(key);
        Ok(url)
    }

    async fn send(&self, method: &str, url: &Url, request: RequestBuilder) -> SyncResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("{method} {url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(SyncError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn put(&self, collection: &str, id: &Cid, content_type: &str, payload: &[u8]) -> SyncResult<()> {
        let url = self.url(collection, &id.to_string())?;
        let request = self
            .client
            .put(url.clone())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload.to_vec());
        self.send("PUT", &url, request).await?;
        tracing::debug!(%url, bytes = payload.len(), "uploaded object");
        Ok(())
    }

    async fn get(&self, collection: &str, id: &Cid) -> SyncResult<Vec<u8>> {
        let url = self.url(collection, &id.to_string())?;
        let response = self.send("GET", &url, self.client.get(url.clone())).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base", &self.base.as_str())
            .finish()
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn put_blob(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
        self.put(endpoints::BLOBS, id, "application/octet-stream", payload)
            .await
    }

    async fn get_blob(&self, id: &Cid) -> SyncResult<Vec<u8>> {
        self.get(endpoints::BLOBS, id).await
    }

    async fn put_manifest(&self, id: &Cid, payload: &[u8]) -> SyncResult<()> {
        self.put(endpoints::MANIFESTS, id, "application/json", payload)
            .await
    }

    async fn get_manifest(&self, id: &Cid) -> SyncResult<Vec<u8>> {
        self.get(endpoints::MANIFESTS, id).await
    }

    async fn append_feed(&self, author: &str, entry: &FeedEntry) -> SyncResult<()> {
        let url = self.url(endpoints::FEEDS, author)?;
        let body = AppendRequest::new(&entry.cid, Some(entry.ts));
        let request = self.client.post(url.clone()).json(&body);
        self.send("POST", &url, request).await?;
        Ok(())
    }

    async fn read_feed(&self, author: &str, since: Option<Timestamp>) -> SyncResult<Vec<FeedEntry>> {
        let mut url = self.url(endpoints::FEEDS, author)?;
        if let Some(since) = since {
            url.query_pairs_mut()
                .append_pair("since", &since.as_secs().to_string());
        }
        let response = self.send("GET", &url, self.client.get(url.clone())).await?;
        response
            .json::<Vec<FeedEntry>>()
            .await
            .map_err(|e| SyncError::Decode(format!("feed of {author}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlot_types::Digest;

    fn cid() -> Cid {
        Cid::raw(Digest::from_hash([0; 32]))
    }

    #[test]
    fn urls_are_built_per_segment() {
        let transport = HttpTransport::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            transport.url(endpoints::BLOBS, &cid().to_string()).unwrap().as_str(),
            format!("http://127.0.0.1:8080/blobs/{}", cid())
        );
        assert_eq!(
            transport.url(endpoints::FEEDS, "bob").unwrap().as_str(),
            "http://127.0.0.1:8080/feeds/bob"
        );
    }

    #[test]
    fn base_path_and_trailing_slash_are_kept() {
        let transport = HttpTransport::new("http://node.example/api/").unwrap();
        assert_eq!(
            transport.url(endpoints::FEEDS, "bob").unwrap().as_str(),
            "http://node.example/api/feeds/bob"
        );
    }

    #[test]
    fn author_segments_are_encoded() {
        let transport = HttpTransport::new("http://node.example").unwrap();
        assert_eq!(
            transport.url(endpoints::FEEDS, "a b?c").unwrap().as_str(),
            "http://node.example/feeds/a%20b%3Fc"
        );
    }

    #[test]
    fn rejects_unusable_endpoints() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(SyncError::InvalidEndpoint(_))
        ));
        assert!(HttpTransport::new("mailto:bob@example.com").is_err());
        assert!(HttpTransport::new("ftp://node.example").is_err());
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_error() {
        let transport = HttpTransport::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            transport.read_feed("bob", None).await,
            Err(SyncError::Transport(_))
        ));
    }
}
