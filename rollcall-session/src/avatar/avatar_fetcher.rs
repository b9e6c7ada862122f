use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Downloads avatar images.
#[async_trait]
pub trait AvatarFetcher: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// Fetches avatars over HTTP(S).
#[derive(Clone, Default)]
pub struct HttpAvatarFetcher {
    client: reqwest::Client,
}

impl HttpAvatarFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AvatarFetcher for HttpAvatarFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}
