//! The HTTP collaborator.
//!
//! The façades only ever need "GET this URL, give me the body".
//! Both traits are implemented for the matching [`reqwest`] client,
//! and can be implemented for anything else that speaks HTTP.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use crate::error::TransportError;

/// A non-blocking HTTP GET.
///
/// Implementations must not retry: a failure is reported as is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: Url) -> Result<String, TransportError>;

    /// GET `url` and return the raw body.
    async fn get_bytes(&self, url: Url) -> Result<Bytes, TransportError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn get_text(&self, url: Url) -> Result<String, TransportError> {
        Ok(self.get(url).send().await?.error_for_status()?.text().await?)
    }

    async fn get_bytes(&self, url: Url) -> Result<Bytes, TransportError> {
        Ok(self.get(url).send().await?.error_for_status()?.bytes().await?)
    }
}

/// A blocking HTTP GET, see [`Transport`].
pub trait BlockingTransport {
    /// GET `url` and return the body as text.
    fn get_text(&self, url: Url) -> Result<String, TransportError>;

    /// GET `url` and return the raw body.
    fn get_bytes(&self, url: Url) -> Result<Bytes, TransportError>;
}

impl BlockingTransport for reqwest::blocking::Client {
    fn get_text(&self, url: Url) -> Result<String, TransportError> {
        Ok(self.get(url).send()?.error_for_status()?.text()?)
    }

    fn get_bytes(&self, url: Url) -> Result<Bytes, TransportError> {
        Ok(self.get(url).send()?.error_for_status()?.bytes()?)
    }
}
