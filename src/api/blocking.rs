//! The blocking Gelbooru client.
//!
//! Same operations as [`super::Gelbooru`], each one holding the calling thread
//! until its response is mapped.
//!
//! <div class="warning">
//!
//! Like [`reqwest::blocking`], this client must not be created, used or dropped
//! inside an async runtime.
//!
//! </div>

use reqwest::blocking::Client;

use super::query::Endpoint;
use super::{BlockingTransport, PostLookup, PostSearch, TagLookup, TagSearch};
use crate::config::Config;
use crate::data::{Comment, Post, Tag};
use crate::download::DownloadTarget;
use crate::error::{Result, TransportError};
use crate::mapper;

/// The blocking Gelbooru client.
///
/// # Example
///
/// ```no_run
/// use gelbooru_api::api::blocking::Gelbooru;
/// use gelbooru_api::api::TagLookup;
///
/// let client = Gelbooru::new()?;
/// if let Some(tag) = client.get_tag(&TagLookup::Name("touhou".into()))? {
///     println!("{tag} has {} posts", tag.count);
/// }
/// # Ok::<(), gelbooru_api::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Gelbooru<T = Client> {
    transport: T,
    endpoint: Endpoint,
}

impl Gelbooru<Client> {
    /// See [`super::Gelbooru::new`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be built, this function will return an error.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// See [`super::Gelbooru::from_config`].
    ///
    /// # Errors
    ///
    /// If `config` is invalid, this function will return [`crate::Error::Validation`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = Endpoint::new(config)?;
        let transport = config
            .build_blocking_client()
            .map_err(TransportError::from)?;
        Ok(Self {
            transport,
            endpoint,
        })
    }
}

impl<T: BlockingTransport> Gelbooru<T> {
    /// See [`super::Gelbooru::with_transport`].
    ///
    /// # Errors
    ///
    /// If `config` is invalid, this function will return [`crate::Error::Validation`].
    pub fn with_transport(transport: T, config: &Config) -> Result<Self> {
        Ok(Self {
            transport,
            endpoint: Endpoint::new(config)?,
        })
    }

    /// The underlying transport, e.g. to pass to [`Post::download_blocking`].
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the connection pool.
    #[inline]
    pub fn close(self) {
        drop(self)
    }

    /// See [`super::Gelbooru::search_posts`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::search_posts`].
    pub fn search_posts(&self, search: &PostSearch) -> Result<Vec<Post>> {
        let url = self.endpoint.search_posts(search)?;
        let body = self.transport.get_text(url)?;
        Ok(mapper::posts(&body)?)
    }

    /// See [`super::Gelbooru::get_post`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::get_post`].
    pub fn get_post(&self, lookup: &PostLookup) -> Result<Option<Post>> {
        let url = self.endpoint.get_post(lookup);
        let body = self.transport.get_text(url)?;
        Ok(lookup.pick(mapper::posts(&body)?))
    }

    /// See [`super::Gelbooru::get_post_comments`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::get_post_comments`].
    pub fn get_post_comments(&self, post: &Post) -> Result<Vec<Comment>> {
        self.get_comments(post.id)
    }

    /// See [`super::Gelbooru::get_comments`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::get_comments`].
    pub fn get_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let url = self.endpoint.get_post_comments(post_id);
        let body = self.transport.get_text(url)?;
        Ok(mapper::comments(&body)?)
    }

    /// See [`super::Gelbooru::search_tags`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::search_tags`].
    pub fn search_tags(&self, search: &TagSearch) -> Result<Vec<Tag>> {
        let url = self.endpoint.search_tags(search)?;
        let body = self.transport.get_text(url)?;
        Ok(mapper::tags(&body)?)
    }

    /// See [`super::Gelbooru::get_tag`].
    ///
    /// # Errors
    ///
    /// See [`super::Gelbooru::get_tag`].
    pub fn get_tag(&self, lookup: &TagLookup) -> Result<Option<Tag>> {
        let url = self.endpoint.get_tag(lookup);
        let body = self.transport.get_text(url)?;
        Ok(mapper::tags(&body)?.into_iter().next())
    }

    /// See [`Post::download_blocking`].
    ///
    /// # Errors
    ///
    /// See [`Post::download_blocking`].
    pub fn download(
        &self,
        post: &Post,
        target: DownloadTarget<'_>,
    ) -> Result<Option<std::path::PathBuf>> {
        post.download_blocking(&self.transport, target)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::transport::fake::FakeTransport;
    use crate::data::fixtures::sample_post_json;
    use crate::error::Error;

    fn client(transport: FakeTransport) -> Gelbooru<FakeTransport> {
        Gelbooru::with_transport(transport, &Config::default()).unwrap()
    }

    #[test]
    fn test_blocking_operations() {
        let posts = json!({ "post": [sample_post_json()] }).to_string();
        let tags = json!({
            "tag": {"id": 1, "name": "highres", "count": 10, "type": 5, "ambiguous": "0"}
        })
        .to_string();
        let client = client(
            FakeTransport::new()
                .respond("post", posts)
                .respond("tag", tags)
                .respond("comment", r#"<comments type="array"/>"#),
        );

        let found = client.search_posts(&PostSearch::new(["cat"])).unwrap();
        assert_eq!(found.len(), 1);

        let post = client.get_post(&PostLookup::Id(1234)).unwrap().unwrap();
        assert!(client.get_post_comments(&post).unwrap().is_empty());

        let tag = client.get_tag(&TagLookup::Name("highres".into())).unwrap().unwrap();
        assert!(tag.is_meta());
        assert_eq!(client.search_tags(&TagSearch::new()).unwrap(), [tag]);

        assert_eq!(client.transport().requests().len(), 5);
    }

    #[test]
    fn test_blocking_validation_sends_nothing() {
        let client = client(FakeTransport::new());

        let err = client
            .search_posts(&PostSearch::new(["cat"]).limit(5000))
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { limit: 5000 }));

        let err = client
            .search_tags(&TagSearch::new().order_by("random"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(client.transport().requests().is_empty());
    }
}
