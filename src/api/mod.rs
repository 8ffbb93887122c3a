//! A core module for interacting with the Gelbooru API.
//!
//! Usually, you prefer to use the [`Gelbooru`] struct to get the [`crate::data`] from the Gelbooru API,
//! or [`blocking::Gelbooru`] if you don't want to run an async runtime.
//!
//! Each operation sends exactly one GET request, and never retries it.

pub mod blocking;
mod query;
pub mod transport;

use reqwest::Client;

pub use query::{Order, OrderBy, PostLookup, PostSearch, TagLookup, TagSearch};
pub use transport::{BlockingTransport, Transport};

use crate::config::Config;
use crate::data::{Comment, Post, Tag};
use crate::download::DownloadTarget;
use crate::error::{Result, TransportError};
use crate::mapper;
use query::Endpoint;

/// The non-blocking Gelbooru client.
///
/// It owns one connection pool, released when the client is dropped or [`Self::close`]d.
/// The client holds no other state, so it can be shared by any number of concurrent tasks.
///
/// # Example
///
/// ```no_run
/// use gelbooru_api::api::{Gelbooru, PostSearch};
///
/// #[tokio::main]
/// async fn main() -> gelbooru_api::Result<()> {
///     let client = Gelbooru::new()?;
///
///     let posts = client
///         .search_posts(&PostSearch::new(["cat"]).exclude(["dog"]).limit(10))
///         .await?;
///     for post in &posts {
///         let comments = client.get_post_comments(post).await?;
///         println!("{post}: {} comment(s)", comments.len());
///     }
///
///     client.close();
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Gelbooru<T = Client> {
    transport: T,
    endpoint: Endpoint,
}

impl Gelbooru<Client> {
    /// A client for <https://gelbooru.com> without credentials, see [`Config::default`].
    ///
    /// # Errors
    ///
    /// If the HTTP client cannot be built, this function will return an error.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// A client built from `config`.
    ///
    /// # Errors
    ///
    /// If `config` is invalid, e.g. it has an api key without a user id,
    /// this function will return [`crate::Error::Validation`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = Endpoint::new(config)?;
        let transport = config.build_client().map_err(TransportError::from)?;
        Ok(Self {
            transport,
            endpoint,
        })
    }
}

impl<T: Transport> Gelbooru<T> {
    /// A client sending its requests through `transport`.
    ///
    /// The timeout and user agent of `config` are the business of `transport`.
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

    /// The underlying transport, e.g. to pass to [`Post::download`].
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the connection pool.
    #[inline]
    pub fn close(self) {
        drop(self)
    }

    /// Search posts by tags.
    ///
    /// # Errors
    ///
    /// If `search` asks for more than [`crate::error::POSTS_HARD_LIMIT`] posts,
    /// this function will return [`crate::Error::LimitExceeded`] without sending anything.
    /// Otherwise it fails if the request fails or the response can't be mapped.
    pub async fn search_posts(&self, search: &PostSearch) -> Result<Vec<Post>> {
        let url = self.endpoint.search_posts(search)?;
        let body = self.transport.get_text(url).await?;
        Ok(mapper::posts(&body)?)
    }

    /// Get a single post, `None` if there is no such post.
    ///
    /// When looking up by MD5, a post with another hash counts as not found.
    ///
    /// # Errors
    ///
    /// If the request fails or the response can't be mapped.
    pub async fn get_post(&self, lookup: &PostLookup) -> Result<Option<Post>> {
        let url = self.endpoint.get_post(lookup);
        let body = self.transport.get_text(url).await?;
        Ok(lookup.pick(mapper::posts(&body)?))
    }

    /// Get the comments of `post`, in the order the API returns them.
    ///
    /// # Errors
    ///
    /// If the request fails or the response can't be mapped.
    pub async fn get_post_comments(&self, post: &Post) -> Result<Vec<Comment>> {
        self.get_comments(post.id).await
    }

    /// Get the comments of the post with id `post_id`. See [`Self::get_post_comments`].
    ///
    /// # Errors
    ///
    /// If the request fails or the response can't be mapped.
    pub async fn get_comments(&self, post_id: u64) -> Result<Vec<Comment>> {
        let url = self.endpoint.get_post_comments(post_id);
        let body = self.transport.get_text(url).await?;
        Ok(mapper::comments(&body)?)
    }

    /// Search tags.
    ///
    /// # Errors
    ///
    /// If `search` combines parameters the API rejects,
    /// this function will return [`crate::Error::Validation`] without sending anything.
    /// Otherwise it fails if the request fails or the response can't be mapped.
    pub async fn search_tags(&self, search: &TagSearch) -> Result<Vec<Tag>> {
        let url = self.endpoint.search_tags(search)?;
        let body = self.transport.get_text(url).await?;
        Ok(mapper::tags(&body)?)
    }

    /// Get a single tag, `None` if there is no such tag.
    ///
    /// # Errors
    ///
    /// If the request fails or the response can't be mapped.
    pub async fn get_tag(&self, lookup: &TagLookup) -> Result<Option<Tag>> {
        let url = self.endpoint.get_tag(lookup);
        let body = self.transport.get_text(url).await?;
        Ok(mapper::tags(&body)?.into_iter().next())
    }

    /// Download the file of `post` with this client's transport. See [`Post::download`].
    ///
    /// # Errors
    ///
    /// Same as [`Post::download`].
    pub async fn download(
        &self,
        post: &Post,
        target: DownloadTarget<'_>,
    ) -> Result<Option<std::path::PathBuf>> {
        post.download(&self.transport, target).await
    }
}
