//! Download the file of a [`Post`].
//!
//! [`Post::download`] and [`Post::download_blocking`] resolve the destination the same way,
//! fetch the whole file, then write it. They only differ in how they wait for the fetch.

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;

use log::debug;
use reqwest::Url;

use crate::api::transport::{BlockingTransport, Transport};
use crate::data::Post;
use crate::error::{Error, MappingError, Result};
use crate::tool::{bare_file_name, WithDefaultExtension};

/// Where to write a downloaded file.
pub enum DownloadTarget<'a> {
    /// [`Post::file_name`] in the current directory.
    FileName,
    /// This path. If it has no extension, the one of the post's file is appended.
    Path(PathBuf),
    /// This byte sink.
    Writer(&'a mut (dyn Write + Send)),
}

impl<'a> DownloadTarget<'a> {
    /// Build a target from optional arguments. With neither, the target is [`Self::FileName`].
    ///
    /// # Errors
    ///
    /// If both are given, this function will return [`Error::Validation`].
    pub fn new(path: Option<PathBuf>, writer: Option<&'a mut (dyn Write + Send)>) -> Result<Self> {
        match (path, writer) {
            (Some(_), Some(_)) => Err(Error::validation(
                "only one of path and writer may be provided",
            )),
            (Some(path), None) => Ok(Self::Path(path)),
            (None, Some(writer)) => Ok(Self::Writer(writer)),
            (None, None) => Ok(Self::FileName),
        }
    }
}

impl std::fmt::Debug for DownloadTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileName => f.write_str("FileName"),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// A target with its path resolved.
enum Sink<'a> {
    File(PathBuf),
    Writer(&'a mut (dyn Write + Send)),
}

impl Post {
    fn parsed_file_url(&self) -> Result<Url, MappingError> {
        Url::parse(&self.file_url).map_err(|_| MappingError::InvalidField {
            field: "file_url",
            value: self.file_url.clone(),
        })
    }

    /// Resolve `target` and check the file URL, before anything is fetched.
    fn prepare<'a>(&self, target: DownloadTarget<'a>) -> Result<(Url, Sink<'a>)> {
        let url = self.parsed_file_url()?;
        let extension = self.extension().map(OsStr::new);
        let sink = match target {
            DownloadTarget::FileName => {
                let file_name =
                    bare_file_name(&self.file_name).ok_or_else(|| MappingError::InvalidField {
                        field: "image",
                        value: self.file_name.clone(),
                    })?;
                Sink::File(PathBuf::from(file_name))
            }
            DownloadTarget::Path(path) => Sink::File(path.with_default_extension(extension)),
            DownloadTarget::Writer(writer) => Sink::Writer(writer),
        };
        Ok((url, sink))
    }

    /// Download the file of this post with a non-blocking transport.
    ///
    /// Returns the path written to, or `None` when writing to a [`DownloadTarget::Writer`].
    ///
    /// # Errors
    ///
    /// If the file URL is malformed, the request fails, or the destination can't be written,
    /// this function will return an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gelbooru_api::api::{Gelbooru, PostLookup};
    /// use gelbooru_api::download::DownloadTarget;
    ///
    /// # async fn run() -> gelbooru_api::Result<()> {
    /// let client = Gelbooru::new()?;
    /// if let Some(post) = client.get_post(&PostLookup::Id(1)).await? {
    ///     post.download(client.transport(), DownloadTarget::Path("first".into())).await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download<T>(
        &self,
        transport: &T,
        target: DownloadTarget<'_>,
    ) -> Result<Option<PathBuf>>
    where
        T: Transport + ?Sized,
    {
        let (url, sink) = self.prepare(target)?;
        debug!("downloading post {} from {url}", self.id);
        let bytes = transport.get_bytes(url).await?;
        match sink {
            Sink::File(path) => {
                tokio::fs::write(&path, &bytes).await?;
                Ok(Some(path))
            }
            Sink::Writer(writer) => {
                writer.write_all(&bytes)?;
                writer.flush()?;
                Ok(None)
            }
        }
    }

    /// Download the file of this post with a blocking transport. See [`Self::download`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::download`].
    pub fn download_blocking<T>(
        &self,
        transport: &T,
        target: DownloadTarget<'_>,
    ) -> Result<Option<PathBuf>>
    where
        T: BlockingTransport + ?Sized,
    {
        let (url, sink) = self.prepare(target)?;
        debug!("downloading post {} from {url}", self.id);
        let bytes = transport.get_bytes(url)?;
        match sink {
            Sink::File(path) => {
                std::fs::write(&path, &bytes)?;
                Ok(Some(path))
            }
            Sink::Writer(writer) => {
                writer.write_all(&bytes)?;
                writer.flush()?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::fake::FakeTransport;
    use crate::data::fixtures::{sample_post_json, MD5};

    const CONTENT: &[u8] = b"The quick brown fox jumps over the lazy dog";

    fn post() -> Post {
        Post::from_json(sample_post_json()).unwrap()
    }

    #[test]
    fn test_target_both_is_invalid() {
        let mut sink: Vec<u8> = Vec::new();
        let err = DownloadTarget::new(Some("a.png".into()), Some(&mut sink)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(matches!(
            DownloadTarget::new(None, None).unwrap(),
            DownloadTarget::FileName
        ));
    }

    #[tokio::test]
    async fn test_download_to_path_adds_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new().serve_file(CONTENT);

        let path = post()
            .download(&transport, DownloadTarget::Path(temp_dir.path().join("saved")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path, temp_dir.path().join("saved.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), CONTENT);
        assert_eq!(transport.requests()[0].as_str(), post().file_url);

        temp_dir.close().unwrap();
    }

    #[tokio::test]
    async fn test_download_to_writer() {
        let transport = FakeTransport::new().serve_file(CONTENT);
        let mut sink: Vec<u8> = Vec::new();
        let written = post()
            .download(&transport, DownloadTarget::Writer(&mut sink))
            .await
            .unwrap();
        assert_eq!(written, None);
        assert_eq!(sink, CONTENT);
    }

    #[test]
    fn test_blocking_matches_async() {
        let temp_dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new().serve_file(CONTENT);

        let blocking_path = post()
            .download_blocking(&transport, DownloadTarget::Path(temp_dir.path().join("b.bin")))
            .unwrap()
            .unwrap();

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let async_target = DownloadTarget::Path(temp_dir.path().join("a.bin"));
        let async_path = runtime
            .block_on(post().download(&transport, async_target))
            .unwrap()
            .unwrap();

        // an explicit extension is kept
        assert_eq!(blocking_path.extension().unwrap(), "bin");
        assert_eq!(
            std::fs::read(blocking_path).unwrap(),
            std::fs::read(async_path).unwrap()
        );

        temp_dir.close().unwrap();
    }

    #[test]
    fn test_default_target_uses_file_name() {
        let mut post = post();
        post.file_name = format!("../../{MD5}.jpg");
        let (_, sink) = post.prepare(DownloadTarget::FileName).unwrap();
        match sink {
            Sink::File(path) => assert_eq!(path, PathBuf::from(format!("{MD5}.jpg"))),
            Sink::Writer(_) => panic!("expected a file"),
        }
    }

    #[test]
    fn test_bad_file_url_fails_before_fetch() {
        let transport = FakeTransport::new().serve_file(CONTENT);
        let mut post = post();
        post.file_url = "not a url".into();
        let mut sink: Vec<u8> = Vec::new();
        let err = post
            .download_blocking(&transport, DownloadTarget::Writer(&mut sink))
            .unwrap_err();
        assert!(matches!(err, Error::Mapping(MappingError::InvalidField { .. })));
        assert!(transport.requests().is_empty());
    }
}
