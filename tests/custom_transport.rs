use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use gelbooru_api::api::{blocking, BlockingTransport, Gelbooru, PostSearch, TagLookup, Transport};
use gelbooru_api::config::Config;
use gelbooru_api::download::DownloadTarget;
use gelbooru_api::error::TransportError;

const POSTS: &str = r#"{"@attributes":{"limit":1,"offset":0,"count":1},"post":[{
    "id": 7, "created_at": "Mon Jan 02 03:04:05 +0000 2023", "score": 3,
    "width": 10, "height": 20, "md5": "0123456789abcdef0123456789abcdef",
    "directory": "01/23", "image": "0123456789abcdef0123456789abcdef.png",
    "rating": "general", "source": "", "change": 1, "owner": "someone", "creator_id": 5,
    "parent_id": 0, "sample": 0, "preview_height": 10, "preview_width": 5,
    "tags": "cat solo", "title": "", "has_notes": "false", "has_comments": "false",
    "file_url": "https://img3.gelbooru.com/images/01/23/0123456789abcdef0123456789abcdef.png",
    "preview_url": "", "sample_url": "", "sample_height": 0, "sample_width": 0,
    "status": "active", "post_locked": 0, "has_children": "false"
}]}"#;

/// Answers every API call with a canned body, and every download with `FILE`.
struct Canned;

const FILE: &[u8] = b"\x89PNG";

impl Canned {
    fn body(url: &Url) -> Result<String, TransportError> {
        let selector = url.query_pairs().find(|(k, _)| k == "s").map(|(_, v)| v.into_owned());
        match selector.as_deref() {
            Some("post") => Ok(POSTS.to_owned()),
            Some("tag") => Ok(r#"{"@attributes":{"limit":1,"offset":0,"count":0}}"#.to_owned()),
            _ => Err(TransportError::Status(reqwest::StatusCode::NOT_FOUND)),
        }
    }
}

#[async_trait]
impl Transport for Canned {
    async fn get_text(&self, url: Url) -> Result<String, TransportError> {
        Self::body(&url)
    }

    async fn get_bytes(&self, _url: Url) -> Result<Bytes, TransportError> {
        Ok(Bytes::from_static(FILE))
    }
}

impl BlockingTransport for Canned {
    fn get_text(&self, url: Url) -> Result<String, TransportError> {
        Self::body(&url)
    }

    fn get_bytes(&self, _url: Url) -> Result<Bytes, TransportError> {
        Ok(Bytes::from_static(FILE))
    }
}

#[tokio::test]
async fn async_client_with_custom_transport() -> anyhow::Result<()> {
    let client = Gelbooru::with_transport(Canned, &Config::default())?;

    let posts = client.search_posts(&PostSearch::new(["cat"])).await?;
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.tags, ["cat", "solo"]);
    assert_eq!(post.extension(), Some("png"));

    assert!(client.get_tag(&TagLookup::Name("nothing".into())).await?.is_none());

    let err = client.get_comments(post.id).await.unwrap_err();
    assert!(matches!(
        err,
        gelbooru_api::Error::Transport(TransportError::Status(reqwest::StatusCode::NOT_FOUND))
    ));

    let temp_dir = tempfile::tempdir()?;
    let path = client
        .download(post, DownloadTarget::Path(temp_dir.path().join("cat")))
        .await?
        .expect("a path target returns the written path");
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("cat.png"));
    assert_eq!(std::fs::read(&path)?, FILE);

    client.close();
    Ok(())
}

#[test]
fn blocking_client_with_custom_transport() -> anyhow::Result<()> {
    let client = blocking::Gelbooru::with_transport(Canned, &Config::default())?;

    let posts = client.search_posts(&PostSearch::new(["cat"]))?;
    assert_eq!(posts[0].id, 7);

    let mut sink: Vec<u8> = Vec::new();
    let written = client.download(&posts[0], DownloadTarget::Writer(&mut sink))?;
    assert!(written.is_none());
    assert_eq!(sink, FILE);
    Ok(())
}
