use std::fmt;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{de, ImageDimensions, RawData};
use crate::error::MappingError;

/// The content-safety classification of a post. Not to be confused with its score.
///
/// Both the current (`general`, `sensitive`, ...) and the legacy (`safe`, `s`, `q`, `e`)
/// spellings are understood.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Rating {
    /// `general`, formerly `safe`.
    General,
    /// `sensitive`.
    Sensitive,
    /// `questionable`.
    Questionable,
    /// `explicit`.
    Explicit,
    /// A rating this crate doesn't know about.
    Other(String),
}

impl Rating {
    /// The canonical API spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "general",
            Self::Sensitive => "sensitive",
            Self::Questionable => "questionable",
            Self::Explicit => "explicit",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Rating {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "general" | "g" | "safe" | "s" => Self::General,
            "sensitive" => Self::Sensitive,
            "questionable" | "q" => Self::Questionable,
            "explicit" | "e" => Self::Explicit,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The JSON fields of a post, before the renamed field pairs are reconciled.
///
/// Every other key is required, though most values may be `null`.
#[derive(Deserialize)]
struct PostFields {
    #[serde(deserialize_with = "de::int")]
    id: u64,
    #[serde(deserialize_with = "de::post_time")]
    created_at: DateTime<FixedOffset>,
    #[serde(deserialize_with = "de::int")]
    score: i64,
    #[serde(deserialize_with = "de::int")]
    width: u32,
    #[serde(deserialize_with = "de::int")]
    height: u32,
    // the post search endpoint says `md5`, older responses say `hash`
    #[serde(default)]
    md5: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(deserialize_with = "de::text")]
    directory: String,
    image: String,
    rating: Rating,
    #[serde(deserialize_with = "de::text")]
    source: String,
    #[serde(deserialize_with = "de::int")]
    change: u64,
    #[serde(deserialize_with = "de::text")]
    owner: String,
    #[serde(deserialize_with = "de::int")]
    creator_id: u64,
    #[serde(deserialize_with = "de::parent")]
    parent_id: Option<u64>,
    #[serde(deserialize_with = "de::int_bool")]
    sample: bool,
    #[serde(deserialize_with = "de::int")]
    preview_height: u32,
    #[serde(deserialize_with = "de::int")]
    preview_width: u32,
    #[serde(deserialize_with = "de::space_list")]
    tags: Vec<String>,
    #[serde(deserialize_with = "de::text")]
    title: String,
    #[serde(deserialize_with = "de::string_bool")]
    has_notes: bool,
    #[serde(deserialize_with = "de::string_bool")]
    has_comments: bool,
    file_url: String,
    #[serde(deserialize_with = "de::text")]
    preview_url: String,
    #[serde(deserialize_with = "de::text")]
    sample_url: String,
    #[serde(deserialize_with = "de::int")]
    sample_height: u32,
    #[serde(deserialize_with = "de::int")]
    sample_width: u32,
    #[serde(deserialize_with = "de::text")]
    status: String,
    // `post_locked` on current responses, `locked` on older ones
    #[serde(default, deserialize_with = "de::some_int_bool")]
    post_locked: Option<bool>,
    #[serde(default, deserialize_with = "de::some_int_bool")]
    locked: Option<bool>,
    #[serde(deserialize_with = "de::string_bool")]
    has_children: bool,
}

/// A Gelbooru post: one media file and its metadata.
///
/// `id` is the primary key; `md5` identifies the file content.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// The ID of the post.
    pub id: u64,
    /// When the post was uploaded.
    pub created_at: DateTime<FixedOffset>,
    /// The user score. May be negative.
    pub score: i64,
    /// The width of the file, in pixels.
    pub width: u32,
    /// The height of the file, in pixels.
    pub height: u32,
    /// The MD5 hash of the file.
    pub md5: String,
    /// The storage directory of the file on the remote side.
    pub directory: String,
    /// The name of the file, e.g. `"d41d8cd98f00b204e9800998ecf8427e.jpg"`.
    pub file_name: String,
    /// The content-safety rating.
    pub rating: Rating,
    /// Where the artwork comes from. May be empty.
    pub source: String,
    /// Last change, as a unix timestamp.
    pub change: u64,
    /// The name of the uploader account.
    pub owner: String,
    /// The ID of the uploader.
    pub creator_id: u64,
    /// The parent post, if any.
    pub parent_id: Option<u64>,
    /// Whether a downsized sample exists.
    pub sample: bool,
    /// The height of the preview file.
    pub preview_height: u32,
    /// The width of the preview file.
    pub preview_width: u32,
    /// The tags, in response order.
    pub tags: Vec<String>,
    /// The title. Usually empty.
    pub title: String,
    /// Whether the post has notes.
    pub has_notes: bool,
    /// Whether the post has comments.
    pub has_comments: bool,
    /// The URL of the original file.
    pub file_url: String,
    /// The URL of the preview file.
    pub preview_url: String,
    /// The URL of the sample file. Empty if there is none.
    pub sample_url: String,
    /// The height of the sample file.
    pub sample_height: u32,
    /// The width of the sample file.
    pub sample_width: u32,
    /// The moderation status, e.g. `"active"`.
    pub status: String,
    /// Whether the post is locked.
    pub locked: bool,
    /// Whether the post has children.
    pub has_children: bool,
    /// The JSON object this post was built from.
    #[serde(skip)]
    pub raw: RawData,
}

impl Post {
    /// Build a post from one element of the `post` array.
    pub(crate) fn from_json(value: Value) -> Result<Self, MappingError> {
        if !value.is_object() {
            return Err(MappingError::UnexpectedShape(format!(
                "a post must be an object, got {value}"
            )));
        }
        let fields = PostFields::deserialize(&value)?;
        let raw = match value {
            Value::Object(raw) => raw,
            other => return Err(MappingError::UnexpectedShape(other.to_string())),
        };

        let md5 = fields
            .md5
            .filter(|md5| !md5.is_empty())
            .or(fields.hash)
            .filter(|md5| !md5.is_empty())
            .ok_or(MappingError::MissingField("md5"))?;
        let locked = fields
            .post_locked
            .or(fields.locked)
            .ok_or(MappingError::MissingField("post_locked"))?;

        Ok(Self {
            id: fields.id,
            created_at: fields.created_at,
            score: fields.score,
            width: fields.width,
            height: fields.height,
            md5,
            directory: fields.directory,
            file_name: fields.image,
            rating: fields.rating,
            source: fields.source,
            change: fields.change,
            owner: fields.owner,
            creator_id: fields.creator_id,
            parent_id: fields.parent_id,
            sample: fields.sample,
            preview_height: fields.preview_height,
            preview_width: fields.preview_width,
            tags: fields.tags,
            title: fields.title,
            has_notes: fields.has_notes,
            has_comments: fields.has_comments,
            file_url: fields.file_url,
            preview_url: fields.preview_url,
            sample_url: fields.sample_url,
            sample_height: fields.sample_height,
            sample_width: fields.sample_width,
            status: fields.status,
            locked,
            has_children: fields.has_children,
            raw,
        })
    }

    /// The extension of [`Self::file_name`], without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
    }

    /// The dimensions of the original file.
    #[inline]
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// The dimensions of the preview file.
    #[inline]
    pub fn preview_dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.preview_width, self.preview_height)
    }

    /// The dimensions of the sample file.
    #[inline]
    pub fn sample_dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.sample_width, self.sample_height)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_url)
    }
}
