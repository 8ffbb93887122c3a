use std::fmt;

use chrono::NaiveDateTime;
use roxmltree::Node;
use serde::Serialize;
use serde_json::Value;

use super::RawData;
use crate::error::MappingError;

/// The format of a comment's `created_at`, e.g. `2008-04-02 08:24`.
const COMMENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A comment left on a post.
///
/// The post is referenced by [`Self::post_id`] only.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// The ID of the comment itself.
    pub id: u64,
    /// The ID of the post the comment is on.
    pub post_id: u64,
    /// The name of the author. Often `"Anonymous"`, which is a real value.
    pub author: String,
    /// The ID of the author, `0` when the API omits it.
    pub author_id: u64,
    /// The body of the comment.
    pub content: String,
    /// When the comment was posted. The API gives no offset.
    pub created_at: NaiveDateTime,
    /// The attributes of the `<comment>` element this comment was built from.
    #[serde(skip)]
    pub raw: RawData,
}

impl Comment {
    /// Build a comment from a `<comment>` element.
    pub(crate) fn from_xml(node: Node<'_, '_>) -> Result<Self, MappingError> {
        let required = |field: &'static str| {
            node.attribute(field)
                .ok_or(MappingError::MissingField(field))
        };
        let number = |field: &'static str, value: &str| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| MappingError::InvalidField {
                    field,
                    value: value.to_string(),
                })
        };

        let created_at = required("created_at")?;
        let created_at = NaiveDateTime::parse_from_str(created_at, COMMENT_TIME_FORMAT).map_err(
            |_| MappingError::InvalidField {
                field: "created_at",
                value: created_at.to_string(),
            },
        )?;

        let author_id = match node.attribute("creator_id").map(str::trim) {
            None | Some("") => 0,
            Some(creator_id) => number("creator_id", creator_id)?,
        };

        let raw = node
            .attributes()
            .map(|attr| (attr.name().to_string(), Value::from(attr.value())))
            .collect();

        Ok(Self {
            id: number("id", required("id")?)?,
            post_id: number("post_id", required("post_id")?)?,
            author: required("creator")?.to_string(),
            author_id,
            content: required("body")?.to_string(),
            created_at,
            raw,
        })
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.author, self.content)
    }
}
