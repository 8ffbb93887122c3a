use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{de, RawData};
use crate::error::MappingError;

/// The category of a tag.
///
/// The API sends either the numeric code or the name, depending on the endpoint.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "TypeCode")]
pub enum TagType {
    /// Code `0`, named `tag` or `general`.
    General,
    /// Code `1`.
    Artist,
    /// Code `3`.
    Copyright,
    /// Code `4`.
    Character,
    /// Code `5`, also spelled `meta`.
    Metadata,
    /// Code `6`.
    Deprecated,
    /// A type this crate doesn't know about, as sent.
    Other(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeCode {
    Code(i64),
    Name(String),
}

impl From<TypeCode> for TagType {
    fn from(value: TypeCode) -> Self {
        match value {
            TypeCode::Code(code) => Self::from_code(code),
            TypeCode::Name(name) => match name.trim().parse::<i64>() {
                Ok(code) => Self::from_code(code),
                Err(_) => Self::from(name.as_str()),
            },
        }
    }
}

impl From<&str> for TagType {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "tag" | "general" => Self::General,
            "artist" => Self::Artist,
            "copyright" => Self::Copyright,
            "character" => Self::Character,
            "metadata" | "meta" => Self::Metadata,
            "deprecated" => Self::Deprecated,
            _ => Self::Other(name.to_string()),
        }
    }
}

impl TagType {
    fn from_code(code: i64) -> Self {
        match code {
            0 => Self::General,
            1 => Self::Artist,
            3 => Self::Copyright,
            4 => Self::Character,
            5 => Self::Metadata,
            6 => Self::Deprecated,
            other => Self::Other(other.to_string()),
        }
    }

    /// The name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::General => "general",
            Self::Artist => "artist",
            Self::Copyright => "copyright",
            Self::Character => "character",
            Self::Metadata => "metadata",
            Self::Deprecated => "deprecated",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TagType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct TagFields {
    #[serde(deserialize_with = "de::int")]
    id: u64,
    name: String,
    #[serde(deserialize_with = "de::int")]
    count: u64,
    #[serde(rename = "type")]
    kind: TagType,
    #[serde(deserialize_with = "de::int_bool")]
    ambiguous: bool,
}

/// A Gelbooru tag.
///
/// Two tags are equal, and hash the same, when their [`Self::id`] is equal.
/// The other fields are not compared.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    /// The ID of the tag.
    pub id: u64,
    /// The name, lowercase with underscores, e.g. `"yuyu_(touhou)"`.
    pub name: String,
    /// The category of the tag.
    #[serde(rename = "type")]
    pub kind: TagType,
    /// The number of posts carrying the tag.
    pub count: u64,
    /// Whether the tag is ambiguous.
    pub ambiguous: bool,
    /// The JSON object this tag was built from. Empty for tags built with [`Tag::new`].
    #[serde(skip)]
    pub raw: RawData,
}

impl Tag {
    /// Create a tag by hand.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        kind: impl Into<TagType>,
        count: u64,
        ambiguous: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            count,
            ambiguous,
            raw: RawData::new(),
        }
    }

    /// Build a tag from one element of the `tag` array.
    pub(crate) fn from_json(value: Value) -> Result<Self, MappingError> {
        if !value.is_object() {
            return Err(MappingError::UnexpectedShape(format!(
                "a tag must be an object, got {value}"
            )));
        }
        let fields = TagFields::deserialize(&value)?;
        let raw = match value {
            Value::Object(raw) => raw,
            other => return Err(MappingError::UnexpectedShape(other.to_string())),
        };
        Ok(Self {
            id: fields.id,
            name: fields.name,
            kind: fields.kind,
            count: fields.count,
            ambiguous: fields.ambiguous,
            raw,
        })
    }

    /// Whether this is a metadata tag, e.g. `highres`.
    #[inline]
    pub fn is_meta(&self) -> bool {
        self.kind == TagType::Metadata
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
