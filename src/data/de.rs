//! `deserialize_with` helpers that absorb the API's loose typing.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// The format of a post's `created_at`, e.g. `Sat Jun 10 14:07:54 -0500 2023`.
pub(crate) const POST_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// A number, possibly sent as a string.
pub(crate) fn int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
    <T as FromStr>::Err: Display,
    <T as TryFrom<i64>>::Error: Display,
{
    match Loose::deserialize(deserializer)? {
        Loose::Int(n) => T::try_from(n).map_err(D::Error::custom),
        Loose::Str(s) => s.trim().parse().map_err(D::Error::custom),
        Loose::Bool(b) => Err(D::Error::custom(format!("expected a number, got {b}"))),
        Loose::Float(f) => Err(D::Error::custom(format!("expected an integer, got {f}"))),
    }
}

/// A post reference where `0`, `""` and `null` all mean "none".
pub(crate) fn parent<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None | Some(Loose::Int(0)) => Ok(None),
        Some(Loose::Int(n)) => u64::try_from(n).map(Some).map_err(D::Error::custom),
        Some(Loose::Str(s)) => match s.trim() {
            "" | "0" => Ok(None),
            s => s.parse().map(Some).map_err(D::Error::custom),
        },
        Some(other) => Err(D::Error::custom(format!(
            "expected a post id, got {}",
            other.describe()
        ))),
    }
}

/// Flags of the post endpoint: only the literal string `"true"` is true.
///
/// Booleans and `0`/`1` integers are accepted too, since older responses use them.
pub(crate) fn string_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Str(s)) => s == "true",
        Some(Loose::Bool(b)) => b,
        Some(Loose::Int(n)) => n != 0,
        Some(Loose::Float(_)) | None => false,
    })
}

/// Flags that follow the `0`/`1` convention, possibly sent as numeric strings.
pub(crate) fn int_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(n)) => n != 0,
        Some(Loose::Bool(b)) => b,
        Some(Loose::Str(s)) => match s.trim() {
            "true" => true,
            s => s.parse::<i64>().is_ok_and(|n| n != 0),
        },
        Some(Loose::Float(_)) | None => false,
    })
}

/// [`int_bool`] for a key that may be missing, so that a renamed twin can stand in for it.
pub(crate) fn some_int_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    int_bool(deserializer).map(Some)
}

/// Free text; `null` and numbers are tolerated.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        None => String::new(),
        Some(Loose::Str(s)) => s,
        Some(other) => other.describe(),
    })
}

/// A whitespace-delimited list, or an already split array.
pub(crate) fn space_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Joined(String),
        Split(Vec<String>),
    }

    Ok(match List::deserialize(deserializer)? {
        List::Joined(s) => s.split_whitespace().map(String::from).collect(),
        List::Split(v) => v,
    })
}

pub(crate) fn post_time<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_str(&s, POST_TIME_FORMAT)
        .map_err(|err| D::Error::custom(format!("invalid timestamp {s:?}: {err}")))
}

impl Loose {
    fn describe(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}
