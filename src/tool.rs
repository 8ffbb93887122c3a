//! Some useful tools for the project.
//!
//! Usually, you don't need to use this module directly.
//! [`crate::api`] and [`crate::download`] will automatically use these tools.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// An empty tag list, handy for the `exclude` argument of [`format_tags`].
pub const NO_TAGS: [&str; 0] = [];

#[inline]
fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase().replace(' ', "_")
}

/// Turn include and exclude tags into the `+` delimited value of the `tags` query parameter.
///
/// Every tag is trimmed, lowercased, and its inner spaces become underscores.
/// Exclude tags get exactly one leading `-`, however many they were given with.
/// The two groups are always joined by a `+`, so an empty exclude group leaves a trailing `+`,
/// which the API accepts.
///
/// Tag content is not validated: a malformed tag simply matches nothing on the remote side.
///
/// # Example
///
/// ```rust
/// use gelbooru_api::tool::format_tags;
///
/// let tags = format_tags(["Hakurei Reimu ", "solo"], ["--Comic"]);
/// assert_eq!(tags, "hakurei_reimu+solo+-comic");
/// ```
pub fn format_tags<I, E>(include: I, exclude: E) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    E: IntoIterator,
    E::Item: AsRef<str>,
{
    let include = include
        .into_iter()
        .map(|tag| normalize_tag(tag.as_ref().trim()))
        .collect::<Vec<_>>()
        .join("+");
    let exclude = exclude
        .into_iter()
        .map(|tag| {
            let tag = tag.as_ref().trim().trim_start_matches('-');
            format!("-{}", normalize_tag(tag))
        })
        .collect::<Vec<_>>()
        .join("+");
    format!("{include}+{exclude}")
}

/// Give the path an extension if it has none.
pub(crate) trait WithDefaultExtension {
    fn with_default_extension(self, extension: Option<&OsStr>) -> PathBuf;
}

impl<P: Into<PathBuf>> WithDefaultExtension for P {
    fn with_default_extension(self, extension: Option<&OsStr>) -> PathBuf {
        let mut path: PathBuf = self.into();
        if let (None, Some(extension)) = (path.extension(), extension) {
            path.set_extension(extension);
        }
        path
    }
}

/// Keep only the final component of a remote file name, so remote data never picks a directory.
pub(crate) fn bare_file_name(name: &str) -> Option<&OsStr> {
    Path::new(name).file_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_include_only() {
        assert_eq!(format_tags([" Cat ", "Blue Sky"], NO_TAGS), "cat+blue_sky+");
        assert_eq!(format_tags(NO_TAGS, NO_TAGS), "+");
    }

    #[test]
    fn test_format_exclude_single_minus() {
        let formatted = format_tags(["cat"], ["dog", "-dog", "---Big Dog", " -x "]);
        assert_eq!(formatted, "cat+-dog+-dog+-big_dog+-x");
    }

    #[test]
    fn test_format_exclude_idempotent() {
        let once = format_tags(NO_TAGS, ["--Rating:Explicit"]);
        let exclude = once.trim_start_matches('+');
        assert_eq!(exclude, "-rating:explicit");

        let twice = format_tags(NO_TAGS, [exclude]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_passes_through_odd_tags() {
        assert_eq!(
            format_tags(["yuyu_(touhou)", "score:>10"], NO_TAGS),
            "yuyu_(touhou)+score:>10+"
        );
    }

    #[test]
    fn test_with_default_extension() {
        let path = PathBuf::from("/tmp/test").with_default_extension(Some(OsStr::new("png")));
        assert_eq!(path, PathBuf::from("/tmp/test.png"));

        let path = "test.jpg".with_default_extension(Some(OsStr::new("png")));
        assert_eq!(path, PathBuf::from("test.jpg"));

        let path = "test".with_default_extension(None);
        assert_eq!(path, PathBuf::from("test"));
    }

    #[test]
    fn test_bare_file_name() {
        assert_eq!(bare_file_name("../../etc/abc.png"), Some(OsStr::new("abc.png")));
        assert_eq!(bare_file_name("abc.png"), Some(OsStr::new("abc.png")));
        assert_eq!(bare_file_name(""), None);
    }
}
