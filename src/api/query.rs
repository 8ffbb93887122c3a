//! Request parameters of each API operation.
//!
//! Every type here is validated when it is turned into a URL,
//! which happens before any request is sent.

use std::fmt;
use std::str::FromStr;

use log::debug;
use reqwest::Url;
use validator::Validate;

use crate::config::{Config, Credentials};
use crate::data::Post;
use crate::error::{Error, Result, POSTS_HARD_LIMIT};
use crate::tool::{format_tags, NO_TAGS};

/// The tag that makes a post search return random posts.
const RANDOM_SORT: &str = "sort:random";

/// The value of the `s` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selector {
    Post,
    Tag,
    Comment,
}

impl Selector {
    fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Tag => "tag",
            Self::Comment => "comment",
        }
    }
}

type Pairs = Vec<(&'static str, String)>;

/// `+` is how a form-encoded query spells a space.
/// Hand the serializer spaces and let it produce the `+` itself,
/// so that the rest of the tag text is escaped properly.
#[inline]
fn tags_param(formatted: &str) -> String {
    formatted.replace('+', " ")
}

/// The base URL plus the credential fragment shared by every request.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    base: Url,
    credentials: Option<Credentials>,
}

impl Endpoint {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.base_url)
            .map_err(|err| Error::validation(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base,
            credentials: config.credentials()?,
        })
    }

    /// See <https://gelbooru.com/index.php?page=wiki&s=view&id=18780>
    pub(crate) fn url(&self, selector: Selector, pairs: &[(&'static str, String)]) -> Url {
        debug!("GET s={} {:?}", selector.as_str(), pairs);

        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.extend_pairs([
                ("page", "dapi"),
                ("s", selector.as_str()),
                ("q", "index"),
            ]);
            // comments are only served as XML
            if selector != Selector::Comment {
                query.append_pair("json", "1");
            }
            if let Some(credentials) = &self.credentials {
                query
                    .append_pair("api_key", &credentials.api_key)
                    .append_pair("user_id", &credentials.user_id);
            }
            query.extend_pairs(pairs);
        }
        url
    }

    pub(crate) fn search_posts(&self, search: &PostSearch) -> Result<Url> {
        Ok(self.url(Selector::Post, &search.pairs()?))
    }

    pub(crate) fn get_post(&self, lookup: &PostLookup) -> Url {
        self.url(Selector::Post, &lookup.pairs())
    }

    pub(crate) fn get_post_comments(&self, post_id: u64) -> Url {
        self.url(Selector::Comment, &[("post_id", post_id.to_string())])
    }

    pub(crate) fn search_tags(&self, search: &TagSearch) -> Result<Url> {
        Ok(self.url(Selector::Tag, &search.pairs()?))
    }

    pub(crate) fn get_tag(&self, lookup: &TagLookup) -> Url {
        self.url(Selector::Tag, &lookup.pairs())
    }
}

/// A post search by tags.
///
/// # Example
///
/// ```rust
/// use gelbooru_api::api::PostSearch;
///
/// let search = PostSearch::new(["cat", "blue sky"])
///     .exclude(["dog"])
///     .limit(100)
///     .page(2)
///     .random(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSearch {
    tags: Vec<String>,
    exclude: Vec<String>,
    limit: u32,
    page: u32,
    random: bool,
}

impl PostSearch {
    /// Search posts carrying all of `tags`. Grabs one post of page `0` by default.
    pub fn new<I>(tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
            limit: 1,
            page: 0,
            random: false,
        }
    }

    /// Drop posts carrying any of `tags`.
    pub fn exclude<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.exclude = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The maximum number of posts to grab, at most [`POSTS_HARD_LIMIT`].
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// The page of results to grab, counted in units of [`Self::limit`].
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Return random posts among the matches.
    pub fn random(mut self, random: bool) -> Self {
        self.random = random;
        self
    }

    fn pairs(&self) -> Result<Pairs> {
        if self.limit > POSTS_HARD_LIMIT {
            return Err(Error::LimitExceeded { limit: self.limit });
        }

        let include = self
            .tags
            .iter()
            .map(String::as_str)
            .chain(self.random.then_some(RANDOM_SORT));
        let mut pairs = vec![
            ("tags", tags_param(&format_tags(include, &self.exclude))),
            ("limit", self.limit.to_string()),
        ];
        // page 0 is the API default
        if self.page != 0 {
            pairs.push(("pid", self.page.to_string()));
        }
        Ok(pairs)
    }
}

/// How to find a single post: by ID or by MD5 hash, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostLookup {
    /// By post ID.
    Id(u64),
    /// By MD5 hash of the file.
    Md5(String),
}

impl PostLookup {
    /// Build a lookup from optional arguments. An empty hash counts as absent.
    ///
    /// # Errors
    ///
    /// If both or neither are given, this function will return [`Error::Validation`].
    pub fn new(post_id: Option<u64>, md5: Option<String>) -> Result<Self> {
        match (post_id, md5.filter(|md5| !md5.is_empty())) {
            (Some(post_id), None) => Ok(Self::Id(post_id)),
            (None, Some(md5)) => Ok(Self::Md5(md5)),
            _ => Err(Error::validation(
                "must specify a post id or an md5, and not both",
            )),
        }
    }

    fn pairs(&self) -> Pairs {
        match self {
            Self::Id(post_id) => vec![("id", post_id.to_string())],
            Self::Md5(md5) => vec![("tags", format!("md5:{md5}"))],
        }
    }

    /// Keep the first post, unless it is not the one that was asked for.
    ///
    /// A malformed hash can make the API answer with an unrelated post.
    pub(crate) fn pick(&self, posts: Vec<Post>) -> Option<Post> {
        let post = posts.into_iter().next()?;
        match self {
            Self::Md5(md5) if !post.md5.eq_ignore_ascii_case(md5) => {
                debug!("asked for md5 {md5}, got {}; treating as not found", post.md5);
                None
            }
            _ => Some(post),
        }
    }
}

impl From<u64> for PostLookup {
    fn from(post_id: u64) -> Self {
        Self::Id(post_id)
    }
}

/// Tag sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// `asc`
    Asc,
    /// `desc`
    Desc,
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::validation(format!(
                "order can only be 'asc' or 'desc', {s:?} was received"
            ))),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Tag sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// `date`
    Date,
    /// `count`
    Count,
    /// `name`
    Name,
}

impl AsRef<str> for OrderBy {
    fn as_ref(&self) -> &str {
        match self {
            Self::Date => "date",
            Self::Count => "count",
            Self::Name => "name",
        }
    }
}

impl FromStr for OrderBy {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "count" => Ok(Self::Count),
            "name" => Ok(Self::Name),
            _ => Err(Error::validation(format!(
                "if ordering of tags specified, it must be either 'date', 'count', or 'name', {s:?} was received"
            ))),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// What a tag search matches on, once validated.
enum TagFilter<'a> {
    All,
    Names(&'a [String]),
    Pattern(&'a str),
}

/// A tag search.
///
/// `names` and `name_pattern` exclude each other,
/// and the API rejects `name_pattern` together with `after_id`.
///
/// # Example
///
/// ```rust
/// use gelbooru_api::api::{Order, OrderBy, TagSearch};
///
/// let search = TagSearch::new()
///     .name_pattern("touhou%")
///     .order_by(OrderBy::Count)
///     .order(Order::Desc)
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSearch {
    names: Vec<String>,
    name_pattern: Option<String>,
    limit: Option<u32>,
    after_id: Option<u64>,
    order: Option<String>,
    order_by: Option<String>,
}

impl TagSearch {
    /// Match every tag. Grabs one tag by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the tags with exactly these names.
    pub fn names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Match names against a wildcard pattern:
    /// `_` stands for one character, `%` for any number of them.
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = Some(pattern.into());
        self
    }

    /// The maximum number of tags to grab.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only match tags whose id is greater than this one.
    pub fn after_id(mut self, after_id: u64) -> Self {
        self.after_id = Some(after_id);
        self
    }

    /// `asc` or `desc`, case-insensitive. Takes an [`Order`] or a string.
    pub fn order(mut self, order: impl AsRef<str>) -> Self {
        self.order = Some(order.as_ref().to_string());
        self
    }

    /// `date`, `count` or `name`. Takes an [`OrderBy`] or a string.
    pub fn order_by(mut self, order_by: impl AsRef<str>) -> Self {
        self.order_by = Some(order_by.as_ref().to_string());
        self
    }

    fn filter(&self) -> Result<TagFilter<'_>> {
        let pattern = self.name_pattern.as_deref().filter(|p| !p.is_empty());
        match (self.names.is_empty(), pattern) {
            (false, Some(_)) => Err(Error::validation(
                "must have one of names and name pattern, not both",
            )),
            (false, None) => Ok(TagFilter::Names(&self.names)),
            (true, Some(_)) if self.after_id.is_some() => Err(Error::validation(
                "name pattern and after id don't work together",
            )),
            (true, Some(pattern)) => Ok(TagFilter::Pattern(pattern)),
            (true, None) => Ok(TagFilter::All),
        }
    }

    fn pairs(&self) -> Result<Pairs> {
        let mut pairs = Pairs::new();
        match self.filter()? {
            TagFilter::All => {}
            TagFilter::Names(names) => {
                pairs.push(("names", tags_param(&format_tags(names, NO_TAGS))));
            }
            TagFilter::Pattern(pattern) => pairs.push(("name_pattern", pattern.to_string())),
        }
        if let Some(after_id) = self.after_id {
            pairs.push(("after_id", after_id.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("orderby", order_by.parse::<OrderBy>()?.to_string()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order", order.parse::<Order>()?.to_string()));
        }
        pairs.push(("limit", self.limit.unwrap_or(1).to_string()));
        Ok(pairs)
    }
}

/// How to find a single tag: by name or by ID, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    /// By name. Normalized like any tag, e.g. `"Blue Sky"` looks up `blue_sky`.
    Name(String),
    /// By tag ID.
    Id(u64),
}

impl TagLookup {
    /// Build a lookup from optional arguments. An empty name counts as absent.
    ///
    /// # Errors
    ///
    /// If both or neither are given, this function will return [`Error::Validation`].
    pub fn new(name: Option<String>, tag_id: Option<u64>) -> Result<Self> {
        match (name.filter(|name| !name.trim().is_empty()), tag_id) {
            (Some(name), None) => Ok(Self::Name(name)),
            (None, Some(tag_id)) => Ok(Self::Id(tag_id)),
            _ => Err(Error::validation(
                "must specify a name or tag id, and not both",
            )),
        }
    }

    fn pairs(&self) -> Pairs {
        match self {
            Self::Name(name) => {
                let name = format_tags([name], NO_TAGS);
                vec![("name", name.trim_end_matches('+').to_string())]
            }
            Self::Id(tag_id) => vec![("id", tag_id.to_string())],
        }
    }
}

impl From<u64> for TagLookup {
    fn from(tag_id: u64) -> Self {
        Self::Id(tag_id)
    }
}
