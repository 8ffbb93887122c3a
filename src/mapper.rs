//! Normalize raw response bodies into [`crate::data`] records.
//!
//! Every function here is pure: it takes the body text of one response
//! and returns the records in response order.
//!
//! The API is not consistent about the shape of a list:
//! - the JSON endpoints wrap it as `{"@attributes": {..}, "post": [..]}`,
//!   drop the key entirely when nothing matched, and older versions return a bare array;
//! - the XML comment endpoint has one `<comment>` child per comment, possibly none.
//!
//! All of these are normalized to a `Vec`, which is empty when nothing matched.

use log::trace;
use roxmltree::Document;
use serde_json::Value;

use crate::data::{Comment, Post, Tag};
use crate::error::MappingError;

/// Pull the list stored under `key` out of a JSON response.
fn json_records(body: &str, key: &str) -> Result<Vec<Value>, MappingError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)?;
    let list = match value {
        Value::Array(list) => return Ok(list),
        Value::Object(mut object) => object.remove(key),
        other => {
            return Err(MappingError::UnexpectedShape(format!(
                "expected an object or an array, got {other}"
            )))
        }
    };

    Ok(match list {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(list)) => list,
        Some(single @ Value::Object(_)) => vec![single],
        Some(other) => {
            return Err(MappingError::UnexpectedShape(format!(
                "`{key}` must be a list, got {other}"
            )))
        }
    })
}

/// Map the body of a `s=post` JSON response.
pub fn posts(body: &str) -> Result<Vec<Post>, MappingError> {
    let posts = json_records(body, "post")?
        .into_iter()
        .map(Post::from_json)
        .collect::<Result<Vec<_>, _>>()?;
    trace!("mapped {} post(s)", posts.len());
    Ok(posts)
}

/// Map the body of a `s=tag` JSON response.
pub fn tags(body: &str) -> Result<Vec<Tag>, MappingError> {
    let tags = json_records(body, "tag")?
        .into_iter()
        .map(Tag::from_json)
        .collect::<Result<Vec<_>, _>>()?;
    trace!("mapped {} tag(s)", tags.len());
    Ok(tags)
}

/// Map the body of a `s=comment` XML response.
pub fn comments(body: &str) -> Result<Vec<Comment>, MappingError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc = Document::parse(body)?;
    let root = doc.root_element();
    if !root.has_tag_name("comments") {
        return Err(MappingError::UnexpectedShape(format!(
            "expected a <comments> document, got <{}>",
            root.tag_name().name()
        )));
    }

    let comments = root
        .children()
        .filter(|node| node.has_tag_name("comment"))
        .map(Comment::from_xml)
        .collect::<Result<Vec<_>, _>>()?;
    trace!("mapped {} comment(s)", comments.len());
    Ok(comments)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::fixtures::{sample_post_json, MD5};

    #[test]
    fn test_posts_shapes() {
        let wrapped = json!({
            "@attributes": {"limit": 100, "offset": 0, "count": 1},
            "post": [sample_post_json()]
        });
        let single = json!({
            "@attributes": {"limit": 100, "offset": 0, "count": 1},
            "post": sample_post_json()
        });
        let bare = json!([sample_post_json()]);

        for body in [wrapped, single, bare] {
            let posts = posts(&body.to_string()).unwrap();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].md5, MD5);
        }
    }

    #[test]
    fn test_posts_not_found() {
        let body = json!({"@attributes": {"limit": 100, "offset": 0, "count": 0}});
        assert!(posts(&body.to_string()).unwrap().is_empty());
        assert!(posts("").unwrap().is_empty());
        assert!(posts("[]").unwrap().is_empty());
    }

    #[test]
    fn test_posts_keep_order() {
        let mut second = sample_post_json();
        second["id"] = json!(1);
        let body = json!({"post": [sample_post_json(), second]});
        let ids: Vec<u64> = posts(&body.to_string())
            .unwrap()
            .iter()
            .map(|post| post.id)
            .collect();
        assert_eq!(ids, [1234, 1]);
    }

    #[test]
    fn test_posts_malformed() {
        assert!(matches!(posts("<html>"), Err(MappingError::Json(_))));
        assert!(matches!(
            posts(r#"{"post": 3}"#),
            Err(MappingError::UnexpectedShape(_))
        ));
        assert!(matches!(posts("42"), Err(MappingError::UnexpectedShape(_))));

        let mut broken = sample_post_json();
        broken["width"] = json!("wide");
        let body = json!({ "post": [broken] });
        assert!(matches!(posts(&body.to_string()), Err(MappingError::Json(_))));
    }

    #[test]
    fn test_tags() {
        let body = json!({
            "@attributes": {"limit": 2, "offset": 0, "count": 2},
            "tag": [
                {"id": 262, "name": "yuyu_(touhou)", "count": 150, "type": 4, "ambiguous": 0},
                {"id": 2, "name": "highres", "count": 9, "type": 5, "ambiguous": 0}
            ]
        });
        let tags = tags(&body.to_string()).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "yuyu_(touhou)");
        assert!(tags[1].is_meta());
    }

    const ONE_COMMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<comments type="array">
  <comment created_at="2021-03-04 05:06" post_id="1234" body="first" creator="Anonymous" id="1" creator_id=""/>
</comments>"#;

    const TWO_COMMENTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<comments type="array">
  <comment created_at="2021-03-04 05:06" post_id="1234" body="first" creator="Anonymous" id="1" creator_id=""/>
  <comment created_at="2021-03-05 07:08" post_id="1234" body="second" creator="someone" id="2" creator_id="42"/>
</comments>"#;

    #[test]
    fn test_single_comment_same_as_list() {
        let one = comments(ONE_COMMENT).unwrap();
        let two = comments(TWO_COMMENTS).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);

        let (a, b) = (&one[0], &two[0]);
        assert_eq!(
            (a.id, a.post_id, &a.author, a.author_id, &a.content, a.created_at),
            (b.id, b.post_id, &b.author, b.author_id, &b.content, b.created_at)
        );
        assert_eq!(a.raw, b.raw);
        assert_eq!(two[1].content, "second");
    }

    #[test]
    fn test_no_comments() {
        assert!(comments(r#"<comments type="array"/>"#).unwrap().is_empty());
        assert!(comments(r#"<comments type="array"></comments>"#).unwrap().is_empty());
    }

    #[test]
    fn test_comments_malformed() {
        assert!(matches!(comments("<comments>"), Err(MappingError::Xml(_))));
        assert!(matches!(
            comments("<posts/>"),
            Err(MappingError::UnexpectedShape(_))
        ));
    }
}
