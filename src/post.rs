use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer};
use spdlog::warn;

use crate::text_utils::parse_date;

pub const UNTITLED: &str = "Untitled";

/// One content document from the posts directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
    pub content: String,
    pub external_url: Option<String>,
    pub score: Option<f64>,
}

/// Post minus the body. List views, the tag catalog and the feed only
/// ever need this projection.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
    pub external_url: Option<String>,
    pub score: Option<f64>,
}

/// Accepts both `tags: project` and `tags: [a, b]`
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    tags: Vec<String>,
    #[serde(rename = "externalUrl")]
    external_url: Option<String>,
    score: Option<f64>,
}

impl FrontMatter {
    /// Splits a document into its metadata block and body. The block is a
    /// `---` fenced set of key: value lines at the top of the file. A missing
    /// or unparsable block yields defaults and leaves the document untouched.
    fn parse(raw: &str) -> (FrontMatter, &str) {
        let doc = raw.trim_start_matches(['\n', '\r']);
        let Some(rest) = doc.strip_prefix("---") else {
            return (FrontMatter::default(), raw);
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end) = rest.find("\n---") else {
            // No closing fence
            return (FrontMatter::default(), raw);
        };

        let block = &rest[..end];
        let body = rest[end + 4..].trim_start_matches(['\n', '\r']);

        match serde_yaml::from_str::<FrontMatter>(block) {
            Ok(matter) => (matter, body),
            Err(e) => {
                warn!("Ignoring unparsable front matter: {}", e);
                (FrontMatter::default(), raw)
            }
        }
    }
}

/// Example of post
/// ---
/// title: Growing mushrooms on spent coffee
/// date: 2024-05-12
/// description: Notes from a month of kitchen mycology
/// tags: [project, misc1]
/// score: 6
/// ---
///
/// It turns out oyster mushrooms will eat almost anything...
impl Post {
    pub fn from_string(slug: &str, raw: &str) -> Post {
        let (matter, body) = FrontMatter::parse(raw);

        let date = match matter.date {
            None => Local::now().date_naive(),
            Some(ref date_str) => match parse_date(date_str) {
                Ok(date) => date,
                Err(e) => {
                    warn!("{} - post={}", e, slug);
                    Local::now().date_naive()
                }
            },
        };

        Post {
            slug: slug.to_string(),
            title: matter.title.unwrap_or_else(|| UNTITLED.to_string()),
            date,
            description: matter.description.unwrap_or_default(),
            tags: matter.tags,
            content: body.to_string(),
            external_url: matter.external_url,
            score: matter.score,
        }
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            date: self.date,
            description: self.description.clone(),
            tags: self.tags.clone(),
            external_url: self.external_url.clone(),
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_DATA;

    use super::*;

    #[test]
    fn test_from_string_all_fields() {
        let post = Post::from_string("first-post", POST_DATA);
        assert_eq!(post.slug, "first-post");
        assert_eq!(post.title, "What I learned shipping a side project");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        assert_eq!(post.description, "Four weekends, one deploy button");
        assert_eq!(post.tags, ["project", "starred"]);
        assert_eq!(post.score, Some(6.0));
        assert_eq!(post.external_url, None);
        assert!(post.content.starts_with("Shipping something small"));
    }

    #[test]
    fn test_from_string_body_only() {
        let post = Post::from_string("untagged", "Just a body, no metadata.\n");
        assert_eq!(post.title, UNTITLED);
        assert_eq!(post.description, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.date, Local::now().date_naive());
        assert_eq!(post.content, "Just a body, no metadata.\n");
    }

    #[test]
    fn test_from_string_single_tag() {
        let raw = "---\ntitle: One tag\ntags: yap\n---\nbody\n";
        let post = Post::from_string("one-tag", raw);
        assert_eq!(post.tags, ["yap"]);
    }

    #[test]
    fn test_from_string_external_url() {
        let raw = "---\ntitle: Elsewhere\nexternalUrl: https://example.com/talk\n---\n";
        let post = Post::from_string("elsewhere", raw);
        assert_eq!(post.external_url.as_deref(), Some("https://example.com/talk"));
    }

    #[test]
    fn test_from_string_bad_front_matter() {
        // Unparsable block degrades every field to its default and keeps
        // the document as the body
        let raw = "---\ntitle: [unclosed\n---\nbody text\n";
        let post = Post::from_string("broken", raw);
        assert_eq!(post.title, UNTITLED);
        assert!(post.content.contains("body text"));
    }

    #[test]
    fn test_from_string_unclosed_fence() {
        let raw = "---\ntitle: Never closed\n";
        let post = Post::from_string("unclosed", raw);
        assert_eq!(post.title, UNTITLED);
        assert_eq!(post.content, raw);
    }

    #[test]
    fn test_from_string_bad_date() {
        let raw = "---\ntitle: Bad date\ndate: someday\n---\nbody\n";
        let post = Post::from_string("bad-date", raw);
        assert_eq!(post.date, Local::now().date_naive());
    }

    #[test]
    fn test_summary_drops_content() {
        let post = Post::from_string("first-post", POST_DATA);
        let summary = post.summary();
        assert_eq!(summary.slug, post.slug);
        assert_eq!(summary.title, post.title);
        assert_eq!(summary.tags, post.tags);
    }
}
