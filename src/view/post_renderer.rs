use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;
use crate::text_utils::format_date;

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    post_title: &'a str,
    date: String,
    description: &'a str,
    has_description: bool,
    tags: Vec<ViewTag<'a>>,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer { template })
    }

    /// `body_html` is the already-rendered markdown body.
    pub fn render(&self, post: &Post, body_html: &str) -> String {
        let tags: Vec<ViewTag> = post.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();
        self.template.render(&ViewItem {
            post_title: post.title.as_str(),
            date: format_date(&post.date),
            description: post.description.as_str(),
            has_description: !post.description.is_empty(),
            tags,
            post_content: body_html,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn render_view() {
        let template_src = r##"
TITLE=[{{post_title}}]
DATE=[{{date}}]
DESC=[{{#has_description}}{{description}}{{/has_description}}]
TAGS=[{{#tags}}({{tag}}){{/tags}}]
POST_CONTENT=[{{{post_content}}}]
"##;
        let post_renderer = PostRenderer::new(template_src).unwrap();
        let post = Post {
            slug: "pond-maintenance".to_string(),
            title: "Pond maintenance & you".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: "A <gentle> introduction".to_string(),
            tags: vec!["<yap>".to_string(), "misc1".to_string()],
            content: String::new(),
            external_url: None,
            score: None,
        };
        let res = post_renderer.render(&post, "<p>rendered body</p>");
        assert_eq!(res, r##"
TITLE=[Pond maintenance &amp; you]
DATE=[January 2, 2024]
DESC=[A &lt;gentle&gt; introduction]
TAGS=[(&lt;yap&gt;)(misc1)]
POST_CONTENT=[<p>rendered body</p>]"##);
    }

    #[test]
    fn render_view_empty_description() {
        let template_src = r##"{{#has_description}}desc{{/has_description}}ok"##;
        let post_renderer = PostRenderer::new(template_src).unwrap();
        let post = Post {
            slug: "s".to_string(),
            title: "t".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: String::new(),
            tags: vec![],
            content: String::new(),
            external_url: None,
            score: None,
        };
        assert_eq!(post_renderer.render(&post, ""), "ok");
    }
}
