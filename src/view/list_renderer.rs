use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::paginator::PageInfo;
use crate::post::PostSummary;
use crate::text_utils::format_date;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    post_list: Vec<PostItem<'a>>,
    tags: Vec<ViewTag<'a>>,
    cur_tag: &'a str,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
    empty: bool,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    link: String,
    title: &'a str,
    date: String,
    description: &'a str,
    tags: Vec<ViewTag<'a>>,
    external: bool,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer { template })
    }

    pub fn render(
        &self,
        posts: &[PostSummary],
        page_info: &PageInfo,
        tags: &[String],
        cur_tag: Option<&str>,
    ) -> String {
        let mut post_list = vec![];
        for post in posts {
            let link = match post.external_url {
                Some(ref url) => url.clone(),
                None => format!("/blog/{}/", post.slug),
            };
            post_list.push(PostItem {
                link,
                title: post.title.as_str(),
                date: format_date(&post.date),
                description: post.description.as_str(),
                tags: post.tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect(),
                external: post.external_url.is_some(),
            });
        }

        let mut page_list: Vec<ViewPagination> = Vec::with_capacity(page_info.total_pages as usize);
        for i in 1..=page_info.total_pages {
            page_list.push(ViewPagination {
                current: i == page_info.current_page,
                number: i,
            })
        }

        let tags: Vec<_> = tags.iter().map(|t| ViewTag { tag: t.as_str() }).collect();
        self.template.render(&ListPage {
            empty: post_list.is_empty(),
            post_list,
            tags,
            cur_tag: cur_tag.unwrap_or(""),
            page_list,
            show_pagination: page_info.total_pages > 1,
        })
    }
}
