use std::cmp::Ordering;
use std::collections::HashSet;

use crate::paginator::{PageInfo, Paginator};
use crate::post::PostSummary;

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum SortBy {
    Recent,
    Score,
}

impl SortBy {
    /// The listing surface defaults to score ordering
    pub fn parse(value: &str) -> SortBy {
        match value {
            "recent" => SortBy::Recent,
            _ => SortBy::Score,
        }
    }
}

/// Returns a new ordering; the input is left untouched. `Recent` is
/// descending by date and stable on equal dates. `Score` is descending by
/// score with absent scores ranking as 0, ties broken by date descending.
pub fn sort_posts(posts: &[PostSummary], sort_by: SortBy) -> Vec<PostSummary> {
    let mut sorted = posts.to_vec();
    match sort_by {
        SortBy::Recent => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortBy::Score => sorted.sort_by(|a, b| {
            let score_a = a.score.unwrap_or(0.0);
            let score_b = b.score.unwrap_or(0.0);
            score_b.total_cmp(&score_a).then_with(|| b.date.cmp(&a.date))
        }),
    }
    sorted
}

/// Case-insensitive tag match, preserving the relative order of the input.
pub fn filter_by_tag(posts: &[PostSummary], tag: &str) -> Vec<PostSummary> {
    let wanted = tag.to_lowercase();
    posts
        .iter()
        .filter(|post| post.tags.iter().any(|t| t.to_lowercase() == wanted))
        .cloned()
        .collect()
}

/// The deduplicated union of tags across all posts. Tags on the featured
/// list sort first, in list order; everything else follows lexicographically.
pub fn tag_catalog(posts: &[PostSummary], featured: &[String]) -> Vec<String> {
    let set: HashSet<&String> = posts.iter().flat_map(|post| post.tags.iter()).collect();

    let mut tags: Vec<String> = set.into_iter().cloned().collect();
    tags.sort_by(|a, b| {
        let pos_a = featured.iter().position(|t| t == a);
        let pos_b = featured.iter().position(|t| t == b);
        match (pos_a, pos_b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });
    tags
}

pub struct ListQuery {
    pub page: u32,
    pub tag: Option<String>,
    pub sort: SortBy,
}

pub struct ListingPage {
    pub posts: Vec<PostSummary>,
    pub page_info: PageInfo,
    pub tags: Vec<String>,
}

/// The full listing pipeline: sort the whole set, filter, then paginate.
/// Filtering after sorting keeps the filtered subsequence in sorted order.
/// The tag catalog always covers the unfiltered set.
pub fn run(all: &[PostSummary], query: &ListQuery, page_size: u32, featured: &[String]) -> ListingPage {
    let tags = tag_catalog(all, featured);

    let sorted = sort_posts(all, query.sort);
    let filtered = match query.tag {
        None => sorted,
        Some(ref tag) => filter_by_tag(&sorted, tag),
    };

    let paginator = Paginator::from(&filtered, page_size);
    let (page_items, page_info) = paginator.get_page(query.page);

    ListingPage {
        posts: page_items.to_vec(),
        page_info,
        tags,
    }
}
