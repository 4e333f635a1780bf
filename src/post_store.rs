use std::fs;
use std::path::PathBuf;

use spdlog::warn;

use crate::post::Post;

/// Filesystem-backed content store. Documents are read wholesale on every
/// query; content changes only between process restarts, so there is no
/// cache to invalidate.
pub struct PostStore {
    pub posts_dir: PathBuf,
}

impl PostStore {
    pub fn new(posts_dir: PathBuf) -> Self {
        PostStore { posts_dir }
    }

    /// Every `.md` document in the store, in filesystem enumeration order.
    /// A missing directory is an empty catalog, not an error.
    pub fn list_all(&self) -> Vec<Post> {
        let entries = match fs::read_dir(self.posts_dir.as_path()) {
            Ok(entries) => entries,
            Err(_) => return vec![],
        };

        let mut posts = vec![];
        for entry in entries {
            if let Ok(entry) = entry {
                if let Ok(file_type) = entry.file_type() {
                    if !file_type.is_file() {
                        continue;
                    }
                    let file_name = entry.file_name();
                    if let Some(file_name) = file_name.to_str() {
                        if let Some(slug) = file_name.strip_suffix(".md") {
                            match fs::read_to_string(entry.path()) {
                                Ok(raw) => posts.push(Post::from_string(slug, &raw)),
                                Err(e) => warn!("Skipping unreadable post {}: {}", file_name, e),
                            }
                        }
                    }
                }
            }
        }
        posts
    }

    /// Direct lookup by slug. Any read failure is an absent post.
    pub fn get(&self, slug: &str) -> Option<Post> {
        if slug.contains('/') || slug.contains('\\') || slug.contains("..") {
            return None;
        }

        let file_path = self.posts_dir.join(format!("{}.md", slug));
        let raw = fs::read_to_string(file_path).ok()?;
        Some(Post::from_string(slug, &raw))
    }
}
