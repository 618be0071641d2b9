use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{related_posts, Post, ScoredPost, TagCount};

/// In-memory view over a directory of markdown documents.
///
/// `.md` and `.mdx` are interchangeable; when a slug carries both
/// extensions the `.mdx` file wins. Drafts never make it into the store.
/// Posts are held newest-first.
pub struct ContentStore {
    posts: Vec<Post>,
}

impl ContentStore {
    #[tracing::instrument(name = "Loading content store", skip(posts_dir), fields(posts_dir = %posts_dir.as_ref().display()))]
    pub fn load(
        posts_dir: impl AsRef<Path>,
    ) -> Result<Self, ContentStoreError> {
        let mut documents: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in std::fs::read_dir(posts_dir.as_ref())? {
            let path = entry?.path();
            let Some(extension) =
                path.extension().and_then(|e| e.to_str())
            else {
                continue;
            };
            if extension != "md" && extension != "mdx" {
                continue;
            }
            let Some(slug) =
                path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };
            match documents.get(&slug) {
                Some(existing)
                    if existing.extension().and_then(|e| e.to_str())
                        == Some("mdx") => {}
                _ => {
                    documents.insert(slug, path);
                }
            }
        }

        let mut posts = Vec::with_capacity(documents.len());
        for (slug, path) in documents {
            let document = std::fs::read_to_string(&path)?;
            let is_draft =
                Post::is_draft(&document).map_err(|source| {
                    ContentStoreError::Post {
                        slug: slug.clone(),
                        source,
                    }
                })?;
            if is_draft {
                tracing::info!("Skipping draft {}", slug);
                continue;
            }
            let post = Post::parse(&slug, &document).map_err(|source| {
                ContentStoreError::Post {
                    slug: slug.clone(),
                    source,
                }
            })?;
            posts.push(post);
        }
        posts.sort_by(|a, b| {
            b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
        });
        tracing::info!("Loaded {} posts", posts.len());
        Ok(Self { posts })
    }

    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| {
            b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
        });
        Self { posts }
    }

    /// All posts, newest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.posts.iter().map(|p| p.slug.as_str()).collect()
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn related_to(&self, slug: &str, limit: usize) -> Vec<ScoredPost> {
        match self.get(slug) {
            Some(target) => related_posts(&self.posts, target, limit),
            None => Vec::new(),
        }
    }

    pub fn tags(&self) -> Vec<TagCount> {
        super::aggregate_tags(&self.posts)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ContentStoreError {
    #[error("Could not read content directory.")]
    Io(#[from] std::io::Error),
    #[error("Could not parse post {slug}.")]
    Post {
        slug: String,
        source: super::ParsePostError,
    },
}
