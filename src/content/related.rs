use std::collections::HashSet;

use super::Post;

/// A related-content candidate with its shared-tag count. A score of
/// zero means the post came from the fallback latest-posts slate, not a
/// genuine tag match.
#[derive(Debug, Clone)]
pub struct ScoredPost {
    pub post: Post,
    pub score: usize,
}

/// Ranks every other post by the size of its tag intersection with the
/// target, most recent first among equals, then pads the slate with the
/// most recent unscored posts up to `limit`.
pub fn related_posts(
    posts: &[Post],
    target: &Post,
    limit: usize,
) -> Vec<ScoredPost> {
    let target_tags: HashSet<&str> =
        target.tags.iter().map(String::as_str).collect();

    let mut matches: Vec<(usize, &Post)> = Vec::new();
    let mut fallback: Vec<&Post> = Vec::new();
    for post in posts {
        if post.slug == target.slug {
            continue;
        }
        let candidate_tags: HashSet<&str> =
            post.tags.iter().map(String::as_str).collect();
        let score = candidate_tags.intersection(&target_tags).count();
        if score > 0 {
            matches.push((score, post));
        } else {
            fallback.push(post);
        }
    }
    matches.sort_by(|(score_a, a), (score_b, b)| {
        score_b.cmp(score_a).then_with(|| b.date.cmp(&a.date))
    });
    fallback.sort_by(|a, b| b.date.cmp(&a.date));

    let mut slate: Vec<ScoredPost> = matches
        .into_iter()
        .take(limit)
        .map(|(score, post)| ScoredPost {
            post: post.clone(),
            score,
        })
        .collect();
    for post in fallback {
        if slate.len() >= limit {
            break;
        }
        slate.push(ScoredPost {
            post: post.clone(),
            score: 0,
        });
    }
    slate
}
