use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

use crate::content::{page_count, paginate, Post, POSTS_PER_PAGE};
use crate::startup::ApplicationState;
use crate::TEMPLATES;

const RELATED_POSTS_COUNT: usize = 3;

#[derive(serde::Deserialize)]
pub struct BlogIndexParams {
    pub page: Option<usize>,
}

#[tracing::instrument(name = "Rendering blog index", skip(app_state, params))]
pub async fn blog_index(
    State(app_state): State<ApplicationState>,
    Query(params): Query<BlogIndexParams>,
) -> Result<Html<String>, BlogError> {
    let page = params.page.unwrap_or(1);
    let posts = app_state.content.posts();
    let page_items = paginate(posts, page, POSTS_PER_PAGE);
    let mut tera_context = tera::Context::new();
    tera_context.insert("posts", page_items);
    tera_context.insert("page", &page);
    tera_context
        .insert("page_count", &page_count(posts.len(), POSTS_PER_PAGE));
    tera_context.insert("tags", &app_state.content.tags());
    let html = TEMPLATES.render("blog/index.html", &tera_context)?;
    Ok(Html(html))
}

#[tracing::instrument(name = "Rendering blog post", skip(app_state))]
pub async fn blog_post(
    State(app_state): State<ApplicationState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, BlogError> {
    let post = app_state
        .content
        .get(&slug)
        .ok_or(BlogError::PostNotFound)?;
    let related =
        app_state.content.related_to(&slug, RELATED_POSTS_COUNT);
    let has_true_matches = related.iter().any(|item| item.score > 0);
    let related_posts: Vec<&Post> =
        related.iter().map(|item| &item.post).collect();

    let mut tera_context = tera::Context::new();
    tera_context.insert("post", post);
    tera_context.insert("body_html", &post.body_html());
    tera_context.insert("related", &related_posts);
    tera_context.insert("has_true_matches", &has_true_matches);
    let html = TEMPLATES.render("blog/post.html", &tera_context)?;
    Ok(Html(html))
}

#[derive(thiserror::Error, Debug)]
pub enum BlogError {
    #[error("No post with this slug.")]
    PostNotFound,
    #[error("Template failed to render.")]
    RenderError(#[from] tera::Error),
}

impl IntoResponse for BlogError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{} Reason: {:?}", self, self);
        match self {
            BlogError::PostNotFound => {
                (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>"))
                    .into_response()
            }
            BlogError::RenderError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>"),
            )
                .into_response(),
        }
    }
}
