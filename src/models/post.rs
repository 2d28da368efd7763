use serde::Serialize;

use super::reaction::ReactionKind;

/// Post view-model: the row plus everything the presentation layer
/// renders next to it (author, counts, categories, the viewer's own
/// reaction state).
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub categories: Vec<String>,
    pub likes: u64,
    pub dislikes: u64,
    pub comment_count: u64,
    pub viewer_reaction: Option<ReactionKind>,
}

/// Home-page filters, combinable. `liked_by`/`author_id` carry the
/// acting user's id when the corresponding toggle is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub liked_by: Option<i64>,
}
