use serde::Serialize;

use super::reaction::ReactionKind;

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: String,
    pub likes: u64,
    pub dislikes: u64,
    pub viewer_reaction: Option<ReactionKind>,
}
