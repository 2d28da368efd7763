use serde::{Deserialize, Serialize};

use crate::models::{Category, Comment, Post, ReactionCounts, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Post as rendered for clients. `viewer_liked`/`viewer_disliked`
/// reflect the requesting user and are both false for guests.
#[derive(Debug, Serialize)]
pub struct PostDto {
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
    pub viewer_liked: bool,
    pub viewer_disliked: bool,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        use crate::models::ReactionKind;

        Self {
            id: post.id,
            user_id: post.user_id,
            username: post.username,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            categories: post.categories,
            likes: post.likes,
            dislikes: post.dislikes,
            comment_count: post.comment_count,
            viewer_liked: post.viewer_reaction == Some(ReactionKind::Like),
            viewer_disliked: post.viewer_reaction == Some(ReactionKind::Dislike),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub created_at: String,
    pub likes: u64,
    pub dislikes: u64,
    pub viewer_liked: bool,
    pub viewer_disliked: bool,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        use crate::models::ReactionKind;

        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: comment.username,
            content: comment.content,
            created_at: comment.created_at,
            likes: comment.likes,
            dislikes: comment.dislikes,
            viewer_liked: comment.viewer_reaction == Some(ReactionKind::Like),
            viewer_disliked: comment.viewer_reaction == Some(ReactionKind::Dislike),
        }
    }
}

/// Raw reaction request: `kind` is validated at this boundary, the
/// ledger only ever sees the parsed enum.
#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    #[serde(alias = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ReactionResponse {
    pub likes: u64,
    pub dislikes: u64,
}

impl From<ReactionCounts> for ReactionResponse {
    fn from(counts: ReactionCounts) -> Self {
        Self {
            likes: counts.likes,
            dislikes: counts.dislikes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub users: u64,
}
