pub mod authorization;
pub use authorization::AccessError;

pub mod credentials;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, RegisterResult, SessionHandle};
pub use auth_service_impl::SeaOrmAuthService;

pub mod post_service;
pub mod post_service_impl;
pub use post_service::{PostError, PostQuery, PostService};
pub use post_service_impl::SeaOrmPostService;

pub mod comment_service;
pub mod comment_service_impl;
pub use comment_service::{CommentError, CommentService};
pub use comment_service_impl::SeaOrmCommentService;

pub mod reaction_service;
pub mod reaction_service_impl;
pub use reaction_service::{ReactionError, ReactionService};
pub use reaction_service_impl::SeaOrmReactionService;

pub mod sweeper;
pub use sweeper::SessionSweeper;
