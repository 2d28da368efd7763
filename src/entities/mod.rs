pub mod prelude;

pub mod categories;
pub mod comments;
pub mod post_categories;
pub mod posts;
pub mod reactions;
pub mod sessions;
pub mod users;
