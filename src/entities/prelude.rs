pub use super::categories::Entity as Categories;
pub use super::comments::Entity as Comments;
pub use super::post_categories::Entity as PostCategories;
pub use super::posts::Entity as Posts;
pub use super::reactions::Entity as Reactions;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
