pub mod repo;
pub mod repo_types;
pub mod validation;

pub use repo::{MongoUserStore, StoreError, UserStore};
pub use repo_types::{Role, SocialLinks, Token, User};
