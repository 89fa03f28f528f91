pub mod directory;
pub mod user_feed;

pub use directory::{DirectoryService, Resolution};
pub use user_feed::{UserFeed, UsersSubscription};
