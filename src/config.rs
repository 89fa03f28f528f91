use std::env;
use std::time::Duration;

use crate::links::LinkConfig;

pub struct Config {
    pub database_url: String,
    pub links: LinkConfig,
    pub feed_grace: Duration,
}

impl Config {
    pub fn init() -> Self {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://users.db".to_string()),
            links: LinkConfig {
                scheme: env::var("LINK_SCHEME").unwrap_or_else(|_| "https".to_string()),
                host: env::var("LINK_HOST")
                    .unwrap_or_else(|_| "www.astroscoding.com".to_string()),
                user_path: env::var("LINK_USER_PATH").unwrap_or_else(|_| "/user".to_string()),
                add_user_path: env::var("LINK_ADD_USER_PATH")
                    .unwrap_or_else(|_| "/adduser".to_string()),
            },
            feed_grace: Duration::from_millis(
                env::var("FEED_GRACE_MS")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("FEED_GRACE_MS must be a number"),
            ),
        }
    }
}
