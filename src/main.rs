use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use userlink::{
    Config, User,
    db::{self, UserStore},
    links::NewUserParams,
    services::{DirectoryService, Resolution},
};

/// Demo driver: with no arguments, prints the user list; given a deep-link
/// URI, resolves it against the store the way an incoming intent would be.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::init();
    let pool = db::init_db_pool(&config.database_url).await?;
    let store = Arc::new(UserStore::new(pool));
    let directory = DirectoryService::new(store, config.links, config.feed_grace);

    if let Some(advisory) = directory.link_advisory() {
        tracing::warn!("{}", advisory.message);
    }

    match std::env::args().nth(1) {
        Some(raw) => open(&directory, &raw).await,
        None => list(&directory).await,
    }
}

async fn list(directory: &DirectoryService) -> Result<()> {
    let subscription = directory.users().await?;
    for user in subscription.snapshot() {
        let badge = if user.is_elite { "elite" } else { "-" };
        println!(
            "{:>3}  {} ({})  [{badge}]  {}",
            user.id, user.name, user.joined_year, user.description
        );
    }
    Ok(())
}

async fn open(directory: &DirectoryService, raw: &str) -> Result<()> {
    match directory.open_link(raw).await? {
        Resolution::Details(user) => {
            let payload = directory.share(&user);
            println!("{}", serde_json::to_string_pretty(&user)?);
            println!("share: {} -> {}", payload.title, payload.text);
        }
        Resolution::UserNotFound { user_id } => {
            println!(
                "user {} was not found; add them instead?",
                user_id.map_or_else(|| "?".to_string(), |id| id.to_string())
            );
        }
        Resolution::AddNewUser(NewUserParams {
            name,
            description,
            joined_year,
            is_elite,
        }) => {
            let id = directory
                .save_user(User::unsaved(name, description, joined_year, is_elite))
                .await?;
            println!("added user {id}");
        }
    }
    Ok(())
}
