use anyhow::Result;
use sqlx::{Pool, Sqlite, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};
use std::time::Duration;

pub mod user_store;

pub use user_store::UserStore;

pub type DbPool = Pool<Sqlite>;

/// Description shared by the seeded sample users.
const SEED_DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
    sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

/// Initialize the database connection pool
pub async fn init_db_pool(database_url: &str) -> Result<DbPool> {
    // Create the database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    // Create connection pool
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the v1 schema and seed the sample users on first creation.
async fn setup_database(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            joinedYear INTEGER NOT NULL,
            isElite INTEGER NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Seed only when the table was just created, so it runs exactly once
    // per fresh store.
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count.0 == 0 {
        seed_users(pool).await?;
    }

    Ok(())
}

async fn seed_users(pool: &DbPool) -> Result<()> {
    let samples = [
        ("Astro", 2018),
        ("Abdul-Dijk", 2018),
        ("Dexter", 2018),
        ("Connor", 2018),
        ("Kruger", 2019),
    ];

    for (name, joined_year) in samples {
        sqlx::query(
            r#"
            INSERT INTO users (name, description, joinedYear, isElite)
            VALUES (?, ?, ?, 1);
            "#,
        )
        .bind(name)
        .bind(SEED_DESCRIPTION)
        .bind(joined_year)
        .execute(pool)
        .await?;
    }

    tracing::info!("seeded {} sample users", samples.len());
    Ok(())
}
