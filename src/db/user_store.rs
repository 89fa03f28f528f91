use tokio::sync::broadcast;

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::User,
};

/// User store for database operations.
///
/// Constructed explicitly and passed by reference to whatever coordinates
/// the application; there is no hidden global instance. Mutations emit a
/// change notification that the feed layer requeries on.
pub struct UserStore {
    pool: DbPool,
    changes: broadcast::Sender<()>,
}

impl UserStore {
    /// Create a new UserStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self { pool, changes }
    }

    /// Insert a user, replacing any existing record with the same id.
    ///
    /// A user with the unassigned sentinel id gets a fresh id from the
    /// store. Returns the id the record was persisted under. Failures are
    /// returned to the caller and never retried here.
    pub async fn insert_user(&self, user: &User) -> Result<i64> {
        // NULL id lets SQLite assign the next rowid; an explicit id takes
        // the replace-on-conflict path.
        let id = if user.is_saved() { Some(user.id) } else { None };

        let result = sqlx::query(
            r#"
            INSERT OR REPLACE INTO users (id, name, description, joinedYear, isElite)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.description)
        .bind(user.joined_year)
        .bind(user.is_elite)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let assigned = match id {
            Some(id) => id,
            None => result.last_insert_rowid(),
        };

        // No receivers is fine; nobody is observing the list right now.
        let _ = self.changes.send(());

        Ok(assigned)
    }

    /// Get all users, ascending by id.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(users)
    }

    /// Get a user by id. Absent is `None`, not an error.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(user)
    }

    /// Subscribe to table invalidation events.
    pub fn changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db_pool;
    use tempfile::TempDir;

    async fn setup_test_store() -> (TempDir, UserStore) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database_url = format!("sqlite://{}/users.db", dir.path().display());
        let pool = init_db_pool(&database_url)
            .await
            .expect("Failed to initialize database");
        (dir, UserStore::new(pool))
    }

    #[tokio::test]
    async fn fresh_store_is_seeded_once_with_sample_users() {
        let (_dir, store) = setup_test_store().await;

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 5);

        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Astro", "Abdul-Dijk", "Dexter", "Connor", "Kruger"]);

        let years: Vec<i32> = users.iter().map(|u| u.joined_year).collect();
        assert_eq!(years, [2018, 2018, 2018, 2018, 2019]);

        assert!(users.iter().all(|u| u.is_elite));
    }

    #[tokio::test]
    async fn insert_assigns_id_and_point_lookup_finds_it() {
        let (_dir, store) = setup_test_store().await;

        let zed = User::unsaved("Zed", "new", 2021, false);
        let id = store.insert_user(&zed).await.unwrap();
        assert_eq!(id, 6);

        let fetched = store.get_user(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Zed");
        assert_eq!(fetched.description, "new");
        assert_eq!(fetched.joined_year, 2021);
        assert!(!fetched.is_elite);
    }

    #[tokio::test]
    async fn list_users_stays_ascending_by_id() {
        let (_dir, store) = setup_test_store().await;

        for i in 0..4 {
            let user = User::unsaved(format!("User {i}"), "added", 2020 + i, false);
            store.insert_user(&user).await.unwrap();
        }

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 9);
        assert!(users.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn insert_with_existing_id_replaces_the_record() {
        let (_dir, store) = setup_test_store().await;

        let replacement = User {
            id: 1,
            name: "Astro II".to_string(),
            description: "replaced".to_string(),
            joined_year: 2020,
            is_elite: false,
        };
        let id = store.insert_user(&replacement).await.unwrap();
        assert_eq!(id, 1);

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(users.iter().filter(|u| u.id == 1).count(), 1);

        let fetched = store.get_user(1).await.unwrap().unwrap();
        assert_eq!(fetched, replacement);
    }

    #[tokio::test]
    async fn get_user_returns_none_for_unknown_id() {
        let (_dir, store) = setup_test_store().await;

        assert!(store.get_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inserts_notify_change_subscribers() {
        let (_dir, store) = setup_test_store().await;
        let mut changes = store.changes();

        let user = User::unsaved("Zed", "new", 2021, false);
        store.insert_user(&user).await.unwrap();

        changes.recv().await.expect("change event");
    }
}
