//! Full flow: an incoming add-user link creates a record, the live list
//! picks it up, and the record's share payload routes back to its details.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use userlink::{
    User,
    db::{UserStore, init_db_pool},
    links::LinkConfig,
    services::{DirectoryService, Resolution},
};

async fn setup() -> (TempDir, DirectoryService) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let database_url = format!("sqlite://{}/users.db", dir.path().display());
    let pool = init_db_pool(&database_url)
        .await
        .expect("Failed to initialize database");
    let store = Arc::new(UserStore::new(pool));
    let directory = DirectoryService::new(store, LinkConfig::default(), Duration::from_secs(5));
    (dir, directory)
}

#[tokio::test]
async fn incoming_add_user_link_flows_through_to_sharing() {
    let (_dir, directory) = setup().await;

    let mut subscription = directory.users().await.unwrap();
    assert_eq!(subscription.snapshot().len(), 5);

    // An external caller opens the add-user deep link.
    let resolution = directory
        .open_link(
            "https://www.astroscoding.com/adduser?name=Zed&desc=brand%20new&joinedYear=2021",
        )
        .await
        .unwrap();
    let Resolution::AddNewUser(params) = resolution else {
        panic!("expected AddNewUser");
    };
    assert!(!params.is_elite); // absent -> false

    // The add screen submits the form.
    let id = directory
        .save_user(User::unsaved(
            params.name,
            params.description,
            params.joined_year,
            params.is_elite,
        ))
        .await
        .unwrap();
    assert_eq!(id, 6);

    // The home screen sees the new record.
    subscription.changed().await.unwrap();
    let users = subscription.snapshot();
    assert_eq!(users.len(), 6);
    let zed = users.last().unwrap();
    assert_eq!(zed.name, "Zed");
    assert_eq!(zed.description, "brand new");

    // Sharing the record produces a link that resolves back to it.
    let payload = directory.share(zed);
    assert_eq!(payload.title, "Zed | brand new");

    let resolution = directory.open_link(&payload.text).await.unwrap();
    assert_eq!(resolution, Resolution::Details(zed.clone()));
}

#[tokio::test]
async fn replacing_a_seeded_user_updates_the_live_list() {
    let (_dir, directory) = setup().await;

    let mut subscription = directory.users().await.unwrap();

    let replacement = User {
        id: 5,
        name: "Kruger".to_string(),
        description: "demoted".to_string(),
        joined_year: 2019,
        is_elite: false,
    };
    let id = directory.save_user(replacement.clone()).await.unwrap();
    assert_eq!(id, 5);

    subscription.changed().await.unwrap();
    let users = subscription.snapshot();
    assert_eq!(users.len(), 5);
    assert_eq!(users[4], replacement);
}
