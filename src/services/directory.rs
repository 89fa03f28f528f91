//! View-state coordinator: mediates between the store, the link resolver
//! and whatever renders the screens.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    db::UserStore,
    error::Result,
    links::{self, Destination, LinkConfig, LinkError, NewUserParams, SharePayload},
    models::User,
    platform::{DomainState, DomainVerifier, NoVerification},
    services::user_feed::{UserFeed, UsersSubscription},
};

/// Outcome of resolving an external URI against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A Details link whose user exists.
    Details(User),
    /// A Details link whose id matched no record, or whose `userId` was
    /// missing or malformed. The consumer should offer the add-new-user
    /// recovery path rather than erroring.
    UserNotFound { user_id: Option<i64> },
    /// An AddNewUser link with its decoded, defaulted parameters.
    AddNewUser(NewUserParams),
}

/// Advisory shown when the platform has not registered the app as the
/// handler for its link domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAdvisory {
    pub host: String,
    pub message: String,
}

pub struct DirectoryService {
    store: Arc<UserStore>,
    links: LinkConfig,
    feed: UserFeed,
    verifier: Arc<dyn DomainVerifier>,
}

impl DirectoryService {
    pub fn new(store: Arc<UserStore>, links: LinkConfig, feed_grace: Duration) -> Self {
        let feed = UserFeed::new(store.clone(), feed_grace);
        Self {
            store,
            links,
            feed,
            verifier: Arc::new(NoVerification),
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn DomainVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Subscribe to the live user list.
    pub async fn users(&self) -> Result<UsersSubscription> {
        self.feed.subscribe().await
    }

    /// Point lookup by id.
    pub async fn user(&self, id: i64) -> Result<Option<User>> {
        self.store.get_user(id).await
    }

    /// Persist a user and return the assigned id.
    pub async fn save_user(&self, user: User) -> Result<i64> {
        self.store.insert_user(&user).await
    }

    /// Fire-and-forget insert. A failed write is logged and not retried;
    /// retry policy belongs to the caller.
    pub fn add_user(&self, user: User) {
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(err) = store.insert_user(&user).await {
                tracing::error!("failed to add user {:?}: {err}", user.name);
            }
        });
    }

    /// Resolve an incoming external URI to a screen-level outcome.
    pub async fn open_link(&self, raw: &str) -> Result<Resolution> {
        match links::parse_link(&self.links, raw) {
            Ok(Destination::Details { user_id }) => match self.store.get_user(user_id).await? {
                Some(user) => Ok(Resolution::Details(user)),
                None => Ok(Resolution::UserNotFound {
                    user_id: Some(user_id),
                }),
            },
            Ok(Destination::AddNewUser(params)) => Ok(Resolution::AddNewUser(params)),
            // Home is never externally reachable.
            Ok(Destination::Home) => Err(LinkError::Unroutable(raw.to_string()).into()),
            // A Details link without a usable id cannot resolve to any
            // record; treat it as not found.
            Err(LinkError::MalformedParameter { name: "userId", .. }) => {
                Ok(Resolution::UserNotFound { user_id: None })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Sharing payload for a user.
    pub fn share(&self, user: &User) -> SharePayload {
        links::share_user(&self.links, user)
    }

    /// Ask the platform whether this app handles its link domain. `None`
    /// means nothing needs surfacing.
    pub fn link_advisory(&self) -> Option<LinkAdvisory> {
        match self.verifier.domain_state(&self.links.host) {
            DomainState::Unverified => Some(LinkAdvisory {
                host: self.links.host.clone(),
                message: format!(
                    "Links to {} will not open here until link handling is enabled in the system settings.",
                    self.links.host
                ),
            }),
            DomainState::Verified | DomainState::Unsupported => None,
        }
    }
}
