use crate::links::{LinkConfig, user_link};
use crate::models::User;

/// Plain-text payload handed to an external sharing sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    /// Title previewed while sharing, formatted `"<name> | <description>"`.
    pub title: String,
    /// The shared text: the user's Details URI.
    pub text: String,
}

/// Build the sharing payload for a persisted user.
pub fn share_user(config: &LinkConfig, user: &User) -> SharePayload {
    SharePayload {
        title: format!("{} | {}", user.name, user.description),
        text: user_link(config, user.id),
    }
}
