//! Bidirectional mapping between in-app navigation routes and the
//! externally visible deep-link URIs.
//!
//! External templates:
//! - `scheme://host/<user_path>?userId={userId}`
//! - `scheme://host/<add_user_path>?name={name}&desc={desc}&joinedYear={joinedYear}&isElite={isElite}`

use thiserror::Error;
use url::Url;

pub mod share;

pub use share::{SharePayload, share_user};

/// Internal route patterns for programmatic navigation.
pub const HOME_ROUTE: &str = "home";
pub const DETAILS_ROUTE: &str = "details/{userId}";
pub const ADD_NEW_USER_ROUTE: &str = "add_new_user";

/// Scheme, host and paths the external URIs must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub scheme: String,
    pub host: String,
    pub user_path: String,
    pub add_user_path: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "www.astroscoding.com".to_string(),
            user_path: "/user".to_string(),
            add_user_path: "/adduser".to_string(),
        }
    }
}

/// Parameters decoded from an AddNewUser link. Every field has a declared
/// default applied when the parameter is absent or fails coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUserParams {
    pub name: String,
    pub description: String,
    pub joined_year: i32,
    pub is_elite: bool,
}

/// A logical navigation destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Home,
    Details { user_id: i64 },
    AddNewUser(NewUserParams),
}

impl Destination {
    /// Concrete internal route string, with arguments substituted into the
    /// pattern placeholders.
    pub fn route(&self) -> String {
        match self {
            Destination::Home => HOME_ROUTE.to_string(),
            Destination::Details { user_id } => {
                DETAILS_ROUTE.replace("{userId}", &user_id.to_string())
            }
            Destination::AddNewUser(_) => ADD_NEW_USER_ROUTE.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("URI does not route into the app: {0}")]
    Unroutable(String),

    #[error("Malformed parameter {name}: {value:?}")]
    MalformedParameter {
        name: &'static str,
        value: Option<String>,
    },
}

/// Decode an external URI into a destination.
///
/// Scheme, host and path must match the configuration exactly. `userId` on
/// a Details link is required; the AddNewUser parameters all default when
/// absent or malformed.
pub fn parse_link(config: &LinkConfig, raw: &str) -> Result<Destination, LinkError> {
    let url = Url::parse(raw).map_err(|_| LinkError::Unroutable(raw.to_string()))?;

    if url.scheme() != config.scheme || url.host_str() != Some(config.host.as_str()) {
        return Err(LinkError::Unroutable(raw.to_string()));
    }

    let path = url.path();
    if path == config.user_path {
        let value = query_param(&url, "userId");
        let user_id = value
            .as_deref()
            .and_then(|v| v.parse().ok())
            .ok_or(LinkError::MalformedParameter {
                name: "userId",
                value,
            })?;
        Ok(Destination::Details { user_id })
    } else if path == config.add_user_path {
        Ok(Destination::AddNewUser(NewUserParams {
            name: query_param(&url, "name").unwrap_or_default(),
            description: query_param(&url, "desc").unwrap_or_default(),
            joined_year: query_param(&url, "joinedYear")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            is_elite: query_param(&url, "isElite").as_deref() == Some("true"),
        }))
    } else {
        Err(LinkError::Unroutable(raw.to_string()))
    }
}

/// Encode the Details URI for a user id.
pub fn user_link(config: &LinkConfig, id: i64) -> String {
    format!(
        "{}://{}{}?userId={}",
        config.scheme, config.host, config.user_path, id
    )
}

/// Encode the AddNewUser URI, percent-encoding the parameter values.
pub fn add_user_link(config: &LinkConfig, params: &NewUserParams) -> String {
    let mut url = Url::parse(&format!(
        "{}://{}{}",
        config.scheme, config.host, config.add_user_path
    ))
    .expect("link config produces a valid base URL");

    url.query_pairs_mut()
        .append_pair("name", &params.name)
        .append_pair("desc", &params.description)
        .append_pair("joinedYear", &params.joined_year.to_string())
        .append_pair("isElite", if params.is_elite { "true" } else { "false" });

    url.to_string()
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
