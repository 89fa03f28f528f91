//! Advisory interface to the platform's link-verification service.
//!
//! The platform may or may not register this application as the handler for
//! its host domain. The core queries the state to surface an advisory but
//! never depends on the outcome.

/// Whether the platform considers this app the handler for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainState {
    /// The app is the verified or user-selected handler.
    Verified,
    /// The service exists but the app is not the handler.
    Unverified,
    /// The platform has no link-verification service.
    Unsupported,
}

pub trait DomainVerifier: Send + Sync {
    fn domain_state(&self, host: &str) -> DomainState;
}

/// Default verifier for platforms without a verification service.
pub struct NoVerification;

impl DomainVerifier for NoVerification {
    fn domain_state(&self, _host: &str) -> DomainState {
        DomainState::Unsupported
    }
}
