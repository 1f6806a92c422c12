use chrono::{DateTime, Utc};
use serde_json::Value;

use super::SessionSecrets;
use crate::error::FlowError;
use crate::models::balance::{first_present, first_str};

/// The authenticated account, normalized from the completion response.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Smart-account address, falling back to the plain account address
    pub account_address: Option<String>,
    pub user_id: Option<String>,
    /// Provider session returned by Grid, used as the signing context
    pub session_context: Option<Value>,
    pub authentication: Option<Value>,
    /// Full response as received
    pub raw: Value,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn from_response(raw: Value) -> Self {
        Self {
            account_address: first_str(
                &raw,
                &["smart_account_address", "smartAccountAddress", "address"],
            )
            .map(String::from),
            user_id: first_str(&raw, &["grid_user_id", "gridUserId", "user_id", "userId", "id"])
                .map(String::from),
            session_context: first_present(&raw, &["session"]).cloned(),
            authentication: first_present(&raw, &["authentication"]).cloned(),
            raw,
            created_at: Utc::now(),
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.account_address.as_deref()
    }

    /// Context for the sign step: `session`, falling back to `authentication`
    pub fn signing_context(&self) -> Option<&Value> {
        self.session_context.as_ref().or(self.authentication.as_ref())
    }

    /// Context for the combined sign-and-send step: `authentication`, falling back to `session`
    pub fn authentication_context(&self) -> Option<&Value> {
        self.authentication.as_ref().or(self.session_context.as_ref())
    }
}

/// The single login of this process, owned by the menu loop and handed to
/// each flow. Holds the session and its secrets together.
#[derive(Debug, Default)]
pub struct SessionContext {
    session: Option<Session>,
    secrets: Option<SessionSecrets>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing login
    pub fn login(&mut self, session: Session, secrets: SessionSecrets) {
        self.session = Some(session);
        self.secrets = Some(secrets);
    }

    /// Drop the session and its secrets
    pub fn clear(&mut self) {
        self.session = None;
        self.secrets = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && self.secrets.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The session, or `NotAuthenticated`
    pub fn require_session(&self) -> Result<&Session, FlowError> {
        self.session.as_ref().ok_or(FlowError::NotAuthenticated)
    }

    /// Session and secrets together, or `NotAuthenticated`
    pub fn require_signer(&self) -> Result<(&Session, &SessionSecrets), FlowError> {
        match (&self.session, &self.secrets) {
            (Some(session), Some(secrets)) => Ok((session, secrets)),
            _ => Err(FlowError::NotAuthenticated),
        }
    }
}
