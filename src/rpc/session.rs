//! Session variables attached to a procedure call.

use std::collections::HashMap;

/// Header / variable carrying the signed-in user's id.
pub const USER_ID: &str = "x-user-id";
/// Header / variable carrying the signed-in user's display name.
pub const USER_NAME: &str = "x-user-name";

/// Parsed session variables of the incoming call.
///
/// Over HTTP these are the request headers, lowercased. The authentication
/// layer in front of the router is expected to set `x-user-id` only for a
/// verified session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a signed-in user.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(USER_ID, user_id);
        session
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// The signed-in user's id, if any. Empty values count as absent.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID).filter(|id| !id.is_empty())
    }

    pub fn user_name(&self) -> Option<&str> {
        self.get(USER_NAME)
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Get all session variables.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
