//! Todo record as stored and as cached.

use serde::{Deserialize, Serialize};

use crate::identity::now_millis;
use crate::ListItem;

/// One todo row.
///
/// `created_at` is milliseconds since the Unix epoch. `user_id` is the owner;
/// rows created without a signed-in user have an empty owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ListItem)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    #[list_item(skip_patch)]
    pub created_at: i64,
    #[list_item(skip_patch)]
    pub user_id: String,
}

impl TodoDraft {
    /// A not-yet-confirmed todo as shown before the server answers.
    ///
    /// The owner is a placeholder; the server assigns the real one.
    pub fn pending(title: &str) -> Self {
        Self {
            title: title.to_string(),
            completed: false,
            created_at: now_millis(),
            user_id: String::new(),
        }
    }
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}
