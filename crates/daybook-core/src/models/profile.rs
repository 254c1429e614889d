//! Profile model

use serde::{Deserialize, Serialize};

/// Display profile created by the backend at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
}
