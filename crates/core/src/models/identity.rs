use serde::{Deserialize, Serialize};

use super::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Player,
    TeamLeader,
    FieldOwner,
    Moderator,
}

text_enum!(UserRole {
    Player,
    TeamLeader,
    FieldOwner,
    Moderator,
});

/// The authenticated user behind a request, as vouched for by the auth
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    pub user_id: i64,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }
}
