use serde::Deserialize;

// ============================================================================
// User Commands - Represent user intent
// ============================================================================

/// Body of `POST /user`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

/// Body of `POST /user/{id}/points`
#[derive(Debug, Clone, Deserialize)]
pub struct RedeemPoints {
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    AwardPoints(u64),
    RedeemPoints(i64),
}
