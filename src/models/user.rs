use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user account row as stored in the database.
///
/// Deliberately not `Serialize`: the password hash must never be written to a
/// response. Use [`User::public`] for anything that leaves the server.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The externally visible subset of a user account.
///
/// Serialized with the wire names the API exposes (`_id`, `email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: i32,
    pub email: String,
}

impl User {
    /// Projects the account onto its public fields.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}
