//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use minimart_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash never leaves the `db` layer; this type is safe to
/// serialize in API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
