//! Domain records as stored and served.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// An authenticated principal. Account lifecycle (registration, login) is
/// handled by an external auth service; this core only resolves and
/// references users.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A named topical collection posts may optionally belong to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// Unique URL-safe identifier.
    pub slug: String,
    pub description: String,
}

/// A unit of authored content.
///
/// `author` and `group` are denormalized to username and slug by the store's
/// post queries so listings can be served without extra lookups.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    /// Creation timestamp. Set once at creation, immutable thereafter.
    #[serde(with = "time::serde::rfc3339")]
    pub pub_date: OffsetDateTime,
    /// Author's username.
    pub author: String,
    #[serde(skip)]
    pub author_id: i64,
    /// Slug of the post's group, if any.
    pub group: Option<String>,
    #[serde(skip)]
    pub group_id: Option<i64>,
}
