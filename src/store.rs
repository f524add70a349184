//! SQLite-backed entity store.
//!
//! Holds users, groups, posts, and login sessions. Referential integrity is
//! enforced in the schema: deleting a user deletes their posts, deleting a
//! group clears the reference on its posts but keeps them.

use crate::models::{Group, Post, User};
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{query, query_as, query_scalar};
use std::str::FromStr;
use time::OffsetDateTime;
use tracing::info;

/// Re-export of the SQLite connection pool type.
pub type Pool = SqlitePool;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        text TEXT NOT NULL,
        pub_date TEXT NOT NULL,
        author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        group_id INTEGER REFERENCES groups(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_posts_group ON posts(group_id)",
];

/// Every post query goes through the same joined projection so listings and
/// detail views carry the author username and group slug.
const POST_COLUMNS: &str = "
    SELECT
        p.id, p.text, p.pub_date,
        u.username AS author, p.author_id,
        g.slug AS \"group\", p.group_id
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
";

/// Default ordering: newest first, id as a stable tiebreak.
const POST_ORDER: &str = " ORDER BY p.pub_date DESC, p.id DESC";

/// SQLite-backed persistent store.
#[derive(Clone, Debug)]
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Open a connection pool against `url`, creating the database file if
    /// it does not exist, and apply the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        info!(url, "Store ready");
        Ok(store)
    }

    /// Open an in-memory store. A single connection keeps the database
    /// alive for the pool's lifetime.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply pending schema statements. Idempotent.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Cheap reachability probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    // --- users ---

    pub async fn insert_user(&self, username: &str) -> Result<User, sqlx::Error> {
        query_as::<_, User>("INSERT INTO users (username) VALUES ($1) RETURNING id, username")
            .bind(username)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT id, username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Remove a user. Their posts and sessions go with them.
    pub async fn delete_user(&self, id: i64) -> Result<(), sqlx::Error> {
        query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // --- groups ---

    pub async fn insert_group(
        &self,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, sqlx::Error> {
        query_as::<_, Group>(
            "INSERT INTO groups (title, slug, description) VALUES ($1, $2, $3)
             RETURNING id, title, slug, description",
        )
        .bind(title)
        .bind(slug)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn group_by_slug(&self, slug: &str) -> Result<Option<Group>, sqlx::Error> {
        query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn group_by_id(&self, id: i64) -> Result<Option<Group>, sqlx::Error> {
        query_as::<_, Group>("SELECT id, title, slug, description FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn groups_all(&self) -> Result<Vec<Group>, sqlx::Error> {
        query_as::<_, Group>("SELECT id, title, slug, description FROM groups ORDER BY title")
            .fetch_all(&self.pool)
            .await
    }

    /// Remove a group. Posts referencing it keep existing with the
    /// reference cleared.
    pub async fn delete_group(&self, id: i64) -> Result<(), sqlx::Error> {
        query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // --- posts ---

    /// Persist a new post and return it with its assigned identity.
    pub async fn insert_post(
        &self,
        text: &str,
        pub_date: OffsetDateTime,
        author_id: i64,
        group_id: Option<i64>,
    ) -> Result<Post, sqlx::Error> {
        let id: i64 = query_scalar(
            "INSERT INTO posts (text, pub_date, author_id, group_id)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(text)
        .bind(pub_date)
        .bind(author_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        // The joined projection cannot come out of RETURNING.
        self.post_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn post_by_id(&self, id: i64) -> Result<Option<Post>, sqlx::Error> {
        query_as::<_, Post>(&format!("{POST_COLUMNS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Update a post's text and group. Author and pub_date are immutable.
    pub async fn update_post(
        &self,
        id: i64,
        text: &str,
        group_id: Option<i64>,
    ) -> Result<(), sqlx::Error> {
        query("UPDATE posts SET text = $1, group_id = $2 WHERE id = $3")
            .bind(text)
            .bind(group_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn posts_all(&self) -> Result<Vec<Post>, sqlx::Error> {
        query_as::<_, Post>(&format!("{POST_COLUMNS}{POST_ORDER}"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn posts_by_group(&self, group_id: i64) -> Result<Vec<Post>, sqlx::Error> {
        query_as::<_, Post>(&format!("{POST_COLUMNS} WHERE p.group_id = $1{POST_ORDER}"))
            .bind(group_id)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn posts_by_author(&self, author_id: i64) -> Result<Vec<Post>, sqlx::Error> {
        query_as::<_, Post>(&format!("{POST_COLUMNS} WHERE p.author_id = $1{POST_ORDER}"))
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
    }

    // --- sessions ---

    /// Mint a login session for a user and return its bearer token. The
    /// external auth service calls this after verifying credentials.
    pub async fn create_session(&self, user_id: i64) -> Result<String, sqlx::Error> {
        let token = format!("sess-{:032x}", rand::thread_rng().gen::<u128>());
        query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(&token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    /// Resolve a bearer token to its user, if the session exists.
    pub async fn user_by_session(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>(
            "SELECT u.id, u.username FROM sessions s
             JOIN users u ON u.id = s.user_id WHERE s.token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    async fn seeded() -> (Store, User, Group) {
        let store = Store::in_memory().await.unwrap();
        let user = store.insert_user("leo").await.unwrap();
        let group = store
            .insert_group("Cats", "cats", "feline affairs")
            .await
            .unwrap();
        (store, user, group)
    }

    #[tokio::test]
    async fn insert_assigns_identity_and_joins_author_and_group() {
        let (store, user, group) = seeded().await;
        let post = store
            .insert_post("hello", OffsetDateTime::now_utc(), user.id, Some(group.id))
            .await
            .unwrap();

        assert!(post.id > 0);
        assert_eq!(post.author, "leo");
        assert_eq!(post.group.as_deref(), Some("cats"));
    }

    #[tokio::test]
    async fn posts_come_back_newest_first() {
        let (store, user, _) = seeded().await;
        let base = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        for i in 0..3 {
            store
                .insert_post(
                    &format!("post {i}"),
                    base + time::Duration::seconds(i),
                    user.id,
                    None,
                )
                .await
                .unwrap();
        }

        let posts = store.posts_all().await.unwrap();
        let texts: Vec<&str> = posts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["post 2", "post 1", "post 0"]);
    }

    #[tokio::test]
    async fn deleting_group_clears_reference_but_keeps_post() {
        let (store, user, group) = seeded().await;
        let post = store
            .insert_post("orphan", OffsetDateTime::now_utc(), user.id, Some(group.id))
            .await
            .unwrap();

        store.delete_group(group.id).await.unwrap();

        let survivor = store.post_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(survivor.group_id, None);
        assert_eq!(survivor.group, None);
        assert_eq!(survivor.text, "orphan");
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_their_posts() {
        let (store, user, _) = seeded().await;
        let post = store
            .insert_post("doomed", OffsetDateTime::now_utc(), user.id, None)
            .await
            .unwrap();

        store.delete_user(user.id).await.unwrap();

        assert!(store.post_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_touches_only_text_and_group() {
        let (store, user, group) = seeded().await;
        let created = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let post = store
            .insert_post("before", created, user.id, Some(group.id))
            .await
            .unwrap();

        store.update_post(post.id, "after", None).await.unwrap();

        let updated = store.post_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(updated.text, "after");
        assert_eq!(updated.group_id, None);
        assert_eq!(updated.author_id, post.author_id);
        assert_eq!(updated.pub_date, post.pub_date);
    }

    #[tokio::test]
    async fn session_round_trip() {
        let (store, user, _) = seeded().await;
        let token = store.create_session(user.id).await.unwrap();

        let resolved = store.user_by_session(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);
        assert!(store.user_by_session("sess-bogus").await.unwrap().is_none());
    }
}
