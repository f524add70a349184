//! Shared harness for integration tests: an in-memory store behind the real
//! router, driven through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use microblog::models::{Group, Post, User};
use microblog::store::Store;
use microblog::{create_router, AppState, Config};
use std::sync::Arc;
use time::OffsetDateTime;
use tower::ServiceExt;

pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
}

pub async fn spawn() -> TestApp {
    let store = Store::in_memory().await.expect("open in-memory store");
    let state = Arc::new(AppState::with_store(Config::default(), store));
    TestApp {
        router: create_router(Arc::clone(&state)),
        state,
    }
}

impl TestApp {
    pub fn store(&self) -> &Store {
        &self.state.store
    }

    /// Create a user together with a login session token.
    pub async fn login_user(&self, username: &str) -> (User, String) {
        let user = self.store().insert_user(username).await.unwrap();
        let token = self.store().create_session(user.id).await.unwrap();
        (user, token)
    }

    pub async fn seed_group(&self, title: &str, slug: &str) -> Group {
        self.store().insert_group(title, slug, "").await.unwrap()
    }

    pub async fn seed_post(&self, text: &str, author: &User, group: Option<&Group>) -> Post {
        self.store()
            .insert_post(
                text,
                OffsetDateTime::now_utc(),
                author.id,
                group.map(|g| g.id),
            )
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Submit a form-encoded POST, optionally authenticated.
    pub async fn post_form(&self, path: &str, token: Option<&str>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect carries a location header")
        .to_str()
        .unwrap()
}
