//! HTTP request handlers for the authoring workflow.

use crate::auth::CurrentUser;
use crate::error::Error;
use crate::forms::PostForm;
use crate::listing::paginate;
use crate::response::{HealthResponse, PostDetailResponse, PostFormResponse, PostListResponse};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, warn};

/// `?page=N` on listing endpoints. 1-based; defaults to the first page.
#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

/// Health check with basic metrics.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = match state.store.ping().await {
        Ok(()) => "ok",
        Err(_) => "unavailable",
    };

    Json(HealthResponse {
        status,
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
    })
}

/// `GET /` - all posts, newest first, paginated.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(pager): Query<PageQuery>,
) -> Result<Json<PostListResponse>, Error> {
    let posts = state.store.posts_all().await?;
    let page = paginate(posts, state.config.page_size, pager.page);
    Ok(Json(PostListResponse::unfiltered(page)))
}

/// `GET /group/{slug}/` - posts in one group.
pub async fn group_posts(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(pager): Query<PageQuery>,
) -> Result<Json<PostListResponse>, Error> {
    let group = state
        .store
        .group_by_slug(&slug)
        .await?
        .ok_or(Error::NotFound)?;

    let posts = state.store.posts_by_group(group.id).await?;
    let page = paginate(posts, state.config.page_size, pager.page);
    Ok(Json(PostListResponse::for_group(page, group)))
}

/// `GET /profile/{username}/` - posts by one author.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(pager): Query<PageQuery>,
) -> Result<Json<PostListResponse>, Error> {
    let author = state
        .store
        .user_by_username(&username)
        .await?
        .ok_or(Error::NotFound)?;

    let posts = state.store.posts_by_author(author.id).await?;
    let page = paginate(posts, state.config.page_size, pager.page);
    Ok(Json(PostListResponse::for_author(page, author)))
}

/// `GET /posts/{id}/` - single post.
pub async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PostDetailResponse>, Error> {
    let post = state.store.post_by_id(id).await?.ok_or(Error::NotFound)?;
    Ok(Json(PostDetailResponse { post }))
}

/// `GET /create/` - empty form for a new post.
pub async fn post_create_form(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> Result<Json<PostFormResponse>, Error> {
    let groups = state.store.groups_all().await?;
    Ok(Json(PostFormResponse::blank(groups)))
}

/// `POST /create/` - validate and persist a new post.
///
/// On success the post is stamped with the submitting user and the current
/// time, and the client is redirected to that user's profile listing.
pub async fn post_create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<PostForm>,
) -> Result<Response, Error> {
    let payload = match form.validate(&state.store).await? {
        Ok(payload) => payload,
        Err(errors) => {
            warn!(author = %user.username, ?errors, "Rejected post submission");
            let groups = state.store.groups_all().await?;
            let body = PostFormResponse::invalid(form, errors, groups, false);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
        }
    };

    let post = state
        .store
        .insert_post(
            &payload.text,
            OffsetDateTime::now_utc(),
            user.id,
            payload.group_id,
        )
        .await?;

    info!(post = post.id, author = %user.username, "Created post");
    Ok(Redirect::to(&format!("/profile/{}/", user.username)).into_response())
}

/// `GET /posts/{id}/edit/` - form prefilled with the post's current values.
///
/// Only the author may edit; anyone else is sent to the detail view.
pub async fn post_edit_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<PostFormResponse>, Error> {
    let post = state.store.post_by_id(id).await?.ok_or(Error::NotFound)?;
    if post.author_id != user.id {
        return Err(Error::NotOwner { post_id: post.id });
    }

    let groups = state.store.groups_all().await?;
    Ok(Json(PostFormResponse::prefilled(&post, groups)))
}

/// `POST /posts/{id}/edit/` - validate and apply an edit.
///
/// Updates only text and group; author and pub_date never change.
pub async fn post_edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, Error> {
    let post = state.store.post_by_id(id).await?.ok_or(Error::NotFound)?;
    if post.author_id != user.id {
        warn!(post = post.id, user = %user.username, "Edit refused: not the author");
        return Err(Error::NotOwner { post_id: post.id });
    }

    let payload = match form.validate(&state.store).await? {
        Ok(payload) => payload,
        Err(errors) => {
            let groups = state.store.groups_all().await?;
            let body = PostFormResponse::invalid(form, errors, groups, true);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
        }
    };

    state
        .store
        .update_post(post.id, &payload.text, payload.group_id)
        .await?;

    info!(post = post.id, author = %user.username, "Edited post");
    Ok(Redirect::to(&format!("/posts/{}/", post.id)).into_response())
}

/// Fallback for unmatched paths.
pub async fn not_found() -> Error {
    Error::NotFound
}
