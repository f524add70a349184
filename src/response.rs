//! Response payloads for the microblog API.

use crate::forms::{FieldErrors, PostForm};
use crate::listing::Page;
use crate::models::{Group, Post, User};
use serde::Serialize;

/// A paginated listing, with the matched group or author as context when
/// the listing is filtered.
#[derive(Serialize)]
pub struct PostListResponse {
    pub page: Page<Post>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
}

impl PostListResponse {
    pub fn unfiltered(page: Page<Post>) -> Self {
        Self {
            page,
            group: None,
            author: None,
        }
    }

    pub fn for_group(page: Page<Post>, group: Group) -> Self {
        Self {
            page,
            group: Some(group),
            author: None,
        }
    }

    pub fn for_author(page: Page<Post>, author: User) -> Self {
        Self {
            page,
            group: None,
            author: Some(author),
        }
    }
}

/// The create/edit form: current values, selectable groups, and field
/// errors when a submission was rejected.
#[derive(Serialize)]
pub struct PostFormResponse {
    pub form: PostForm,
    pub groups: Vec<Group>,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl PostFormResponse {
    /// Empty create form.
    pub fn blank(groups: Vec<Group>) -> Self {
        Self {
            form: PostForm::default(),
            groups,
            is_edit: false,
            errors: None,
        }
    }

    /// Edit form prefilled from an existing post.
    pub fn prefilled(post: &Post, groups: Vec<Group>) -> Self {
        Self {
            form: PostForm {
                text: Some(post.text.clone()),
                group: post.group_id.map(|id| id.to_string()),
            },
            groups,
            is_edit: true,
            errors: None,
        }
    }

    /// Re-rendered form after a failed submission.
    pub fn invalid(form: PostForm, errors: FieldErrors, groups: Vec<Group>, is_edit: bool) -> Self {
        Self {
            form,
            groups,
            is_edit,
            errors: Some(errors),
        }
    }
}

/// Single post detail.
#[derive(Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
}
