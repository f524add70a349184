//! Post submission form and its validation.

use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw submitted fields for creating or editing a post.
///
/// `group` arrives as the string value of a select input; an empty string
/// means no group was chosen.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostForm {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

/// Validation error kinds, keyed per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field is missing or blank.
    RequiredFieldMissing,
    /// Field references an entity that does not exist.
    InvalidReference,
}

/// Field name → error kind for a failed submission.
pub type FieldErrors = BTreeMap<&'static str, ErrorKind>;

/// A validated, normalized submission. `author` and `pub_date` are stamped
/// by the workflow before persistence; validation has no notion of the
/// current principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPayload {
    pub text: String,
    pub group_id: Option<i64>,
}

/// Outcome of validating a submission. Store failures stay on the `Err`
/// path of `validate` and never turn into field errors.
pub type Validation = Result<PostPayload, FieldErrors>;

impl PostForm {
    /// Validate the submission against the store.
    ///
    /// Pure with respect to the store: reads group existence, persists
    /// nothing.
    pub async fn validate(&self, store: &Store) -> Result<Validation, sqlx::Error> {
        let mut errors = FieldErrors::new();

        let text = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if text.is_none() {
            errors.insert("text", ErrorKind::RequiredFieldMissing);
        }

        let mut group_id = None;
        if let Some(raw) = self.group.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            match raw.parse::<i64>() {
                Ok(id) => match store.group_by_id(id).await? {
                    Some(group) => group_id = Some(group.id),
                    None => {
                        errors.insert("group", ErrorKind::InvalidReference);
                    }
                },
                Err(_) => {
                    errors.insert("group", ErrorKind::InvalidReference);
                }
            }
        }

        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        Ok(Ok(PostPayload {
            text: text.unwrap_or_default().to_string(),
            group_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_group() -> (Store, i64) {
        let store = Store::in_memory().await.unwrap();
        let group = store.insert_group("Dogs", "dogs", "").await.unwrap();
        (store, group.id)
    }

    #[tokio::test]
    async fn accepts_text_with_existing_group() {
        let (store, group_id) = store_with_group().await;
        let form = PostForm {
            text: Some("woof".into()),
            group: Some(group_id.to_string()),
        };

        let payload = form.validate(&store).await.unwrap().unwrap();
        assert_eq!(payload.text, "woof");
        assert_eq!(payload.group_id, Some(group_id));
    }

    #[tokio::test]
    async fn group_is_optional() {
        let (store, _) = store_with_group().await;
        let form = PostForm {
            text: Some("no group".into()),
            group: Some(String::new()),
        };

        let payload = form.validate(&store).await.unwrap().unwrap();
        assert_eq!(payload.group_id, None);
    }

    #[tokio::test]
    async fn blank_text_is_required_field_missing() {
        let (store, _) = store_with_group().await;
        let form = PostForm {
            text: Some("   ".into()),
            group: None,
        };

        let errors = form.validate(&store).await.unwrap().unwrap_err();
        assert_eq!(errors.get("text"), Some(&ErrorKind::RequiredFieldMissing));
    }

    #[tokio::test]
    async fn unknown_group_is_invalid_reference() {
        let (store, _) = store_with_group().await;
        let form = PostForm {
            text: Some("hi".into()),
            group: Some("9999".into()),
        };

        let errors = form.validate(&store).await.unwrap().unwrap_err();
        assert_eq!(errors.get("group"), Some(&ErrorKind::InvalidReference));
    }

    #[tokio::test]
    async fn non_numeric_group_is_invalid_reference() {
        let (store, _) = store_with_group().await;
        let form = PostForm {
            text: Some("hi".into()),
            group: Some("not-a-number".into()),
        };

        let errors = form.validate(&store).await.unwrap().unwrap_err();
        assert_eq!(errors.get("group"), Some(&ErrorKind::InvalidReference));
    }

    #[tokio::test]
    async fn reports_both_fields_at_once() {
        let (store, _) = store_with_group().await;
        let form = PostForm {
            text: None,
            group: Some("9999".into()),
        };

        let errors = form.validate(&store).await.unwrap().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
