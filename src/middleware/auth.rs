//! Identity set by the upstream auth gateway.
//!
//! The gateway authenticates the session and forwards the user as headers.
//! Handlers that need a user take [`CurrentUser`]; a missing id rejects the
//! request with 401 before the handler runs.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{db::Author, error::AppError};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl CurrentUser {
    /// Author record for submissions that must carry an email
    pub fn author(&self) -> Result<Author, AppError> {
        let email = self
            .email
            .clone()
            .ok_or_else(|| AppError::InvalidInput("User email not found".to_string()))?;
        Ok(Author {
            user_id: self.user_id.clone(),
            user_email: email,
        })
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER).ok_or_else(|| {
            AppError::Unauthenticated("You must be logged in".to_string())
        })?;

        Ok(CurrentUser {
            user_id,
            email: header(parts, USER_EMAIL_HEADER),
        })
    }
}
