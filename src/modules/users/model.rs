//! Request and response bodies for account administration.
//!
//! String fields accept a missing key, `null` or `""` interchangeably; all
//! three are empty and fail the presence checks with the same message.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};
use welding_admin_core::serde::deserialize_null_as_empty;
use welding_admin_firebase::UserRecord;

pub const CREDENTIALS_REQUIRED: &str = "Email and password required.";
pub const UID_AND_EMAIL_REQUIRED: &str = "UID and new email required.";
pub const UID_AND_PASSWORD_REQUIRED: &str = "UID and new password required.";
pub const UID_REQUIRED: &str = "UID required.";

#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "Email and password required."))]
    pub email: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "Email and password required."))]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateEmailDto {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "UID and new email required."))]
    pub uid: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "UID and new email required."))]
    pub email: String,
}

#[derive(Deserialize, Clone, Validate, ToSchema)]
pub struct UpdatePasswordDto {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "UID and new password required."))]
    pub uid: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    #[validate(length(min = 1, message = "UID and new password required."))]
    pub password: String,
}

/// Names the account to delete by uid or, failing that, by email.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct DeleteUserDto {
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub uid: String,

    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub email: String,
}

impl Validate for DeleteUserDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        if !self.uid.is_empty() || !self.email.is_empty() {
            return Ok(());
        }
        let mut errors = ValidationErrors::new();
        errors.add(
            "uid",
            ValidationError::new("required").with_message(Cow::Borrowed(UID_REQUIRED)),
        );
        Err(errors)
    }
}

/// How a delete request identifies its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Uid(String),
    Email(String),
}

impl DeleteUserDto {
    /// A non-empty uid wins over an email.
    pub fn target(&self) -> Option<DeleteTarget> {
        if !self.uid.is_empty() {
            Some(DeleteTarget::Uid(self.uid.clone()))
        } else if !self.email.is_empty() {
            Some(DeleteTarget::Email(self.email.clone()))
        } else {
            None
        }
    }
}

// Passwords stay out of logs and spans.
impl std::fmt::Debug for CreateUserDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserDto")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for UpdatePasswordDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePasswordDto")
            .field("uid", &self.uid)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateUserResponse {
    pub success: bool,
    pub uid: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
