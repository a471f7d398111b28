//! HTTP surface: handlers, outcome envelope and field validators.

pub mod captcha;
pub mod charts;
pub mod export;
pub mod login;
pub mod logout;
pub mod mobile;
pub mod register;
pub mod subjects;
pub mod teachers;
pub mod vote;

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

/// Vote accepted.
pub const CODE_VOTE_RECORDED: u32 = 10001;
/// Unknown or malformed teacher id.
pub const CODE_INVALID_TEACHER: u32 = 10002;
/// Protected path hit without a logged-in session.
pub const CODE_NOT_LOGGED_IN: u32 = 10003;
/// Phone code handed to the gateway.
pub const CODE_SMS_SENT: u32 = 20001;
/// Gateway refused, failed or timed out.
pub const CODE_SMS_FAILED: u32 = 20002;
/// Phone number malformed.
pub const CODE_INVALID_PHONE: u32 = 20003;
/// Unrecoverable server fault.
pub const CODE_SERVER_FAULT: u32 = 50000;

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w{6,20}$").expect("username pattern")
});
static TEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("tel pattern"));

/// JSON envelope for status-style endpoints.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub code: u32,
    pub hint: String,
}

impl Outcome {
    /// Create a new [`Outcome`].
    pub fn new(code: u32, hint: impl Into<String>) -> Self {
        Self {
            code,
            hint: hint.into(),
        }
    }
}

/// Whole string must be 6-20 word characters.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username").with_message(
            "username must be 6-20 letters, digits or underscores".into(),
        ))
    }
}

/// Whole string must be 11 digits starting `1[3-9]`.
pub fn validate_tel(tel: &str) -> Result<(), ValidationError> {
    if TEL.is_match(tel) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_tel")
            .with_message("enter a valid phone number".into()))
    }
}

/// Registration stands only on an accepted agreement checkbox.
pub fn validate_agreement(agreement: &str) -> Result<(), ValidationError> {
    match agreement {
        "on" | "true" | "1" => Ok(()),
        _ => Err(ValidationError::new("agreement_required")
            .with_message("you must accept the user agreement".into())),
    }
}

/// One human-readable message out of a failed validation, used as the
/// hint of the re-rendered form.
pub fn first_hint(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|issues| issues.iter())
        .map(|issue| issue.to_string())
        .next()
        .unwrap_or_else(|| "enter valid form data".to_owned())
}
