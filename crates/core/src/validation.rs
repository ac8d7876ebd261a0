//! Field-level validation for categories, issues and admin profiles.
//!
//! Each `check_*` function runs its rules in field order and collects every
//! violation rather than stopping at the first, so a form can redisplay all
//! errors at once. On success it returns the normalized values to persist.

use std::fmt;

use serde::Serialize;
use validator::{ValidateEmail, ValidateLength};

use crate::error::CoreError;
use crate::issue::{IssuePriority, IssueStatus};
use crate::types::DbId;

pub const CATEGORY_NAME_MIN: u64 = 2;
pub const CATEGORY_NAME_MAX: u64 = 100;
pub const CATEGORY_DESCRIPTION_MAX: u64 = 1000;
pub const ISSUE_TITLE_MIN: u64 = 3;
pub const ISSUE_TITLE_MAX: u64 = 255;
pub const ISSUE_DESCRIPTION_MIN: u64 = 10;
pub const PERSON_NAME_MAX: u64 = 100;
pub const EMAIL_MAX: u64 = 180;
pub const PASSWORD_MIN: u64 = 6;
pub const PASSWORD_MAX: u64 = 4096;

pub const MSG_CATEGORY_NOT_FOUND: &str = "Selected category not found.";
pub const MSG_CURRENT_PASSWORD_INCORRECT: &str =
    "Current password is incorrect. Please try again.";

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Ordered collection of violations for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a collection holding exactly one violation.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut violations = Self::new();
        violations.push(field, message);
        violations
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Messages recorded against one field, in rule order.
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Push `required` if blank, otherwise the length messages that apply.
fn check_text(
    violations: &mut Violations,
    field: &str,
    value: &str,
    required: &str,
    min: Option<(u64, &str)>,
    max: Option<(u64, &str)>,
) {
    if is_blank(value) {
        violations.push(field, required);
        return;
    }
    if let Some((limit, message)) = min {
        if !value.validate_length(Some(limit), None, None) {
            violations.push(field, message);
        }
    }
    if let Some((limit, message)) = max {
        if !value.validate_length(None, Some(limit), None) {
            violations.push(field, message);
        }
    }
}

fn check_optional_max(
    violations: &mut Violations,
    field: &str,
    value: Option<&str>,
    max: u64,
    message: &str,
) {
    if let Some(value) = value {
        if !value.validate_length(None, Some(max), None) {
            violations.push(field, message);
        }
    }
}

/// Treat empty optional text as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !is_blank(v)).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedCategory {
    pub name: String,
    pub description: Option<String>,
}

pub fn check_category(
    name: &str,
    description: Option<&str>,
) -> Result<CheckedCategory, Violations> {
    let mut violations = Violations::new();
    check_text(
        &mut violations,
        "name",
        name,
        "Category name is required.",
        Some((
            CATEGORY_NAME_MIN,
            "Category name must be at least 2 characters long.",
        )),
        Some((
            CATEGORY_NAME_MAX,
            "Category name cannot be longer than 100 characters.",
        )),
    );
    check_optional_max(
        &mut violations,
        "description",
        description,
        CATEGORY_DESCRIPTION_MAX,
        "Description cannot be longer than 1000 characters.",
    );

    if !violations.is_empty() {
        return Err(violations);
    }
    Ok(CheckedCategory {
        name: name.to_string(),
        description: non_empty(description),
    })
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

/// Raw issue input as submitted by a form or API client.
#[derive(Debug, Clone, Copy)]
pub struct IssueDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// `None` selects the default status (`open`).
    pub status: Option<&'a str>,
    /// `None` selects the default priority (`medium`).
    pub priority: Option<&'a str>,
    pub category_id: Option<DbId>,
}

/// Issue fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedIssue {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub category_id: DbId,
}

/// Validate an issue draft.
///
/// `category_exists` reports whether `draft.category_id` resolves to a stored
/// category; it is ignored when no category id was given.
pub fn check_issue(
    draft: &IssueDraft<'_>,
    category_exists: bool,
) -> Result<CheckedIssue, Violations> {
    let mut violations = Violations::new();
    check_text(
        &mut violations,
        "title",
        draft.title,
        "Title is required.",
        Some((ISSUE_TITLE_MIN, "Title must be at least 3 characters long.")),
        Some((ISSUE_TITLE_MAX, "Title cannot be longer than 255 characters.")),
    );
    check_text(
        &mut violations,
        "description",
        draft.description,
        "Description is required.",
        Some((
            ISSUE_DESCRIPTION_MIN,
            "Description must be at least 10 characters long.",
        )),
        None,
    );

    let status = match draft.status {
        None => Some(IssueStatus::default()),
        Some(raw) if is_blank(raw) => {
            violations.push("status", "Status is required.");
            None
        }
        Some(raw) => {
            let status = IssueStatus::from_name(raw);
            if status.is_none() {
                violations.push("status", "Please select a valid status.");
            }
            status
        }
    };

    let priority = match draft.priority {
        None => Some(IssuePriority::default()),
        Some(raw) if is_blank(raw) => {
            violations.push("priority", "Priority is required.");
            None
        }
        Some(raw) => {
            let priority = IssuePriority::from_name(raw);
            if priority.is_none() {
                violations.push("priority", "Please select a valid priority.");
            }
            priority
        }
    };

    match draft.category_id {
        None => violations.push("category_id", "Category is required."),
        Some(_) if !category_exists => violations.push("category_id", MSG_CATEGORY_NOT_FOUND),
        Some(_) => {}
    }

    match (status, priority, draft.category_id) {
        (Some(status), Some(priority), Some(category_id)) if violations.is_empty() => {
            Ok(CheckedIssue {
                title: draft.title.to_string(),
                description: draft.description.to_string(),
                status,
                priority,
                category_id,
            })
        }
        _ => Err(violations),
    }
}

// ---------------------------------------------------------------------------
// Admin profile
// ---------------------------------------------------------------------------

/// Profile name fields that passed validation; blanks become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub fn check_profile(
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<CheckedProfile, Violations> {
    let mut violations = Violations::new();
    check_optional_max(
        &mut violations,
        "first_name",
        first_name,
        PERSON_NAME_MAX,
        "First name cannot be longer than 100 characters.",
    );
    check_optional_max(
        &mut violations,
        "last_name",
        last_name,
        PERSON_NAME_MAX,
        "Last name cannot be longer than 100 characters.",
    );
    if !violations.is_empty() {
        return Err(violations);
    }
    Ok(CheckedProfile {
        first_name: non_empty(first_name),
        last_name: non_empty(last_name),
    })
}

/// Validate the shape of a password change. Verifying the current password
/// against the stored hash is the caller's job.
pub fn check_password_change(current: &str, new: &str, confirm: &str) -> Result<(), Violations> {
    let mut violations = Violations::new();
    if current.is_empty() {
        violations.push("current_password", "Please enter your current password");
    }
    if new.is_empty() {
        violations.push("new_password", "Please enter a new password");
    } else {
        if !new.validate_length(Some(PASSWORD_MIN), None, None) {
            violations.push("new_password", "Your password should be at least 6 characters");
        }
        if !new.validate_length(None, Some(PASSWORD_MAX), None) {
            violations.push("new_password", "Your password cannot be longer than 4096 characters");
        }
        if new != confirm {
            violations.push("new_password", "The new password fields must match.");
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

pub fn check_email(email: &str) -> Result<(), Violations> {
    let mut violations = Violations::new();
    if is_blank(email) {
        violations.push("email", "Email is required.");
    } else if !email.validate_email() {
        violations.push("email", "Please enter a valid email address.");
    } else if !email.validate_length(None, Some(EMAIL_MAX), None) {
        violations.push("email", "Email cannot be longer than 180 characters.");
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
