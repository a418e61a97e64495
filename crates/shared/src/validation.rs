use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::protocol::{ContactField, ContactForm, FieldIssue};

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// A contact form that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("contact form rejected: {}", summarize(.issues))]
pub struct ContactValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ContactValidationError {
    pub fn has_issue_for(&self, field: ContactField) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.starts_with('.') || candidate.contains("..") {
        return false;
    }
    email_pattern().is_match(candidate)
}

/// Checks every field and reports all failures at once, in field order.
pub fn validate_contact(form: &ContactForm) -> Result<ValidContact, ContactValidationError> {
    let mut issues = Vec::new();

    if form.name.chars().count() < NAME_MIN_CHARS {
        issues.push(FieldIssue {
            field: ContactField::Name,
            message: format!("Name must be at least {NAME_MIN_CHARS} characters"),
        });
    }
    if !is_valid_email(&form.email) {
        issues.push(FieldIssue {
            field: ContactField::Email,
            message: "Please enter a valid email".to_string(),
        });
    }
    if form.message.chars().count() < MESSAGE_MIN_CHARS {
        issues.push(FieldIssue {
            field: ContactField::Message,
            message: format!("Message must be at least {MESSAGE_MIN_CHARS} characters"),
        });
    }

    if !issues.is_empty() {
        return Err(ContactValidationError { issues });
    }

    Ok(ValidContact {
        name: form.name.clone(),
        email: form.email.clone(),
        message: form.message.clone(),
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
