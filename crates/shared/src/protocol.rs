use serde::{Deserialize, Serialize};

use crate::domain::{Education, Experience, Project, Skill, SocialLink, SubmissionId};

pub const CONTACT_ACCEPTED_MESSAGE: &str = "Message received successfully";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Body of `POST /api/contact`. Missing fields deserialize as empty strings so
/// they surface as validation issues instead of decoding failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactAccepted {
    pub ok: bool,
    pub message: String,
    pub id: SubmissionId,
}

impl ContactAccepted {
    pub fn new(id: SubmissionId) -> Self {
        Self {
            ok: true,
            message: CONTACT_ACCEPTED_MESSAGE.to_string(),
            id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: ContactField,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldIssue>,
}

impl ContactFailure {
    pub fn validation(details: Vec<FieldIssue>) -> Self {
        Self {
            error: VALIDATION_FAILED.to_string(),
            details,
        }
    }

    pub fn internal() -> Self {
        Self {
            error: INTERNAL_SERVER_ERROR.to_string(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub social_links: Vec<SocialLink>,
}
