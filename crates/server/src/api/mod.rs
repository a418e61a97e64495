use std::sync::Arc;

use shared::{
    content,
    domain::{ContactSubmission, Project, Skill, SkillCategory, SubmissionId},
    error::{ApiError, ErrorCode},
    protocol::{ContactForm, ContentBundle},
    validation::{validate_contact, ContactValidationError},
};
use storage::{StorageError, SubmissionStore};
use thiserror::Error;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn SubmissionStore>,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ContactValidationError),
    #[error("contact submission could not be stored: {0}")]
    Store(#[from] StorageError),
}

/// Validates and stores one contact form. Nothing is stored when validation
/// fails.
pub async fn submit_contact(
    ctx: &ApiContext,
    form: ContactForm,
) -> Result<ContactSubmission, SubmitError> {
    let contact = validate_contact(&form)?;
    let submission = ctx.store.save_submission(contact).await?;
    info!(
        id = %submission.id,
        name = %submission.name,
        email = %submission.email,
        message = %submission.message,
        timestamp = %submission.submitted_at.to_rfc3339(),
        "contact form submission"
    );
    Ok(submission)
}

pub async fn list_submissions(ctx: &ApiContext) -> Result<Vec<ContactSubmission>, ApiError> {
    ctx.store.list_submissions().await.map_err(internal)
}

pub async fn load_submission(
    ctx: &ApiContext,
    id: SubmissionId,
) -> Result<ContactSubmission, ApiError> {
    ctx.store
        .load_submission(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("no submission {id}")))
}

pub fn content_bundle() -> ContentBundle {
    content::bundle()
}

/// `Some(true)` keeps featured projects, `Some(false)` the rest.
pub fn list_projects(featured: Option<bool>) -> Vec<Project> {
    match featured {
        Some(true) => content::featured_projects(),
        Some(false) => content::projects()
            .into_iter()
            .filter(|project| !project.featured)
            .collect(),
        None => content::projects(),
    }
}

pub fn list_skills(category: Option<SkillCategory>) -> Vec<Skill> {
    match category {
        Some(category) => content::skills_in(category),
        None => content::skills(),
    }
}

fn internal(err: StorageError) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
