use thiserror::Error;

/// Failures a user can see. Everything else is absorbed with a safe default.
#[derive(Error, Debug)]
pub enum BriefingError {
    #[error("{0}")] Config(String),
    #[error("The AI service is currently unavailable. Please try again later.")] ServiceUnavailable,
    #[error("Please enter your business data.")] Validation,
}
